//! Layered parser construction.
//!
//! Layers are applied in a fixed order regardless of the order of the
//! builder calls: profile, then option files, then single overrides, then
//! acronym files.

use std::path::{Path, PathBuf};
use wikiweave_core::{OptionValue, ParserProfile, Result, WikiOptions};
use wikiweave_parser::WikiParser;

/// Builder for [`WikiParser`]
#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    profile: ParserProfile,
    config_files: Vec<PathBuf>,
    overrides: Vec<(String, OptionValue)>,
    acronym_files: Vec<PathBuf>,
}

impl ParserBuilder {
    pub fn new(profile: ParserProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Layer a YAML or JSON option file (`.json` selects JSON).
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_files.push(path.into());
        self
    }

    /// Override one option after profile and files.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.overrides.push((name.into(), value.into()));
        self
    }

    /// Parse a `NAME=VALUE` override as given on a command line.
    pub fn set_pair(self, pair: &str) -> Result<Self> {
        let (name, value) = pair.split_once('=').ok_or_else(|| {
            wikiweave_core::Error::invalid_option(pair, "expected NAME=VALUE")
        })?;
        let value: OptionValue = match value.parse() {
            Ok(value) => value,
            Err(never) => match never {},
        };
        Ok(self.set(name.trim(), value))
    }

    /// Merge a `term : expansion` file into the acronym table.
    pub fn acronyms_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.acronym_files.push(path.into());
        self
    }

    /// Resolve the option layers without building a parser.
    pub fn options(&self) -> Result<WikiOptions> {
        let mut options = self.profile.create_options();
        for path in &self.config_files {
            options.apply_file(path)?;
        }
        options.set_options(self.overrides.iter().cloned())?;
        Ok(options)
    }

    /// Build the parser. Unlike the `acronyms_file` option, acronym files
    /// given here must be readable.
    pub fn build(self) -> Result<WikiParser> {
        let mut parser = WikiParser::with_options(self.options()?);
        for path in &self.acronym_files {
            load_acronyms(&mut parser, path)?;
        }
        log::debug!(
            "Built {} parser ({} option files, {} overrides, {} acronym files)",
            self.profile.name(),
            self.config_files.len(),
            self.overrides.len(),
            self.acronym_files.len()
        );
        Ok(parser)
    }
}

fn load_acronyms(parser: &mut WikiParser, path: &Path) -> Result<()> {
    let count = parser.load_acronyms(path)?;
    log::info!("Merged {} acronyms from {}", count, path.display());
    Ok(())
}
