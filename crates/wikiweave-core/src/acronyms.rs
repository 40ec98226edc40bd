//! Acronym table used to title `??abbr??` elements that carry no explicit title.
//!
//! The resource format is one entry per line, `term:expansion`. Blank lines
//! and lines without a colon are ignored. Loading is additive: later
//! resources override earlier entries with the same term.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// Mapping from acronym text to its expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcronymTable {
    entries: HashMap<String, String>,
}

impl AcronymTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from resource text
    pub fn parse(content: &str) -> Self {
        let mut table = Self::new();
        table.merge_str(content);
        table
    }

    /// Load a table from a resource file
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut table = Self::new();
        table.merge_file(path)?;
        Ok(table)
    }

    /// Merge entries from resource text, returning how many were read
    pub fn merge_str(&mut self, content: &str) -> usize {
        let mut count = 0;
        for line in content.lines() {
            let Some((term, expansion)) = line.trim().split_once(':') else {
                continue;
            };
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            self.entries
                .insert(term.to_string(), expansion.trim().to_string());
            count += 1;
        }
        count
    }

    /// Merge entries from a resource file, returning how many were read
    pub fn merge_file(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(self.merge_str(&content))
    }

    /// Merge another table into this one
    pub fn extend(&mut self, other: AcronymTable) {
        self.entries.extend(other.entries);
    }

    /// Add or replace a single entry
    pub fn insert(&mut self, term: impl Into<String>, expansion: impl Into<String>) {
        self.entries.insert(term.into(), expansion.into());
    }

    /// Look up the expansion of an acronym
    pub fn get(&self, term: &str) -> Option<&str> {
        self.entries
            .get(term)
            .map(String::as_str)
            .filter(|expansion| !expansion.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
