//! Option registry for the markup engine.
//!
//! Every optional construct of the wiki syntax is gated by a field of
//! [`WikiOptions`]. The struct is the typed view; [`WikiOptions::set_option`]
//! and [`WikiOptions::get_option`] expose the string-keyed view used by
//! embedding applications and configuration files.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default pattern for wiki words (camel-case runs of at least two capitalized parts).
pub const DEFAULT_WORDS_PATTERN: &str = r"(?:[A-Z][a-z]+){2,}";

/// Default pattern for bare URLs turned into links when `active_auto_urls` is set.
pub const DEFAULT_AUTO_URL_PATTERN: &str = r#"(?:http://|https://|ftp://|news:)[^"\s)!]+"#;

/// Options whose values are regular expressions and must compile.
const PATTERN_OPTIONS: [&str; 2] = ["words_pattern", "auto_url_pattern"];

/// A single option value in the string-keyed view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl OptionValue {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    fn into_json(self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b),
            Self::Int(n) => Value::from(n),
            Self::Text(s) => Value::String(s),
        }
    }

    /// Truthiness as the registry understands it (`0`, `false` and `""` are off).
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Command-line style parsing: `true`/`false`, then integers, then text.
impl FromStr for OptionValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => s.parse().map_or_else(|_| Self::Text(s.to_string()), Self::Int),
        })
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Feature flags and parameters of the markup engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WikiOptions {
    // Block constructs
    pub active_title: bool,
    pub active_setext_title: bool,
    pub active_hr: bool,
    pub active_lists: bool,
    pub active_defl: bool,
    pub active_quote: bool,
    pub active_pre: bool,
    pub active_empty: bool,
    pub active_aside: bool,
    pub active_details: bool,

    // Whole-document behaviour
    pub active_auto_urls: bool,
    pub active_auto_br: bool,
    pub active_antispam: bool,
    pub active_wikiwords: bool,
    pub active_macros: bool,
    pub active_fr_syntax: bool,
    pub parse_pre: bool,

    // Inline constructs
    pub active_urls: bool,
    pub active_auto_img: bool,
    pub active_img: bool,
    pub active_anchor: bool,
    pub active_em: bool,
    pub active_strong: bool,
    pub active_br: bool,
    pub active_q: bool,
    pub active_code: bool,
    pub active_acronym: bool,
    pub active_ins: bool,
    pub active_del: bool,
    pub active_inline_html: bool,
    pub active_footnotes: bool,
    pub active_mark: bool,
    pub active_sup: bool,
    pub active_sub: bool,
    pub active_i: bool,
    pub active_span: bool,

    // Parameters
    pub first_title_level: u8,
    pub note_prefix: String,
    pub note_str: String,
    pub note_str_single: String,
    pub words_pattern: String,
    pub auto_url_pattern: String,
    pub acronyms_file: String,
    pub img_style_left: String,
    pub img_style_center: String,
    pub img_style_right: String,
}

impl Default for WikiOptions {
    fn default() -> Self {
        Self {
            active_title: true,
            active_setext_title: false,
            active_hr: true,
            active_lists: true,
            active_defl: true,
            active_quote: true,
            active_pre: true,
            active_empty: true,
            active_aside: true,
            active_details: true,
            active_auto_urls: false,
            active_auto_br: false,
            active_antispam: true,
            active_wikiwords: false,
            active_macros: true,
            active_fr_syntax: true,
            parse_pre: true,
            active_urls: true,
            active_auto_img: true,
            active_img: true,
            active_anchor: true,
            active_em: true,
            active_strong: true,
            active_br: true,
            active_q: true,
            active_code: true,
            active_acronym: true,
            active_ins: true,
            active_del: true,
            active_inline_html: true,
            active_footnotes: true,
            active_mark: true,
            active_sup: true,
            active_sub: true,
            active_i: true,
            active_span: true,
            first_title_level: 3,
            note_prefix: "wiki-footnote".to_string(),
            note_str: r#"<div class="footnotes"><h4>Notes</h4>%s</div>"#.to_string(),
            note_str_single: r#"<div class="footnotes"><h4>Note</h4>%s</div>"#.to_string(),
            words_pattern: DEFAULT_WORDS_PATTERN.to_string(),
            auto_url_pattern: DEFAULT_AUTO_URL_PATTERN.to_string(),
            acronyms_file: String::new(),
            img_style_left: "float:left; margin: 0 1em 1em 0;".to_string(),
            img_style_center: "display:block; margin:0 auto;".to_string(),
            img_style_right: "float:right; margin: 0 0 1em 1em;".to_string(),
        }
    }
}

impl WikiOptions {
    /// Create the default option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading level produced by a title marker run of the given length.
    ///
    /// Three markers give `first_title_level` (clamped to `1..=4`), and each
    /// marker more or less moves one level up or down. With the default of 3,
    /// `!!!!` is h2 and `!` is h5. The result is clamped to `1..=6`.
    pub fn heading_level(&self, markers: usize) -> u8 {
        let base = self.first_title_level.clamp(1, 4) as usize + 3;
        base.saturating_sub(markers).clamp(1, 6) as u8
    }

    /// Names of every recognized option, in declaration order.
    pub fn names() -> Vec<String> {
        Self::default().to_map().into_iter().map(|(k, _)| k).collect()
    }

    /// Read an option through the string-keyed view.
    pub fn get_option(&self, name: &str) -> Option<OptionValue> {
        self.to_map().get(name).and_then(OptionValue::from_json)
    }

    /// Set a single option.
    ///
    /// Boolean options also accept the integers `0`/`1`. Pattern options
    /// must compile as regular expressions.
    pub fn set_option(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        let mut map = self.to_map();
        let current = map.get(name).ok_or_else(|| Error::unknown_option(name))?;

        let value = match (current, value.into()) {
            (Value::Bool(_), OptionValue::Int(n)) => OptionValue::Bool(n != 0),
            (Value::String(_), OptionValue::Int(n)) => OptionValue::Text(n.to_string()),
            (Value::String(_), OptionValue::Bool(b)) => OptionValue::Text(b.to_string()),
            (_, v) => v,
        };

        if PATTERN_OPTIONS.contains(&name)
            && let OptionValue::Text(pattern) = &value
        {
            Regex::new(pattern).map_err(|e| Error::invalid_option(name, e.to_string()))?;
        }

        map.insert(name.to_string(), value.into_json());
        *self = serde_json::from_value(Value::Object(map))
            .map_err(|e| Error::invalid_option(name, e.to_string()))?;
        Ok(())
    }

    /// Set several options at once. Either all values are applied or none.
    pub fn set_options<I, K, V>(&mut self, options: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OptionValue>,
    {
        let mut staged = self.clone();
        for (name, value) in options {
            staged.set_option(name.as_ref(), value)?;
        }
        *self = staged;
        Ok(())
    }

    /// Parse a complete option set from YAML. Missing fields take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config_error(format!("Invalid YAML options: {}", e)))
    }

    /// Parse a complete option set from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::config_error(format!("Invalid JSON options: {}", e)))
    }

    /// Defaults overlaid with the options of a YAML or JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut options = Self::default();
        options.apply_file(path)?;
        Ok(options)
    }

    /// Apply the options listed in a YAML or JSON file on top of `self`.
    ///
    /// Only the keys present in the file change; this is how a file layers
    /// over a [`crate::ParserProfile`].
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        let text = std::fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");

        let doc: Value = if is_json {
            serde_json::from_str(&text)
                .map_err(|e| Error::config_error(format!("{}: {}", path.display(), e)))?
        } else {
            serde_yaml::from_str(&text)
                .map_err(|e| Error::config_error(format!("{}: {}", path.display(), e)))?
        };

        let entries = match doc {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(Error::config_error(format!(
                    "{}: expected a mapping of option names to values",
                    path.display()
                )));
            }
        };

        let mut staged = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            let value = OptionValue::from_json(&value)
                .ok_or_else(|| Error::invalid_option(&name, "expected a scalar value"))?;
            staged.push((name, value));
        }
        log::debug!("Applying {} options from {}", staged.len(), path.display());
        self.set_options(staged)
    }

    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let opts = WikiOptions::default();
        assert!(opts.active_title);
        assert!(!opts.active_auto_urls);
        assert!(!opts.active_wikiwords);
        assert_eq!(opts.first_title_level, 3);
        assert_eq!(opts.note_prefix, "wiki-footnote");
    }

    #[test]
    fn test_heading_level() {
        let mut opts = WikiOptions::default();
        assert_eq!(opts.heading_level(3), 3);
        assert_eq!(opts.heading_level(1), 5);
        assert_eq!(opts.heading_level(4), 2);

        assert_eq!(opts.heading_level(2), 4);

        opts.first_title_level = 9;
        assert_eq!(opts.heading_level(3), 4);
        assert_eq!(opts.heading_level(4), 3);
        assert_eq!(opts.heading_level(1), 6);

        opts.first_title_level = 1;
        assert_eq!(opts.heading_level(3), 1);
        assert_eq!(opts.heading_level(4), 1);
        assert_eq!(opts.heading_level(1), 3);
    }

    #[test]
    fn test_get_and_set_option() {
        let mut opts = WikiOptions::default();
        assert_eq!(opts.get_option("active_em"), Some(OptionValue::Bool(true)));

        opts.set_option("active_em", false).unwrap();
        assert!(!opts.active_em);

        opts.set_option("active_em", 1).unwrap();
        assert!(opts.active_em);

        opts.set_option("first_title_level", 2).unwrap();
        assert_eq!(opts.first_title_level, 2);
        assert_eq!(opts.get_option("first_title_level"), Some(OptionValue::Int(2)));

        opts.set_option("note_prefix", "fn").unwrap();
        assert_eq!(opts.note_prefix, "fn");
    }

    #[test]
    fn test_unknown_option_rejected() {
        let mut opts = WikiOptions::default();
        let err = opts.set_option("active_blink", true).unwrap_err();
        assert!(matches!(err, Error::UnknownOption { .. }));
        assert_eq!(opts.get_option("active_blink"), None);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut opts = WikiOptions::default();
        assert!(opts.set_option("first_title_level", "three").is_err());
        assert!(opts.set_option("active_em", "yes").is_err());
        assert_eq!(opts, WikiOptions::default());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut opts = WikiOptions::default();
        let err = opts.set_option("words_pattern", "([A-Z").unwrap_err();
        assert!(matches!(err, Error::InvalidOption { .. }));
        assert_eq!(opts.words_pattern, DEFAULT_WORDS_PATTERN);
    }

    #[test]
    fn test_set_options_is_atomic() {
        let mut opts = WikiOptions::default();
        let result = opts.set_options([
            ("active_em", OptionValue::Bool(false)),
            ("no_such_option", OptionValue::Bool(false)),
        ]);
        assert!(result.is_err());
        assert!(opts.active_em);

        opts.set_options([("active_em", false), ("active_strong", false)])
            .unwrap();
        assert!(!opts.active_em);
        assert!(!opts.active_strong);
    }

    #[test]
    fn test_names_cover_registry() {
        let names = WikiOptions::names();
        assert!(names.contains(&"active_details".to_string()));
        assert!(names.contains(&"img_style_center".to_string()));
        assert!(names.contains(&"parse_pre".to_string()));
    }

    #[test]
    fn test_from_yaml_str() {
        let opts = WikiOptions::from_yaml_str("active_em: false\nfirst_title_level: 2\n").unwrap();
        assert!(!opts.active_em);
        assert_eq!(opts.first_title_level, 2);
        assert!(opts.active_strong);

        assert!(WikiOptions::from_yaml_str("active_blink: true").is_err());
    }

    #[test]
    fn test_from_json_str() {
        let opts = WikiOptions::from_json_str(r#"{"active_auto_br": true}"#).unwrap();
        assert!(opts.active_auto_br);
    }

    #[test]
    fn test_apply_file_layers_over_existing() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "active_hr: 0\nnote_prefix: note").unwrap();

        let mut opts = WikiOptions {
            active_em: false,
            ..WikiOptions::default()
        };
        opts.apply_file(file.path()).unwrap();

        assert!(!opts.active_hr);
        assert!(!opts.active_em);
        assert_eq!(opts.note_prefix, "note");
    }

    #[test]
    fn test_apply_missing_file() {
        let mut opts = WikiOptions::default();
        let err = opts
            .apply_file(Path::new("/definitely/not/here.yaml"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_from_file_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"active_wikiwords": true, "first_title_level": 1}}"#).unwrap();

        let opts = WikiOptions::from_file(file.path()).unwrap();
        assert!(opts.active_wikiwords);
        assert_eq!(opts.first_title_level, 1);
        assert!(opts.active_em);
    }

    #[test]
    fn test_option_value_from_str() {
        assert_eq!("true".parse::<OptionValue>().unwrap(), OptionValue::Bool(true));
        assert_eq!("0".parse::<OptionValue>().unwrap(), OptionValue::Int(0));
        assert_eq!("note".parse::<OptionValue>().unwrap(), OptionValue::Text("note".into()));

        // text options take numeric-looking values verbatim
        let mut opts = WikiOptions::default();
        opts.set_option("note_prefix", "42".parse::<OptionValue>().unwrap())
            .unwrap();
        assert_eq!(opts.note_prefix, "42");
    }
}
