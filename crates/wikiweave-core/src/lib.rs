//! # Wikiweave Core
//!
//! Configuration, shared data and error types for the wiki markup engine.
//! The parser crate depends on these; embedding applications usually reach
//! them through `wikiweave_parser` re-exports.
//!
//! ## Core Modules
//!
//! - [`config`] - The option registry ([`WikiOptions`], [`OptionValue`])
//! - [`profiles`] - Pre-configured option sets ([`ParserProfile`])
//! - [`acronyms`] - The acronym expansion table ([`AcronymTable`])
//! - [`error`] - Error types and the `Result` alias
//!
//! ## Usage Examples
//!
//! ### Options
//!
//! ```
//! use wikiweave_core::prelude::*;
//!
//! let mut options = ParserProfile::Post.create_options();
//! options.set_option("active_auto_br", true).unwrap();
//! assert_eq!(options.get_option("active_auto_br"), Some(OptionValue::Bool(true)));
//! assert!(options.set_option("active_blink", true).is_err());
//! ```
//!
//! ### Acronyms
//!
//! ```
//! use wikiweave_core::AcronymTable;
//!
//! let table = AcronymTable::parse("HTML : HyperText Markup Language");
//! assert_eq!(table.get("HTML"), Some("HyperText Markup Language"));
//! ```

pub mod acronyms;
pub mod config;
pub mod error;
pub mod profiles;

pub use acronyms::AcronymTable;
pub use config::{DEFAULT_AUTO_URL_PATTERN, DEFAULT_WORDS_PATTERN, OptionValue, WikiOptions};
pub use error::{Error, Result};
pub use profiles::ParserProfile;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::acronyms::AcronymTable;
    pub use crate::config::{OptionValue, WikiOptions};
    pub use crate::error::{Error, Result};
    pub use crate::profiles::ParserProfile;
}
