//! Readers for the two input formats.
//!
//! - [`source`]: editor theme JSON (`type`, `colors`, `tokenColors`)
//! - [`xml`]: `<Themes>` documents, read straight into a `ColorRegistry`
//!
//! # Usage
//!
//! ```ignore
//! use themeconv::parser::ThemeSource;
//!
//! let text = std::fs::read_to_string("themes/Monokai.json")?;
//! let theme = ThemeSource::parse(&text)?;
//! println!("dark: {}", theme.is_dark());
//! ```

pub mod source;
pub mod xml;

pub use source::{uncomment, RuleSettings, ThemeSource, TokenRule};
pub use xml::{parse_xml_theme, read_xml_file};
