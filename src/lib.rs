//! themeconv - VS Code colour themes to Visual Studio themes
//!
//! Resolves a VS Code theme JSON document against a set of mapping tables
//! and writes the result as a registry-import pkgdef file or an XML theme
//! document.

pub mod cli;
pub mod codec;
pub mod convert;
pub mod discovery;
pub mod encode;
pub mod error;
pub mod mapping;
pub mod output;
pub mod parser;
pub mod registry;
pub mod resolve;
pub mod types;
pub mod validation;

pub use convert::{Conversion, ConvertOptions, Converter};
pub use discovery::{discover, DiscoveryResult, Manifest};
pub use encode::{render_pkgdef, render_xml, save_registry, OutputTarget};
pub use error::{Result, ThemeError};
pub use mapping::{MappingTables, TargetSlot};
pub use parser::{parse_xml_theme, read_xml_file, ThemeSource};
pub use registry::{ColorEntry, ColorName, ColorRegistry, Theme};
pub use resolve::{ResolvedTheme, Resolver};
pub use types::{ColorType, ColorValue, Colour};
pub use validation::{validate_mappings, Diagnostic, Severity, ValidationResult};
