pub mod compile;
pub mod completions;
pub mod convert;
pub mod validate;

use clap::{Parser, Subcommand};

/// themeconv - VS Code colour themes to Visual Studio themes
#[derive(Parser, Debug)]
#[command(name = "themeconv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert VS Code theme JSON files into pkgdef or XML themes
    Convert(convert::ConvertArgs),

    /// Re-encode an XML theme document as pkgdef or XML
    Compile(compile::CompileArgs),

    /// Check the mapping data for integrity problems
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
