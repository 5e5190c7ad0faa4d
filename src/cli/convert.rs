//! Convert command implementation.
//!
//! Discovers source themes, loads and validates the mapping data, then
//! writes one output file per theme.

use std::path::PathBuf;

use clap::Args;
use uuid::Uuid;

use crate::convert::{ConvertOptions, Converter};
use crate::discovery::discover;
use crate::encode::OutputTarget;
use crate::error::{Result, ThemeError};
use crate::mapping::MappingTables;
use crate::output::{display_path, plural, Printer};
use crate::validation::{print_diagnostics, validate_mappings};

/// Convert VS Code theme JSON files into pkgdef or XML themes
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Theme file, or a directory of theme files
    pub input: PathBuf,

    /// Output directory (default: from themeconv.yaml, else next to the input)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Output format: pkgdef or xml
    #[arg(long)]
    pub format: Option<OutputTarget>,

    /// Directory holding the mapping JSON documents
    #[arg(long)]
    pub mappings: Option<PathBuf>,

    /// Id for the new theme (single input only)
    #[arg(long)]
    pub theme_id: Option<Uuid>,

    /// Manifest to use instead of the themeconv.yaml next to the input
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

/// Returns the paths written.
pub fn run(args: ConvertArgs, printer: &Printer) -> Result<Vec<PathBuf>> {
    let discovery = discover(&args.input, args.manifest.as_deref())?;

    if args.theme_id.is_some() && discovery.themes.len() > 1 {
        return Err(ThemeError::Io {
            path: args.input.clone(),
            message: "--theme-id applies to a single theme file".to_string(),
        });
    }

    let mappings = args.mappings.unwrap_or_else(|| discovery.mappings_dir());
    printer.status("Loading", &display_path(&mappings));
    let tables = MappingTables::load(&mappings)?;

    let validation = validate_mappings(&tables);
    if !validation.is_clean() {
        print_diagnostics(&validation, printer);
    }
    validation.into_result()?;

    if discovery.themes.is_empty() {
        printer.warning("Skipped", &format!("no theme files in {}", display_path(&args.input)));
        return Ok(Vec::new());
    }

    let out_dir = args.output.unwrap_or_else(|| discovery.output_dir());
    let options = ConvertOptions {
        theme_id: args.theme_id,
        format: args.format.unwrap_or(discovery.manifest.format),
    };

    let converter = Converter::new(&tables);
    let mut written = Vec::with_capacity(discovery.themes.len());
    for theme in &discovery.themes {
        printer.status("Converting", &display_path(theme));
        let output = converter.convert_file(theme, &out_dir, &options)?;
        printer.info("Wrote", &printer.cyan(&display_path(&output)));
        written.push(output);
    }

    printer.success(
        "Finished",
        &format!(
            "{} to {}",
            plural(written.len(), "theme", "themes"),
            display_path(&out_dir)
        ),
    );

    Ok(written)
}
