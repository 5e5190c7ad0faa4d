//! Validate command implementation.
//!
//! Loads the mapping data and runs the integrity checks over it.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::mapping::MappingTables;
use crate::output::{display_path, Printer};
use crate::validation::{print_diagnostics, validate_mappings, ValidationResult};

/// Check the mapping data for integrity problems
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory holding the mapping JSON documents
    #[arg(long, default_value = "data")]
    pub mappings: PathBuf,
}

/// Returns the diagnostics when there are no errors.
pub fn run(args: ValidateArgs, printer: &Printer) -> Result<ValidationResult> {
    printer.status("Loading", &display_path(&args.mappings));
    let tables = MappingTables::load(&args.mappings)?;

    let result = validate_mappings(&tables);
    print_diagnostics(&result, printer);

    result.clone().into_result()?;
    Ok(result)
}
