//! Mapping-data validation.
//!
//! Runs integrity checks over loaded mapping tables and reports errors and
//! warnings. Used by `themeconv validate` and before every `convert`.

mod checks;
mod diagnostic;

pub use diagnostic::{Diagnostic, Severity, ValidationResult};

use crate::mapping::MappingTables;
use crate::output::{plural, Printer};

/// Run all checks against the tables.
pub fn validate_mappings(tables: &MappingTables) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_duplicate_targets(tables));
    result.merge(checks::check_category_ids(tables));
    result.merge(checks::check_fallback_cycles(tables));
    result.merge(checks::check_overlay_sources(tables));
    result.merge(checks::check_known_targets(tables));

    result
}

/// Print diagnostics and a summary line to stderr.
pub fn print_diagnostics(result: &ValidationResult, printer: &Printer) {
    for d in result.iter() {
        let label = printer.severity(&d.severity.to_string(), d.is_error());
        eprintln!("{}[{}]: {}", label, d.code, d.message);
        if let Some(help) = &d.help {
            eprintln!("  {} {}", printer.dim("help:"), help);
        }
    }

    let errors = result.error_count();
    let warnings = plural(result.warning_count(), "warning", "warnings");

    if errors > 0 {
        printer.error(
            "Failed",
            &format!("{}, {}", plural(errors, "error", "errors"), warnings),
        );
    } else if result.warning_count() > 0 {
        printer.warning("Validated", &format!("mapping data ({})", warnings));
    } else {
        printer.success("Validated", "mapping data");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TargetSlot;
    use uuid::Uuid;

    #[test]
    fn test_validate_empty_tables() {
        let result = validate_mappings(&MappingTables::default());
        assert!(result.is_clean());
    }

    #[test]
    fn test_validate_consistent_tables() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope(
                "foreground",
                vec![TargetSlot::parse("Environment&ToolWindowText").unwrap()],
            )
            .unwrap();
        builder
            .add_category("Environment", Uuid::from_u128(1))
            .add_fallback("variable", "foreground");

        let result = validate_mappings(&builder.build());
        assert!(!result.has_errors());
    }

    #[test]
    fn test_validate_collects_every_check() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("a", vec![TargetSlot::parse("Nowhere&Key").unwrap()])
            .unwrap();
        builder
            .add_fallback("x", "y")
            .add_fallback("y", "x")
            .add_overlay("ghost", 0.5, "a");

        let result = validate_mappings(&builder.build());
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 1);
    }
}
