//! Diagnostics produced by mapping-data checks.

use std::fmt;

use crate::error::{Result, ThemeError};

/// How serious a diagnostic is. Errors stop a conversion; warnings do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single finding about the mapping data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code, e.g. `themeconv::validate::duplicate-target`.
    pub code: String,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    /// Attach a suggestion, printed as a `help:` line.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Whether this diagnostic has error severity.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

/// Diagnostics gathered across all checks.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append every diagnostic from another result.
    pub fn merge(&mut self, other: ValidationResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Diagnostics in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    /// Whether any error was reported.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// No diagnostics at all.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Turn any errors into a single `Mapping` error.
    pub fn into_result(self) -> Result<Vec<Diagnostic>> {
        let errors = self.error_count();
        if errors == 0 {
            return Ok(self.diagnostics);
        }

        let first = self
            .diagnostics
            .iter()
            .find(|d| d.is_error())
            .map(|d| d.message.clone())
            .unwrap_or_default();
        Err(ThemeError::Mapping {
            message: format!("Mapping data has {} error(s); first: {}", errors, first),
            help: Some("Run `themeconv validate` for the full list".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut result = ValidationResult::new();
        assert!(result.is_clean());

        result.push(Diagnostic::error("themeconv::test", "broken"));
        result.push(Diagnostic::warning("themeconv::test", "odd"));

        assert!(result.has_errors());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::warning("themeconv::validate::x", "look here").with_help("fix it");
        assert_eq!(d.to_string(), "warning[themeconv::validate::x]: look here");
        assert_eq!(d.help.as_deref(), Some("fix it"));
    }

    #[test]
    fn test_into_result() {
        let mut warnings = ValidationResult::new();
        warnings.push(Diagnostic::warning("w", "only a warning"));
        assert_eq!(warnings.into_result().unwrap().len(), 1);

        let mut errors = ValidationResult::new();
        errors.push(Diagnostic::error("e", "duplicate"));
        let err = errors.into_result().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
