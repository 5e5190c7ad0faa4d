//! Mapping tables that drive theme resolution.
//!
//! Four read-only tables, loaded once and shared by reference:
//! - scope token -> ordered target slots
//! - category name -> category GUID
//! - token -> fallback token
//! - token -> overlay blend rule
//!
//! Tables are built explicitly (from files, JSON strings, or the builder)
//! and never live in process-wide statics.

mod loader;
mod slot;

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::error::{Result, ThemeError};

pub use loader::{
    MappingSources, CATEGORY_GUIDS_FILE, KNOWN_TARGETS_FILE, OVERLAY_MAPPING_FILE,
    TOKEN_FALLBACK_FILE, TOKEN_MAPPINGS_FILE,
};
pub use slot::{Aspect, TargetSlot};

/// A source token and the target slots it feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeMapping {
    pub token: String,
    pub targets: Vec<TargetSlot>,
}

/// Composite rule for a token drawn translucently over another colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub opacity: f32,
    pub base_token: String,
}

/// Immutable lookup tables used by the resolver.
#[derive(Debug, Clone, Default)]
pub struct MappingTables {
    scopes: Vec<ScopeMapping>,
    scope_index: HashMap<String, usize>,
    category_ids: HashMap<String, Uuid>,
    token_fallback: HashMap<String, String>,
    overlays: HashMap<String, Overlay>,
    known_targets: Vec<String>,
}

impl MappingTables {
    pub fn builder() -> MappingTablesBuilder {
        MappingTablesBuilder::default()
    }

    /// Scope mappings in declaration order.
    pub fn scopes(&self) -> &[ScopeMapping] {
        &self.scopes
    }

    pub fn targets(&self, token: &str) -> Option<&[TargetSlot]> {
        self.scope_index
            .get(token)
            .map(|&i| self.scopes[i].targets.as_slice())
    }

    pub fn category_id(&self, name: &str) -> Option<Uuid> {
        self.category_ids.get(name).copied()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.category_ids.keys().map(|s| s.as_str())
    }

    pub fn fallback(&self, token: &str) -> Option<&str> {
        self.token_fallback.get(token).map(|s| s.as_str())
    }

    /// All `(token, fallback)` pairs.
    pub fn fallbacks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.token_fallback
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn overlay(&self, token: &str) -> Option<&Overlay> {
        self.overlays.get(token)
    }

    pub fn overlays(&self) -> impl Iterator<Item = (&str, &Overlay)> {
        self.overlays.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every target token the host knows about, when that list was supplied.
    pub fn known_targets(&self) -> &[String] {
        &self.known_targets
    }

    /// Report every target slot mapped by more than one entry.
    ///
    /// `report` receives `"<source token>: <target>"` for each repeat after
    /// the first. Returns the number of duplicates found.
    pub fn check_duplicates(&self, mut report: impl FnMut(&str)) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        let mut count = 0;

        for mapping in &self.scopes {
            for slot in &mapping.targets {
                if !seen.insert(slot.target_key()) {
                    report(&format!("{}: {}", mapping.token, slot));
                    count += 1;
                }
            }
        }

        count
    }

    /// Follow the fallback chain from `token`; return the cycle if one is hit.
    pub fn find_fallback_cycle(&self, token: &str) -> Option<Vec<String>> {
        let mut path = vec![token.to_string()];
        let mut current = token;

        while let Some(next) = self.fallback(current) {
            if let Some(start) = path.iter().position(|t| t == next) {
                let mut cycle = path.split_off(start);
                cycle.push(next.to_string());
                return Some(cycle);
            }
            path.push(next.to_string());
            current = next;
        }

        None
    }
}

/// Builder for constructing `MappingTables` in code.
#[derive(Debug, Default)]
pub struct MappingTablesBuilder {
    tables: MappingTables,
}

impl MappingTablesBuilder {
    /// Add a source token with its targets. Tokens must be unique.
    pub fn add_scope(&mut self, token: impl Into<String>, targets: Vec<TargetSlot>) -> Result<&mut Self> {
        let token = token.into();
        if self.tables.scope_index.contains_key(&token) {
            return Err(ThemeError::Mapping {
                message: format!("Source token '{}' is mapped twice", token),
                help: Some("Merge the target lists into a single entry".to_string()),
            });
        }

        self.tables
            .scope_index
            .insert(token.clone(), self.tables.scopes.len());
        self.tables.scopes.push(ScopeMapping { token, targets });
        Ok(self)
    }

    pub fn add_category(&mut self, name: impl Into<String>, id: Uuid) -> &mut Self {
        self.tables.category_ids.insert(name.into(), id);
        self
    }

    pub fn add_fallback(&mut self, token: impl Into<String>, fallback: impl Into<String>) -> &mut Self {
        self.tables
            .token_fallback
            .insert(token.into(), fallback.into());
        self
    }

    pub fn add_overlay(&mut self, token: impl Into<String>, opacity: f32, base_token: impl Into<String>) -> &mut Self {
        self.tables.overlays.insert(
            token.into(),
            Overlay {
                opacity,
                base_token: base_token.into(),
            },
        );
        self
    }

    pub fn add_known_targets(&mut self, targets: impl IntoIterator<Item = String>) -> &mut Self {
        self.tables.known_targets.extend(targets);
        self
    }

    pub fn build(self) -> MappingTables {
        self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> TargetSlot {
        TargetSlot::parse(s).unwrap()
    }

    #[test]
    fn test_builder_lookups() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("comment", vec![slot("Text Editor&Comment")])
            .unwrap();
        builder
            .add_category("Text Editor", Uuid::from_u128(1))
            .add_fallback("comment.line", "comment")
            .add_overlay("editor.selection", 0.5, "editor.background");
        let tables = builder.build();

        assert_eq!(tables.targets("comment").unwrap().len(), 1);
        assert!(tables.targets("keyword").is_none());
        assert_eq!(tables.category_id("Text Editor"), Some(Uuid::from_u128(1)));
        assert_eq!(tables.fallback("comment.line"), Some("comment"));
        assert_eq!(tables.overlay("editor.selection").unwrap().opacity, 0.5);
    }

    #[test]
    fn test_builder_rejects_repeated_token() {
        let mut builder = MappingTables::builder();
        builder.add_scope("comment", vec![]).unwrap();
        assert!(builder.add_scope("comment", vec![]).is_err());
    }

    #[test]
    fn test_check_duplicates_reports_each_repeat() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("comment", vec![slot("Text Editor&Comment")])
            .unwrap();
        builder
            .add_scope(
                "comment.block",
                vec![
                    slot("Text Editor&Comment&Foreground"),
                    slot("Text Editor&Comment&Background"),
                ],
            )
            .unwrap();
        let tables = builder.build();

        let mut reports = Vec::new();
        let count = tables.check_duplicates(|r| reports.push(r.to_string()));

        assert_eq!(count, 1);
        assert_eq!(reports, vec!["comment.block: Text Editor&Comment&Foreground"]);
    }

    #[test]
    fn test_find_fallback_cycle() {
        let mut builder = MappingTables::builder();
        builder
            .add_fallback("a", "b")
            .add_fallback("b", "c")
            .add_fallback("c", "b")
            .add_fallback("x", "y");
        let tables = builder.build();

        assert_eq!(
            tables.find_fallback_cycle("a"),
            Some(vec!["b".to_string(), "c".to_string(), "b".to_string()])
        );
        assert_eq!(tables.find_fallback_cycle("x"), None);
    }
}
