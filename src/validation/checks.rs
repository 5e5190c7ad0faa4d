//! Individual mapping-data checks.
//!
//! Each check takes `&MappingTables` and returns a `ValidationResult`.

use std::collections::{BTreeSet, HashSet};

use crate::mapping::{MappingTables, TargetSlot};

use super::diagnostic::{Diagnostic, ValidationResult};

/// How many missing target names to list in one diagnostic.
const MAX_LISTED: usize = 5;

/// Target slots fed by more than one mapping entry.
pub fn check_duplicate_targets(tables: &MappingTables) -> ValidationResult {
    let mut result = ValidationResult::new();

    tables.check_duplicates(|report| {
        result.push(
            Diagnostic::error(
                "themeconv::validate::duplicate-target",
                format!("Target mapped more than once ({})", report),
            )
            .with_help("Each category&key&aspect may appear in only one VS Token list"),
        );
    });

    result
}

/// Target categories missing from the category GUID table.
pub fn check_category_ids(tables: &MappingTables) -> ValidationResult {
    let mut result = ValidationResult::new();

    let missing: BTreeSet<&str> = tables
        .scopes()
        .iter()
        .flat_map(|mapping| mapping.targets.iter())
        .map(|slot| slot.category.as_str())
        .filter(|category| tables.category_id(category).is_none())
        .collect();

    for category in missing {
        result.push(
            Diagnostic::error(
                "themeconv::validate::unknown-category",
                format!("Category '{}' has no GUID", category),
            )
            .with_help("Add the category to CategoryGuid.json"),
        );
    }

    result
}

/// Fallback chains that loop.
pub fn check_fallback_cycles(tables: &MappingTables) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut reported: HashSet<BTreeSet<String>> = HashSet::new();

    let mut tokens: Vec<&str> = tables.fallbacks().map(|(token, _)| token).collect();
    tokens.sort_unstable();

    for token in tokens {
        let Some(cycle) = tables.find_fallback_cycle(token) else {
            continue;
        };
        let members: BTreeSet<String> = cycle.iter().cloned().collect();
        if reported.insert(members) {
            result.push(Diagnostic::error(
                "themeconv::validate::fallback-cycle",
                format!("Fallback chain loops: {}", cycle.join(" -> ")),
            ));
        }
    }

    result
}

/// Overlay rules for tokens that no mapping entry uses.
pub fn check_overlay_sources(tables: &MappingTables) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mut unmapped: Vec<&str> = tables
        .overlays()
        .map(|(token, _)| token)
        .filter(|token| tables.targets(token).is_none())
        .collect();
    unmapped.sort_unstable();

    for token in unmapped {
        result.push(Diagnostic::warning(
            "themeconv::validate::unused-overlay",
            format!("Overlay rule for '{}' has no mapping entry", token),
        ));
    }

    result
}

/// Known host targets that no mapping entry produces.
pub fn check_known_targets(tables: &MappingTables) -> ValidationResult {
    let mut result = ValidationResult::new();
    if tables.known_targets().is_empty() {
        return result;
    }

    let produced: HashSet<String> = tables
        .scopes()
        .iter()
        .flat_map(|mapping| mapping.targets.iter())
        .map(TargetSlot::target_key)
        .collect();

    let missing: Vec<&str> = tables
        .known_targets()
        .iter()
        .filter(|target| {
            let key = TargetSlot::parse(target)
                .map(|slot| slot.target_key())
                .unwrap_or_else(|_| target.to_string());
            !produced.contains(&key)
        })
        .map(|s| s.as_str())
        .collect();

    if !missing.is_empty() {
        let listed: Vec<&str> = missing.iter().take(MAX_LISTED).copied().collect();
        let more = missing.len().saturating_sub(MAX_LISTED);
        let suffix = if more > 0 {
            format!(" and {} more", more)
        } else {
            String::new()
        };
        result.push(Diagnostic::warning(
            "themeconv::validate::unmapped-target",
            format!(
                "{} known target(s) have no mapping: {}{}",
                missing.len(),
                listed.join(", "),
                suffix
            ),
        ));
    }

    result
}
