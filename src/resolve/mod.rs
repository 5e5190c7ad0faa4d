//! Theme resolution.
//!
//! Decides, for every mapped target slot, which source colour applies.
//! Three passes run in order:
//!
//! 1. **Editor colours.** Token rules whose selectors prefix a mapping key
//!    assign that key's slots. A later rule replaces an earlier assignment
//!    only when its selector extends the earlier one and it sets a foreground.
//! 2. **Fallbacks.** Keys untouched by pass 1 retry with their fallback token,
//!    and keys that fall back to `foreground` take the shell foreground.
//! 3. **Shell colours.** Named colours feed their mapped slots, following the
//!    fallback chain for missing values and compositing overlay colours.

mod resolved;

use std::collections::{BTreeMap, HashSet};

use crate::error::{Result, ThemeError};
use crate::mapping::{MappingTables, TargetSlot};
use crate::parser::{ThemeSource, TokenRule};
use crate::types::compound;

pub use resolved::{ResolvedTheme, SlotColors};

/// The shell colour used for keys whose fallback is `foreground`.
const FOREGROUND_TOKEN: &str = "foreground";

/// Working value for one key during resolution.
#[derive(Debug, Clone, Default)]
struct Assigned {
    colors: SlotColors,
    /// Selector of the rule that set the colours; `None` for shell colours.
    selector: Option<String>,
}

/// Resolution engine over a set of mapping tables.
///
/// The tables are borrowed read-only, so one set can serve any number of
/// conversions.
pub struct Resolver<'a> {
    tables: &'a MappingTables,
}

impl<'a> Resolver<'a> {
    pub fn new(tables: &'a MappingTables) -> Self {
        Self { tables }
    }

    /// Resolve every mapped slot for a source theme.
    pub fn resolve(&self, source: &ThemeSource) -> Result<ResolvedTheme> {
        let mut assigned: BTreeMap<String, BTreeMap<String, Assigned>> = BTreeMap::new();
        let mut used: HashSet<&str> = HashSet::new();

        // Pass 1: editor colours
        for rule in source.rules() {
            for selector in rule.selectors() {
                for mapping in self.tables.scopes() {
                    if mapping.token.starts_with(selector) {
                        used.insert(mapping.token.as_str());
                        assign_editor(&mut assigned, &mapping.targets, selector, rule);
                    }
                }
            }
        }

        // Pass 2: fallbacks for keys no rule reached
        for mapping in self.tables.scopes() {
            if used.contains(mapping.token.as_str()) {
                continue;
            }
            let Some(fallback) = self.tables.fallback(&mapping.token) else {
                continue;
            };

            if fallback == FOREGROUND_TOKEN {
                if let Some(value) = source.color(FOREGROUND_TOKEN) {
                    self.assign_shell(&mut assigned, source, &mapping.targets, value)?;
                }
            }

            for rule in source.rules() {
                for selector in rule.selectors() {
                    if fallback.starts_with(selector) {
                        assign_editor(&mut assigned, &mapping.targets, selector, rule);
                    }
                }
            }
        }

        // Pass 3: shell colours
        for (name, _) in source.colors() {
            let Some(targets) = self.tables.targets(name.trim()) else {
                continue;
            };
            let Some(mut value) = self.resolve_value(source, name)? else {
                continue;
            };

            if let Some(overlay) = self.tables.overlay(name) {
                if let Some(base) = self.resolve_value(source, &overlay.base_token)? {
                    value = compound(&value, &base, overlay.opacity, 1.0)?;
                }
            }

            self.assign_shell(&mut assigned, source, targets, &value)?;
        }

        let mut resolved = ResolvedTheme::new();
        for (category, keys) in assigned {
            for (key, slot) in keys {
                resolved.insert(category.clone(), key, slot.colors);
            }
        }
        Ok(resolved)
    }

    /// Look up a named colour, walking the fallback chain until a value is
    /// found or the chain ends.
    ///
    /// Returns `Ok(None)` when the chain ends without a value and a
    /// `Mapping` error if the chain revisits a token.
    pub fn resolve_value(&self, source: &ThemeSource, token: &str) -> Result<Option<String>> {
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(token);
        let mut current = token;

        loop {
            if let Some(value) = source.color(current) {
                return Ok(Some(value.to_string()));
            }

            let Some(next) = self.tables.fallback(current) else {
                return Ok(None);
            };
            if !seen.insert(next) {
                return Err(ThemeError::Mapping {
                    message: format!("Fallback chain for '{}' loops at '{}'", token, next),
                    help: Some("Remove one of the entries in VSCTokenFallback.json".to_string()),
                });
            }
            current = next;
        }
    }

    /// Assign a shell colour to each slot, compositing per-slot overlays.
    fn assign_shell(
        &self,
        assigned: &mut BTreeMap<String, BTreeMap<String, Assigned>>,
        source: &ThemeSource,
        targets: &[TargetSlot],
        value: &str,
    ) -> Result<()> {
        for slot in targets {
            let mut color = value.to_string();
            if let (Some(opacity), Some(background)) =
                (slot.foreground_opacity, slot.overlay_background.as_deref())
            {
                if let Some(base) = self.resolve_value(source, background)? {
                    color = compound(&color, &base, 1.0, opacity)?;
                }
            }

            let entry = assigned
                .entry(slot.category.clone())
                .or_default()
                .entry(slot.key_name.clone())
                .or_default();
            if slot.is_background() {
                entry.colors.background = Some(color);
            } else {
                entry.colors.foreground = Some(color);
            }
        }
        Ok(())
    }
}

/// Assign a rule's settings to each slot's key.
///
/// An existing assignment is replaced only when `selector` extends the
/// selector that made it and the rule sets a foreground. Shell assignments
/// count as the least specific.
fn assign_editor(
    assigned: &mut BTreeMap<String, BTreeMap<String, Assigned>>,
    targets: &[TargetSlot],
    selector: &str,
    rule: &TokenRule,
) {
    for slot in targets {
        let keys = assigned.entry(slot.category.clone()).or_default();
        match keys.get_mut(&slot.key_name) {
            Some(existing) => {
                let previous = existing.selector.as_deref().unwrap_or("");
                if selector.starts_with(previous) && rule.settings.foreground.is_some() {
                    existing.colors = SlotColors::new(
                        rule.settings.foreground.clone(),
                        rule.settings.background.clone(),
                    );
                    existing.selector = Some(selector.to_string());
                }
            }
            None => {
                keys.insert(
                    slot.key_name.clone(),
                    Assigned {
                        colors: SlotColors::new(
                            rule.settings.foreground.clone(),
                            rule.settings.background.clone(),
                        ),
                        selector: Some(selector.to_string()),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RuleSettings;
    use pretty_assertions::assert_eq;

    fn slot(s: &str) -> TargetSlot {
        TargetSlot::parse(s).unwrap()
    }

    fn fg(value: &str) -> RuleSettings {
        RuleSettings {
            foreground: Some(value.to_string()),
            background: None,
        }
    }

    fn rule(scope: &str, settings: RuleSettings) -> TokenRule {
        TokenRule::new(vec![scope.to_string()], settings)
    }

    fn colors(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    fn foreground_tables() -> MappingTables {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("foreground", vec![slot("Environment&ToolWindowText&Foreground")])
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_shell_foreground_scenario() {
        let tables = foreground_tables();
        let source = ThemeSource::new(None, colors(&[("foreground", Some("#FF0000"))]), vec![]);

        let resolved = Resolver::new(&tables).resolve(&source).unwrap();

        assert_eq!(resolved.slot_count(), 1);
        let slot = resolved.get("Environment", "ToolWindowText").unwrap();
        assert_eq!(slot.foreground.as_deref(), Some("#FF0000"));
        assert_eq!(crate::types::revise("#FF0000"), "FFFF0000");
    }

    #[test]
    fn test_empty_theme_resolves_nothing() {
        let tables = foreground_tables();
        let source = ThemeSource::default();
        let resolved = Resolver::new(&tables).resolve(&source).unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_more_specific_selector_wins_in_any_order() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("comment.line.double-slash", vec![slot("Text Editor&Comment")])
            .unwrap();
        let tables = builder.build();
        let resolver = Resolver::new(&tables);

        let general = rule("comment", fg("#111111"));
        let specific = rule("comment.line", fg("#222222"));

        for rules in [
            vec![general.clone(), specific.clone()],
            vec![specific.clone(), general.clone()],
        ] {
            let source = ThemeSource::new(None, vec![], rules);
            let resolved = resolver.resolve(&source).unwrap();
            let slot = resolved.get("Text Editor", "Comment").unwrap();
            assert_eq!(slot.foreground.as_deref(), Some("#222222"));
        }
    }

    #[test]
    fn test_rule_without_foreground_does_not_replace() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("string.quoted", vec![slot("Text Editor&String")])
            .unwrap();
        let tables = builder.build();

        let rules = vec![
            rule("string", fg("#CE9178")),
            rule(
                "string.quoted",
                RuleSettings {
                    foreground: None,
                    background: Some("#000000".to_string()),
                },
            ),
        ];
        let source = ThemeSource::new(None, vec![], rules);
        let resolved = Resolver::new(&tables).resolve(&source).unwrap();

        let slot = resolved.get("Text Editor", "String").unwrap();
        assert_eq!(slot.foreground.as_deref(), Some("#CE9178"));
        assert_eq!(slot.background, None);
    }

    #[test]
    fn test_comma_separated_selectors_are_trimmed() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("keyword.control", vec![slot("Text Editor&Keyword")])
            .unwrap();
        let tables = builder.build();

        let source = ThemeSource::new(
            None,
            vec![],
            vec![rule("storage.type,  keyword", fg("#569CD6"))],
        );
        let resolved = Resolver::new(&tables).resolve(&source).unwrap();
        assert_eq!(
            resolved.get("Text Editor", "Keyword").unwrap().foreground.as_deref(),
            Some("#569CD6")
        );
    }

    #[test]
    fn test_unused_key_retries_with_fallback_token() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("entity.name.function", vec![slot("Text Editor&Function")])
            .unwrap();
        builder.add_fallback("entity.name.function", "support.function");
        let tables = builder.build();

        let source = ThemeSource::new(None, vec![], vec![rule("support", fg("#DCDCAA"))]);
        let resolved = Resolver::new(&tables).resolve(&source).unwrap();
        assert_eq!(
            resolved.get("Text Editor", "Function").unwrap().foreground.as_deref(),
            Some("#DCDCAA")
        );
    }

    #[test]
    fn test_foreground_fallback_uses_shell_colour() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("variable", vec![slot("Text Editor&Identifier")])
            .unwrap();
        builder.add_fallback("variable", "foreground");
        let tables = builder.build();

        let source = ThemeSource::new(None, colors(&[("foreground", Some("#D4D4D4"))]), vec![]);
        let resolved = Resolver::new(&tables).resolve(&source).unwrap();
        assert_eq!(
            resolved.get("Text Editor", "Identifier").unwrap().foreground.as_deref(),
            Some("#D4D4D4")
        );
    }

    #[test]
    fn test_fallback_rule_replaces_shell_assignment_only_with_foreground() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("variable", vec![slot("Text Editor&Identifier")])
            .unwrap();
        builder.add_fallback("variable", "foreground");
        let tables = builder.build();
        let resolver = Resolver::new(&tables);
        let shell = colors(&[("foreground", Some("#AAAAAA"))]);

        let replacing = ThemeSource::new(None, shell.clone(), vec![rule("fore", fg("#BBBBBB"))]);
        let resolved = resolver.resolve(&replacing).unwrap();
        assert_eq!(
            resolved.get("Text Editor", "Identifier").unwrap().foreground.as_deref(),
            Some("#BBBBBB")
        );

        let background_only = RuleSettings {
            foreground: None,
            background: Some("#CCCCCC".to_string()),
        };
        let keeping = ThemeSource::new(None, shell, vec![rule("foreground", background_only)]);
        let resolved = resolver.resolve(&keeping).unwrap();
        let identifier = resolved.get("Text Editor", "Identifier").unwrap();
        assert_eq!(identifier.foreground.as_deref(), Some("#AAAAAA"));
        assert_eq!(identifier.background, None);
    }

    #[test]
    fn test_shell_colour_follows_fallback_chain() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("sideBar.background", vec![slot("Environment&ToolWindowBackground&Background")])
            .unwrap();
        builder
            .add_fallback("sideBar.background", "editor.background")
            .add_fallback("editor.background", "background");
        let tables = builder.build();

        let source = ThemeSource::new(
            None,
            colors(&[("sideBar.background", None), ("background", Some("#1E1E1E"))]),
            vec![],
        );
        let resolved = Resolver::new(&tables).resolve(&source).unwrap();
        assert_eq!(
            resolved
                .get("Environment", "ToolWindowBackground")
                .unwrap()
                .background
                .as_deref(),
            Some("#1E1E1E")
        );
    }

    #[test]
    fn test_fallback_chain_without_value_is_absent() {
        let mut builder = MappingTables::builder();
        builder.add_fallback("a", "b").add_fallback("b", "c");
        let tables = builder.build();

        let source = ThemeSource::default();
        assert_eq!(Resolver::new(&tables).resolve_value(&source, "a").unwrap(), None);
    }

    #[test]
    fn test_fallback_cycle_is_an_error() {
        let mut builder = MappingTables::builder();
        builder.add_fallback("a", "b").add_fallback("b", "a");
        let tables = builder.build();

        let source = ThemeSource::default();
        let err = Resolver::new(&tables).resolve_value(&source, "a").unwrap_err();
        assert!(matches!(err, ThemeError::Mapping { .. }));
    }

    #[test]
    fn test_overlay_rule_composites_over_base() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope("editor.selectionBackground", vec![slot("Text Editor&Selection&Background")])
            .unwrap();
        builder.add_overlay("editor.selectionBackground", 1.0, "editor.background");
        let tables = builder.build();

        let source = ThemeSource::new(
            None,
            colors(&[
                ("editor.selectionBackground", Some("#FFFFFF80")),
                ("editor.background", Some("#000000")),
            ]),
            vec![],
        );
        let resolved = Resolver::new(&tables).resolve(&source).unwrap();
        let expected = compound("#FFFFFF80", "#000000", 1.0, 1.0).unwrap();
        assert_eq!(
            resolved.get("Text Editor", "Selection").unwrap().background,
            Some(expected)
        );
    }

    #[test]
    fn test_slot_overlay_does_not_leak_into_later_slots() {
        let mut builder = MappingTables::builder();
        builder
            .add_scope(
                "editorLineNumber.foreground",
                vec![
                    slot("Text Editor&Line Number&Foreground&0.5&editor.background"),
                    slot("Text Editor&Gutter&Foreground"),
                ],
            )
            .unwrap();
        let tables = builder.build();

        let source = ThemeSource::new(
            None,
            colors(&[
                ("editorLineNumber.foreground", Some("#FFFFFF")),
                ("editor.background", Some("#000000")),
            ]),
            vec![],
        );
        let resolved = Resolver::new(&tables).resolve(&source).unwrap();

        assert_eq!(
            resolved.get("Text Editor", "Line Number").unwrap().foreground.as_deref(),
            Some("7F7F7FFF")
        );
        assert_eq!(
            resolved.get("Text Editor", "Gutter").unwrap().foreground.as_deref(),
            Some("#FFFFFF")
        );
    }
}
