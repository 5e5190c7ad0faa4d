//! Source theme JSON parsing.
//!
//! Parses an editor theme (`type`, `colors`, `tokenColors`) into a
//! `ThemeSource`. Generated themes list unset colours as commented-out lines;
//! those lines are re-enabled before parsing so their names take part in
//! fallback resolution.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Result, ThemeError};

/// Foreground/background pair set by a token rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleSettings {
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ScopeField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
struct RawRule {
    #[serde(default)]
    scope: Option<ScopeField>,
    #[serde(default)]
    settings: RuleSettings,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTheme {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    colors: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "tokenColors", default)]
    token_colors: Vec<RawRule>,
}

/// One `tokenColors` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRule {
    /// Scope entries as written; each may hold several comma-separated selectors.
    pub scopes: Vec<String>,
    pub settings: RuleSettings,
}

impl TokenRule {
    pub fn new(scopes: Vec<String>, settings: RuleSettings) -> Self {
        Self { scopes, settings }
    }

    /// Every non-empty, trimmed selector in declaration order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A parsed source theme.
#[derive(Debug, Clone, Default)]
pub struct ThemeSource {
    kind: Option<String>,
    colors: Vec<(String, Option<String>)>,
    color_index: HashMap<String, usize>,
    rules: Vec<TokenRule>,
}

impl ThemeSource {
    /// Build a theme directly; later duplicates of a colour name replace
    /// earlier ones.
    pub fn new(
        kind: Option<String>,
        colors: impl IntoIterator<Item = (String, Option<String>)>,
        rules: Vec<TokenRule>,
    ) -> Self {
        let mut theme = Self {
            kind,
            rules,
            ..Self::default()
        };
        for (name, value) in colors {
            match theme.color_index.get(&name) {
                Some(&i) => theme.colors[i].1 = value,
                None => {
                    theme.color_index.insert(name.clone(), theme.colors.len());
                    theme.colors.push((name, value));
                }
            }
        }
        theme
    }

    /// Parse theme JSON, re-enabling `//` commented lines first.
    pub fn parse(source: &str) -> Result<Self> {
        let text = uncomment(source);
        let raw: RawTheme = serde_json::from_str(&text).map_err(|e| ThemeError::Parse {
            message: format!("Invalid theme JSON: {}", e),
            help: Some("Expected an object with 'type', 'colors' and 'tokenColors'".to_string()),
        })?;

        let mut colors = Vec::with_capacity(raw.colors.len());
        for (name, value) in raw.colors {
            let value = match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s),
                other => {
                    return Err(ThemeError::Parse {
                        message: format!("Colour '{}' must be a string, found {}", name, other),
                        help: None,
                    })
                }
            };
            colors.push((name, value));
        }

        let rules = raw
            .token_colors
            .into_iter()
            .map(|rule| {
                let scopes = match rule.scope {
                    None => Vec::new(),
                    Some(ScopeField::One(s)) => vec![s],
                    Some(ScopeField::Many(list)) => list,
                };
                TokenRule::new(scopes, rule.settings)
            })
            .collect();

        Ok(Self::new(raw.kind, colors, rules))
    }

    pub fn is_dark(&self) -> bool {
        self.kind.as_deref() == Some("dark")
    }

    /// Named colours in file order, including names with no value.
    pub fn colors(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.colors
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// The value of a named colour, if present and non-null.
    pub fn color(&self, name: &str) -> Option<&str> {
        let &i = self.color_index.get(name)?;
        self.colors[i].1.as_deref()
    }

    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }
}

/// Re-enable `//` commented lines.
///
/// The first `//` marker on the line is removed. The nearest preceding
/// non-blank line gets a trailing comma unless it already ends with `,`, `{` or `[`.
pub fn uncomment(source: &str) -> String {
    let mut lines: Vec<String> = source.lines().map(str::to_string).collect();

    for i in 0..lines.len() {
        if !lines[i].trim_start().starts_with("//") {
            continue;
        }
        if let Some(pos) = lines[i].find("//") {
            lines[i].replace_range(pos..pos + 2, "");
        }
        let Some(j) = (0..i).rev().find(|&j| !lines[j].trim().is_empty()) else {
            continue;
        };
        let prev = &mut lines[j];
        let end = prev.trim_end();
        if !end.is_empty() && !end.ends_with(',') && !end.ends_with('{') && !end.ends_with('[') {
            let len = end.len();
            prev.insert(len, ',');
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_minimal() {
        let theme = ThemeSource::parse(r##"{ "colors": { "foreground": "#FF0000" }, "tokenColors": [] }"##).unwrap();
        assert!(!theme.is_dark());
        assert_eq!(theme.color("foreground"), Some("#FF0000"));
        assert!(theme.rules().is_empty());
    }

    #[test]
    fn test_parse_scope_forms() {
        let theme = ThemeSource::parse(
            r##"{
  "type": "dark",
  "tokenColors": [
    { "scope": "comment", "settings": { "foreground": "#6A9955" } },
    { "scope": ["keyword", "storage.type"], "settings": { "foreground": "#569CD6" } },
    { "settings": { "foreground": "#D4D4D4", "background": "#1E1E1E" } },
    { "name": "no settings", "scope": "string" }
  ]
}"##,
        )
        .unwrap();

        assert!(theme.is_dark());
        let rules = theme.rules();
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0].scopes, vec!["comment"]);
        assert_eq!(rules[1].scopes, vec!["keyword", "storage.type"]);
        assert!(rules[2].scopes.is_empty());
        assert_eq!(rules[2].settings.background.as_deref(), Some("#1E1E1E"));
        assert_eq!(rules[3].settings, RuleSettings::default());
    }

    #[test]
    fn test_selectors_split_and_trim() {
        let rule = TokenRule::new(
            vec!["comment, string.quoted ,".to_string(), "keyword".to_string()],
            RuleSettings::default(),
        );
        let selectors: Vec<&str> = rule.selectors().collect();
        assert_eq!(selectors, vec!["comment", "string.quoted", "keyword"]);
    }

    #[test]
    fn test_null_colours_are_present_without_value() {
        let theme = ThemeSource::parse(r#"{ "colors": { "editor.background": null } }"#).unwrap();
        let colors: Vec<_> = theme.colors().collect();
        assert_eq!(colors, vec![("editor.background", None)]);
        assert_eq!(theme.color("editor.background"), None);
    }

    #[test]
    fn test_uncomment_restores_lines() {
        let source = r##"{
  "colors": {
    "foreground": "#FFFFFF"
    //"editor.background": null
  }
}"##;
        let theme = ThemeSource::parse(source).unwrap();
        let names: Vec<&str> = theme.colors().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["foreground", "editor.background"]);
    }

    #[test]
    fn test_uncomment_skips_blank_lines_when_adding_comma() {
        let source = "{\n  \"colors\": {\n    \"foreground\": \"#FFFFFF\"\n\n    //\"editor.background\": null\n  }\n}";
        let theme = ThemeSource::parse(source).unwrap();
        let names: Vec<&str> = theme.colors().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["foreground", "editor.background"]);
    }

    #[test]
    fn test_uncomment_leaves_open_brace_alone() {
        let out = uncomment("{\n  //\"a\": null,\n  \"b\": \"#000\"\n}");
        assert_eq!(out, "{\n  \"a\": null,\n  \"b\": \"#000\"\n}");
    }

    #[test]
    fn test_uncomment_first_line() {
        assert_eq!(uncomment("// header"), " header");
    }

    #[test]
    fn test_parse_rejects_non_string_colour() {
        assert!(ThemeSource::parse(r#"{ "colors": { "foreground": 12 } }"#).is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = ThemeSource::parse("{ not json").unwrap_err();
        assert!(matches!(err, ThemeError::Parse { .. }));
    }
}
