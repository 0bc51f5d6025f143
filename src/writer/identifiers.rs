//! Identifier rewriting.
//!
//! Rules are `(pattern, replacement, exclusion)` triples tried in order. The
//! first rule whose pattern matches and whose exclusion (if any) does not
//! wins; its replacement is applied to every match and no further rules run.
//! Replacements use the `regex` crate syntax (`$1`, `${name}`).

use regex::Regex;
use serde::Deserialize;

use crate::errors::{ConvertError, Result};

/// Django's per-iteration loop object. Jinja exposes the same state as `loop`.
const FORLOOP: &str = "forloop";

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RuleSpec")]
pub struct IdentifierRule {
    pattern: Regex,
    replace: String,
    unless: Option<Regex>,
}

/// Uncompiled rule, as it appears in a configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub replace: String,
    #[serde(default)]
    pub unless: Option<String>,
}

impl TryFrom<RuleSpec> for IdentifierRule {
    type Error = ConvertError;

    fn try_from(spec: RuleSpec) -> Result<Self> {
        IdentifierRule::new(&spec.pattern, &spec.replace, spec.unless.as_deref())
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ConvertError::Rule {
        pattern: pattern.to_owned(),
        source,
    })
}

impl IdentifierRule {
    /// # Examples
    ///
    /// ```rust
    /// use dj2jinja::writer::IdentifierRule;
    /// let rule = IdentifierRule::new(r"\.get_(\w+)_url", ".get_${1}_url()", None).unwrap();
    /// assert_eq!(rule.apply("obj.get_absolute_url").as_deref(), Some("obj.get_absolute_url()"));
    /// ```
    pub fn new(pattern: &str, replace: &str, unless: Option<&str>) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            replace: replace.to_owned(),
            unless: unless.map(compile).transpose()?,
        })
    }

    /// Rewrites `name`, or returns `None` when the rule does not apply.
    pub fn apply(&self, name: &str) -> Option<String> {
        if !self.pattern.is_match(name) {
            return None;
        }
        if self.unless.as_ref().is_some_and(|unless| unless.is_match(name)) {
            return None;
        }
        Some(
            self.pattern
                .replace_all(name, self.replace.as_str())
                .into_owned(),
        )
    }
}

/// Translates a Django lookup path into its Jinja spelling.
pub fn translate_identifier(name: &str, in_loop: bool, rules: &[IdentifierRule]) -> String {
    let name = if in_loop && is_forloop_path(name) {
        &name["for".len()..]
    } else {
        name
    };

    rules
        .iter()
        .find_map(|rule| rule.apply(name))
        .unwrap_or_else(|| name.to_owned())
}

fn is_forloop_path(name: &str) -> bool {
    name.strip_prefix(FORLOOP)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<IdentifierRule> {
        vec![
            IdentifierRule::new(r"loop\.counter0", "loop.index0", None).unwrap(),
            IdentifierRule::new(r"loop\.counter", "loop.index", None).unwrap(),
            IdentifierRule::new(r"\.url$", ".url()", Some(r"(form|calendar)\.url")).unwrap(),
            IdentifierRule::new(r"\.items$", ".items()", None).unwrap(),
        ]
    }

    #[test]
    fn strips_forloop_inside_loops() {
        assert_eq!(translate_identifier("forloop.first", true, &[]), "loop.first");
        assert_eq!(translate_identifier("forloop", true, &[]), "loop");
    }

    #[test]
    fn keeps_forloop_outside_loops() {
        assert_eq!(translate_identifier("forloop.first", false, &[]), "forloop.first");
    }

    #[test]
    fn does_not_strip_lookalike_names() {
        assert_eq!(translate_identifier("forloops.x", true, &[]), "forloops.x");
    }

    #[test]
    fn first_matching_rule_wins_and_stops() {
        let rules = rules();
        assert_eq!(
            translate_identifier("forloop.counter0", true, &rules),
            "loop.index0"
        );
        assert_eq!(translate_identifier("forloop.counter", true, &rules), "loop.index");
    }

    #[test]
    fn exclusion_pattern_skips_the_rule() {
        let rules = rules();
        assert_eq!(translate_identifier("article.url", false, &rules), "article.url()");
        assert_eq!(translate_identifier("form.url", false, &rules), "form.url");
    }

    #[test]
    fn unmatched_names_pass_through() {
        assert_eq!(translate_identifier("user.name", false, &rules()), "user.name");
    }

    #[test]
    fn translation_is_idempotent_for_anchored_rules() {
        let rules = rules();
        for name in ["article.url", "d.items", "forloop.counter", "plain"] {
            let once = translate_identifier(name, true, &rules);
            let twice = translate_identifier(&once, true, &rules);
            assert_eq!(once, twice, "{name}");
        }
    }

    #[test]
    fn rules_deserialize_and_compile() {
        let rule: IdentifierRule =
            serde_json::from_str(r#"{"pattern": "^user$", "replace": "request.user"}"#).unwrap();
        assert_eq!(rule.apply("user").as_deref(), Some("request.user"));
        let bad = serde_json::from_str::<IdentifierRule>(r#"{"pattern": "(", "replace": ""}"#);
        assert!(bad.is_err());
    }
}
