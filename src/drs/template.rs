//! Translation of declarative identifier templates into matching expressions.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Matches one `%(name)s` placeholder in a project template.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\(([^()]*)\)s").expect("invalid regex"));

/// Translate a project identifier template into a regex pattern string.
///
/// Every distinct `%(name)s` placeholder is substituted exactly once, even
/// when it occurs several times:
///
/// - an override rule named `<name>_pattern` in `overrides` supplies the
///   capture expression for that placeholder;
/// - the `version` placeholder matches `v` followed by digits, or `latest`;
/// - any other placeholder matches one or more word characters or hyphens.
///
/// Each substitution names its capture group after the placeholder, so a
/// successful match yields a facet map keyed by placeholder name. Since
/// placeholders occupy disjoint regions of the template, the substitution
/// order does not affect the output: the same template and overrides always
/// produce a byte-identical pattern.
#[must_use]
pub fn translate_template(template: &str, overrides: &BTreeMap<String, String>) -> String {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER_REGEX.captures_iter(template) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let mut pattern = template.to_string();
    for name in names {
        let placeholder = format!("%({name})s");
        let capture = match overrides.get(&format!("{name}_pattern")) {
            Some(rule) => named_capture(name, rule),
            None if name == "version" => format!("(?P<{name}>v[\\d]+|latest)"),
            None => format!("(?P<{name}>[\\w-]+)"),
        };
        pattern = pattern.replace(&placeholder, &capture);
    }
    pattern
}

/// Wrap an override rule in a capture group named after its placeholder,
/// unless the rule already declares named groups of its own.
fn named_capture(name: &str, rule: &str) -> String {
    if rule.contains("(?P<") {
        rule.to_string()
    } else {
        format!("(?P<{name}>{rule})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn default_placeholders_capture_word_characters() {
        let pattern = translate_template("%(mip_era)s.%(source_id)s", &no_overrides());
        assert_eq!(pattern, r"(?P<mip_era>[\w-]+).(?P<source_id>[\w-]+)");
    }

    #[test]
    fn version_placeholder_gets_the_version_rule() {
        let pattern = translate_template("%(model)s.%(version)s", &no_overrides());
        assert_eq!(pattern, r"(?P<model>[\w-]+).(?P<version>v[\d]+|latest)");
    }

    #[test]
    fn override_rule_replaces_the_default() {
        let mut overrides = BTreeMap::new();
        let _ = overrides.insert("ensemble_pattern".to_string(), r"r\d+i\d+p\d+".to_string());
        let pattern = translate_template("%(model)s.%(ensemble)s", &overrides);
        assert_eq!(pattern, r"(?P<model>[\w-]+).(?P<ensemble>r\d+i\d+p\d+)");
    }

    #[test]
    fn override_with_its_own_named_group_is_used_verbatim() {
        let mut overrides = BTreeMap::new();
        let _ = overrides.insert(
            "member_pattern".to_string(),
            r"(?P<member>r\d+i\d+p\d+f\d+)".to_string(),
        );
        let pattern = translate_template("%(member)s", &overrides);
        assert_eq!(pattern, r"(?P<member>r\d+i\d+p\d+f\d+)");
    }

    #[test]
    fn repeated_placeholder_is_substituted_everywhere() {
        let pattern = translate_template("%(x)s/%(x)s", &no_overrides());
        assert_eq!(pattern, r"(?P<x>[\w-]+)/(?P<x>[\w-]+)");
    }

    #[test]
    fn translation_is_deterministic() {
        let mut overrides = BTreeMap::new();
        let _ = overrides.insert("a_pattern".to_string(), r"\d+".to_string());
        let _ = overrides.insert("b_pattern".to_string(), r"[a-z]+".to_string());
        let template = "%(a)s.%(b)s.%(version)s";
        let first = translate_template(template, &overrides);
        let second = translate_template(template, &overrides);
        assert_eq!(first, second);
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        assert_eq!(translate_template("plain.text", &no_overrides()), "plain.text");
    }
}
