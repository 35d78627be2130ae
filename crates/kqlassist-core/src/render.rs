//! `{{key}}` placeholder substitution.

use kqlassist_types::KvpMap;
use regex_lite::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("placeholder regex is valid")
    })
}

/// Replace every `{{ key }}` whose key is in `kvp` with its value, verbatim.
///
/// Unknown placeholders are left untouched, braces included. Substituted
/// values are never re-scanned.
pub fn render(body: &str, kvp: &KvpMap) -> String {
    placeholder_pattern()
        .replace_all(body, |caps: &Captures<'_>| match kvp.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Distinct placeholder identifiers in order of first appearance.
pub fn placeholders(body: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for caps in placeholder_pattern().captures_iter(body) {
        let ident = &caps[1];
        if !out.iter().any(|seen| seen == ident) {
            out.push(ident.to_string());
        }
    }
    out
}

/// Placeholders `render` would leave in place.
pub fn unresolved(body: &str, kvp: &KvpMap) -> Vec<String> {
    placeholders(body)
        .into_iter()
        .filter(|ident| !kvp.contains_key(ident))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kqlassist_types::KeyCase;

    fn kvp(pairs: &[(&str, &str)]) -> KvpMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn substitutes_known_keys() {
        let out = render(r#"T | where X == "{{ip}}""#, &kvp(&[("ip", "1.2.3.4")]));
        assert_eq!(out, r#"T | where X == "1.2.3.4""#);
    }

    #[test]
    fn whitespace_inside_braces() {
        let out = render("{{  device\t}} / {{device}}", &kvp(&[("device", "HOST")]));
        assert_eq!(out, "HOST / HOST");
    }

    #[test]
    fn unknown_placeholder_left_verbatim() {
        let out = render("{{ a }} and {{b}}", &kvp(&[("a", "1")]));
        assert_eq!(out, "1 and {{b}}");
    }

    #[test]
    fn empty_value_still_substitutes() {
        let out = render("[{{a}}]", &kvp(&[("a", "")]));
        assert_eq!(out, "[]");
    }

    #[test]
    fn no_recursive_substitution() {
        let map = kvp(&[("a", "{{b}}"), ("b", "boom")]);
        let once = render("{{a}}", &map);
        assert_eq!(once, "{{b}}");
    }

    #[test]
    fn idempotent_without_new_tokens() {
        let map = kvp(&[("ip", "1.2.3.4")]);
        let body = "{{ip}} {{other}}";
        let once = render(body, &map);
        assert_eq!(render(&once, &map), once);
    }

    #[test]
    fn identifier_charset() {
        let map = kvp(&[("a.b-c_1", "ok")]);
        assert_eq!(render("{{a.b-c_1}}", &map), "ok");
        assert_eq!(render("{{a b}}", &map), "{{a b}}");
        assert_eq!(render("{{}}", &map), "{{}}");
        assert_eq!(render("{ {a.b-c_1} }", &map), "{ {a.b-c_1} }");
    }

    #[test]
    fn dollar_signs_in_values_are_literal() {
        let out = render("{{v}}", &kvp(&[("v", "$1 ${x}")]));
        assert_eq!(out, "$1 ${x}");
    }

    #[test]
    fn lowercase_map_matches_mixed_case_placeholder() {
        let mut map = KvpMap::with_key_case(KeyCase::Lowercase);
        map.insert("Device", "HOST");
        assert_eq!(render("{{DEVICE}}", &map), "HOST");
    }

    #[test]
    fn lists_placeholders_and_unresolved() {
        let body = "{{a}} {{ b }} {{a}} {{c}}";
        assert_eq!(placeholders(body), vec!["a", "b", "c"]);
        assert_eq!(unresolved(body, &kvp(&[("b", "x")])), vec!["a", "c"]);
    }
}
