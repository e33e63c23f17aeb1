//! `{NAME}` placeholder expansion for template text.

use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap());

/// Replaces every `{NAME}` occurrence in `text` with the value `lookup`
/// returns for `NAME`.
///
/// A placeholder whose lookup misses, or resolves to an empty string, is left
/// in the text verbatim. Replacement is a single pass: values containing
/// `{...}` are not re-expanded. Braces that do not wrap a `[A-Za-z0-9_]+`
/// name (JSON braces, `{}`, `{a.b}`) never match.
pub fn substitute<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER_RE
        .replace_all(text, |caps: &regex::Captures| {
            let name = caps.get(1).unwrap().as_str();
            match lookup(name) {
                Some(value) if !value.is_empty() => value,
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::substitute;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_known_placeholders() {
        let vars = vars(&[("TENANT", "acme"), ("STAGE", "prod")]);
        let out = substitute("{TENANT}-orders-{STAGE}", |name| vars.get(name).cloned());
        assert_eq!(out, "acme-orders-prod");
    }

    #[test]
    fn unknown_placeholder_is_left_verbatim() {
        let out = substitute("{TENANT}-orders", |_| None);
        assert_eq!(out, "{TENANT}-orders");
    }

    #[test]
    fn empty_value_is_treated_as_unset() {
        let vars = vars(&[("TENANT", "")]);
        let out = substitute("{TENANT}-orders", |name| vars.get(name).cloned());
        assert_eq!(out, "{TENANT}-orders");
    }

    #[test]
    fn json_braces_do_not_match() {
        let text = r#"{"Item": {"pk": {"S": "{ID}"}}}"#;
        let vars = vars(&[("ID", "u-1")]);
        let out = substitute(text, |name| vars.get(name).cloned());
        assert_eq!(out, r#"{"Item": {"pk": {"S": "u-1"}}}"#);
    }

    #[test]
    fn repeated_placeholder_replaced_everywhere() {
        let vars = vars(&[("ID", "42")]);
        let out = substitute("{ID}/{ID}/{ID}", |name| vars.get(name).cloned());
        assert_eq!(out, "42/42/42");
    }

    #[test]
    fn values_are_not_rescanned() {
        let vars = vars(&[("A", "{B}"), ("B", "boom")]);
        let out = substitute("{A}", |name| vars.get(name).cloned());
        assert_eq!(out, "{B}");
    }

    #[test]
    fn dotted_and_empty_names_never_match() {
        let out = substitute("{a.b} {} {-}", |_| Some("x".to_string()));
        assert_eq!(out, "{a.b} {} {-}");
    }
}
