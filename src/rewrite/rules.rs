//! Literal substitution rules for response bodies.

/// Content types whose bodies are rewritten.
pub const REWRITTEN_CONTENT_TYPES: &[&str] = &[
    "text/html",
    "text/css",
    "text/javascript",
    "application/javascript",
    "application/json",
];

/// One literal substitution: every occurrence of `pattern` becomes `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRule {
    pub pattern: String,
    pub replacement: String,
}

impl SubstitutionRule {
    fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// A rule that inserts `prefix` right after the root slash that ends `lead`.
    fn after_lead(lead: &str, prefix: &str) -> Self {
        Self::new(format!("{lead}/"), format!("{lead}{prefix}/"))
    }

    /// A rule that inserts `prefix` in front of a root-relative segment.
    fn before_segment(segment: &str, prefix: &str) -> Self {
        Self::new(segment, format!("{prefix}{segment}"))
    }
}

/// Ordered rule set for an app served under `prefix` (no trailing slash).
pub fn content_rules(prefix: &str) -> Vec<SubstitutionRule> {
    vec![
        // quoted attributes
        SubstitutionRule::after_lead("src=\"", prefix),
        SubstitutionRule::after_lead("href=\"", prefix),
        SubstitutionRule::after_lead("src='", prefix),
        SubstitutionRule::after_lead("href='", prefix),
        // css
        SubstitutionRule::after_lead("url(", prefix),
        // REST and realtime endpoints
        SubstitutionRule::before_segment("/api/", prefix),
        SubstitutionRule::before_segment("/socket.io/", prefix),
        // escaped quotes inside scripts and JSON strings
        SubstitutionRule::after_lead("\\\"", prefix),
        SubstitutionRule::after_lead("\\'", prefix),
    ]
}

/// Apply `rules` to `body` in a single left-to-right pass.
///
/// At each position the first rule (in list order) whose pattern matches
/// wins, and scanning resumes after the matched text. Replacement text is
/// never scanned again, so rules cannot compound.
pub fn apply(rules: &[SubstitutionRule], body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    'scan: while !rest.is_empty() {
        for rule in rules {
            if !rule.pattern.is_empty() && rest.starts_with(rule.pattern.as_str()) {
                out.push_str(&rule.replacement);
                rest = &rest[rule.pattern.len()..];
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        let patterns: Vec<String> = content_rules("/z2m").into_iter().map(|r| r.pattern).collect();
        assert_eq!(
            patterns,
            vec![
                "src=\"/", "href=\"/", "src='/", "href='/", "url(/", "/api/", "/socket.io/", "\\\"/",
                "\\'/",
            ]
        );
    }

    #[test]
    fn test_replacements_insert_prefix() {
        let rules = content_rules("/z2m");
        assert_eq!(rules[0].replacement, "src=\"/z2m/");
        assert_eq!(rules[4].replacement, "url(/z2m/");
        assert_eq!(rules[5].replacement, "/z2m/api/");
        assert_eq!(rules[6].replacement, "/z2m/socket.io/");
        assert_eq!(rules[7].replacement, "\\\"/z2m/");
    }

    #[test]
    fn test_apply_html() {
        let rules = content_rules("/zigbee2mqtt");
        let body = r#"<script src="/main.js"></script><link href='/style.css'>"#;
        assert_eq!(
            apply(&rules, body),
            r#"<script src="/zigbee2mqtt/main.js"></script><link href='/zigbee2mqtt/style.css'>"#
        );
    }

    #[test]
    fn test_apply_css_and_endpoints() {
        let rules = content_rules("/z2m");
        assert_eq!(apply(&rules, "a{background:url(/img/a.png)}"), "a{background:url(/z2m/img/a.png)}");
        assert_eq!(apply(&rules, "fetch('/api/devices')"), "fetch('/z2m/api/devices')");
        assert_eq!(apply(&rules, "io('/socket.io/')"), "io('/z2m/socket.io/')");
        assert_eq!(apply(&rules, r#"{\"base\":\"/\"}"#), r#"{\"base\":\"/z2m/\"}"#);
    }

    #[test]
    fn test_apply_does_not_rescan_replacements() {
        // `src="/api/x"` matches the attribute rule first; the inserted
        // text must not be picked up again by the `/api/` rule.
        let rules = content_rules("/z2m");
        assert_eq!(apply(&rules, r#"<img src="/api/x">"#), r#"<img src="/z2m/api/x">"#);
    }

    #[test]
    fn test_apply_is_noop_without_matches() {
        let rules = content_rules("/z2m");
        let body = "plain text with a / slash and ünïcödé";
        assert_eq!(apply(&rules, body), body);
    }
}
