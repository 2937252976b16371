// src/content/sanitize.rs

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

/// The canonical element allow-list. One list is used for both the
/// write-side pass (before persistence) and the read-side pass (before a
/// value is served as markup).
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "u", "s", "h1", "h2", "h3", "ul", "ol", "li", "blockquote", "a",
    "img", "hr",
];

/// Attributes permitted on any allowed element. Everything else is stripped.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "src", "alt", "class", "target", "rel", "style"];

static CLEANER: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect::<HashSet<_>>())
        // One flat attribute list, no per-tag extras beyond it.
        .tag_attributes(HashMap::new())
        .generic_attributes(ALLOWED_ATTRIBUTES.iter().copied().collect::<HashSet<_>>())
        .url_schemes(["http", "https"].into_iter().collect::<HashSet<_>>())
        .url_relative(ammonia::UrlRelative::PassThrough)
        // The allow-list carries `rel` itself, so ammonia must not inject one.
        .link_rel(None)
        .strip_comments(true);
    builder
});

/// HTML that has passed through [`sanitize`]. The constructor is private to
/// this module, so no raw string can reach a renderable field without going
/// through the allow-list first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SanitizedHtml(String);

impl SanitizedHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SanitizedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduces `input` to the canonical allow-list.
///
/// Disallowed elements are removed with their children unwrapped, except
/// `script`/`style`, whose contents are dropped wholly. Disallowed
/// attributes and non-http(s) `href`/`src` values are stripped. Malformed
/// input never panics; the result is always well-formed HTML, possibly
/// empty.
pub fn sanitize(input: &str) -> SanitizedHtml {
    SanitizedHtml(CLEANER.clean(input).to_string())
}

/// Sanitizes an optional field, mapping `None` through unchanged.
pub fn sanitize_opt(input: Option<&str>) -> Option<SanitizedHtml> {
    input.map(sanitize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_script_tags_and_content() {
        let out = sanitize("<p>hello</p><script>alert(1)</script>");
        assert_eq!(out.as_str(), "<p>hello</p>");
        assert!(!out.as_str().contains("script"));
        assert!(!out.as_str().contains("alert"));
    }

    #[test]
    fn strips_event_handler_attributes() {
        let out = sanitize(r#"<img src="https://x.org/a.png" onerror="alert(1)" alt="a">"#);
        assert!(out.as_str().contains("src=\"https://x.org/a.png\""));
        assert!(!out.as_str().contains("onerror"));
    }

    #[test]
    fn drops_javascript_hrefs() {
        let out = sanitize(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!out.as_str().contains("javascript"));
        // The anchor itself survives, its unsafe href does not.
        assert!(out.as_str().contains("<a"));
    }

    #[test]
    fn keeps_relative_urls() {
        let out = sanitize(r#"<a href="/donasi">x</a>"#);
        assert!(out.as_str().contains(r#"href="/donasi""#));
    }

    #[test]
    fn unwraps_unknown_elements() {
        let out = sanitize("<div><p>inner <span>text</span></p></div>");
        assert_eq!(out.as_str(), "<p>inner text</p>");
    }

    #[test]
    fn preserves_allowed_attributes() {
        let input =
            r#"<a href="https://x.org" target="_blank" rel="noopener noreferrer">link</a>"#;
        let out = sanitize(input);
        assert!(out.as_str().contains("target=\"_blank\""));
        assert!(out.as_str().contains("rel=\"noopener noreferrer\""));
    }

    #[test]
    fn keeps_alignment_styles() {
        let out = sanitize(r#"<p style="text-align: center">mid</p>"#);
        assert!(out.as_str().contains("text-align: center"));
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "<p>plain</p>",
            "<p>hello</p><script>alert(1)</script>",
            r#"<h1 style="text-align: right">t</h1><ul><li>a</li></ul>"#,
            "<div>loose<b>bold</b></div>",
            "broken < markup <p>tail",
        ];
        for input in inputs {
            let once = sanitize(input);
            let twice = sanitize(once.as_str());
            assert_eq!(once, twice, "sanitize not idempotent for {:?}", input);
        }
    }

    #[test]
    fn tolerates_malformed_input() {
        for input in ["<p", "</p></p></ul>", "<<<>>>", "<a href=\"", ""] {
            // must not panic, must return some valid string
            let _ = sanitize(input);
        }
        assert_eq!(sanitize("").as_str(), "");
    }

    #[test]
    fn strips_comments() {
        let out = sanitize("<p>a</p><!-- hidden -->");
        assert_eq!(out.as_str(), "<p>a</p>");
    }
}
