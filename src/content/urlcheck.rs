// src/content/urlcheck.rs

use url::Url;

/// Decides whether `candidate` may be used as an `href` or `src` value.
///
/// Accepted: same-origin paths starting with a single `/`, and anything
/// that resolves against `origin` to an `http:`/`https:` URL. Everything
/// else is rejected, notably protocol-relative `//host` references and the
/// `javascript:`, `data:`, `file:`, `vbscript:` and `blob:` schemes.
pub fn is_safe_url(candidate: &str, origin: &Url) -> bool {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return false;
    }

    // `//host` would resolve to an http(s) URL on a foreign origin.
    if trimmed.starts_with("//") {
        return false;
    }

    if trimmed.starts_with('/') {
        return true;
    }

    match Url::options().base_url(Some(origin)).parse(trimmed) {
        Ok(resolved) => matches!(resolved.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://localhost:3000").unwrap()
    }

    #[test]
    fn accepts_single_slash_relative_paths() {
        assert!(is_safe_url("/foo", &origin()));
        assert!(is_safe_url("/images/logo.png", &origin()));
    }

    #[test]
    fn rejects_protocol_relative_urls() {
        assert!(!is_safe_url("//evil.com", &origin()));
        assert!(!is_safe_url("  //evil.com/x.png", &origin()));
    }

    #[test]
    fn accepts_http_and_https() {
        assert!(is_safe_url("https://x.org", &origin()));
        assert!(is_safe_url("http://x.org/a.png", &origin()));
    }

    #[test]
    fn rejects_dangerous_schemes() {
        for url in [
            "javascript:alert(1)",
            "data:text/html,x",
            "file:///etc/passwd",
            "vbscript:msgbox(1)",
            "blob:http://x.org/abc",
        ] {
            assert!(!is_safe_url(url, &origin()), "{url} should be rejected");
        }
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(!is_safe_url("", &origin()));
        assert!(!is_safe_url("   ", &origin()));
    }

    #[test]
    fn resolves_bare_paths_against_origin() {
        // `a.png` resolves to http://localhost:3000/a.png
        assert!(is_safe_url("a.png", &origin()));
    }
}
