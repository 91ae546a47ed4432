//! Load gate
//!
//! Only web schemes may load inside the surface. Deep links, `tel:`,
//! `intent://`, `file://` and the like are suppressed before they start.

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Scheme part of `url`, if it has a syntactically valid one
pub fn scheme_of(url: &str) -> Option<&str> {
    let url = url.trim_start();
    let colon = url.find(':')?;
    let scheme = &url[..colon];

    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }

    Some(scheme)
}

/// Whether the surface may start loading `url`
pub fn should_allow_load(url: &str) -> bool {
    let allowed = scheme_of(url)
        .map(|scheme| {
            ALLOWED_SCHEMES
                .iter()
                .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false);

    if !allowed {
        tracing::debug!(url = %url, "Load rejected by scheme gate");
    }

    allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_web_urls() {
        assert!(should_allow_load("https://drishyacity.netlify.app/page"));
        assert!(should_allow_load("http://example.com"));
        assert!(should_allow_load("HTTPS://EXAMPLE.COM"));
        assert!(should_allow_load("  https://example.com"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(!should_allow_load("tel:123"));
        assert!(!should_allow_load("intent://x"));
        assert!(!should_allow_load("mailto:someone@example.com"));
        assert!(!should_allow_load("file:///etc/passwd"));
        assert!(!should_allow_load("whatsapp://send?text=hi"));
        assert!(!should_allow_load("httpfoo://example.com"));
        assert!(!should_allow_load("about:blank"));
        assert!(!should_allow_load(""));
        assert!(!should_allow_load("example.com"));
    }

    #[test]
    fn test_scheme_of() {
        assert_eq!(scheme_of("https://a.b"), Some("https"));
        assert_eq!(scheme_of("tel:123"), Some("tel"));
        assert_eq!(scheme_of("com.app+x://open"), Some("com.app+x"));
        assert_eq!(scheme_of("1abc:foo"), None);
        assert_eq!(scheme_of("no scheme here"), None);
        assert_eq!(scheme_of(":empty"), None);
    }
}
