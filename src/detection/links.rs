//! Contact-like link handling.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::CONTACT_LINK_KEYWORDS;
use crate::utils::compile_regex_unsafe;

/// Any contact keyword at the start of a word (`/contact-us`, `Get a Quote`,
/// `ContactUs`), case-insensitive.
static CONTACT_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = CONTACT_LINK_KEYWORDS
        .iter()
        .map(|keyword| regex::escape(keyword))
        .collect::<Vec<_>>()
        .join("|");
    compile_regex_unsafe(
        &format!("(?i)(?:^|[^a-z])(?:{alternatives})"),
        "CONTACT_KEYWORD_RE",
    )
});

/// An on-page anchor that looks like it leads to a contact page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLink {
    /// Raw `href` attribute (may be relative)
    pub href: String,
    /// Visible anchor text
    #[serde(default)]
    pub text: String,
}

impl ContactLink {
    /// Creates a link from an href and its anchor text.
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// Whether an anchor's text or href contains a contact keyword.
pub fn is_contact_like(href: &str, text: &str) -> bool {
    CONTACT_KEYWORD_RE.is_match(href) || CONTACT_KEYWORD_RE.is_match(text)
}

/// Turns detector links into absolute, unique, navigable URLs.
///
/// Hrefs are resolved against `base`. Non-http(s) targets (`mailto:`, `tel:`,
/// `javascript:`), fragment-only anchors, and links back to `base` itself are
/// dropped. Fragments are stripped before de-duplication; order is preserved.
pub fn resolve_contact_links(links: &[ContactLink], base: &Url) -> Vec<String> {
    let mut base_without_fragment = base.clone();
    base_without_fragment.set_fragment(None);

    let mut resolved: Vec<String> = Vec::new();
    for link in links {
        let href = link.href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        let Ok(mut target) = base.join(href) else {
            log::debug!("Skipping unparseable contact link: {}", href);
            continue;
        };
        if !matches!(target.scheme(), "http" | "https") {
            continue;
        }
        target.set_fragment(None);
        if target == base_without_fragment {
            continue;
        }
        let target = target.to_string();
        if !resolved.contains(&target) {
            resolved.push(target);
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://acmemotors.example/").unwrap()
    }

    #[test]
    fn test_is_contact_like_matches_text_or_href() {
        assert!(is_contact_like("/contact-us/", "Visit"));
        assert!(is_contact_like("/page?id=4", "Get a Quote"));
        assert!(is_contact_like("/SALES-dept", ""));
        assert!(is_contact_like("/ContactUs.aspx", ""));
        assert!(!is_contact_like("/inventory/used", "Used Cars"));
        assert!(!is_contact_like("/recontacting", "Service"));
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let links = vec![
            ContactLink::new("/contact-us/", "Contact Us"),
            ContactLink::new("https://acmemotors.example/sales/", "Sales"),
        ];
        assert_eq!(
            resolve_contact_links(&links, &base()),
            vec![
                "https://acmemotors.example/contact-us/".to_string(),
                "https://acmemotors.example/sales/".to_string(),
            ]
        );
    }

    #[test]
    fn test_resolve_drops_non_navigable_and_duplicates() {
        let links = vec![
            ContactLink::new("mailto:sales@acmemotors.example", "Email sales"),
            ContactLink::new("tel:5551234", "Call"),
            ContactLink::new("javascript:void(0)", "Contact"),
            ContactLink::new("#contact", "Contact"),
            ContactLink::new("/", "Home contact"),
            ContactLink::new("/contact-us/#form", "Contact"),
            ContactLink::new("/contact-us/", "Contact again"),
            ContactLink::new("", "Empty"),
        ];
        assert_eq!(
            resolve_contact_links(&links, &base()),
            vec!["https://acmemotors.example/contact-us/".to_string()]
        );
    }
}
