//! Deciding whether an element (or a bare URL) is a mailgo link.
//!
//! Classic links carry everything in their href (`mailto:`, `mailgo:`,
//! `tel:`, `callto:`, `sms:`). Attribute-based links are placeholders
//! (`href="#mailgo"` or class `mailgo`) whose contact data lives in
//! `data-*` attributes, out of reach of naive scrapers.

use serde::{Deserialize, Serialize};

pub const MAILTO: &str = "mailto:";
pub const MAILGO: &str = "mailgo:";
pub const TEL: &str = "tel:";
pub const CALLTO: &str = "callto:";
pub const SMS: &str = "sms:";

/// Placeholder href for attribute-based links.
pub const PLACEHOLDER_HREF: &str = "#mailgo";
/// Marker class for attribute-based links.
pub const MAILGO_CLASS: &str = "mailgo";
/// Opt-out class: an element carrying it is never classified.
pub const NO_MAILGO_CLASS: &str = "no-mailgo";
/// Per-element dark mode override.
pub const DARK_CLASS: &str = "dark";

/// Category of a matched link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Mail,
    Tel,
    Sms,
}

impl ContactKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mail => "mail",
            Self::Tel => "tel",
            Self::Sms => "sms",
        }
    }

    /// Whether this kind is rendered by the telephone modal.
    #[must_use]
    pub const fn uses_tel_modal(self) -> bool {
        matches!(self, Self::Tel | Self::Sms)
    }
}

impl std::fmt::Display for ContactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a link's contact data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstallMode {
    /// Everything is encoded in the href.
    Classic,
    /// Placeholder href plus `data-*` attributes ("less-spam").
    AttributeBased,
}

/// The single in-flight classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveMatch {
    pub kind: ContactKind,
    pub mode: InstallMode,
}

impl ActiveMatch {
    #[must_use]
    pub const fn new(kind: ContactKind, mode: InstallMode) -> Self {
        Self { kind, mode }
    }

    #[must_use]
    pub const fn classic(kind: ContactKind) -> Self {
        Self::new(kind, InstallMode::Classic)
    }

    #[must_use]
    pub const fn attribute_based(kind: ContactKind) -> Self {
        Self::new(kind, InstallMode::AttributeBased)
    }
}

/// Read-only view of a page element, enough to classify and extract.
pub trait LinkElement {
    /// Raw attribute value, `None` when the attribute is absent.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Whether the element's class list contains `class`.
    fn has_class(&self, class: &str) -> bool;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// The href attribute as written in the markup.
    fn href(&self) -> Option<String> {
        self.attribute("href")
    }
}

/// Case-insensitive scheme prefix test.
#[must_use]
pub fn has_scheme(url: &str, scheme: &str) -> bool {
    url.len() >= scheme.len()
        && url.is_char_boundary(scheme.len())
        && url[..scheme.len()].eq_ignore_ascii_case(scheme)
}

/// Returns the text after `scheme` when `url` starts with it (ignoring case).
#[must_use]
pub fn strip_scheme<'a>(url: &'a str, scheme: &str) -> Option<&'a str> {
    has_scheme(url, scheme).then(|| &url[scheme.len()..])
}

/// Classifies a URL by its scheme alone.
///
/// This is the classic-mode rule set and the basis of programmatic
/// rendering, where there is no element to inspect.
#[must_use]
pub fn classify_url(url: &str) -> Option<ActiveMatch> {
    let url = url.trim_start();
    let kind = if has_scheme(url, MAILTO) || has_scheme(url, MAILGO) {
        ContactKind::Mail
    } else if has_scheme(url, TEL) || has_scheme(url, CALLTO) {
        ContactKind::Tel
    } else if has_scheme(url, SMS) {
        ContactKind::Sms
    } else {
        return None;
    };
    Some(ActiveMatch::classic(kind))
}

/// Classifies one element.
///
/// The opt-out class wins over everything else. A scheme href makes a
/// classic match; otherwise a placeholder href or the marker class makes the
/// element a candidate for an attribute-based match, decided by which data
/// attribute is present.
pub fn classify_element<E: LinkElement + ?Sized>(element: &E) -> Option<ActiveMatch> {
    if element.has_class(NO_MAILGO_CLASS) {
        return None;
    }

    let href = element.href();
    if let Some(found) = href.as_deref().and_then(classify_url) {
        return Some(found);
    }

    let placeholder = href.as_deref().is_some_and(|h| h.trim() == PLACEHOLDER_HREF);
    if !placeholder && !element.has_class(MAILGO_CLASS) {
        return None;
    }

    let kind = if element.has_attribute("data-address") {
        ContactKind::Mail
    } else if element.has_attribute("data-tel") {
        ContactKind::Tel
    } else if element.has_attribute("data-msg") {
        ContactKind::Sms
    } else {
        return None;
    };
    Some(ActiveMatch::attribute_based(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct El {
        attrs: BTreeMap<&'static str, &'static str>,
        classes: Vec<&'static str>,
    }

    impl El {
        fn href(href: &'static str) -> Self {
            Self::default().attr("href", href)
        }

        fn attr(mut self, name: &'static str, value: &'static str) -> Self {
            self.attrs.insert(name, value);
            self
        }

        fn class(mut self, class: &'static str) -> Self {
            self.classes.push(class);
            self
        }
    }

    impl LinkElement for El {
        fn attribute(&self, name: &str) -> Option<String> {
            self.attrs.get(name).map(|v| (*v).to_string())
        }

        fn has_class(&self, class: &str) -> bool {
            self.classes.contains(&class)
        }
    }

    #[test]
    fn classic_schemes() {
        let cases = [
            ("mailto:a@b.com", ContactKind::Mail),
            ("MAILTO:a@b.com", ContactKind::Mail),
            ("mailgo:a@b.com", ContactKind::Mail),
            ("tel:5551234", ContactKind::Tel),
            ("Callto:5551234", ContactKind::Tel),
            ("sms:5551234", ContactKind::Sms),
        ];
        for (href, kind) in cases {
            assert_eq!(
                classify_element(&El::href(href)),
                Some(ActiveMatch::classic(kind)),
                "{href}"
            );
        }
    }

    #[test]
    fn opt_out_beats_a_valid_href() {
        let el = El::href("mailto:a@b.com").class(NO_MAILGO_CLASS);
        assert_eq!(classify_element(&el), None);

        let el = El::href(PLACEHOLDER_HREF)
            .class(MAILGO_CLASS)
            .class(NO_MAILGO_CLASS)
            .attr("data-address", "a")
            .attr("data-domain", "b.com");
        assert_eq!(classify_element(&el), None);
    }

    #[test]
    fn attribute_based_by_placeholder_or_class() {
        let el = El::href(PLACEHOLDER_HREF)
            .attr("data-address", "a")
            .attr("data-domain", "b.com");
        assert_eq!(
            classify_element(&el),
            Some(ActiveMatch::attribute_based(ContactKind::Mail))
        );

        let el = El::default().class(MAILGO_CLASS).attr("data-tel", "5551234");
        assert_eq!(
            classify_element(&el),
            Some(ActiveMatch::attribute_based(ContactKind::Tel))
        );

        let el = El::default().class(MAILGO_CLASS).attr("data-msg", "hello");
        assert_eq!(
            classify_element(&el),
            Some(ActiveMatch::attribute_based(ContactKind::Sms))
        );
    }

    #[test]
    fn address_attribute_wins_over_tel() {
        let el = El::href(PLACEHOLDER_HREF)
            .attr("data-address", "a")
            .attr("data-tel", "5551234");
        assert_eq!(
            classify_element(&el).map(|m| m.kind),
            Some(ContactKind::Mail)
        );
    }

    #[test]
    fn placeholder_without_data_is_not_a_match() {
        assert_eq!(classify_element(&El::href(PLACEHOLDER_HREF)), None);
        assert_eq!(classify_element(&El::default().class(MAILGO_CLASS)), None);
    }

    #[test]
    fn data_attributes_need_a_placeholder() {
        let el = El::href("https://example.com").attr("data-tel", "5551234");
        assert_eq!(classify_element(&el), None);
        assert_eq!(classify_element(&El::default()), None);
    }

    #[test]
    fn scheme_helpers_ignore_case_and_multibyte() {
        assert!(has_scheme("TeL:1", TEL));
        assert!(!has_scheme("te", TEL));
        assert!(!has_scheme("té:123", TEL));
        assert_eq!(strip_scheme("SMS:123?body=x", SMS), Some("123?body=x"));
        assert_eq!(strip_scheme("https://x", SMS), None);
    }

    #[test]
    fn kinds_map_to_modal_groups() {
        assert!(!ContactKind::Mail.uses_tel_modal());
        assert!(ContactKind::Tel.uses_tel_modal());
        assert!(ContactKind::Sms.uses_tel_modal());
    }
}
