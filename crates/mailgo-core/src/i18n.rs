//! Modal label translations.
//!
//! The table is embedded at compile time and parsed once. Every language
//! falls back to English key by key, so a partial translation never leaves
//! a button without a label.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LANG: &str = "en";

/// Languages with an entry in the embedded table.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "it", "es", "de", "fr", "pt", "nl", "sv"];

const TRANSLATIONS_JSON: &str = include_str!("../assets/translations.json");

type Table = BTreeMap<String, BTreeMap<String, String>>;

fn translations() -> &'static Table {
    static TABLE: OnceLock<Table> = OnceLock::new();
    TABLE.get_or_init(|| {
        serde_json::from_str(TRANSLATIONS_JSON).unwrap_or_else(|e| {
            tracing::warn!("embedded translations failed to parse: {e}");
            Table::new()
        })
    })
}

/// Every label the modals display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    OpenIn,
    Cc,
    Bcc,
    Subject,
    Body,
    Gmail,
    Outlook,
    Yahoo,
    Telegram,
    WhatsApp,
    Skype,
    Call,
    Open,
    DefaultSuffix,
    AsDefaultSuffix,
    Copy,
    Copied,
}

impl Label {
    /// Key in the translation table.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::OpenIn => "open_in_",
            Self::Cc => "cc_",
            Self::Bcc => "bcc_",
            Self::Subject => "subject_",
            Self::Body => "body_",
            Self::Gmail => "gmail",
            Self::Outlook => "outlook",
            Self::Yahoo => "yahoo",
            Self::Telegram => "telegram",
            Self::WhatsApp => "whatsapp",
            Self::Skype => "skype",
            Self::Call => "call",
            Self::Open => "open",
            Self::DefaultSuffix => "_default",
            Self::AsDefaultSuffix => "_as_default",
            Self::Copy => "copy",
            Self::Copied => "copied",
        }
    }
}

/// How the active language was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageSource {
    /// `lang` option in the configuration.
    Config,
    /// Prefix match on `<html lang>`.
    Html,
    /// Nothing matched.
    Default,
}

/// Picks the modal language.
///
/// A configured language is used when it is supported. Otherwise the page's
/// `<html lang>` is matched by prefix, case-insensitively, so `fr-FR` and
/// `pt_BR` both resolve. English is the last resort.
#[must_use]
pub fn resolve_language(
    configured: Option<&str>,
    html_lang: Option<&str>,
) -> (&'static str, LanguageSource) {
    if let Some(wanted) = configured.map(str::trim)
        && let Some(lang) = SUPPORTED_LANGUAGES
            .iter()
            .find(|l| l.eq_ignore_ascii_case(wanted))
            .copied()
    {
        return (lang, LanguageSource::Config);
    }

    if let Some(page) = html_lang.map(str::trim)
        && let Some(lang) = SUPPORTED_LANGUAGES.iter().find(|l| {
            page.len() >= l.len()
                && page.is_char_boundary(l.len())
                && page[..l.len()].eq_ignore_ascii_case(l)
        })
        .copied()
    {
        return (lang, LanguageSource::Html);
    }

    (DEFAULT_LANG, LanguageSource::Default)
}

/// Label lookup for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strings {
    lang: &'static str,
}

impl Default for Strings {
    fn default() -> Self {
        Self { lang: DEFAULT_LANG }
    }
}

impl Strings {
    /// Strings for `lang`, or English if the language is not supported.
    #[must_use]
    pub fn for_language(lang: &str) -> Self {
        let lang = SUPPORTED_LANGUAGES
            .iter()
            .find(|l| l.eq_ignore_ascii_case(lang))
            .copied()
            .unwrap_or(DEFAULT_LANG);
        Self { lang }
    }

    #[must_use]
    pub const fn lang(&self) -> &'static str {
        self.lang
    }

    #[must_use]
    pub fn get(&self, label: Label) -> &'static str {
        let table = translations();
        let key = label.key();
        table
            .get(self.lang)
            .and_then(|t| t.get(key))
            .or_else(|| table.get(DEFAULT_LANG).and_then(|t| t.get(key)))
            .map_or(key, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_LABELS: [Label; 17] = [
        Label::OpenIn,
        Label::Cc,
        Label::Bcc,
        Label::Subject,
        Label::Body,
        Label::Gmail,
        Label::Outlook,
        Label::Yahoo,
        Label::Telegram,
        Label::WhatsApp,
        Label::Skype,
        Label::Call,
        Label::Open,
        Label::DefaultSuffix,
        Label::AsDefaultSuffix,
        Label::Copy,
        Label::Copied,
    ];

    #[test]
    fn embedded_table_covers_every_supported_language() {
        let table = translations();
        for lang in SUPPORTED_LANGUAGES {
            assert!(table.contains_key(*lang), "missing {lang}");
        }
    }

    #[test]
    fn english_has_every_label() {
        let en = &translations()[DEFAULT_LANG];
        for label in ALL_LABELS {
            assert!(en.contains_key(label.key()), "missing {}", label.key());
        }
    }

    #[test]
    fn falls_back_to_english_per_key() {
        let it = Strings::for_language("it");
        assert_eq!(it.get(Label::Copy), "copia");
        assert_eq!(it.get(Label::Gmail), "Gmail");
    }

    #[test]
    fn unknown_language_is_english() {
        let s = Strings::for_language("tlh");
        assert_eq!(s.lang(), "en");
        assert_eq!(s.get(Label::Copied), "copied");
    }

    #[test]
    fn config_language_wins_when_supported() {
        assert_eq!(
            resolve_language(Some("de"), Some("fr-FR")),
            ("de", LanguageSource::Config)
        );
        assert_eq!(
            resolve_language(Some("xx"), Some("fr-FR")),
            ("fr", LanguageSource::Html)
        );
    }

    #[test]
    fn html_lang_matches_by_prefix() {
        assert_eq!(
            resolve_language(None, Some("pt_BR")),
            ("pt", LanguageSource::Html)
        );
        assert_eq!(
            resolve_language(None, Some("EN-gb")),
            ("en", LanguageSource::Html)
        );
        assert_eq!(
            resolve_language(None, Some("ja")),
            ("en", LanguageSource::Default)
        );
        assert_eq!(resolve_language(None, None), ("en", LanguageSource::Default));
    }
}
