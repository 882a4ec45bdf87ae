//! Configuration for mailgo
//!
//! Configuration arrives as a loosely shaped JS object, either passed to the
//! initializer or set globally on the page as `window.mailgoConfig`. Both are
//! deserialized into [`MailgoConfig`] (every field optional), merged field by
//! field with the page-global object taking precedence, and resolved into
//! [`Settings`] with explicit defaults.

use serde::{Deserialize, Serialize};

use crate::classify::ContactKind;
use crate::device::FormFactor;
use crate::dispatch::Action;

/// Per-action enable switches. Absent means enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionToggles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmail: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlook: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yahoo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skype: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

impl ActionToggles {
    #[must_use]
    pub const fn get(&self, action: Action) -> Option<bool> {
        match action {
            Action::Gmail => self.gmail,
            Action::Outlook => self.outlook,
            Action::Yahoo => self.yahoo,
            Action::Telegram => self.telegram,
            Action::WhatsApp => self.whatsapp,
            Action::Skype => self.skype,
            Action::Copy => self.copy,
            Action::OpenDefault => self.default,
        }
    }

    /// Overlays `over` on `self`, one action at a time.
    #[must_use]
    pub fn overlay(self, over: Self) -> Self {
        Self {
            gmail: over.gmail.or(self.gmail),
            outlook: over.outlook.or(self.outlook),
            yahoo: over.yahoo.or(self.yahoo),
            telegram: over.telegram.or(self.telegram),
            whatsapp: over.whatsapp.or(self.whatsapp),
            skype: over.skype.or(self.skype),
            copy: over.copy.or(self.copy),
            default: over.default.or(self.default),
        }
    }
}

/// Options for the deferred-initialization listener.
///
/// Mirrors `addEventListener`'s third argument: a bare boolean (capture) or
/// an options object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListenerOptions {
    Capture(bool),
    Options {
        #[serde(default)]
        capture: bool,
        #[serde(default)]
        once: bool,
        #[serde(default)]
        passive: bool,
    },
}

impl ListenerOptions {
    #[must_use]
    pub const fn capture(self) -> bool {
        match self {
            Self::Capture(capture) | Self::Options { capture, .. } => capture,
        }
    }

    #[must_use]
    pub const fn once(self) -> bool {
        matches!(self, Self::Options { once: true, .. })
    }

    #[must_use]
    pub const fn passive(self) -> bool {
        matches!(self, Self::Options { passive: true, .. })
    }
}

/// Raw configuration as supplied by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailgoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailto: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_tel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_footer: Option<bool>,
    #[serde(default, rename = "loadCSS", skip_serializing_if = "Option::is_none")]
    pub load_css: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<ActionToggles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener_options: Option<ListenerOptions>,
}

impl MailgoConfig {
    /// Parses a configuration object from JSON text.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Merges the page-global configuration over this one.
    ///
    /// Every option set on the page-global object wins; options it leaves
    /// unset keep the programmatic value. `actions` merges per action.
    #[must_use]
    pub fn merge_page_global(self, page_global: Option<Self>) -> Self {
        let Some(global) = page_global else {
            return self;
        };
        let actions = match (self.actions, global.actions) {
            (Some(base), Some(over)) => Some(base.overlay(over)),
            (base, over) => over.or(base),
        };
        Self {
            mailto: global.mailto.or(self.mailto),
            tel: global.tel.or(self.tel),
            sms: global.sms.or(self.sms),
            desktop: global.desktop.or(self.desktop),
            mobile: global.mobile.or(self.mobile),
            validate_email: global.validate_email.or(self.validate_email),
            validate_tel: global.validate_tel.or(self.validate_tel),
            show_footer: global.show_footer.or(self.show_footer),
            load_css: global.load_css.or(self.load_css),
            dark: global.dark.or(self.dark),
            actions,
            lang: global.lang.or(self.lang),
            init_event: global.init_event.or(self.init_event),
            listener_options: global.listener_options.or(self.listener_options),
        }
    }
}

/// Resolved configuration with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Settings {
    pub mailto: bool,
    pub tel: bool,
    pub sms: bool,
    pub desktop: bool,
    pub mobile: bool,
    pub validate_email: bool,
    pub validate_tel: bool,
    pub show_footer: bool,
    pub load_css: bool,
    /// Forces dark mode for every modal opening.
    pub dark: bool,
    pub actions: ActionToggles,
    pub lang: Option<String>,
    pub init_event: Option<String>,
    pub listener_options: Option<ListenerOptions>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&MailgoConfig::default())
    }
}

impl Settings {
    #[must_use]
    pub fn resolve(config: &MailgoConfig) -> Self {
        Self {
            mailto: config.mailto.unwrap_or(true),
            tel: config.tel.unwrap_or(true),
            sms: config.sms.unwrap_or(false),
            desktop: config.desktop.unwrap_or(true),
            mobile: config.mobile.unwrap_or(true),
            validate_email: config.validate_email.unwrap_or(true),
            validate_tel: config.validate_tel.unwrap_or(true),
            show_footer: config.show_footer.unwrap_or(true),
            load_css: config.load_css.unwrap_or(true),
            dark: config.dark.unwrap_or(false),
            actions: config.actions.clone().unwrap_or_default(),
            lang: config
                .lang
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            init_event: config
                .init_event
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
            listener_options: config.listener_options,
        }
    }

    /// Whether matches of `kind` should be intercepted.
    #[must_use]
    pub const fn kind_enabled(&self, kind: ContactKind) -> bool {
        match kind {
            ContactKind::Mail => self.mailto,
            ContactKind::Tel => self.tel,
            ContactKind::Sms => self.sms,
        }
    }

    /// Whether any kind is intercepted at all.
    #[must_use]
    pub const fn any_kind_enabled(&self) -> bool {
        self.mailto || self.tel || self.sms
    }

    #[must_use]
    pub const fn action_enabled(&self, action: Action) -> bool {
        !matches!(self.actions.get(action), Some(false))
    }

    /// The desktop/mobile initialization gate.
    #[must_use]
    pub const fn allows(&self, form_factor: FormFactor) -> bool {
        match form_factor {
            FormFactor::Desktop => self.desktop,
            FormFactor::Mobile => self.mobile,
        }
    }
}
