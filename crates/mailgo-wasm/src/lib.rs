//! Browser binding for mailgo.
//!
//! This crate wires `mailgo-core` to a real page: it builds the two modal
//! containers with `web-sys`, listens for clicks and key presses, and exposes
//! the JavaScript entry points.
//!
//! # Building
//!
//! ```bash
//! # Using wasm-pack (recommended)
//! wasm-pack build crates/mailgo-wasm --target web
//!
//! # Using cargo directly
//! cargo build --target wasm32-unknown-unknown -p mailgo-wasm --release
//! ```
//!
//! # Usage
//!
//! ```javascript
//! import init, { mailgo, mailgoDirectRender } from './mailgo_wasm.js';
//!
//! await init();
//! mailgo({ dark: true, actions: { skype: false } });
//!
//! document.querySelector('#write-us').addEventListener('click', () => {
//!     mailgoDirectRender('mailto:hello@example.com?subject=Hi');
//! });
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

// ──────────────────────────────────────────────────────────────────────────────
// Shared types (WASM-compatible)
// ──────────────────────────────────────────────────────────────────────────────

use mailgo_core::{
    ActiveMatch, ContactKind, FormFactor, InstallMode, LanguageSource, LinkElement, Settings,
    classify_element,
};
use serde::{Deserialize, Serialize};

/// Stylesheet injected as `<style id="mailgo-style">` unless `loadCSS` is off.
pub const MAILGO_CSS: &str = include_str!("../assets/mailgo.css");

/// Name of the page-global configuration object.
pub const PAGE_CONFIG_GLOBAL: &str = "mailgoConfig";

/// Why initialization did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// `desktop: false` on a desktop, or `mobile: false` on a phone.
    FormFactor,
    /// `mailto`, `tel` and `sms` are all off.
    NoKindEnabled,
    /// mailgo is already running on this page.
    AlreadyInstalled,
}

/// Returned to JS by `mailgo(config)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
    pub installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    pub lang: String,
    pub lang_source: LanguageSource,
    pub form_factor: FormFactor,
    /// Set when installation waits for a document event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferred_until: Option<String>,
}

/// Decides whether mailgo should install at all.
pub const fn install_gate(settings: &Settings, form_factor: FormFactor) -> Result<(), SkipReason> {
    if !settings.allows(form_factor) {
        return Err(SkipReason::FormFactor);
    }
    if !settings.any_kind_enabled() {
        return Err(SkipReason::NoKindEnabled);
    }
    Ok(())
}

/// What an initialization request should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallPlan {
    Skip(SkipReason),
    /// Wait for the named document event.
    Defer(String),
    Now,
}

/// Plans an initialization.
///
/// `mailgo(config)` honors `initEvent`; a direct render needs the modals
/// right away and passes `honor_init_event = false`.
#[must_use]
pub fn install_plan(
    settings: &Settings,
    form_factor: FormFactor,
    already_installed: bool,
    honor_init_event: bool,
) -> InstallPlan {
    if already_installed {
        return InstallPlan::Skip(SkipReason::AlreadyInstalled);
    }
    if let Err(reason) = install_gate(settings, form_factor) {
        return InstallPlan::Skip(reason);
    }
    match &settings.init_event {
        Some(event) if honor_init_event => InstallPlan::Defer(event.clone()),
        _ => InstallPlan::Now,
    }
}

/// `type` value for SMS links, which share the tel modal.
pub const SMS_TYPE: &str = "mailgo-sms";

/// What `getMailgoTypeByElement` returns.
///
/// `type` is `mailgo`, `mailgo-tel` or `mailgo-sms`; `installation` is
/// `classic` or `less-spam`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailgoType {
    #[serde(rename = "type")]
    pub modal: String,
    pub installation: String,
    pub kind: ContactKind,
}

impl From<ActiveMatch> for MailgoType {
    fn from(found: ActiveMatch) -> Self {
        let modal = match found.kind {
            ContactKind::Sms => SMS_TYPE,
            kind => mailgo_core::scaffold::container_id(mailgo_core::ModalGroup::for_kind(kind)),
        };
        Self {
            modal: modal.to_string(),
            installation: match found.mode {
                InstallMode::Classic => "classic",
                InstallMode::AttributeBased => "less-spam",
            }
            .to_string(),
            kind: found.kind,
        }
    }
}

/// Type of any element that looks like a mailgo link, whether or not its
/// kind is enabled.
pub fn mailgo_type_of<E: LinkElement + ?Sized>(element: &E) -> Option<MailgoType> {
    classify_element(element).map(MailgoType::from)
}

// ──────────────────────────────────────────────────────────────────────────────
// Native-only exports (for testing)
// ──────────────────────────────────────────────────────────────────────────────

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    //! The configuration path of `mailgo(config)`, minus the JS values.

    use mailgo_core::{MailgoConfig, Settings};

    /// Resolves settings from the passed and page-global JSON objects.
    pub fn resolve_settings(passed: &str, page_global: Option<&str>) -> mailgo_core::Result<Settings> {
        let passed = MailgoConfig::from_json(passed)?;
        let global = page_global.map(MailgoConfig::from_json).transpose()?;
        Ok(Settings::resolve(&passed.merge_page_global(global)))
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
