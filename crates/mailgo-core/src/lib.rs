//! Core logic for mailgo
//!
//! mailgo intercepts clicks on `mailto:`, `tel:`, `callto:` and `sms:` links
//! (and on obfuscated `#mailgo` placeholders) and shows a modal offering
//! webmail, messaging apps, copy-to-clipboard and the default OS handler.
//!
//! This crate provides:
//! - Validation, classification and parameter extraction
//! - The modal state machine (`ModalController`) behind host traits
//! - The action dispatcher that builds webmail and messenger URLs
//! - Typed configuration, translations and the keyboard table
//!
//! Nothing here touches a browser API; `mailgo-wasm` supplies the DOM.
//!
//! # Example
//!
//! ```
//! use mailgo_core::{Settings, extract_from_url, validate_emails, validate_tel};
//!
//! assert!(validate_emails(&["a@b.com", "c@d.org"]));
//! assert!(validate_tel("+1 (555) 123-4567"));
//!
//! let (active, _bundle) = extract_from_url("mailto:a@b.com?subject=Hi", &Settings::default())
//!     .unwrap();
//! assert_eq!(active.kind.as_str(), "mail");
//! ```

#![forbid(unsafe_code)]

pub mod classify;
pub mod config;
pub mod controller;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod focus;
pub mod i18n;
pub mod keymap;
pub mod listener;
pub mod scaffold;
pub mod session;
pub mod validate;

// Re-export key types for convenience
pub use classify::{
    ActiveMatch, ContactKind, InstallMode, LinkElement, classify_element, classify_url,
};
pub use config::{ActionToggles, ListenerOptions, MailgoConfig, Settings};
pub use controller::{
    COPY_CONFIRM_DELAY_MS, DispatchOutcome, ModalController, ModalSurface, Platform,
};
pub use device::FormFactor;
pub use dispatch::{Action, Effect, plan};
pub use error::{Error, Result};
pub use extract::{MailBundle, ParameterBundle, TelBundle, extract_from_element, extract_from_url};
pub use i18n::{Label, LanguageSource, Strings, resolve_language};
pub use focus::tab_target;
pub use keymap::{KeyCommand, Modifiers, activates_focused_control};
pub use listener::{
    AncestorPath, ClickOutcome, DomNode, ParentChainWalk, enabled_match, handle_click, on_click,
};
pub use scaffold::{ButtonSpec, DetailRow, LabelPart, ModalSkeleton, ModalView, RowSpec};
pub use session::{ModalGroup, ModalState, Session};
pub use validate::{validate_email, validate_emails, validate_tel};
