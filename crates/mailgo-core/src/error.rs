//! Error types for mailgo
//!
//! Nothing in this crate is fatal to the host page. Most of these errors end
//! up as a suppressed click or an ignored keystroke; the categories exist so
//! the caller can tell a dead click from a programming mistake.

use thiserror::Error;

use crate::classify::ContactKind;
use crate::dispatch::Action;

/// Result type alias for mailgo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mailgo
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Extraction Errors
    // ==========================================================================
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address list: {0}")]
    InvalidAddress(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Unrecognized contact URL: {0}")]
    UnrecognizedUrl(String),

    #[error("Obfuscated address could not be decoded: {0}")]
    AddressDecode(String),

    // ==========================================================================
    // Modal State Errors
    // ==========================================================================
    #[error("A mailgo modal is already showing")]
    ModalBusy,

    #[error("No mailgo modal is showing")]
    NoActiveModal,

    #[error("Action '{action}' is not available for a {kind} contact")]
    ActionUnavailable { action: Action, kind: ContactKind },

    #[error("Action '{0}' is disabled by configuration")]
    ActionDisabled(Action),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error category string
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidAddress(_) | Self::InvalidPhone(_) => "VALIDATION_FAILED",
            Self::UnrecognizedUrl(_) => "UNRECOGNIZED_URL",
            Self::AddressDecode(_) => "DECODE_FAILED",
            Self::ModalBusy => "MODAL_BUSY",
            Self::NoActiveModal => "NO_ACTIVE_MODAL",
            Self::ActionUnavailable { .. } => "ACTION_UNAVAILABLE",
            Self::ActionDisabled(_) => "ACTION_DISABLED",
            Self::Config(_) => "INVALID_CONFIG",
        }
    }

    /// Whether the page-wide listener should swallow this error: the click
    /// stays suppressed and no modal is shown.
    #[must_use]
    pub const fn is_silent_drop(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidAddress(_) | Self::InvalidPhone(_)
        )
    }
}
