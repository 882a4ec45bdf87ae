//! The single in-flight opening: which modal, for which match, with what data.

use serde::{Deserialize, Serialize};

use crate::classify::{ActiveMatch, ContactKind};
use crate::extract::ParameterBundle;

/// The two modal dialogs. SMS matches share the telephone modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalGroup {
    Mail,
    Tel,
}

impl ModalGroup {
    #[must_use]
    pub const fn for_kind(kind: ContactKind) -> Self {
        if kind.uses_tel_modal() {
            Self::Tel
        } else {
            Self::Mail
        }
    }

    #[must_use]
    pub const fn showing(self) -> ModalState {
        match self {
            Self::Mail => ModalState::ShowingMail,
            Self::Tel => ModalState::ShowingTel,
        }
    }
}

/// Visibility of the modals. At most one is ever showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Hidden,
    ShowingMail,
    ShowingTel,
}

impl ModalState {
    #[must_use]
    pub const fn group(self) -> Option<ModalGroup> {
        match self {
            Self::Hidden => None,
            Self::ShowingMail => Some(ModalGroup::Mail),
            Self::ShowingTel => Some(ModalGroup::Tel),
        }
    }

    #[must_use]
    pub const fn is_showing(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Data for the modal currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub active: ActiveMatch,
    pub bundle: ParameterBundle,
    /// The href of the clicked element, or the rendered URL.
    pub href: Option<String>,
    pub dark: bool,
}

impl Session {
    #[must_use]
    pub const fn new(
        active: ActiveMatch,
        bundle: ParameterBundle,
        href: Option<String>,
        dark: bool,
    ) -> Self {
        Self {
            active,
            bundle,
            href,
            dark,
        }
    }

    #[must_use]
    pub const fn group(&self) -> ModalGroup {
        ModalGroup::for_kind(self.active.kind)
    }
}
