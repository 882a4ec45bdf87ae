//! Keyboard shortcuts while a modal is showing.

use crate::dispatch::Action;
use crate::session::{ModalGroup, ModalState};

/// What a key press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    Close,
    Dispatch(Action),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Any,
    Only(ModalGroup),
}

impl Scope {
    fn covers(self, group: ModalGroup) -> bool {
        match self {
            Self::Any => true,
            Self::Only(only) => only == group,
        }
    }
}

/// `KeyboardEvent.key` values, compared ignoring ASCII case.
const BINDINGS: &[(Scope, &[&str], KeyCommand)] = &[
    (Scope::Any, &["Escape", "Esc"], KeyCommand::Close),
    (
        Scope::Any,
        &["Enter", " ", "Spacebar"],
        KeyCommand::Dispatch(Action::OpenDefault),
    ),
    (Scope::Any, &["c"], KeyCommand::Dispatch(Action::Copy)),
    (
        Scope::Only(ModalGroup::Mail),
        &["g"],
        KeyCommand::Dispatch(Action::Gmail),
    ),
    (
        Scope::Only(ModalGroup::Mail),
        &["o"],
        KeyCommand::Dispatch(Action::Outlook),
    ),
    (
        Scope::Only(ModalGroup::Mail),
        &["y"],
        KeyCommand::Dispatch(Action::Yahoo),
    ),
    (
        Scope::Only(ModalGroup::Tel),
        &["t"],
        KeyCommand::Dispatch(Action::Telegram),
    ),
    (
        Scope::Only(ModalGroup::Tel),
        &["w"],
        KeyCommand::Dispatch(Action::WhatsApp),
    ),
    (
        Scope::Only(ModalGroup::Tel),
        &["s"],
        KeyCommand::Dispatch(Action::Skype),
    ),
];

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    /// Shift alone still counts as a plain press (`C` copies too).
    #[must_use]
    pub const fn is_chord(self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

/// Resolves a key press against the modal that is showing.
///
/// Returns `None` when nothing is showing, when a modifier chord is held, or
/// when the key is unbound for that modal.
#[must_use]
pub fn lookup(state: ModalState, key: &str, modifiers: Modifiers) -> Option<KeyCommand> {
    let group = state.group()?;
    if modifiers.is_chord() {
        return None;
    }
    BINDINGS
        .iter()
        .find(|(scope, keys, _)| {
            scope.covers(group) && keys.iter().any(|k| k.eq_ignore_ascii_case(key))
        })
        .map(|(_, _, command)| *command)
}

/// Whether the browser turns `key` into a click on a focused link.
///
/// Space is not one of them, so it still reaches [`lookup`].
#[must_use]
pub fn activates_focused_control(key: &str) -> bool {
    key == "Enter"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(state: ModalState, key: &str) -> Option<KeyCommand> {
        lookup(state, key, Modifiers::default())
    }

    #[test]
    fn hidden_never_matches() {
        for key in ["Escape", "Enter", "c", "g", "t"] {
            assert_eq!(plain(ModalState::Hidden, key), None, "{key}");
        }
    }

    #[test]
    fn shared_bindings() {
        for state in [ModalState::ShowingMail, ModalState::ShowingTel] {
            assert_eq!(plain(state, "Escape"), Some(KeyCommand::Close));
            assert_eq!(plain(state, "Esc"), Some(KeyCommand::Close));
            assert_eq!(
                plain(state, "Enter"),
                Some(KeyCommand::Dispatch(Action::OpenDefault))
            );
            assert_eq!(
                plain(state, " "),
                Some(KeyCommand::Dispatch(Action::OpenDefault))
            );
            assert_eq!(plain(state, "C"), Some(KeyCommand::Dispatch(Action::Copy)));
        }
    }

    #[test]
    fn webmail_keys_only_in_mail_modal() {
        assert_eq!(
            plain(ModalState::ShowingMail, "g"),
            Some(KeyCommand::Dispatch(Action::Gmail))
        );
        assert_eq!(
            plain(ModalState::ShowingMail, "Y"),
            Some(KeyCommand::Dispatch(Action::Yahoo))
        );
        assert_eq!(plain(ModalState::ShowingTel, "g"), None);
        assert_eq!(plain(ModalState::ShowingTel, "o"), None);
    }

    #[test]
    fn messenger_keys_only_in_tel_modal() {
        assert_eq!(
            plain(ModalState::ShowingTel, "w"),
            Some(KeyCommand::Dispatch(Action::WhatsApp))
        );
        assert_eq!(
            plain(ModalState::ShowingTel, "t"),
            Some(KeyCommand::Dispatch(Action::Telegram))
        );
        assert_eq!(
            plain(ModalState::ShowingTel, "s"),
            Some(KeyCommand::Dispatch(Action::Skype))
        );
        assert_eq!(plain(ModalState::ShowingMail, "w"), None);
    }

    #[test]
    fn chords_are_ignored() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        assert_eq!(lookup(ModalState::ShowingMail, "c", ctrl), None);

        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert_eq!(
            lookup(ModalState::ShowingMail, "C", shift),
            Some(KeyCommand::Dispatch(Action::Copy))
        );
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(plain(ModalState::ShowingMail, "x"), None);
        assert_eq!(plain(ModalState::ShowingMail, "Tab"), None);
    }

    #[test]
    fn only_enter_activates_a_focused_link() {
        assert!(activates_focused_control("Enter"));
        assert!(!activates_focused_control(" "));
        assert!(!activates_focused_control("Spacebar"));
        assert!(!activates_focused_control("Escape"));
        // Space on a focused button still opens the default handler.
        assert_eq!(
            plain(ModalState::ShowingTel, " "),
            Some(KeyCommand::Dispatch(Action::OpenDefault))
        );
    }
}
