//! Modal state machine.
//!
//! [`ModalController`] owns the session, the visibility state and the saved
//! focus target. DOM work goes through a [`ModalSurface`]; escape actions go
//! through a [`Platform`]. Both are supplied by the host.

use serde::Serialize;

use crate::classify::{ActiveMatch, DARK_CLASS, LinkElement, classify_url};
use crate::config::Settings;
use crate::dispatch::{Action, Effect, plan};
use crate::error::{Error, Result};
use crate::extract::{ParameterBundle, extract_from_element, extract_from_url};
use crate::i18n::{Label, Strings};
use crate::keymap::{KeyCommand, Modifiers, lookup};
use crate::scaffold::{ModalSkeleton, ModalView, modal_skeleton, modal_view};
use crate::session::{ModalGroup, ModalState, Session};

/// How long the "copied" label stays before the modal closes.
pub const COPY_CONFIRM_DELAY_MS: u32 = 999;

/// DOM side of the modals.
pub trait ModalSurface {
    /// Handle to a focusable element, kept while a modal is open.
    type Focus;

    /// Whether a container for `group` already exists in the page.
    fn is_built(&self, group: ModalGroup) -> bool;

    /// Creates the container, hidden, at the end of the body.
    fn build(&mut self, skeleton: &ModalSkeleton);

    /// Fills title and detail rows; rows without lines are hidden.
    fn render(&mut self, view: &ModalView);

    fn set_dark(&mut self, group: ModalGroup, dark: bool);

    /// Makes the container visible and arms the focus trap.
    fn show(&mut self, group: ModalGroup);

    /// Hides the container and releases the focus trap.
    fn hide(&mut self, group: ModalGroup);

    fn set_copy_label(&mut self, group: ModalGroup, text: &str);

    fn active_element(&self) -> Option<Self::Focus>;

    fn focus(&mut self, target: &Self::Focus);
}

/// Escape hatches out of the page.
pub trait Platform {
    /// New browsing context with no opener and no referrer.
    fn open_detached(&mut self, url: &str);

    fn navigate(&mut self, url: &str);

    fn copy_text(&mut self, text: &str);
}

/// What the host must do after a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The modal is already hidden.
    Closed,
    /// Call [`ModalController::finish_copy`] after `delay_ms`.
    CopyPending { group: ModalGroup, delay_ms: u32 },
}

pub struct ModalController<S: ModalSurface, P: Platform> {
    settings: Settings,
    strings: Strings,
    surface: S,
    platform: P,
    state: ModalState,
    session: Option<Session>,
    saved_focus: Option<S::Focus>,
    initialized: bool,
}

impl<S: ModalSurface, P: Platform> ModalController<S, P> {
    pub const fn new(settings: Settings, strings: Strings, surface: S, platform: P) -> Self {
        Self {
            settings,
            strings,
            surface,
            platform,
            state: ModalState::Hidden,
            session: None,
            saved_focus: None,
            initialized: false,
        }
    }

    /// Builds any modal container that is not already in the page.
    ///
    /// Safe to call repeatedly; returns how many containers were built.
    pub fn init(&mut self) -> usize {
        let mut built = 0;
        for group in [ModalGroup::Mail, ModalGroup::Tel] {
            if self.surface.is_built(group) {
                tracing::debug!(?group, "modal already in page, skipping build");
                continue;
            }
            let skeleton = modal_skeleton(group, &self.strings, &self.settings);
            self.surface.build(&skeleton);
            built += 1;
        }
        if !self.initialized {
            tracing::info!(
                lang = self.strings.lang(),
                mailto = self.settings.mailto,
                tel = self.settings.tel,
                sms = self.settings.sms,
                built,
                "mailgo initialized"
            );
        }
        self.initialized = true;
        built
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub const fn state(&self) -> ModalState {
        self.state
    }

    #[must_use]
    pub const fn is_showing(&self) -> bool {
        self.state.is_showing()
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn strings(&self) -> &Strings {
        &self.strings
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    pub const fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Shows the modal for a freshly extracted bundle.
    ///
    /// The whole session is replaced before anything is rendered. Fails with
    /// [`Error::ModalBusy`] while another modal is showing.
    pub fn open(
        &mut self,
        active: ActiveMatch,
        bundle: ParameterBundle,
        href: Option<String>,
        element_dark: bool,
    ) -> Result<ModalGroup> {
        if self.state.is_showing() {
            return Err(Error::ModalBusy);
        }
        self.init();

        let dark = self.settings.dark || element_dark;
        let session = Session::new(active, bundle, href, dark);
        let group = session.group();
        let view = modal_view(&session);
        self.session = Some(session);

        self.saved_focus = self.surface.active_element();
        self.surface.set_dark(group, dark);
        self.surface
            .set_copy_label(group, self.strings.get(Label::Copy));
        self.surface.render(&view);
        self.surface.show(group);
        self.state = group.showing();

        tracing::debug!(kind = %active.kind, mode = ?active.mode, dark, "modal opened");
        Ok(group)
    }

    /// Extracts from `element` and opens the matching modal.
    pub fn open_from_element<E: LinkElement + ?Sized>(
        &mut self,
        active: ActiveMatch,
        element: &E,
    ) -> Result<ModalGroup> {
        if self.state.is_showing() {
            return Err(Error::ModalBusy);
        }
        let bundle = extract_from_element(active, element, &self.settings)?;
        let dark = element.has_class(DARK_CLASS);
        self.open(active, bundle, element.href(), dark)
    }

    /// Renders a modal for a bare contact URL, without any click.
    ///
    /// Returns whether the URL has a contact scheme. A recognized URL whose
    /// data fails validation still returns `true` but shows nothing.
    pub fn direct_render(&mut self, url: &str) -> bool {
        if classify_url(url).is_none() {
            tracing::debug!(url, "direct render: not a contact URL");
            return false;
        }
        let result = extract_from_url(url, &self.settings).and_then(|(active, bundle)| {
            self.open(active, bundle, Some(url.trim().to_string()), false)
        });
        if let Err(e) = result {
            tracing::warn!(url, error = %e, "direct render dropped");
        }
        true
    }

    /// Hides whatever is showing and gives focus back.
    ///
    /// Returns `false` when nothing was showing.
    pub fn close(&mut self) -> bool {
        let Some(group) = self.state.group() else {
            return false;
        };
        self.surface.hide(group);
        self.state = ModalState::Hidden;
        self.session = None;
        if let Some(target) = self.saved_focus.take() {
            self.surface.focus(&target);
        }
        tracing::debug!(?group, "modal closed");
        true
    }

    /// Performs `action` against the active session.
    pub fn dispatch(&mut self, action: Action) -> Result<DispatchOutcome> {
        let session = self.session.as_ref().ok_or(Error::NoActiveModal)?;
        if !self.settings.action_enabled(action) {
            return Err(Error::ActionDisabled(action));
        }
        let group = session.group();
        match plan(action, session)? {
            Effect::OpenDetached(url) => self.platform.open_detached(&url),
            Effect::Navigate(url) => self.platform.navigate(&url),
            Effect::Copy(text) => {
                self.platform.copy_text(&text);
                self.surface
                    .set_copy_label(group, self.strings.get(Label::Copied));
                return Ok(DispatchOutcome::CopyPending {
                    group,
                    delay_ms: COPY_CONFIRM_DELAY_MS,
                });
            }
        }
        self.close();
        Ok(DispatchOutcome::Closed)
    }

    /// Timer callback after a copy: restores the label and closes.
    pub fn finish_copy(&mut self, group: ModalGroup) {
        self.surface
            .set_copy_label(group, self.strings.get(Label::Copy));
        if self.state.group() == Some(group) {
            self.close();
        }
    }

    /// Runs the keyboard shortcut for `key`, if there is one.
    ///
    /// Returns `None` when the key was not consumed.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<DispatchOutcome> {
        match lookup(self.state, key, modifiers)? {
            KeyCommand::Close => {
                self.close();
                Some(DispatchOutcome::Closed)
            }
            KeyCommand::Dispatch(action) => match self.dispatch(action) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    tracing::debug!(%action, error = %e, "shortcut ignored");
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ContactKind;
    use crate::extract::TelBundle;

    #[derive(Default)]
    struct Quiet {
        built: Vec<ModalGroup>,
        shown: Option<ModalGroup>,
        copy_label: String,
    }

    impl ModalSurface for Quiet {
        type Focus = ();

        fn is_built(&self, group: ModalGroup) -> bool {
            self.built.contains(&group)
        }

        fn build(&mut self, skeleton: &ModalSkeleton) {
            self.built.push(skeleton.group);
        }

        fn render(&mut self, _view: &ModalView) {}

        fn set_dark(&mut self, _group: ModalGroup, _dark: bool) {}

        fn show(&mut self, group: ModalGroup) {
            self.shown = Some(group);
        }

        fn hide(&mut self, _group: ModalGroup) {
            self.shown = None;
        }

        fn set_copy_label(&mut self, _group: ModalGroup, text: &str) {
            self.copy_label = text.to_string();
        }

        fn active_element(&self) -> Option<()> {
            None
        }

        fn focus(&mut self, _target: &()) {}
    }

    #[derive(Default)]
    struct Sink(Vec<String>);

    impl Platform for Sink {
        fn open_detached(&mut self, url: &str) {
            self.0.push(url.to_string());
        }

        fn navigate(&mut self, url: &str) {
            self.0.push(url.to_string());
        }

        fn copy_text(&mut self, text: &str) {
            self.0.push(text.to_string());
        }
    }

    fn controller() -> ModalController<Quiet, Sink> {
        ModalController::new(
            Settings::default(),
            Strings::default(),
            Quiet::default(),
            Sink::default(),
        )
    }

    fn tel() -> ParameterBundle {
        ParameterBundle::Tel(TelBundle {
            phone: "5551234".into(),
            message: None,
            telegram: None,
            skype: None,
        })
    }

    #[test]
    fn init_builds_each_modal_once() {
        let mut c = controller();
        assert_eq!(c.init(), 2);
        assert_eq!(c.init(), 0);
        assert_eq!(c.surface().built.len(), 2);
    }

    #[test]
    fn second_open_is_busy() {
        let mut c = controller();
        let tel_match = ActiveMatch::classic(ContactKind::Tel);
        c.open(tel_match, tel(), None, false).unwrap();
        let err = c.open(tel_match, tel(), None, false).unwrap_err();
        assert!(matches!(err, Error::ModalBusy));
        assert_eq!(c.state(), ModalState::ShowingTel);
    }

    #[test]
    fn close_is_idempotent() {
        let mut c = controller();
        assert!(!c.close());
        c.open(ActiveMatch::classic(ContactKind::Sms), tel(), None, false)
            .unwrap();
        assert!(c.close());
        assert!(!c.close());
        assert!(c.session().is_none());
    }

    #[test]
    fn dispatch_needs_an_open_modal() {
        let mut c = controller();
        assert!(matches!(
            c.dispatch(Action::Copy),
            Err(Error::NoActiveModal)
        ));
    }

    #[test]
    fn copy_waits_for_the_timer() {
        let mut c = controller();
        c.open(ActiveMatch::classic(ContactKind::Tel), tel(), None, false)
            .unwrap();
        let outcome = c.dispatch(Action::Copy).unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::CopyPending {
                group: ModalGroup::Tel,
                delay_ms: COPY_CONFIRM_DELAY_MS
            }
        );
        assert!(c.is_showing());
        assert_eq!(c.surface().copy_label, "copied");

        c.finish_copy(ModalGroup::Tel);
        assert!(!c.is_showing());
        assert_eq!(c.surface().copy_label, "copy");
    }

    #[test]
    fn direct_render_reports_recognition() {
        let mut c = controller();
        assert!(!c.direct_render("https://example.com"));
        assert!(c.direct_render("tel:abc"));
        assert!(!c.is_showing());
        assert!(c.direct_render("tel:5551234"));
        assert_eq!(c.state(), ModalState::ShowingTel);
    }

    #[test]
    fn escape_closes() {
        let mut c = controller();
        c.open(ActiveMatch::classic(ContactKind::Tel), tel(), None, false)
            .unwrap();
        assert_eq!(
            c.handle_key("Escape", Modifiers::default()),
            Some(DispatchOutcome::Closed)
        );
        assert_eq!(c.handle_key("Escape", Modifiers::default()), None);
    }
}
