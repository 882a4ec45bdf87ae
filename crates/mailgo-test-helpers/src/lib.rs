//! Shared test helpers for mailgo.
//!
//! - [`FakeNode`]: an immutable in-memory element tree implementing
//!   `LinkElement` and `DomNode`
//! - [`RecordingSurface`]: a `ModalSurface` that keeps per-modal state and a
//!   call log instead of touching a DOM
//! - [`RecordingPlatform`]: a `Platform` that records opened URLs,
//!   navigations and clipboard writes

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Once;

use mailgo_core::{
    DomNode, LinkElement, ModalController, ModalGroup, ModalSkeleton, ModalSurface, ModalView,
    Platform, Settings, Strings,
};

/// Installs a test-writer `tracing` subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `mailgo_core=debug`.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mailgo_core=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}

// ──────────────────────────────────────────────────────────────────────────────
// Fake DOM
// ──────────────────────────────────────────────────────────────────────────────

struct NodeData {
    tag: &'static str,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    parent: Option<FakeNode>,
    root: bool,
}

/// Cheap handle to a fake element. Equality is identity.
#[derive(Clone)]
pub struct FakeNode(Rc<NodeData>);

impl FakeNode {
    /// The `<html>` element.
    #[must_use]
    pub fn html() -> Self {
        Self(Rc::new(NodeData {
            tag: "html",
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            parent: None,
            root: true,
        }))
    }

    /// `<html><body>`; returns the body.
    #[must_use]
    pub fn body() -> Self {
        Self::html().child("body").build()
    }

    /// Starts a child element of `self`.
    #[must_use]
    pub fn child(&self, tag: &'static str) -> NodeBuilder {
        NodeBuilder {
            tag,
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            parent: Some(self.clone()),
        }
    }

    /// A detached element with no parent and no document root above it.
    #[must_use]
    pub fn detached(tag: &'static str) -> NodeBuilder {
        NodeBuilder {
            tag,
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            parent: None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.0.tag
    }
}

impl PartialEq for FakeNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for FakeNode {}

impl fmt::Debug for FakeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.0.tag)?;
        for (name, value) in &self.0.attrs {
            write!(f, " {name}=\"{value}\"")?;
        }
        if !self.0.classes.is_empty() {
            write!(f, " class=\"{}\"", self.0.classes.join(" "))?;
        }
        f.write_str(">")
    }
}

impl LinkElement for FakeNode {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.attrs.get(name).cloned()
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.classes.iter().any(|c| c == class)
    }
}

impl DomNode for FakeNode {
    fn parent(&self) -> Option<Self> {
        self.0.parent.clone()
    }

    fn is_document_root(&self) -> bool {
        self.0.root
    }
}

pub struct NodeBuilder {
    tag: &'static str,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    parent: Option<FakeNode>,
}

impl NodeBuilder {
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn href(self, href: &str) -> Self {
        self.attr("href", href)
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> FakeNode {
        FakeNode(Rc::new(NodeData {
            tag: self.tag,
            attrs: self.attrs,
            classes: self.classes,
            parent: self.parent,
            root: false,
        }))
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Recording surface
// ──────────────────────────────────────────────────────────────────────────────

/// One `ModalSurface` call, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Build(ModalGroup),
    Render(ModalGroup),
    SetDark(ModalGroup, bool),
    Show(ModalGroup),
    Hide(ModalGroup),
    SetCopyLabel(ModalGroup, String),
    Focus(FakeNode),
}

/// What a real DOM would hold for one modal container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalRecord {
    pub skeleton: Option<ModalSkeleton>,
    pub visible: bool,
    pub aria_hidden: bool,
    pub dark: bool,
    pub view: Option<ModalView>,
    pub copy_label: Option<String>,
    pub telegram_visible: bool,
}

impl ModalRecord {
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.skeleton.is_some()
    }
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub mail: ModalRecord,
    pub tel: ModalRecord,
    /// The element with focus; `None` while focus sits inside a modal.
    pub focused: Option<FakeNode>,
    pub calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    /// A surface whose page already contains both modal containers, as
    /// after an earlier initialization.
    #[must_use]
    pub fn prebuilt(settings: &Settings) -> Self {
        let strings = Strings::default();
        let mut surface = Self::default();
        for group in [ModalGroup::Mail, ModalGroup::Tel] {
            surface.record_mut(group).skeleton = Some(mailgo_core::scaffold::modal_skeleton(
                group, &strings, settings,
            ));
        }
        surface
    }

    #[must_use]
    pub const fn record(&self, group: ModalGroup) -> &ModalRecord {
        match group {
            ModalGroup::Mail => &self.mail,
            ModalGroup::Tel => &self.tel,
        }
    }

    pub const fn record_mut(&mut self, group: ModalGroup) -> &mut ModalRecord {
        match group {
            ModalGroup::Mail => &mut self.mail,
            ModalGroup::Tel => &mut self.tel,
        }
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        usize::from(self.mail.visible) + usize::from(self.tel.visible)
    }

    #[must_use]
    pub fn build_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Build(_)))
            .count()
    }
}

impl ModalSurface for RecordingSurface {
    type Focus = FakeNode;

    fn is_built(&self, group: ModalGroup) -> bool {
        self.record(group).is_built()
    }

    fn build(&mut self, skeleton: &ModalSkeleton) {
        self.calls.push(SurfaceCall::Build(skeleton.group));
        let record = self.record_mut(skeleton.group);
        record.skeleton = Some(skeleton.clone());
        record.aria_hidden = true;
    }

    fn render(&mut self, view: &ModalView) {
        self.calls.push(SurfaceCall::Render(view.group));
        let record = self.record_mut(view.group);
        record.telegram_visible = view.show_telegram;
        record.view = Some(view.clone());
    }

    fn set_dark(&mut self, group: ModalGroup, dark: bool) {
        self.calls.push(SurfaceCall::SetDark(group, dark));
        self.record_mut(group).dark = dark;
    }

    fn show(&mut self, group: ModalGroup) {
        self.calls.push(SurfaceCall::Show(group));
        let record = self.record_mut(group);
        record.visible = true;
        record.aria_hidden = false;
        self.focused = None;
    }

    fn hide(&mut self, group: ModalGroup) {
        self.calls.push(SurfaceCall::Hide(group));
        let record = self.record_mut(group);
        record.visible = false;
        record.aria_hidden = true;
    }

    fn set_copy_label(&mut self, group: ModalGroup, text: &str) {
        self.calls
            .push(SurfaceCall::SetCopyLabel(group, text.to_string()));
        self.record_mut(group).copy_label = Some(text.to_string());
    }

    fn active_element(&self) -> Option<FakeNode> {
        self.focused.clone()
    }

    fn focus(&mut self, target: &FakeNode) {
        self.calls.push(SurfaceCall::Focus(target.clone()));
        self.focused = Some(target.clone());
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Recording platform
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingPlatform {
    pub opened: Vec<String>,
    pub navigated: Vec<String>,
    pub clipboard: Option<String>,
}

impl Platform for RecordingPlatform {
    fn open_detached(&mut self, url: &str) {
        tracing::debug!(url, "open detached");
        self.opened.push(url.to_string());
    }

    fn navigate(&mut self, url: &str) {
        tracing::debug!(url, "navigate");
        self.navigated.push(url.to_string());
    }

    fn copy_text(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }
}

pub type TestController = ModalController<RecordingSurface, RecordingPlatform>;

/// An initialized controller over a fresh recording surface, in English.
#[must_use]
pub fn controller(settings: Settings) -> TestController {
    init_test_logging();
    let mut controller = ModalController::new(
        settings,
        Strings::default(),
        RecordingSurface::default(),
        RecordingPlatform::default(),
    );
    controller.init();
    controller
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_links_parents() {
        let body = FakeNode::body();
        let link = body.child("a").href("tel:5551234").class("dark").build();
        assert_eq!(link.parent(), Some(body.clone()));
        assert_eq!(body.parent().map(|h| h.tag()), Some("html"));
        assert!(body.parent().unwrap().is_document_root());
        assert_eq!(link.href().as_deref(), Some("tel:5551234"));
        assert!(link.has_class("dark"));
    }

    #[test]
    fn identity_equality() {
        let body = FakeNode::body();
        let a = body.child("a").build();
        let b = body.child("a").build();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn debug_looks_like_markup() {
        let node = FakeNode::detached("a").href("#mailgo").class("mailgo").build();
        assert_eq!(format!("{node:?}"), "<a href=\"#mailgo\" class=\"mailgo\">");
    }

    #[test]
    fn controller_starts_with_both_modals_built() {
        let c = controller(Settings::default());
        assert!(c.surface().mail.is_built());
        assert!(c.surface().tel.is_built());
        assert_eq!(c.surface().visible_count(), 0);
    }
}
