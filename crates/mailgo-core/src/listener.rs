//! Page-wide click handling.
//!
//! The host attaches one document-level click listener and hands each event
//! target here. The target's ancestor path is walked outward; the first
//! element that classifies with an enabled kind wins.

use serde::Serialize;

use crate::classify::{ActiveMatch, LinkElement, classify_element};
use crate::config::Settings;
use crate::controller::{ModalController, ModalSurface, Platform};
use crate::session::ModalGroup;

/// A node in the page tree.
pub trait DomNode: LinkElement + Sized {
    fn parent(&self) -> Option<Self>;

    /// True for the `<html>` element, where walking stops.
    fn is_document_root(&self) -> bool;
}

/// Produces the path from an event target outward.
pub trait AncestorPath {
    fn ancestors<N: DomNode>(&self, target: N) -> Vec<N>;
}

/// Follows `parent()` until the document root, inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentChainWalk;

impl AncestorPath for ParentChainWalk {
    fn ancestors<N: DomNode>(&self, target: N) -> Vec<N> {
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            let done = node.is_document_root();
            current = if done { None } else { node.parent() };
            path.push(node);
        }
        path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "group", rename_all = "snake_case")]
pub enum ClickOutcome {
    /// Not ours; the browser proceeds normally.
    Ignored,
    /// A match was found but no modal opened. Default navigation must still
    /// be prevented.
    Suppressed,
    Opened(ModalGroup),
}

impl ClickOutcome {
    /// Whether the host must call `preventDefault` on the event.
    #[must_use]
    pub const fn prevents_default(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Classifies `element` and applies the kind gate.
#[must_use]
pub fn enabled_match<E: LinkElement + ?Sized>(
    settings: &Settings,
    element: &E,
) -> Option<ActiveMatch> {
    let found = classify_element(element)?;
    if settings.kind_enabled(found.kind) {
        Some(found)
    } else {
        tracing::debug!(kind = %found.kind, "match ignored, kind disabled");
        None
    }
}

/// Handles one click given its ancestor path, innermost first.
pub fn on_click<S, P, N>(controller: &mut ModalController<S, P>, path: &[N]) -> ClickOutcome
where
    S: ModalSurface,
    P: Platform,
    N: DomNode,
{
    if controller.is_showing() || !controller.is_initialized() {
        return ClickOutcome::Ignored;
    }

    let Some((node, found)) = path
        .iter()
        .find_map(|node| enabled_match(controller.settings(), node).map(|m| (node, m)))
    else {
        return ClickOutcome::Ignored;
    };

    tracing::debug!(kind = %found.kind, mode = ?found.mode, "mailgo link clicked");
    match controller.open_from_element(found, node) {
        Ok(group) => ClickOutcome::Opened(group),
        Err(e) => {
            if e.is_silent_drop() {
                tracing::debug!(error = %e, "click dropped");
            } else {
                tracing::warn!(error = %e, "click rejected");
            }
            ClickOutcome::Suppressed
        }
    }
}

/// Walks from `target` with `walker`, then handles the click.
pub fn handle_click<S, P, N, W>(
    controller: &mut ModalController<S, P>,
    walker: &W,
    target: N,
) -> ClickOutcome
where
    S: ModalSurface,
    P: Platform,
    N: DomNode,
    W: AncestorPath,
{
    if controller.is_showing() {
        return ClickOutcome::Ignored;
    }
    let path = walker.ancestors(target);
    on_click(controller, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Node {
        href: Option<&'static str>,
        root: bool,
        parent: Option<Rc<Node>>,
    }

    #[derive(Clone)]
    struct Handle(Rc<Node>);

    impl LinkElement for Handle {
        fn attribute(&self, name: &str) -> Option<String> {
            if name == "href" {
                self.0.href.map(str::to_string)
            } else {
                None
            }
        }

        fn has_class(&self, _class: &str) -> bool {
            false
        }
    }

    impl DomNode for Handle {
        fn parent(&self) -> Option<Self> {
            self.0.parent.clone().map(Handle)
        }

        fn is_document_root(&self) -> bool {
            self.0.root
        }
    }

    fn chain(hrefs: &[Option<&'static str>]) -> Handle {
        let mut parent: Option<Rc<Node>> = None;
        for (i, href) in hrefs.iter().enumerate() {
            parent = Some(Rc::new(Node {
                href: *href,
                root: i == 0,
                parent,
            }));
        }
        Handle(parent.unwrap())
    }

    #[test]
    fn walk_stops_at_the_document_root() {
        // A node above <html> is never visited.
        let above = Rc::new(Node {
            href: Some("mailto:x@y.z"),
            root: false,
            parent: None,
        });
        let html = Rc::new(Node {
            href: None,
            root: true,
            parent: Some(above),
        });
        let leaf = Handle(Rc::new(Node {
            href: None,
            root: false,
            parent: Some(html),
        }));
        assert_eq!(ParentChainWalk.ancestors(leaf).len(), 2);
    }

    #[test]
    fn walk_from_root_alone() {
        let root = chain(&[None]);
        assert_eq!(ParentChainWalk.ancestors(root).len(), 1);
    }

    #[test]
    fn walk_is_innermost_first() {
        let leaf = chain(&[None, Some("tel:5551234"), None]);
        let path = ParentChainWalk.ancestors(leaf);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].href(), None);
        assert_eq!(path[1].href().as_deref(), Some("tel:5551234"));
    }

    #[test]
    fn kind_gate_applies() {
        let settings = Settings::default();
        let sms = chain(&[Some("sms:5551234")]);
        assert_eq!(enabled_match(&settings, &sms), None);
        let tel = chain(&[Some("tel:5551234")]);
        assert!(enabled_match(&settings, &tel).is_some());
    }

    #[test]
    fn outcome_default_prevention() {
        assert!(!ClickOutcome::Ignored.prevents_default());
        assert!(ClickOutcome::Suppressed.prevents_default());
        assert!(ClickOutcome::Opened(ModalGroup::Mail).prevents_default());
    }
}
