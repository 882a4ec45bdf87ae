//! `web-sys` implementations of the core's host traits.

use mailgo_core::scaffold::{
    BACKGROUND_CLASS, CONTENT_CLASS, DARK_MODAL_CLASS, DETAILS_CLASS, FOOTER_CLASS, FOOTER_TEXT,
    FOOTER_URL, MODAL_CLASS, STRONG_CLASS, STYLE_ID, TITLE_CLASS, container_id, copy_button_id,
    title_id,
};
use mailgo_core::{
    DomNode, LabelPart, LinkElement, ModalGroup, ModalSkeleton, ModalSurface,
    ModalView, Platform, tab_target,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window, console};

/// Elements the focus trap cycles through.
pub const FOCUSABLE: &str = "a[href], button:not([disabled]), [tabindex]:not([tabindex='-1'])";

pub fn log_error(context: &str, err: &JsValue) {
    console::error_2(&format!("mailgo: {context}").into(), err);
}

// ──────────────────────────────────────────────────────────────────────────────
// Page elements
// ──────────────────────────────────────────────────────────────────────────────

/// A page element seen through the core's element traits.
#[derive(Clone)]
pub struct PageElement(pub Element);

impl LinkElement for PageElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.0.has_attribute(name)
    }
}

impl DomNode for PageElement {
    fn parent(&self) -> Option<Self> {
        self.0.parent_element().map(Self)
    }

    fn is_document_root(&self) -> bool {
        self.0.tag_name().eq_ignore_ascii_case("html")
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Modal surface
// ──────────────────────────────────────────────────────────────────────────────

pub struct DomSurface {
    document: Document,
}

impl DomSurface {
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn container(&self, group: ModalGroup) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(container_id(group))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn element(&self, tag: &str, class: Option<&str>) -> Result<HtmlElement, JsValue> {
        let el: HtmlElement = self.document.create_element(tag)?.dyn_into()?;
        if let Some(class) = class {
            el.set_class_name(class);
        }
        Ok(el)
    }

    fn label(&self, parent: &Element, parts: &[LabelPart]) -> Result<(), JsValue> {
        for part in parts {
            match part {
                LabelPart::Plain(_) => {
                    parent.append_child(&self.document.create_text_node(part.text()))?;
                }
                LabelPart::Strong(_) => {
                    let span = self.element("span", Some(STRONG_CLASS))?;
                    span.set_text_content(Some(part.text()));
                    parent.append_child(&span)?;
                }
            }
        }
        Ok(())
    }

    /// Replaces `el`'s children with `lines` separated by `<br>`.
    fn set_lines(&self, el: &Element, lines: &[String]) -> Result<(), JsValue> {
        el.set_text_content(None);
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                el.append_child(&self.document.create_element("br")?)?;
            }
            el.append_child(&self.document.create_text_node(line))?;
        }
        Ok(())
    }

    fn try_build(&self, skeleton: &ModalSkeleton) -> Result<(), JsValue> {
        let modal = self.element("div", Some(MODAL_CLASS))?;
        modal.set_id(skeleton.id);
        modal.style().set_property("display", "none")?;
        modal.set_attribute("role", "dialog")?;
        modal.set_attribute("aria-modal", "true")?;
        modal.set_attribute("aria-hidden", "true")?;
        modal.set_attribute("tabindex", "-1")?;
        modal.set_attribute("aria-labelledby", skeleton.title_id)?;

        modal.append_child(&self.element("div", Some(BACKGROUND_CLASS))?)?;
        let content = self.element("div", Some(CONTENT_CLASS))?;
        modal.append_child(&content)?;

        let title = self.element("strong", Some(TITLE_CLASS))?;
        title.set_id(skeleton.title_id);
        content.append_child(&title)?;

        let details = self.element("div", Some(DETAILS_CLASS))?;
        details.set_id(skeleton.details_id);
        for spec in &skeleton.rows {
            let row = self.element("p", None)?;
            row.set_id(spec.row.id());
            let label = self.element("span", Some(STRONG_CLASS))?;
            label.set_text_content(Some(spec.label));
            let value = self.element("span", None)?;
            value.set_id(spec.row.value_id());
            row.append_child(&label)?;
            row.append_child(&value)?;
            details.append_child(&row)?;
        }
        content.append_child(&details)?;

        for spec in &skeleton.buttons {
            let button = self.element("a", None)?;
            button.set_id(spec.id);
            button.set_attribute("href", spec.href)?;
            for class in spec.classes {
                button.class_list().add_1(class)?;
            }
            if spec.initially_hidden {
                button.style().set_property("display", "none")?;
            }
            self.label(&button, &spec.label)?;
            content.append_child(&button)?;
        }

        if skeleton.show_footer {
            let by = self.element("a", Some(FOOTER_CLASS))?;
            by.set_attribute("href", FOOTER_URL)?;
            by.set_attribute("target", "_blank")?;
            by.set_attribute("rel", "noopener noreferrer")?;
            by.set_text_content(Some(FOOTER_TEXT));
            content.append_child(&by)?;
        }

        self.document
            .body()
            .ok_or_else(|| JsValue::from_str("no document body"))?
            .append_child(&modal)?;
        Ok(())
    }

    fn try_render(&self, view: &ModalView) -> Result<(), JsValue> {
        if let Some(title) = self.by_id(title_id(view.group)) {
            self.set_lines(&title, &view.title_lines)?;
        }
        for (row, lines) in &view.rows {
            let Some(el) = self.by_id(row.id()) else {
                continue;
            };
            match lines {
                Some(lines) => {
                    el.style().set_property("display", "block")?;
                    if let Some(value) = self.by_id(row.value_id()) {
                        self.set_lines(&value, lines)?;
                    }
                }
                None => el.style().set_property("display", "none")?,
            }
        }
        if view.group == ModalGroup::Tel
            && let Some(tg) = self.by_id("m-tg")
        {
            let display = if view.show_telegram { "block" } else { "none" };
            tg.style().set_property("display", display)?;
        }
        Ok(())
    }

    fn try_show(&self, group: ModalGroup) -> Result<(), JsValue> {
        let modal = self
            .container(group)
            .ok_or_else(|| JsValue::from_str("modal not built"))?;
        modal.style().set_property("display", "flex")?;
        modal.set_attribute("aria-hidden", "false")?;
        modal.set_attribute("tabindex", "0")?;
        modal.focus()?;
        Ok(())
    }

    fn try_hide(&self, group: ModalGroup) -> Result<(), JsValue> {
        if let Some(modal) = self.container(group) {
            modal.style().set_property("display", "none")?;
            modal.set_attribute("aria-hidden", "true")?;
            modal.set_attribute("tabindex", "-1")?;
        }
        Ok(())
    }

    /// Keeps Tab inside the visible modal. Returns true when focus was moved.
    pub fn trap_tab(&self, group: ModalGroup, backwards: bool) -> bool {
        let Some(modal) = self.container(group) else {
            return false;
        };
        let Ok(nodes) = modal.query_selector_all(FOCUSABLE) else {
            return false;
        };
        let focusable: Vec<HtmlElement> = (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
            .filter(|el| el.offset_parent().is_some())
            .collect();
        let active = self.document.active_element();
        let current = active.as_ref().and_then(|a| {
            focusable.iter().position(|el| {
                let el: &Element = el.as_ref();
                el == a
            })
        });
        let Some(target) = tab_target(focusable.len(), current, backwards)
            .and_then(|i| focusable.get(i))
        else {
            return false;
        };
        target.focus().is_ok()
    }

    /// Whether `el` is a link or button inside a modal container.
    pub fn is_modal_control(el: &Element) -> bool {
        let tag = el.tag_name();
        (tag.eq_ignore_ascii_case("a") || tag.eq_ignore_ascii_case("button"))
            && el
                .closest(&format!(".{MODAL_CLASS}"))
                .ok()
                .flatten()
                .is_some()
    }

    /// Injects the stylesheet once.
    pub fn inject_style(&self, css: &str) -> Result<(), JsValue> {
        if self.document.get_element_by_id(STYLE_ID).is_some() {
            return Ok(());
        }
        let style = self.document.create_element("style")?;
        style.set_id(STYLE_ID);
        style.set_text_content(Some(css));
        self.document
            .head()
            .ok_or_else(|| JsValue::from_str("no document head"))?
            .append_child(&style)?;
        Ok(())
    }
}

impl ModalSurface for DomSurface {
    type Focus = HtmlElement;

    fn is_built(&self, group: ModalGroup) -> bool {
        self.document.get_element_by_id(container_id(group)).is_some()
    }

    fn build(&mut self, skeleton: &ModalSkeleton) {
        if let Err(e) = self.try_build(skeleton) {
            log_error("building modal failed", &e);
        }
    }

    fn render(&mut self, view: &ModalView) {
        if let Err(e) = self.try_render(view) {
            log_error("rendering modal failed", &e);
        }
    }

    fn set_dark(&mut self, group: ModalGroup, dark: bool) {
        if let Some(modal) = self.container(group)
            && let Err(e) = modal
                .class_list()
                .toggle_with_force(DARK_MODAL_CLASS, dark)
        {
            log_error("toggling dark mode failed", &e);
        }
    }

    fn show(&mut self, group: ModalGroup) {
        if let Err(e) = self.try_show(group) {
            log_error("showing modal failed", &e);
        }
    }

    fn hide(&mut self, group: ModalGroup) {
        if let Err(e) = self.try_hide(group) {
            log_error("hiding modal failed", &e);
        }
    }

    fn set_copy_label(&mut self, group: ModalGroup, text: &str) {
        if let Some(button) = self.by_id(copy_button_id(group)) {
            button.set_text_content(Some(text));
        }
    }

    fn active_element(&self) -> Option<HtmlElement> {
        self.document
            .active_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn focus(&mut self, target: &HtmlElement) {
        if let Err(e) = target.focus() {
            log_error("restoring focus failed", &e);
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Platform
// ──────────────────────────────────────────────────────────────────────────────

pub struct BrowserPlatform {
    window: Window,
}

impl BrowserPlatform {
    pub const fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Platform for BrowserPlatform {
    fn open_detached(&mut self, url: &str) {
        if let Err(e) =
            self.window
                .open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")
        {
            log_error("opening a new tab failed", &e);
        }
    }

    fn navigate(&mut self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            log_error("navigation failed", &e);
        }
    }

    fn copy_text(&mut self, text: &str) {
        let promise = self.window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log_error("clipboard write failed", &e);
            }
        });
    }
}

/// The `#mailgo-*` action named by a modal button's href.
pub fn button_action(el: &Element) -> Option<mailgo_core::Action> {
    let href = el.get_attribute("href")?;
    let name = href.strip_prefix("#mailgo-")?;
    if name == "open" {
        return Some(mailgo_core::Action::OpenDefault);
    }
    mailgo_core::Action::from_name(name)
}

/// True when the click landed on the dimmed background.
pub fn is_background(el: &Element) -> bool {
    el.class_list().contains(BACKGROUND_CLASS)
}

