//! WASM-specific implementation using wasm-bindgen.
//!
//! This module provides the JavaScript-facing API: `mailgo(config)` and the
//! helpers a page can call after installation.

use std::cell::RefCell;
use std::rc::Rc;

use mailgo_core::{
    Action, DispatchOutcome, FormFactor, MailgoConfig, ModalController, ModalGroup, Modifiers,
    ParentChainWalk, Settings, Strings, activates_focused_control, handle_click, resolve_language,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, KeyboardEvent, MouseEvent, Window, console,
};

use crate::dom::{self, BrowserPlatform, DomSurface, PageElement, log_error};
use crate::{InitReport, InstallPlan, MAILGO_CSS, PAGE_CONFIG_GLOBAL, install_plan, mailgo_type_of};

type Controller = ModalController<DomSurface, BrowserPlatform>;
type Shared = Rc<RefCell<Controller>>;

thread_local! {
    static INSTANCE: RefCell<Option<Shared>> = const { RefCell::new(None) };
}

fn instance() -> Option<Shared> {
    INSTANCE.with(|slot| slot.borrow().clone())
}

// ──────────────────────────────────────────────────────────────────────────────
// Initialization
// ──────────────────────────────────────────────────────────────────────────────

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn wasm_init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console-panic")]
    console_error_panic_hook::set_once();

    console::log_1(&"mailgo WASM initialized".into());
}

/// Installs mailgo on the current page.
///
/// `config` may be `undefined`. Options on `window.mailgoConfig` win over
/// the ones passed here.
///
/// # Example
///
/// ```javascript
/// const report = mailgo({ sms: true, initEvent: 'DOMContentLoaded' });
/// if (!report.installed) console.log(report.skipped ?? report.deferredUntil);
/// ```
#[wasm_bindgen(js_name = mailgo)]
pub fn mailgo(config: JsValue) -> Result<JsValue, JsValue> {
    let Prepared {
        window,
        document,
        settings,
        strings,
        mut report,
    } = prepare(config)?;

    match install_plan(&settings, report.form_factor, instance().is_some(), true) {
        InstallPlan::Skip(reason) => report.skipped = Some(reason),
        InstallPlan::Defer(event) => {
            defer_install(&document, &event, window, settings, strings)?;
            report.deferred_until = Some(event);
        }
        InstallPlan::Now => {
            install(window, document, settings, strings)?;
            report.installed = true;
        }
    }

    serde_wasm_bindgen::to_value(&report).map_err(Into::into)
}

/// Everything an install needs, resolved from the passed config and the page.
struct Prepared {
    window: Window,
    document: Document,
    settings: Settings,
    strings: Strings,
    report: InitReport,
}

fn prepare(config: JsValue) -> Result<Prepared, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let passed = parse_config(config)?;
    let global = js_sys::Reflect::get(&window, &PAGE_CONFIG_GLOBAL.into())?;
    let global = if global.is_object() {
        Some(parse_config(global)?)
    } else {
        None
    };
    let settings = Settings::resolve(&passed.merge_page_global(global));

    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let form_factor = FormFactor::from_user_agent(&user_agent);
    let html_lang = document
        .document_element()
        .and_then(|root| root.get_attribute("lang"));
    let (lang, lang_source) = resolve_language(settings.lang.as_deref(), html_lang.as_deref());

    Ok(Prepared {
        window,
        document,
        settings,
        strings: Strings::for_language(lang),
        report: InitReport {
            installed: false,
            skipped: None,
            lang: lang.to_string(),
            lang_source,
            form_factor,
            deferred_until: None,
        },
    })
}

/// Installs with the default and page-global config, ignoring `initEvent`.
fn install_for_direct_render() -> Result<(), JsValue> {
    let Prepared {
        window,
        document,
        settings,
        strings,
        report,
    } = prepare(JsValue::UNDEFINED)?;
    match install_plan(&settings, report.form_factor, instance().is_some(), false) {
        InstallPlan::Now => install(window, document, settings, strings),
        InstallPlan::Skip(reason) => {
            console::warn_1(&format!("mailgo: direct render skipped install: {reason:?}").into());
            Ok(())
        }
        InstallPlan::Defer(_) => Ok(()),
    }
}

fn parse_config(value: JsValue) -> Result<MailgoConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(MailgoConfig::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))
}

fn defer_install(
    document: &Document,
    event: &str,
    window: Window,
    settings: Settings,
    strings: Strings,
) -> Result<(), JsValue> {
    let options = AddEventListenerOptions::new();
    if let Some(listener) = settings.listener_options {
        options.set_capture(listener.capture());
        options.set_once(listener.once());
        options.set_passive(listener.passive());
    }
    // The event may fire again unless `once` is set; only the first run installs.
    let mut pending = Some((window, document.clone(), settings, strings));
    let callback = Closure::<dyn FnMut()>::new(move || {
        if let Some((window, document, settings, strings)) = pending.take()
            && let Err(e) = install(window, document, settings, strings)
        {
            log_error("deferred install failed", &e);
        }
    });
    document.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    callback.forget();
    Ok(())
}

fn install(
    window: Window,
    document: Document,
    settings: Settings,
    strings: Strings,
) -> Result<(), JsValue> {
    if instance().is_some() {
        return Ok(());
    }

    let surface = DomSurface::new(document.clone());
    if settings.load_css {
        surface.inject_style(MAILGO_CSS)?;
    }
    let mut controller = ModalController::new(
        settings,
        strings,
        surface,
        BrowserPlatform::new(window),
    );
    controller.init();

    let containers: Vec<_> = [ModalGroup::Mail, ModalGroup::Tel]
        .into_iter()
        .filter_map(|group| controller.surface().container(group))
        .collect();
    let shared: Shared = Rc::new(RefCell::new(controller));

    for container in containers {
        attach_modal_clicks(&container, &shared)?;
    }
    attach_page_clicks(&document, &shared)?;
    attach_keys(&document, &shared)?;

    INSTANCE.with(|slot| *slot.borrow_mut() = Some(shared));
    Ok(())
}

// ──────────────────────────────────────────────────────────────────────────────
// Event wiring
// ──────────────────────────────────────────────────────────────────────────────

fn event_element(event: &web_sys::Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

/// Buttons and background inside one modal container.
fn attach_modal_clicks(container: &Element, shared: &Shared) -> Result<(), JsValue> {
    let shared = Rc::clone(shared);
    let handler = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let Some(target) = event_element(&event) else {
            return;
        };
        if dom::is_background(&target) {
            event.prevent_default();
            event.stop_propagation();
            if let Ok(mut c) = shared.try_borrow_mut() {
                c.close();
            }
            return;
        }
        let Some(button) = target.closest("a[href^='#mailgo-']").ok().flatten() else {
            return;
        };
        event.prevent_default();
        event.stop_propagation();
        if let Some(action) = dom::button_action(&button) {
            run_action(&shared, action);
        }
    });
    container.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

/// The page-wide listener that recognizes contact links.
fn attach_page_clicks(document: &Document, shared: &Shared) -> Result<(), JsValue> {
    let shared = Rc::clone(shared);
    let handler = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let Some(target) = event_element(&event) else {
            return;
        };
        let Ok(mut c) = shared.try_borrow_mut() else {
            return;
        };
        let outcome = handle_click(&mut *c, &ParentChainWalk, PageElement(target));
        if outcome.prevents_default() {
            event.prevent_default();
        }
    });
    document.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

/// Shortcuts and the focus trap. Inert while no modal is showing.
fn attach_keys(document: &Document, shared: &Shared) -> Result<(), JsValue> {
    let shared = Rc::clone(shared);
    let handler = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        let outcome = {
            let Ok(mut c) = shared.try_borrow_mut() else {
                return;
            };
            let Some(group) = c.state().group() else {
                return;
            };
            let key = event.key();
            if key == "Tab" {
                if c.surface().trap_tab(group, event.shift_key()) {
                    event.prevent_default();
                }
                return;
            }
            // A focused modal button gets its own native click.
            if activates_focused_control(&key)
                && event_element(&event).is_some_and(|el| DomSurface::is_modal_control(&el))
            {
                return;
            }
            let modifiers = Modifiers {
                alt: event.alt_key(),
                ctrl: event.ctrl_key(),
                meta: event.meta_key(),
                shift: event.shift_key(),
            };
            c.handle_key(&key, modifiers)
        };
        if let Some(outcome) = outcome {
            event.prevent_default();
            after_dispatch(&shared, outcome);
        }
    });
    document.add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())?;
    handler.forget();
    Ok(())
}

fn run_action(shared: &Shared, action: Action) {
    let result = match shared.try_borrow_mut() {
        Ok(mut c) => c.dispatch(action),
        Err(_) => return,
    };
    match result {
        Ok(outcome) => after_dispatch(shared, outcome),
        Err(e) => console::warn_1(&format!("mailgo: {action}: {e}").into()),
    }
}

fn after_dispatch(shared: &Shared, outcome: DispatchOutcome) {
    if let DispatchOutcome::CopyPending { group, delay_ms } = outcome {
        schedule_copy_reset(shared, group, delay_ms);
    }
}

fn schedule_copy_reset(shared: &Shared, group: ModalGroup, delay_ms: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let shared = Rc::clone(shared);
    let callback = Closure::once_into_js(move || {
        if let Ok(mut c) = shared.try_borrow_mut() {
            c.finish_copy(group);
        }
    });
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        log_error("scheduling copy reset failed", &e);
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Page helpers
// ──────────────────────────────────────────────────────────────────────────────

/// Opens the modal for a contact URL without a click.
///
/// Installs mailgo first when the page has not called `mailgo()` yet.
/// Returns `false` when the URL is not a `mailto:`, `tel:` or `sms:` URL, or
/// when the install gate refused.
#[wasm_bindgen(js_name = mailgoDirectRender)]
pub fn mailgo_direct_render(url: &str) -> bool {
    if instance().is_none()
        && let Err(e) = install_for_direct_render()
    {
        log_error("install for direct render failed", &e);
    }
    let Some(shared) = instance() else {
        return false;
    };
    let Ok(mut c) = shared.try_borrow_mut() else {
        return false;
    };
    c.direct_render(url)
}

/// `{ type, installation, kind }` for an element that looks like a mailgo
/// link, else `null`. The enabled kinds are not consulted.
#[wasm_bindgen(js_name = getMailgoTypeByElement)]
pub fn get_mailgo_type_by_element(element: &Element) -> Result<JsValue, JsValue> {
    match mailgo_type_of(&PageElement(element.clone())) {
        Some(found) => serde_wasm_bindgen::to_value(&found).map_err(Into::into),
        None => Ok(JsValue::NULL),
    }
}

/// Closes the visible modal. Returns `false` when none was showing.
#[wasm_bindgen(js_name = mailgoClose)]
pub fn mailgo_close() -> bool {
    instance()
        .and_then(|shared| shared.try_borrow_mut().ok().map(|mut c| c.close()))
        .unwrap_or(false)
}

#[wasm_bindgen(js_name = mailgoIsShowing)]
pub fn mailgo_is_showing() -> bool {
    instance()
        .and_then(|shared| shared.try_borrow().ok().map(|c| c.is_showing()))
        .unwrap_or(false)
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
