//! `PageSurface` over the live document.

use crate::storage::js_reason;
use crate::styles::{
    DENIED_ID, INDICATOR_CSS, INDICATOR_ID, LOCK_ICON, OVERLAY_CSS, OVERLAY_ID, PREHIDE_STYLE_ID,
    SIGN_IN_BUTTON_HTML, SIGN_IN_BUTTON_ID, SIGN_OUT_LABEL,
};
use auth_gate_access::{Branding, PageSurface, SessionRecord, Trigger};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, Window};

/// Properties set on `<html>` while content is hidden.
const HIDDEN_PROPERTIES: [(&str, &str); 2] = [("visibility", "hidden"), ("overflow", "hidden")];

/// Renders the gate into the page it protects.
///
/// Event listeners are owned by the surface and live as long as it does,
/// which is the lifetime of the page.
pub struct DomSurface {
    window: Window,
    document: Document,
    overlay: Option<Element>,
    denied: Option<HtmlElement>,
    indicator: Option<Element>,
    listeners: Vec<Closure<dyn FnMut()>>,
}

impl DomSurface {
    #[must_use]
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            overlay: None,
            denied: None,
            indicator: None,
            listeners: Vec::new(),
        }
    }

    fn root_style(&self) -> Option<CssStyleDeclaration> {
        let root = self.document.document_element()?;
        root.dyn_into::<HtmlElement>().ok().map(|root| root.style())
    }

    fn element(&self, tag: &str) -> Result<Element, JsValue> {
        self.document.create_element(tag)
    }

    fn text_element(&self, tag: &str, text: &str) -> Result<Element, JsValue> {
        let element = self.element(tag)?;
        element.set_text_content(Some(text));
        Ok(element)
    }

    fn stylesheet(&self, css: &str) -> Result<Element, JsValue> {
        self.text_element("style", css)
    }

    fn on_click(&mut self, target: &Element, trigger: Trigger) -> Result<(), JsValue> {
        let listener = Closure::wrap(trigger);
        target.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
        self.listeners.push(listener);
        Ok(())
    }

    /// Appends to `<body>`, or once it exists if the document is still
    /// being parsed.
    fn append_to_body(&mut self, element: Element) -> Result<(), JsValue> {
        if let Some(body) = self.document.body() {
            body.append_child(&element)?;
            return Ok(());
        }

        let document = self.document.clone();
        let listener = Closure::<dyn FnMut()>::new(move || {
            let Some(body) = document.body() else {
                tracing::error!("document has no body after DOMContentLoaded");
                return;
            };
            if let Err(e) = body.append_child(&element) {
                tracing::error!(reason = %js_reason(&e), "deferred insertion failed");
            }
        });
        self.document
            .add_event_listener_with_callback("DOMContentLoaded", listener.as_ref().unchecked_ref())?;
        self.listeners.push(listener);
        Ok(())
    }

    fn build_overlay(&mut self, branding: &Branding, on_sign_in: Trigger) -> Result<Element, JsValue> {
        let overlay = self.element("div")?;
        overlay.set_id(OVERLAY_ID);
        let stylesheet = self.stylesheet(OVERLAY_CSS)?;
        overlay.append_child(&stylesheet)?;

        let panel = self.element("div")?;
        panel.set_class_name("auth-box");

        let lock = self.element("div")?;
        lock.set_class_name("auth-lock");
        lock.set_inner_html(LOCK_ICON);
        panel.append_child(&lock)?;

        let title = self.text_element("h1", &branding.title)?;
        panel.append_child(&title)?;
        let subtitle = self.text_element("p", &branding.subtitle)?;
        panel.append_child(&subtitle)?;

        let button = self.element("button")?;
        button.set_id(SIGN_IN_BUTTON_ID);
        button.set_class_name("g-btn");
        button.set_attribute("type", "button")?;
        button.set_inner_html(SIGN_IN_BUTTON_HTML);
        self.on_click(&button, on_sign_in)?;
        panel.append_child(&button)?;

        let denied = self.text_element("div", &branding.denied_message)?;
        denied.set_id(DENIED_ID);
        denied.set_class_name("auth-denied");
        panel.append_child(&denied)?;
        self.denied = denied.dyn_into::<HtmlElement>().ok();

        overlay.append_child(&panel)?;
        Ok(overlay)
    }

    fn build_indicator(
        &mut self,
        record: &SessionRecord,
        on_sign_out: Trigger,
    ) -> Result<Element, JsValue> {
        let wrapper = self.element("div")?;
        let stylesheet = self.stylesheet(INDICATOR_CSS)?;
        wrapper.append_child(&stylesheet)?;

        let indicator = self.element("div")?;
        indicator.set_id(INDICATOR_ID);
        indicator.set_attribute("title", record.email().as_str())?;

        if let Some(picture) = record.picture() {
            let avatar = self.element("img")?;
            avatar.set_attribute("src", picture)?;
            avatar.set_attribute("alt", "")?;
            avatar.set_attribute("referrerpolicy", "no-referrer")?;
            indicator.append_child(&avatar)?;
        }
        let label = self.text_element("span", SIGN_OUT_LABEL)?;
        indicator.append_child(&label)?;
        self.on_click(&indicator, on_sign_out)?;

        wrapper.append_child(&indicator)?;
        Ok(wrapper)
    }
}

impl PageSurface for DomSurface {
    // The pre-hide stylesheet may already be hiding the page; the inline
    // properties are set regardless so hiding never depends on it.
    fn hide_content(&mut self) {
        let Some(style) = self.root_style() else {
            tracing::error!("no root element to hide");
            return;
        };
        for (property, value) in HIDDEN_PROPERTIES {
            if let Err(e) = style.set_property(property, value) {
                tracing::error!(property, reason = %js_reason(&e), "failed to hide content");
            }
        }
    }

    fn reveal_content(&mut self) {
        if let Some(prehide) = self.document.get_element_by_id(PREHIDE_STYLE_ID) {
            prehide.remove();
        }
        let Some(style) = self.root_style() else {
            return;
        };
        for (property, _) in HIDDEN_PROPERTIES {
            if let Err(e) = style.remove_property(property) {
                tracing::warn!(property, reason = %js_reason(&e), "failed to reveal content");
            }
        }
    }

    fn show_sign_in_prompt(&mut self, branding: &Branding, on_sign_in: Trigger) {
        if self.overlay.is_some() {
            return;
        }
        let rendered = self.build_overlay(branding, on_sign_in).and_then(|overlay| {
            self.overlay = Some(overlay.clone());
            self.append_to_body(overlay)
        });
        if let Err(e) = rendered {
            tracing::error!(reason = %js_reason(&e), "failed to render sign-in overlay");
        }
    }

    fn remove_sign_in_prompt(&mut self) {
        if let Some(overlay) = self.overlay.take() {
            overlay.remove();
        }
        self.denied = None;
    }

    fn show_denied(&mut self) {
        let Some(message) = &self.denied else {
            tracing::warn!("no sign-in overlay to show the denial on");
            return;
        };
        if let Err(e) = message.style().set_property("display", "block") {
            tracing::error!(reason = %js_reason(&e), "failed to show denial");
        }
    }

    fn show_signed_in(&mut self, record: &SessionRecord, on_sign_out: Trigger) {
        if self.indicator.is_some() {
            return;
        }
        let rendered = self.build_indicator(record, on_sign_out).and_then(|indicator| {
            self.indicator = Some(indicator.clone());
            self.append_to_body(indicator)
        });
        if let Err(e) = rendered {
            tracing::error!(reason = %js_reason(&e), "failed to render signed-in indicator");
        }
    }

    fn reload(&mut self) {
        if let Err(e) = self.window.location().reload() {
            tracing::error!(reason = %js_reason(&e), "reload failed");
        }
    }
}
