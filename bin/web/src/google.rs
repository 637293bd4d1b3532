//! `IdentityProvider` backed by Google Identity Services.
//!
//! The client script is injected into `<head>` and initialized once it
//! loads. Credentials reach the gate through the registered callback,
//! deferred to a fresh task so the controller is never re-entered from
//! inside its own `prompt_sign_in` call.

use crate::storage::js_reason;
use crate::styles::{FALLBACK_BUTTON_OPTIONS, SIGN_IN_BUTTON_ID, fallback_button_selector};
use auth_gate_access::{AssertionHandler, IdentityAssertion, IdentityProvider, ProviderError};
use js_sys::{Function, Object, Reflect};
use rootcause::Report;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlScriptElement, Window};

/// Where the client library is served from.
pub const GSI_CLIENT_SRC: &str = "https://accounts.google.com/gsi/client";

/// Delay before clicking the fallback button, giving the library time to
/// render it.
const FALLBACK_CLICK_DELAY_MS: i32 = 100;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["google", "accounts", "id"], js_name = initialize)]
    fn gsi_initialize(config: &Object) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["google", "accounts", "id"], js_name = prompt)]
    fn gsi_prompt(listener: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["google", "accounts", "id"], js_name = renderButton)]
    fn gsi_render_button(parent: &HtmlElement, options: &Object) -> Result<(), JsValue>;

    /// Status object passed to the `prompt` listener.
    type PromptMomentNotification;

    #[wasm_bindgen(method, js_name = isNotDisplayed)]
    fn is_not_displayed(this: &PromptMomentNotification) -> bool;

    #[wasm_bindgen(method, js_name = isSkippedMoment)]
    fn is_skipped_moment(this: &PromptMomentNotification) -> bool;
}

type HandlerSlot = Rc<RefCell<Option<AssertionHandler>>>;

pub struct GoogleIdentityProvider {
    window: Window,
    document: Document,
    script_src: String,
    client_id: Option<String>,
    handler: HandlerSlot,
    on_credential: Option<Closure<dyn FnMut(JsValue)>>,
    on_script_load: Option<Closure<dyn FnMut()>>,
    on_prompt_moment: Option<Closure<dyn FnMut(PromptMomentNotification)>>,
}

impl GoogleIdentityProvider {
    #[must_use]
    pub fn new(window: Window, document: Document, script_src: impl Into<String>) -> Self {
        Self {
            window,
            document,
            script_src: script_src.into(),
            client_id: None,
            handler: Rc::new(RefCell::new(None)),
            on_credential: None,
            on_script_load: None,
            on_prompt_moment: None,
        }
    }

    /// Returns the `google.accounts.id` callback, creating it on first use.
    fn credential_callback(&mut self) -> Function {
        let handler = Rc::clone(&self.handler);
        self.on_credential
            .get_or_insert_with(|| {
                Closure::<dyn FnMut(JsValue)>::new(move |response: JsValue| {
                    let assertion = assertion_from_response(&response);
                    let handler = Rc::clone(&handler);
                    wasm_bindgen_futures::spawn_local(async move {
                        deliver(&handler, assertion);
                    });
                })
            })
            .as_ref()
            .unchecked_ref::<Function>()
            .clone()
    }

    fn prompt_listener(&mut self) -> Function {
        let window = self.window.clone();
        let document = self.document.clone();
        self.on_prompt_moment
            .get_or_insert_with(|| {
                Closure::<dyn FnMut(PromptMomentNotification)>::new(
                    move |moment: PromptMomentNotification| {
                        if moment.is_not_displayed() || moment.is_skipped_moment() {
                            tracing::debug!("one tap unavailable, falling back to popup");
                            if let Err(e) = render_fallback(&window, &document) {
                                tracing::warn!(reason = %js_reason(&e), "popup fallback failed");
                            }
                        }
                    },
                )
            })
            .as_ref()
            .unchecked_ref::<Function>()
            .clone()
    }

    fn inject_script(&mut self, client_id: String, callback: Function) -> Result<(), JsValue> {
        let head = self
            .document
            .head()
            .ok_or_else(|| JsValue::from_str("document has no <head>"))?;

        let script: HtmlScriptElement = self.document.create_element("script")?.unchecked_into();
        script.set_src(&self.script_src);
        script.set_async(true);
        script.set_defer(true);

        let on_load = Closure::<dyn FnMut()>::new(move || {
            match register(&client_id, &callback) {
                Ok(()) => tracing::debug!("identity client initialized"),
                Err(e) => tracing::error!(reason = %js_reason(&e), "identity client initialization failed"),
            }
        });
        script.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
        self.on_script_load = Some(on_load);

        head.append_child(&script)?;
        Ok(())
    }
}

impl IdentityProvider for GoogleIdentityProvider {
    fn initialize(
        &mut self,
        client_id: &str,
        handler: AssertionHandler,
    ) -> Result<(), Report<ProviderError>> {
        *self.handler.borrow_mut() = Some(handler);
        self.client_id = Some(client_id.to_string());
        let callback = self.credential_callback();

        if client_loaded() {
            return register(client_id, &callback).map_err(|e| {
                ProviderError::InitializationFailed {
                    reason: js_reason(&e),
                }
                .into()
            });
        }
        if self.on_script_load.is_some() {
            return Ok(());
        }
        self.inject_script(client_id.to_string(), callback)
            .map_err(|e| {
                ProviderError::InitializationFailed {
                    reason: js_reason(&e),
                }
                .into()
            })
    }

    fn prompt_sign_in(&mut self) -> Result<(), Report<ProviderError>> {
        let Some(client_id) = self.client_id.clone() else {
            return Err(ProviderError::NotLoaded.into());
        };
        if !client_loaded() {
            return Err(ProviderError::NotLoaded.into());
        }

        let callback = self.credential_callback();
        register(&client_id, &callback).map_err(|e| ProviderError::InitializationFailed {
            reason: js_reason(&e),
        })?;

        let listener = self.prompt_listener();
        gsi_prompt(&listener).map_err(|e| {
            ProviderError::PromptFailed {
                reason: js_reason(&e),
            }
            .into()
        })
    }
}

/// Hands an assertion to the registered handler.
///
/// The handler is taken out while it runs so it can register a new one.
fn deliver(slot: &HandlerSlot, assertion: IdentityAssertion) {
    let Some(mut handler) = slot.borrow_mut().take() else {
        tracing::warn!("credential arrived with no handler registered");
        return;
    };
    handler(assertion);
    let mut current = slot.borrow_mut();
    if current.is_none() {
        *current = Some(handler);
    }
}

/// Reads the callback response. A missing credential becomes an empty one,
/// which fails to decode and is refused.
fn assertion_from_response(response: &JsValue) -> IdentityAssertion {
    let field = |name: &str| {
        Reflect::get(response, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_string())
    };
    IdentityAssertion::new(field("credential").unwrap_or_default())
        .with_select_by(field("select_by"))
}

/// Returns true once `google.accounts.id` exists.
fn client_loaded() -> bool {
    ["google", "accounts", "id"]
        .iter()
        .try_fold(JsValue::from(js_sys::global()), |parent, name| {
            Reflect::get(&parent, &JsValue::from_str(name))
                .ok()
                .filter(|v| v.is_object())
        })
        .is_some()
}

fn register(client_id: &str, callback: &Function) -> Result<(), JsValue> {
    let config = Object::new();
    Reflect::set(&config, &"client_id".into(), &client_id.into())?;
    Reflect::set(&config, &"callback".into(), callback)?;
    gsi_initialize(&config)
}

/// Renders the provider's own button into the trigger and clicks it,
/// which opens the popup flow.
fn render_fallback(window: &Window, document: &Document) -> Result<(), JsValue> {
    let container = document
        .get_element_by_id(SIGN_IN_BUTTON_ID)
        .ok_or_else(|| JsValue::from_str("sign-in trigger is not in the document"))?
        .dyn_into::<HtmlElement>()?;

    let options = Object::new();
    for (key, value) in FALLBACK_BUTTON_OPTIONS {
        Reflect::set(&options, &key.into(), &value.into())?;
    }
    gsi_render_button(&container, &options)?;

    let document = document.clone();
    let click = Closure::once_into_js(move || {
        let rendered = document
            .query_selector(&fallback_button_selector())
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        match rendered {
            Some(button) => button.click(),
            None => tracing::warn!("fallback button was not rendered"),
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        click.unchecked_ref(),
        FALLBACK_CLICK_DELAY_MS,
    )?;
    Ok(())
}
