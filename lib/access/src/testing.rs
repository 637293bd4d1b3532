//! In-memory surface and provider used by the controller tests.

use crate::assertion::IdentityAssertion;
use crate::config::Branding;
use crate::error::ProviderError;
use crate::provider::{AssertionHandler, IdentityProvider};
use crate::session::SessionRecord;
use crate::surface::{PageSurface, Trigger};
use rootcause::Report;
use std::cell::RefCell;
use std::rc::Rc;

/// What the controller asked the surface to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Hide,
    Reveal,
    Prompt,
    RemovePrompt,
    Denied,
    SignedIn(String),
    Reload,
}

#[derive(Default)]
struct SurfaceInner {
    events: Vec<SurfaceEvent>,
    prompt_shown: bool,
    indicator_count: usize,
    on_sign_in: Option<Trigger>,
    on_sign_out: Option<Trigger>,
}

/// Surface that records every call and lets tests press its buttons.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    inner: Rc<RefCell<SurfaceInner>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.inner.borrow().events.clone()
    }

    pub fn indicator_count(&self) -> usize {
        self.inner.borrow().indicator_count
    }

    pub fn click_sign_in(&self) {
        Self::press(&self.inner, |inner| &mut inner.on_sign_in);
    }

    pub fn click_sign_out(&self) {
        Self::press(&self.inner, |inner| &mut inner.on_sign_out);
    }

    // The trigger is taken out while it runs so it can call back into the
    // surface without a double borrow.
    fn press(
        inner: &Rc<RefCell<SurfaceInner>>,
        slot: fn(&mut SurfaceInner) -> &mut Option<Trigger>,
    ) {
        let taken = slot(&mut inner.borrow_mut()).take();
        let Some(mut trigger) = taken else {
            panic!("no trigger registered");
        };
        trigger();
        let mut inner = inner.borrow_mut();
        let current = slot(&mut inner);
        if current.is_none() {
            *current = Some(trigger);
        }
    }

    fn record(&self, event: SurfaceEvent) {
        self.inner.borrow_mut().events.push(event);
    }
}

impl PageSurface for RecordingSurface {
    fn hide_content(&mut self) {
        self.record(SurfaceEvent::Hide);
    }

    fn reveal_content(&mut self) {
        self.record(SurfaceEvent::Reveal);
    }

    fn show_sign_in_prompt(&mut self, _branding: &Branding, on_sign_in: Trigger) {
        let mut inner = self.inner.borrow_mut();
        inner.events.push(SurfaceEvent::Prompt);
        inner.prompt_shown = true;
        inner.on_sign_in = Some(on_sign_in);
    }

    fn remove_sign_in_prompt(&mut self) {
        let mut inner = self.inner.borrow_mut();
        if inner.prompt_shown {
            inner.prompt_shown = false;
            inner.events.push(SurfaceEvent::RemovePrompt);
        }
    }

    fn show_denied(&mut self) {
        self.record(SurfaceEvent::Denied);
    }

    fn show_signed_in(&mut self, record: &SessionRecord, on_sign_out: Trigger) {
        let mut inner = self.inner.borrow_mut();
        inner
            .events
            .push(SurfaceEvent::SignedIn(record.email().to_string()));
        inner.indicator_count += 1;
        inner.on_sign_out = Some(on_sign_out);
    }

    fn reload(&mut self) {
        self.record(SurfaceEvent::Reload);
    }
}

#[derive(Default)]
struct ProviderInner {
    client_id: Option<String>,
    handler: Option<AssertionHandler>,
    prompts: usize,
    fail_prompt: bool,
}

/// Provider whose assertions are delivered by the test.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    inner: Rc<RefCell<ProviderInner>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_id(&self) -> Option<String> {
        self.inner.borrow().client_id.clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.inner.borrow().prompts
    }

    pub fn set_fail_prompt(&self, fail: bool) {
        self.inner.borrow_mut().fail_prompt = fail;
    }

    /// Invokes the registered handler as the widget would.
    pub fn deliver(&self, assertion: IdentityAssertion) {
        let taken = self.inner.borrow_mut().handler.take();
        let Some(mut handler) = taken else {
            panic!("no assertion handler registered");
        };
        handler(assertion);
        let mut inner = self.inner.borrow_mut();
        if inner.handler.is_none() {
            inner.handler = Some(handler);
        }
    }
}

impl IdentityProvider for ScriptedProvider {
    fn initialize(
        &mut self,
        client_id: &str,
        handler: AssertionHandler,
    ) -> Result<(), Report<ProviderError>> {
        let mut inner = self.inner.borrow_mut();
        inner.client_id = Some(client_id.to_string());
        inner.handler = Some(handler);
        Ok(())
    }

    fn prompt_sign_in(&mut self) -> Result<(), Report<ProviderError>> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_prompt {
            return Err(ProviderError::PromptFailed {
                reason: "scripted failure".to_string(),
            }
            .into());
        }
        inner.prompts += 1;
        Ok(())
    }
}
