//! The gate controller: one state machine per page load.
//!
//! ```text
//! Checking ──▶ Authorized
//!    │
//!    ▼
//! Unauthenticated ──▶ PromptShown ──▶ Authorized
//!                        ▲   │
//!                        │   ▼
//!                        └─ Denied ──▶ Authorized
//! ```
//!
//! `run` hides content before anything else, so content is never visible
//! while a decision is pending. Every failure (missing, unreadable,
//! malformed, or expired record, rejected or undecodable assertion)
//! leaves content hidden.
//!
//! The controller is shared with the callbacks it hands to the provider
//! and the surface, so it lives in an `Rc<RefCell<_>>`. Callbacks hold a
//! `Weak` handle and drop deliveries that arrive while the controller is
//! already borrowed.

use crate::assertion::IdentityAssertion;
use crate::config::GateConfig;
use crate::error::GateError;
use crate::provider::IdentityProvider;
use crate::session::{SessionRecord, SessionStore};
use crate::surface::PageSurface;
use auth_gate_core::{Clock, EmailAddress};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, info, instrument, warn};

/// Where the current page load stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    /// Deciding whether a persisted session is valid.
    Checking,
    /// Content is visible.
    Authorized,
    /// No valid session; about to prompt.
    Unauthenticated,
    /// Sign-in overlay is shown; waiting for the visitor.
    PromptShown,
    /// The last assertion was rejected; waiting for a retry.
    Denied,
}

impl GateState {
    /// Returns true if page content is visible in this state.
    #[must_use]
    pub fn content_visible(&self) -> bool {
        matches!(self, Self::Authorized)
    }

    /// Returns true if an identity assertion is expected in this state.
    #[must_use]
    pub fn accepts_assertion(&self) -> bool {
        matches!(self, Self::PromptShown | Self::Denied)
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Authorized => "authorized",
            Self::Unauthenticated => "unauthenticated",
            Self::PromptShown => "prompt_shown",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to a mounted controller.
pub type SharedGate<S, U, P> = Rc<RefCell<GateController<S, U, P>>>;

/// Decides, on every page load, whether to show content, a sign-in
/// prompt, or a denial.
pub struct GateController<S, U, P> {
    config: GateConfig,
    store: S,
    surface: U,
    provider: P,
    clock: Box<dyn Clock>,
    state: GateState,
    session: Option<SessionRecord>,
    indicator_shown: bool,
    this: Weak<RefCell<Self>>,
}

impl<S, U, P> GateController<S, U, P>
where
    S: SessionStore + 'static,
    U: PageSurface + 'static,
    P: IdentityProvider + 'static,
{
    /// Creates a controller in the `Checking` state without running it.
    pub fn new(
        config: GateConfig,
        store: S,
        surface: U,
        provider: P,
        clock: impl Clock + 'static,
    ) -> SharedGate<S, U, P> {
        Rc::new_cyclic(|this| {
            RefCell::new(Self {
                config,
                store,
                surface,
                provider,
                clock: Box::new(clock),
                state: GateState::Checking,
                session: None,
                indicator_shown: false,
                this: this.clone(),
            })
        })
    }

    /// Creates a controller and runs the page-load check.
    pub fn mount(
        config: GateConfig,
        store: S,
        surface: U,
        provider: P,
        clock: impl Clock + 'static,
    ) -> SharedGate<S, U, P> {
        let gate = Self::new(config, store, surface, provider, clock);
        gate.borrow_mut().run();
        gate
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Returns the authorized session, once there is one.
    #[must_use]
    pub fn session(&self) -> Option<&SessionRecord> {
        self.session.as_ref()
    }

    /// Returns the session store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the page surface.
    #[must_use]
    pub fn surface(&self) -> &U {
        &self.surface
    }

    /// Returns the identity provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs the page-load check.
    ///
    /// Content is hidden first, unconditionally, and only revealed once a
    /// valid session has been confirmed.
    #[instrument(skip(self), fields(key = self.config.session_key()))]
    pub fn run(&mut self) -> GateState {
        self.state = GateState::Checking;
        self.hide_content();

        if self.config.allow_list().is_open() {
            warn!("allow-list is empty: any signed-in identity will be admitted");
        }

        match self.check_session() {
            Ok(record) => {
                info!(email = %record.email(), "restored session");
                self.authorize(record);
            }
            Err(err) => {
                debug!(reason = %err, "no valid session");
                self.transition(GateState::Unauthenticated);
                self.present_sign_in_prompt();
            }
        }

        self.state
    }

    /// Reads and validates the persisted session.
    ///
    /// # Errors
    ///
    /// Fails closed with the reason the record cannot be used: it is
    /// missing, the store is unreadable, it is malformed, it has expired,
    /// or its email is no longer on the allow-list.
    pub fn check_session(&self) -> Result<SessionRecord, GateError> {
        let raw = self
            .store
            .load()
            .map_err(|report| GateError::StoreUnavailable {
                reason: report.to_string(),
            })?
            .ok_or(GateError::MissingSession)?;

        let record = SessionRecord::from_json(&raw)?;

        if record.is_expired_at(self.clock.now()) {
            return Err(GateError::ExpiredSession {
                expired_at: record.expires(),
            });
        }

        if !self.is_allowed(record.email()) {
            return Err(GateError::NotAllowed {
                email: record.email().to_string(),
            });
        }

        Ok(record)
    }

    /// Returns true if `email` may pass the gate.
    #[must_use]
    pub fn is_allowed(&self, email: &EmailAddress) -> bool {
        self.config.allow_list().permits(email)
    }

    /// Hides page content.
    pub fn hide_content(&mut self) {
        self.surface.hide_content();
    }

    /// Reveals page content and shows the signed-in indicator once.
    pub fn reveal_content(&mut self) {
        self.surface.remove_sign_in_prompt();
        self.surface.reveal_content();

        if self.indicator_shown {
            return;
        }
        if let Some(record) = &self.session {
            let this = self.this.clone();
            self.surface.show_signed_in(
                record,
                Box::new(move || Self::with_gate(&this, |gate| gate.sign_out())),
            );
            self.indicator_shown = true;
        }
    }

    /// Registers the assertion handler and shows the sign-in overlay.
    pub fn present_sign_in_prompt(&mut self) {
        let this = self.this.clone();
        let handler = Box::new(move |assertion: IdentityAssertion| {
            Self::with_gate(&this, move |gate| {
                gate.on_identity_assertion(assertion);
            });
        });
        if let Err(report) = self.provider.initialize(self.config.client_id(), handler) {
            warn!(error = %report, "failed to initialize identity provider");
        }

        let this = self.this.clone();
        self.surface.show_sign_in_prompt(
            self.config.branding(),
            Box::new(move || Self::with_gate(&this, |gate| gate.request_sign_in())),
        );
        self.transition(GateState::PromptShown);
    }

    /// Handles the visitor activating the sign-in affordance.
    pub fn request_sign_in(&mut self) {
        if !self.state.accepts_assertion() {
            debug!(state = %self.state, "ignoring sign-in request");
            return;
        }
        self.transition(GateState::PromptShown);
        if let Err(report) = self.provider.prompt_sign_in() {
            warn!(error = %report, "identity provider could not prompt");
        }
    }

    /// Shows the denial message; content stays hidden.
    pub fn present_denied(&mut self) {
        self.surface.show_denied();
        self.transition(GateState::Denied);
    }

    /// Handles an identity assertion from the provider.
    ///
    /// The credential's signature is not verified. An assertion that
    /// cannot be decoded is treated exactly like a rejected identity.
    #[instrument(skip_all, fields(select_by = assertion.select_by.as_deref()))]
    pub fn on_identity_assertion(&mut self, assertion: IdentityAssertion) -> GateState {
        if !self.state.accepts_assertion() {
            debug!(state = %self.state, "ignoring unexpected assertion");
            return self.state;
        }

        let claims = match assertion.decode_claims() {
            Ok(claims) => claims,
            Err(err) => {
                warn!(error = %err, "rejecting assertion");
                self.present_denied();
                return self.state;
            }
        };

        if !self.is_allowed(&claims.email) {
            info!(email = %claims.email, "identity is not on the allow-list");
            self.present_denied();
            return self.state;
        }

        let record = self.save_session(claims.email, claims.name, claims.picture);
        info!(email = %record.email(), expires = %record.expires(), "signed in");
        self.authorize(record);
        self.state
    }

    /// Persists a new session record that expires after the configured
    /// duration and returns it.
    ///
    /// A failed write is logged and otherwise ignored: the identity was
    /// allowed, so this load proceeds, and the next load prompts again.
    pub fn save_session(
        &mut self,
        email: EmailAddress,
        name: Option<String>,
        picture: Option<String>,
    ) -> SessionRecord {
        let record = SessionRecord::issue(
            email,
            name,
            picture,
            self.clock.now(),
            self.config.session_duration(),
        );

        match record.to_json() {
            Ok(json) => {
                if let Err(report) = self.store.save(&json) {
                    warn!(error = %report, "failed to persist session");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize session"),
        }

        record
    }

    /// Deletes the persisted session and reloads the page.
    pub fn sign_out(&mut self) {
        if let Err(report) = self.store.clear() {
            warn!(error = %report, "failed to remove session");
        }
        info!("signed out");
        self.session = None;
        self.indicator_shown = false;
        self.state = GateState::Checking;
        self.surface.reload();
    }

    fn authorize(&mut self, record: SessionRecord) {
        self.session = Some(record);
        self.transition(GateState::Authorized);
        self.reveal_content();
    }

    fn transition(&mut self, next: GateState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "gate state changed");
            self.state = next;
        }
    }

    fn with_gate<F>(this: &Weak<RefCell<Self>>, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let Some(gate) = this.upgrade() else {
            debug!("gate is gone; ignoring callback");
            return;
        };
        match gate.try_borrow_mut() {
            Ok(mut gate) => f(&mut gate),
            Err(_) => warn!("gate is busy; dropping re-entrant callback"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allow_list::{AllowList, email_digest};
    use crate::assertion::tests::credential;
    use crate::session::MemorySessionStore;
    use crate::testing::{RecordingSurface, ScriptedProvider, SurfaceEvent};
    use auth_gate_core::ManualClock;
    use chrono::{DateTime, Duration, Utc};

    type TestGate = SharedGate<MemorySessionStore, RecordingSurface, ScriptedProvider>;

    struct Harness {
        gate: TestGate,
        store: MemorySessionStore,
        surface: RecordingSurface,
        provider: ScriptedProvider,
        clock: ManualClock,
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_767_225_600_000).expect("valid ts")
    }

    fn email(s: &str) -> EmailAddress {
        EmailAddress::parse(s).expect("valid email")
    }

    fn config(allow_list: AllowList) -> GateConfig {
        GateConfig::builder("test-client.apps.googleusercontent.com".to_string())
            .allow_list(allow_list)
            .build()
    }

    fn mount_with(config: GateConfig, store: MemorySessionStore, clock: ManualClock) -> Harness {
        let surface = RecordingSurface::new();
        let provider = ScriptedProvider::new();
        let gate = GateController::mount(
            config,
            store.clone(),
            surface.clone(),
            provider.clone(),
            clock.clone(),
        );
        Harness {
            gate,
            store,
            surface,
            provider,
            clock,
        }
    }

    fn mount(allow_list: AllowList) -> Harness {
        mount_with(
            config(allow_list),
            MemorySessionStore::new("proto_auth_session"),
            ManualClock::new(t0()),
        )
    }

    fn stored_record(
        email_addr: &str,
        expires: DateTime<Utc>,
    ) -> MemorySessionStore {
        let record = SessionRecord::new(
            email(email_addr),
            Some("Someone".to_string()),
            Some("https://example.com/a.png".to_string()),
            expires,
        );
        MemorySessionStore::with_value("proto_auth_session", record.to_json().expect("json"))
    }

    fn assertion_for(email_addr: &str) -> IdentityAssertion {
        IdentityAssertion::new(credential(&serde_json::json!({
            "email": email_addr,
            "name": "Signed In",
            "picture": "https://example.com/p.png",
        })))
    }

    #[test]
    fn first_visit_hides_then_prompts() {
        let h = mount(AllowList::open());

        assert_eq!(h.gate.borrow().state(), GateState::PromptShown);
        let events = h.surface.events();
        assert_eq!(events.first(), Some(&SurfaceEvent::Hide));
        assert!(events.contains(&SurfaceEvent::Prompt));
        assert!(!events.contains(&SurfaceEvent::Reveal));
        assert_eq!(
            h.provider.client_id().as_deref(),
            Some("test-client.apps.googleusercontent.com")
        );
    }

    #[test]
    fn open_mode_admits_any_identity_and_persists_for_seven_days() {
        let h = mount(AllowList::open());

        h.provider.deliver(assertion_for("x@y.com"));

        assert_eq!(h.gate.borrow().state(), GateState::Authorized);
        assert!(h.surface.events().contains(&SurfaceEvent::Reveal));
        assert!(h.surface.events().contains(&SurfaceEvent::RemovePrompt));

        let stored = SessionRecord::from_json(&h.store.value().expect("persisted"))
            .expect("parse");
        assert_eq!(stored.email().as_str(), "x@y.com");
        assert_eq!(stored.name(), Some("Signed In"));
        assert_eq!(stored.expires(), t0() + Duration::days(7));
    }

    #[test]
    fn identity_missing_from_allow_list_is_denied() {
        let h = mount(AllowList::plain(["you@gmail.com"]));

        h.provider.deliver(assertion_for("blocked@y.com"));

        assert_eq!(h.gate.borrow().state(), GateState::Denied);
        assert!(!h.gate.borrow().state().content_visible());
        assert!(h.surface.events().contains(&SurfaceEvent::Denied));
        assert!(!h.surface.events().contains(&SurfaceEvent::Reveal));
        assert!(h.store.value().is_none());
    }

    #[test]
    fn allowed_identity_is_admitted_case_insensitively() {
        let h = mount(AllowList::plain(["you@gmail.com"]));

        h.provider.deliver(assertion_for("You@Gmail.com"));

        assert_eq!(h.gate.borrow().state(), GateState::Authorized);
        let stored = SessionRecord::from_json(&h.store.value().expect("persisted"))
            .expect("parse");
        assert_eq!(stored.email().as_str(), "You@Gmail.com");
    }

    #[test]
    fn undecodable_assertion_is_denied() {
        let h = mount(AllowList::open());

        h.provider.deliver(IdentityAssertion::new("not-a-token"));

        assert_eq!(h.gate.borrow().state(), GateState::Denied);
        assert!(!h.surface.events().contains(&SurfaceEvent::Reveal));
        assert!(h.store.value().is_none());
    }

    #[test]
    fn expired_session_is_treated_as_absent() {
        let store = stored_record("x@y.com", t0() - Duration::minutes(1));
        let h = mount_with(config(AllowList::open()), store, ManualClock::new(t0()));

        assert_eq!(h.gate.borrow().state(), GateState::PromptShown);
        assert!(h.surface.events().contains(&SurfaceEvent::Prompt));
        assert!(!h.surface.events().contains(&SurfaceEvent::Reveal));
        assert!(matches!(
            h.gate.borrow().check_session(),
            Err(GateError::ExpiredSession { .. })
        ));
    }

    #[test]
    fn session_expiring_exactly_now_is_invalid() {
        let store = stored_record("x@y.com", t0());
        let h = mount_with(config(AllowList::open()), store, ManualClock::new(t0()));
        assert_eq!(h.gate.borrow().state(), GateState::PromptShown);
    }

    #[test]
    fn expiry_wins_over_allow_list_membership() {
        let store = stored_record("you@gmail.com", t0() - Duration::days(1));
        let h = mount_with(
            config(AllowList::plain(["you@gmail.com"])),
            store,
            ManualClock::new(t0()),
        );
        assert_eq!(h.gate.borrow().state(), GateState::PromptShown);
    }

    #[test]
    fn valid_session_reveals_with_indicator() {
        let store = stored_record("x@y.com", t0() + Duration::days(3));
        let h = mount_with(config(AllowList::open()), store, ManualClock::new(t0()));

        assert_eq!(h.gate.borrow().state(), GateState::Authorized);
        let events = h.surface.events();
        assert_eq!(events.first(), Some(&SurfaceEvent::Hide));
        assert!(events.contains(&SurfaceEvent::Reveal));
        assert_eq!(h.surface.indicator_count(), 1);
        assert!(!events.contains(&SurfaceEvent::Prompt));
        assert!(h.provider.client_id().is_none());
    }

    #[test]
    fn removing_email_from_allow_list_invalidates_session() {
        let store = stored_record("former@y.com", t0() + Duration::days(3));
        let h = mount_with(
            config(AllowList::plain(["current@y.com"])),
            store,
            ManualClock::new(t0()),
        );

        assert_eq!(h.gate.borrow().state(), GateState::PromptShown);
        assert!(matches!(
            h.gate.borrow().check_session(),
            Err(GateError::NotAllowed { .. })
        ));
    }

    #[test]
    fn malformed_session_fails_closed() {
        for raw in ["{", "null", r#"{"email":"x@y.com"}"#, r#"{"expires":99999999999999}"#] {
            let store = MemorySessionStore::with_value("proto_auth_session", raw);
            let h = mount_with(config(AllowList::open()), store, ManualClock::new(t0()));
            assert_eq!(h.gate.borrow().state(), GateState::PromptShown, "{raw}");
            assert!(!h.surface.events().contains(&SurfaceEvent::Reveal), "{raw}");
        }
    }

    #[test]
    fn unreadable_store_fails_closed() {
        let store = stored_record("x@y.com", t0() + Duration::days(3));
        store.set_unavailable(true);
        let h = mount_with(config(AllowList::open()), store, ManualClock::new(t0()));

        assert_eq!(h.gate.borrow().state(), GateState::PromptShown);
        assert!(matches!(
            h.gate.borrow().check_session(),
            Err(GateError::StoreUnavailable { .. })
        ));
    }

    #[test]
    fn failed_write_still_admits_allowed_identity() {
        let h = mount(AllowList::open());
        h.store.set_unavailable(true);

        h.provider.deliver(assertion_for("x@y.com"));

        assert_eq!(h.gate.borrow().state(), GateState::Authorized);
        h.store.set_unavailable(false);
        assert!(h.store.value().is_none());
    }

    #[test]
    fn sign_out_clears_record_and_reloads() {
        let h = mount(AllowList::open());
        h.provider.deliver(assertion_for("x@y.com"));
        assert!(h.store.value().is_some());

        h.surface.click_sign_out();

        assert!(h.store.value().is_none());
        assert!(h.surface.events().contains(&SurfaceEvent::Reload));
        assert_eq!(h.gate.borrow().state(), GateState::Checking);
        assert!(h.gate.borrow().session().is_none());

        // The reloaded page starts over and prompts.
        let next = mount_with(
            config(AllowList::open()),
            h.store.clone(),
            h.clock.clone(),
        );
        assert_eq!(next.gate.borrow().state(), GateState::PromptShown);
    }

    #[test]
    fn session_survives_reload_until_expiry() {
        let h = mount(AllowList::open());
        h.provider.deliver(assertion_for("x@y.com"));

        h.clock.advance(Duration::days(7) - Duration::milliseconds(1));
        let reloaded = mount_with(config(AllowList::open()), h.store.clone(), h.clock.clone());
        assert_eq!(reloaded.gate.borrow().state(), GateState::Authorized);

        h.clock.advance(Duration::milliseconds(1));
        let expired = mount_with(config(AllowList::open()), h.store.clone(), h.clock.clone());
        assert_eq!(expired.gate.borrow().state(), GateState::PromptShown);
    }

    #[test]
    fn reveal_content_is_idempotent() {
        let store = stored_record("x@y.com", t0() + Duration::days(1));
        let h = mount_with(config(AllowList::open()), store, ManualClock::new(t0()));

        h.gate.borrow_mut().reveal_content();
        h.gate.borrow_mut().reveal_content();

        assert_eq!(h.surface.indicator_count(), 1);
        assert_eq!(h.gate.borrow().state(), GateState::Authorized);
    }

    #[test]
    fn denied_visitor_can_retry() {
        let h = mount(AllowList::plain(["you@gmail.com"]));
        h.provider.deliver(assertion_for("blocked@y.com"));
        assert_eq!(h.gate.borrow().state(), GateState::Denied);

        h.surface.click_sign_in();
        assert_eq!(h.gate.borrow().state(), GateState::PromptShown);
        assert_eq!(h.provider.prompt_count(), 1);

        h.provider.deliver(assertion_for("you@gmail.com"));
        assert_eq!(h.gate.borrow().state(), GateState::Authorized);
        assert_eq!(h.surface.indicator_count(), 1);
    }

    #[test]
    fn sign_in_click_prompts_provider() {
        let h = mount(AllowList::open());
        h.surface.click_sign_in();
        h.surface.click_sign_in();
        assert_eq!(h.provider.prompt_count(), 2);
        assert_eq!(h.gate.borrow().state(), GateState::PromptShown);
    }

    #[test]
    fn prompt_failure_keeps_prompt_state() {
        let h = mount(AllowList::open());
        h.provider.set_fail_prompt(true);
        h.surface.click_sign_in();
        assert_eq!(h.gate.borrow().state(), GateState::PromptShown);
    }

    #[test]
    fn assertion_after_authorization_is_ignored() {
        let h = mount(AllowList::open());
        h.provider.deliver(assertion_for("x@y.com"));
        let first = h.store.value();

        h.clock.advance(Duration::hours(1));
        h.provider.deliver(assertion_for("other@y.com"));

        assert_eq!(h.store.value(), first);
        assert_eq!(
            h.gate.borrow().session().map(|s| s.email().as_str().to_string()),
            Some("x@y.com".to_string())
        );
    }

    #[test]
    fn digest_allow_list_is_case_insensitive() {
        let digest = email_digest("pepper", &email("Allowed@Example.com"));
        let h = mount(AllowList::digest("pepper", [digest]));

        assert!(h.gate.borrow().is_allowed(&email("allowed@example.com")));
        assert!(!h.gate.borrow().is_allowed(&email("other@example.com")));

        h.provider.deliver(assertion_for("allowed@example.com"));
        assert_eq!(h.gate.borrow().state(), GateState::Authorized);
    }

    #[test]
    fn save_session_round_trips() {
        let h = mount(AllowList::open());
        let record = h.gate.borrow_mut().save_session(
            email("x@y.com"),
            Some("X".to_string()),
            Some("https://example.com/x.png".to_string()),
        );

        let read = SessionRecord::from_json(&h.store.value().expect("persisted")).expect("parse");
        assert_eq!(read.email(), record.email());
        assert_eq!(read.name(), Some("X"));
        assert_eq!(read.picture(), Some("https://example.com/x.png"));
        assert!(read.expires() > t0());
    }

    #[test]
    fn custom_duration_is_honored() {
        let config = GateConfig::builder("client".to_string())
            .session_duration_days(1)
            .build();
        let h = mount_with(
            config,
            MemorySessionStore::new("proto_auth_session"),
            ManualClock::new(t0()),
        );
        h.provider.deliver(assertion_for("x@y.com"));

        let stored = SessionRecord::from_json(&h.store.value().expect("persisted"))
            .expect("parse");
        assert_eq!(stored.expires(), t0() + Duration::days(1));
    }

    #[test]
    fn sign_in_near_end_of_time_does_not_overflow() {
        let now = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        let h = mount_with(
            config(AllowList::open()),
            MemorySessionStore::new("proto_auth_session"),
            ManualClock::new(now),
        );

        h.provider.deliver(assertion_for("x@y.com"));

        assert_eq!(h.gate.borrow().state(), GateState::Authorized);
        let session = h.gate.borrow().session().cloned().expect("session");
        assert_eq!(session.expires(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn oversized_duration_does_not_panic_on_sign_in() {
        let config = GateConfig::builder("client".to_string())
            .session_duration_days(100_000_000)
            .build();
        let h = mount_with(
            config,
            MemorySessionStore::new("proto_auth_session"),
            ManualClock::new(t0()),
        );

        h.provider.deliver(assertion_for("x@y.com"));

        assert_eq!(h.gate.borrow().state(), GateState::Authorized);
        let stored = SessionRecord::from_json(&h.store.value().expect("persisted"))
            .expect("parse");
        assert!(stored.expires() > t0());
    }

    #[test]
    fn dropped_gate_ignores_late_callbacks() {
        let h = mount(AllowList::open());
        let Harness {
            gate,
            store,
            provider,
            ..
        } = h;
        drop(gate);

        provider.deliver(assertion_for("x@y.com"));
        assert!(store.value().is_none());
    }

    #[test]
    fn state_display() {
        assert_eq!(GateState::PromptShown.to_string(), "prompt_shown");
        assert!(GateState::Authorized.content_visible());
        assert!(!GateState::Denied.content_visible());
        assert!(GateState::Denied.accepts_assertion());
        assert!(!GateState::Checking.accepts_assertion());
    }
}
