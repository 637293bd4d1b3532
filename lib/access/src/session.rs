//! Session records and their persistence.
//!
//! A session record is the locally persisted proof of a prior successful,
//! still-unexpired authorization decision. It lives in a single entry of a
//! key-value store, serialized as compact JSON:
//!
//! ```json
//! {"email":"x@y.com","name":"X","picture":"https://...","expires":1767225600000}
//! ```
//!
//! `expires` is milliseconds since the Unix epoch. A record only proves
//! who signed in and until when; whether that identity is still allowed is
//! decided again on every load.

use crate::error::{GateError, StoreError};
use auth_gate_core::EmailAddress;
use chrono::{DateTime, Duration, Utc};
use rootcause::Report;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Persisted proof of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Identity claim from the provider.
    email: EmailAddress,
    /// Display name, if the provider sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Avatar URL, if the provider sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    picture: Option<String>,
    /// When the record stops being valid.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    expires: DateTime<Utc>,
}

impl SessionRecord {
    /// Creates a record with an explicit expiry.
    #[must_use]
    pub fn new(
        email: EmailAddress,
        name: Option<String>,
        picture: Option<String>,
        expires: DateTime<Utc>,
    ) -> Self {
        Self {
            email,
            name,
            picture,
            expires,
        }
    }

    /// Creates a record issued at `now` that lasts for `duration`.
    ///
    /// An expiry past the end of the representable range saturates to
    /// `DateTime::<Utc>::MAX_UTC`.
    #[must_use]
    pub fn issue(
        email: EmailAddress,
        name: Option<String>,
        picture: Option<String>,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        let expires = now
            .checked_add_signed(duration)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(email, name, picture, expires)
    }

    /// Returns the signed-in email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the display name, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the avatar URL, if present.
    #[must_use]
    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    /// Returns when the record expires.
    #[must_use]
    pub fn expires(&self) -> DateTime<Utc> {
        self.expires
    }

    /// Returns true if the record is no longer valid at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// Serializes the record to its persisted form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a persisted record.
    ///
    /// # Errors
    ///
    /// Returns `GateError::MalformedSession` for anything that is not a
    /// complete record: invalid JSON, `null`, a missing or blank email, or a
    /// missing or non-numeric expiry.
    pub fn from_json(raw: &str) -> Result<Self, GateError> {
        serde_json::from_str(raw).map_err(|e| GateError::MalformedSession {
            reason: e.to_string(),
        })
    }
}

/// Local key-value persistence for the single session entry.
///
/// Implementations are bound to one key at construction; the gate never
/// touches any other entry.
pub trait SessionStore {
    /// Returns the key this store reads and writes.
    fn key(&self) -> &str;

    /// Reads the raw entry, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load(&self) -> Result<Option<String>, Report<StoreError>>;

    /// Replaces the entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&mut self, value: &str) -> Result<(), Report<StoreError>>;

    /// Removes the entry. Removing a missing entry succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails.
    fn clear(&mut self) -> Result<(), Report<StoreError>>;
}

/// In-memory `SessionStore`.
///
/// Clones share the same entries, so a handle kept outside the controller
/// observes what the controller persisted. A store can also be switched to
/// unavailable to exercise failure paths.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    key: String,
    entries: Rc<RefCell<HashMap<String, String>>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemorySessionStore {
    /// Creates an empty store bound to `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Rc::new(RefCell::new(HashMap::new())),
            unavailable: Rc::new(Cell::new(false)),
        }
    }

    /// Creates a store whose entry is already set to `value`.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new(key);
        store
            .entries
            .borrow_mut()
            .insert(store.key.clone(), value.into());
        store
    }

    /// Returns the current raw entry.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.entries.borrow().get(&self.key).cloned()
    }

    /// Makes every subsequent operation fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    fn check_available(&self) -> Result<(), Report<StoreError>> {
        if self.unavailable.get() {
            return Err(StoreError::Unavailable {
                reason: "store disabled".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl SessionStore for MemorySessionStore {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<Option<String>, Report<StoreError>> {
        self.check_available()?;
        Ok(self.value())
    }

    fn save(&mut self, value: &str) -> Result<(), Report<StoreError>> {
        self.check_available()?;
        self.entries
            .borrow_mut()
            .insert(self.key.clone(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Report<StoreError>> {
        self.check_available()?;
        self.entries.borrow_mut().remove(&self.key);
        Ok(())
    }
}
