//! `localStorage`-backed session store.

use auth_gate_access::{SessionStore, StoreError};
use rootcause::Report;
use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

/// Session store over the page origin's `localStorage`.
///
/// Opening never fails: if storage is blocked (private mode, sandboxed
/// iframe, disabled cookies) every operation reports
/// `StoreError::Unavailable` and the gate treats the visitor as signed out.
pub struct LocalStorageStore {
    key: String,
    storage: Result<Storage, String>,
}

impl LocalStorageStore {
    /// Binds a store to `key` in the window's `localStorage`.
    #[must_use]
    pub fn open(window: &Window, key: impl Into<String>) -> Self {
        let storage = match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err("localStorage is not available".to_string()),
            Err(e) => Err(js_reason(&e)),
        };
        if let Err(reason) = &storage {
            tracing::warn!(%reason, "session storage unavailable");
        }
        Self {
            key: key.into(),
            storage,
        }
    }

    fn storage(&self) -> Result<&Storage, Report<StoreError>> {
        self.storage.as_ref().map_err(|reason| {
            StoreError::Unavailable {
                reason: reason.clone(),
            }
            .into()
        })
    }
}

impl SessionStore for LocalStorageStore {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<Option<String>, Report<StoreError>> {
        self.storage()?.get_item(&self.key).map_err(|e| {
            StoreError::ReadFailed {
                key: self.key.clone(),
                reason: js_reason(&e),
            }
            .into()
        })
    }

    fn save(&mut self, value: &str) -> Result<(), Report<StoreError>> {
        self.storage()?.set_item(&self.key, value).map_err(|e| {
            StoreError::WriteFailed {
                key: self.key.clone(),
                reason: js_reason(&e),
            }
            .into()
        })
    }

    fn clear(&mut self) -> Result<(), Report<StoreError>> {
        self.storage()?.remove_item(&self.key).map_err(|e| {
            StoreError::ClearFailed {
                key: self.key.clone(),
                reason: js_reason(&e),
            }
            .into()
        })
    }
}

/// Renders a thrown JS value for logs and error reasons.
pub(crate) fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
