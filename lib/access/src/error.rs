//! Error types for the gate.
//!
//! - `GateError`: why a page load or sign-in attempt did not end authorized.
//!   Every variant fails closed.
//! - `StoreError`: failures of the local key-value store behind `SessionStore`.
//! - `ProviderError`: failures talking to the identity provider widget.
//!
//! Store and provider failures cross platform seams and are wrapped in a
//! rootcause `Report` there.

use chrono::{DateTime, Utc};
use std::fmt;

/// Reasons the gate refuses to treat a visitor as authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No session record is persisted.
    MissingSession,
    /// The session store could not be read.
    StoreUnavailable { reason: String },
    /// The persisted record is unparsable or missing required fields.
    MalformedSession { reason: String },
    /// The persisted record's expiry is not in the future.
    ExpiredSession { expired_at: DateTime<Utc> },
    /// The identity is not on the allow-list.
    NotAllowed { email: String },
    /// The identity assertion could not be decoded into claims.
    AssertionDecodeFailure { reason: String },
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSession => write!(f, "no session record"),
            Self::StoreUnavailable { reason } => {
                write!(f, "session store unavailable: {reason}")
            }
            Self::MalformedSession { reason } => {
                write!(f, "malformed session record: {reason}")
            }
            Self::ExpiredSession { expired_at } => {
                write!(f, "session expired at {expired_at}")
            }
            Self::NotAllowed { email } => {
                write!(f, "identity '{email}' is not on the allow-list")
            }
            Self::AssertionDecodeFailure { reason } => {
                write!(f, "could not decode identity assertion: {reason}")
            }
        }
    }
}

impl std::error::Error for GateError {}

/// Errors from the local key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store does not exist or is disabled (e.g. private browsing).
    Unavailable { reason: String },
    /// Reading the entry failed.
    ReadFailed { key: String, reason: String },
    /// Writing the entry failed (e.g. quota exceeded).
    WriteFailed { key: String, reason: String },
    /// Removing the entry failed.
    ClearFailed { key: String, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "store unavailable: {reason}"),
            Self::ReadFailed { key, reason } => {
                write!(f, "failed to read '{key}': {reason}")
            }
            Self::WriteFailed { key, reason } => {
                write!(f, "failed to write '{key}': {reason}")
            }
            Self::ClearFailed { key, reason } => {
                write!(f, "failed to remove '{key}': {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors from the identity provider integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider script has not finished loading.
    NotLoaded,
    /// Registering the client with the provider failed.
    InitializationFailed { reason: String },
    /// Showing the sign-in UI failed.
    PromptFailed { reason: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded => write!(f, "identity provider script is not loaded"),
            Self::InitializationFailed { reason } => {
                write!(f, "identity provider initialization failed: {reason}")
            }
            Self::PromptFailed { reason } => {
                write!(f, "identity provider prompt failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_error_not_allowed_display() {
        let err = GateError::NotAllowed {
            email: "blocked@y.com".to_string(),
        };
        assert!(err.to_string().contains("blocked@y.com"));
        assert!(err.to_string().contains("allow-list"));
    }

    #[test]
    fn gate_error_malformed_display() {
        let err = GateError::MalformedSession {
            reason: "missing field `email`".to_string(),
        };
        assert!(err.to_string().contains("malformed"));
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::WriteFailed {
            key: "proto_auth_session".to_string(),
            reason: "QuotaExceededError".to_string(),
        };
        assert!(err.to_string().contains("proto_auth_session"));
        assert!(err.to_string().contains("QuotaExceededError"));
    }

    #[test]
    fn provider_error_display() {
        assert!(ProviderError::NotLoaded.to_string().contains("not loaded"));
        let err = ProviderError::PromptFailed {
            reason: "popup blocked".to_string(),
        };
        assert!(err.to_string().contains("popup blocked"));
    }
}
