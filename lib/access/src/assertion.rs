//! Identity assertions from the provider widget.
//!
//! The provider hands back a credential shaped like a JWT: three
//! dot-separated base64url segments. Only the middle (claims) segment is
//! decoded.
//!
//! # Trust
//!
//! The signature segment is **not** verified and no network call is made
//! to check the token. Anyone able to run script on the page can forge an
//! assertion, so the gate is a convenience wall, not a security boundary.
//! Deployments that need real enforcement must verify the credential on a
//! server they control.

use crate::error::GateError;
use auth_gate_core::EmailAddress;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// The object the provider passes to the registered callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssertion {
    /// The encoded credential.
    pub credential: String,
    /// How the user picked the account (e.g. "btn", "user"), if reported.
    pub select_by: Option<String>,
}

impl IdentityAssertion {
    /// Creates an assertion from an encoded credential.
    #[must_use]
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            select_by: None,
        }
    }

    /// Sets how the user picked the account.
    #[must_use]
    pub fn with_select_by(mut self, select_by: Option<String>) -> Self {
        self.select_by = select_by;
        self
    }

    /// Decodes the claims segment of the credential.
    ///
    /// # Errors
    ///
    /// Returns `GateError::AssertionDecodeFailure` if the credential does
    /// not have three segments, the claims segment is not base64url JSON,
    /// or the email claim is missing or unusable.
    pub fn decode_claims(&self) -> Result<AssertionClaims, GateError> {
        decode_claims(&self.credential)
    }
}

/// Claims the gate reads from an assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionClaims {
    /// The signed-in email.
    pub email: EmailAddress,
    /// Display name, if present.
    pub name: Option<String>,
    /// Avatar URL, if present.
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

fn decode_failure(reason: impl Into<String>) -> GateError {
    GateError::AssertionDecodeFailure {
        reason: reason.into(),
    }
}

/// Decodes the claims segment of an encoded credential.
///
/// # Errors
///
/// See [`IdentityAssertion::decode_claims`].
pub fn decode_claims(credential: &str) -> Result<AssertionClaims, GateError> {
    let segments: Vec<&str> = credential.trim().split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(decode_failure(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    };

    // Tolerate padded input even though JWT segments are unpadded.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| decode_failure(format!("claims segment is not base64url: {e}")))?;

    let raw: RawClaims = serde_json::from_slice(&bytes)
        .map_err(|e| decode_failure(format!("claims segment is not a JSON object: {e}")))?;

    let email = raw
        .email
        .ok_or_else(|| decode_failure("missing email claim"))
        .and_then(|email| EmailAddress::parse(email).map_err(|e| decode_failure(e.to_string())))?;

    Ok(AssertionClaims {
        email,
        name: raw.name.filter(|n| !n.is_empty()),
        picture: raw.picture.filter(|p| !p.is_empty()),
    })
}
