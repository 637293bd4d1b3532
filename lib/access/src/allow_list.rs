//! Allow-list of identities permitted past the gate.
//!
//! Two modes are supported:
//! - `Plain`: entries are email addresses, compared after normalization.
//! - `Digest`: entries are lowercase hex SHA-256 digests of
//!   `salt || normalized_email`, so the deployed page does not carry the
//!   addresses themselves.
//!
//! # Open mode
//!
//! An allow-list with no entries admits **any** identity the provider
//! vouches for. This is intentional (it is how a fresh deployment is
//! brought up) but it is a footgun in production, so the controller logs a
//! warning every time it evaluates an open list.

use auth_gate_core::EmailAddress;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// How allow-list entries are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllowListMode {
    /// Entries are literal email addresses.
    #[default]
    Plain,
    /// Entries are salted SHA-256 digests of normalized email addresses.
    Digest,
}

/// Configured set of identities permitted past the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowList {
    /// Interpretation of `entries`.
    #[serde(default)]
    mode: AllowListMode,
    /// Salt prepended to the normalized email before hashing (digest mode).
    #[serde(default)]
    salt: String,
    /// Permitted emails or digests.
    #[serde(default)]
    entries: Vec<String>,
}

impl AllowList {
    /// Creates an open allow-list that admits any identity.
    #[must_use]
    pub fn open() -> Self {
        Self::default()
    }

    /// Creates a plain allow-list from email addresses.
    #[must_use]
    pub fn plain<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: AllowListMode::Plain,
            salt: String::new(),
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a digest allow-list from precomputed digests.
    #[must_use]
    pub fn digest<I, S>(salt: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: AllowListMode::Digest,
            salt: salt.into(),
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the list is empty and therefore admits anyone.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry interpretation mode.
    #[must_use]
    pub fn mode(&self) -> AllowListMode {
        self.mode
    }

    /// Returns the digest salt.
    #[must_use]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Returns the configured entries.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Returns true if `email` may pass the gate.
    #[must_use]
    pub fn permits(&self, email: &EmailAddress) -> bool {
        if self.is_open() {
            return true;
        }

        match self.mode {
            AllowListMode::Plain => {
                let normalized = email.normalized();
                self.entries
                    .iter()
                    .any(|entry| auth_gate_core::email::normalize(entry) == normalized)
            }
            AllowListMode::Digest => {
                let digest = email_digest(&self.salt, email);
                self.entries
                    .iter()
                    .any(|entry| entry.trim().eq_ignore_ascii_case(&digest))
            }
        }
    }

    /// Checks that every entry is well-formed for the list's mode.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending entry.
    pub fn validate(&self) -> Result<(), String> {
        for entry in &self.entries {
            match self.mode {
                AllowListMode::Plain => {
                    EmailAddress::parse(entry.as_str()).map_err(|e| e.to_string())?;
                }
                AllowListMode::Digest => {
                    let entry = entry.trim();
                    if entry.len() != DIGEST_HEX_LEN
                        || !entry.chars().all(|c| c.is_ascii_hexdigit())
                    {
                        return Err(format!(
                            "digest entry '{entry}' is not {DIGEST_HEX_LEN} hex characters"
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Computes the allow-list digest of an email address.
///
/// The address is normalized first, so `Allowed@Example.com` and
/// `allowed@example.com` produce the same digest.
#[must_use]
pub fn email_digest(salt: &str, email: &EmailAddress) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(email.normalized().as_bytes());
    hex::encode(hasher.finalize())
}
