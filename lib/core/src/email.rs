//! Email address type.
//!
//! An `EmailAddress` keeps the claim exactly as the identity provider sent
//! it (so it round-trips through the session record unchanged) and exposes
//! a normalized form for every comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not usable as an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEmailError {
    /// The rejected input.
    pub input: String,
    /// The reason for the parse failure.
    pub reason: &'static str,
}

impl fmt::Display for ParseEmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid email address '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for ParseEmailError {}

/// An identity claim in email form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses an email address.
    ///
    /// Only the shape needed by the gate is checked: the address must be
    /// non-blank and contain an `@` with something on both sides.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or has no local part or domain.
    pub fn parse(input: impl Into<String>) -> Result<Self, ParseEmailError> {
        let input = input.into();
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseEmailError {
                input,
                reason: "empty",
            });
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(Self(input)),
            _ => Err(ParseEmailError {
                input,
                reason: "expected local@domain",
            }),
        }
    }

    /// Returns the address as originally provided.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the comparison form: surrounding whitespace removed, lowercased.
    #[must_use]
    pub fn normalized(&self) -> String {
        normalize(&self.0)
    }
}

/// Normalizes a raw email string the same way [`EmailAddress::normalized`] does.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = ParseEmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ParseEmailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}
