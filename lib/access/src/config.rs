//! Gate configuration.
//!
//! The configuration is compiled into the deployed script; there is no
//! runtime configuration source. It is written as TOML and loaded through
//! the `config` crate so the same defaults apply whether the document is
//! embedded or constructed with [`GateConfigBuilder`].

use crate::allow_list::AllowList;
use chrono::Duration;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Complete configuration for one gated deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Application identifier registered with the identity provider.
    client_id: String,
    /// Key of the persisted session entry.
    /// Default: "proto_auth_session"
    #[serde(default = "default_session_key")]
    session_key: String,
    /// Session lifetime in days.
    /// Default: 7
    #[serde(default = "default_session_duration_days")]
    session_duration_days: i64,
    /// Tracing filter directive for the browser console.
    /// Default: "info"
    #[serde(default = "default_log_level")]
    log_level: String,
    /// Identities permitted past the gate. Empty means open mode.
    #[serde(default)]
    allow_list: AllowList,
    /// Text shown on the sign-in overlay.
    #[serde(default)]
    branding: Branding,
}

/// Text rendered on the sign-in overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    /// Overlay heading.
    #[serde(default = "default_title")]
    pub title: String,
    /// Line under the heading.
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    /// Message shown when the identity is rejected.
    #[serde(default = "default_denied_message")]
    pub denied_message: String,
}

/// Longest session lifetime accepted, roughly a century.
pub const MAX_SESSION_DURATION_DAYS: i64 = 36_500;

fn default_session_key() -> String {
    "proto_auth_session".to_string()
}

fn default_session_duration_days() -> i64 {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_title() -> String {
    "Prototype Lab".to_string()
}

fn default_subtitle() -> String {
    "Sign in with Google to access prototypes".to_string()
}

fn default_denied_message() -> String {
    "Access denied. Your email is not on the approved list.".to_string()
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            denied_message: default_denied_message(),
        }
    }
}

impl GateConfig {
    /// Creates a configuration with defaults for optional fields.
    #[must_use]
    pub fn new(client_id: String, allow_list: AllowList) -> Self {
        Self {
            client_id,
            session_key: default_session_key(),
            session_duration_days: default_session_duration_days(),
            log_level: default_log_level(),
            allow_list,
            branding: Branding::default(),
        }
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(client_id: String) -> GateConfigBuilder {
        GateConfigBuilder::new(client_id)
    }

    /// Loads and validates a configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse, a required field
    /// is missing, or [`validate`](Self::validate) rejects it.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty client ID, a session duration outside
    /// `1..=MAX_SESSION_DURATION_DAYS`, or malformed allow-list entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::Message("client_id must not be empty".to_string()));
        }
        if self.session_key.is_empty() {
            return Err(ConfigError::Message(
                "session_key must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_SESSION_DURATION_DAYS).contains(&self.session_duration_days) {
            return Err(ConfigError::Message(format!(
                "session_duration_days must be between 1 and {MAX_SESSION_DURATION_DAYS}, got {}",
                self.session_duration_days
            )));
        }
        self.allow_list
            .validate()
            .map_err(|reason| ConfigError::Message(format!("allow_list: {reason}")))
    }

    /// Returns the identity provider application identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the key of the persisted session entry.
    #[must_use]
    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Returns how long a new session stays valid.
    ///
    /// Out-of-range values from an unvalidated builder are clamped to
    /// `1..=MAX_SESSION_DURATION_DAYS`.
    #[must_use]
    pub fn session_duration(&self) -> Duration {
        Duration::days(self.session_duration_days.clamp(1, MAX_SESSION_DURATION_DAYS))
    }

    /// Returns the tracing filter directive.
    #[must_use]
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Returns the allow-list.
    #[must_use]
    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Returns the overlay text.
    #[must_use]
    pub fn branding(&self) -> &Branding {
        &self.branding
    }
}

/// Builder for `GateConfig`.
#[derive(Debug)]
pub struct GateConfigBuilder {
    client_id: String,
    session_key: String,
    session_duration_days: i64,
    log_level: String,
    allow_list: AllowList,
    branding: Branding,
}

impl GateConfigBuilder {
    /// Creates a new builder with the required client ID.
    #[must_use]
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            session_key: default_session_key(),
            session_duration_days: default_session_duration_days(),
            log_level: default_log_level(),
            allow_list: AllowList::open(),
            branding: Branding::default(),
        }
    }

    /// Sets the key of the persisted session entry.
    #[must_use]
    pub fn session_key(mut self, key: String) -> Self {
        self.session_key = key;
        self
    }

    /// Sets the session lifetime in days.
    #[must_use]
    pub fn session_duration_days(mut self, days: i64) -> Self {
        self.session_duration_days = days;
        self
    }

    /// Sets the tracing filter directive.
    #[must_use]
    pub fn log_level(mut self, level: String) -> Self {
        self.log_level = level;
        self
    }

    /// Sets the allow-list.
    #[must_use]
    pub fn allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Sets the overlay text.
    #[must_use]
    pub fn branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    /// Builds the `GateConfig`.
    #[must_use]
    pub fn build(self) -> GateConfig {
        GateConfig {
            client_id: self.client_id,
            session_key: self.session_key,
            session_duration_days: self.session_duration_days,
            log_level: self.log_level,
            allow_list: self.allow_list,
            branding: self.branding,
        }
    }
}
