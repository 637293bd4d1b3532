//! Client-side access gate for static pages.
//!
//! This crate provides:
//! - Gate configuration (`GateConfig`), compiled into the deployed script
//! - Allow-lists of plain emails or salted email digests (`AllowList`)
//! - Session records and their persistence seam (`SessionRecord`, `SessionStore`)
//! - Identity assertion decoding (`IdentityAssertion`)
//! - The per-load state machine (`GateController`, `GateState`)
//!
//! Platform specifics (browser storage, DOM, the provider widget) plug in
//! through the `SessionStore`, `PageSurface` and `IdentityProvider` traits.
//!
//! # Access Model
//!
//! - A visitor with an unexpired session record whose email is still on
//!   the allow-list sees the page.
//! - Everyone else sees a sign-in overlay. A signed-in identity on the
//!   allow-list gets a new session record; anyone else gets a denial.
//! - An empty allow-list admits any signed-in identity (open mode).
//!
//! The gate runs entirely in the visitor's browser and trusts the
//! provider's assertion without verifying its signature. It keeps casual
//! visitors out; it does not protect the page from anyone who can read
//! its source.
//!
//! # Example
//!
//! ```
//! use auth_gate_access::{
//!     AllowList, GateConfig, SessionRecord, allow_list::email_digest,
//! };
//! use auth_gate_core::EmailAddress;
//! use chrono::{Duration, Utc};
//!
//! let email = EmailAddress::parse("Allowed@Example.com").unwrap();
//! let config = GateConfig::builder("my-app.apps.googleusercontent.com".to_string())
//!     .allow_list(AllowList::digest("pepper", [email_digest("pepper", &email)]))
//!     .build();
//! assert!(config.validate().is_ok());
//!
//! let other = EmailAddress::parse("allowed@example.com").unwrap();
//! assert!(config.allow_list().permits(&other));
//!
//! let now = Utc::now();
//! let record = SessionRecord::issue(other, None, None, now, config.session_duration());
//! assert!(!record.is_expired_at(now));
//! assert!(record.is_expired_at(now + Duration::days(7)));
//! ```

pub mod allow_list;
pub mod assertion;
pub mod config;
pub mod controller;
pub mod error;
pub mod provider;
pub mod session;
pub mod surface;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use allow_list::{AllowList, AllowListMode};
pub use assertion::{AssertionClaims, IdentityAssertion};
pub use config::{Branding, GateConfig, GateConfigBuilder};
pub use controller::{GateController, GateState, SharedGate};
pub use error::{GateError, ProviderError, StoreError};
pub use provider::{AssertionHandler, IdentityProvider};
pub use session::{MemorySessionStore, SessionRecord, SessionStore};
pub use surface::{PageSurface, Trigger};
