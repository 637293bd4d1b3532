//! Core domain types and utilities for auth-gate.
//!
//! This crate provides the foundational types shared by the gate library,
//! the browser entry point and the operator tooling: a pluggable clock and
//! the email address type that every allow-list decision is made on.

pub mod clock;
pub mod email;

pub use clock::{Clock, ManualClock, SystemClock};
pub use email::{EmailAddress, ParseEmailError};
