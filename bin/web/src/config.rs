//! Configuration compiled into the module.

use auth_gate_access::GateConfig;
use config::ConfigError;

/// The deployment's `gate.toml`, fixed at build time.
pub const GATE_TOML: &str = include_str!("../gate.toml");

/// Loads and validates the embedded configuration.
///
/// # Errors
///
/// Returns an error if `gate.toml` does not parse or fails validation.
pub fn load() -> Result<GateConfig, ConfigError> {
    GateConfig::from_toml(GATE_TOML)
}
