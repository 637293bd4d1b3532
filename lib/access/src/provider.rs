//! Identity provider seam.
//!
//! The gate never performs the sign-in handshake itself. A provider
//! widget owns it and reports back through a registered handler; the
//! controller only decides what an assertion means.

use crate::assertion::IdentityAssertion;
use crate::error::ProviderError;
use rootcause::Report;

/// Handler invoked with each identity assertion.
///
/// The provider calls it at most once per user gesture.
pub type AssertionHandler = Box<dyn FnMut(IdentityAssertion)>;

/// External identity provider widget.
pub trait IdentityProvider {
    /// Registers the application identifier and the assertion handler.
    ///
    /// Calling this again replaces the previous handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be set up.
    fn initialize(
        &mut self,
        client_id: &str,
        handler: AssertionHandler,
    ) -> Result<(), Report<ProviderError>>;

    /// Shows the provider's sign-in UI.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is not ready or refuses to prompt.
    fn prompt_sign_in(&mut self) -> Result<(), Report<ProviderError>>;
}
