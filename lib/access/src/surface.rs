//! Rendered page surface.
//!
//! Everything the gate shows or hides goes through this trait, so the
//! controller stays independent of the DOM. Implementations must make
//! every operation idempotent; the controller may repeat them.

use crate::config::Branding;
use crate::session::SessionRecord;

/// Callback wired to a user affordance (sign-in button, sign-out control).
pub type Trigger = Box<dyn FnMut()>;

/// The page the gate protects.
pub trait PageSurface {
    /// Hides page content and suppresses scrolling.
    fn hide_content(&mut self);

    /// Makes page content visible again.
    fn reveal_content(&mut self);

    /// Renders the full-viewport sign-in overlay. `on_sign_in` fires when
    /// the visitor activates the sign-in affordance.
    fn show_sign_in_prompt(&mut self, branding: &Branding, on_sign_in: Trigger);

    /// Removes the sign-in overlay, if present.
    fn remove_sign_in_prompt(&mut self);

    /// Shows the denial message on the overlay. Content visibility is
    /// left unchanged.
    fn show_denied(&mut self);

    /// Renders the signed-in indicator with a sign-out affordance.
    fn show_signed_in(&mut self, record: &SessionRecord, on_sign_out: Trigger);

    /// Reloads the page, discarding all in-flight state.
    fn reload(&mut self);
}
