//! Browser build of the access gate.
//!
//! Module scripts run after the document is parsed and the `.wasm` is
//! fetched asynchronously, so the page would paint before `start` runs.
//! Put the pre-hide stylesheet ([`styles::PREHIDE_SNIPPET`]) first in
//! `<head>`, followed by the module:
//!
//! ```html
//! <style id="auth-gate-prehide">html{visibility:hidden;overflow:hidden}</style>
//! <script type="module">
//!   import init from "/auth-gate/auth_gate_web.js";
//!   init();
//! </script>
//! ```
//!
//! On start the gate hides the page itself, then either reveals it for a
//! remembered visitor (removing the pre-hide stylesheet) or shows the
//! sign-in overlay. If the module never loads the page stays hidden.
//!
//! The allow-list and client id come from `gate.toml` at build time.

pub mod config;
pub mod dom;
pub mod google;
pub mod logging;
pub mod storage;
pub mod styles;

use auth_gate_access::{GateController, PageSurface, SharedGate};
use auth_gate_core::SystemClock;
use dom::DomSurface;
use google::{GSI_CLIENT_SRC, GoogleIdentityProvider};
use std::cell::RefCell;
use storage::LocalStorageStore;
use wasm_bindgen::prelude::*;

type BrowserGate = SharedGate<LocalStorageStore, DomSurface, GoogleIdentityProvider>;

thread_local! {
    // Callbacks only hold weak references, so the page owns the gate here.
    static GATE: RefCell<Option<BrowserGate>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(error = %e, "invalid gate configuration, page stays hidden");
            DomSurface::new(window, document).hide_content();
            return;
        }
    };
    logging::init(config.log_level());

    let store = LocalStorageStore::open(&window, config.session_key());
    let surface = DomSurface::new(window.clone(), document.clone());
    let provider = GoogleIdentityProvider::new(window, document, GSI_CLIENT_SRC);

    let gate = GateController::mount(config, store, surface, provider, SystemClock);
    tracing::info!(state = %gate.borrow().state(), "gate mounted");

    GATE.with(|slot| *slot.borrow_mut() = Some(gate));
}
