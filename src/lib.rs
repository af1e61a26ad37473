#![doc(test(attr(deny(warnings))))]

//! Alu Configurator drives the aluminium joinery quoting wizard from a
//! terminal: collaborator wiring (local JSON files or the remote quoting
//! service), the interactive shell, and process setup.

pub mod backend;
pub mod cli;
pub mod errors;
pub mod remote;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Alu Configurator tracing initialized.");
    });
}
