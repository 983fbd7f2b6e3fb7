#![doc(test(attr(deny(warnings))))]

//! Study Wizard turns a form description into a paged study: static markup
//! for the browser, and an in-process runtime with a terminal shell that
//! drives the same navigation, validation, autosave, and export rules.

pub mod cli;
pub mod errors;
pub mod generator;
pub mod utils;

use std::sync::Once;

pub use errors::WizardError;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Study Wizard tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
