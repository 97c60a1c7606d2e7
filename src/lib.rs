#![doc(test(attr(deny(warnings))))]

//! Demonstrativo Core builds financial statement trees for farm bookkeeping:
//! cost-center and period filtered totals rolled up from accounts to natures,
//! entry groupings by season or calendar, and a terminal shell to browse them.

pub mod cli;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod grouping;
pub mod statement;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Demonstrativo Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
