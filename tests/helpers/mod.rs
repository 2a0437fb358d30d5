pub mod data;
pub mod harness;

use std::sync::Once;

use helium_index::logging::{self, DebugLevel};

#[allow(dead_code)]
static INIT: Once = Once::new();

/// `RUST_LOG=debug cargo test` to see the index layer's events.
#[allow(dead_code)]
pub fn init_logging_for_tests() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| match s.to_uppercase().as_str() {
            "OFF" => Some(DebugLevel::Off),
            "ERROR" | "WARN" => Some(DebugLevel::Error),
            "INFO" => Some(DebugLevel::Info),
            "DEBUG" => Some(DebugLevel::Debug),
            "TRACE" => Some(DebugLevel::Trace),
            _ => None,
        })
        .unwrap_or(DebugLevel::Off);

    INIT.call_once(|| {
        logging::init(level);
    });
}
