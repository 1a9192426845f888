// ==========================================
// Order Batch Ingestion Service - Logging setup
// ==========================================
// tracing-subscriber registry with an env-driven filter. Dependencies
// stay at warn by default; this crate logs at info. LOG_FORMAT=json
// switches the console layer to JSON lines for log shippers.
// ==========================================

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter applied when RUST_LOG is unset.
const DEFAULT_DIRECTIVES: &str = "warn,order_ingest=info";

/// Initialise logging for the service binary.
///
/// # Environment
/// - RUST_LOG: overrides the default filter entirely
///   (e.g. RUST_LOG=order_ingest=trace)
/// - LOG_FORMAT: `json` emits one JSON object per event; anything else
///   keeps the compact human format
pub fn init() {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(DEFAULT_DIRECTIVES),
    };

    let registry = tracing_subscriber::registry().with(filter);

    if json_output() {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

/// Initialise logging for tests: this crate at debug, output captured
/// per test. Safe to call from every test.
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("order_ingest=debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

fn json_output() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
