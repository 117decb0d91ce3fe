//! Diagnostic logging setup
//!
//! Audit records go to `audit.log`; this is only the developer-facing
//! `tracing` output, written to stderr and filtered through `RUST_LOG`.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "budget_forecast=info";

/// Install the global tracing subscriber once
///
/// Later calls, or a subscriber installed elsewhere, leave things as they are.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
