//! Diagnostic tracing to stderr, filtered by CODEX_BOX_LOG (EnvFilter syntax).

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

pub const LOG_ENV: &str = "CODEX_BOX_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber once; later calls are no-ops.
pub fn telemetry_init() {
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    });
}
