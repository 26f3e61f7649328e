
use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING: Once = Once::new();

/// Installs a global subscriber printing through the test harness. Verbosity comes from
/// `RUST_LOG` and defaults to `debug`.
pub(crate) fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer().with_target(true))
            .with(filter);
        if let Err(e) = subscriber.try_init() {
            eprintln!("Failed to set up logging: {}", e);
        }
    });
}
