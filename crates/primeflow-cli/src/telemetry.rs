//! Log output for the CLI.
//!
//! Events from the pipeline (worker lifecycle, shutdown reason, failed writes)
//! go to stderr so stdout carries only result lines. Verbosity is controlled
//! with `RUST_LOG` and defaults to `info`.
//!
//! ```bash
//! RUST_LOG=primeflow=debug primeflow 100 -17 25
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()?;

    Ok(())
}
