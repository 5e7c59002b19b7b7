//! Diagnostics for the mask engine.
//!
//! The library only emits `tracing` events. Binaries call [`init`] to print
//! them on stderr, filtered by `RUST_LOG`:
//! - `RUST_LOG=debug` - every accepted reformat and rejected edit
//! - `RUST_LOG=keymask::mask=debug` - engine decisions only
//!
//! Without `RUST_LOG` only warnings (configuration problems) are shown.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    if let Err(err) = tracing_subscriber::registry().with(stderr_layer).try_init() {
        eprintln!("Warning: Could not initialize logging: {}", err);
    }
}
