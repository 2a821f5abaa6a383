//! Observability bootstrap for binaries embedding the session core.
//!
//! Library code logs through `tracing` macros with structured fields; these
//! helpers install a sensible subscriber stack for hosts that do not bring
//! their own.

use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber.
///
/// Honors `RUST_LOG`; falls back to `error,waypoint=info`. Calling this more
/// than once, or after the host installed its own subscriber, is a no-op.
pub fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("error,waypoint=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init();
}

/// Install miette's pretty panic reports.
pub fn init_miette() {
    miette::set_panic_hook();
}
