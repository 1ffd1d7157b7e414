//! Tracing setup for binaries, tests and benches

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Install a terminal subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"info"` or `"zkbalance_core=debug"`).
///
/// Spans are reported when they close, so instrumented steps show their
/// timing. Returns `false` when a global subscriber was already installed.
pub fn setup_tracing(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let fmt_layer = tracing_subscriber::fmt::layer().with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_tracing_is_idempotent() {
        setup_tracing("warn");
        // A second install never succeeds once the global default is set
        assert!(!setup_tracing("debug"));
    }
}
