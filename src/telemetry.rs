//! Log output for the `series_sketch` binary.
//!
//! Capture and reshape emit `tracing` events (grid construction, snapping,
//! interpolation fills, validation warnings). The library installs nothing by
//! itself; hosts that want those events on stderr call `init_default_tracing`.

/// Filter applied when `RUST_LOG` is unset: this crate at `info`, dependencies at `warn`.
pub const DEFAULT_LOG_FILTER: &str = "warn,series_sketch=info";

/// Installs a compact stderr subscriber when the `telemetry` feature is enabled.
///
/// Stdout is left to prompts and CSV output. Returns `false` when the feature
/// is disabled or a global subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
