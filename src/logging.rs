//! Logging and tracing setup for binview.
//!
//! The library only emits `tracing` events; embedding applications decide
//! where they go. These helpers install a subscriber for binaries and tests
//! that have none of their own. Filtering follows `RUST_LOG`.

use std::sync::Once;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INIT: Once = Once::new();

/// Output layout of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install a human-readable subscriber filtered at `info` unless
/// `RUST_LOG` says otherwise. Subsequent calls are ignored.
pub fn init_tracing() {
    init_tracing_with(LogFormat::Pretty, "info");
}

/// Same as [`init_tracing`] with one JSON object per event.
pub fn init_tracing_json() {
    init_tracing_with(LogFormat::Json, "info");
}

/// Install the global subscriber once. `default_filter` applies when
/// `RUST_LOG` is unset or invalid.
pub fn init_tracing_with(format: LogFormat, default_filter: &str) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let registry = tracing_subscriber::registry().with(env_filter);

        // Leaves an existing global subscriber in place.
        let installed = match format {
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_span_events(FmtSpan::CLOSE)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_span_events(FmtSpan::CLOSE)
                        .with_target(true)
                        .with_current_span(true),
                )
                .try_init(),
        };

        if installed.is_ok() {
            info!(?format, "binview tracing initialized");
        }
    });
}

/// Open an `info` span; fields follow `tracing::info_span!` syntax.
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Log an error at `error` level and evaluate to it, for `map_err`.
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {{
        let e = $err;
        tracing::error!(error = %e, "Operation failed");
        e
    }};
    ($err:expr, $msg:expr) => {{
        let e = $err;
        tracing::error!(error = %e, message = $msg, "Operation failed");
        e
    }};
}
