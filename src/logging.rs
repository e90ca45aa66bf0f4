//! Tracing setup for the elfpeek binary and tests.
//!
//! Log records always go to stderr; stdout carries only the report.
//! `RUST_LOG` overrides the default filter.

use std::io::IsTerminal;
use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "warn";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install a human-readable subscriber. Only the first call in a process
/// (for either format) has any effect.
pub fn init_tracing(default_filter: &str) {
    INIT.call_once(|| {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_line_number(true);

        let installed = tracing_subscriber::registry()
            .with(env_filter(default_filter))
            .with(layer)
            .try_init()
            .is_ok();
        debug!(installed, "tracing ready");
    });
}

/// Like [`init_tracing`], with one JSON object per record.
pub fn init_tracing_json(default_filter: &str) {
    INIT.call_once(|| {
        let layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_line_number(true)
            .with_current_span(true);

        let installed = tracing_subscriber::registry()
            .with(env_filter(default_filter))
            .with(layer)
            .try_init()
            .is_ok();
        debug!(installed, "tracing ready (json)");
    });
}

/// Open an info-level span.
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
