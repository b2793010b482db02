//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use formcraft_observe::tracing_setup::{LogLevel, init_tracing};
//!
//! // Structured logging only
//! init_tracing(LogLevel::Info, false).unwrap();
//!
//! // With OpenTelemetry export to stdout (local development)
//! init_tracing(LogLevel::Debug, true).unwrap();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

const TRACER_NAME: &str = "formcraft";

/// Default verbosity when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// `--quiet`: errors only.
    Quiet,
    Info,
    /// `-v`
    Debug,
    /// `-vv` and beyond
    Trace,
}

impl LogLevel {
    /// Map CLI flags to a level. `quiet` wins over `verbose`.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => LogLevel::Quiet,
            (false, 0) => LogLevel::Info,
            (false, 1) => LogLevel::Debug,
            (false, _) => LogLevel::Trace,
        }
    }

    /// Directive used when `RUST_LOG` is unset. Dependencies stay at `warn`.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Info => "warn,formcraft=info,formcraft_core=info,formcraft_infra=info,formcraft_api=info",
            LogLevel::Debug => "info,formcraft=debug,formcraft_core=debug,formcraft_infra=debug,formcraft_api=debug",
            LogLevel::Trace => "debug,formcraft=trace,formcraft_core=trace,formcraft_infra=trace,formcraft_api=trace",
        }
    }
}

/// Build the filter: `RUST_LOG` if set, else the level's directive.
fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()))
}

/// Initialize the global tracing subscriber.
///
/// - Always installs a `fmt` layer on stderr with target visibility and span
///   close timing.
/// - When `enable_otel` is true, additionally bridges tracing spans to
///   OpenTelemetry using a stdout exporter.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(level: LogLevel, enable_otel: bool) -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    let registry = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt_layer);

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer(TRACER_NAME);
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        registry.with(otel_layer).try_init()?;
    } else {
        registry.try_init()?;
    }

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// No-op when OTel was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_flags() {
        assert_eq!(LogLevel::from_flags(false, 0), LogLevel::Info);
        assert_eq!(LogLevel::from_flags(false, 1), LogLevel::Debug);
        assert_eq!(LogLevel::from_flags(false, 3), LogLevel::Trace);
        assert_eq!(LogLevel::from_flags(true, 2), LogLevel::Quiet);
    }

    #[test]
    fn test_directives_parse() {
        for level in [LogLevel::Quiet, LogLevel::Info, LogLevel::Debug, LogLevel::Trace] {
            assert!(EnvFilter::try_new(level.directive()).is_ok(), "{level:?}");
        }
    }
}
