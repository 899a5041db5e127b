use std::io::{self, IsTerminal};

use tracing::Metadata;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::{self, FilterFn},
    fmt::{self, format::Writer, time::FormatTime},
    registry::LookupSpan,
};

/// Target prefix of every event emitted by this library.
pub const TARGET_PREFIX: &str = "ai_llm_service";

/// `2025-09-12T10:20:30Z`-style timestamps.
#[derive(Clone, Debug, Default)]
struct UtcSeconds;

impl FormatTime for UtcSeconds {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        w.write_str(
            &chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        )
    }
}

fn is_library_event(meta: &Metadata<'_>) -> bool {
    meta.target().starts_with(TARGET_PREFIX)
}

fn is_application_event(meta: &Metadata<'_>) -> bool {
    !is_library_event(meta)
}

/// Formatting layer for events from this crate only.
///
/// Remote calls are the slow part of an analysis, so span-close events are
/// kept: `generate` spans report their duration when they end.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let format = fmt::format()
        .compact()
        .with_timer(UtcSeconds)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    fmt::layer()
        .with_ansi(io::stdout().is_terminal())
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(format)
        .with_filter(filter::filter_fn(is_library_event))
}

/// Per-layer filter for the application's own formatter, so library events
/// are not printed twice when composed with [`layer`].
pub fn exclude_library() -> FilterFn<fn(&Metadata<'_>) -> bool> {
    filter::filter_fn(is_application_event as fn(&Metadata<'_>) -> bool)
}

/// `RUST_LOG` if set, otherwise `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
