use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Targets of the backend's own crates; events from anything else
/// (hyper, reqwest, tower) are left to the global subscriber.
pub const TARGET_PREFIXES: &[&str] = &["ai_llm_service", "downtime_segments", "api"];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// True for targets inside one of [`TARGET_PREFIXES`].
pub fn is_own_target(target: &str) -> bool {
    TARGET_PREFIXES.iter().any(|p| {
        target
            .strip_prefix(p)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// Formatting layer that renders ONLY events emitted by the backend crates.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line` and target
/// - Span close events (duration at the end of spans)
/// - ANSI colors only when stdout is a terminal
///
/// Compose it in the binary together with the global subscriber.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_ours = filter::filter_fn(|meta| is_own_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_ours)
}

/// Level directive for one target, e.g. `downtime_segments=debug`.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    Directive::from_str(&format!("{target}={}", level.as_str().to_lowercase())).ok()
}

/// EnvFilter from `RUST_LOG` or `default`, then one level directive per
/// `(target, level)` override.
///
/// Example: `env_filter("info", &[("downtime_segments", Level::DEBUG)])`
/// shows INFO globally and DEBUG for the segmentation engine.
pub fn env_filter(default: &str, overrides: &[(&str, Level)]) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    overrides
        .iter()
        .filter_map(|(t, level)| level_directive(t, *level))
        .fold(base, |f, d| f.add_directive(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_targets_match_by_crate_path() {
        assert!(is_own_target("downtime_segments::builder"));
        assert!(is_own_target("api"));
        assert!(!is_own_target("apiary"));
        assert!(!is_own_target("hyper::proto"));
    }

    #[test]
    fn directive_formats_lowercase_level() {
        let d = level_directive("downtime_segments", Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "downtime_segments=debug");
    }
}
