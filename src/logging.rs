use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,gift_advisor=debug";

/// Initialize tracing with a compact stdout layer and a Sentry layer.
///
/// - Stdout: human-readable for the host's dev console
/// - Sentry: captures ERROR events as issues, WARN as breadcrumbs. No-op
///   unless the host has bound a Sentry client.
/// - Filter: `RUST_LOG` wins, then `filter_override`, then the default.
///
/// Returns `false` when a global subscriber was already installed (the host
/// or a previous call got there first).
pub fn init(filter_override: Option<&str>) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_override.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .compact();

    // Routes tracing::error!/warn! from non-fatal failures to Sentry.
    let sentry_layer = sentry_tracing::layer().event_filter(|meta| match *meta.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(sentry_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Tracing initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        // Whichever call wins, the second one must report the existing subscriber.
        let _ = init(Some("warn"));
        assert!(!init(None));
    }
}
