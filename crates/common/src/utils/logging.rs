use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset: our crates at info, the HTTP stack quieter.
const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn";

/// JSON default: info everywhere, debug for the session layer.
const JSON_FILTER: &str = "info,service::session=debug";

/// Initialize tracing subscriber with compact human-readable output.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,reqwest=warn,hyper=warn`
/// - Writes to stderr so command output on stdout stays clean
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,service::session=debug`
/// - Session events (`login_succeeded`, `session_forced_logout`, ...) keep their fields
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(JSON_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .json()
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_filters_parse() {
        for filter in [DEFAULT_FILTER, JSON_FILTER] {
            assert!(EnvFilter::try_new(filter).is_ok(), "{filter}");
        }
        assert!(JSON_FILTER.contains("service::session=debug"));
    }

    #[test]
    fn init_is_idempotent() {
        init_logging_default();
        init_logging_json();
        init_logging_default();
    }
}
