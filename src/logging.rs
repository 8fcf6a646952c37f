//! Logging initialization.
//!
//! Installs a `tracing` fmt subscriber writing to stderr. `RUST_LOG` takes
//! precedence; otherwise the level comes from `[logging] level` in the
//! settings, or `debug` when global debug mode is on.

use crate::config::Settings;
use tracing_subscriber::EnvFilter;

fn filter_for(settings: &Settings) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = if settings.debug {
        "debug"
    } else {
        settings.logging.level.as_str()
    };
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber. Returns `false` if one was already set,
/// which makes repeated calls harmless.
pub fn init(settings: &Settings) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(settings))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let settings = Settings::default();
        init(&settings);
        assert!(!init(&settings));
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let mut settings = Settings::default();
        settings.logging.level = "not a level [".to_string();
        // Must not panic
        let _ = filter_for(&settings);
    }
}
