use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Maps a `LOGLEVEL` value to a tracing level, case-insensitively.
///
/// Unknown values fall back to INFO.
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_uppercase().as_str() {
        "DEBUG" => Level::DEBUG,
        "ERROR" => Level::ERROR,
        "WARN" => Level::WARN,
        "TRACE" => Level::TRACE,
        _ => Level::INFO,
    }
}

/// Sets up the global tracing subscriber once per process
///
/// Environment variables:
/// - LOGLEVEL: Sets the log level (DEBUG, INFO, WARN, ERROR, TRACE)
/// - RUST_LOG: Extra per-target directives for the env filter
pub fn setup_logger() -> Result<(), Box<dyn std::error::Error>> {
    INIT.call_once(|| {
        let level = parse_log_level(&env::var("LOGLEVEL").unwrap_or_else(|_| "INFO".to_string()));

        let registry = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(true),
            )
            .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()));

        // A subscriber installed by an embedding application wins
        if registry.try_init().is_err() {
            return;
        }

        tracing::debug!("Log level set to: {}", level);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests touching LOGLEVEL run one at a time
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn with_log_level<F>(value: Option<&str>, test_fn: F)
    where
        F: FnOnce(),
    {
        let _guard = TEST_MUTEX.lock().unwrap();
        let original = env::var("LOGLEVEL").ok();

        match value {
            Some(v) => env::set_var("LOGLEVEL", v),
            None => env::remove_var("LOGLEVEL"),
        }

        test_fn();

        match original {
            Some(v) => env::set_var("LOGLEVEL", v),
            None => env::remove_var("LOGLEVEL"),
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_log_level("INFO"), Level::INFO);
        assert_eq!(parse_log_level("WARN"), Level::WARN);
        assert_eq!(parse_log_level("ERROR"), Level::ERROR);
        assert_eq!(parse_log_level("TRACE"), Level::TRACE);
    }

    #[test]
    fn test_log_level_case_insensitive() {
        assert_eq!(parse_log_level("debug"), Level::DEBUG);
        assert_eq!(parse_log_level(" Warn "), Level::WARN);
    }

    #[test]
    fn test_log_level_parsing_invalid_defaults_to_info() {
        assert_eq!(parse_log_level("INVALID"), Level::INFO);
        assert_eq!(parse_log_level(""), Level::INFO);
    }

    #[test]
    fn test_setup_logger_is_idempotent() {
        with_log_level(Some("debug"), || {
            assert!(setup_logger().is_ok());
            assert!(setup_logger().is_ok());
        });
    }

    #[test]
    fn test_setup_logger_without_env() {
        with_log_level(None, || {
            assert!(setup_logger().is_ok());
        });
    }
}
