//! Logging Infrastructure
//!
//! Structured logging over `tracing`: console output always, plus a
//! daily-rolling file when a log directory is configured. The directory
//! is created on demand; a directory that cannot be created falls back
//! to console-only output.

use tracing_subscriber::EnvFilter;

/// Initialize the logger with defaults
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output.
///
/// `log_level` accepts full `EnvFilter` directives
/// ("info", "cafe_server=debug,surrealdb=warn", ...).
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_new(log_level.unwrap_or("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    match log_dir.filter(|dir| prepare_log_dir(dir)) {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "cafe-server");
            subscriber.with_writer(file_appender).init();
        }
        None => subscriber.init(),
    }
}

/// Create the log directory, reporting failure on stderr (tracing is
/// not initialized yet at this point)
fn prepare_log_dir(dir: &str) -> bool {
    match std::fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Failed to create log directory {dir}: {e}; logging to console only");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_log_dir_creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("logs").join("daily");
        let nested_str = nested.to_str().unwrap();

        assert!(prepare_log_dir(nested_str));
        assert!(nested.is_dir());
        // Idempotent on the second call
        assert!(prepare_log_dir(nested_str));
    }
}
