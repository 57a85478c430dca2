use crate::config::LoggingConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, registry::Registry, EnvFilter, Layer};

/// Console default: quiet, so a normal run shows only the progress line.
const CONSOLE_DIRECTIVE: &str = "chemtab=warn";
/// Log files keep the run summary.
const FILE_DIRECTIVE: &str = "chemtab=info";

/// Initializes logging: console output on stderr, plus a daily-rolling file
/// when `config.dir` is set. `RUST_LOG` overrides both default filters.
///
/// Stdout is left to the progress line and lookup results. Keep the returned
/// guard alive until exit so buffered file logs are flushed. A log directory
/// that cannot be created is reported as a warning and only the console
/// layer is installed.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let mut dir_error: Option<(PathBuf, io::Error)> = None;
    let (file_layer, guard) = match &config.dir {
        Some(dir) => match file_writer(dir) {
            Ok((writer, guard)) => {
                let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
                    fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_filter(filter(rust_log.as_deref(), FILE_DIRECTIVE))
                        .boxed()
                } else {
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer)
                        .with_filter(filter(rust_log.as_deref(), FILE_DIRECTIVE))
                        .boxed()
                };
                (Some(layer), Some(guard))
            }
            Err(e) => {
                dir_error = Some((dir.clone(), e));
                (None, None)
            }
        },
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter(rust_log.as_deref(), CONSOLE_DIRECTIVE));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    if let Some((dir, e)) = dir_error {
        warn!(dir = %dir.display(), error = %e, "cannot create log directory, logging to console only");
    }
    guard
}

/// `RUST_LOG` when it parses, else `default`.
fn filter(rust_log: Option<&str>, default: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Creates `dir` and a non-blocking daily-rolling writer into it.
fn file_writer(dir: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::daily(dir, "chemtab.log");
    Ok(tracing_appender::non_blocking(file_appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_console_defaults_to_warnings() {
        let console = filter(None, CONSOLE_DIRECTIVE);
        assert_eq!(console.max_level_hint(), Some(LevelFilter::WARN));
        let file = filter(None, FILE_DIRECTIVE);
        assert_eq!(file.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_rust_log_overrides_default() {
        let f = filter(Some("chemtab=debug"), CONSOLE_DIRECTIVE);
        assert_eq!(f.max_level_hint(), Some(LevelFilter::DEBUG));
        // unparsable directives fall back
        let f = filter(Some("chemtab=verbose"), CONSOLE_DIRECTIVE);
        assert_eq!(f.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("logs").join("chemtab");
        let (_writer, _guard) = file_writer(&logs).unwrap();
        assert!(logs.is_dir());
    }

    #[test]
    fn test_file_writer_reports_unusable_directory() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        assert!(file_writer(&blocker.join("logs")).is_err());
    }

    #[test]
    fn test_init_survives_unusable_directory() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let config = LoggingConfig {
            dir: Some(blocker.join("logs")),
            json: false,
        };
        assert!(init_logging(&config).is_none());
    }
}
