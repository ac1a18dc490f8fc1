//! File logging
//!
//! The terminal belongs to the UI, so logs never go to stdout or stderr.
//! They are written through a non-blocking file appender; the returned guard
//! flushes pending lines when dropped and must live as long as the app.

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the level filter: `RUST_LOG` wins over `level`.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Open the non-blocking file writer for `path`, creating its directory.
pub fn file_writer(path: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("blog-admin.log"));

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber writing to `path`.
pub fn init(path: &Path, level: &str) -> std::io::Result<WorkerGuard> {
    let (writer, guard) = file_writer(path)?;

    tracing_subscriber::registry()
        .with(filter(level))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(std::io::Error::other)?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_used_without_rust_log() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(filter("blog_admin=debug").to_string(), "blog_admin=debug");
        }
    }

    #[test]
    fn test_dropping_guard_flushes_pending_lines() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("admin.log");

        let (mut writer, guard) = file_writer(&path).unwrap();
        writer.write_all(b"last line before exit\n").unwrap();
        drop(guard);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("last line before exit"));
    }
}
