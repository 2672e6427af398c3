use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// fallback filter used when `RUST_LOG` env is not set.
const DEFAULT_LOG_LEVEL: &str = "msaview=debug";
/// base filename used for debug log output.
const LOG_BASENAME: &str = "msaview.log";

fn log_path(directory: &Path, index: usize) -> PathBuf {
    if index == 0 {
        directory.join(LOG_BASENAME)
    } else {
        directory.join(format!("msaview.{index}.log"))
    }
}

/// Opens the first of `msaview.log`, `msaview.1.log`, ... that does not exist yet.
fn create_log(directory: &Path) -> Result<(PathBuf, File)> {
    let mut index = 0usize;
    loop {
        let path = log_path(directory, index);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(error) if error.kind() == ErrorKind::AlreadyExists => index += 1,
            Err(error) => return Err(error.into()),
        }
    }
}

pub fn init_logging() -> Result<WorkerGuard> {
    let (log_path, log_file) = create_log(Path::new("."))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_LEVEL))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init()?;

    tracing::info!(path = ?log_path, "debug logging enabled");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_log_picks_first_free_name() {
        let directory = tempfile::tempdir().unwrap();
        let (first, _) = create_log(directory.path()).unwrap();
        let (second, _) = create_log(directory.path()).unwrap();
        let (third, _) = create_log(directory.path()).unwrap();

        assert_eq!(first, directory.path().join("msaview.log"));
        assert_eq!(second, directory.path().join("msaview.1.log"));
        assert_eq!(third, directory.path().join("msaview.2.log"));
    }
}