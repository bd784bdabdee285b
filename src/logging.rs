//! Logging setup with a size-capped activity log file.
//!
//! Events go to stderr and, without ANSI colors, to the activity log that
//! `/log` serves back to the owner. The log is rotated whenever a write
//! would push it past [`LOG_MAX_BYTES`], keeping [`LOG_BACKUP_COUNT`] backups.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// The activity log is rotated once it grows past this size.
pub const LOG_MAX_BYTES: u64 = 1024 * 1024;

/// Number of rotated files kept next to the activity log.
pub const LOG_BACKUP_COUNT: usize = 3;

/// Keeps the background log writer alive; dropping it flushes pending lines.
#[derive(Debug)]
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_logging(log_path: &Path, level: &str) -> Result<LoggingGuard> {
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = RotatingFile::open(log_path, LOG_MAX_BYTES, LOG_BACKUP_COUNT)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_filter(env_filter(level));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(env_filter(level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LoggingGuard { _guard: guard })
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")))
}

/// Moves `path` to `path.1` when it exceeds `max_bytes`, shifting older
/// backups up and dropping the one past `backups`. Returns whether a
/// rotation happened.
///
/// # Errors
///
/// Returns an error if a file cannot be inspected or renamed.
pub fn rotate_if_oversized(path: &Path, max_bytes: u64, backups: usize) -> io::Result<bool> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size <= max_bytes {
        return Ok(false);
    }

    shift_backups(path, backups)?;
    Ok(true)
}

/// Renames `path` to `path.1`, moving older backups up by one and dropping
/// the one past `backups`.
fn shift_backups(path: &Path, backups: usize) -> io::Result<()> {
    if backups == 0 {
        return fs::remove_file(path);
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..backups).rev() {
        let from = backup_path(path, n);
        if from.exists() {
            fs::rename(&from, backup_path(path, n + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Append-only log file that rotates itself once it reaches a size cap.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: File,
    size: u64,
}

impl RotatingFile {
    /// Opens `path` for appending, rotating it first if it is already
    /// over `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rotated or opened.
    pub fn open(path: &Path, max_bytes: u64, backups: usize) -> io::Result<Self> {
        rotate_if_oversized(path, max_bytes, backups)?;
        let file = open_append(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            max_bytes,
            backups,
            file,
            size,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        shift_backups(&self.path, self.backups)?;
        self.file = open_append(&self.path)?;
        self.size = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = u64::try_from(buf.len()).unwrap_or(u64::MAX);
        if self.size > 0 && self.size.saturating_add(incoming) > self.max_bytes {
            self.rotate()?;
        }
        let written = self.file.write(buf)?;
        self.size = self
            .size
            .saturating_add(u64::try_from(written).unwrap_or(u64::MAX));
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn backup_path(path: &Path, n: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}
