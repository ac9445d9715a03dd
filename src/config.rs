//! Configuration management for logtrim

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::{Severity, DEFAULT_RETENTION_DAYS};

/// Categories of disk errors for user-friendly messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Path points at a directory where a file was expected
    IsADirectory,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a user-friendly message for this error kind
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full, free space needed to write logs",
            DiskErrorKind::PermissionDenied => "permission denied",
            DiskErrorKind::NotFound => "file or directory not found",
            DiskErrorKind::IsADirectory => "path is a directory, not a log file",
            DiskErrorKind::Other => "I/O error",
        }
    }
}

/// Categorize an IO error into a user-friendly category
pub fn categorize_io_error(e: &std::io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::StorageFull | ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        ErrorKind::IsADirectory => DiskErrorKind::IsADirectory,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28, EDQUOT = 122 (Linux) / 69 (macOS)
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                    // EISDIR
                    if os_error == 21 {
                        return DiskErrorKind::IsADirectory;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// Create a user-friendly error message from an IO error
pub fn friendly_io_error_message(e: &std::io::Error, context: &str) -> String {
    match categorize_io_error(e) {
        DiskErrorKind::Other => format!("{}: {}", context, e),
        kind => format!("{}: {}", context, kind.user_message()),
    }
}

/// Find the first IO error in an error chain, if any
pub fn find_io_error(err: &anyhow::Error) -> Option<&std::io::Error> {
    err.chain().find_map(|cause| cause.downcast_ref::<std::io::Error>())
}

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Logger name, written into every line
    #[serde(default = "default_name")]
    pub name: String,

    /// Log file; trimming operates on this file too
    #[serde(default = "default_log_path")]
    pub path: PathBuf,

    /// Minimum severity: "debug", "info" (default), "warning", "error" or "critical"
    #[serde(default)]
    pub level: Severity,

    /// Mirror every line to standard output (default: true)
    #[serde(default = "default_also_print")]
    pub also_print: bool,

    /// Lines older than this many days are removed when the logger opens (default: 7)
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
}

fn default_name() -> String {
    "logtrim".to_string()
}

fn default_log_path() -> PathBuf {
    logs_dir().join("logtrim.log")
}

fn default_also_print() -> bool {
    true
}

fn default_retention_days() -> u64 {
    DEFAULT_RETENTION_DAYS
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            path: default_log_path(),
            level: Severity::default(),
            also_print: default_also_print(),
            retention_days: default_retention_days(),
        }
    }
}

impl LoggerConfig {
    /// Create a config for `name` writing to `path`, other fields at defaults
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Retention window as a duration
    pub fn retention(&self) -> chrono::Duration {
        // Clamped so the day count always fits chrono's range.
        chrono::Duration::days(self.retention_days.min(i32::MAX as u64) as i64)
    }

    /// Load configuration from the default file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `path`, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

/// Get the base configuration directory (~/.logtrim)
/// Falls back to ./.logtrim if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".logtrim")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".logtrim"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the default logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}
