//! Named logger writing to a file and, optionally, the console
//!
//! Opening a logger trims its file with the configured retention window, then
//! appends every accepted message as one formatted line.

use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use crate::config::LoggerConfig;

use super::clock::{Clock, SystemClock};
use super::level::Severity;
use super::record::LogRecord;
use super::retention::{trim_log_file_with_retention, TrimReport};

/// Boxed console destination
pub type ConsoleWriter = Box<dyn Write + Send>;

/// A named, leveled logger with a file sink and an optional console sink
pub struct Logger {
    name: String,
    level: Severity,
    path: PathBuf,
    file: Mutex<File>,
    console: Option<Mutex<ConsoleWriter>>,
    clock: Arc<dyn Clock>,
    trim_report: TrimReport,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("path", &self.path)
            .field("console", &self.console.is_some())
            .finish()
    }
}

impl Logger {
    /// Open a logger using the system clock and standard output for the console
    pub fn open(config: &LoggerConfig) -> Result<Self> {
        let console: Option<ConsoleWriter> = if config.also_print {
            Some(Box::new(io::stdout()))
        } else {
            None
        };
        Self::open_with(config, Arc::new(SystemClock), console)
    }

    /// Open a logger with an explicit clock and console writer
    ///
    /// `console` is ignored when `config.also_print` is false.
    pub fn open_with(
        config: &LoggerConfig,
        clock: Arc<dyn Clock>,
        console: Option<ConsoleWriter>,
    ) -> Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create log directory")?;
        }

        let trim_report =
            trim_log_file_with_retention(&config.path, config.retention(), clock.as_ref())
                .with_context(|| format!("Failed to trim log file {}", config.path.display()))?;

        if trim_report.dropped > 0 || trim_report.unparseable > 0 {
            tracing::info!(
                logger = %config.name,
                dropped = trim_report.dropped,
                unparseable = trim_report.unparseable,
                "Trimmed old log lines"
            );
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)
            .context("Failed to open log file")?;

        let console = console.filter(|_| config.also_print).map(Mutex::new);

        Ok(Self {
            name: config.name.clone(),
            level: config.level,
            path: config.path.clone(),
            file: Mutex::new(file),
            console,
            clock,
            trim_report,
        })
    }

    /// Logger name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum severity that reaches the sinks
    pub fn level(&self) -> Severity {
        self.level
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Result of the trim pass run when this logger was opened
    pub fn trim_report(&self) -> TrimReport {
        self.trim_report
    }

    /// Whether a message at `level` would be written
    pub fn enabled(&self, level: Severity) -> bool {
        level.passes(self.level)
    }

    /// Write a message at the given level
    pub fn log(&self, level: Severity, message: impl Display) {
        if !self.enabled(level) {
            return;
        }

        let record = LogRecord::new(self.clock.now(), &self.name, level, message.to_string());

        if let Ok(mut file) = self.file.lock() {
            if let Err(e) = writeln!(file, "{}", record.file_line()).and_then(|_| file.flush()) {
                tracing::warn!(logger = %self.name, "Failed to write log file: {}", e);
            }
        } else {
            tracing::warn!(logger = %self.name, "Log file lock poisoned, message dropped");
        }

        if let Some(console) = &self.console {
            if let Ok(mut console) = console.lock() {
                if let Err(e) =
                    writeln!(console, "{}", record.console_line()).and_then(|_| console.flush())
                {
                    tracing::warn!(logger = %self.name, "Failed to write console: {}", e);
                }
            } else {
                tracing::warn!(logger = %self.name, "Console lock poisoned, message dropped");
            }
        }
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Severity::Info, message);
    }

    pub fn warning(&self, message: impl Display) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Severity::Error, message);
    }

    pub fn critical(&self, message: impl Display) {
        self.log(Severity::Critical, message);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logging::clock::FixedClock;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    /// Console writer that keeps everything in memory
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub(crate) fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 21)
            .unwrap()
            .and_hms_milli_opt(9, 15, 0, 250)
            .unwrap()
    }

    pub(crate) fn test_config(dir: &Path, level: Severity) -> LoggerConfig {
        LoggerConfig {
            name: "log_bot".to_string(),
            path: dir.join("logs").join("test_log.log"),
            level,
            also_print: true,
            retention_days: 7,
        }
    }

    fn open(config: &LoggerConfig) -> (Logger, SharedBuffer) {
        let console = SharedBuffer::default();
        let logger = Logger::open_with(
            config,
            Arc::new(FixedClock(now())),
            Some(Box::new(console.clone())),
        )
        .unwrap();
        (logger, console)
    }

    #[test]
    fn test_open_creates_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path(), Severity::Info);

        let (logger, _) = open(&config);

        assert!(config.path.exists());
        assert_eq!(logger.path(), config.path.as_path());
        assert_eq!(logger.name(), "log_bot");
    }

    #[test]
    fn test_each_level_writes_one_line_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path(), Severity::Debug);
        let (logger, console) = open(&config);

        logger.debug("Debug message.");
        logger.info("Starting Log Test");
        logger.warning("This is a warning");
        logger.error("This is an error");
        logger.critical("This is a critical error");

        let content = fs::read_to_string(&config.path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        for (line, level) in lines.iter().zip(Severity::ALL) {
            assert!(line.contains(" - log_bot - "));
            assert!(line.contains(&format!(" - {} - ", level.as_str())));
        }
        assert_eq!(
            lines[0],
            "2026-01-21 09:15:00,250 - log_bot - DEBUG - Debug message."
        );

        let console_lines: Vec<String> = console.contents().lines().map(String::from).collect();
        assert_eq!(console_lines.len(), 5);
        assert_eq!(console_lines[4], "log_bot - CRITICAL - This is a critical error");
    }

    #[test]
    fn test_messages_below_level_are_discarded() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path(), Severity::Warning);
        let (logger, console) = open(&config);

        logger.debug("hidden");
        logger.info("hidden");
        logger.warning("shown");

        let content = fs::read_to_string(&config.path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with("WARNING - shown\n"));
        assert_eq!(console.contents(), "log_bot - WARNING - shown\n");
        assert!(!logger.enabled(Severity::Info));
    }

    #[test]
    fn test_poisoned_file_lock_does_not_stop_console() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path(), Severity::Info);
        let (logger, console) = open(&config);

        std::thread::scope(|s| {
            let result = s
                .spawn(|| {
                    let _guard = logger.file.lock().unwrap();
                    panic!("poison the file lock");
                })
                .join();
            assert!(result.is_err());
        });
        assert!(logger.file.is_poisoned());

        logger.info("console still works");

        assert_eq!(console.contents(), "log_bot - INFO - console still works\n");
        assert_eq!(fs::read_to_string(&config.path).unwrap(), "");
    }

    #[test]
    fn test_console_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(temp_dir.path(), Severity::Info);
        config.also_print = false;
        let (logger, console) = open(&config);

        logger.info("file only");

        assert_eq!(console.contents(), "");
        assert!(fs::read_to_string(&config.path)
            .unwrap()
            .contains("file only"));
    }

    #[test]
    fn test_open_trims_existing_file_then_appends() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path(), Severity::Info);
        fs::create_dir_all(config.path.parent().unwrap()).unwrap();
        let stale = LogRecord::new(now() - Duration::days(10), "log_bot", Severity::Info, "stale");
        let recent = LogRecord::new(now() - Duration::days(3), "log_bot", Severity::Info, "recent");
        fs::write(
            &config.path,
            format!("{}\n{}\ngarbage line\n", stale.file_line(), recent.file_line()),
        )
        .unwrap();

        let (logger, _) = open(&config);
        logger.info("fresh");

        let report = logger.trim_report();
        assert_eq!((report.kept, report.dropped, report.unparseable), (1, 1, 1));
        let content = fs::read_to_string(&config.path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], recent.file_line());
        assert_eq!(lines[1], "garbage line - CANNOT PARSE");
        assert!(lines[2].ends_with("INFO - fresh"));
    }
}
