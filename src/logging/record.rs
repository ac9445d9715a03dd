//! A single log event and its rendered forms

use chrono::NaiveDateTime;

use super::level::Severity;

/// Separator between the fields of a rendered line
pub const FIELD_DELIMITER: &str = " - ";

/// Format of the leading timestamp in file lines (millisecond precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// A single log event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Local time the event was recorded
    pub timestamp: NaiveDateTime,
    /// Name of the logger that produced it
    pub logger: String,
    /// Severity of the event
    pub level: Severity,
    /// Message text
    pub message: String,
}

impl LogRecord {
    /// Create a new record
    pub fn new(
        timestamp: NaiveDateTime,
        logger: impl Into<String>,
        level: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            logger: logger.into(),
            level,
            message: message.into(),
        }
    }

    /// Line written to the log file: `<timestamp> - <name> - <LEVEL> - <message>`
    pub fn file_line(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.logger,
            self.level,
            self.message
        )
    }

    /// Line written to the console: `<name> - <LEVEL> - <message>`
    pub fn console_line(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.logger, self.level, self.message
        )
    }
}
