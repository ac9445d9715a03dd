//! Logging system for logtrim
//!
//! Named file + console loggers, age-based trimming of log files when a logger
//! is opened, and an error-observing wrapper for fallible operations.

mod clock;
pub mod error_handler;
mod level;
mod logger;
mod record;
mod registry;
mod retention;

pub use clock::{Clock, FixedClock, SystemClock};
pub use level::{Severity, UnknownSeverity};
pub use logger::{ConsoleWriter, Logger};
pub use record::{LogRecord, FIELD_DELIMITER, TIMESTAMP_FORMAT};
pub use registry::LoggerRegistry;
pub use retention::{
    default_retention, parse_line_timestamp, parse_timestamp, trim_log_file,
    trim_log_file_with_retention, TrimReport, DEFAULT_RETENTION_DAYS, UNPARSEABLE_SUFFIX,
};
