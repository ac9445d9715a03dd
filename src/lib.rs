//! logtrim - named file + console logger with age-based log trimming
//!
//! This library provides the logger, its registry, the retention trimmer and
//! the configuration used by the `logtrim` binary.

pub mod config;
pub mod logging;
