//! Log retention management
//!
//! Trims lines older than the retention window out of a log file. Runs once
//! when a logger is opened, never per write.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{Duration, NaiveDateTime, Timelike};

use super::clock::{Clock, SystemClock};
use super::record::FIELD_DELIMITER;

/// Default retention period in days
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

/// Suffix appended to lines whose timestamp cannot be parsed
pub const UNPARSEABLE_SUFFIX: &str = " - CANNOT PARSE";

/// Outcome of one trim pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimReport {
    /// Lines with an in-window timestamp, kept unchanged
    pub kept: usize,
    /// Lines older than the window, removed
    pub dropped: usize,
    /// Lines without a parseable timestamp, kept with the suffix appended
    pub unparseable: usize,
}

impl TrimReport {
    /// Number of lines written back to the file
    pub fn retained(&self) -> usize {
        self.kept + self.unparseable
    }
}

/// Default retention window
pub fn default_retention() -> Duration {
    Duration::days(DEFAULT_RETENTION_DAYS as i64)
}

/// Trim a log file using the default window and the system clock
pub fn trim_log_file(path: &Path) -> io::Result<TrimReport> {
    trim_log_file_with_retention(path, default_retention(), &SystemClock)
}

/// Trim a log file, dropping lines older than `retention` before `clock.now()`
///
/// A missing file is left missing. Read and write failures are returned as-is.
pub fn trim_log_file_with_retention(
    path: &Path,
    retention: Duration,
    clock: &dyn Clock,
) -> io::Result<TrimReport> {
    if !path.exists() {
        return Ok(TrimReport::default());
    }

    let content = fs::read_to_string(path)?;

    let cutoff = clock
        .now()
        .checked_sub_signed(retention)
        .unwrap_or(NaiveDateTime::MIN);

    let (trimmed, report) = trim_content(&content, cutoff);

    fs::write(path, trimmed)?;

    tracing::debug!(
        path = %path.display(),
        kept = report.kept,
        dropped = report.dropped,
        unparseable = report.unparseable,
        "Trimmed log file"
    );

    Ok(report)
}

/// Filter log content against a cutoff, preserving line order and terminators
fn trim_content(content: &str, cutoff: NaiveDateTime) -> (String, TrimReport) {
    let mut output = String::with_capacity(content.len());
    let mut report = TrimReport::default();

    for raw in content.split_inclusive('\n') {
        let (text, terminator) = split_terminator(raw);

        match parse_line_timestamp(text) {
            Some(timestamp) if timestamp >= cutoff => {
                output.push_str(raw);
                report.kept += 1;
            }
            Some(_) => report.dropped += 1,
            None => {
                // Tagged lines are re-tagged on every pass; there is no guard.
                output.push_str(text);
                output.push_str(UNPARSEABLE_SUFFIX);
                output.push_str(terminator);
                report.unparseable += 1;
            }
        }
    }

    (output, report)
}

/// Split a physical line into its text and its line terminator
fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(text) = raw.strip_suffix("\r\n") {
        (text, "\r\n")
    } else if let Some(text) = raw.strip_suffix('\n') {
        (text, "\n")
    } else {
        (raw, "")
    }
}

/// Parse the timestamp that precedes the first field delimiter of a line
///
/// Returns `None` when the delimiter is missing or the field is malformed.
pub fn parse_line_timestamp(line: &str) -> Option<NaiveDateTime> {
    let (field, _) = line.split_once(FIELD_DELIMITER)?;
    parse_timestamp(field)
}

/// Byte layout of `YYYY-MM-DD HH:MM:SS`; `0` marks a digit position
const DATETIME_SHAPE: &[u8; 19] = b"0000-00-00 00:00:00";

/// Parse `YYYY-MM-DD HH:MM:SS,fff` where the fraction has 1 to 6 digits
pub fn parse_timestamp(field: &str) -> Option<NaiveDateTime> {
    let (datetime, fraction) = field.split_once(',')?;

    if fraction.is_empty() || fraction.len() > 6 || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    // chrono's parser is more lenient than the fixed log format.
    if !has_datetime_shape(datetime) {
        return None;
    }

    let base = NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M:%S").ok()?;
    if base.nanosecond() >= 1_000_000_000 {
        return None;
    }

    let digits: i64 = fraction.parse().ok()?;
    let micros = digits * 10_i64.pow(6 - fraction.len() as u32);

    base.checked_add_signed(Duration::microseconds(micros))
}

fn has_datetime_shape(datetime: &str) -> bool {
    datetime.len() == DATETIME_SHAPE.len()
        && datetime
            .bytes()
            .zip(DATETIME_SHAPE.iter())
            .all(|(b, &expected)| match expected {
                b'0' => b.is_ascii_digit(),
                _ => b == expected,
            })
}
