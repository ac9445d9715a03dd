//! Error-observing wrappers
//!
//! A wrapped operation logs `Error in <operation>: <error>` at error severity
//! when it fails and hands the original error back untouched.

use std::fmt::Display;

use super::logger::Logger;

/// Wrap `operation` so that failures are logged to `logger` before being returned
///
/// The returned closure takes the same argument and returns the same `Result`
/// as `operation`. Multiple arguments can be passed as a tuple.
pub fn wrap<'a, A, T, E, F>(
    logger: &'a Logger,
    name: &'a str,
    operation: F,
) -> impl Fn(A) -> Result<T, E> + 'a
where
    F: Fn(A) -> Result<T, E> + 'a,
    E: Display,
{
    move |args| {
        let result = operation(args);
        if let Err(e) = &result {
            report(logger, name, e);
        }
        result
    }
}

impl Logger {
    /// Run `operation` once, logging its error (if any) before returning it
    pub fn observe<T, E, F>(&self, name: &str, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        operation().inspect_err(|e| report(self, name, e))
    }
}

fn report(logger: &Logger, name: &str, error: &dyn Display) {
    logger.error(format!("Error in {}: {}", name, error));
}
