//! Registry of named loggers
//!
//! Owned by the program and passed by reference to whatever needs a logger.
//! Opening the same name twice returns the logger opened first, so a file is
//! trimmed once and never gets a second set of sinks.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use crate::config::LoggerConfig;

use super::clock::{Clock, SystemClock};
use super::logger::{ConsoleWriter, Logger};

/// Factory for console writers handed to newly opened loggers
type ConsoleFactory = Box<dyn Fn() -> ConsoleWriter + Send + Sync>;

/// Named loggers, keyed by logger name
pub struct LoggerRegistry {
    loggers: HashMap<String, Arc<Logger>>,
    clock: Arc<dyn Clock>,
    console: ConsoleFactory,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerRegistry {
    /// Create an empty registry using the system clock and standard output
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(SystemClock),
            Box::new(|| Box::new(std::io::stdout()) as ConsoleWriter),
        )
    }

    /// Create an empty registry with an explicit clock and console factory
    pub fn with_parts(clock: Arc<dyn Clock>, console: ConsoleFactory) -> Self {
        Self {
            loggers: HashMap::new(),
            clock,
            console,
        }
    }

    /// Get the logger registered under `config.name`, opening it if needed
    ///
    /// An existing logger is returned as-is; the rest of `config` is ignored.
    pub fn get_or_open(&mut self, config: &LoggerConfig) -> Result<Arc<Logger>> {
        if let Some(logger) = self.loggers.get(&config.name) {
            tracing::debug!(logger = %config.name, "Reusing registered logger");
            return Ok(Arc::clone(logger));
        }

        let console = config.also_print.then(|| (self.console)());
        let logger = Arc::new(Logger::open_with(config, Arc::clone(&self.clock), console)?);
        self.loggers.insert(config.name.clone(), Arc::clone(&logger));

        tracing::debug!(
            logger = %config.name,
            path = %config.path.display(),
            "Opened logger"
        );

        Ok(logger)
    }

    /// Look up a logger by name
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.get(name).cloned()
    }

    /// Remove a logger from the registry
    ///
    /// The logger stays usable through any handles already given out.
    pub fn remove(&mut self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.remove(name)
    }

    /// Registered logger names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loggers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}
