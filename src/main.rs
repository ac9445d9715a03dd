use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use logtrim::config::{self, LoggerConfig};
use logtrim::logging::{error_handler, LoggerRegistry};

fn main() -> Result<()> {
    // Internal diagnostics go to stderr, separate from the logger's own console output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "logtrim=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let logger_config = LoggerConfig::load()?;

    let mut registry = LoggerRegistry::new();
    let log_bot = match registry.get_or_open(&logger_config) {
        Ok(logger) => logger,
        Err(e) => {
            if let Some(io_err) = config::find_io_error(&e) {
                eprintln!(
                    "{}",
                    config::friendly_io_error_message(io_err, "Could not open log file")
                );
            }
            return Err(e);
        }
    };

    tracing::info!("Logging to: {}", log_bot.path().display());

    log_bot.info("Starting Log Test");
    log_bot.debug("Debug message.");
    log_bot.warning("This is a warning");
    log_bot.error("This is an error");
    log_bot.critical("This is a critical error");

    let parse_port = error_handler::wrap(&log_bot, "parse_port", |raw: &str| {
        raw.parse::<u16>()
    });
    if let Ok(port) = parse_port("8080") {
        log_bot.info(format!("Parsed port {}", port));
    }
    // Logged by the wrapper; the error itself is not needed here.
    let _ = parse_port("eighty");

    Ok(())
}
