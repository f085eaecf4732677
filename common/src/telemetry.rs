//! Provides helper functions for initializing log collection.
use anyhow::Result;
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter, Registry};

/// Output format of the log layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, single line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Initialize logging.
///
/// Logs are always written to stderr so that stdout stays free for rendered output.
pub fn init(format: LogFormat) -> Result<()> {
    // Default to INFO if no env is specified
    let log_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;

    let logger = match format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .compact()
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .boxed(),
    };

    let collector = Registry::default().with(logger.with_filter(log_filter));

    tracing::subscriber::set_global_default(collector)?;

    Ok(())
}
