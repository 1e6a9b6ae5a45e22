//! Structured logging system
//!
//! Sets up the global `tracing` subscriber once at process start. Console and
//! file outputs are written through non-blocking workers; the returned
//! [`Logger`] owns their guards, so buffered records are flushed when it is
//! flushed or dropped at shutdown.

use crate::core::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Logger instance that manages the logging system
pub struct Logger {
    guards: Vec<WorkerGuard>,
}

impl Logger {
    /// Initialize the logging system based on configuration
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let level = parse_log_level(&config.level)?;

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

        let mut guards = Vec::new();
        let mut layers: Vec<BoxedLayer> = Vec::new();

        if config.writes_stdout() {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
            guards.push(guard);
            layers.push(format_layer(writer, &config.format)?);
        }

        if config.writes_file() {
            std::fs::create_dir_all(&config.log_dir)
                .with_context(|| format!("Failed to create log directory {:?}", config.log_dir))?;

            let appender = tracing_appender::rolling::never(&config.log_dir, &config.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);
            layers.push(format_layer(writer, &config.format)?);
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(env_filter)
            .try_init()
            .context("Failed to initialize tracing subscriber")?;

        tracing::info!(
            level = %config.level,
            format = %config.format,
            output = %config.output,
            "Logging system initialized"
        );

        Ok(Logger { guards })
    }

    /// Flush pending records and stop the background writers
    pub fn flush(self) {
        tracing::info!("Flushing logs");
        drop(self.guards);
    }
}

fn format_layer<W>(writer: W, format: &str) -> Result<BoxedLayer>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let layer = match format {
        "json" => fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        "text" => fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        other => anyhow::bail!("Invalid format configuration: {}", other),
    };
    Ok(layer)
}

/// Parse log level string to tracing Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {}", level),
    }
}
