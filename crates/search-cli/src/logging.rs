//! JSONL telemetry for a game or simulation run.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{Level, event};
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, SearchConfig};

const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Flushes buffered events when dropped; hold it until the run ends.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Routes `tracing` events as JSON lines into `<logging.directory>/telemetry.jsonl`.
///
/// Does nothing and returns `None` unless `logging.enable_structured` is set.
/// `RUST_LOG` takes precedence over `logging.tracing_level`.
pub fn init_logging(config: &SearchConfig) -> Result<Option<LoggingGuard>> {
    if !config.logging.enable_structured {
        return Ok(None);
    }

    let (writer, guard, telemetry_path) = open_telemetry(&config.resolved_log_dir())?;
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(event_filter(&config.logging))
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // Only the first subscriber installed in a process takes effect.
    let _ = tracing::subscriber::set_global_default(subscriber);

    event!(
        target: "search_cli::logging",
        Level::INFO,
        run_id = %config.run_id,
        seed = ?config.seed,
        areas = config.areas.len(),
        placement = ?config.placement,
        "structured logging enabled"
    );

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

fn open_telemetry(dir: &Path) -> Result<(NonBlocking, WorkerGuard, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let path = dir.join(TELEMETRY_FILE);
    let file =
        File::create(&path).with_context(|| format!("creating log file {}", path.display()))?;
    let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);
    Ok((writer, guard, path))
}

fn event_filter(logging: &LoggingConfig) -> EnvFilter {
    let level = logging.level().unwrap_or(Level::INFO);
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}
