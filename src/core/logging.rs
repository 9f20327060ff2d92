use crate::shared::paths::ensure_dir;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Log targets that get their own daily file. Everything else goes to `system.log`.
pub const PLUGIN_TARGETS: [&str; 4] = ["tasks", "todo", "music", "chat"];

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to create logs directory: {0}")]
    Directory(#[from] std::io::Error),
    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Keeps the non-blocking writers flushing. Drop only at shutdown.
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

struct PluginWriter {
    writers: HashMap<&'static str, NonBlocking>,
    system_writer: NonBlocking,
}

/// Plugin owning `target`, matching `plugin` and `plugin::*` but not `pluginx`.
fn plugin_for_target(target: &str) -> Option<&'static str> {
    PLUGIN_TARGETS.iter().copied().find(|plugin| {
        target
            .strip_prefix(plugin)
            .map(|rest| rest.is_empty() || rest.starts_with("::"))
            .unwrap_or(false)
    })
}

impl PluginWriter {
    fn writer_for_target(&self, target: &str) -> NonBlocking {
        plugin_for_target(target)
            .and_then(|plugin| self.writers.get(plugin))
            .unwrap_or(&self.system_writer)
            .clone()
    }
}

impl<'a> MakeWriter<'a> for PluginWriter {
    type Writer = NonBlocking;

    fn make_writer(&'a self) -> Self::Writer {
        self.system_writer.clone()
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        self.writer_for_target(meta.target())
    }
}

/// Install the global subscriber writing one rolling file per plugin under `log_dir`.
pub fn init_logging(log_dir: &Path) -> Result<LoggingGuards, LoggingError> {
    ensure_dir(log_dir)?;

    let mut guards = Vec::new();
    let mut plugin_writers = HashMap::new();

    for plugin in PLUGIN_TARGETS {
        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, log_dir, format!("{}.log", plugin));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        plugin_writers.insert(plugin, non_blocking);
        guards.push(guard);
    }

    let system_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "system.log");
    let (system_writer, system_guard) = tracing_appender::non_blocking(system_appender);
    guards.push(system_guard);

    let plugin_writer = PluginWriter {
        writers: plugin_writers,
        system_writer,
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(plugin_writer)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::info!(target: "system", "Logging initialized at {:?}", log_dir);

    Ok(LoggingGuards { _guards: guards })
}
