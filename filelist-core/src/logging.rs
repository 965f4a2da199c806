//! src/logging.rs
//!
//! File-only tracing setup for the host. The terminal belongs to the TUI,
//! so nothing is written to stdout or stderr.

use std::{
    fs,
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::Local;
use tracing::Metadata;
use tracing_appender::{non_blocking::WorkerGuard, rolling::daily};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::config::LoggingConfig;
use crate::error::AppError;

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`. Keep the returned guard alive
    /// until exit so buffered lines reach the file.
    pub fn init_tracing(config: &LoggingConfig) -> Result<WorkerGuard, AppError> {
        fs::create_dir_all(&config.log_dir).map_err(|e| {
            AppError::Io(e).with_context(format!(
                "cannot create log dir {}",
                config.log_dir.display()
            ))
        })?;

        // daily rolling file appender → <log_dir>/<prefix>.YYYY-MM-DD
        let file = daily(&config.log_dir, config.log_file_prefix.as_str());
        let (writer, guard) = tracing_appender::non_blocking(file);

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.level.as_str()))
            .map_err(|e| AppError::invalid_input("logging.level", e.to_string()))?;

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .map_err(|e| AppError::Other(format!("tracing already initialised: {e}")))?;

        Ok(guard)
    }
}

static SEQ: AtomicUsize = AtomicUsize::new(1);

/// `SEQ HH:MM:SS.mmm LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {} {:5} [{}:{} {}] ",
            Local::now().format("%H:%M:%S%.3f"),
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
