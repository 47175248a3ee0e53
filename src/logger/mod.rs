//! Run logging for report jobs.
//!
//! Every call produces one line of the form
//! `[<timestamp>] [<LEVEL>] - <message>` and writes it to the console,
//! to an append-only file, or both.
//!
//! Two ways to get a logger:
//! - [`Logger::new`] builds an explicit context object that callers pass
//!   around by reference.
//! - [`Logger::global`] returns the process-wide instance. The first call
//!   decides its configuration; later calls get the same instance back and
//!   their arguments are ignored.
//!
//! Nothing here terminates the process. [`Logger::fail`] logs an error and
//! hands it back so the caller can return it; only the binary's entry point
//! turns an error into an exit code.

mod value;

pub use value::DebugValue;

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity tag attached to a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    Debug,
    /// Caller-supplied tag, printed verbatim.
    Custom(String),
}

impl Level {
    fn is_alert(&self) -> bool {
        matches!(self, Self::Error | Self::Warning)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("INFO"),
            Self::Warning => f.write_str("WARNING"),
            Self::Error => f.write_str("ERROR"),
            Self::Debug => f.write_str("DEBUG"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Sink configuration, fixed when the logger is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub sink_path: PathBuf,
    pub console_enabled: bool,
    pub file_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            sink_path: PathBuf::from("log.txt"),
            console_enabled: true,
            file_enabled: true,
        }
    }
}

impl LoggerConfig {
    pub fn new(sink_path: impl Into<PathBuf>, console_enabled: bool, file_enabled: bool) -> Self {
        Self {
            sink_path: sink_path.into(),
            console_enabled,
            file_enabled,
        }
    }
}

/// One formatted log event. Built per call and dropped once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: Level,
    pub message: String,
}

impl LogRecord {
    pub fn now(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] - {}", self.timestamp, self.level, self.message)
    }
}

/// Leveled logger writing to the console and/or a file.
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
    // Opened on first write so a console-only run never touches the disk.
    writer: Mutex<Option<BufWriter<File>>>,
}

impl Logger {
    /// Build a standalone logger.
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            writer: Mutex::new(None),
        }
    }

    /// Return the process-wide logger, creating it from `config` on first use.
    ///
    /// Once the instance exists, `config` is ignored. Use
    /// [`Logger::config`] to see what the instance was actually built with.
    pub fn global(config: LoggerConfig) -> &'static Self {
        let logger = GLOBAL.get_or_init(|| Self::new(config.clone()));
        if logger.config != config {
            tracing::debug!(
                requested = %config.sink_path.display(),
                active = %logger.config.sink_path.display(),
                "global logger already initialized; ignoring new configuration"
            );
        }
        logger
    }

    /// The global logger if one was created.
    pub fn try_global() -> Option<&'static Self> {
        GLOBAL.get()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn sink_path(&self) -> &Path {
        &self.config.sink_path
    }

    /// Write one record to every enabled sink.
    pub fn log(&self, level: Level, message: impl AsRef<str>) {
        let record = LogRecord::now(level, message.as_ref());
        self.emit(&record);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Level::Error, message);
    }

    pub fn custom(&self, level_name: impl Into<String>, message: impl AsRef<str>) {
        self.log(Level::Custom(level_name.into()), message);
    }

    /// Log each value on its own line as a single DEBUG record.
    pub fn debug(&self, values: &[DebugValue]) {
        let body = values
            .iter()
            .map(DebugValue::render)
            .collect::<Vec<_>>()
            .join("\n");
        self.log(Level::Debug, body);
    }

    /// Log `err` at ERROR and give it back.
    ///
    /// Meant for `return Err(logger.fail(err))`: the line reaches the sink
    /// before control leaves the caller.
    pub fn fail<E: fmt::Display>(&self, err: E) -> E {
        self.error(err.to_string());
        err
    }

    fn emit(&self, record: &LogRecord) {
        if self.config.console_enabled {
            if record.level.is_alert() {
                eprintln!("{record}");
            } else {
                println!("{record}");
            }
        }

        if self.config.file_enabled {
            self.append(record);
        }
    }

    fn append(&self, record: &LogRecord) {
        let mut guard = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_none() {
            match open_sink(&self.config.sink_path) {
                Ok(file) => *guard = Some(BufWriter::new(file)),
                Err(err) => {
                    tracing::warn!(
                        path = %self.config.sink_path.display(),
                        %err,
                        "cannot open log file"
                    );
                    return;
                }
            }
        }
        if let Some(writer) = guard.as_mut() {
            let _ = writeln!(writer, "{record}");
            let _ = writer.flush();
        }
    }
}

fn open_sink(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
