use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and every less verbose one:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: Everything, including one line per written section
///
/// The level is read from `LOG_LEVEL` or changed at runtime with `set_log_level()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Silent => "Silent",
            Level::Error => "Error",
            Level::Warn => "Warn",
            Level::Info => "Info",
            Level::Debug => "Debug",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    /// Case insensitive: "silent", "error", "warn", "info", "debug"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" => Ok(Level::Silent),
            "error" => Ok(Level::Error),
            "warn" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(default)
}

pub struct Logger {
    log_file: Option<PathBuf>,
    disable_log: bool,
    enable_print_log: bool,
    level: Mutex<Level>,
}

impl Logger {
    /// Logger configured from `LOG_FILE`, `DISABLE_LOG`, `ENABLE_PRINT_LOG` and `LOG_LEVEL`.
    pub fn from_env() -> Self {
        let log_file = std::env::var("LOG_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        Self::new(log_file)
    }

    pub fn new(log_file: Option<PathBuf>) -> Self {
        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Level::Info);

        Logger {
            log_file,
            disable_log: env_flag("DISABLE_LOG", false),
            enable_print_log: env_flag("ENABLE_PRINT_LOG", true),
            level: Mutex::new(level),
        }
    }

    pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(())
    }

    fn write_to_file(&self, message: &str, start_new: bool) -> std::io::Result<()> {
        if self.disable_log {
            return Ok(());
        }
        let Some(ref log_file) = self.log_file else {
            return Ok(());
        };

        let mut file = if start_new {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(log_file)?
        } else {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?
        };

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
        writeln!(file, "[{}] {}", timestamp, message)
    }

    fn enabled(&self, at: Level) -> bool {
        self.get_level() >= at
    }

    fn log(&self, at: Level, msg: &str, start_new: bool) {
        if at == Level::Silent || !self.enabled(at) {
            return;
        }

        if self.enable_print_log {
            match at {
                Level::Error => tracing::error!("{}", msg),
                Level::Warn => tracing::warn!("{}", msg),
                Level::Info => tracing::info!("{}", msg),
                Level::Debug => tracing::debug!("{}", msg),
                Level::Silent => {}
            }
        }

        let formatted_msg = format!("{}: {}", at.as_str().to_uppercase(), msg);
        if let Err(e) = self.write_to_file(&formatted_msg, start_new) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn debug(&self, msg: &str, start_new: bool) {
        self.log(Level::Debug, msg, start_new);
    }

    pub fn info(&self, msg: &str, start_new: bool) {
        self.log(Level::Info, msg, start_new);
    }

    pub fn warn(&self, msg: &str, start_new: bool) {
        self.log(Level::Warn, msg, start_new);
    }

    pub fn error(&self, msg: &str, start_new: bool) {
        self.log(Level::Error, msg, start_new);
    }

    /// Returns Level::Info if the lock is poisoned.
    pub fn get_level(&self) -> Level {
        self.level.lock().map(|l| *l).unwrap_or(Level::Info)
    }

    pub fn set_level(&self, new_level: Level) {
        if let Ok(mut level) = self.level.lock() {
            *level = new_level;
        }
    }
}

pub static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the global logger with an explicit log file.
///
/// Returns false if a logger was already installed, e.g. by an earlier log call.
pub fn init(log_file: Option<PathBuf>) -> bool {
    LOGGER.set(Logger::new(log_file)).is_ok()
}

fn with_logger<F, R>(f: F) -> R
where
    F: FnOnce(&Logger) -> R,
{
    TRACING_INITIALIZED.get_or_init(|| {
        if let Err(e) = Logger::init_tracing() {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });

    let logger = LOGGER.get_or_init(Logger::from_env);
    f(logger)
}

pub fn info(msg: &str) {
    info_with_options(msg, false);
}

/// With `start_new`, the log file is truncated before writing.
pub fn info_with_options(msg: &str, start_new: bool) {
    with_logger(|logger| logger.info(msg, start_new));
}

pub fn warn(msg: &str) {
    with_logger(|logger| logger.warn(msg, false));
}

pub fn error(msg: &str) {
    with_logger(|logger| logger.error(msg, false));
}

pub fn debug(msg: &str) {
    with_logger(|logger| logger.debug(msg, false));
}

pub fn get_log_level() -> Level {
    with_logger(|logger| logger.get_level())
}

pub fn set_log_level(level: Level) {
    with_logger(|logger| logger.set_level(level));
}

/// Returns false if the string is not a valid level.
pub fn set_log_level_str(level_str: &str) -> bool {
    match level_str.parse() {
        Ok(level) => {
            set_log_level(level);
            true
        }
        Err(_) => false,
    }
}

/// 3725s → `01:02:05`
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
