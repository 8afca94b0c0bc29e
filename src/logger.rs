use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

/// Maximum number of entries kept in the in-memory diagnostics buffer
pub const LOG_CAPACITY: usize = 1000;

/// Log level enum for type-safe logging
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log entry with optional structured context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub source: &'static str, // "pipeline", "services", ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, serde_json::Value>>,
}

/// Simple circular buffer for fixed-size log storage
struct CircularBuffer {
    buffer: Vec<LogEntry>,
    head: usize,
    size: usize,
    capacity: usize,
}

impl CircularBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            head: 0,
            size: 0,
            capacity,
        }
    }

    fn push(&mut self, item: LogEntry) {
        if self.size < self.capacity {
            self.buffer.push(item);
            self.size += 1;
        } else {
            self.buffer[self.head] = item;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    fn to_vec(&self) -> Vec<LogEntry> {
        if self.size < self.capacity {
            self.buffer.clone()
        } else {
            // Return items in chronological order
            let mut result = Vec::with_capacity(self.size);
            result.extend_from_slice(&self.buffer[self.head..]);
            result.extend_from_slice(&self.buffer[..self.head]);
            result
        }
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.head = 0;
        self.size = 0;
    }
}

/// In-memory diagnostics log, readable by presentation collaborators
pub struct Logger {
    buffer: Mutex<CircularBuffer>,
    min_level: AtomicU8,
}

impl Logger {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(CircularBuffer::new(capacity.max(1))),
            min_level: AtomicU8::new(LogLevel::Debug as u8),
        }
    }

    /// Record an entry if it passes the minimum level
    pub fn log(&self, level: LogLevel, message: &str, source: &'static str) {
        self.push(level, message, source, None);
    }

    /// Log with context (structured logging)
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: &str,
        source: &'static str,
        context: HashMap<String, serde_json::Value>,
    ) {
        self.push(level, message, source, Some(context));
    }

    fn push(
        &self,
        level: LogLevel,
        message: &str,
        source: &'static str,
        context: Option<HashMap<String, serde_json::Value>>,
    ) {
        if (level as u8) < self.min_level.load(Ordering::Relaxed) {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            source,
            context,
        };

        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(entry);
        }
    }

    /// Set minimum log level (runtime filtering)
    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    /// Get current minimum log level
    pub fn get_min_level(&self) -> LogLevel {
        match self.min_level.load(Ordering::Relaxed) {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn get_logs(&self) -> Vec<LogEntry> {
        match self.buffer.lock() {
            Ok(buffer) => buffer.to_vec(),
            Err(_) => Vec::new(),
        }
    }

    pub fn clear_logs(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

// Global logger instance
lazy_static::lazy_static! {
    pub static ref LOGGER: Logger = Logger::new();
}

static TRACING_INIT: Once = Once::new();

/// Install the fmt subscriber. `RUST_LOG` wins over `default_level`.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing(default_level: LogLevel) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("stylecast={}", default_level.as_str())));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}

// Macro for easy logging
#[macro_export]
macro_rules! app_log {
	($level:expr, $source:expr, $($arg:tt)*) => {
		{
			use $crate::logger::LogLevel;
			let message = format!($($arg)*);
			$crate::logger::LOGGER.log($level, &message, $source);
			match $level {
				LogLevel::Error => tracing::error!(source = $source, "{}", message),
				LogLevel::Warn => tracing::warn!(source = $source, "{}", message),
				LogLevel::Info => tracing::info!(source = $source, "{}", message),
				LogLevel::Debug => tracing::debug!(source = $source, "{}", message),
			}
		}
	};
}
