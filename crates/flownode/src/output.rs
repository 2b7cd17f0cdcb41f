use crate::host::HostCallbacks;
use chrono::Utc;
use std::sync::Arc;

/// Log levels matching the host's numeric filtering convention
/// (1 = critical through 5 = debug).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Critical = 1,
    Error = 2,
    Warning = 3,
    Info = 4,
    Debug = 5,
}

/// Line-oriented logger for a single node.
///
/// Forwards each line to the host's log callback when one is attached;
/// without a host it falls back to `tracing` at the equivalent level,
/// tagged with the node id and a UTC timestamp.
#[derive(Clone)]
pub struct Output {
    node_id: String,
    host: Option<Arc<dyn HostCallbacks>>,
}

impl Output {
    pub fn new(node_id: impl Into<String>, host: Option<Arc<dyn HostCallbacks>>) -> Self {
        Self {
            node_id: node_id.into(),
            host,
        }
    }

    pub fn set_node_id(&mut self, value: impl Into<String>) {
        self.node_id = value.into();
    }

    pub fn print_critical(&self, message: &str) {
        self.print_message(LogLevel::Critical, message);
    }

    pub fn print_error(&self, message: &str) {
        self.print_message(LogLevel::Error, message);
    }

    pub fn print_warning(&self, message: &str) {
        self.print_message(LogLevel::Warning, message);
    }

    pub fn print_info(&self, message: &str) {
        self.print_message(LogLevel::Info, message);
    }

    pub fn print_debug(&self, message: &str) {
        self.print_message(LogLevel::Debug, message);
    }

    /// Logs an error with its source location.
    pub fn print_ex(&self, file: &str, line: u32, function: &str, what: &str) {
        let message = if what.is_empty() {
            format!(
                "Unknown error in file {} line {} in function {}.",
                file, line, function
            )
        } else {
            format!(
                "Error in file {} line {} in function {}: {}",
                file, line, function, what
            )
        };
        self.print_message(LogLevel::Error, &message);
    }

    /// Writes one line at an explicit level.
    pub fn print_message(&self, level: LogLevel, message: &str) {
        match &self.host {
            Some(host) => host.log(&self.node_id, level as i32, message),
            None => {
                let timestamp = Utc::now().format("%m/%d/%y %H:%M:%S%.3f");
                match level {
                    LogLevel::Critical | LogLevel::Error => {
                        tracing::error!(node_id = %self.node_id, "{} {}", timestamp, message)
                    }
                    LogLevel::Warning => {
                        tracing::warn!(node_id = %self.node_id, "{} {}", timestamp, message)
                    }
                    LogLevel::Info => {
                        tracing::info!(node_id = %self.node_id, "{} {}", timestamp, message)
                    }
                    LogLevel::Debug => {
                        tracing::debug!(node_id = %self.node_id, "{} {}", timestamp, message)
                    }
                }
            }
        }
    }
}
