//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (backlog > 0, buffers large enough)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NetConfig → Result<(), Vec<ValidationError>>

use crate::config::schema::NetConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Backlog must be positive.
    #[error("listener.backlog must be > 0 (got {0})")]
    Backlog(i32),

    /// A receive buffer must hold at least one byte plus the reserved one.
    #[error("{field} must be at least 2 (got {size})")]
    BufferTooSmall { field: &'static str, size: usize },

    /// Configured host name is empty.
    #[error("server.host_name must not be empty")]
    EmptyHostName,

    /// Unknown log level.
    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &NetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.backlog <= 0 {
        errors.push(ValidationError::Backlog(config.listener.backlog));
    }

    if config.datagram.max_packet < 2 {
        errors.push(ValidationError::BufferTooSmall {
            field: "datagram.max_packet",
            size: config.datagram.max_packet,
        });
    }

    if config.client.max_message < 2 {
        errors.push(ValidationError::BufferTooSmall {
            field: "client.max_message",
            size: config.client.max_message,
        });
    }

    if matches!(config.server.host_name.as_deref(), Some("")) {
        errors.push(ValidationError::EmptyHostName);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
