//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional --config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → NetConfig (validated, immutable)
//!     → passed by reference to server/ and client/
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults; no file at all is a valid configuration
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::NetConfig;
pub use schema::{ClientConfig, DatagramConfig, ListenerConfig, ObservabilityConfig, ServerConfig};
