//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration shared by the servers and clients.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct NetConfig {
    /// Listening socket settings (stream server).
    pub listener: ListenerConfig,

    /// Server identity and greeting.
    pub server: ServerConfig,

    /// Datagram receive settings.
    pub datagram: DatagramConfig,

    /// Client receive settings.
    pub client: ClientConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Pending connections the kernel queues before `accept`.
    pub backlog: i32,

    /// Set `SO_REUSEADDR` before binding.
    pub reuse_address: bool,

    /// How long shutdown waits for in-flight connections, in seconds.
    pub drain_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            backlog: 10,
            reuse_address: true,
            drain_timeout_secs: 5,
        }
    }
}

/// Server identity.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name announced in the greeting. Defaults to the OS host name.
    pub host_name: Option<String>,

    pub greeting_prefix: String,

    pub greeting_suffix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host_name: None,
            greeting_prefix: "Hello from server ".to_string(),
            greeting_suffix: "!".to_string(),
        }
    }
}

/// Datagram server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DatagramConfig {
    /// Receive buffer size. One byte is reserved, so at most
    /// `max_packet - 1` bytes of each datagram are read.
    pub max_packet: usize,
}

impl Default for DatagramConfig {
    fn default() -> Self {
        Self { max_packet: 100 }
    }
}

/// Stream client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Receive buffer size; at most `max_message - 1` bytes are read.
    pub max_message: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { max_message: 100 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
