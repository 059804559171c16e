//! Endpoint resolution with ordered fallback, plus the stream and datagram
//! servers and clients built on it.

pub mod cli;
pub mod client;
pub mod config;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod server;

pub use config::NetConfig;
pub use lifecycle::Shutdown;
pub use net::{AddressResolver, CandidateConnector, EndpointSpec};
