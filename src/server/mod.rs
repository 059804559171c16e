//! Server subsystem.
//!
//! # Data Flow
//! ```text
//! Stream:
//!     resolve (passive) → connector bind → listener.rs (listen, accept loop)
//!         → handler.rs (one task per connection, service logic)
//!         → reaper.rs (awaits finished tasks in the background)
//!
//! Datagram:
//!     resolve (passive) → connector bind → datagram.rs (receive loop)
//! ```
//!
//! # Design Decisions
//! - One accept loop per listening socket
//! - Units share nothing mutable with the accept loop or each other
//! - Shutdown stops accepting, then drains units with a deadline

pub mod connection;
pub mod datagram;
pub mod handler;
pub mod host;
pub mod listener;
pub mod reaper;
pub mod stream;

pub use datagram::{DatagramServer, Packet};
pub use handler::{ConnectionService, Dispatcher, Greeting};
pub use host::local_host_name;
pub use listener::{AcceptError, ListenError, Listener};
pub use reaper::{ReapStats, UnitStatus};
pub use stream::StreamServer;

use crate::net::{NoViableCandidateError, ResolutionError};

/// Fatal server setup failure.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("getaddrinfo: {0}")]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    NoViableCandidate(#[from] NoViableCandidateError),

    #[error(transparent)]
    Listen(#[from] ListenError),

    #[error("Failed to prepare socket: {0}")]
    Socket(#[source] std::io::Error),
}
