//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! EndpointSpec (host, service, family, kind, passive)
//!     → resolver.rs (ordered candidate list)
//!     → connector.rs (first viable candidate: connect / bind / open)
//!     → transport.rs (socket creation via socket2, handoff to tokio)
//!     → Hand off to server/ or client/
//! ```
//!
//! # Design Decisions
//! - Candidates are tried strictly in resolver order, one at a time
//! - A rejected candidate's socket is dropped (closed) before the next attempt
//! - Per-candidate failures are recorded and logged, never surfaced alone

pub mod address;
pub mod connector;
pub mod error;
pub mod resolver;
pub mod transport;

pub use address::{render_ip, AddressFamily, CandidateAddress, EndpointSpec, Family, Service, SocketKind};
pub use connector::{CandidateAttemptError, CandidateConnector, Established, Mode, NoViableCandidateError, Stage};
pub use error::TransferError;
pub use resolver::{AddressResolver, ResolutionError};
pub use transport::{Connected, SystemTransport, Transport};
