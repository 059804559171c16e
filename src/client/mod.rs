//! Client subsystem.
//!
//! # Data Flow
//! ```text
//! Stream:   resolve → connector connect (full fallback) → read greeting
//! Datagram: resolve → connector open (first creatable) → send one datagram
//! ```
//!
//! # Design Decisions
//! - The stream client falls back across every candidate
//! - The datagram client commits to the first socket it can create; a failed
//!   send does not move on to the next candidate

pub mod datagram;
pub mod stream;

pub use datagram::{send_datagram, SentDatagram};
pub use stream::{fetch_message, Received, StreamSession};

use crate::net::{NoViableCandidateError, ResolutionError, TransferError};

/// Fatal client failure.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("getaddrinfo: {0}")]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    NoViableCandidate(#[from] NoViableCandidateError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Failed to prepare socket: {0}")]
    Socket(#[source] std::io::Error),
}
