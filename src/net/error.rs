//! Errors raised on an already-established connection or socket.

use std::net::SocketAddr;

/// A send or receive failed after the socket was set up.
///
/// Fatal to the single operation that hit it; other connections are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Failed to send to {peer}: {source}")]
    Send {
        peer: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to receive: {0}")]
    Receive(#[source] std::io::Error),
}
