//! Listening socket and accept loop.
//!
//! # Responsibilities
//! - Mark a bound stream socket as listening with a fixed backlog
//! - Accept connections in arrival order and hand each to the dispatcher
//! - Report every accepted peer to the caller
//! - Absorb accept failures and keep going
//!
//! # Design Decisions
//! - The loop only ever waits for the next connection or for shutdown
//! - It never awaits a dispatched unit

use std::net::SocketAddr;

use socket2::Socket;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::net::{render_ip, transport, Established};
use crate::observability::metrics;
use crate::server::handler::{ConnectionService, Dispatcher};

/// The listening socket could not be set up.
#[derive(Debug, thiserror::Error)]
#[error("Failed to listen to requests: {0}")]
pub struct ListenError(#[source] pub std::io::Error);

/// A single accept attempt failed. The loop continues.
#[derive(Debug, thiserror::Error)]
#[error("Failed to accept a connection: {0}")]
pub struct AcceptError(#[source] pub std::io::Error);

/// A stream socket in the listening state.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Start listening on the socket the connector bound.
    pub fn listen(bound: Established<Socket>, backlog: i32) -> Result<Self, ListenError> {
        let inner = transport::into_listener(bound.socket, backlog).map_err(ListenError)?;

        tracing::info!(
            address = %bound.candidate,
            backlog,
            "Listener bound"
        );

        Ok(Self { inner })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// Accept until `shutdown` fires. Accept errors are logged and skipped.
    ///
    /// `on_accept` sees each peer after its unit has been dispatched.
    pub async fn run<S, F>(self, dispatcher: Dispatcher<S>, mut shutdown: broadcast::Receiver<()>, mut on_accept: F)
    where
        S: ConnectionService,
        F: FnMut(SocketAddr),
    {
        loop {
            tokio::select! {
                accepted = self.inner.accept() => match accepted {
                    Ok((stream, peer)) => {
                        metrics::record_connection_accepted();
                        let id = dispatcher.dispatch(stream, peer);
                        tracing::info!(
                            connection_id = %id,
                            peer_addr = %render_ip(&peer),
                            "Received connection"
                        );
                        on_accept(peer);
                    }
                    Err(e) => {
                        metrics::record_accept_error();
                        tracing::warn!(error = %AcceptError(e), "Accept failed");
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Listener received shutdown signal, exiting accept loop");
                    break;
                }
            }
        }
    }
}
