//! Connectionless server: bind, then log every datagram received.
//!
//! No response is ever sent.

use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tokio::sync::broadcast;

use crate::config::NetConfig;
use crate::net::{render_ip, transport, AddressResolver, CandidateConnector, EndpointSpec, TransferError};
use crate::observability::metrics;
use crate::server::ServerError;

/// One received datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Bytes read (at most `max_packet - 1`).
    pub len: usize,
    pub from: SocketAddr,
    /// Payload as text, ending at the first NUL byte.
    pub contents: String,
}

impl Packet {
    fn new(payload: &[u8], from: SocketAddr) -> Self {
        let text = payload.split(|b| *b == 0).next().unwrap_or_default();
        Self {
            len: payload.len(),
            from,
            contents: String::from_utf8_lossy(text).into_owned(),
        }
    }

    /// `Received <n>-byte packet from <ip>`
    pub fn summary(&self) -> String {
        format!("Received {}-byte packet from {}", self.len, render_ip(&self.from))
    }
}

/// A bound datagram socket and its receive loop.
#[derive(Debug)]
pub struct DatagramServer {
    socket: UdpSocket,
    buffer_len: usize,
}

impl DatagramServer {
    /// Resolve `spec`, bind the first viable candidate.
    pub async fn bind(spec: &EndpointSpec, config: &NetConfig) -> Result<Self, ServerError> {
        let candidates = AddressResolver::new().resolve(spec).await?;

        let bound = CandidateConnector::new()
            .reuse_address(config.listener.reuse_address)
            .bind(&candidates)?;
        let candidate = bound.candidate;
        let socket = transport::into_datagram(bound.socket).map_err(ServerError::Socket)?;

        tracing::info!(address = %candidate, "Datagram socket bound");

        Ok(Self {
            socket,
            buffer_len: config.datagram.max_packet.saturating_sub(1).max(1),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.socket.local_addr()
    }

    /// Wait for and read one datagram.
    pub async fn receive(&self) -> Result<Packet, TransferError> {
        let mut buffer = vec![0u8; self.buffer_len];
        let (n, from) = self
            .socket
            .recv_from(&mut buffer)
            .await
            .map_err(TransferError::Receive)?;

        metrics::record_packet_received(n);
        Ok(Packet::new(&buffer[..n], from))
    }

    /// Receive until shutdown, reporting each packet. Receive errors are logged and skipped.
    pub async fn run<F: FnMut(&Packet)>(self, mut shutdown: broadcast::Receiver<()>, mut on_packet: F) {
        loop {
            tracing::debug!("Waiting for requests");
            tokio::select! {
                received = self.receive() => match received {
                    Ok(packet) => {
                        tracing::debug!(peer_addr = %render_ip(&packet.from), bytes = packet.len, "Packet received");
                        on_packet(&packet);
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to process request"),
                },
                _ = shutdown.recv() => {
                    tracing::info!("Datagram server received shutdown signal, exiting receive loop");
                    break;
                }
            }
        }
    }
}
