//! Per-connection dispatch.
//!
//! # Responsibilities
//! - Run each accepted connection's service logic in its own task
//! - Give that task exclusive ownership of the connection
//! - Register the task with the reaper and return immediately
//!
//! # Design Decisions
//! - The unit receives only the connection and the shared service; the
//!   listening socket is never reachable from inside a unit
//! - The connection is closed exactly once, when the unit drops it

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::net::TransferError;
use crate::server::connection::ConnectionId;
use crate::server::reaper::{ReaperHandle, UnitResult};

/// Service logic run once per accepted connection.
pub trait ConnectionService: Send + Sync + 'static {
    fn serve(&self, stream: &mut TcpStream, peer: SocketAddr) -> impl Future<Output = UnitResult> + Send;
}

/// Sends one fixed greeting, then lets the connection close.
#[derive(Debug, Clone)]
pub struct Greeting {
    message: Arc<str>,
}

impl Greeting {
    /// `prefix + host + suffix`, e.g. `Hello from server host-a!`.
    pub fn new(prefix: &str, host_name: &str, suffix: &str) -> Self {
        Self {
            message: format!("{prefix}{host_name}{suffix}").into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ConnectionService for Greeting {
    fn serve(&self, stream: &mut TcpStream, peer: SocketAddr) -> impl Future<Output = UnitResult> + Send {
        let message = Arc::clone(&self.message);
        async move {
            stream
                .write_all(message.as_bytes())
                .await
                .map_err(|source| TransferError::Send { peer, source })?;
            tracing::debug!(peer_addr = %peer, bytes = message.len(), "Greeting sent");
            Ok(())
        }
    }
}

/// Spawns an isolated unit per connection.
pub struct Dispatcher<S> {
    service: Arc<S>,
    reaper: ReaperHandle,
}

impl<S: ConnectionService> Dispatcher<S> {
    pub fn new(service: S, reaper: ReaperHandle) -> Self {
        Self {
            service: Arc::new(service),
            reaper,
        }
    }

    /// Take ownership of `stream`, serve it in a new task, and return at once.
    pub fn dispatch(&self, mut stream: TcpStream, peer: SocketAddr) -> ConnectionId {
        let id = ConnectionId::new();
        let service = Arc::clone(&self.service);

        let handle = tokio::spawn(async move {
            let result = service.serve(&mut stream, peer).await;
            drop(stream);
            tracing::trace!(connection_id = %id, "Connection closed");
            result
        });

        self.reaper.register(id, handle);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::reaper::reaper;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn greeting_text() {
        let greeting = Greeting::new("Hello from server ", "host-a", "!");
        assert_eq!(greeting.message(), "Hello from server host-a!");
    }

    #[tokio::test]
    async fn dispatched_unit_writes_and_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (handle, reaper) = reaper();
        let status = handle.status();
        let reaping = tokio::spawn(reaper.run());
        let dispatcher = Dispatcher::new(Greeting::new("Hello from server ", "unit", "!"), handle);

        let mut client = TcpStream::connect(addr).await.unwrap();
        let (stream, peer) = listener.accept().await.unwrap();
        dispatcher.dispatch(stream, peer);

        let mut received = Vec::new();
        client.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"Hello from server unit!");

        drop(dispatcher);
        let stats = reaping.await.unwrap();
        assert_eq!(stats.reaped, 1);
        assert_eq!(status.outstanding(), 0);
    }
}
