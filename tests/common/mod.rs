//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use netdial::config::NetConfig;
use netdial::lifecycle::Shutdown;
use netdial::net::{EndpointSpec, Family, SocketKind};
use netdial::server::{ConnectionService, ReapStats, StreamServer, UnitStatus};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A stream server running in the background on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub status: UnitStatus,
    pub shutdown: Shutdown,
    pub task: JoinHandle<ReapStats>,
    /// Peers reported by the accept loop, in accept order.
    #[allow(dead_code)]
    pub accepted: mpsc::UnboundedReceiver<SocketAddr>,
}

impl RunningServer {
    /// Stop accepting and wait for the drained stats.
    pub async fn stop(self) -> ReapStats {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.task)
            .await
            .expect("server did not stop")
            .expect("server task failed")
    }
}

/// Bind on every interface, ephemeral port, and start accepting.
pub async fn start_stream_server<S: ConnectionService>(service: S, config: NetConfig) -> RunningServer {
    let spec = EndpointSpec::passive(0u16, Family::Unspecified, SocketKind::Stream);
    let server = StreamServer::bind(&spec, &config, service).await.unwrap();
    let port = server.local_addr().unwrap().port();
    let status = server.status();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let (accepted_tx, accepted) = mpsc::unbounded_channel();
    let task = tokio::spawn(server.run(receiver, move |peer| {
        let _ = accepted_tx.send(peer);
    }));

    RunningServer {
        addr: SocketAddr::from(([127, 0, 0, 1], port)),
        status,
        shutdown,
        task,
        accepted,
    }
}

/// Connect and read until the server closes.
#[allow(dead_code)]
pub async fn read_all(addr: SocketAddr) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut received = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut received))
        .await
        .expect("server never closed the connection")
        .unwrap();
    received
}

/// Poll `condition` until it holds or the deadline passes.
#[allow(dead_code)]
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
