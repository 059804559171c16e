//! Connection-oriented server: bind, listen, accept, dispatch, reap.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::NetConfig;
use crate::net::{AddressResolver, CandidateConnector, EndpointSpec};
use crate::server::handler::{ConnectionService, Dispatcher};
use crate::server::listener::Listener;
use crate::server::reaper::{self, ReapStats, Reaper, UnitStatus};
use crate::server::ServerError;

/// A bound, listening stream server that has not started accepting yet.
pub struct StreamServer<S> {
    listener: Listener,
    dispatcher: Dispatcher<S>,
    reaper: Reaper,
    drain_timeout: Duration,
}

impl<S: ConnectionService> StreamServer<S> {
    /// Resolve `spec`, bind the first viable candidate and start listening.
    pub async fn bind(spec: &EndpointSpec, config: &NetConfig, service: S) -> Result<Self, ServerError> {
        let candidates = AddressResolver::new().resolve(spec).await?;

        let bound = CandidateConnector::new()
            .reuse_address(config.listener.reuse_address)
            .bind(&candidates)?;
        let listener = Listener::listen(bound, config.listener.backlog)?;

        let (handle, reaper) = reaper::reaper();

        Ok(Self {
            listener,
            dispatcher: Dispatcher::new(service, handle),
            reaper,
            drain_timeout: Duration::from_secs(config.listener.drain_timeout_secs),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Counters of dispatched and reaped units.
    pub fn status(&self) -> UnitStatus {
        self.reaper.status()
    }

    /// Accept until shutdown, then wait (bounded) for in-flight units.
    ///
    /// `on_accept` is called with each accepted peer's address.
    pub async fn run<F>(self, shutdown: broadcast::Receiver<()>, on_accept: F) -> ReapStats
    where
        F: FnMut(SocketAddr) + Send,
    {
        let status = self.reaper.status();
        let mut reaping = tokio::spawn(self.reaper.run());

        // Dropping the dispatcher at the end of the loop lets the reaper finish.
        self.listener.run(self.dispatcher, shutdown, on_accept).await;

        match tokio::time::timeout(self.drain_timeout, &mut reaping).await {
            Ok(Ok(stats)) => stats,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Reaper task failed");
                status.stats()
            }
            Err(_) => {
                tracing::warn!(
                    outstanding = status.outstanding(),
                    "Drain timeout elapsed, abandoning in-flight connections"
                );
                reaping.abort();
                status.stats()
            }
        }
    }
}
