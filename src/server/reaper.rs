//! Asynchronous reclamation of finished connection units.
//!
//! # Responsibilities
//! - Collect the join handle of every dispatched unit
//! - Await completions in the background, never in the accept loop
//! - Drain every already-finished unit on each wake-up
//! - Record outcomes (clean, transfer failure, panic)
//!
//! # Design Decisions
//! - Fire-and-forget: the accept loop only registers, it never waits
//! - Completion-driven (`FuturesUnordered`), not a polling loop
//! - A panicking unit is contained by its task and surfaces here as a `JoinError`

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::net::TransferError;
use crate::observability::metrics;
use crate::server::connection::ConnectionId;

/// Outcome of one connection unit.
pub type UnitResult = Result<(), TransferError>;

/// Totals of reaped units by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapStats {
    pub reaped: u64,
    pub failed: u64,
    pub panicked: u64,
}

#[derive(Debug, Default)]
struct Counters {
    outstanding: AtomicUsize,
    reaped: AtomicU64,
    failed: AtomicU64,
    panicked: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> ReapStats {
        ReapStats {
            reaped: self.reaped.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            panicked: self.panicked.load(Ordering::SeqCst),
        }
    }
}

/// Read-only view of the unit counters.
///
/// Holding it does not keep the reaper alive.
#[derive(Debug, Clone)]
pub struct UnitStatus {
    counters: Arc<Counters>,
}

impl UnitStatus {
    /// Units dispatched but not yet reaped.
    pub fn outstanding(&self) -> usize {
        self.counters.outstanding.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> ReapStats {
        self.counters.snapshot()
    }
}

struct Unit {
    id: ConnectionId,
    handle: JoinHandle<UnitResult>,
}

/// Registration side, held by the dispatcher.
///
/// The reaper stops once every handle is dropped and all units are reaped.
#[derive(Debug, Clone)]
pub struct ReaperHandle {
    tx: mpsc::UnboundedSender<Unit>,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unit").field("id", &self.id).finish()
    }
}

impl ReaperHandle {
    /// Hand a spawned unit over for reclamation. Never blocks.
    pub fn register(&self, id: ConnectionId, handle: JoinHandle<UnitResult>) {
        let outstanding = self.counters.outstanding.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_outstanding_units(outstanding);

        if self.tx.send(Unit { id, handle }).is_err() {
            // The unit keeps running detached; nobody will observe its outcome.
            self.counters.outstanding.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!(connection_id = %id, "Reaper stopped, unit detached");
        }
    }

    pub fn status(&self) -> UnitStatus {
        UnitStatus {
            counters: Arc::clone(&self.counters),
        }
    }
}

/// Background side; run it as its own task.
#[derive(Debug)]
pub struct Reaper {
    rx: mpsc::UnboundedReceiver<Unit>,
    counters: Arc<Counters>,
}

/// Create a connected reaper and registration handle.
pub fn reaper() -> (ReaperHandle, Reaper) {
    let (tx, rx) = mpsc::unbounded_channel();
    let counters = Arc::new(Counters::default());
    (
        ReaperHandle {
            tx,
            counters: Arc::clone(&counters),
        },
        Reaper { rx, counters },
    )
}

impl Reaper {
    pub fn status(&self) -> UnitStatus {
        UnitStatus {
            counters: Arc::clone(&self.counters),
        }
    }

    /// Reap units until every handle is gone and nothing is outstanding.
    pub async fn run(mut self) -> ReapStats {
        let mut pending = FuturesUnordered::new();
        let mut accepting = true;

        loop {
            tokio::select! {
                unit = self.rx.recv(), if accepting => match unit {
                    Some(Unit { id, handle }) => pending.push(async move { (id, handle.await) }),
                    None => accepting = false,
                },
                Some((id, result)) = pending.next(), if !pending.is_empty() => {
                    self.reap(id, result);
                    let mut batch = 1;
                    // Several units may have finished since the last wake-up.
                    while let Some(Some((id, result))) = pending.next().now_or_never() {
                        self.reap(id, result);
                        batch += 1;
                    }
                    tracing::trace!(batch, outstanding = pending.len(), "Reaped units");
                }
                else => break,
            }
        }

        let stats = self.counters.snapshot();
        tracing::debug!(reaped = stats.reaped, failed = stats.failed, panicked = stats.panicked, "Reaper stopped");
        stats
    }

    fn reap(&self, id: ConnectionId, result: Result<UnitResult, JoinError>) {
        let outstanding = self.counters.outstanding.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        self.counters.reaped.fetch_add(1, Ordering::SeqCst);
        metrics::record_outstanding_units(outstanding);

        let outcome = match result {
            Ok(Ok(())) => {
                tracing::trace!(connection_id = %id, "Unit finished");
                "ok"
            }
            Ok(Err(e)) => {
                self.counters.failed.fetch_add(1, Ordering::SeqCst);
                tracing::warn!(connection_id = %id, error = %e, "Connection unit failed");
                "failed"
            }
            Err(e) if e.is_panic() => {
                self.counters.panicked.fetch_add(1, Ordering::SeqCst);
                tracing::error!(connection_id = %id, "Connection unit panicked");
                "panicked"
            }
            Err(_) => {
                tracing::debug!(connection_id = %id, "Connection unit cancelled");
                "cancelled"
            }
        };
        metrics::record_unit_reaped(outcome);
    }
}
