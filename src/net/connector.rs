//! Ordered fallback across resolved candidates.
//!
//! # Responsibilities
//! - Try candidates strictly in order, stopping at the first success
//! - Bind (with address reuse), connect, or merely open a socket per candidate
//! - Close every socket created for a rejected candidate before moving on
//! - Fail with `NoViableCandidateError` only after every candidate was tried
//!
//! # Design Decisions
//! - No retry per candidate; a single pass over the list
//! - Attempts are sequential, never parallel, so "first viable" is well defined

use std::fmt;

use crate::net::address::CandidateAddress;
use crate::net::transport::{SystemTransport, Transport};
use crate::observability::metrics;

/// What the connector does with each candidate's socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Connect to the candidate (clients).
    Connect,
    /// Bind to the candidate (servers).
    Bind,
    /// Only create the socket; the caller addresses the candidate per send.
    Open,
}

impl Mode {
    fn verb(self) -> &'static str {
        match self {
            Mode::Connect => "connect to",
            Mode::Bind => "bind to",
            Mode::Open => "open",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Mode::Connect => "connect",
            Mode::Bind => "bind",
            Mode::Open => "open",
        }
    }
}

/// Step of a candidate attempt that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Create,
    SetReuseAddress,
    Bind,
    Connect,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::Create => "Failed to create socket",
            Stage::SetReuseAddress => "Failed to set socket option",
            Stage::Bind => "Failed to bind to socket",
            Stage::Connect => "Failed to connect to socket",
        };
        f.write_str(text)
    }
}

/// One candidate was rejected. Recovered locally by moving to the next one.
#[derive(Debug, thiserror::Error)]
#[error("{stage} {candidate}: {source}")]
pub struct CandidateAttemptError {
    pub candidate: CandidateAddress,
    pub stage: Stage,
    #[source]
    pub source: std::io::Error,
}

/// Every candidate was attempted and none succeeded.
#[derive(Debug, thiserror::Error)]
#[error("Failed to {} any sockets ({} candidates tried)", .mode.verb(), .attempts.len())]
pub struct NoViableCandidateError {
    pub mode: Mode,
    pub attempts: Vec<CandidateAttemptError>,
}

/// The winning socket with the candidate that produced it.
#[derive(Debug)]
pub struct Established<S> {
    pub socket: S,
    pub candidate: CandidateAddress,
    /// Number of candidates tried, including the winner.
    pub attempts: usize,
}

impl<S> Established<S> {
    /// Human-readable rendering of the winning address.
    pub fn address(&self) -> String {
        self.candidate.to_string()
    }

    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Established<T> {
        Established {
            socket: f(self.socket),
            candidate: self.candidate,
            attempts: self.attempts,
        }
    }
}

/// Walks a candidate list with ordered fallback.
#[derive(Debug, Clone)]
pub struct CandidateConnector<T = SystemTransport> {
    transport: T,
    reuse_address: bool,
}

impl CandidateConnector<SystemTransport> {
    pub fn new() -> Self {
        Self::with_transport(SystemTransport)
    }
}

impl Default for CandidateConnector<SystemTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> CandidateConnector<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            reuse_address: true,
        }
    }

    /// Whether `SO_REUSEADDR` is set before binding (default: on).
    pub fn reuse_address(mut self, enabled: bool) -> Self {
        self.reuse_address = enabled;
        self
    }

    /// Connect to the first candidate that accepts.
    pub async fn connect(
        &self,
        candidates: &[CandidateAddress],
    ) -> Result<Established<T::Connected>, NoViableCandidateError> {
        let mut failures = Failures::new(Mode::Connect);

        for (index, candidate) in candidates.iter().enumerate() {
            let socket = match self.transport.create(candidate) {
                Ok(socket) => socket,
                Err(e) => {
                    failures.record(*candidate, Stage::Create, e);
                    continue;
                }
            };

            tracing::info!(address = %candidate, "Attempting connection");

            // The socket is consumed; on failure it is dropped inside the attempt.
            match self.transport.connect(socket, *candidate).await {
                Ok(connected) => return Ok(failures.succeed(connected, *candidate, index)),
                Err(e) => failures.record(*candidate, Stage::Connect, e),
            }
        }

        Err(failures.exhausted())
    }

    /// Bind to the first candidate that accepts.
    pub fn bind(&self, candidates: &[CandidateAddress]) -> Result<Established<T::Socket>, NoViableCandidateError> {
        let mut failures = Failures::new(Mode::Bind);

        for (index, candidate) in candidates.iter().enumerate() {
            let socket = match self.transport.create(candidate) {
                Ok(socket) => socket,
                Err(e) => {
                    failures.record(*candidate, Stage::Create, e);
                    continue;
                }
            };

            if self.reuse_address {
                if let Err(e) = self.transport.set_reuse_address(&socket) {
                    drop(socket);
                    failures.record(*candidate, Stage::SetReuseAddress, e);
                    continue;
                }
            }

            match self.transport.bind(&socket, candidate) {
                Ok(()) => return Ok(failures.succeed(socket, *candidate, index)),
                Err(e) => {
                    drop(socket);
                    failures.record(*candidate, Stage::Bind, e);
                }
            }
        }

        Err(failures.exhausted())
    }

    /// Open a socket on the first candidate whose socket can be created.
    ///
    /// Nothing is verified beyond creation: a send on the returned socket may
    /// still fail, and later candidates are not consulted when it does.
    pub fn open(&self, candidates: &[CandidateAddress]) -> Result<Established<T::Socket>, NoViableCandidateError> {
        let mut failures = Failures::new(Mode::Open);

        for (index, candidate) in candidates.iter().enumerate() {
            match self.transport.create(candidate) {
                Ok(socket) => return Ok(failures.succeed(socket, *candidate, index)),
                Err(e) => failures.record(*candidate, Stage::Create, e),
            }
        }

        Err(failures.exhausted())
    }
}

/// Rejected candidates of one pass.
struct Failures {
    mode: Mode,
    attempts: Vec<CandidateAttemptError>,
}

impl Failures {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            attempts: Vec::new(),
        }
    }

    fn record(&mut self, candidate: CandidateAddress, stage: Stage, source: std::io::Error) {
        let error = CandidateAttemptError {
            candidate,
            stage,
            source,
        };
        tracing::warn!(mode = self.mode.label(), error = %error, "Candidate rejected");
        metrics::record_candidate_failure(self.mode.label());
        self.attempts.push(error);
    }

    fn succeed<S>(self, socket: S, candidate: CandidateAddress, index: usize) -> Established<S> {
        tracing::debug!(
            mode = self.mode.label(),
            address = %candidate,
            rejected = self.attempts.len(),
            "Candidate accepted"
        );
        Established {
            socket,
            candidate,
            attempts: index + 1,
        }
    }

    fn exhausted(self) -> NoViableCandidateError {
        NoViableCandidateError {
            mode: self.mode,
            attempts: self.attempts,
        }
    }
}
