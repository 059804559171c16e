//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → accept/receive loops exit → units drained → process exits
//! ```
//!
//! # Design Decisions
//! - Servers otherwise run forever; only a signal (or a test) stops them
//! - Shutdown drains in-flight units with a deadline

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
