//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, stderr)
//!     → metrics.rs (counters and gauges through the `metrics` facade)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every recoverable failure
//! - Logs go to stderr; program output stays on stdout
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
