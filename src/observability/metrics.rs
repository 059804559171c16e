//! Metrics collection.
//!
//! # Metrics
//! - `netdial_candidate_failures_total` (counter): rejected candidates by mode
//! - `netdial_connections_accepted_total` (counter)
//! - `netdial_accept_errors_total` (counter)
//! - `netdial_units_reaped_total` (counter): reaped units by outcome
//! - `netdial_outstanding_units` (gauge): dispatched but not yet reaped
//! - `netdial_packets_received_total` / `netdial_packet_bytes_total` (counters)

use metrics::{counter, gauge};

pub fn record_candidate_failure(mode: &'static str) {
    counter!("netdial_candidate_failures_total", "mode" => mode).increment(1);
}

pub fn record_connection_accepted() {
    counter!("netdial_connections_accepted_total").increment(1);
}

pub fn record_accept_error() {
    counter!("netdial_accept_errors_total").increment(1);
}

pub fn record_unit_reaped(outcome: &'static str) {
    counter!("netdial_units_reaped_total", "outcome" => outcome).increment(1);
}

pub fn record_outstanding_units(count: usize) {
    gauge!("netdial_outstanding_units").set(count as f64);
}

pub fn record_packet_received(bytes: usize) {
    counter!("netdial_packets_received_total").increment(1);
    counter!("netdial_packet_bytes_total").increment(bytes as u64);
}
