//! Endpoint resolution.
//!
//! # Responsibilities
//! - Turn an `EndpointSpec` into an ordered, non-empty candidate list
//! - Produce wildcard candidates for passive endpoints without a host
//! - Report lookup failures with the system's diagnostic text
//!
//! # Design Decisions
//! - Resolver order is preserved exactly; nothing is reordered or deduplicated
//! - The family hint filters records the way a family-restricted lookup would
//! - No sockets are created here

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::net::address::{CandidateAddress, EndpointSpec, Family, Service};

/// Resolution failed before any candidate list existed.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Host name lookup failed (unknown name, no network, ...).
    #[error("{host}: {source}")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },

    /// The service could not be mapped to a port.
    #[error("service '{0}' not supported for this socket kind")]
    Service(String),

    /// The lookup succeeded but nothing matched the requested family.
    #[error("{host}: no {family:?} address associated with hostname")]
    NoAddresses { host: String, family: Family },
}

/// Resolves endpoints through the system resolver (`getaddrinfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressResolver;

impl AddressResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve an endpoint into candidates, in system preference order.
    pub async fn resolve(&self, spec: &EndpointSpec) -> Result<Vec<CandidateAddress>, ResolutionError> {
        let port = match &spec.service {
            Service::Port(port) => *port,
            Service::Named(name) => return Err(ResolutionError::Service(name.clone())),
        };

        let records: Vec<SocketAddr> = match &spec.host {
            Some(host) => tokio::net::lookup_host((host.as_str(), port))
                .await
                .map_err(|source| ResolutionError::Lookup {
                    host: host.clone(),
                    source,
                })?
                .collect(),
            None => local_records(spec.passive, port),
        };

        let candidates = candidates_from_records(spec, records);
        if candidates.is_empty() {
            return Err(ResolutionError::NoAddresses {
                host: spec.host.clone().unwrap_or_else(|| "*".to_string()),
                family: spec.family,
            });
        }

        tracing::debug!(
            endpoint = %spec,
            candidates = candidates.len(),
            "Endpoint resolved"
        );

        Ok(candidates)
    }
}

/// Addresses used when no host is given, in the order the system resolver
/// reports them: wildcard IPv4 then IPv6 for passive, loopback IPv6 then
/// IPv4 otherwise.
fn local_records(passive: bool, port: u16) -> Vec<SocketAddr> {
    if passive {
        vec![
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port),
        ]
    } else {
        vec![
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), port),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port),
        ]
    }
}

/// Every record admitted by the family hint becomes a candidate, in order.
fn candidates_from_records(spec: &EndpointSpec, records: Vec<SocketAddr>) -> Vec<CandidateAddress> {
    records
        .into_iter()
        .filter(|addr| spec.family.admits(addr))
        .map(|addr| CandidateAddress::new(addr, spec.kind))
        .collect()
}
