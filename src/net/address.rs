//! Endpoint descriptions and resolved candidate addresses.
//!
//! # Responsibilities
//! - Describe what the caller wants to reach or bind (`EndpointSpec`)
//! - Describe one concrete transport address produced by resolution (`CandidateAddress`)
//! - Render addresses for diagnostics, branching on the real address family

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use socket2::{Domain, Protocol, SockAddr, Type};

/// Address family hint used when resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Family {
    Ipv4,
    Ipv6,
    /// Accept whatever the resolver returns.
    #[default]
    Unspecified,
}

impl Family {
    /// Whether a resolved address satisfies this hint.
    pub fn admits(self, addr: &SocketAddr) -> bool {
        match self {
            Family::Ipv4 => addr.is_ipv4(),
            Family::Ipv6 => addr.is_ipv6(),
            Family::Unspecified => true,
        }
    }
}

/// Concrete family of a resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    pub fn of(addr: &SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(_) => AddressFamily::Ipv4,
            SocketAddr::V6(_) => AddressFamily::Ipv6,
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            AddressFamily::Ipv4 => Domain::IPV4,
            AddressFamily::Ipv6 => Domain::IPV6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "IPv4",
            AddressFamily::Ipv6 => "IPv6",
        }
    }
}

/// Transport semantics of the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    /// Connection-oriented byte stream (TCP).
    Stream,
    /// Connectionless datagrams (UDP).
    Datagram,
}

impl SocketKind {
    pub fn socket_type(self) -> Type {
        match self {
            SocketKind::Stream => Type::STREAM,
            SocketKind::Datagram => Type::DGRAM,
        }
    }

    pub fn protocol(self) -> Protocol {
        match self {
            SocketKind::Stream => Protocol::TCP,
            SocketKind::Datagram => Protocol::UDP,
        }
    }
}

/// Service half of an endpoint: a port number or a named service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Service {
    Port(u16),
    Named(String),
}

impl Service {
    /// No particular service; resolves addresses only.
    pub const ANY: Service = Service::Port(0);
}

impl From<u16> for Service {
    fn from(port: u16) -> Self {
        Service::Port(port)
    }
}

impl FromStr for Service {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u16>() {
            Ok(port) => Service::Port(port),
            Err(_) => Service::Named(s.to_string()),
        })
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Port(port) => write!(f, "{}", port),
            Service::Named(name) => f.write_str(name),
        }
    }
}

/// Immutable input to resolution.
///
/// `passive` means "suitable for binding"; with no host it yields wildcard
/// addresses covering every local interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub host: Option<String>,
    pub service: Service,
    pub family: Family,
    pub kind: SocketKind,
    pub passive: bool,
}

impl EndpointSpec {
    /// A remote endpoint to connect or send to.
    pub fn remote(host: impl Into<String>, service: impl Into<Service>, family: Family, kind: SocketKind) -> Self {
        Self {
            host: Some(host.into()),
            service: service.into(),
            family,
            kind,
            passive: false,
        }
    }

    /// A local endpoint to bind on all interfaces.
    pub fn passive(service: impl Into<Service>, family: Family, kind: SocketKind) -> Self {
        Self {
            host: None,
            service: service.into(),
            family,
            kind,
            passive: true,
        }
    }
}

impl fmt::Display for EndpointSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(host) => write!(f, "{}:{}", host, self.service),
            None => write!(f, "*:{}", self.service),
        }
    }
}

/// One resolved transport address, tried as a unit by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateAddress {
    pub kind: SocketKind,
    pub protocol: Protocol,
    pub addr: SocketAddr,
}

impl CandidateAddress {
    pub fn new(addr: SocketAddr, kind: SocketKind) -> Self {
        Self {
            kind,
            protocol: kind.protocol(),
            addr,
        }
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.addr)
    }

    /// Raw socket address; `len()` gives the address length.
    pub fn sock_addr(&self) -> SockAddr {
        SockAddr::from(self.addr)
    }
}

impl fmt::Display for CandidateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_ip(&self.addr))
    }
}

/// Textual IP of a socket address, without the port.
pub fn render_ip(addr: &SocketAddr) -> String {
    match addr.ip() {
        IpAddr::V4(ip) => ip.to_string(),
        IpAddr::V6(ip) => ip.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_ip_branches_on_family() {
        let v4: SocketAddr = "192.0.2.7:9000".parse().unwrap();
        let v6: SocketAddr = "[2001:db8::1]:9000".parse().unwrap();

        assert_eq!(render_ip(&v4), "192.0.2.7");
        assert_eq!(render_ip(&v6), "2001:db8::1");
    }

    #[test]
    fn family_hint_filters() {
        let v4: SocketAddr = "127.0.0.1:1".parse().unwrap();
        let v6: SocketAddr = "[::1]:1".parse().unwrap();

        assert!(Family::Ipv4.admits(&v4));
        assert!(!Family::Ipv4.admits(&v6));
        assert!(Family::Ipv6.admits(&v6));
        assert!(Family::Unspecified.admits(&v4) && Family::Unspecified.admits(&v6));
    }

    #[test]
    fn service_parses_numeric_and_named() {
        assert_eq!("9000".parse::<Service>().unwrap(), Service::Port(9000));
        assert_eq!("http".parse::<Service>().unwrap(), Service::Named("http".into()));
    }

    #[test]
    fn candidate_protocol_follows_kind() {
        let addr: SocketAddr = "[::1]:4000".parse().unwrap();
        let candidate = CandidateAddress::new(addr, SocketKind::Datagram);

        assert_eq!(candidate.protocol, Protocol::UDP);
        assert_eq!(candidate.family(), AddressFamily::Ipv6);
        assert_eq!(candidate.to_string(), "::1");
    }
}
