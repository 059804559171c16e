//! Socket creation and the per-candidate primitives the connector drives.
//!
//! # Responsibilities
//! - Create an OS socket matching a candidate's family, kind and protocol
//! - Set address reuse, bind, and connect
//! - Hand finished sockets over to tokio
//!
//! # Design Decisions
//! - `socket2` is used for creation because tokio cannot set options before bind
//!   or create a socket from an explicit protocol
//! - Dropping a socket closes it, so a failed candidate never outlives its attempt

use std::future::Future;
use std::io;

use socket2::Socket;
use tokio::net::{TcpListener, TcpSocket, TcpStream, UdpSocket};

use crate::net::address::{CandidateAddress, SocketKind};

/// Primitives used by the connector for each candidate.
///
/// `Socket` must close itself on drop.
pub trait Transport {
    /// A created but not yet connected socket.
    type Socket;
    /// A socket connected to its candidate.
    type Connected;

    fn create(&self, candidate: &CandidateAddress) -> io::Result<Self::Socket>;

    fn set_reuse_address(&self, socket: &Self::Socket) -> io::Result<()>;

    fn bind(&self, socket: &Self::Socket, candidate: &CandidateAddress) -> io::Result<()>;

    fn connect(
        &self,
        socket: Self::Socket,
        candidate: CandidateAddress,
    ) -> impl Future<Output = io::Result<Self::Connected>> + Send;
}

/// Real sockets through `socket2` and tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTransport;

/// A connected socket of either kind.
#[derive(Debug)]
pub enum Connected {
    Stream(TcpStream),
    Datagram(UdpSocket),
}

impl Transport for SystemTransport {
    type Socket = Socket;
    type Connected = Connected;

    fn create(&self, candidate: &CandidateAddress) -> io::Result<Socket> {
        Socket::new(
            candidate.family().domain(),
            candidate.kind.socket_type(),
            Some(candidate.protocol),
        )
    }

    fn set_reuse_address(&self, socket: &Socket) -> io::Result<()> {
        socket.set_reuse_address(true)
    }

    fn bind(&self, socket: &Socket, candidate: &CandidateAddress) -> io::Result<()> {
        socket.bind(&candidate.sock_addr())
    }

    fn connect(
        &self,
        socket: Socket,
        candidate: CandidateAddress,
    ) -> impl Future<Output = io::Result<Connected>> + Send {
        async move {
            socket.set_nonblocking(true)?;
            match candidate.kind {
                SocketKind::Stream => {
                    let stream = TcpSocket::from_std_stream(socket.into())
                        .connect(candidate.addr)
                        .await?;
                    Ok(Connected::Stream(stream))
                }
                SocketKind::Datagram => {
                    // Datagram connect only records the default peer; it never blocks.
                    socket.connect(&candidate.sock_addr())?;
                    Ok(Connected::Datagram(UdpSocket::from_std(socket.into())?))
                }
            }
        }
    }
}

/// Mark a bound stream socket as listening and hand it to tokio.
pub fn into_listener(socket: Socket, backlog: i32) -> io::Result<TcpListener> {
    socket.listen(backlog)?;
    socket.set_nonblocking(true)?;
    TcpListener::from_std(socket.into())
}

/// Hand a bound or unbound datagram socket to tokio.
pub fn into_datagram(socket: Socket) -> io::Result<UdpSocket> {
    socket.set_nonblocking(true)?;
    UdpSocket::from_std(socket.into())
}
