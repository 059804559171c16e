//! Stream client: connect with fallback and read the server's message.

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::client::ClientError;
use crate::config::NetConfig;
use crate::net::{AddressResolver, CandidateAddress, CandidateConnector, Connected, EndpointSpec, TransferError};

/// Message read from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub peer: CandidateAddress,
    pub message: String,
}

/// An established stream connection that has not been read from yet.
#[derive(Debug)]
pub struct StreamSession {
    peer: CandidateAddress,
    stream: TcpStream,
}

impl StreamSession {
    /// Resolve `spec` and connect to the first candidate that accepts.
    pub async fn connect(spec: &EndpointSpec) -> Result<Self, ClientError> {
        let candidates = AddressResolver::new().resolve(spec).await?;
        let established = CandidateConnector::new().connect(&candidates).await?;

        tracing::info!(address = %established.address(), attempts = established.attempts, "Connected");

        match established.socket {
            Connected::Stream(stream) => Ok(Self {
                peer: established.candidate,
                stream,
            }),
            Connected::Datagram(_) => Err(ClientError::Socket(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "stream client resolved a datagram endpoint",
            ))),
        }
    }

    pub fn peer(&self) -> CandidateAddress {
        self.peer
    }

    /// One receive of at most `max_message - 1` bytes.
    ///
    /// Returns whatever the first read delivers; an orderly close before any
    /// data yields an empty message.
    pub async fn receive(mut self, config: &NetConfig) -> Result<Received, ClientError> {
        let limit = config.client.max_message.saturating_sub(1);
        let mut buffer = vec![0u8; limit];
        let n = self.stream.read(&mut buffer).await.map_err(TransferError::Receive)?;

        Ok(Received {
            peer: self.peer,
            message: String::from_utf8_lossy(&buffer[..n]).into_owned(),
        })
    }
}

/// Connect to `spec` and read the server's message.
pub async fn fetch_message(spec: &EndpointSpec, config: &NetConfig) -> Result<Received, ClientError> {
    StreamSession::connect(spec).await?.receive(config).await
}
