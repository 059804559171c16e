//! Datagram client: fire one datagram, expect nothing back.

use crate::client::ClientError;
use crate::net::{transport, AddressResolver, CandidateAddress, CandidateConnector, EndpointSpec, TransferError};

/// Where the datagram went and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentDatagram {
    pub to: CandidateAddress,
    pub bytes: usize,
}

/// Send `message` as a single datagram to the first usable candidate of `spec`.
pub async fn send_datagram(spec: &EndpointSpec, message: &[u8]) -> Result<SentDatagram, ClientError> {
    let candidates = AddressResolver::new().resolve(spec).await?;
    let opened = CandidateConnector::new().open(&candidates)?;

    let to = opened.candidate;
    let socket = transport::into_datagram(opened.socket).map_err(ClientError::Socket)?;

    let bytes = socket
        .send_to(message, to.addr)
        .await
        .map_err(|source| TransferError::Send { peer: to.addr, source })?;

    tracing::info!(address = %to, bytes, "Packet sent");

    Ok(SentDatagram { to, bytes })
}
