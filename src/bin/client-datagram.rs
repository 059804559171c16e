//! Datagram client: sends its message as one datagram, fire-and-forget.

use netdial::cli::{self, DatagramClientArgs, CLIENT_DATAGRAM_USAGE};
use netdial::client::send_datagram;
use netdial::net::{EndpointSpec, Family, SocketKind};

#[tokio::main]
async fn main() {
    let args: DatagramClientArgs = cli::parse_or_usage(CLIENT_DATAGRAM_USAGE);
    let _config = cli::init(args.config.as_deref());

    let spec = EndpointSpec::remote(args.server, args.port, Family::Ipv4, SocketKind::Datagram);

    send_datagram(&spec, args.message.as_bytes())
        .await
        .unwrap_or_else(|e| cli::fail(e));
}
