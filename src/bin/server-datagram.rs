//! Datagram server: logs every datagram it receives and never replies.

use netdial::cli::{self, ServerArgs, SERVER_DATAGRAM_USAGE};
use netdial::lifecycle::{signals, Shutdown};
use netdial::net::{EndpointSpec, Family, SocketKind};
use netdial::server::{local_host_name, DatagramServer};

#[tokio::main]
async fn main() {
    let args: ServerArgs = cli::parse_or_usage(SERVER_DATAGRAM_USAGE);
    let config = cli::init(args.config.as_deref());

    let spec = EndpointSpec::passive(args.port, Family::Ipv4, SocketKind::Datagram);
    let host_name = local_host_name(&config.server).unwrap_or_else(|e| cli::fail(e));

    let server = DatagramServer::bind(&spec, &config)
        .await
        .unwrap_or_else(|e| cli::fail(e));

    let shutdown = Shutdown::new();
    signals::install(&shutdown);

    println!("{host_name}: Waiting for requests...");
    server
        .run(shutdown.subscribe(), |packet| {
            println!("{}", packet.summary());
            println!("Packet contains '{}'", packet.contents);
            println!("{host_name}: Waiting for requests...");
        })
        .await;

    tracing::info!("Shutdown complete");
}
