//! Stream server: greets every connection with its host name, then closes it.

use netdial::cli::{self, ServerArgs, SERVER_STREAM_USAGE};
use netdial::lifecycle::{signals, Shutdown};
use netdial::net::{render_ip, EndpointSpec, Family, SocketKind};
use netdial::server::{local_host_name, Greeting, StreamServer};

#[tokio::main]
async fn main() {
    let args: ServerArgs = cli::parse_or_usage(SERVER_STREAM_USAGE);
    let config = cli::init(args.config.as_deref());

    let spec = EndpointSpec::passive(args.port, Family::Unspecified, SocketKind::Stream);
    let host_name = local_host_name(&config.server).unwrap_or_else(|e| cli::fail(e));
    let greeting = Greeting::new(&config.server.greeting_prefix, &host_name, &config.server.greeting_suffix);

    let server = StreamServer::bind(&spec, &config, greeting)
        .await
        .unwrap_or_else(|e| cli::fail(e));

    println!("{host_name}: Waiting for requests...");

    let shutdown = Shutdown::new();
    signals::install(&shutdown);

    let stats = server
        .run(shutdown.subscribe(), |peer| {
            println!("Received connection from {}", render_ip(&peer));
        })
        .await;
    tracing::info!(
        reaped = stats.reaped,
        failed = stats.failed,
        panicked = stats.panicked,
        "Shutdown complete"
    );
}
