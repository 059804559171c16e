//! Stream client: connects with fallback and prints the server's message.

use netdial::cli::{self, StreamClientArgs, CLIENT_STREAM_USAGE};
use netdial::client::StreamSession;
use netdial::net::{EndpointSpec, Family, SocketKind};

#[tokio::main]
async fn main() {
    let args: StreamClientArgs = cli::parse_or_usage(CLIENT_STREAM_USAGE);
    let config = cli::init(args.config.as_deref());

    let spec = EndpointSpec::remote(args.server, args.port, Family::Unspecified, SocketKind::Stream);

    let session = StreamSession::connect(&spec).await.unwrap_or_else(|e| cli::fail(e));
    println!("Connected to {}", session.peer());

    let received = session.receive(&config).await.unwrap_or_else(|e| cli::fail(e));
    println!("Message received: '{}'", received.message);
}
