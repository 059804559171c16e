//! Print every address a host name resolves to, in resolver order.

use std::process;

use clap::Parser;
use netdial::cli::{self, GetIpArgs, GET_IP_USAGE};
use netdial::net::{AddressResolver, EndpointSpec, Family, Service, SocketKind};

#[tokio::main]
async fn main() {
    let args = GetIpArgs::try_parse().unwrap_or_else(|_| {
        eprintln!("{GET_IP_USAGE}");
        process::exit(1);
    });
    cli::init(args.config.as_deref());

    let spec = EndpointSpec::remote(args.hostname.clone(), Service::ANY, Family::Unspecified, SocketKind::Stream);

    let candidates = match AddressResolver::new().resolve(&spec).await {
        Ok(candidates) => candidates,
        Err(e) => {
            eprintln!("getaddrinfo: {e}");
            process::exit(2);
        }
    };

    println!("IP addresses for {}:", args.hostname);
    for candidate in candidates {
        println!("  {}: {}", candidate.family().label(), candidate);
    }
}
