//! Client/server scenarios over loopback.

use std::net::SocketAddr;
use std::time::Duration;

use netdial::client::{fetch_message, send_datagram, ClientError, StreamSession};
use tokio::io::AsyncWriteExt;
use netdial::config::NetConfig;
use netdial::net::{EndpointSpec, Family, Mode, Service, SocketKind, Stage};
use netdial::server::{DatagramServer, Greeting, ServerError, StreamServer};

mod common;

fn host_a_config() -> NetConfig {
    let mut config = NetConfig::default();
    config.server.host_name = Some("host-a".into());
    config
}

#[tokio::test]
async fn stream_client_receives_greeting_then_close() {
    let config = host_a_config();
    let greeting = Greeting::new(&config.server.greeting_prefix, "host-a", &config.server.greeting_suffix);
    let server = common::start_stream_server(greeting, config.clone()).await;

    // Raw read: exactly the greeting bytes, then EOF from the server side.
    let raw = common::read_all(server.addr).await;
    assert_eq!(raw, b"Hello from server host-a!");

    let spec = EndpointSpec::remote("127.0.0.1", server.addr.port(), Family::Unspecified, SocketKind::Stream);
    let received = fetch_message(&spec, &config).await.unwrap();
    assert_eq!(received.message, "Hello from server host-a!");
    assert_eq!(received.peer.to_string(), "127.0.0.1");

    let stats = server.stop().await;
    assert_eq!(stats.reaped, 2);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn stream_client_truncates_to_buffer() {
    let server = common::start_stream_server(Greeting::new("Hello from server ", "host-a", "!"), NetConfig::default()).await;

    let mut config = NetConfig::default();
    config.client.max_message = 6;
    let spec = EndpointSpec::remote("127.0.0.1", server.addr.port(), Family::Ipv4, SocketKind::Stream);
    let received = fetch_message(&spec, &config).await.unwrap();

    assert_eq!(received.message, "Hello");
    server.stop().await;
}

#[tokio::test]
async fn stream_client_returns_after_one_receive_on_open_connection() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream.write_all(b"Hello from server peer!").await.unwrap();
        // Keep the connection open until the client has its message.
        let _ = release_rx.await;
    });

    let spec = EndpointSpec::remote("127.0.0.1", port, Family::Ipv4, SocketKind::Stream);
    let session = StreamSession::connect(&spec).await.unwrap();
    assert_eq!(session.peer().to_string(), "127.0.0.1");

    let received = tokio::time::timeout(Duration::from_secs(3), session.receive(&NetConfig::default()))
        .await
        .expect("client waited for close instead of returning the message")
        .unwrap();
    assert_eq!(received.message, "Hello from server peer!");

    let _ = release_tx.send(());
    server.await.unwrap();
}

#[tokio::test]
async fn stream_server_reports_each_accepted_peer() {
    let mut server =
        common::start_stream_server(Greeting::new("Hello from server ", "host-a", "!"), NetConfig::default()).await;

    common::read_all(server.addr).await;
    common::read_all(server.addr).await;

    for _ in 0..2 {
        let peer = tokio::time::timeout(Duration::from_secs(5), server.accepted.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(netdial::net::render_ip(&peer), "127.0.0.1");
    }
    server.stop().await;
}

#[tokio::test]
async fn datagram_ping_is_logged_without_reply() {
    let config = NetConfig::default();
    let spec = EndpointSpec::passive(0u16, Family::Ipv4, SocketKind::Datagram);
    let server = DatagramServer::bind(&spec, &config).await.unwrap();
    let port = server.local_addr().unwrap().port();

    let target = EndpointSpec::remote("localhost", port, Family::Ipv4, SocketKind::Datagram);
    let sent = send_datagram(&target, b"ping").await.unwrap();
    assert_eq!(sent.bytes, 4);
    assert_eq!(sent.to.addr, SocketAddr::from(([127, 0, 0, 1], port)));

    let packet = tokio::time::timeout(Duration::from_secs(5), server.receive())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(packet.contents, "ping");
    assert_eq!(format!("Packet contains '{}'", packet.contents), "Packet contains 'ping'");
    assert_eq!(packet.summary(), "Received 4-byte packet from 127.0.0.1");
}

#[tokio::test]
async fn datagram_server_run_reports_and_stops() {
    let spec = EndpointSpec::passive(0u16, Family::Ipv4, SocketKind::Datagram);
    let server = DatagramServer::bind(&spec, &NetConfig::default()).await.unwrap();
    let port = server.local_addr().unwrap().port();

    let shutdown = netdial::Shutdown::new();
    let receiver = shutdown.subscribe();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let task = tokio::spawn(server.run(receiver, move |packet| {
        let _ = tx.send(packet.clone());
    }));

    let target = EndpointSpec::remote("127.0.0.1", port, Family::Ipv4, SocketKind::Datagram);
    send_datagram(&target, b"one").await.unwrap();

    let packet = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert_eq!(packet.contents, "one");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
}

#[tokio::test]
async fn oversized_datagram_is_cut_to_buffer() {
    let mut config = NetConfig::default();
    config.datagram.max_packet = 5;
    let spec = EndpointSpec::passive(0u16, Family::Ipv4, SocketKind::Datagram);
    let server = DatagramServer::bind(&spec, &config).await.unwrap();
    let port = server.local_addr().unwrap().port();

    let target = EndpointSpec::remote("127.0.0.1", port, Family::Ipv4, SocketKind::Datagram);
    send_datagram(&target, b"abcdefgh").await.unwrap();

    let packet = tokio::time::timeout(Duration::from_secs(5), server.receive())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(packet.len, 4);
    assert_eq!(packet.contents, "abcd");
}

#[tokio::test]
async fn unknown_host_fails_resolution() {
    let spec = EndpointSpec::remote("no-such-host.invalid", 9001u16, Family::Unspecified, SocketKind::Stream);

    let err = fetch_message(&spec, &NetConfig::default()).await.unwrap_err();

    assert!(matches!(err, ClientError::Resolution(_)));
    assert!(err.to_string().starts_with("getaddrinfo: "));
}

#[tokio::test]
async fn named_service_fails_before_binding() {
    let spec = EndpointSpec::passive(Service::Named("nope".into()), Family::Unspecified, SocketKind::Stream);

    let result = StreamServer::bind(&spec, &NetConfig::default(), Greeting::new("", "x", "")).await;

    assert!(matches!(result, Err(ServerError::Resolution(_))));
}

#[tokio::test]
async fn refused_connection_exhausts_candidates() {
    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let spec = EndpointSpec::remote("127.0.0.1", closed_port, Family::Ipv4, SocketKind::Stream);

    let err = fetch_message(&spec, &NetConfig::default()).await.unwrap_err();

    let ClientError::NoViableCandidate(err) = err else {
        panic!("expected candidate exhaustion");
    };
    assert_eq!(err.mode, Mode::Connect);
    assert_eq!(err.attempts.len(), 1);
    assert_eq!(err.attempts[0].stage, Stage::Connect);
}
