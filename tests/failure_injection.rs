//! Failure injection tests for the relay server and client decode path.

mod common;

use std::time::Duration;

use common::{raw_exchange, start_relay, start_relay_with_config, MockFetch};
use relay_proxy::client::{ClientError, RelayClient};
use relay_proxy::config::RelayConfig;
use relay_proxy::protocol::frame::FrameError;
use relay_proxy::protocol::{CONTENT_TYPE_HEADER_LEN, FRAME_HEADER_LEN, LENGTH_HEADER_LEN};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[tokio::test]
async fn early_close_produces_no_frame_and_server_survives() {
    let (addr, shutdown) = start_relay(MockFetch::ok(b"ok", "text/plain")).await;

    // Send a partial request and close the write side before any newline.
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"http://half-a-request").await.unwrap();
    stream.shutdown().await.unwrap();
    let mut leftover = Vec::new();
    stream.read_to_end(&mut leftover).await.unwrap();
    assert!(leftover.is_empty(), "no frame expected after early close");

    // The listener must keep serving other connections.
    let client = RelayClient::new("127.0.0.1", addr.port());
    let response = client.fetch("http://example.com/").await.unwrap();
    assert_eq!(response.body, b"ok");

    shutdown.trigger();
}

#[tokio::test]
async fn non_utf8_request_line_yields_error_frame() {
    let (addr, shutdown) = start_relay(MockFetch::ok(b"unused", "text/plain")).await;

    let response = raw_exchange(addr, b"\xff\xfe\xfd\n").await;

    assert_eq!(&response[..LENGTH_HEADER_LEN], b"0000000037");
    assert_eq!(
        &response[FRAME_HEADER_LEN..],
        b"Invalid URL encoding; expected UTF-8."
    );

    shutdown.trigger();
}

#[tokio::test]
async fn empty_request_line_yields_error_frame() {
    let (addr, shutdown) = start_relay(MockFetch::ok(b"unused", "text/plain")).await;

    let response = raw_exchange(addr, b"\n").await;

    assert_eq!(&response[FRAME_HEADER_LEN..], b"No URL received.");

    shutdown.trigger();
}

#[tokio::test]
async fn overlong_request_line_yields_error_frame() {
    let (addr, shutdown) = start_relay(MockFetch::ok(b"unused", "text/plain")).await;

    // Exactly the cap, no newline: the server consumes every byte, hits
    // the limit, and answers with an error frame instead of buffering on.
    let request = vec![b'a'; 8192];
    let response = raw_exchange(addr, &request).await;

    assert_eq!(&response[FRAME_HEADER_LEN..], b"Request line too long.");

    shutdown.trigger();
}

#[tokio::test]
async fn bytes_after_first_newline_are_ignored() {
    let (addr, shutdown) = start_relay(MockFetch::ok(b"first", "text/plain")).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"http://example.com/\ntrailing garbage")
        .await
        .unwrap();

    // Read the exact frame rather than to EOF; the relay may reset the
    // connection once it closes with the garbage still unread.
    let mut frame = vec![0u8; FRAME_HEADER_LEN + 5];
    stream.read_exact(&mut frame).await.unwrap();

    assert_eq!(&frame[..LENGTH_HEADER_LEN], b"0000000005");
    assert_eq!(&frame[FRAME_HEADER_LEN..], b"first");

    shutdown.trigger();
}

#[tokio::test]
async fn truncated_body_reports_expected_and_actual_counts() {
    let addr = spawn_scripted_relay(|declared_ctype| {
        let mut frame = Vec::new();
        frame.extend_from_slice(b"0000000100");
        frame.extend_from_slice(&declared_ctype);
        frame.extend_from_slice(&[b'x'; 10]);
        frame
    })
    .await;

    let client = RelayClient::new("127.0.0.1", addr.port());
    let err = client.fetch("http://example.com/").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("100"), "{message}");
    assert!(message.contains("10"), "{message}");
    match err {
        ClientError::BodyTruncated { expected, actual } => {
            assert_eq!(expected, 100);
            assert_eq!(actual, 10);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn garbage_length_header_is_rejected() {
    let addr = spawn_scripted_relay(|declared_ctype| {
        let mut frame = Vec::new();
        frame.extend_from_slice(b"notdecimal");
        frame.extend_from_slice(&declared_ctype);
        frame
    })
    .await;

    let client = RelayClient::new("127.0.0.1", addr.port());
    let err = client.fetch("http://example.com/").await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Frame(FrameError::InvalidLengthHeader(_))
    ));
}

#[tokio::test]
async fn short_content_type_header_is_rejected() {
    let addr = spawn_scripted_relay(|_| {
        let mut frame = Vec::new();
        frame.extend_from_slice(b"0000000005");
        frame.extend_from_slice(&[b' '; 40]);
        frame
    })
    .await;

    let client = RelayClient::new("127.0.0.1", addr.port());
    let err = client.fetch("http://example.com/").await.unwrap_err();

    match err {
        ClientError::IncompleteContentTypeHeader { expected, actual } => {
            assert_eq!(expected, CONTENT_TYPE_HEADER_LEN);
            assert_eq!(actual, 40);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_read_timeout_closes_without_frame() {
    let mut config = RelayConfig::default();
    config.timeouts.client_io_secs = 1;
    let (addr, shutdown) =
        start_relay_with_config(MockFetch::ok(b"unused", "text/plain"), config).await;

    // Connect and say nothing; the relay must give up and close the
    // socket without writing a frame.
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    assert!(response.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn silent_relay_trips_the_client_deadline() {
    // Accepts and then says nothing at all.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(socket);
    });

    let client =
        RelayClient::new("127.0.0.1", addr.port()).with_timeout(Duration::from_millis(200));
    let err = client.fetch("http://example.com/").await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout(_)));
}

#[tokio::test]
async fn fetch_other_failure_becomes_error_frame() {
    let (addr, shutdown) = start_relay(MockFetch::failing(
        relay_proxy::fetch::FetchError::Other("connection pool exhausted".to_string()),
    ))
    .await;

    let response = raw_exchange(addr, b"http://example.com/\n").await;

    assert_eq!(
        &response[FRAME_HEADER_LEN..],
        b"Fetch failed: connection pool exhausted"
    );

    shutdown.trigger();
}

/// Spawn a fake relay that reads one request and answers with whatever
/// frame bytes the script returns, then closes.
async fn spawn_scripted_relay<S>(script: S) -> std::net::SocketAddr
where
    S: FnOnce([u8; CONTENT_TYPE_HEADER_LEN]) -> Vec<u8> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;

        let mut declared_ctype = [b' '; CONTENT_TYPE_HEADER_LEN];
        declared_ctype[..10].copy_from_slice(b"text/plain");
        let frame = script(declared_ctype);
        let _ = socket.write_all(&frame).await;
        let _ = socket.shutdown().await;
    });

    addr
}
