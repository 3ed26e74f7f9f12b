//! Message-echo server behaviour over real sockets.

use std::time::Duration;

use echo_servers::Entry;
use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

mod common;

fn url(addr: std::net::SocketAddr) -> String {
    format!("ws://{addr}/")
}

#[tokio::test]
async fn message_is_printed_exactly_once() {
    let mut server = common::start_message_server().await;
    let (mut ws, _) = connect_async(url(server.addr)).await.unwrap();

    ws.send(Message::text("Hello, world!")).await.unwrap();
    assert_eq!(server.next_entry().await, Entry::Text("Hello, world!".into()));
    server.assert_quiet().await;

    ws.close(None).await.unwrap();
    assert_eq!(server.next_entry().await, Entry::Closed);

    server.stop().await;
}

#[tokio::test]
async fn graceful_close_is_reported() {
    let mut server = common::start_message_server().await;
    let (mut ws, _) = connect_async(url(server.addr)).await.unwrap();

    ws.send(Message::text("M")).await.unwrap();
    ws.close(Some(CloseFrame {
        code: CloseCode::Normal,
        reason: "done".into(),
    }))
    .await
    .unwrap();

    assert_eq!(server.next_entry().await, Entry::Text("M".into()));
    assert_eq!(server.next_entry().await, Entry::Closed);

    // The server answers the closing handshake.
    while let Some(Ok(_)) = ws.next().await {}

    server.stop().await;
}

#[tokio::test]
async fn dropped_connection_is_forced_close() {
    let mut server = common::start_message_server().await;
    let (mut ws, _) = connect_async(url(server.addr)).await.unwrap();

    ws.send(Message::text("M")).await.unwrap();
    assert_eq!(server.next_entry().await, Entry::Text("M".into()));

    drop(ws);
    assert_eq!(server.next_entry().await, Entry::ClosedForcibly);

    server.stop().await;
}

#[tokio::test]
async fn malformed_frame_ends_only_that_connection() {
    let mut server = common::start_message_server().await;

    let (mut healthy, _) = connect_async(url(server.addr)).await.unwrap();
    let (mut broken, _) = connect_async(url(server.addr)).await.unwrap();

    // Unmasked client frame: FIN + text opcode, no mask bit.
    broken.get_mut().write_all(&[0x81, 0x02, b'h', b'i']).await.unwrap();
    assert!(matches!(server.next_entry().await, Entry::Failed(_)));

    healthy.send(Message::text("still here")).await.unwrap();
    assert_eq!(server.next_entry().await, Entry::Text("still here".into()));

    // New connections are still accepted.
    let (mut late, _) = connect_async(url(server.addr)).await.unwrap();
    late.send(Message::text("late")).await.unwrap();
    assert_eq!(server.next_entry().await, Entry::Text("late".into()));

    server.stop().await;
}

#[tokio::test]
async fn failed_handshake_is_reported() {
    let mut server = common::start_message_server().await;

    let mut raw = tokio::net::TcpStream::connect(server.addr).await.unwrap();
    raw.write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await.unwrap();

    assert!(matches!(server.next_entry().await, Entry::Failed(_)));

    server.stop().await;
}

#[tokio::test]
async fn concurrent_clients_are_independent() {
    let mut server = common::start_message_server().await;
    let (mut a, _) = connect_async(url(server.addr)).await.unwrap();
    let (mut b, _) = connect_async(url(server.addr)).await.unwrap();

    // `a` sits idle mid-conversation while `b` talks.
    a.send(Message::text("a-1")).await.unwrap();
    assert_eq!(server.next_entry().await, Entry::Text("a-1".into()));

    for i in 0..5 {
        b.send(Message::text(format!("b-{i}"))).await.unwrap();
    }
    for i in 0..5 {
        assert_eq!(server.next_entry().await, Entry::Text(format!("b-{i}")));
    }

    let writers = [("a", a), ("b", b)].map(|(name, mut ws)| {
        tokio::spawn(async move {
            for i in 0..20 {
                ws.send(Message::text(format!("{name}:{i}"))).await.unwrap();
            }
            ws.close(None).await.unwrap();
        })
    });
    for writer in writers {
        writer.await.unwrap();
    }

    let mut a_seen = Vec::new();
    let mut b_seen = Vec::new();
    let mut closed = 0;
    while closed < 2 {
        match server.next_entry().await {
            Entry::Text(text) if text.starts_with("a:") => a_seen.push(text),
            Entry::Text(text) if text.starts_with("b:") => b_seen.push(text),
            Entry::Closed => closed += 1,
            other => panic!("unexpected entry {other:?}"),
        }
    }

    // Per-connection order is preserved and nothing is lost or mixed.
    let expected = |name: &str| (0..20).map(|i| format!("{name}:{i}")).collect::<Vec<_>>();
    assert_eq!(a_seen, expected("a"));
    assert_eq!(b_seen, expected("b"));

    server.stop().await;
}

#[tokio::test]
async fn shutdown_closes_open_connections() {
    let mut server = common::start_message_server().await;
    let (mut ws, _) = connect_async(url(server.addr)).await.unwrap();

    ws.send(Message::text("hi")).await.unwrap();
    assert_eq!(server.next_entry().await, Entry::Text("hi".into()));

    let client = tokio::spawn(async move {
        let mut close_code = None;
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Close(Some(frame)) = msg {
                close_code = Some(frame.code);
            }
        }
        close_code
    });

    let addr = server.addr;
    server.shutdown.trigger();
    let task = server.task;
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("server did not stop")
        .unwrap();

    assert_eq!(client.await.unwrap(), Some(CloseCode::Away));
    assert_eq!(server.entries.recv().await, Some(Entry::Closed));

    // The listening socket is gone.
    assert!(connect_async(url(addr)).await.is_err());
}
