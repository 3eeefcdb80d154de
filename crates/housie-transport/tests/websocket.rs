//! Integration tests for the WebSocket transport against a real client.

use futures_util::{SinkExt, StreamExt};
use housie_transport::{Connection, Listener, WebSocketListener};
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn test_text_frame_round_trip() {
    let mut listener = WebSocketListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let conn = listener.accept().await.unwrap();
        let msg = conn.recv().await.unwrap().expect("client frame");
        conn.send(&format!("echo:{msg}")).await.unwrap();
        // Clean close from the client surfaces as None.
        assert!(conn.recv().await.unwrap().is_none());
    });

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    ws.send(Message::Text("hello".into())).await.unwrap();

    let reply = ws.next().await.unwrap().unwrap();
    assert_eq!(reply, Message::Text("echo:hello".into()));

    ws.close(None).await.unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn test_binary_utf8_frames_are_accepted() {
    let mut listener = WebSocketListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let conn = listener.accept().await.unwrap();
        let msg = conn.recv().await.unwrap().expect("binary frame as text");
        assert_eq!(msg, "{\"type\":\"ping\"}");
    });

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    ws.send(Message::Binary(b"{\"type\":\"ping\"}".to_vec().into()))
        .await
        .unwrap();

    server.await.unwrap();
}

#[tokio::test]
async fn test_cloned_connection_shares_the_stream() {
    let mut listener = WebSocketListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let conn = listener.accept().await.unwrap();
        let writer = conn.clone();
        assert_eq!(writer.id(), conn.id());
        writer.send("from-writer").await.unwrap();
        conn.send("from-original").await.unwrap();
    });

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    assert_eq!(
        ws.next().await.unwrap().unwrap(),
        Message::Text("from-writer".into())
    );
    assert_eq!(
        ws.next().await.unwrap().unwrap(),
        Message::Text("from-original".into())
    );

    server.await.unwrap();
}
