use futures::StreamExt;
use realtime::{Broadcaster, RealtimeConfig, socket_router};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};

async fn serve(broadcaster: Broadcaster) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, socket_router(broadcaster)).await.unwrap();
    });
    format!("ws://{addr}/socket")
}

async fn wait_for_subscribers(broadcaster: &Broadcaster, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while broadcaster.subscriber_count() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("socket never subscribed");
}

#[tokio::test]
async fn test_socket_receives_published_events() {
    let broadcaster = Broadcaster::new(&RealtimeConfig::default());
    let url = serve(broadcaster.clone()).await;

    let (mut ws, _) = connect_async(&url).await.unwrap();
    wait_for_subscribers(&broadcaster, 1).await;

    broadcaster.publish(
        "products",
        &json!({ "action": "delete", "product": "0192f0c1-0000-7000-8000-000000000000" }),
    );

    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let Message::Text(text) = frame else {
        panic!("expected text frame, got {frame:?}");
    };
    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["event"], "products");
    assert_eq!(json["data"]["action"], "delete");
}

#[tokio::test]
async fn test_close_sends_close_frame() {
    let broadcaster = Broadcaster::new(&RealtimeConfig::default());
    let url = serve(broadcaster.clone()).await;

    let (mut ws, _) = connect_async(&url).await.unwrap();
    wait_for_subscribers(&broadcaster, 1).await;

    broadcaster.close();

    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .unwrap();
    assert!(matches!(frame, Some(Ok(Message::Close(_))) | None));
}
