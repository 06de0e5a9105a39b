use tandem_relay::RelayConfig;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use crate::integration::init_tracing;
use crate::utils::{RECV_TIMEOUT_MS, TestRelay, TestWsClient};

#[tokio::test]
async fn test_capacity_refused() {
    init_tracing();

    let server = TestRelay::spawn_with(RelayConfig {
        max_connections: 1,
        ..RelayConfig::default()
    })
    .await;

    let mut first = TestWsClient::connect(&server.url())
        .await
        .expect("First client failed to connect");
    assert!(server.wait_for_connections(1, 2000).await);

    let mut second = TestWsClient::connect(&server.url())
        .await
        .expect("Upgrade should still succeed before refusal");

    match second.recv(RECV_TIMEOUT_MS).await.expect("Expected close frame") {
        Message::Close(Some(frame)) => assert_eq!(frame.code, CloseCode::Again),
        other => panic!("Expected close with code 1013, got {:?}", other),
    }
    assert_eq!(server.relay.connection_count(), 1);

    // the admitted client still works
    first.send_text("still here").await.unwrap();
    assert_eq!(first.recv_text().await.unwrap(), "still here");
}
