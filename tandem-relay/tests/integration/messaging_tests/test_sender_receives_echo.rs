use crate::integration::init_tracing;
use crate::utils::{TestRelay, TestWsClient};

#[tokio::test]
async fn test_sender_receives_echo() {
    init_tracing();

    let server = TestRelay::spawn().await;
    let mut alice = TestWsClient::connect(&server.url()).await.unwrap();
    let mut bob = TestWsClient::connect(&server.url()).await.unwrap();
    assert!(server.wait_for_connections(2, 2000).await);

    let offer = r#"{"sdp":{"type":"offer","sdp":"v=0\r\n"},"uuid":"A"}"#;
    alice.send_text(offer).await.unwrap();

    assert_eq!(bob.recv_text().await.unwrap(), offer);
    assert_eq!(alice.recv_text().await.unwrap(), offer, "Sender must get its own echo");

    assert!(alice.is_silent_for(200).await, "Echo must arrive exactly once");
    assert!(bob.is_silent_for(200).await, "Delivery must happen exactly once");
}
