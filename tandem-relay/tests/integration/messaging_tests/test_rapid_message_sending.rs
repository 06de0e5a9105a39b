use crate::integration::init_tracing;
use crate::utils::{TestRelay, TestWsClient};

#[tokio::test]
async fn test_rapid_message_sending() {
    init_tracing();

    let server = TestRelay::spawn().await;
    let mut alice = TestWsClient::connect(&server.url()).await.unwrap();
    let mut bob = TestWsClient::connect(&server.url()).await.unwrap();
    assert!(server.wait_for_connections(2, 2000).await);

    let count = 40;
    for i in 0..count {
        let msg = format!(r#"{{"ice":{{"candidate":"candidate:{}"}},"uuid":"A"}}"#, i);
        alice.send_text(&msg).await.unwrap();
    }

    for i in 0..count {
        let expected = format!(r#"{{"ice":{{"candidate":"candidate:{}"}},"uuid":"A"}}"#, i);
        assert_eq!(
            bob.recv_text().await.expect("Missing frame"),
            expected,
            "Frames from one sender must arrive in order"
        );
    }
}
