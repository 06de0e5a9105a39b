use crate::integration::init_tracing;
use crate::utils::{TestRelay, TestWsClient};

#[tokio::test]
async fn test_disconnect_removes_connection() {
    init_tracing();

    let server = TestRelay::spawn().await;

    let client1 = TestWsClient::connect(&server.url()).await.unwrap();
    let client2 = TestWsClient::connect(&server.url()).await.unwrap();
    assert!(server.wait_for_connections(2, 2000).await);

    client1.close().await.expect("Failed to close client 1");
    assert!(
        server.wait_for_connections(1, 2000).await,
        "Closed connection should leave the live set"
    );

    drop(client2);
    assert!(
        server.wait_for_connections(0, 2000).await,
        "Dropped connection should leave the live set"
    );
}
