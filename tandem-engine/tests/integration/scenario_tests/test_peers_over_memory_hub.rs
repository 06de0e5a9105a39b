use tandem_core::SdpKind;
use tandem_engine::SessionState;

use crate::integration::init_tracing;
use crate::utils::{MediaCall, MemoryHub, MockMediaEngine, MockRemoteStream, TestPeer, settle};

#[tokio::test]
async fn test_caller_and_callee_reach_connected() {
    init_tracing();

    let hub = MemoryHub::new();
    let a = TestPeer::join(&hub, MockMediaEngine::new());
    let b = TestPeer::join(&hub, MockMediaEngine::new());

    a.handle.start(true).await.unwrap();

    assert!(a.wait_for_state(SessionState::Connected, 3000).await, "A never connected");
    assert!(b.wait_for_state(SessionState::Connected, 3000).await, "B never connected");
    settle().await;

    assert_eq!(a.sent_descriptions(), vec![SdpKind::Offer]);
    assert_eq!(b.sent_descriptions(), vec![SdpKind::Answer]);
    assert_eq!(a.media.count(&MediaCall::CreateAnswer), 0);
    assert_eq!(b.media.count(&MediaCall::CreateOffer), 0);

    // each side applied exactly the other's candidate
    assert_eq!(a.media.count(&MediaCall::AddCandidate), 1);
    assert_eq!(b.media.count(&MediaCall::AddCandidate), 1);

    assert_eq!(
        *a.handle.remote_stream().borrow(),
        Some(MockRemoteStream { transport: 0 })
    );
    assert!(b.handle.remote_stream().borrow().is_some());
}

#[tokio::test]
async fn test_connected_peer_teardown_clears_remote() {
    init_tracing();

    let hub = MemoryHub::new();
    let a = TestPeer::join(&hub, MockMediaEngine::new());
    let b = TestPeer::join(&hub, MockMediaEngine::new());

    a.handle.start(true).await.unwrap();
    assert!(a.wait_for_state(SessionState::Connected, 3000).await);
    assert!(b.wait_for_state(SessionState::Connected, 3000).await);

    a.handle.teardown().await.unwrap();
    assert!(a.wait_for_state(SessionState::Idle, 2000).await);
    assert!(a.handle.remote_stream().borrow().is_none());
    assert_eq!(b.handle.state(), SessionState::Connected);
}
