use tandem_engine::SessionState;

use crate::integration::{init_tracing, remote_candidate, remote_offer};
use crate::utils::{MockMediaEngine, TestPeer, settle};

#[tokio::test]
async fn test_own_offer_echo_touches_nothing() {
    init_tracing();

    let peer = TestPeer::spawn(MockMediaEngine::silent());
    let own = peer.id.to_string();

    peer.deliver(&remote_offer(&own)).await;
    peer.deliver(&remote_candidate(&own)).await;
    settle().await;

    assert!(peer.media.calls().is_empty(), "Echo must not reach the media layer");
    assert!(peer.link.sent().is_empty());
    assert_eq!(peer.handle.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_echo_of_sent_offer_is_not_answered() {
    init_tracing();

    let peer = TestPeer::spawn(MockMediaEngine::silent());
    peer.handle.start(true).await.unwrap();
    assert!(
        crate::utils::wait_until(|| peer.link.sent().len() == 1, 2000).await,
        "Offer was never sent"
    );

    // the relay hands the offer straight back
    let echoed = peer.link.sent()[0].clone();
    peer.deliver(&echoed).await;
    settle().await;

    assert_eq!(peer.media.count(&crate::utils::MediaCall::CreateAnswer), 0);
    assert_eq!(peer.sent_descriptions().len(), 1);
}
