use tandem_core::SdpKind;
use tandem_engine::{Role, SessionState};
use tandem_engine::media::LocalTrack;

use crate::integration::{init_tracing, remote_offer};
use crate::utils::{Failure, MediaCall, MockMediaEngine, TestPeer, settle, wait_until};

#[tokio::test]
async fn test_rejected_answer_is_not_retried() {
    init_tracing();

    let media = MockMediaEngine::silent();
    media.fail(Failure::CreateAnswer);
    let peer = TestPeer::spawn(media);

    peer.deliver(&remote_offer("remote")).await;
    assert!(wait_until(|| peer.media.count(&MediaCall::CreateAnswer) == 1, 2000).await);
    settle().await;

    assert_eq!(peer.media.count(&MediaCall::CreateAnswer), 1);
    assert!(peer.link.sent().is_empty());
    assert_eq!(
        peer.handle.state(),
        SessionState::Negotiating(Role::Callee)
    );
}

#[tokio::test]
async fn test_rejected_offer_leaves_state_alone() {
    init_tracing();

    let media = MockMediaEngine::silent();
    media.fail(Failure::CreateOffer);
    let peer = TestPeer::spawn(media);

    peer.handle.start(true).await.unwrap();
    assert!(wait_until(|| peer.media.count(&MediaCall::CreateOffer) == 1, 2000).await);
    settle().await;

    assert!(peer.link.sent().is_empty());
    assert_eq!(
        peer.handle.state(),
        SessionState::Negotiating(Role::Caller)
    );
}

#[tokio::test]
async fn test_offer_retried_after_failure() {
    init_tracing();

    let media = MockMediaEngine::silent();
    media.fail(Failure::CreateOffer);
    let peer = TestPeer::spawn(media);

    peer.handle.start(true).await.unwrap();
    assert!(wait_until(|| peer.media.count(&MediaCall::CreateOffer) == 1, 2000).await);
    settle().await;

    peer.media.recover(Failure::CreateOffer);
    peer.handle.start(true).await.unwrap();
    assert!(wait_until(|| peer.media.count(&MediaCall::CreateOffer) == 2, 2000).await);
    assert!(wait_until(|| peer.sent_descriptions() == vec![SdpKind::Offer], 2000).await);

    // one transport serves both attempts
    assert_eq!(peer.media.count(&MediaCall::CreateTransport), 1);
}

#[tokio::test]
async fn test_rejected_remote_description_skips_answer() {
    init_tracing();

    let media = MockMediaEngine::silent();
    media.fail(Failure::SetRemote);
    let peer = TestPeer::spawn(media);

    peer.deliver(&remote_offer("remote")).await;
    assert!(wait_until(|| peer.media.calls().len() >= 4, 2000).await);
    settle().await;

    assert_eq!(peer.media.count(&MediaCall::CreateAnswer), 0);
    assert!(peer.link.sent().is_empty());
}

#[tokio::test]
async fn test_transport_refused_stays_idle() {
    init_tracing();

    let media = MockMediaEngine::silent();
    media.fail(Failure::CreateTransport);
    let peer = TestPeer::spawn(media);

    peer.handle.start(true).await.unwrap();
    assert!(wait_until(|| peer.media.count(&MediaCall::CreateTransport) == 1, 2000).await);
    settle().await;

    assert_eq!(peer.media.count(&MediaCall::CreateOffer), 0);
    assert_eq!(peer.handle.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_commands_served_while_transport_is_created() {
    init_tracing();

    let media = MockMediaEngine::silent();
    media.hold_transports();
    let peer = TestPeer::spawn(media);
    let audio = peer.tracks[0].clone();

    peer.handle.start(true).await.unwrap();
    assert!(wait_until(|| peer.media.count(&MediaCall::CreateTransport) == 1, 2000).await);
    assert!(
        peer.wait_for_state(SessionState::Negotiating(Role::Caller), 2000)
            .await
    );

    // the engine keeps serving commands while the transport is still pending
    peer.handle.mute_local_audio().await.unwrap();
    assert!(wait_until(|| !audio.is_enabled(), 2000).await);
    assert_eq!(peer.media.count(&MediaCall::CreateOffer), 0);
    assert!(peer.link.sent().is_empty());

    peer.media.open_gate();
    assert!(wait_until(|| peer.sent_descriptions() == vec![SdpKind::Offer], 2000).await);
    assert_eq!(peer.media.count(&MediaCall::AddTrack("mock-audio".into())), 1);
}
