use std::sync::Arc;
use std::time::{Duration, Instant};

use tandem_core::{ParticipantId, SdpKind, SignalPayload};
use tandem_engine::{EngineHandle, NegotiationEngine, SessionState, TransportConfig};
use tokio::sync::mpsc;

use crate::utils::{MemoryHub, MockMediaEngine, MockRelayLink, MockRemoteStream, MockTrack};

/// One negotiation engine running against mock media and a mock relay link.
pub struct TestPeer {
    pub id: ParticipantId,
    pub handle: EngineHandle<MockRemoteStream>,
    pub media: MockMediaEngine,
    pub link: MockRelayLink,
    pub tracks: Vec<MockTrack>,
    /// Injects frames as if the relay delivered them. `None` for hub peers.
    pub inbound: Option<mpsc::Sender<String>>,
}

impl TestPeer {
    pub fn spawn(media: MockMediaEngine) -> Self {
        let (link, inbound_tx, inbound_rx) = MockRelayLink::detached();
        let mut peer = Self::spawn_with(media, link, inbound_rx);
        peer.inbound = Some(inbound_tx);
        peer
    }

    pub fn join(hub: &MemoryHub, media: MockMediaEngine) -> Self {
        let (link, inbound_rx) = hub.join();
        Self::spawn_with(media, link, inbound_rx)
    }

    fn spawn_with(
        media: MockMediaEngine,
        link: MockRelayLink,
        inbound_rx: mpsc::Receiver<String>,
    ) -> Self {
        let id = ParticipantId::new();
        let stream = media.stream(true, true);
        let tracks = stream.tracks().to_vec();

        let (engine, handle) = NegotiationEngine::new(
            id.clone(),
            Arc::new(media.clone()),
            stream,
            link.clone(),
            inbound_rx,
            TransportConfig::default(),
        );
        tokio::spawn(engine.run());

        Self {
            id,
            handle,
            media,
            link,
            tracks,
            inbound: None,
        }
    }

    pub async fn deliver(&self, text: &str) {
        self.inbound
            .as_ref()
            .expect("peer is attached to a hub")
            .send(text.to_owned())
            .await
            .unwrap();
    }

    pub fn sent_descriptions(&self) -> Vec<SdpKind> {
        self.link
            .sent_envelopes()
            .into_iter()
            .filter_map(|env| match env.payload {
                SignalPayload::SessionDescription(desc) => Some(desc.kind),
                SignalPayload::IceCandidate(_) => None,
            })
            .collect()
    }

    pub fn sent_candidates(&self) -> usize {
        self.link
            .sent_envelopes()
            .iter()
            .filter(|env| matches!(env.payload, SignalPayload::IceCandidate(_)))
            .count()
    }

    pub async fn wait_for_state(&self, state: SessionState, timeout_ms: u64) -> bool {
        wait_for_state(&self.handle, state, timeout_ms).await
    }
}

/// Wait until the engine behind `handle` publishes `state`.
pub async fn wait_for_state<S: Clone>(
    handle: &EngineHandle<S>,
    state: SessionState,
    timeout_ms: u64,
) -> bool {
    let mut states = handle.states();
    let reached = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        states.wait_for(|s| *s == state),
    )
    .await;
    matches!(reached, Ok(Ok(_)))
}

/// Poll `cond` every 10ms until it holds or `timeout_ms` passes.
pub async fn wait_until<F: Fn() -> bool>(cond: F, timeout_ms: u64) -> bool {
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    loop {
        if cond() {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Give the engine loop time to drain whatever is queued.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
