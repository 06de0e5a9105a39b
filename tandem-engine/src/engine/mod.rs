use std::sync::Arc;
use tandem_core::{ParticipantId, SdpKind, SessionDescription, SignalEnvelope};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::config::TransportConfig;
use crate::media::{LocalStream, MediaEngine, MediaError, TrackKind, TransportEvent};
use crate::relay_link::RelayLink;

mod engine_handle;
mod handle_event_impl;
mod handle_signal_impl;
mod media_worker;
mod peer_session;
mod start_impl;
mod teardown_impl;

pub use engine_handle::EngineHandle;
pub use peer_session::Role;

use media_worker::MediaStep;
use peer_session::PeerSession;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Negotiating(Role),
    Connected,
}

/// Requests from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Start { as_caller: bool },
    MuteLocalAudio,
    MuteLocalVideo,
    Teardown,
}

/// Everything that comes back into the loop from the media side, tagged with
/// the transport generation it belongs to.
pub(crate) struct Tagged<S> {
    epoch: u64,
    event: EngineEvent<S>,
}

pub(crate) enum EngineEvent<S> {
    Transport(TransportEvent<S>),
    DescriptionCreated(SessionDescription),
    LocalDescriptionApplied(SessionDescription),
    RemoteDescriptionApplied(SdpKind),
    OperationFailed {
        step: MediaStep,
        error: MediaError,
    },
}

/// Client-side offer/answer/ICE state machine.
///
/// Runs as a single-owner loop: commands, relay messages and media
/// completions are all handled one at a time in [`NegotiationEngine::run`].
/// Calls into the media engine, transport creation included, are queued to
/// a worker and never awaited by the loop, so relay traffic keeps flowing
/// while a description is computed.
pub struct NegotiationEngine<M: MediaEngine, L: RelayLink> {
    local_id: ParticipantId,
    media: Arc<M>,
    relay: L,
    transport_config: TransportConfig,
    session: PeerSession<M>,
    epoch: u64,
    command_rx: mpsc::Receiver<EngineCommand>,
    inbound_rx: mpsc::Receiver<String>,
    inbound_open: bool,
    event_tx: mpsc::UnboundedSender<Tagged<M::RemoteStream>>,
    event_rx: mpsc::UnboundedReceiver<Tagged<M::RemoteStream>>,
    state_tx: watch::Sender<SessionState>,
    remote_tx: watch::Sender<Option<M::RemoteStream>>,
}

impl<M: MediaEngine, L: RelayLink> NegotiationEngine<M, L> {
    pub fn new(
        local_id: ParticipantId,
        media: Arc<M>,
        local_stream: LocalStream<M::Track>,
        relay: L,
        inbound_rx: mpsc::Receiver<String>,
        transport_config: TransportConfig,
    ) -> (Self, EngineHandle<M::RemoteStream>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let (remote_tx, remote_rx) = watch::channel(None);

        let handle = EngineHandle::new(local_id.clone(), command_tx, state_rx, remote_rx);

        let engine = Self {
            local_id,
            media,
            relay,
            transport_config,
            session: PeerSession::new(local_stream),
            epoch: 0,
            command_rx,
            inbound_rx,
            inbound_open: true,
            event_tx,
            event_rx,
            state_tx,
            remote_tx,
        };

        (engine, handle)
    }

    pub fn local_id(&self) -> &ParticipantId {
        &self.local_id
    }

    /// Drive the engine until every [`EngineHandle`] is dropped, then tear
    /// the session down.
    pub async fn run(mut self) {
        info!("Negotiation engine {} started", self.local_id);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c),
                        None => {
                            info!("Command channel closed. Shutting down engine.");
                            break;
                        }
                    }
                }

                text = self.inbound_rx.recv(), if self.inbound_open => {
                    match text {
                        Some(t) => self.handle_signal(t),
                        None => {
                            warn!("Relay connection closed");
                            self.inbound_open = false;
                        }
                    }
                }

                Some(tagged) = self.event_rx.recv() => {
                    self.handle_event(tagged);
                }
            }
        }

        self.teardown();
        info!("Negotiation engine {} finished", self.local_id);
    }

    fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Start { as_caller } => self.start(as_caller),
            EngineCommand::MuteLocalAudio => self.toggle_local(TrackKind::Audio),
            EngineCommand::MuteLocalVideo => self.toggle_local(TrackKind::Video),
            EngineCommand::Teardown => self.teardown(),
        }
    }

    fn toggle_local(&self, kind: TrackKind) {
        match self.session.local_stream.toggle(kind) {
            Some(true) => info!("Local {:?} track enabled", kind),
            Some(false) => info!("Local {:?} track muted", kind),
            None => debug!("No local {:?} track to toggle", kind),
        }
    }

    fn publish_state(&self) {
        let next = self.session.state();
        self.state_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            debug!("Session state {:?} -> {:?}", current, next);
            *current = next;
            true
        });
    }

    fn send_envelope(&self, env: SignalEnvelope) {
        if !self.relay.is_open() {
            warn!("Relay connection is closed, dropping outgoing envelope");
            return;
        }

        match env.encode() {
            Ok(json) => {
                if let Err(e) = self.relay.send(json) {
                    error!("Failed to send envelope: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize envelope: {}", e),
        }
    }
}
