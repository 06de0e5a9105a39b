use tandem_core::{Error, ParticipantId};
use tokio::sync::{mpsc, watch};

use crate::engine::{EngineCommand, SessionState};

/// Cloneable front for a running [`NegotiationEngine`](crate::NegotiationEngine).
///
/// The engine shuts itself down once every handle is dropped.
#[derive(Debug)]
pub struct EngineHandle<S> {
    local_id: ParticipantId,
    command_tx: mpsc::Sender<EngineCommand>,
    state_rx: watch::Receiver<SessionState>,
    remote_rx: watch::Receiver<Option<S>>,
}

impl<S> Clone for EngineHandle<S> {
    fn clone(&self) -> Self {
        Self {
            local_id: self.local_id.clone(),
            command_tx: self.command_tx.clone(),
            state_rx: self.state_rx.clone(),
            remote_rx: self.remote_rx.clone(),
        }
    }
}

impl<S: Clone> EngineHandle<S> {
    pub(crate) fn new(
        local_id: ParticipantId,
        command_tx: mpsc::Sender<EngineCommand>,
        state_rx: watch::Receiver<SessionState>,
        remote_rx: watch::Receiver<Option<S>>,
    ) -> Self {
        Self {
            local_id,
            command_tx,
            state_rx,
            remote_rx,
        }
    }

    pub fn local_id(&self) -> &ParticipantId {
        &self.local_id
    }

    pub async fn start(&self, as_caller: bool) -> Result<(), Error> {
        self.send(EngineCommand::Start { as_caller }).await
    }

    pub async fn mute_local_audio(&self) -> Result<(), Error> {
        self.send(EngineCommand::MuteLocalAudio).await
    }

    pub async fn mute_local_video(&self) -> Result<(), Error> {
        self.send(EngineCommand::MuteLocalVideo).await
    }

    pub async fn teardown(&self) -> Result<(), Error> {
        self.send(EngineCommand::Teardown).await
    }

    pub async fn send(&self, cmd: EngineCommand) -> Result<(), Error> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| Error::EngineStopped)
    }

    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    /// Receiver that wakes on every session state change.
    pub fn states(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Subscription point for the remote peer's media.
    pub fn remote_stream(&self) -> watch::Receiver<Option<S>> {
        self.remote_rx.clone()
    }
}
