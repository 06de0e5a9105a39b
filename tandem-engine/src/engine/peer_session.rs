use tandem_core::IceCandidate;
use tokio::sync::mpsc;

use crate::engine::SessionState;
use crate::engine::media_worker::MediaOp;
use crate::media::{LocalStream, MediaEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Transport exists but no offer has been sent or received yet.
    Undetermined,
    Caller,
    Callee,
}

/// The engine's end of a transport worker's queue.
pub(crate) struct TransportHandle {
    pub(crate) epoch: u64,
    pub(crate) ops: mpsc::UnboundedSender<MediaOp>,
}

/// Local state of the one call this engine manages.
pub(crate) struct PeerSession<M: MediaEngine> {
    pub(crate) role: Role,
    pub(crate) connected: bool,
    pub(crate) transport: Option<TransportHandle>,
    pub(crate) local_stream: LocalStream<M::Track>,
    pub(crate) released: bool,
    /// An offer has been requested and has not failed.
    pub(crate) offering: bool,
    /// A local description went out on the relay; candidates may follow it.
    pub(crate) description_sent: bool,
    pub(crate) pending_candidates: Vec<IceCandidate>,
}

impl<M: MediaEngine> PeerSession<M> {
    pub(crate) fn new(local_stream: LocalStream<M::Track>) -> Self {
        Self {
            role: Role::Undetermined,
            connected: false,
            transport: None,
            local_stream,
            released: false,
            offering: false,
            description_sent: false,
            pending_candidates: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> SessionState {
        match (&self.transport, self.connected) {
            (None, _) => SessionState::Idle,
            (Some(_), true) => SessionState::Connected,
            (Some(_), false) => SessionState::Negotiating(self.role),
        }
    }

    pub(crate) fn epoch(&self) -> Option<u64> {
        self.transport.as_ref().map(|t| t.epoch)
    }

    /// Forget the current transport and everything negotiated on it.
    pub(crate) fn reset(&mut self) {
        self.transport = None;
        self.role = Role::Undetermined;
        self.connected = false;
        self.offering = false;
        self.description_sent = false;
        self.pending_candidates.clear();
    }
}
