use tandem_core::{IceCandidate, SdpKind, SignalEnvelope};
use tracing::{debug, error, info, trace};

use crate::engine::media_worker::MediaOp;
use crate::engine::{EngineEvent, NegotiationEngine, Tagged};
use crate::media::{MediaEngine, TransportEvent, TransportState};
use crate::relay_link::RelayLink;

impl<M: MediaEngine, L: RelayLink> NegotiationEngine<M, L> {
    pub(crate) fn handle_event(&mut self, tagged: Tagged<M::RemoteStream>) {
        if self.session.epoch() != Some(tagged.epoch) {
            trace!("Dropping event from stale transport {}", tagged.epoch);
            return;
        }

        match tagged.event {
            EngineEvent::Transport(event) => self.handle_transport_event(event),

            EngineEvent::DescriptionCreated(desc) => {
                debug!("Local {} created", desc.kind);
                self.enqueue(MediaOp::SetLocal(desc));
            }

            EngineEvent::LocalDescriptionApplied(desc) => {
                info!("Sending {}", desc.kind);
                self.send_envelope(SignalEnvelope::description(self.local_id.clone(), desc));
                self.session.description_sent = true;

                let pending = std::mem::take(&mut self.session.pending_candidates);
                if !pending.is_empty() {
                    debug!("Sending {} held local candidates", pending.len());
                }
                for candidate in pending {
                    self.send_candidate(candidate);
                }
            }

            EngineEvent::RemoteDescriptionApplied(SdpKind::Offer) => {
                self.enqueue(MediaOp::CreateAnswer);
            }

            // an answer completes the exchange; answering it would ping-pong
            EngineEvent::RemoteDescriptionApplied(SdpKind::Answer) => {
                debug!("Remote answer applied");
            }

            EngineEvent::OperationFailed { step, error } => {
                error!("Failed to {}: {}", step, error.negotiation());

                if step.is_setup() {
                    self.session.reset();
                    self.publish_state();
                } else if step.is_offer_path() {
                    // a later start may offer again
                    self.session.offering = false;
                }
            }
        }
    }

    fn handle_transport_event(&mut self, event: TransportEvent<M::RemoteStream>) {
        match event {
            TransportEvent::LocalCandidate(Some(candidate)) => {
                if self.session.description_sent {
                    self.send_candidate(candidate);
                } else {
                    trace!("Holding local candidate until the description is sent");
                    self.session.pending_candidates.push(candidate);
                }
            }
            TransportEvent::LocalCandidate(None) => {
                debug!("Local candidate gathering complete");
            }
            TransportEvent::RemoteTrack(stream) => {
                info!("Remote track received");
                self.remote_tx.send_replace(Some(stream));
            }
            TransportEvent::StateChanged(TransportState::Connected) => {
                info!("Peer connection established");
                self.session.connected = true;
                self.publish_state();
            }
            TransportEvent::StateChanged(state) => {
                debug!("Transport state {:?}", state);
            }
        }
    }

    fn send_candidate(&self, candidate: IceCandidate) {
        self.send_envelope(SignalEnvelope::candidate(self.local_id.clone(), candidate));
    }

    fn enqueue(&self, op: MediaOp) {
        if let Some(handle) = &self.session.transport {
            let _ = handle.ops.send(op);
        }
    }
}
