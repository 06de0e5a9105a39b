use tandem_core::{SignalEnvelope, SignalPayload};
use tracing::{debug, info, trace, warn};

use crate::engine::media_worker::MediaOp;
use crate::engine::{NegotiationEngine, Role};
use crate::media::MediaEngine;
use crate::relay_link::RelayLink;

impl<M: MediaEngine, L: RelayLink> NegotiationEngine<M, L> {
    pub(crate) fn handle_signal(&mut self, text: String) {
        let env = match SignalEnvelope::decode(&text) {
            Ok(env) => env,
            Err(e) => {
                warn!("Dropping relay message: {}", e);
                return;
            }
        };

        // the relay echoes everything back to its sender
        if env.is_from(&self.local_id) {
            trace!("Ignoring own envelope");
            return;
        }

        if self.session.released {
            debug!("Session torn down, ignoring envelope from {}", env.sender);
            return;
        }

        if self.session.transport.is_none() {
            info!("Envelope from {} before start, joining as callee", env.sender);
            self.start(false);
        }

        let Some(handle) = &self.session.transport else {
            return;
        };

        match env.payload {
            SignalPayload::SessionDescription(desc) => {
                debug!("Remote {} from {}", desc.kind, env.sender);
                let is_offer = desc.is_offer();
                let _ = handle.ops.send(MediaOp::SetRemote(desc));

                if is_offer && self.session.role == Role::Undetermined {
                    self.session.role = Role::Callee;
                    self.publish_state();
                }
            }
            SignalPayload::IceCandidate(candidate) => {
                trace!("Remote candidate from {}", env.sender);
                let _ = handle.ops.send(MediaOp::AddCandidate(candidate));
            }
        }
    }
}
