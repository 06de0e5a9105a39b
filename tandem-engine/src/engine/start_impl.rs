use tandem_core::Error;
use tracing::{debug, error, info, warn};

use crate::engine::media_worker::{MediaOp, WorkerSetup, spawn_media_worker};
use crate::engine::peer_session::TransportHandle;
use crate::engine::{NegotiationEngine, Role};
use crate::media::MediaEngine;
use crate::relay_link::RelayLink;

impl<M: MediaEngine, L: RelayLink> NegotiationEngine<M, L> {
    pub(crate) fn start(&mut self, as_caller: bool) {
        if self.session.released {
            warn!("Session has been torn down, ignoring start");
            return;
        }

        if !self.relay.is_open() {
            error!(
                "Cannot start negotiation: {}",
                Error::TransportConnect("relay connection is closed".into())
            );
            return;
        }

        if self.session.transport.is_none() {
            self.open_transport();
        }

        if as_caller {
            self.begin_offer();
        }

        self.publish_state();
    }

    fn begin_offer(&mut self) {
        match self.session.role {
            Role::Callee => {
                debug!("Already answering a remote offer, not sending one");
                return;
            }
            Role::Caller if self.session.offering => {
                debug!("Offer already in progress");
                return;
            }
            Role::Caller | Role::Undetermined => {}
        }
        let Some(handle) = &self.session.transport else {
            return;
        };

        if handle.ops.send(MediaOp::CreateOffer).is_ok() {
            self.session.role = Role::Caller;
            self.session.offering = true;
            info!("Starting negotiation as caller");
        }
    }

    /// Hand a new transport to a worker. Creation and track attachment run
    /// there; calls queued meanwhile wait behind them.
    fn open_transport(&mut self) {
        self.epoch += 1;
        let epoch = self.epoch;

        let ops = spawn_media_worker(WorkerSetup {
            media: self.media.clone(),
            config: self.transport_config.clone(),
            local_stream: self.session.local_stream.clone(),
            epoch,
            events: self.event_tx.clone(),
        });
        self.session.transport = Some(TransportHandle { epoch, ops });

        debug!("Transport {} requested", epoch);
    }
}
