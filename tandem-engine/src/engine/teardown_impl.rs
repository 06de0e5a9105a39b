use tracing::{debug, info};

use crate::engine::NegotiationEngine;
use crate::media::MediaEngine;
use crate::relay_link::RelayLink;

impl<M: MediaEngine, L: RelayLink> NegotiationEngine<M, L> {
    /// Close the transport and relay link and release capture devices.
    /// Safe to call any number of times.
    pub(crate) fn teardown(&mut self) {
        if let Some(handle) = &self.session.transport {
            // the worker closes the transport once its queue is gone
            debug!("Releasing transport {}", handle.epoch);
        }
        self.session.reset();

        self.relay.close();

        if !self.session.released {
            self.session.local_stream.stop();
            self.session.released = true;
            info!("Session torn down");
        }

        self.remote_tx.send_replace(None);
        self.publish_state();
    }
}
