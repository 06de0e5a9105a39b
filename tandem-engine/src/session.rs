use std::sync::Arc;
use tandem_core::{Error, ParticipantId};
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::engine::{EngineHandle, NegotiationEngine};
use crate::media::MediaEngine;
use crate::relay_link::WsRelayLink;

/// Acquire local media, connect to the relay and spawn a negotiation engine.
///
/// Fails with [`Error::MediaAcquisition`] when capture is refused and with
/// [`Error::TransportConnect`] when the relay cannot be reached; in the latter
/// case the captured devices are released again before returning.
pub async fn open_session<M: MediaEngine>(
    config: EngineConfig,
    media: Arc<M>,
) -> Result<EngineHandle<M::RemoteStream>, Error> {
    let local_stream = media
        .acquire_local_media(&config.constraints)
        .await
        .map_err(|e| e.acquisition())?;

    let (link, inbound) = match WsRelayLink::connect(&config.relay_url).await {
        Ok(pair) => pair,
        Err(e) => {
            error!("Could not reach relay: {}", e);
            local_stream.stop();
            return Err(e);
        }
    };

    let local_id = ParticipantId::new();
    info!("Opening session as {}", local_id);

    let (engine, handle) = NegotiationEngine::new(
        local_id,
        media,
        local_stream,
        link,
        inbound,
        config.transport,
    );
    tokio::spawn(engine.run());

    if config.auto_start {
        handle.start(true).await?;
    }

    Ok(handle)
}
