use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{IceCandidate, SdpKind, SessionDescription};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine as CodecRegistry;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

use crate::config::TransportConfig;
use crate::media::rtc::{RtcLocalTrack, RtcRemoteTrack};
use crate::media::{
    LocalTrack, MediaError, MediaTransport, TransportEvent, TransportEventSender, TransportState,
};

pub struct RtcTransport {
    peer_connection: Arc<RTCPeerConnection>,
    // remote candidates that arrived before the remote description
    pending_candidates: Mutex<Vec<RTCIceCandidateInit>>,
}

impl RtcTransport {
    /// Build a peer connection whose callbacks report into `events`.
    pub async fn new(
        config: &TransportConfig,
        events: TransportEventSender<RtcRemoteTrack>,
    ) -> Result<Self, MediaError> {
        let mut codecs = CodecRegistry::default();
        codecs.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut codecs)?;

        let api = APIBuilder::new()
            .with_media_engine(codecs)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    if let Some(state) = map_state(s) {
                        let _ = tx.send(TransportEvent::StateChanged(state));
                    }
                })
            },
        ));

        let ice_tx = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else {
                    let _ = tx.send(TransportEvent::LocalCandidate(None));
                    return;
                };
                let Ok(init) = candidate.to_json() else {
                    warn!("Failed to serialize local ICE candidate");
                    return;
                };
                let Ok(value) = serde_json::to_value(&init) else {
                    return;
                };
                let _ = tx.send(TransportEvent::LocalCandidate(Some(IceCandidate::new(value))));
            })
        }));

        let track_tx = events;
        peer_connection.on_track(Box::new(move |track: Arc<TrackRemote>, _, _| {
            let tx = track_tx.clone();

            Box::pin(async move {
                let remote = RtcRemoteTrack::new(track);
                debug!("Remote track {} on stream {}", remote.track_id, remote.stream_id);
                let _ = tx.send(TransportEvent::RemoteTrack(remote));
            })
        }));

        Ok(Self {
            peer_connection,
            pending_candidates: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl MediaTransport for RtcTransport {
    type Track = RtcLocalTrack;
    type RemoteStream = RtcRemoteTrack;

    async fn add_track(&self, track: &RtcLocalTrack, stream_id: &str) -> Result<(), MediaError> {
        let sender = self
            .peer_connection
            .add_track(track.sample_track() as Arc<dyn TrackLocal + Send + Sync>)
            .await?;
        debug!("Attached local track {} of stream {}", track.id(), stream_id);

        // RTCP has to be drained for interceptors to work
        tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            while sender.read(&mut buf).await.is_ok() {}
        });
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, MediaError> {
        let offer = self.peer_connection.create_offer(None).await?;
        to_description(offer)
    }

    async fn create_answer(&self) -> Result<SessionDescription, MediaError> {
        let answer = self.peer_connection.create_answer(None).await?;
        to_description(answer)
    }

    async fn set_local_description(&self, description: SessionDescription) -> Result<(), MediaError> {
        self.peer_connection
            .set_local_description(to_rtc(description)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), MediaError> {
        self.peer_connection
            .set_remote_description(to_rtc(description)?)
            .await?;

        let pending: Vec<_> = self.pending_candidates.lock().await.drain(..).collect();
        if !pending.is_empty() {
            debug!("Applying {} buffered remote candidates", pending.len());
        }
        for init in pending {
            if let Err(e) = self.peer_connection.add_ice_candidate(init).await {
                warn!("Dropping buffered remote candidate: {}", e);
            }
        }
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<(), MediaError> {
        let init: RTCIceCandidateInit = serde_json::from_value(candidate.into_value())
            .map_err(|e| MediaError::InvalidCandidate(e.to_string()))?;

        if self.peer_connection.remote_description().await.is_none() {
            self.pending_candidates.lock().await.push(init);
            return Ok(());
        }
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), MediaError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

fn to_description(desc: RTCSessionDescription) -> Result<SessionDescription, MediaError> {
    let kind = match desc.sdp_type {
        RTCSdpType::Offer => SdpKind::Offer,
        RTCSdpType::Answer => SdpKind::Answer,
        other => {
            return Err(MediaError::InvalidState(format!(
                "unsupported description type {}",
                other
            )));
        }
    };
    Ok(SessionDescription::new(kind, desc.sdp))
}

fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, MediaError> {
    let rtc = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
    };
    Ok(rtc)
}

fn map_state(state: RTCPeerConnectionState) -> Option<TransportState> {
    match state {
        RTCPeerConnectionState::New => Some(TransportState::New),
        RTCPeerConnectionState::Connecting => Some(TransportState::Connecting),
        RTCPeerConnectionState::Connected => Some(TransportState::Connected),
        RTCPeerConnectionState::Disconnected => Some(TransportState::Disconnected),
        RTCPeerConnectionState::Failed => Some(TransportState::Failed),
        RTCPeerConnectionState::Closed => Some(TransportState::Closed),
        _ => None,
    }
}
