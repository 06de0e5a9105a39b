//! [`MediaEngine`] backed by the `webrtc` crate.

mod rtc_track;
mod rtc_transport;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};

use crate::config::{MediaConstraints, TransportConfig};
use crate::media::{LocalStream, MediaEngine, MediaError, TrackKind, TransportEventSender};

pub use rtc_track::{RtcLocalTrack, RtcRemoteTrack};
pub use rtc_transport::RtcTransport;

/// Native media engine. Local "capture" yields sample tracks that the
/// application feeds with encoded frames (Opus audio, VP8 video).
#[derive(Debug, Default, Clone)]
pub struct RtcMediaEngine;

impl RtcMediaEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaEngine for RtcMediaEngine {
    type Track = RtcLocalTrack;
    type RemoteStream = RtcRemoteTrack;
    type Transport = RtcTransport;

    async fn acquire_local_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalStream<RtcLocalTrack>, MediaError> {
        if !constraints.audio && !constraints.video {
            return Err(MediaError::Unavailable(
                "neither audio nor video requested".into(),
            ));
        }

        let stream_id = format!("tandem-{}", Uuid::new_v4());
        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(RtcLocalTrack::new(TrackKind::Audio, MIME_TYPE_OPUS, &stream_id));
        }
        if constraints.video {
            tracks.push(RtcLocalTrack::new(TrackKind::Video, MIME_TYPE_VP8, &stream_id));
        }

        info!("Acquired local stream {} ({} tracks)", stream_id, tracks.len());
        Ok(LocalStream::new(stream_id, tracks))
    }

    async fn create_transport(
        &self,
        config: &TransportConfig,
        events: TransportEventSender<RtcRemoteTrack>,
    ) -> Result<Arc<RtcTransport>, MediaError> {
        Ok(Arc::new(RtcTransport::new(config, events).await?))
    }
}
