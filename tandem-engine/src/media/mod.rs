//! The media capability the negotiation engine drives.
//!
//! Capture, codecs and ICE transport live behind these traits; the engine
//! only calls them and reacts to the events they post.

mod local_stream;
mod media_error;
pub mod rtc;

use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;

use crate::config::{MediaConstraints, TransportConfig};

pub use local_stream::LocalStream;
pub use media_error::MediaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

/// A captured local track.
pub trait LocalTrack: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    fn kind(&self) -> TrackKind;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&self, enabled: bool);

    /// Release the underlying capture device. Must be idempotent.
    fn stop(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Events a transport raises on its own.
#[derive(Debug)]
pub enum TransportEvent<S> {
    /// A local network path was found. `None` marks the end of gathering.
    LocalCandidate(Option<IceCandidate>),
    RemoteTrack(S),
    StateChanged(TransportState),
}

pub type TransportEventSender<S> = mpsc::UnboundedSender<TransportEvent<S>>;

/// One peer-to-peer media transport (a peer connection).
#[async_trait]
pub trait MediaTransport: Send + Sync + 'static {
    type Track: LocalTrack;
    type RemoteStream: Clone + Send + Sync + 'static;

    async fn add_track(&self, track: &Self::Track, stream_id: &str) -> Result<(), MediaError>;

    async fn create_offer(&self) -> Result<SessionDescription, MediaError>;

    async fn create_answer(&self) -> Result<SessionDescription, MediaError>;

    async fn set_local_description(&self, description: SessionDescription) -> Result<(), MediaError>;

    async fn set_remote_description(&self, description: SessionDescription)
    -> Result<(), MediaError>;

    /// Candidates may arrive before the remote description is applied;
    /// implementations buffer them if their stack requires it.
    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<(), MediaError>;

    async fn close(&self) -> Result<(), MediaError>;
}

#[async_trait]
pub trait MediaEngine: Send + Sync + 'static {
    type Track: LocalTrack;
    type RemoteStream: Clone + Send + Sync + 'static;
    type Transport: MediaTransport<Track = Self::Track, RemoteStream = Self::RemoteStream>;

    async fn acquire_local_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalStream<Self::Track>, MediaError>;

    /// Build a transport that reports its events on `events`.
    async fn create_transport(
        &self,
        config: &TransportConfig,
        events: TransportEventSender<Self::RemoteStream>,
    ) -> Result<Arc<Self::Transport>, MediaError>;
}
