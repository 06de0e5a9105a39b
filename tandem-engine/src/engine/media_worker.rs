use std::fmt;
use std::sync::Arc;
use tandem_core::{IceCandidate, SdpKind, SessionDescription};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::engine::{EngineEvent, Tagged};
use crate::media::{LocalStream, MediaEngine, MediaError, MediaTransport, TransportEvent};

#[derive(Debug)]
pub(crate) enum MediaOp {
    CreateOffer,
    CreateAnswer,
    SetLocal(SessionDescription),
    SetRemote(SessionDescription),
    AddCandidate(IceCandidate),
}

/// The media call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MediaStep {
    CreateTransport,
    AttachTrack,
    CreateOffer,
    CreateAnswer,
    SetLocal(SdpKind),
    SetRemote(SdpKind),
    AddCandidate,
}

impl MediaStep {
    /// Whether the transport never became usable.
    pub(crate) fn is_setup(self) -> bool {
        matches!(self, MediaStep::CreateTransport | MediaStep::AttachTrack)
    }

    pub(crate) fn is_offer_path(self) -> bool {
        matches!(self, MediaStep::CreateOffer | MediaStep::SetLocal(SdpKind::Offer))
    }
}

impl fmt::Display for MediaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaStep::CreateTransport => write!(f, "create transport"),
            MediaStep::AttachTrack => write!(f, "attach local track"),
            MediaStep::CreateOffer => write!(f, "create offer"),
            MediaStep::CreateAnswer => write!(f, "create answer"),
            MediaStep::SetLocal(kind) => write!(f, "set local {}", kind),
            MediaStep::SetRemote(kind) => write!(f, "set remote {}", kind),
            MediaStep::AddCandidate => write!(f, "add remote candidate"),
        }
    }
}

/// Everything a worker needs to bring up one transport.
pub(crate) struct WorkerSetup<M: MediaEngine> {
    pub(crate) media: Arc<M>,
    pub(crate) config: TransportConfig,
    pub(crate) local_stream: LocalStream<M::Track>,
    pub(crate) epoch: u64,
    pub(crate) events: mpsc::UnboundedSender<Tagged<M::RemoteStream>>,
}

/// Spawn the task that owns one transport: create it, attach the local
/// tracks, then run queued calls in issue order and post each completion
/// back. Dropping the returned sender closes the transport.
pub(crate) fn spawn_media_worker<M: MediaEngine>(
    setup: WorkerSetup<M>,
) -> mpsc::UnboundedSender<MediaOp> {
    let (ops_tx, ops_rx) = mpsc::unbounded_channel::<MediaOp>();
    tokio::spawn(run_worker(setup, ops_rx));
    ops_tx
}

async fn run_worker<M: MediaEngine>(
    setup: WorkerSetup<M>,
    mut ops_rx: mpsc::UnboundedReceiver<MediaOp>,
) {
    let WorkerSetup {
        media,
        config,
        local_stream,
        epoch,
        events,
    } = setup;
    let post = |event| events.send(Tagged { epoch, event }).is_ok();

    let (transport_tx, mut transport_rx) = mpsc::unbounded_channel::<TransportEvent<_>>();
    let transport = match media.create_transport(&config, transport_tx).await {
        Ok(t) => t,
        Err(error) => {
            post(EngineEvent::OperationFailed {
                step: MediaStep::CreateTransport,
                error,
            });
            return;
        }
    };

    tokio::spawn({
        let events = events.clone();
        async move {
            while let Some(event) = transport_rx.recv().await {
                let tagged = Tagged {
                    epoch,
                    event: EngineEvent::Transport(event),
                };
                if events.send(tagged).is_err() {
                    break;
                }
            }
        }
    });

    for track in local_stream.tracks() {
        if let Err(error) = transport.add_track(track, local_stream.id()).await {
            post(EngineEvent::OperationFailed {
                step: MediaStep::AttachTrack,
                error,
            });
            close(transport.as_ref(), epoch).await;
            return;
        }
    }
    debug!("Transport {} ready", epoch);

    while let Some(op) = ops_rx.recv().await {
        let Some(event) = execute(transport.as_ref(), op).await else {
            continue;
        };
        if !post(event) {
            break;
        }
    }

    close(transport.as_ref(), epoch).await;
}

async fn close<T: MediaTransport>(transport: &T, epoch: u64) {
    match transport.close().await {
        Ok(()) => debug!("Transport {} closed", epoch),
        Err(e) => warn!("Failed to close transport {}: {}", epoch, e),
    }
}

async fn execute<T: MediaTransport>(
    transport: &T,
    op: MediaOp,
) -> Option<EngineEvent<T::RemoteStream>> {
    let failed = |step, error: MediaError| Some(EngineEvent::OperationFailed { step, error });

    match op {
        MediaOp::CreateOffer => match transport.create_offer().await {
            Ok(desc) => Some(EngineEvent::DescriptionCreated(desc)),
            Err(e) => failed(MediaStep::CreateOffer, e),
        },
        MediaOp::CreateAnswer => match transport.create_answer().await {
            Ok(desc) => Some(EngineEvent::DescriptionCreated(desc)),
            Err(e) => failed(MediaStep::CreateAnswer, e),
        },
        MediaOp::SetLocal(desc) => {
            let kind = desc.kind;
            match transport.set_local_description(desc.clone()).await {
                Ok(()) => Some(EngineEvent::LocalDescriptionApplied(desc)),
                Err(e) => failed(MediaStep::SetLocal(kind), e),
            }
        }
        MediaOp::SetRemote(desc) => {
            let kind = desc.kind;
            match transport.set_remote_description(desc).await {
                Ok(()) => Some(EngineEvent::RemoteDescriptionApplied(kind)),
                Err(e) => failed(MediaStep::SetRemote(kind), e),
            }
        }
        MediaOp::AddCandidate(candidate) => match transport.add_remote_candidate(candidate).await {
            Ok(()) => None,
            Err(e) => failed(MediaStep::AddCandidate, e),
        },
    }
}
