use crate::config::RelayConfig;
use crate::relay::RelayError;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Process-local key of a live connection. Carries no identity.
pub type ConnectionId = u64;

struct RelayInner {
    connections: DashMap<ConnectionId, mpsc::Sender<Message>>,
    live: AtomicUsize,
    next_id: AtomicU64,
    max_connections: usize,
    connection_buffer: usize,
}

/// Byte-level broadcast hub.
///
/// Every frame received from any connection is queued, unmodified, to every
/// live connection including the one it came from. The relay never looks
/// inside a frame.
#[derive(Clone)]
pub struct SignalRelay {
    inner: Arc<RelayInner>,
}

impl SignalRelay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                connections: DashMap::new(),
                live: AtomicUsize::new(0),
                next_id: AtomicU64::new(1),
                max_connections: config.max_connections,
                connection_buffer: config.connection_buffer.max(1),
            }),
        }
    }

    /// Register a new connection and hand back the queue its writer drains.
    pub fn accept(&self) -> Result<(ConnectionId, mpsc::Receiver<Message>), RelayError> {
        let max = self.inner.max_connections;
        self.inner
            .live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < max).then_some(n + 1)
            })
            .map_err(|_| RelayError::AtCapacity { max })?;

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.inner.connection_buffer);
        self.inner.connections.insert(id, tx);

        info!(
            "Connection {} accepted ({} live)",
            id,
            self.connection_count()
        );
        Ok((id, rx))
    }

    pub fn remove(&self, id: ConnectionId) {
        if self.inner.connections.remove(&id).is_some() {
            self.inner.live.fetch_sub(1, Ordering::SeqCst);
            info!(
                "Connection {} removed ({} live)",
                id,
                self.connection_count()
            );
        }
    }

    pub fn on_message(&self, from: ConnectionId, msg: Message) -> usize {
        debug!("Received {} bytes from connection {}", frame_len(&msg), from);
        self.broadcast(msg)
    }

    /// Queue `msg` to every live connection. Returns how many accepted it.
    ///
    /// A receiver whose queue is full loses this frame; a receiver whose
    /// writer is gone is dropped from the set. Neither stalls the others.
    pub fn broadcast(&self, msg: Message) -> usize {
        let targets: Vec<(ConnectionId, mpsc::Sender<Message>)> = self
            .inner
            .connections
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (id, tx) in targets {
            match tx.try_send(msg.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("Outbound queue full for connection {}, dropping frame", id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    self.remove(id);
                }
            }
        }
        delivered
    }

    pub fn connection_count(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.inner.connections.contains_key(&id)
    }
}

fn frame_len(msg: &Message) -> usize {
    match msg {
        Message::Text(text) => text.len(),
        Message::Binary(bytes) => bytes.len(),
        _ => 0,
    }
}
