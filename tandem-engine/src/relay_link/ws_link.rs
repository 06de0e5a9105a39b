use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tandem_core::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::relay_link::RelayLink;

const INBOUND_BUFFER: usize = 256;

/// WebSocket connection to a signaling relay.
pub struct WsRelayLink {
    outbound: mpsc::UnboundedSender<Message>,
    open: Arc<AtomicBool>,
}

impl WsRelayLink {
    /// Connect to `url` and return the link plus the stream of inbound text
    /// frames. The receiver closes when the relay connection ends.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::Receiver<String>), Error> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| Error::TransportConnect(format!("{}: {}", url, e)))?;
        info!("Connected to relay {}", url);

        let (mut write, mut read) = stream.split();
        let open = Arc::new(AtomicBool::new(true));
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_BUFFER);

        tokio::spawn({
            let open = open.clone();
            async move {
                while let Some(msg) = outbound_rx.recv().await {
                    let closing = matches!(msg, Message::Close(_));
                    if write.send(msg).await.is_err() || closing {
                        break;
                    }
                }
                open.store(false, Ordering::SeqCst);
            }
        });

        tokio::spawn({
            let open = open.clone();
            async move {
                while let Some(frame) = read.next().await {
                    let text = match frame {
                        Ok(Message::Text(text)) => text.as_str().to_owned(),
                        Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                            Ok(text) => text,
                            Err(_) => {
                                warn!("Dropping non UTF-8 binary frame from relay");
                                continue;
                            }
                        },
                        Ok(Message::Close(_)) => break,
                        Ok(_) => continue,
                        Err(e) => {
                            warn!("Relay connection error: {}", e);
                            break;
                        }
                    };
                    if inbound_tx.send(text).await.is_err() {
                        break;
                    }
                }
                open.store(false, Ordering::SeqCst);
                debug!("Relay reader finished");
            }
        });

        Ok((Self { outbound, open }, inbound_rx))
    }
}

impl RelayLink for WsRelayLink {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn send(&self, text: String) -> Result<(), Error> {
        if !self.is_open() {
            return Err(Error::TransportConnect("relay connection is closed".into()));
        }
        self.outbound
            .send(Message::text(text))
            .map_err(|_| Error::TransportConnect("relay writer has stopped".into()))
    }

    fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            let _ = self.outbound.send(Message::Close(None));
        }
    }
}
