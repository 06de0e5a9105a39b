use std::net::SocketAddr;

use tandem_relay::{RelayConfig, SignalRelay, serve};
use tokio::net::TcpListener;

use crate::utils::wait_until;

/// A real relay on an ephemeral loopback port.
pub struct LocalRelay {
    pub addr: SocketAddr,
    pub relay: SignalRelay,
}

impl LocalRelay {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local addr");
        let relay = SignalRelay::new(&RelayConfig::default());

        tokio::spawn({
            let relay = relay.clone();
            async move {
                let _ = serve(listener, relay).await;
            }
        });

        Self { addr, relay }
    }

    pub fn url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    pub async fn wait_for_connections(&self, count: usize, timeout_ms: u64) -> bool {
        wait_until(|| self.relay.connection_count() == count, timeout_ms).await
    }
}
