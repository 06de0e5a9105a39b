use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tandem_relay::{RelayConfig, SignalRelay, serve};
use tokio::net::TcpListener;

/// A relay served on an ephemeral loopback port.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub relay: SignalRelay,
}

impl TestRelay {
    pub async fn spawn() -> Self {
        Self::spawn_with(RelayConfig::default()).await
    }

    pub async fn spawn_with(config: RelayConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local addr");
        let relay = SignalRelay::new(&config);

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

    /// Poll until the relay holds exactly `count` connections.
    pub async fn wait_for_connections(&self, count: usize, timeout_ms: u64) -> bool {
        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        loop {
            if self.relay.connection_count() == count {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
