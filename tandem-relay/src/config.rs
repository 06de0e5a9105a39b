use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tandem_core::utils::DEFAULT_RELAY_PORT;

pub const DEFAULT_MAX_CONNECTIONS: usize = 16;
pub const DEFAULT_CONNECTION_BUFFER: usize = 64;

/// Relay settings, read from the command line with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "tandem-relay", about = "Broadcast relay for tandem call signaling")]
pub struct RelayConfig {
    #[arg(long, env = "TANDEM_RELAY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[arg(short, long, env = "TANDEM_RELAY_PORT", default_value_t = DEFAULT_RELAY_PORT)]
    pub port: u16,

    /// Connections beyond this are closed with code 1013.
    #[arg(long, env = "TANDEM_RELAY_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,

    /// Frames queued per connection before new ones are dropped for it.
    #[arg(long, env = "TANDEM_RELAY_CONNECTION_BUFFER", default_value_t = DEFAULT_CONNECTION_BUFFER)]
    pub connection_buffer: usize,
}

impl RelayConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_RELAY_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_buffer: DEFAULT_CONNECTION_BUFFER,
        }
    }
}
