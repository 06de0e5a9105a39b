use tandem_core::IceServerConfig;
use tandem_core::utils::DEFAULT_RELAY_PORT;

/// Settings handed to the media engine when a transport is created.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: IceServerConfig::defaults(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub relay_url: String,
    pub transport: TransportConfig,
    pub constraints: MediaConstraints,
    /// Send an offer as soon as the session is open.
    pub auto_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            relay_url: format!("ws://localhost:{}", DEFAULT_RELAY_PORT),
            transport: TransportConfig::default(),
            constraints: MediaConstraints::default(),
            auto_start: false,
        }
    }
}
