mod config;
mod engine;
pub mod media;
mod relay_link;
mod session;

pub use config::{EngineConfig, MediaConstraints, TransportConfig};
pub use engine::{EngineCommand, EngineHandle, NegotiationEngine, Role, SessionState};
pub use relay_link::{RelayLink, WsRelayLink};
pub use session::open_session;
