mod config;
mod relay;
mod signaling;

pub use config::RelayConfig;
pub use relay::*;
pub use signaling::*;
