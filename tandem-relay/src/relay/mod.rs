mod relay_error;
mod signal_relay;

pub use relay_error::RelayError;
pub use signal_relay::{ConnectionId, SignalRelay};
