mod ws_link;

use tandem_core::Error;

pub use ws_link::WsRelayLink;

/// Outbound half of the engine's relay connection.
///
/// Inbound messages reach the engine separately, as a channel of text frames.
pub trait RelayLink: Send + Sync + 'static {
    fn is_open(&self) -> bool;

    fn send(&self, text: String) -> Result<(), Error>;

    /// Close the connection. Safe to call more than once.
    fn close(&self);
}
