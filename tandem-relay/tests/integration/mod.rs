//! Integration tests for the tandem relay.
//!
//! - `connection_tests` - accept, capacity and disconnect handling
//! - `messaging_tests` - verbatim echo and ordering
//! - `multi_peer_tests` - fan-out across several participants

pub mod connection_tests;

use tracing::Level;

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}
