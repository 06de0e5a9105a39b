pub mod relay_server;

pub use relay_server::*;
pub use ws_client::*;
