pub use tandem_core::model::ParticipantId;
pub use tandem_core::{Error, Result};

pub mod model {
    pub use tandem_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use tandem_relay::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use tandem_engine::*;
}
