mod candidate;
mod description;
mod envelope;
mod ice_server;
mod participant;

pub use candidate::IceCandidate;
pub use description::{SdpKind, SessionDescription};
pub use envelope::{SignalEnvelope, SignalPayload};
pub use ice_server::IceServerConfig;
pub use participant::ParticipantId;
