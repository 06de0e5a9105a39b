use thiserror::Error;

/// Failures of the signaling protocol, grouped by the boundary that catches them.
#[derive(Debug, Error)]
pub enum Error {
    /// The relay is unreachable or closed before the session could start.
    #[error("relay connection failed: {0}")]
    TransportConnect(String),

    /// Camera or microphone could not be opened.
    #[error("local media unavailable: {0}")]
    MediaAcquisition(String),

    /// A description or candidate call against the media transport was rejected.
    #[error("negotiation failed: {0}")]
    Negotiation(String),

    /// An inbound message is not a valid signaling envelope.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("negotiation engine has stopped")]
    EngineStopped,

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
