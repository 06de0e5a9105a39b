use tandem_core::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("capture device unavailable: {0}")]
    Unavailable(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid candidate: {0}")]
    InvalidCandidate(String),

    #[error(transparent)]
    WebRtc(#[from] webrtc::Error),
}

impl MediaError {
    pub fn acquisition(self) -> Error {
        Error::MediaAcquisition(self.to_string())
    }

    pub fn negotiation(self) -> Error {
        Error::Negotiation(self.to_string())
    }
}
