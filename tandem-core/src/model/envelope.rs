use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{IceCandidate, ParticipantId, SessionDescription};

/// One signaling message as it travels through the relay.
///
/// On the wire this is `{"sdp": {...}, "uuid": "..."}` or
/// `{"ice": {...}, "uuid": "..."}`. Exactly one of `sdp`/`ice` must be
/// present; anything else fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireEnvelope", into = "WireEnvelope")]
pub struct SignalEnvelope {
    pub sender: ParticipantId,
    pub payload: SignalPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalPayload {
    SessionDescription(SessionDescription),
    IceCandidate(IceCandidate),
}

#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sdp: Option<SessionDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ice: Option<IceCandidate>,
    uuid: ParticipantId,
}

impl TryFrom<WireEnvelope> for SignalEnvelope {
    type Error = Error;

    fn try_from(wire: WireEnvelope) -> Result<Self> {
        let payload = match (wire.sdp, wire.ice) {
            (Some(sdp), None) => SignalPayload::SessionDescription(sdp),
            (None, Some(ice)) if ice.is_object() => SignalPayload::IceCandidate(ice),
            (None, Some(_)) => {
                return Err(Error::MalformedEnvelope("ice must be an object".into()));
            }
            (Some(_), Some(_)) => {
                return Err(Error::MalformedEnvelope(
                    "envelope carries both sdp and ice".into(),
                ));
            }
            (None, None) => {
                return Err(Error::MalformedEnvelope(
                    "envelope carries neither sdp nor ice".into(),
                ));
            }
        };

        Ok(Self {
            sender: wire.uuid,
            payload,
        })
    }
}

impl From<SignalEnvelope> for WireEnvelope {
    fn from(env: SignalEnvelope) -> Self {
        let (sdp, ice) = match env.payload {
            SignalPayload::SessionDescription(sdp) => (Some(sdp), None),
            SignalPayload::IceCandidate(ice) => (None, Some(ice)),
        };
        Self {
            sdp,
            ice,
            uuid: env.sender,
        }
    }
}

impl SignalEnvelope {
    pub fn description(sender: ParticipantId, description: SessionDescription) -> Self {
        Self {
            sender,
            payload: SignalPayload::SessionDescription(description),
        }
    }

    pub fn candidate(sender: ParticipantId, candidate: IceCandidate) -> Self {
        Self {
            sender,
            payload: SignalPayload::IceCandidate(candidate),
        }
    }

    pub fn is_from(&self, id: &ParticipantId) -> bool {
        &self.sender == id
    }

    /// Parse one relay message. Every failure is reported as
    /// [`Error::MalformedEnvelope`].
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::MalformedEnvelope(e.to_string()))
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
