use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ICE candidate in browser JSON form (`candidate`, `sdpMid`,
/// `sdpMLineIndex`, `usernameFragment`), kept as an opaque JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IceCandidate(Value);

impl IceCandidate {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_parts(
        candidate: impl Into<String>,
        sdp_mid: Option<String>,
        sdp_m_line_index: Option<u16>,
    ) -> Self {
        let mut obj = Map::new();
        obj.insert("candidate".into(), Value::String(candidate.into()));
        obj.insert(
            "sdpMid".into(),
            sdp_mid.map(Value::String).unwrap_or(Value::Null),
        );
        obj.insert(
            "sdpMLineIndex".into(),
            sdp_m_line_index.map(Value::from).unwrap_or(Value::Null),
        );
        Self(Value::Object(obj))
    }

    /// The `candidate:` attribute line, when present.
    pub fn candidate(&self) -> Option<&str> {
        self.0.get("candidate").and_then(Value::as_str)
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}
