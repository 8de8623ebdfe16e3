use super::*;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Kind {
    Event,
    Req,
    Resp,
    Error,
}

/// Wire frame for everything crossing the session boundary.
/// RESP and ERROR frames copy `cmd` and `seq` from their REQ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: Kind,
    pub cmd: String,
    #[serde(rename = "roomId")]
    pub room: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

impl Envelope {
    pub fn event(room: &str, event: &Event) -> Self {
        let data = match serde_json::to_value(event) {
            Ok(serde_json::Value::Object(mut map)) => map.remove("data").unwrap_or_default(),
            _ => serde_json::Value::Null,
        };
        Self {
            kind: Kind::Event,
            cmd: event.name().to_string(),
            room: room.to_string(),
            data,
            timestamp: crate::timestamp(),
            seq: None,
        }
    }
    pub fn reply(&self, data: serde_json::Value) -> Self {
        Self {
            kind: Kind::Resp,
            cmd: self.cmd.clone(),
            room: self.room.clone(),
            data,
            timestamp: crate::timestamp(),
            seq: self.seq,
        }
    }
    pub fn error(&self, code: &str, message: &str) -> Self {
        Self {
            kind: Kind::Error,
            cmd: self.cmd.clone(),
            room: self.room.clone(),
            data: serde_json::json!({ "code": code, "message": message }),
            timestamp: crate::timestamp(),
            seq: self.seq,
        }
    }
    /// Stand-in request for frames too broken to correlate with.
    pub fn unparsed(room: &str) -> Self {
        Self {
            kind: Kind::Req,
            cmd: String::new(),
            room: room.to_string(),
            data: serde_json::Value::Null,
            timestamp: crate::timestamp(),
            seq: None,
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn event_frames_carry_variant_as_cmd() {
        let event = Event::TrusteeEngaged { seat: 2 };
        let frame = Envelope::event("r", &event);
        assert_eq!(frame.kind, Kind::Event);
        assert_eq!(frame.cmd, "TrusteeEngaged");
        assert_eq!(frame.data, serde_json::json!({ "seat": 2 }));
    }
    #[test]
    fn wire_names() {
        let frame = Envelope::event("room-1", &Event::MatchEnded { standings: vec![1, -1] });
        let json: serde_json::Value = serde_json::from_str(&frame.to_json()).unwrap();
        assert_eq!(json["type"], "EVENT");
        assert_eq!(json["roomId"], "room-1");
        assert!(json.get("seq").is_none());
    }
    #[test]
    fn replies_correlate() {
        let req = Envelope {
            kind: Kind::Req,
            cmd: "Discard".to_string(),
            room: "r".to_string(),
            data: serde_json::Value::Null,
            timestamp: 0,
            seq: Some(9),
        };
        let err = req.error("InvalidAction", "nope");
        assert_eq!(err.kind, Kind::Error);
        assert_eq!(err.cmd, "Discard");
        assert_eq!(err.seq, Some(9));
        assert_eq!(req.reply(serde_json::Value::Null).kind, Kind::Resp);
    }
}
