use super::*;
use crate::tiles::Tile;
use serde::Deserialize;
use serde::Serialize;

/// Errors decoding an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    Malformed(String),
    UnknownCommand(String),
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "Malformed",
            Self::UnknownCommand(_) => "UnknownCommand",
        }
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "malformed frame: {}", s),
            Self::UnknownCommand(s) => write!(f, "unknown command: {}", s),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Player requests. `window` optionally pins a claim to the window it
/// was meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "data")]
pub enum Command {
    Discard {
        tile: Tile,
    },
    Peng {
        tile: Tile,
        #[serde(default)]
        window: Option<u32>,
    },
    /// Claimed kong during a window, or concealed/added kong on one's turn.
    Gang {
        tile: Tile,
        #[serde(default)]
        window: Option<u32>,
    },
    /// Hu on a discard during a window, or self-drawn on one's turn.
    Hu {
        #[serde(default)]
        window: Option<u32>,
    },
    Chi {
        /// Lowest tile of the sequence.
        tile: Tile,
        #[serde(default)]
        window: Option<u32>,
    },
    Pass {
        #[serde(default)]
        window: Option<u32>,
    },
    CastDismissVote {
        agree: bool,
    },
}

impl Command {
    const NAMES: [&'static str; 7] = ["Discard", "Peng", "Gang", "Hu", "Chi", "Pass", "CastDismissVote"];
    pub fn window(&self) -> Option<u32> {
        match self {
            Command::Peng { window, .. }
            | Command::Gang { window, .. }
            | Command::Hu { window }
            | Command::Chi { window, .. }
            | Command::Pass { window } => *window,
            Command::Discard { .. } | Command::CastDismissVote { .. } => None,
        }
    }
}

/// Translation between wire frames and session types.
pub struct Protocol;

impl Protocol {
    pub fn parse(text: &str) -> Result<Envelope, ProtocolError> {
        let envelope = serde_json::from_str::<Envelope>(text)
            .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        match envelope.kind {
            Kind::Req => Ok(envelope),
            other => Err(ProtocolError::Malformed(format!("expected REQ, got {:?}", other))),
        }
    }
    pub fn decode(envelope: &Envelope) -> Result<Command, ProtocolError> {
        if !Command::NAMES.contains(&envelope.cmd.as_str()) {
            return Err(ProtocolError::UnknownCommand(envelope.cmd.clone()));
        }
        let data = match &envelope.data {
            serde_json::Value::Null => serde_json::json!({}),
            data => data.clone(),
        };
        serde_json::from_value(serde_json::json!({ "cmd": envelope.cmd, "data": data }))
            .map_err(|e| ProtocolError::Malformed(format!("{}: {}", envelope.cmd, e)))
    }
    /// Frames a notice for one seat, or None if the seat is not in its
    /// audience.
    pub fn encode(room: &str, notice: &Notice, seat: crate::Position) -> Option<Envelope> {
        notice
            .audience
            .includes(seat)
            .then(|| Envelope::event(room, &notice.event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn req(cmd: &str, data: serde_json::Value) -> Envelope {
        Envelope {
            kind: Kind::Req,
            cmd: cmd.to_string(),
            room: "r".to_string(),
            data,
            timestamp: 0,
            seq: Some(1),
        }
    }
    #[test]
    fn decode_commands() {
        let tile = Tile::try_from("5p").unwrap();
        assert_eq!(
            Protocol::decode(&req("Discard", serde_json::json!({ "tile": "5p" }))),
            Ok(Command::Discard { tile })
        );
        assert_eq!(
            Protocol::decode(&req("Peng", serde_json::json!({ "tile": "5p", "window": 4 }))),
            Ok(Command::Peng {
                tile,
                window: Some(4)
            })
        );
        assert_eq!(
            Protocol::decode(&req("Hu", serde_json::Value::Null)),
            Ok(Command::Hu { window: None })
        );
        assert_eq!(
            Protocol::decode(&req("CastDismissVote", serde_json::json!({ "agree": false }))),
            Ok(Command::CastDismissVote { agree: false })
        );
    }
    #[test]
    fn decode_failures() {
        assert!(matches!(
            Protocol::decode(&req("Riichi", serde_json::Value::Null)),
            Err(ProtocolError::UnknownCommand(_))
        ));
        assert!(matches!(
            Protocol::decode(&req("Discard", serde_json::json!({ "tile": "0x" }))),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(Protocol::parse("not json").is_err());
    }
    #[test]
    fn parse_requires_requests() {
        let text = r#"{"type":"REQ","cmd":"Pass","roomId":"r","data":{"window":2},"timestamp":1,"seq":5}"#;
        let envelope = Protocol::parse(text).unwrap();
        assert_eq!(Protocol::decode(&envelope), Ok(Command::Pass { window: Some(2) }));
        let text = r#"{"type":"EVENT","cmd":"Pass","roomId":"r"}"#;
        assert!(Protocol::parse(text).is_err());
    }
    #[test]
    fn encode_respects_audience() {
        let notice = Notice {
            audience: Audience::Others(1),
            event: Event::TileDrawn {
                seat: 1,
                tile: None,
                remaining: 50,
            },
        };
        assert!(Protocol::encode("r", &notice, 0).is_some());
        assert!(Protocol::encode("r", &notice, 1).is_none());
    }
}
