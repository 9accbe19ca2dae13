//////////////////////////
// protocol.rs
//////////////////////////

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::game::GameState;

/// Both kinds carry the whole post-transition state; receivers treat them the
/// same way.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeerMessage {
    Move { state: GameState },
    Reset { state: GameState },
}

impl PeerMessage {
    pub fn state(&self) -> &GameState {
        match self {
            PeerMessage::Move { state } | PeerMessage::Reset { state } => state,
        }
    }

    pub fn into_state(self) -> GameState {
        match self {
            PeerMessage::Move { state } | PeerMessage::Reset { state } => state,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PeerMessage::Move { .. } => "MOVE",
            PeerMessage::Reset { .. } => "RESET",
        }
    }

    pub fn encode(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<PeerMessage, TransportError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn messages_are_tagged_by_type() {
        let msg = PeerMessage::Reset {
            state: GameState::new(),
        };
        let json: Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(json["type"], "RESET");
        assert_eq!(json["state"]["turn"], "white");
        assert_eq!(json["state"]["board"].as_array().unwrap().len(), 10);
        assert_eq!(json["state"]["board"][9][5]["piece_type"], "king");
    }

    #[test]
    fn garbage_is_an_error_not_a_panic() {
        assert!(PeerMessage::decode("{\"type\":\"CHAT\"}").is_err());
        assert!(PeerMessage::decode("not json").is_err());
    }
}
