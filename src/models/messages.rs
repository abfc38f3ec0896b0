use serde::{Deserialize, Serialize};

use crate::game::PlacedPiece;

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientMessage {
    pub action: String,
    pub game_id: Option<String>,
    pub column: Option<usize>,
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerMessage {
    pub message_type: String,
    pub game_id: Option<String>,
    /// Board grid: 0 = empty, 1 = remote player, 2 = human player,
    /// top row first.
    pub board: Option<Vec<Vec<u8>>>,
    pub status: Option<String>,
    pub current_turn: Option<String>,
    pub last_move: Option<PlacedPiece>,
    pub error: Option<String>,
}

impl ServerMessage {
    /// A reply carrying only an error string.
    pub fn failure(
        message_type: &str,
        game_id: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        ServerMessage {
            message_type: message_type.to_string(),
            game_id,
            board: None,
            status: None,
            current_turn: None,
            last_move: None,
            error: Some(error.into()),
        }
    }

    pub fn error(game_id: Option<String>, error: impl Into<String>) -> Self {
        Self::failure("error", game_id, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player;

    #[test]
    fn client_move_parses() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"action": "move", "game_id": "abc", "column": 3}"#).unwrap();
        assert_eq!(msg.action, "move");
        assert_eq!(msg.game_id.as_deref(), Some("abc"));
        assert_eq!(msg.column, Some(3));
    }

    #[test]
    fn client_create_parses_without_optionals() {
        let msg: ClientMessage = serde_json::from_str(r#"{"action": "create"}"#).unwrap();
        assert_eq!(msg.action, "create");
        assert!(msg.game_id.is_none());
        assert!(msg.column.is_none());
    }

    #[test]
    fn last_move_serializes_with_player_name() {
        let msg = ServerMessage {
            message_type: "move_made".to_string(),
            game_id: Some("abc".to_string()),
            board: Some(vec![vec![0; 7]; 6]),
            status: Some("human_turn".to_string()),
            current_turn: Some("human".to_string()),
            last_move: Some(PlacedPiece {
                row: 5,
                column: 2,
                player: Player::Remote,
            }),
            error: None,
        };

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["message_type"], "move_made");
        assert_eq!(json["last_move"]["row"], 5);
        assert_eq!(json["last_move"]["player"], "remote");
    }
}
