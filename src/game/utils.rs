use crate::game::{GameEngine, GameStatus, Player};

/// Convert a player to its string representation.
pub fn player_to_string(player: Player) -> String {
    match player {
        Player::Remote => "remote".to_string(),
        Player::Human => "human".to_string(),
    }
}

/// Get the current game status as a string.
pub fn get_game_status(engine: &GameEngine) -> String {
    match engine.status() {
        GameStatus::Won(Player::Remote) => "remote_wins".to_string(),
        GameStatus::Won(Player::Human) => "human_wins".to_string(),
        GameStatus::Draw => "draw".to_string(),
        GameStatus::InProgress => match engine.current_player() {
            Player::Remote => "remote_turn".to_string(),
            Player::Human => "human_turn".to_string(),
        },
    }
}
