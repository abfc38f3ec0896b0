use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::AppConfig;
use crate::models::GameSession;

/// Application state shared between connections. Every game lives in
/// its own `GameSession`, so concurrent games never interfere.
pub struct AppState {
    pub config: AppConfig,
    pub games: Mutex<HashMap<String, GameSession>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        AppState {
            config,
            games: Mutex::new(HashMap::new()),
        }
    }

    /// Remove a game, but only if `connection_id` is the player who
    /// owns it. A connection holding a stale game id must not be able
    /// to destroy a game another connection has since taken over.
    /// Returns whether the game was removed.
    pub fn remove_if_owned(&self, game_id: &str, connection_id: &str) -> bool {
        let mut games = self.games.lock().unwrap();
        let owned = games
            .get(game_id)
            .map_or(false, |session| session.player_id.as_deref() == Some(connection_id));
        if owned {
            games.remove(game_id);
        }
        owned
    }
}
