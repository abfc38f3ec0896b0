use crate::game::{GameEngine, Player};

/// Whether a provider request can be issued for a session right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderRequestState {
    /// The remote player is to move and nothing is in flight.
    Ready,
    /// A request is already in flight.
    InFlight,
    /// The game is over or it is the human's turn.
    NotRemoteTurn,
}

/// Server-side state for a single game.
pub struct GameSession {
    pub engine: GameEngine,
    /// Connection id of the human playing this game.
    pub player_id: Option<String>,
    /// A provider request is in flight; human moves are rejected until
    /// it resolves. Reset is the one exception.
    pub awaiting_provider: bool,
    /// Bumped on every reset so a stale provider response for an
    /// earlier game can be recognized and discarded.
    pub epoch: u64,
}

impl GameSession {
    pub fn new(engine: GameEngine) -> Self {
        GameSession {
            engine,
            player_id: None,
            awaiting_provider: false,
            epoch: 0,
        }
    }

    pub fn provider_request_state(&self) -> ProviderRequestState {
        if self.awaiting_provider {
            ProviderRequestState::InFlight
        } else if self.engine.is_terminal() || self.engine.current_player() != Player::Remote {
            ProviderRequestState::NotRemoteTurn
        } else {
            ProviderRequestState::Ready
        }
    }
}
