use actix::*;
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::game::utils::{get_game_status, player_to_string};
use crate::game::{GameEngine, GameStatus, PlacedPiece, Player};
use crate::models::{ClientMessage, GameSession, ProviderRequestState, ServerMessage};
use crate::provider::{MoveProvider, ProviderError};
use crate::websocket::handler::GameWebSocket;

/// Build a reply carrying the full game state.
fn state_message(
    message_type: &str,
    game_id: &str,
    engine: &GameEngine,
    last_move: Option<PlacedPiece>,
) -> ServerMessage {
    let current_turn = match engine.status() {
        GameStatus::InProgress => Some(player_to_string(engine.current_player())),
        _ => None,
    };

    ServerMessage {
        message_type: message_type.to_string(),
        game_id: Some(game_id.to_string()),
        board: Some(engine.wire_grid()),
        status: Some(get_game_status(engine)),
        current_turn,
        last_move,
        error: None,
    }
}

/// Apply the provider's answer to the session, producing the reply to
/// forward to the client. A column the engine rejects (stale, out of
/// range, or already full) becomes a `provider_error` and leaves the
/// remote player still to move.
fn apply_remote_result(
    session: &mut GameSession,
    game_id: &str,
    result: Result<usize, ProviderError>,
) -> ServerMessage {
    session.awaiting_provider = false;

    match result {
        Ok(column) => match session.engine.drop_piece(column, Player::Remote) {
            Ok(placed) => state_message("move_made", game_id, &session.engine, Some(placed)),
            Err(e) => {
                warn!(
                    "Provider returned unplayable column {} for game {}: {}",
                    column, game_id, e
                );
                let error =
                    ProviderError::InvalidResponse(format!("column {column} is not playable"));
                ServerMessage::failure(
                    "provider_error",
                    Some(game_id.to_string()),
                    error.to_string(),
                )
            }
        },
        Err(e) => {
            warn!("Provider failure for game {}: {}", game_id, e);
            ServerMessage::failure("provider_error", Some(game_id.to_string()), e.to_string())
        }
    }
}

impl GameWebSocket {
    pub fn handle_create(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        info!("Creating new game");

        let game_id = Uuid::new_v4().to_string();

        let mut session = GameSession::new(GameEngine::new(&self.app_state.config.game));
        session.player_id = Some(self.id.clone());
        let response = state_message("game_created", &game_id, &session.engine, None);

        // A connection drives one game at a time, but another player
        // may have taken the old game over in the meantime.
        if !self.game_id.is_empty() {
            self.app_state.remove_if_owned(&self.game_id, &self.id);
        }

        {
            let mut games = self.app_state.games.lock().unwrap();
            games.insert(game_id.clone(), session);
        }
        self.game_id = game_id;

        self.send(ctx, &response);
        self.request_remote_move(ctx);
    }

    pub fn handle_join(
        &mut self,
        msg: ClientMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        let game_id = match msg.game_id {
            Some(id) => id,
            None => {
                warn!("No game ID provided");
                self.send(ctx, &ServerMessage::error(None, "No game ID provided"));
                return;
            }
        };
        info!("Player {} joining game {}", self.id, game_id);

        let response = {
            let mut games = self.app_state.games.lock().unwrap();
            match games.get_mut(&game_id) {
                Some(session) => {
                    session.player_id = Some(self.id.clone());
                    state_message("joined", &game_id, &session.engine, None)
                }
                None => {
                    warn!("Game not found: {}", game_id);
                    self.send(
                        ctx,
                        &ServerMessage::error(Some(game_id), "Game not found"),
                    );
                    return;
                }
            }
        };

        self.game_id = game_id;
        self.send(ctx, &response);
    }

    pub fn handle_move(
        &mut self,
        msg: ClientMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        if self.game_id.is_empty() {
            self.send(ctx, &ServerMessage::error(None, "Not in a game"));
            return;
        }
        let column = match msg.column {
            Some(column) => column,
            None => {
                self.send(
                    ctx,
                    &ServerMessage::error(
                        Some(self.game_id.clone()),
                        "Move requires a column",
                    ),
                );
                return;
            }
        };

        let response = {
            let mut games = self.app_state.games.lock().unwrap();
            let session = match games.get_mut(&self.game_id) {
                Some(session) => session,
                None => {
                    self.send(
                        ctx,
                        &ServerMessage::error(Some(self.game_id.clone()), "Game not found"),
                    );
                    return;
                }
            };

            // Input is rejected, not queued, while the provider decides.
            if session.awaiting_provider {
                self.send(
                    ctx,
                    &ServerMessage::error(
                        Some(self.game_id.clone()),
                        "Waiting for the remote move",
                    ),
                );
                return;
            }

            match session.engine.drop_piece(column, Player::Human) {
                Ok(placed) => {
                    state_message("move_made", &self.game_id, &session.engine, Some(placed))
                }
                Err(e) => {
                    info!("Rejected move in game {}: {}", self.game_id, e);
                    self.send(
                        ctx,
                        &ServerMessage::error(Some(self.game_id.clone()), e.to_string()),
                    );
                    return;
                }
            }
        };

        self.send(ctx, &response);
        self.request_remote_move(ctx);
    }

    pub fn handle_retry(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        if self.game_id.is_empty() {
            self.send(ctx, &ServerMessage::error(None, "Not in a game"));
            return;
        }

        let request_state = {
            let games = self.app_state.games.lock().unwrap();
            match games.get(&self.game_id) {
                Some(session) => session.provider_request_state(),
                None => {
                    self.send(
                        ctx,
                        &ServerMessage::error(Some(self.game_id.clone()), "Game not found"),
                    );
                    return;
                }
            }
        };

        match request_state {
            ProviderRequestState::Ready => {
                self.request_remote_move(ctx);
            }
            ProviderRequestState::InFlight => {
                self.send(
                    ctx,
                    &ServerMessage::error(
                        Some(self.game_id.clone()),
                        "Waiting for the remote move",
                    ),
                );
            }
            ProviderRequestState::NotRemoteTurn => {
                self.send(
                    ctx,
                    &ServerMessage::error(
                        Some(self.game_id.clone()),
                        "No remote move to request",
                    ),
                );
            }
        }
    }

    pub fn handle_reset(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        if self.game_id.is_empty() {
            self.send(ctx, &ServerMessage::error(None, "Not in a game"));
            return;
        }

        let response = {
            let mut games = self.app_state.games.lock().unwrap();
            let session = match games.get_mut(&self.game_id) {
                Some(session) => session,
                None => {
                    self.send(
                        ctx,
                        &ServerMessage::error(Some(self.game_id.clone()), "Game not found"),
                    );
                    return;
                }
            };

            session.engine.reset();
            session.epoch += 1;
            session.awaiting_provider = false;
            state_message("game_reset", &self.game_id, &session.engine, None)
        };

        info!("Game {} reset", self.game_id);
        self.send(ctx, &response);
        self.request_remote_move(ctx);
    }

    /// Kick off a provider request if it is the remote player's turn and
    /// none is already in flight. Returns whether a request was issued.
    pub fn request_remote_move(&mut self, ctx: &mut ws::WebsocketContext<Self>) -> bool {
        let (board, epoch) = {
            let mut games = self.app_state.games.lock().unwrap();
            let session = match games.get_mut(&self.game_id) {
                Some(session) => session,
                None => return false,
            };
            if session.provider_request_state() != ProviderRequestState::Ready {
                return false;
            }
            session.awaiting_provider = true;
            (session.engine.wire_grid(), session.epoch)
        };

        info!("Requesting remote move for game {}", self.game_id);
        let provider = MoveProvider::new(&self.app_state.config.provider);
        let game_id = self.game_id.clone();
        let fut = async move { provider.choose_column(board).await };

        ctx.spawn(fut.into_actor(self).map(move |result, act, ctx| {
            act.finish_remote_move(game_id, epoch, result, ctx);
        }));
        true
    }

    /// Apply (or reject) the provider's answer. The game id and epoch
    /// were captured when the request was issued; a mismatch means the
    /// game was reset or replaced in the meantime and the answer is
    /// discarded.
    fn finish_remote_move(
        &mut self,
        game_id: String,
        epoch: u64,
        result: Result<usize, ProviderError>,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        let response = {
            let mut games = self.app_state.games.lock().unwrap();
            let session = match games.get_mut(&game_id) {
                Some(session) => session,
                None => {
                    info!("Discarding provider response for removed game {}", game_id);
                    return;
                }
            };
            if session.epoch != epoch {
                info!("Discarding stale provider response for game {}", game_id);
                return;
            }
            apply_remote_result(session, &game_id, result)
        };

        if self.game_id == game_id {
            self.send(ctx, &response);
        }
    }
}
