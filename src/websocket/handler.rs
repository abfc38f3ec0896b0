use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::models::{AppState, ClientMessage, ServerMessage};

/// WebSocket session for connect-four games. One connection drives one
/// game: the client sends column clicks, the server answers with the
/// authoritative board state and fetches the opposing moves from the
/// remote provider.
pub struct GameWebSocket {
    pub id: String,
    pub game_id: String,
    pub app_state: web::Data<AppState>,
}

impl Actor for GameWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, _: &mut Self::Context) {
        info!("WebSocket connection started: {}", self.id);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        // Drop the game when the player who owns it disconnects.
        if !self.game_id.is_empty() && self.app_state.remove_if_owned(&self.game_id, &self.id) {
            info!("Removed game {} after its player disconnected", self.game_id);
        }

        info!("WebSocket connection closed: {}", self.id);
        Running::Stop
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                info!("Received text message: {}", text);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => {
                        self.handle_message(client_msg, ctx);
                    }
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        let error_msg =
                            ServerMessage::error(None, format!("Invalid message format: {}", e));
                        self.send(ctx, &error_msg);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send(
                    ctx,
                    &ServerMessage::error(None, "Binary messages are not supported"),
                );
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl GameWebSocket {
    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg.action.as_str() {
            "create" => self.handle_create(ctx),
            "join" => self.handle_join(msg, ctx),
            "move" => self.handle_move(msg, ctx),
            "retry" => self.handle_retry(ctx),
            "reset" => self.handle_reset(ctx),
            _ => {
                info!("Unknown action: {}", msg.action);
                let error_msg =
                    ServerMessage::error(None, format!("Unknown action: {}", msg.action));
                self.send(ctx, &error_msg);
            }
        }
    }

    pub fn send(&self, ctx: &mut ws::WebsocketContext<Self>, message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("Failed to serialize server message: {}", e),
        }
    }
}

/// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4().to_string();
    info!("New WebSocket connection: {}", id);

    let session = GameWebSocket {
        id,
        game_id: String::new(),
        app_state,
    };

    ws::start(session, &req, stream)
}
