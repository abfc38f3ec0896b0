use actix_web::{web, App, HttpServer};
use log::info;

mod config;
mod game;
mod models;
mod provider;
mod routes;
mod websocket;

use config::AppConfig;
use models::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = AppConfig::load_or_default(std::path::Path::new(&config_path))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

    info!(
        "Starting connect-four web app server at http://{}",
        config.server.bind
    );
    info!("Remote move provider endpoint: {}", config.provider.endpoint);

    let bind = config.server.bind.clone();

    // Create shared application state
    let app_state = web::Data::new(AppState::new(config));

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
