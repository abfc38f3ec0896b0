use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::game::Player;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Full URL of the remote move-selection endpoint.
    pub endpoint: String,
    /// How long to wait for the provider before treating the request
    /// as failed.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    /// Number of consecutive pieces needed to win.
    pub win_length: usize,
    /// Who opens every game.
    pub first_player: Player,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            game: GameConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            endpoint: "http://127.0.0.1:5000/get-move".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 6,
            cols: 7,
            win_length: 4,
            first_player: Player::Remote,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if
    /// the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!(
                "config file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.rows == 0 || self.game.cols == 0 {
            return Err(ConfigError::Validation(
                "game.rows and game.cols must be > 0".into(),
            ));
        }
        if self.game.win_length < 2 {
            return Err(ConfigError::Validation("game.win_length must be >= 2".into()));
        }
        if self.game.win_length > self.game.rows || self.game.win_length > self.game.cols {
            return Err(ConfigError::Validation(
                "game.win_length must fit on the board".into(),
            ));
        }
        if self.provider.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "provider.timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
