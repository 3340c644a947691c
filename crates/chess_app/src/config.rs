//! Application settings loaded from TOML.

use std::path::{Path, PathBuf};

use chess_core::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uci_client::EngineConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub engine: EngineConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play against the engine rather than two humans on one board
    pub single_player: bool,
    pub engine_color: Color,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            single_player: true,
            engine_color: Color::Black,
        }
    }
}

/// Durations are in seconds, distances in board squares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub move_duration: f32,
    /// Peak height of the arc a moving piece follows
    pub lift_height: f32,
    pub sidestep_duration: f32,
    pub sidestep_distance: f32,
    /// Pieces closer than this to a mover's path step aside
    pub blocker_threshold: f32,
    pub capture_duration: f32,
    pub capture_min_scale: f32,
    pub capture_sink: f32,
    /// Castling rook timing and lift relative to the king
    pub rook_duration_factor: f32,
    pub rook_lift_factor: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            move_duration: 0.6,
            lift_height: 0.5,
            sidestep_duration: 0.25,
            sidestep_distance: 0.35,
            blocker_threshold: 0.45,
            capture_duration: 0.5,
            capture_min_scale: 0.1,
            capture_sink: 0.4,
            rook_duration_factor: 0.7,
            rook_lift_factor: 0.5,
        }
    }
}

impl AppConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
