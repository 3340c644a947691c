//! Front-end core of the 3D chess board: click selection, move animation
//! planning, the per-frame animation system and the orchestrator tying the
//! rules engine to an engine opponent. Rendering and camera input stay
//! behind the [`scene::Renderer`] and [`camera::CameraController`] seams.

pub mod animation;
pub mod camera;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod orchestrator;
pub mod plan;
pub mod scene;
pub mod selection;

#[cfg(test)]
mod test_support;

pub use config::{AnimationConfig, AppConfig, ConfigError, GameConfig};
pub use engine::MoveEngine;
pub use orchestrator::{Orchestrator, OrchestratorSnapshot, SubmitError};
pub use scene::{Renderer, SceneFrame};
