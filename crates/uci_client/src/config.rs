use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::limits::GoLimits;

/// How to launch and configure the external engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Executable name or path
    pub path: String,
    pub args: Vec<String>,
    /// Value for `setoption name Skill Level`
    pub skill_level: u8,
    /// Value for `setoption name Threads`
    pub threads: u32,
    /// Default search limits when a request sets none
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
    /// Bound on each `uciok` / `readyok` wait
    pub handshake_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: "stockfish".to_string(),
            args: Vec::new(),
            skill_level: 10,
            threads: 1,
            depth: None,
            movetime_ms: Some(1000),
            handshake_timeout_ms: 5000,
        }
    }
}

impl EngineConfig {
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn default_limits(&self) -> GoLimits {
        GoLimits {
            depth: self.depth,
            movetime_ms: self.movetime_ms,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
