//! Search limits for a single `go` command.

/// Used when neither the request nor the configuration bounds the search.
pub const FALLBACK_MOVETIME_MS: u64 = 1000;

/// Limits sent with `go`. The engine stops at whichever is reached first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoLimits {
    /// Maximum search depth in plies
    pub depth: Option<u8>,
    /// Time for this move in milliseconds
    pub movetime_ms: Option<u64>,
}

impl GoLimits {
    pub fn depth(depth: u8) -> Self {
        Self {
            depth: Some(depth),
            movetime_ms: None,
        }
    }

    pub fn movetime(ms: u64) -> Self {
        Self {
            depth: None,
            movetime_ms: Some(ms),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_none() && self.movetime_ms.is_none()
    }

    /// `self` if it sets anything, otherwise `fallback`.
    pub fn or(self, fallback: GoLimits) -> GoLimits {
        if self.is_empty() { fallback } else { self }
    }

    pub fn to_command(&self) -> String {
        let mut cmd = String::from("go");
        if let Some(d) = self.depth {
            cmd.push_str(&format!(" depth {d}"));
        }
        if let Some(ms) = self.movetime_ms {
            cmd.push_str(&format!(" movetime {ms}"));
        }
        if self.is_empty() {
            cmd.push_str(&format!(" movetime {FALLBACK_MOVETIME_MS}"));
        }
        cmd
    }
}

#[cfg(test)]
#[path = "limits_tests.rs"]
mod limits_tests;
