//! Time-based piece animations driven by a per-frame tick.
//!
//! Animations only ever touch visual offsets, scales and tilts. Each one
//! snaps exactly to its end pose when its time is up, so a finished system
//! always shows the logical board.

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_3, PI};

use crate::geometry::Vec3;
use crate::scene::Renderer;

/// How far a captured piece topples over while it disappears.
const CAPTURE_TILT: f32 = FRAC_PI_3;

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Track {
    /// Offset from `start` to zero along an arc peaking at `lift`.
    Travel { start: Vec3, lift: f32 },
    /// Offset from zero to `to`.
    Sidestep { to: Vec3 },
    /// Offset from `from` back to zero.
    Return { from: Vec3 },
    /// Shrink to `min_scale`, sink by `sink` and topple.
    Capture { min_scale: f32, sink: f32 },
}

/// Visual state of a piece at some point of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub offset: Vec3,
    pub scale: f32,
    pub tilt: f32,
}

impl Track {
    pub fn pose(&self, t: f32) -> Pose {
        let rest = |offset| Pose {
            offset,
            scale: 1.0,
            tilt: 0.0,
        };
        if t >= 1.0 {
            return match *self {
                Track::Travel { .. } | Track::Return { .. } => rest(Vec3::ZERO),
                Track::Sidestep { to } => rest(to),
                Track::Capture { min_scale, sink } => Pose {
                    offset: Vec3::new(0.0, -sink, 0.0),
                    scale: min_scale,
                    tilt: CAPTURE_TILT,
                },
            };
        }

        let e = ease_in_out_cubic(t);
        match *self {
            Track::Travel { start, lift } => {
                rest(start.lerp(Vec3::ZERO, e) + Vec3::Y * ((PI * e).sin() * lift))
            }
            Track::Sidestep { to } => rest(Vec3::ZERO.lerp(to, e)),
            Track::Return { from } => rest(from.lerp(Vec3::ZERO, e)),
            Track::Capture { min_scale, sink } => Pose {
                offset: Vec3::new(0.0, -sink * e, 0.0),
                scale: 1.0 + (min_scale - 1.0) * e,
                tilt: CAPTURE_TILT * e,
            },
        }
    }
}

/// Runs when an animation reaches its end.
#[derive(Debug, Clone, PartialEq)]
pub enum OnComplete {
    Nothing,
    /// Bring the listed pieces back from wherever they were pushed.
    ReturnPieces { ids: Vec<u32>, duration: f32 },
    /// Drop the piece from the renderer.
    RemovePiece,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub piece_id: u32,
    pub track: Track,
    pub duration: f32,
    pub elapsed: f32,
    pub on_complete: OnComplete,
}

impl Animation {
    pub fn new(piece_id: u32, track: Track, duration: f32) -> Self {
        Self {
            piece_id,
            track,
            duration,
            elapsed: 0.0,
            on_complete: OnComplete::Nothing,
        }
    }

    pub fn then(mut self, on_complete: OnComplete) -> Self {
        self.on_complete = on_complete;
        self
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[derive(Debug, Default)]
pub struct AnimationSystem {
    active: Vec<Animation>,
    offsets: HashMap<u32, Vec3>,
}

impl AnimationSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn active(&self) -> &[Animation] {
        &self.active
    }

    /// Current visual offset of a piece.
    pub fn offset_of(&self, id: u32) -> Vec3 {
        self.offsets.get(&id).copied().unwrap_or(Vec3::ZERO)
    }

    /// Start `anim`, replacing whatever the piece was doing. The first pose
    /// is applied right away.
    pub fn start(&mut self, anim: Animation, renderer: &mut dyn Renderer) {
        self.active.retain(|a| a.piece_id != anim.piece_id);
        apply_pose(&mut self.offsets, &anim, renderer);
        self.active.push(anim);
    }

    /// Advance every animation by `dt` seconds. Returns the ids of pieces
    /// removed from the renderer.
    pub fn tick(&mut self, dt: f32, renderer: &mut dyn Renderer) -> Vec<u32> {
        for anim in &mut self.active {
            anim.elapsed += dt;
            apply_pose(&mut self.offsets, anim, renderer);
        }

        let (done, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(Animation::is_finished);
        self.active = running;

        let mut removed = Vec::new();
        for anim in done {
            self.complete(anim, renderer, &mut removed);
        }
        removed
    }

    /// Snap everything to its end pose and run completion actions,
    /// including those of animations started by completions.
    pub fn finish_all(&mut self, renderer: &mut dyn Renderer) -> Vec<u32> {
        let mut removed = Vec::new();
        while self.is_animating() {
            for anim in &mut self.active {
                anim.elapsed = anim.duration;
            }
            removed.extend(self.tick(0.0, renderer));
        }
        removed
    }

    /// Drop every animation without running completions and put all
    /// touched pieces back in their resting pose.
    pub fn clear(&mut self, renderer: &mut dyn Renderer) {
        let mut ids: Vec<u32> = self.offsets.keys().copied().collect();
        ids.extend(self.active.iter().map(|a| a.piece_id));
        ids.sort_unstable();
        ids.dedup();
        for id in ids {
            renderer.set_piece_offset(id, Vec3::ZERO);
            renderer.set_piece_scale(id, 1.0);
            renderer.set_piece_rotation_offset(id, 0.0);
        }
        self.active.clear();
        self.offsets.clear();
    }

    fn complete(&mut self, anim: Animation, renderer: &mut dyn Renderer, removed: &mut Vec<u32>) {
        if self.offset_of(anim.piece_id) == Vec3::ZERO {
            self.offsets.remove(&anim.piece_id);
        }
        match anim.on_complete {
            OnComplete::Nothing => {}
            OnComplete::ReturnPieces { ids, duration } => {
                for id in ids {
                    let from = self.offset_of(id);
                    self.start(Animation::new(id, Track::Return { from }, duration), renderer);
                }
            }
            OnComplete::RemovePiece => {
                self.offsets.remove(&anim.piece_id);
                renderer.remove_piece(anim.piece_id);
                removed.push(anim.piece_id);
            }
        }
    }
}

fn apply_pose(offsets: &mut HashMap<u32, Vec3>, anim: &Animation, renderer: &mut dyn Renderer) {
    let pose = anim.track.pose(anim.progress());
    offsets.insert(anim.piece_id, pose.offset);
    renderer.set_piece_offset(anim.piece_id, pose.offset);
    if matches!(anim.track, Track::Capture { .. }) {
        renderer.set_piece_scale(anim.piece_id, pose.scale);
        renderer.set_piece_rotation_offset(anim.piece_id, pose.tilt);
    }
}

#[cfg(test)]
#[path = "animation_tests.rs"]
mod animation_tests;
