use std::collections::HashMap;

use crate::geometry::Vec3;
use crate::scene::{Renderer, SceneFrame};

/// Renderer that remembers the latest state of every piece.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<SceneFrame>,
    pub positions: HashMap<u32, Vec3>,
    pub offsets: HashMap<u32, Vec3>,
    pub scales: HashMap<u32, f32>,
    pub tilts: HashMap<u32, f32>,
    pub removed: Vec<u32>,
}

impl RecordingRenderer {
    pub fn offset(&self, id: u32) -> Vec3 {
        self.offsets.get(&id).copied().unwrap_or(Vec3::ZERO)
    }

    pub fn last_frame(&self) -> &SceneFrame {
        self.frames.last().expect("nothing presented yet")
    }
}

impl Renderer for RecordingRenderer {
    fn present(&mut self, frame: &SceneFrame) {
        self.frames.push(frame.clone());
    }

    fn set_piece_position(&mut self, id: u32, position: Vec3) {
        self.positions.insert(id, position);
    }

    fn set_piece_offset(&mut self, id: u32, offset: Vec3) {
        self.offsets.insert(id, offset);
    }

    fn set_piece_scale(&mut self, id: u32, scale: f32) {
        self.scales.insert(id, scale);
    }

    fn set_piece_rotation_offset(&mut self, id: u32, angle: f32) {
        self.tilts.insert(id, angle);
    }

    fn remove_piece(&mut self, id: u32) {
        self.removed.push(id);
    }
}
