//! Camera seam and board picking.

use crate::geometry::{Mat4, Vec3};
use crate::scene::square_at;

const MIN_PITCH: f32 = 0.1;
const MAX_PITCH: f32 = 1.5;
const MIN_DISTANCE: f32 = 4.0;
const MAX_DISTANCE: f32 = 30.0;

pub trait CameraController {
    /// Rotate around the target by the given angles in radians.
    fn orbit(&mut self, yaw: f32, pitch: f32);
    /// Move the target along the board plane, in camera-relative units.
    fn pan(&mut self, right: f32, forward: f32);
    /// Scale the distance to the target; values below 1 move closer.
    fn zoom(&mut self, factor: f32);
    fn view_projection(&self) -> Mat4;

    fn inverse_view_projection(&self) -> Option<Mat4> {
        self.view_projection().inverse()
    }
}

/// Perspective camera orbiting a point on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    /// Behind White's pieces, looking down at the board.
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.9,
            distance: 12.0,
            fov_y: 45f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }
}

impl CameraController for OrbitCamera {
    fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.yaw = (self.yaw + yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + pitch).clamp(MIN_PITCH, MAX_PITCH);
    }

    fn pan(&mut self, right: f32, forward: f32) {
        let (sy, cy) = self.yaw.sin_cos();
        // Forward points from the eye toward the target, flattened
        let fwd = Vec3::new(-sy, 0.0, -cy);
        let side = Vec3::new(cy, 0.0, -sy);
        self.target += side * right + fwd * forward;
    }

    fn zoom(&mut self, factor: f32) {
        if factor > 0.0 {
            self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective(self.fov_y, self.aspect, self.near, self.far);
        proj.mul(&view)
    }
}

/// Square under the normalised device coordinates `(ndc_x, ndc_y)`.
///
/// The pixel's ray runs from the near to the far plane and is intersected
/// with the board plane `y = 0`.
pub fn pick_square(inverse_view_projection: &Mat4, ndc_x: f32, ndc_y: f32) -> Option<u8> {
    let near = inverse_view_projection.project_point(Vec3::new(ndc_x, ndc_y, -1.0))?;
    let far = inverse_view_projection.project_point(Vec3::new(ndc_x, ndc_y, 1.0))?;
    let dir = far - near;
    if dir.y.abs() < f32::EPSILON {
        return None;
    }
    let t = -near.y / dir.y;
    if t < 0.0 {
        return None;
    }
    let hit = near + dir * t;
    square_at(hit.x, hit.z)
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod camera_tests;
