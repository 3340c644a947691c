use super::*;
use crate::scene::square_center;

fn ndc_of(camera: &OrbitCamera, square: u8) -> (f32, f32) {
    let p = camera.view_projection().project_point(square_center(square)).unwrap();
    (p.x, p.y)
}

#[test]
fn test_default_eye_is_on_whites_side() {
    let camera = OrbitCamera::default();
    let eye = camera.eye();
    assert!(eye.z > 0.0);
    assert!(eye.y > 0.0);
    assert!(eye.x.abs() < 1e-5);
    assert!(((eye - camera.target).length() - 12.0).abs() < 1e-4);
}

#[test]
fn test_pick_every_square() {
    let camera = OrbitCamera::default();
    let inv = camera.inverse_view_projection().unwrap();
    for sq in 0..64u8 {
        let (x, y) = ndc_of(&camera, sq);
        assert_eq!(pick_square(&inv, x, y), Some(sq), "square {sq}");
    }
}

#[test]
fn test_pick_after_orbit() {
    let mut camera = OrbitCamera::default();
    camera.orbit(2.0, -0.3);
    camera.zoom(0.8);
    let inv = camera.inverse_view_projection().unwrap();
    for sq in [0u8, 7, 27, 36, 56, 63] {
        let (x, y) = ndc_of(&camera, sq);
        assert_eq!(pick_square(&inv, x, y), Some(sq));
    }
}

#[test]
fn test_pick_misses() {
    let camera = OrbitCamera::default();
    let inv = camera.inverse_view_projection().unwrap();
    // Top of the screen looks past the board
    assert_eq!(pick_square(&inv, 0.0, 0.99), None);
    // A ray parallel to the board plane never meets it
    assert_eq!(pick_square(&Mat4::IDENTITY, 0.2, 0.3), None);
}

#[test]
fn test_limits() {
    let mut camera = OrbitCamera::default();
    camera.orbit(0.0, 10.0);
    assert_eq!(camera.pitch, 1.5);
    camera.orbit(0.0, -10.0);
    assert_eq!(camera.pitch, 0.1);
    camera.zoom(100.0);
    assert_eq!(camera.distance, 30.0);
    camera.zoom(0.0);
    assert_eq!(camera.distance, 30.0);
    camera.zoom(0.01);
    assert_eq!(camera.distance, 4.0);
}

#[test]
fn test_pan_moves_target_on_board_plane() {
    let mut camera = OrbitCamera::default();
    camera.pan(1.0, 2.0);
    // Yaw zero looks toward -z
    assert!((camera.target.x - 1.0).abs() < 1e-5);
    assert!((camera.target.z + 2.0).abs() < 1e-5);
    assert_eq!(camera.target.y, 0.0);
}
