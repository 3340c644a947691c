use super::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn test_vector_ops() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-2.0, 0.5, 4.0);
    assert_eq!(a + b, Vec3::new(-1.0, 2.5, 7.0));
    assert_eq!(a - b, Vec3::new(3.0, 1.5, -1.0));
    assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
    assert!(approx(a.dot(b), 11.0));
    assert_eq!(Vec3::new(1.0, 0.0, 0.0).cross(Vec3::Y), Vec3::new(0.0, 0.0, 1.0));
    assert!(approx(Vec3::new(3.0, 0.0, 4.0).length(), 5.0));
    assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
}

#[test]
fn test_inverse_of_camera_matrix() {
    let view = Mat4::look_at(Vec3::new(3.0, 9.0, 7.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective(0.8, 16.0 / 9.0, 0.1, 100.0);
    let vp = proj.mul(&view);
    let inv = vp.inverse().unwrap();
    let id = vp.mul(&inv);
    for r in 0..4 {
        for c in 0..4 {
            assert!(
                (id.0[r][c] - Mat4::IDENTITY.0[r][c]).abs() < 1e-2,
                "entry ({r},{c}) = {}",
                id.0[r][c]
            );
        }
    }
}

#[test]
fn test_singular_matrix_has_no_inverse() {
    assert!(Mat4([[0.0; 4]; 4]).inverse().is_none());
}

#[test]
fn test_look_at_puts_target_in_front() {
    let eye = Vec3::new(0.0, 10.0, 10.0);
    let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::Y);
    let p = view.project_point(Vec3::ZERO).unwrap();
    // Camera looks down -z in view space
    assert!(approx(p.x, 0.0));
    assert!(approx(p.y, 0.0));
    assert!(approx(p.z, -eye.length()));
}
