use super::*;

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-5
}

#[test]
fn centre_ray_points_at_target() {
    let mut cam =
        PerspectiveCamera::new(70.0, 1.5, 0.001, 1000.0).with_position(Vec3::new(0.0, 0.0, 3.0));
    cam.look_at(Vec3::ZERO);
    let ray = cam.ray_through(0.0, 0.0);
    assert!(approx(ray.origin, Vec3::new(0.0, 0.0, 3.0)));
    assert!(approx(ray.dir, Vec3::NEG_Z));
}

#[test]
fn edge_rays_follow_fov_and_aspect() {
    let cam = PerspectiveCamera::new(90.0, 2.0, 0.1, 100.0);
    let top = cam.ray_through(0.0, 1.0);
    // 90 degree vertical fov puts the top edge at 45 degrees.
    assert!(approx(top.dir, Vec3::new(0.0, 1.0, -1.0).normalize()));
    let right = cam.ray_through(1.0, 0.0);
    assert!(approx(right.dir, Vec3::new(2.0, 0.0, -1.0).normalize()));
}

#[test]
fn degenerate_up_vector_still_yields_a_basis() {
    let mut cam = PerspectiveCamera::new(70.0, 1.0, 0.1, 10.0);
    cam.look_at(Vec3::new(0.0, -5.0, 0.0));
    let (f, r, u) = cam.basis();
    assert!(f.is_finite() && r.is_finite() && u.is_finite());
    assert!(approx(f, Vec3::NEG_Y));
}

#[test]
fn invalid_aspect_is_ignored() {
    let mut cam = PerspectiveCamera::new(70.0, 1.0, 0.1, 10.0);
    cam.set_aspect(0.0);
    cam.set_aspect(f32::NAN);
    assert_eq!(cam.aspect, 1.0);
    cam.set_aspect(1.25);
    assert_eq!(cam.aspect, 1.25);
}

#[test]
fn ray_generator_matches_per_pixel_rays() {
    let mut cam =
        PerspectiveCamera::new(70.0, 1.5, 0.001, 1000.0).with_position(Vec3::new(0.5, 1.0, 3.0));
    cam.look_at(Vec3::ZERO);
    let rays = cam.rays();
    let (forward, _, _) = cam.basis();
    assert!(approx(rays.forward(), forward));
    for &(x, y) in &[(-1.0, -1.0), (0.25, -0.5), (1.0, 1.0)] {
        let a = rays.through(x, y);
        let b = cam.ray_through(x, y);
        assert!(approx(a.origin, b.origin));
        assert!(approx(a.dir, b.dir));
    }
}
