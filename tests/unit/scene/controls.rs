use super::*;

fn camera_at(z: f32) -> PerspectiveCamera {
    PerspectiveCamera::new(70.0, 1.0, 0.001, 1000.0).with_position(Vec3::new(0.0, 0.0, z))
}

#[test]
fn idle_update_keeps_camera_in_place() {
    let mut cam = camera_at(3.0);
    let mut ctl = OrbitControls::new(Vec3::ZERO);
    let moved = ctl.update(&mut cam, 1.0 / 60.0);
    assert!(!moved);
    assert!((cam.position - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-4);
    assert_eq!(cam.target, Vec3::ZERO);
}

#[test]
fn undamped_rotation_applies_in_one_update() {
    let mut cam = camera_at(2.5);
    let mut ctl = OrbitControls::new(Vec3::ZERO);
    ctl.rotate_left(-std::f32::consts::FRAC_PI_2);
    assert!(ctl.update(&mut cam, 0.0));
    // A quarter turn about +Y moves the camera from +Z to +X, radius preserved.
    assert!((cam.position - Vec3::new(2.5, 0.0, 0.0)).length() < 1e-4);
    assert!(!ctl.is_moving());
}

#[test]
fn damped_rotation_glides_and_decays() {
    let mut cam = camera_at(3.0);
    let mut ctl = OrbitControls::new(Vec3::ZERO).with_damping(0.05);
    ctl.handle_input(&ControlInput::Drag {
        dx: 100.0,
        dy: 0.0,
        viewport_height: 400.0,
    });

    let before = cam.position;
    assert!(ctl.update(&mut cam, 0.0));
    let first_step = (cam.position - before).length();
    let mid = cam.position;
    assert!(ctl.update(&mut cam, 0.0));
    let second_step = (cam.position - mid).length();
    assert!(second_step < first_step);
    assert!(ctl.is_moving());

    for _ in 0..2000 {
        ctl.update(&mut cam, 0.0);
    }
    assert!(!ctl.is_moving());
    assert!((cam.position.length() - 3.0).abs() < 1e-3);
}

#[test]
fn polar_angle_never_flips_over_the_pole() {
    let mut cam = camera_at(3.0);
    let mut ctl = OrbitControls::new(Vec3::ZERO);
    ctl.rotate_up(10.0);
    ctl.update(&mut cam, 0.0);
    assert!(cam.position.is_finite());
    assert!(cam.position.y > 0.0);
    assert!(cam.position.y <= 3.0);
}

#[test]
fn zoom_respects_distance_limits() {
    let mut cam = camera_at(3.0);
    let mut ctl = OrbitControls::new(Vec3::ZERO);
    ctl.min_distance = 2.0;
    for _ in 0..100 {
        ctl.handle_input(&ControlInput::Zoom { delta: 1.0 });
    }
    ctl.update(&mut cam, 0.0);
    assert!((cam.position.length() - 2.0).abs() < 1e-4);

    ctl.handle_input(&ControlInput::Zoom { delta: -1.0 });
    ctl.update(&mut cam, 0.0);
    assert!(cam.position.length() > 2.0);
}
