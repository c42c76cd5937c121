use super::*;

#[test]
fn holds_during_delay_then_reaches_target() {
    let mut tw = Tween::new(0.0f64, 1.0, 1.0, Ease::Linear).with_delay(0.5);
    assert_eq!(tw.advance(0.25), 0.0);
    assert_eq!(tw.advance(0.25), 0.0);
    assert!((tw.advance(0.5) - 0.5).abs() < 1e-12);
    assert!(!tw.is_finished());
    assert_eq!(tw.advance(0.5), 1.0);
    assert!(tw.is_finished());
    assert_eq!(tw.advance(10.0), 1.0);
}

#[test]
fn zero_duration_jumps() {
    let mut tw = Tween::new(0.2f64, 0.9, 0.0, Ease::OutQuad);
    assert_eq!(tw.advance(0.0), 0.9);
    assert!(tw.is_finished());
}

#[test]
fn negative_and_nan_steps_are_ignored() {
    let mut tw = Tween::new(0.0f64, 1.0, 1.0, Ease::Linear);
    assert_eq!(tw.advance(-5.0), 0.0);
    assert_eq!(tw.advance(f64::NAN), 0.0);
}

#[test]
fn quat_tween_slerps_to_target() {
    let to = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let mut tw = Tween::new(Quat::IDENTITY, to, 1.0, Ease::Linear);
    let half = tw.advance(0.5);
    let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
    assert!(half.angle_between(expected) < 1e-4);
    let end = tw.advance(0.5);
    assert_eq!(end, to);
}
