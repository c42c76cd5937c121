use super::*;

#[test]
fn fps_frame_duration() {
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
    assert!((fps.frames_to_secs(30) - 0.5).abs() < 1e-12);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn viewport_rejects_empty_and_oversized() {
    assert!(Viewport::new(0, 10).is_err());
    assert!(Viewport::new(10, 0).is_err());
    assert!(Viewport::new(Viewport::MAX_EDGE + 1, 10).is_err());

    let v = Viewport::new(8, 4).unwrap();
    assert_eq!(v.aspect(), 2.0);
    assert_eq!(v.byte_len(), 8 * 4 * 4);
}

#[test]
fn hex_colour_is_opaque() {
    let c = Rgba8Premul::from_hex(0x9ec3e9);
    assert_eq!(c.to_array(), [0x9e, 0xc3, 0xe9, 255]);
    assert_eq!(Rgba8Premul::from_hex(0xffffff), Rgba8Premul::WHITE);
}

#[test]
fn straight_to_premul_scales_channels() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
}

#[test]
fn frame_clock_is_monotonic() {
    let mut clock = FrameClock::new();
    assert_eq!(clock.frame(), FrameIndex(0));
    clock.tick();
    clock.tick();
    assert_eq!(clock.frame(), FrameIndex(2));
    assert_eq!(clock.time(), 2);
}
