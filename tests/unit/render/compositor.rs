use super::*;
use crate::foundation::core::{Rgba8Premul, Viewport};

fn vp(w: u32, h: u32) -> Viewport {
    Viewport::new(w, h).unwrap()
}

fn solid(v: Viewport, c: Rgba8Premul) -> ColorBuffer {
    let mut b = ColorBuffer::new(v).unwrap();
    b.fill(c);
    b
}

fn gradient(v: Viewport) -> ColorBuffer {
    let mut b = ColorBuffer::new(v).unwrap();
    let w = v.width as usize;
    for (i, px) in b.data_mut().chunks_exact_mut(4).enumerate() {
        px.copy_from_slice(&[(i % w * 20) as u8, (i / w * 30) as u8, 7, 255]);
    }
    b
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12
}

#[test]
fn zero_exponent_is_identity() {
    let uv = Point::new(0.2, 0.9);
    let out = distort(
        uv,
        DistortParams {
            strength: -10.0,
            exponent: 0.0,
        },
    );
    assert!(close(out, uv));
}

#[test]
fn centre_never_moves() {
    for p in [0.0, 0.3, 0.75, 1.0] {
        let c = Point::new(0.5, 0.5);
        assert!(close(distort(c, planet_distortion(p)), c));
        assert!(close(distort(c, panorama_distortion(p)), c));
    }
}

#[test]
fn distortion_is_defined_at_boundary_progress() {
    let uvs = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.25, 0.8),
        Point::new(0.5, 0.0),
    ];
    for p in [0.0, 0.75, 1.0] {
        for uv in uvs {
            let a = distort(uv, planet_distortion(p));
            let b = distort(uv, panorama_distortion(p));
            assert!(a.x.is_finite() && a.y.is_finite(), "planet p={p} uv={uv:?}");
            assert!(b.x.is_finite() && b.y.is_finite(), "panorama p={p} uv={uv:?}");
        }
    }
}

#[test]
fn negative_strength_pulls_towards_centre() {
    let uv = Point::new(1.0, 0.5);
    let out = distort(uv, planet_distortion(1.0));
    // p0 = (1, 0), denom = 1 + 10 * 4 = 41.
    assert!((out.x - (1.0 / 41.0 + 1.0) * 0.5).abs() < 1e-12);
    assert!((out.y - 0.5).abs() < 1e-12);
}

#[test]
fn zero_denominator_returns_input() {
    let uv = Point::new(1.0, 0.5);
    let out = distort(
        uv,
        DistortParams {
            strength: 1.0,
            exponent: 1.0,
        },
    );
    assert!(close(out, uv));
}

#[test]
fn distortion_curves_at_key_points() {
    assert_eq!(planet_distortion(1.0).strength, -10.0);
    assert_eq!(planet_distortion(1.0).exponent, 4.0);
    assert!(planet_distortion(0.5).strength.abs() < 2e-3);

    assert_eq!(panorama_distortion(0.0).strength, -10.0);
    assert_eq!(panorama_distortion(0.75).strength, -10.0);
    assert_eq!(panorama_distortion(1.0).strength, 0.0);

    assert_eq!(mix_factor(0.0), 0.0);
    assert_eq!(mix_factor(0.5), 0.0);
    assert_eq!(mix_factor(0.875), 0.5);
    assert_eq!(mix_factor(1.0), 1.0);
}

#[test]
fn state_clamps_progress() {
    let mut s = CompositorState::new(2.0);
    assert_eq!(s.progress(), 1.0);
    s.set_progress(-0.5);
    assert_eq!(s.progress(), 0.0);
    s.set_progress(f64::NAN);
    assert_eq!(s.progress(), 0.0);
    s.set_progress(0.4);
    assert_eq!(s.progress(), 0.4);
}

#[test]
fn progress_zero_is_undistorted_planet() {
    let v = vp(7, 5);
    let a = gradient(v);
    let b = solid(v, Rgba8Premul::opaque(0, 0, 255));
    let mut out = FrameRGBA::blank(v);
    Compositor::new()
        .composite(&a, &b, &CompositorState::new(0.0), &mut out)
        .unwrap();
    assert_eq!(out.data, a.data());
}

#[test]
fn progress_one_is_undistorted_panorama() {
    let v = vp(7, 5);
    let a = solid(v, Rgba8Premul::opaque(255, 0, 0));
    let b = gradient(v);
    let mut out = FrameRGBA::blank(v);
    Compositor::new()
        .with_parallel(false)
        .composite(&a, &b, &CompositorState::new(1.0), &mut out)
        .unwrap();
    assert_eq!(out.data, b.data());
}

#[test]
fn mid_transition_blends_at_centre() {
    let v = vp(5, 5);
    let a = solid(v, Rgba8Premul::opaque(255, 0, 0));
    let b = solid(v, Rgba8Premul::opaque(0, 0, 255));
    let mut out = FrameRGBA::blank(v);
    Compositor::new()
        .composite(&a, &b, &CompositorState::new(0.875), &mut out)
        .unwrap();
    assert_eq!(out.center_pixel(), [128, 0, 128, 255]);
}

#[test]
fn out_of_range_progress_does_not_panic() {
    let v = vp(4, 4);
    let a = gradient(v);
    let b = solid(v, Rgba8Premul::WHITE);
    let mut out = FrameRGBA::blank(v);
    for p in [-3.0, 7.0, f64::INFINITY, f64::NAN] {
        Compositor::new()
            .composite(&a, &b, &CompositorState::new(p), &mut out)
            .unwrap();
    }
}

#[test]
fn mismatched_inputs_are_rejected() {
    let a = solid(vp(4, 4), Rgba8Premul::WHITE);
    let b = solid(vp(4, 3), Rgba8Premul::WHITE);
    let mut out = FrameRGBA::blank(vp(4, 4));
    let err = Compositor::new()
        .composite(&a, &b, &CompositorState::default(), &mut out)
        .unwrap_err();
    assert!(matches!(err, PanoglobeError::Render(_)));
}

struct UvShader;

impl CompositeShader for UvShader {
    fn shade(&self, uv: Point, _inputs: &ShaderInputs<'_>, state: &CompositorState) -> [f32; 4] {
        [
            (uv.x * 255.0) as f32,
            (uv.y * 255.0) as f32,
            state.time as f32,
            255.0,
        ]
    }
}

#[test]
fn custom_shader_sees_pixel_centres_and_time() {
    let v = vp(2, 2);
    let a = solid(v, Rgba8Premul::WHITE);
    let mut out = FrameRGBA::blank(v);
    let mut state = CompositorState::default();
    state.set_time(9);
    Compositor::with_shader(Box::new(UvShader))
        .composite(&a, &a, &state, &mut out)
        .unwrap();
    assert_eq!(out.pixel(0, 0), [64, 64, 9, 255]);
    assert_eq!(out.pixel(1, 1), [191, 191, 9, 255]);
}
