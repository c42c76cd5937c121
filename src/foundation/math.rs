//! Scalar helpers mirroring the shading-language built-ins used by the compositor.

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Hermite interpolation between `edge0` and `edge1`, clamped to `[0, 1]`.
///
/// Degenerate edges behave like a step at `edge0`.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend `a * (1 - t) + b * t`.
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Blend two premultiplied pixels channel by channel.
pub(crate) fn mix_px(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for i in 0..4 {
        out[i] = a[i] + (b[i] - a[i]) * t;
    }
    out
}

/// Round a float pixel back into RGBA8.
pub(crate) fn px_to_u8(px: [f32; 4]) -> [u8; 4] {
    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = px[i];
        out[i] = if v.is_finite() {
            v.round().clamp(0.0, 255.0) as u8
        } else {
            0
        };
    }
    out
}

/// Premultiplied source-over: `src + dst * (1 - src.a)`.
pub(crate) fn premul_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
