use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{PanoglobeError, PanoglobeResult};

/// Texture addressing mode along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    /// Coordinates wrap around (`u = 1.25` samples like `u = 0.25`).
    Repeat,
    /// Coordinates clamp to the outermost texel centres.
    ClampToEdge,
}

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    /// Row-major, tightly packed.
    rgba8_premul: Arc<Vec<u8>>,
}

impl Texture {
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> PanoglobeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PanoglobeError::asset("texture size overflow"))?;
        if width == 0 || height == 0 {
            return Err(PanoglobeError::asset("texture must be non-empty"));
        }
        if data.len() != expected {
            return Err(PanoglobeError::asset(format!(
                "texture data length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> PanoglobeResult<Self> {
        let px = color.to_array();
        let n = (width as usize).saturating_mul(height as usize);
        let mut data = Vec::with_capacity(n.saturating_mul(4));
        for _ in 0..n {
            data.extend_from_slice(&px);
        }
        Self::from_premul_rgba8(width, height, data)
    }

    /// Decode any format supported by `image` and premultiply alpha.
    pub fn decode(bytes: &[u8]) -> PanoglobeResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode texture from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut data = rgba.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        let d = &self.rgba8_premul;
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }

    /// Bilinear sample at normalized `(u, v)` with `v = 0` on the top row.
    pub fn sample(&self, u: f64, v: f64, wrap_u: Wrap, wrap_v: Wrap) -> [f32; 4] {
        sample_bilinear_rgba8(
            &self.rgba8_premul,
            self.width,
            self.height,
            u,
            v,
            wrap_u,
            wrap_v,
        )
    }
}

/// Bilinear filtering over a tightly packed RGBA8 buffer.
///
/// Texel centres sit at `(i + 0.5) / len`, so sampling exactly at a centre returns that texel.
/// Non-finite coordinates sample the first texel on that axis.
pub(crate) fn sample_bilinear_rgba8(
    data: &[u8],
    width: u32,
    height: u32,
    u: f64,
    v: f64,
    wrap_u: Wrap,
    wrap_v: Wrap,
) -> [f32; 4] {
    if width == 0 || height == 0 {
        return [0.0; 4];
    }
    let (x0, x1, fx) = axis_taps(u, width, wrap_u);
    let (y0, y1, fy) = axis_taps(v, height, wrap_v);

    let w = width as usize;
    let at = |x: usize, y: usize, c: usize| -> f32 { f32::from(data[(y * w + x) * 4 + c]) };

    let mut out = [0.0f32; 4];
    for (c, slot) in out.iter_mut().enumerate() {
        let top = at(x0, y0, c) * (1.0 - fx) + at(x1, y0, c) * fx;
        let bottom = at(x0, y1, c) * (1.0 - fx) + at(x1, y1, c) * fx;
        *slot = top * (1.0 - fy) + bottom * fy;
    }
    out
}

fn axis_taps(coord: f64, len: u32, wrap: Wrap) -> (usize, usize, f32) {
    let coord = if coord.is_finite() { coord } else { 0.0 };
    let pos = coord * f64::from(len) - 0.5;
    let base = pos.floor();
    let frac = (pos - base) as f32;
    let base = base as i64;
    let len = i64::from(len);
    let resolve = |i: i64| -> usize {
        match wrap {
            Wrap::Repeat => i.rem_euclid(len) as usize,
            Wrap::ClampToEdge => i.clamp(0, len - 1) as usize,
        }
    };
    (resolve(base), resolve(base + 1), frac)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/texture.rs"]
mod tests;
