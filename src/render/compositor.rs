use rayon::prelude::*;

use crate::foundation::core::Point;
use crate::foundation::error::{PanoglobeError, PanoglobeResult};
use crate::foundation::math::{mix_px, px_to_u8, smoothstep};
use crate::render::backend::FrameRGBA;
use crate::render::target::ColorBuffer;

/// Parameters of the radial lens warp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistortParams {
    pub strength: f64,
    pub exponent: f64,
}

/// Radial lens warp of a `[0, 1]²` coordinate about the centre.
///
/// Returns `uv` unchanged when the warp denominator is zero or not finite.
pub fn distort(uv: Point, params: DistortParams) -> Point {
    let p0x = 2.0 * uv.x - 1.0;
    let p0y = 2.0 * uv.y - 1.0;
    let len = p0x.hypot(p0y);
    let denom = 1.0 - params.strength * len * params.exponent;
    if denom == 0.0 || !denom.is_finite() {
        return uv;
    }
    Point::new((p0x / denom + 1.0) * 0.5, (p0y / denom + 1.0) * 0.5)
}

/// Cross-fade weight of the panorama input.
pub fn mix_factor(progress: f64) -> f64 {
    smoothstep(0.75, 1.0, progress)
}

/// Warp applied to the planet input: kicks in sharply as progress nears 1.
pub fn planet_distortion(progress: f64) -> DistortParams {
    DistortParams {
        strength: -10.0 * (0.5 + 0.5 * progress).powi(32),
        exponent: 4.0 * progress,
    }
}

/// Warp applied to the panorama input: fades out over the last quarter of progress.
pub fn panorama_distortion(progress: f64) -> DistortParams {
    DistortParams {
        strength: -10.0 * (1.0 - mix_factor(progress)),
        exponent: 4.0 * progress,
    }
}

/// Uniforms of the compositor pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompositorState {
    progress: f64,
    /// Frame counter; available to shaders, unused by the default one.
    pub time: u64,
}

impl CompositorState {
    pub fn new(progress: f64) -> Self {
        let mut s = Self::default();
        s.set_progress(progress);
        s
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Store `progress` clamped to `[0, 1]`; NaN becomes 0.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    pub fn set_time(&mut self, time: u64) {
        self.time = time;
    }
}

/// The two textures bound to the compositor for one frame.
#[derive(Clone, Copy, Debug)]
pub struct ShaderInputs<'a> {
    pub planet: &'a ColorBuffer,
    pub panorama: &'a ColorBuffer,
}

/// Per-pixel program of the compositor pass.
///
/// `uv` is the output pixel centre in `[0, 1]²`, `v = 0` on the top row. Returns a premultiplied
/// colour in `0..=255` per channel.
pub trait CompositeShader: Send + Sync {
    fn shade(&self, uv: Point, inputs: &ShaderInputs<'_>, state: &CompositorState) -> [f32; 4];
}

/// Distortion cross-fade between the planet and panorama inputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistortCrossfade;

impl CompositeShader for DistortCrossfade {
    fn shade(&self, uv: Point, inputs: &ShaderInputs<'_>, state: &CompositorState) -> [f32; 4] {
        let p = state.progress();
        let uv_planet = distort(uv, planet_distortion(p));
        let uv_panorama = distort(uv, panorama_distortion(p));
        let a = inputs.planet.sample(uv_planet.x, uv_planet.y);
        let b = inputs.panorama.sample(uv_panorama.x, uv_panorama.y);
        mix_px(a, b, mix_factor(p) as f32)
    }
}

/// Full-viewport pass combining two offscreen targets into the output frame.
pub struct Compositor {
    shader: Box<dyn CompositeShader>,
    parallel: bool,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            shader: Box::new(DistortCrossfade),
            parallel: true,
        }
    }

    pub fn with_shader(shader: Box<dyn CompositeShader>) -> Self {
        Self {
            shader,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Shade every pixel of `dst`. Both inputs must match the output dimensions.
    #[tracing::instrument(skip_all, fields(progress = state.progress(), time = state.time))]
    pub fn composite(
        &self,
        planet: &ColorBuffer,
        panorama: &ColorBuffer,
        state: &CompositorState,
        dst: &mut FrameRGBA,
    ) -> PanoglobeResult<()> {
        let out = dst.viewport();
        for (name, buf) in [("planet", planet), ("panorama", panorama)] {
            if buf.viewport() != out {
                return Err(PanoglobeError::render(format!(
                    "{name} target is {}x{} but output is {}x{}",
                    buf.width(),
                    buf.height(),
                    out.width,
                    out.height
                )));
            }
        }
        if dst.data.len() != out.byte_len() {
            return Err(PanoglobeError::render("output buffer length mismatch"));
        }

        let inputs = ShaderInputs { planet, panorama };
        let shader = self.shader.as_ref();
        let (w, h) = (f64::from(out.width), f64::from(out.height));
        let row_bytes = out.width as usize * 4;
        let shade_row = |y: usize, row: &mut [u8]| {
            let v = (y as f64 + 0.5) / h;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let uv = Point::new((x as f64 + 0.5) / w, v);
                px.copy_from_slice(&px_to_u8(shader.shade(uv, &inputs, state)));
            }
        };

        if self.parallel {
            dst.data
                .par_chunks_mut(row_bytes)
                .enumerate()
                .for_each(|(y, row)| shade_row(y, row));
        } else {
            for (y, row) in dst.data.chunks_mut(row_bytes).enumerate() {
                shade_row(y, row);
            }
        }
        dst.premultiplied = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
