use crate::assets::store::TextureStore;
use crate::foundation::core::Viewport;
use crate::foundation::error::PanoglobeResult;
use crate::render::target::ColorBuffer;
use crate::scene::camera::PerspectiveCamera;
use crate::scene::model::Scene;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag is included to make this explicit
/// at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Transparent frame covering `viewport`.
    pub fn blank(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            data: vec![0; viewport.byte_len()],
            premultiplied: true,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`; out-of-bounds coordinates clamp to the edge.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width.saturating_sub(1)) as usize;
        let y = y.min(self.height.saturating_sub(1)) as usize;
        let i = (y * self.width as usize + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn center_pixel(&self) -> [u8; 4] {
        self.pixel(self.width / 2, self.height / 2)
    }

    /// Straight-alpha copy of the pixels, as expected by image encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            for px in out.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 || a == 255 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        out
    }
}

/// The 3D renderer the pipeline draws scenes with.
///
/// Implementations draw `scene` as seen through `camera` into `dst`, overwriting every pixel.
/// Textures that are not ready must be treated as a normal transient state.
pub trait SceneRenderer: Send {
    fn render_scene(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        textures: &TextureStore,
        dst: &mut ColorBuffer,
    ) -> PanoglobeResult<()>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU ray caster for textured spheres.
    #[default]
    Cpu,
    /// Fills each target with its scene's background colour. Used for pipeline diagnostics.
    Flat,
}

/// Backend-agnostic settings.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Split rows across the rayon pool.
    pub parallel: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Renderer that ignores geometry and fills the target with the scene background.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatRenderer;

impl SceneRenderer for FlatRenderer {
    fn render_scene(
        &mut self,
        scene: &Scene,
        _camera: &PerspectiveCamera,
        _textures: &TextureStore,
        dst: &mut ColorBuffer,
    ) -> PanoglobeResult<()> {
        dst.fill(scene.background);
        Ok(())
    }
}

/// Create a rendering backend implementation.
pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> PanoglobeResult<Box<dyn SceneRenderer>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuRaycaster::new(
            settings.clone(),
        ))),
        BackendKind::Flat => Ok(Box::new(FlatRenderer)),
    }
}

