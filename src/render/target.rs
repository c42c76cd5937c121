use crate::assets::store::TextureStore;
use crate::assets::texture::{Wrap, sample_bilinear_rgba8};
use crate::foundation::core::{Rgba8Premul, Viewport};
use crate::foundation::error::{PanoglobeError, PanoglobeResult};
use crate::render::backend::SceneRenderer;
use crate::scene::camera::PerspectiveCamera;
use crate::scene::model::Scene;

/// Premultiplied RGBA8 colour attachment backed by a CPU pixmap.
pub struct ColorBuffer {
    pixmap: vello_cpu::Pixmap,
}

impl ColorBuffer {
    /// Allocate a cleared (transparent) buffer.
    pub fn new(viewport: Viewport) -> PanoglobeResult<Self> {
        let w: u16 = viewport.width.try_into().map_err(|_| {
            PanoglobeError::target(format!("target width exceeds u16: {}", viewport.width))
        })?;
        let h: u16 = viewport.height.try_into().map_err(|_| {
            PanoglobeError::target(format!("target height exceeds u16: {}", viewport.height))
        })?;
        if w == 0 || h == 0 {
            return Err(PanoglobeError::target(format!(
                "target must be non-empty, got {}x{}",
                viewport.width, viewport.height
            )));
        }
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub fn fill(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for dst in self.data_mut().chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    pub fn clear(&mut self) {
        self.data_mut().fill(0);
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width() - 1) as usize;
        let y = y.min(self.height() - 1) as usize;
        let i = (y * self.width() as usize + x) * 4;
        let d = self.data();
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }

    /// Linear-filtered, clamp-to-edge read at normalized `(u, v)` (`v = 0` is the top row).
    pub fn sample(&self, u: f64, v: f64) -> [f32; 4] {
        sample_bilinear_rgba8(
            self.data(),
            self.width(),
            self.height(),
            u,
            v,
            Wrap::ClampToEdge,
            Wrap::ClampToEdge,
        )
    }
}

impl std::fmt::Debug for ColorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Handle to a target owned by a [`TargetPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(pub(crate) u32);

/// Where draw calls currently land.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Destination {
    /// The visible framebuffer.
    #[default]
    Screen,
    Target(TargetId),
}

/// Offscreen colour target sized to the viewport.
#[derive(Debug)]
pub struct RenderTarget {
    id: TargetId,
    buffer: ColorBuffer,
    /// Bumped on every reallocation.
    generation: u64,
}

impl RenderTarget {
    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn buffer(&self) -> &ColorBuffer {
        &self.buffer
    }

    pub fn viewport(&self) -> Viewport {
        self.buffer.viewport()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Pool configuration.
#[derive(Debug, Clone, Copy)]
pub struct TargetPoolOpts {
    /// Upper bound on bytes held by all targets together.
    pub max_pool_bytes: usize,
}

impl Default for TargetPoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 512 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TargetPoolStats {
    pub live_targets: usize,
    pub live_bytes: usize,
    pub alloc_targets: u64,
    pub alloc_bytes: u64,
    pub resizes: u64,
}

/// Owner of every offscreen target plus the current render destination.
pub struct TargetPool {
    opts: TargetPoolOpts,
    stats: TargetPoolStats,
    targets: Vec<RenderTarget>,
    active: Destination,
}

impl TargetPool {
    pub fn new(opts: TargetPoolOpts) -> Self {
        Self {
            opts,
            stats: TargetPoolStats::default(),
            targets: Vec::new(),
            active: Destination::Screen,
        }
    }

    pub fn stats(&self) -> TargetPoolStats {
        self.stats
    }

    pub fn active(&self) -> Destination {
        self.active
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Allocate a target sized exactly to `viewport`.
    pub fn create_target(&mut self, viewport: Viewport) -> PanoglobeResult<TargetId> {
        let bytes = viewport.byte_len();
        self.check_budget(bytes, 0)?;
        let buffer = ColorBuffer::new(viewport)?;

        let id = TargetId(self.targets.len() as u32);
        self.targets.push(RenderTarget {
            id,
            buffer,
            generation: 0,
        });
        self.stats.live_targets += 1;
        self.stats.live_bytes = self.stats.live_bytes.saturating_add(bytes);
        self.stats.alloc_targets = self.stats.alloc_targets.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(bytes as u64);
        tracing::debug!(
            target_id = id.0,
            width = viewport.width,
            height = viewport.height,
            "render target allocated"
        );
        Ok(id)
    }

    /// Reallocate a target at a new size. Contents are discarded.
    pub fn resize(&mut self, id: TargetId, viewport: Viewport) -> PanoglobeResult<()> {
        let idx = self.index(id)?;
        let old = self.targets[idx].viewport();
        if old == viewport {
            return Ok(());
        }
        let new_bytes = viewport.byte_len();
        self.check_budget(new_bytes, old.byte_len())?;
        let buffer = ColorBuffer::new(viewport)?;

        let t = &mut self.targets[idx];
        t.buffer = buffer;
        t.generation += 1;
        self.stats.live_bytes = self
            .stats
            .live_bytes
            .saturating_sub(old.byte_len())
            .saturating_add(new_bytes);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(new_bytes as u64);
        self.stats.resizes += 1;
        Ok(())
    }

    /// Reallocate every target at `viewport`.
    ///
    /// All-or-nothing: the budget is checked for the whole pool and every buffer is allocated
    /// before any is swapped in, so on error every target keeps its previous size and contents.
    pub fn resize_all(&mut self, viewport: Viewport) -> PanoglobeResult<()> {
        let stale: Vec<usize> = (0..self.targets.len())
            .filter(|&i| self.targets[i].viewport() != viewport)
            .collect();
        if stale.is_empty() {
            return Ok(());
        }
        let release: usize = stale
            .iter()
            .map(|&i| self.targets[i].viewport().byte_len())
            .sum();
        let new_bytes = viewport.byte_len();
        let added = new_bytes.saturating_mul(stale.len());
        self.check_budget(added, release)?;

        let buffers = stale
            .iter()
            .map(|_| ColorBuffer::new(viewport))
            .collect::<PanoglobeResult<Vec<_>>>()?;
        for (idx, buffer) in stale.into_iter().zip(buffers) {
            let t = &mut self.targets[idx];
            t.buffer = buffer;
            t.generation += 1;
            self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(new_bytes as u64);
            self.stats.resizes += 1;
        }
        self.stats.live_bytes = self
            .stats
            .live_bytes
            .saturating_sub(release)
            .saturating_add(added);
        Ok(())
    }

    pub fn get(&self, id: TargetId) -> PanoglobeResult<&RenderTarget> {
        Ok(&self.targets[self.index(id)?])
    }

    /// Make `id` the active destination until the returned guard is dropped.
    pub fn bind(&mut self, id: TargetId) -> PanoglobeResult<BoundTarget<'_>> {
        let idx = self.index(id)?;
        let previous = self.active;
        self.active = Destination::Target(id);
        Ok(BoundTarget {
            pool: self,
            idx,
            previous,
        })
    }

    /// Render `scene` into target `id`.
    ///
    /// The previous destination is restored on every exit path, including renderer errors.
    pub fn render_into(
        &mut self,
        id: TargetId,
        renderer: &mut dyn SceneRenderer,
        scene: &Scene,
        camera: &PerspectiveCamera,
        textures: &TextureStore,
    ) -> PanoglobeResult<()> {
        let mut bound = self.bind(id)?;
        renderer.render_scene(scene, camera, textures, bound.buffer_mut())
    }

    fn index(&self, id: TargetId) -> PanoglobeResult<usize> {
        let idx = id.0 as usize;
        if idx < self.targets.len() {
            Ok(idx)
        } else {
            Err(PanoglobeError::target(format!("unknown render target {}", id.0)))
        }
    }

    fn check_budget(&self, add: usize, release: usize) -> PanoglobeResult<()> {
        let next = self
            .stats
            .live_bytes
            .saturating_sub(release)
            .saturating_add(add);
        if next > self.opts.max_pool_bytes {
            return Err(PanoglobeError::target(format!(
                "target pool budget exceeded: {next} bytes > {} bytes",
                self.opts.max_pool_bytes
            )));
        }
        Ok(())
    }
}

/// Scope guard for an active offscreen destination.
pub struct BoundTarget<'a> {
    pool: &'a mut TargetPool,
    idx: usize,
    previous: Destination,
}

impl BoundTarget<'_> {
    pub fn id(&self) -> TargetId {
        self.pool.targets[self.idx].id
    }

    pub fn buffer_mut(&mut self) -> &mut ColorBuffer {
        &mut self.pool.targets[self.idx].buffer
    }
}

impl Drop for BoundTarget<'_> {
    fn drop(&mut self) {
        self.pool.active = self.previous;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
