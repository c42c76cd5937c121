use std::f32::consts::PI;

use rayon::prelude::*;

use crate::assets::store::TextureStore;
use crate::assets::texture::{Texture, Wrap};
use crate::foundation::core::{Quat, Vec3};
use crate::foundation::error::{PanoglobeError, PanoglobeResult};
use crate::foundation::math::{premul_over, px_to_u8};
use crate::render::backend::{RenderSettings, SceneRenderer};
use crate::render::target::ColorBuffer;
use crate::scene::camera::{PerspectiveCamera, Ray, RayGen};
use crate::scene::model::{Material, Scene, Side, Sphere};

/// CPU ray caster for scenes made of textured spheres.
///
/// One primary ray per pixel centre, nearest visible hit wins, unlit shading. Rows are split
/// across the rayon pool when `settings.parallel` is set; the call returns only after every row
/// is written.
#[derive(Debug, Default)]
pub struct CpuRaycaster {
    settings: RenderSettings,
}

impl CpuRaycaster {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }
}

impl SceneRenderer for CpuRaycaster {
    #[tracing::instrument(
        skip_all,
        fields(w = dst.width(), h = dst.height(), objects = scene.objects().len())
    )]
    fn render_scene(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        textures: &TextureStore,
        dst: &mut ColorBuffer,
    ) -> PanoglobeResult<()> {
        if !(camera.near.is_finite() && camera.far.is_finite() && camera.near < camera.far) {
            return Err(PanoglobeError::render(format!(
                "invalid camera clip range near={} far={}",
                camera.near, camera.far
            )));
        }

        // The texture store owns a channel receiver, so resolve maps up front and share only the
        // decoded textures with worker threads.
        let prepared: Vec<PreparedSphere<'_>> = scene
            .objects()
            .iter()
            .map(|obj| PreparedSphere::new(obj, scene.orientation, textures))
            .collect();

        let width = dst.width() as usize;
        let height = dst.height();
        let background = scene.background.to_array();
        let ctx = RowContext {
            camera,
            rays: camera.rays(),
            objects: &prepared,
            background,
            width: dst.width(),
            height,
        };

        let row_bytes = width * 4;
        if self.settings.parallel {
            dst.data_mut()
                .par_chunks_mut(row_bytes)
                .enumerate()
                .for_each(|(y, row)| ctx.shade_row(y as u32, row));
        } else {
            for (y, row) in dst.data_mut().chunks_mut(row_bytes).enumerate() {
                ctx.shade_row(y as u32, row);
            }
        }
        Ok(())
    }
}

struct PreparedSphere<'a> {
    center: Vec3,
    radius: f32,
    /// Group-space to object-local rotation.
    to_local: Quat,
    material: &'a Material,
    texture: Option<&'a Texture>,
}

impl<'a> PreparedSphere<'a> {
    fn new(obj: &'a Sphere, orientation: Quat, textures: &'a TextureStore) -> Self {
        let world_rot = (orientation * obj.rotation).normalize();
        Self {
            center: orientation * obj.center,
            radius: obj.radius,
            to_local: world_rot.inverse(),
            material: &obj.material,
            texture: obj.material.map.and_then(|h| textures.get(h)),
        }
    }

    fn shade(&self, hit: Vec3) -> [u8; 4] {
        let Some(tex) = self.texture else {
            return self.material.placeholder.to_array();
        };
        let local = self.to_local * (hit - self.center);
        let (mut u, v) = sphere_uv(local / self.radius);
        if self.material.mirror_u {
            u = 1.0 - u;
        }
        let texel = tex.sample(f64::from(u), f64::from(v), Wrap::Repeat, Wrap::ClampToEdge);
        let tint = self.material.color.to_array();
        let mut out = [0.0f32; 4];
        for i in 0..4 {
            out[i] = texel[i] * f32::from(tint[i]) / 255.0;
        }
        px_to_u8(out)
    }
}

struct RowContext<'a> {
    camera: &'a PerspectiveCamera,
    rays: RayGen,
    objects: &'a [PreparedSphere<'a>],
    background: [u8; 4],
    width: u32,
    height: u32,
}

impl RowContext<'_> {
    fn shade_row(&self, y: u32, row: &mut [u8]) {
        let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / self.height as f32;
        for (x, px) in row.chunks_exact_mut(4).enumerate().take(self.width as usize) {
            let ndc_x = 2.0 * (x as f32 + 0.5) / self.width as f32 - 1.0;
            let ray = self.rays.through(ndc_x, ndc_y);
            let color = match self.closest_hit(&ray) {
                Some((obj, t)) => premul_over(self.background, obj.shade(ray.at(t))),
                None => self.background,
            };
            px.copy_from_slice(&color);
        }
    }

    fn closest_hit(&self, ray: &Ray) -> Option<(&PreparedSphere<'_>, f32)> {
        let cos_view = ray.dir.dot(self.rays.forward());
        let mut best: Option<(&PreparedSphere<'_>, f32)> = None;
        for obj in self.objects {
            let Some((t0, t1)) = intersect_sphere(ray, obj.center, obj.radius) else {
                continue;
            };
            let in_clip = |t: f32| {
                let depth = t * cos_view;
                depth >= self.camera.near && depth <= self.camera.far
            };
            let candidate = match obj.material.side {
                Side::Front => Some(t0).filter(|&t| in_clip(t)),
                Side::Back => Some(t1).filter(|&t| in_clip(t)),
                Side::Double => [t0, t1].into_iter().find(|&t| in_clip(t)),
            };
            if let Some(t) = candidate
                && best.is_none_or(|(_, bt)| t < bt)
            {
                best = Some((obj, t));
            }
        }
        best
    }
}

/// Entry and exit distances of `ray` through a sphere, `t0 <= t1`.
pub(crate) fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<(f32, f32)> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 || !disc.is_finite() {
        return None;
    }
    let s = disc.sqrt();
    Some((-b - s, -b + s))
}

/// Equirectangular coordinates of a unit direction in the layout of a standard UV sphere.
///
/// `u` runs around the Y axis starting at `-X`; `v` is measured from the north pole (top row).
pub(crate) fn sphere_uv(n: Vec3) -> (f32, f32) {
    let mut u = n.z.atan2(-n.x) / (2.0 * PI);
    if u < 0.0 {
        u += 1.0;
    }
    let v = n.y.clamp(-1.0, 1.0).acos() / PI;
    (u, v)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
