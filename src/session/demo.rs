use std::path::Path;

use crate::assets::store::TextureStore;
use crate::config::{DemoConfig, SceneConfig};
use crate::foundation::core::Vec3;
use crate::foundation::error::PanoglobeResult;
use crate::render::backend::SceneRenderer;
use crate::scene::camera::PerspectiveCamera;
use crate::scene::controls::{OrbitControls, SceneController};
use crate::scene::model::{Material, Scene, Side, Sphere};
use crate::session::pipeline::{Pipeline, PipelineOpts};

/// Build the panorama/globe pipeline described by `cfg`.
///
/// Texture paths are resolved against `assets_root` and loaded in the background; until they
/// arrive (or if they fail) spheres draw their placeholder colour.
#[tracing::instrument(skip_all, fields(assets_root = %assets_root.display()))]
pub fn build_demo(
    cfg: &DemoConfig,
    assets_root: &Path,
    renderer: Box<dyn SceneRenderer>,
) -> PanoglobeResult<Pipeline> {
    cfg.validate()?;
    let t = &cfg.transition;
    let opts = PipelineOpts {
        focus_duration_secs: t.focus_duration_secs,
        focus_ease: t.focus_ease,
        transition_delay_secs: t.delay_secs,
        transition_duration_secs: t.duration_secs,
        transition_ease: t.ease,
        ..PipelineOpts::default()
    };
    let mut pipeline = Pipeline::new(cfg.viewport, renderer, opts)?;

    let mut planet = Scene::new(cfg.planet.background.to_rgba8_premul());
    let globe = sphere_material(&cfg.planet, assets_root, pipeline.textures_mut());
    let globe_radius = cfg.planet.sphere.radius;
    planet.add(Sphere::new(Vec3::ZERO, globe_radius, globe));
    if cfg.markers.enabled {
        let color = cfg.markers.color.to_rgba8_premul();
        for loc in &cfg.locations {
            planet.add(
                Sphere::new(
                    loc.position() * globe_radius,
                    cfg.markers.scale * globe_radius,
                    Material::solid(color),
                )
                .with_spin(cfg.markers.spin_per_frame),
            );
        }
    }

    let mut panorama = Scene::new(cfg.panorama.background.to_rgba8_premul());
    let pano = sphere_material(&cfg.panorama, assets_root, pipeline.textures_mut())
        .with_side(Side::Back);
    panorama.add(Sphere::new(Vec3::ZERO, cfg.panorama.sphere.radius, pano));

    let planet_cam = camera(&cfg.planet);
    let planet_ctl = controller(&cfg.planet);
    let planet = pipeline.add_scene(planet, planet_cam, Some(planet_ctl))?;
    let pano_cam = camera(&cfg.panorama);
    let pano_ctl = controller(&cfg.panorama);
    let panorama = pipeline.add_scene(panorama, pano_cam, Some(pano_ctl))?;

    pipeline.set_blend_inputs(planet, panorama)?;
    pipeline.set_locations(cfg.locations.clone());
    pipeline.set_progress_now(cfg.progress);

    tracing::info!(
        width = cfg.viewport.width,
        height = cfg.viewport.height,
        locations = cfg.locations.len(),
        "demo pipeline ready"
    );
    Ok(pipeline)
}

fn sphere_material(cfg: &SceneConfig, assets_root: &Path, textures: &mut TextureStore) -> Material {
    let placeholder = cfg.sphere.placeholder.to_rgba8_premul();
    let material = match &cfg.sphere.texture {
        Some(rel) => Material::textured(textures.load_async(assets_root.join(rel)), placeholder),
        None => Material::solid(placeholder),
    };
    material.mirrored(cfg.sphere.mirror)
}

fn camera(cfg: &SceneConfig) -> PerspectiveCamera {
    let c = &cfg.camera;
    let mut cam = PerspectiveCamera::new(c.fov_deg, 1.0, c.near, c.far)
        .with_position(Vec3::new(0.0, 0.0, c.distance));
    cam.look_at(Vec3::ZERO);
    cam
}

fn controller(cfg: &SceneConfig) -> Box<dyn SceneController> {
    let ctl = OrbitControls::new(Vec3::ZERO);
    match cfg.camera.damping {
        Some(f) => Box::new(ctl.with_damping(f)),
        None => Box::new(ctl),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/demo.rs"]
mod tests;
