use crate::assets::store::TextureHandle;
use crate::foundation::core::{Quat, Rgba8Premul, Vec3};

/// Which faces of a surface are visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Faces whose normal points towards the viewer.
    #[default]
    Front,
    /// Inside faces only; used for panoramas viewed from within.
    Back,
    Double,
}

/// Unlit surface description.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Tint multiplied with the texture once it is available.
    pub color: Rgba8Premul,
    /// Colour drawn while the texture is pending or failed to load.
    pub placeholder: Rgba8Premul,
    pub map: Option<TextureHandle>,
    /// Mirror the texture horizontally (`u -> 1 - u`).
    pub mirror_u: bool,
    pub side: Side,
}

impl Material {
    pub fn solid(color: Rgba8Premul) -> Self {
        Self {
            color,
            placeholder: color,
            map: None,
            mirror_u: false,
            side: Side::Front,
        }
    }

    pub fn textured(map: TextureHandle, placeholder: Rgba8Premul) -> Self {
        Self {
            color: Rgba8Premul::WHITE,
            placeholder,
            map: Some(map),
            mirror_u: false,
            side: Side::Front,
        }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn mirrored(mut self, mirror_u: bool) -> Self {
        self.mirror_u = mirror_u;
        self
    }
}

/// Textured sphere, the only primitive the demo scenes need.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    /// Centre in group space.
    pub center: Vec3,
    pub radius: f32,
    /// Local orientation; the texture seam follows it.
    pub rotation: Quat,
    pub material: Material,
    /// Radians added about the local Y axis every frame.
    pub spin_per_frame: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            rotation: Quat::IDENTITY,
            material,
            spin_per_frame: 0.0,
        }
    }

    pub fn with_spin(mut self, radians_per_frame: f32) -> Self {
        self.spin_per_frame = radians_per_frame;
        self
    }
}

/// A set of spheres sharing one group orientation, drawn over a background colour.
///
/// `orientation` rotates every object about the origin; it is what the location focus animation
/// drives on the globe scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub background: Rgba8Premul,
    pub orientation: Quat,
    objects: Vec<Sphere>,
}

impl Scene {
    pub fn new(background: Rgba8Premul) -> Self {
        Self {
            background,
            orientation: Quat::IDENTITY,
            objects: Vec::new(),
        }
    }

    /// Add an object and return its index.
    pub fn add(&mut self, sphere: Sphere) -> usize {
        self.objects.push(sphere);
        self.objects.len() - 1
    }

    pub fn objects(&self) -> &[Sphere] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [Sphere] {
        &mut self.objects
    }

    /// Advance per-object spin by one frame.
    pub fn spin(&mut self) {
        for obj in &mut self.objects {
            if obj.spin_per_frame != 0.0 {
                obj.rotation =
                    (obj.rotation * Quat::from_rotation_y(obj.spin_per_frame)).normalize();
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
