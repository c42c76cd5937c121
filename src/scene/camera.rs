use crate::foundation::core::Vec3;

/// Half-line with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Right-handed, Y-up perspective camera looking from `position` towards `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Width over height of the surface this camera renders into.
    pub aspect: f32,
    /// Near clip distance, measured along the view direction.
    pub near: f32,
    /// Far clip distance, measured along the view direction.
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_deg,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }

    /// Move the camera, keeping its target.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Orthonormal `(forward, right, up)` basis.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z);
        let right = forward.cross(self.up).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// Ray through normalized device coordinates (`x` right, `y` up, both in `[-1, 1]`).
    pub fn ray_through(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        self.rays().through(ndc_x, ndc_y)
    }

    /// Per-frame ray generator; basis and fov scale are computed once.
    pub fn rays(&self) -> RayGen {
        let (forward, right, up) = self.basis();
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();
        RayGen {
            origin: self.position,
            forward,
            right: right * (tan_half * self.aspect),
            up: up * tan_half,
        }
    }
}

/// Primary-ray generator for one camera state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayGen {
    origin: Vec3,
    forward: Vec3,
    /// Camera right scaled to the half-width of the image plane at unit distance.
    right: Vec3,
    /// Camera up scaled to the half-height of the image plane at unit distance.
    up: Vec3,
}

impl RayGen {
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn through(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let dir = self.forward + self.right * ndc_x + self.up * ndc_y;
        Ray {
            origin: self.origin,
            dir: dir.try_normalize().unwrap_or(self.forward),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/camera.rs"]
mod tests;
