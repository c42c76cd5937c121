use std::f32::consts::PI;

use crate::foundation::core::Vec3;
use crate::scene::camera::PerspectiveCamera;

const EPS: f32 = 1e-6;

/// Pointer input routed to scene controllers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlInput {
    /// Pointer drag in pixels; `viewport_height` normalizes the drag into an angle.
    Drag {
        dx: f32,
        dy: f32,
        viewport_height: f32,
    },
    /// Positive values zoom in, negative values zoom out.
    Zoom { delta: f32 },
}

/// Interactive camera controller attached to a scene.
pub trait SceneController: Send {
    /// Accumulate input. Called while draining the input queue, before `update`.
    fn handle_input(&mut self, input: &ControlInput);

    /// Integrate accumulated motion into `camera`. Returns `true` when the camera moved.
    fn update(&mut self, camera: &mut PerspectiveCamera, dt: f64) -> bool;
}

/// Orbit controller: rotates the camera around `target` on a sphere, with optional damping.
///
/// With damping enabled, each update applies `damping_factor` of the pending rotation and decays
/// the remainder by `1 - damping_factor`, so motion glides to a stop over several frames.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits in radians, measured from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Multiply the pending orbit radius scale; values below 1 move closer.
    pub fn dolly(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// `true` while rotation remains to be applied.
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > EPS || self.delta_phi.abs() > EPS || (self.scale - 1.0).abs() > EPS
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }
}

impl SceneController for OrbitControls {
    fn handle_input(&mut self, input: &ControlInput) {
        match *input {
            ControlInput::Drag {
                dx,
                dy,
                viewport_height,
            } => {
                let h = viewport_height.max(1.0);
                self.rotate_left(2.0 * PI * dx / h * self.rotate_speed);
                self.rotate_up(2.0 * PI * dy / h * self.rotate_speed);
            }
            ControlInput::Zoom { delta } => {
                if delta > 0.0 {
                    self.dolly(self.zoom_scale());
                } else if delta < 0.0 {
                    self.dolly(1.0 / self.zoom_scale());
                }
            }
        }
    }

    fn update(&mut self, camera: &mut PerspectiveCamera, _dt: f64) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI * 0.5
        };

        if self.enable_damping {
            theta += self.delta_theta * self.damping_factor;
            phi += self.delta_phi * self.damping_factor;
        } else {
            theta += self.delta_theta;
            phi += self.delta_phi;
        }

        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        let new_position = self.target + new_offset;
        let moved = (new_position - camera.position).length_squared() > EPS * EPS;

        camera.position = new_position;
        camera.look_at(self.target);

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        moved
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/controls.rs"]
mod tests;
