use crate::foundation::error::{PanoglobeError, PanoglobeResult};
use crate::scene::camera::PerspectiveCamera;
use crate::scene::controls::{ControlInput, SceneController};
use crate::scene::model::Scene;

/// Stable handle to a registered scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneHandle(pub(crate) u32);

struct SceneEntry {
    scene: Scene,
    camera: PerspectiveCamera,
    controller: Option<Box<dyn SceneController>>,
}

/// Owns every scene, its camera and its optional controller.
///
/// Scenes live until the registry is dropped; handles are never reused.
#[derive(Default)]
pub struct SceneRegistry {
    entries: Vec<SceneEntry>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        scene: Scene,
        camera: PerspectiveCamera,
        controller: Option<Box<dyn SceneController>>,
    ) -> SceneHandle {
        let handle = SceneHandle(self.entries.len() as u32);
        self.entries.push(SceneEntry {
            scene,
            camera,
            controller,
        });
        handle
    }

    /// Run the scene's controller, if any. A scene without a controller is left untouched.
    pub fn update(&mut self, handle: SceneHandle, dt: f64) -> PanoglobeResult<bool> {
        let entry = self.entry_mut(handle)?;
        Ok(match entry.controller.as_mut() {
            Some(ctl) => ctl.update(&mut entry.camera, dt),
            None => false,
        })
    }

    /// Update every scene in registration order. Returns how many cameras moved.
    pub fn update_all(&mut self, dt: f64) -> usize {
        let mut moved = 0;
        for entry in &mut self.entries {
            if let Some(ctl) = entry.controller.as_mut()
                && ctl.update(&mut entry.camera, dt)
            {
                moved += 1;
            }
        }
        moved
    }

    /// Forward pointer input to every controller.
    pub fn broadcast_input(&mut self, input: &ControlInput) {
        for entry in &mut self.entries {
            if let Some(ctl) = entry.controller.as_mut() {
                ctl.handle_input(input);
            }
        }
    }

    pub fn set_aspect_all(&mut self, aspect: f32) {
        for entry in &mut self.entries {
            entry.camera.set_aspect(aspect);
        }
    }

    pub fn spin_all(&mut self) {
        for entry in &mut self.entries {
            entry.scene.spin();
        }
    }

    pub fn scene(&self, handle: SceneHandle) -> PanoglobeResult<&Scene> {
        Ok(&self.entry(handle)?.scene)
    }

    pub fn scene_mut(&mut self, handle: SceneHandle) -> PanoglobeResult<&mut Scene> {
        Ok(&mut self.entry_mut(handle)?.scene)
    }

    pub fn camera(&self, handle: SceneHandle) -> PanoglobeResult<&PerspectiveCamera> {
        Ok(&self.entry(handle)?.camera)
    }

    pub fn camera_mut(&mut self, handle: SceneHandle) -> PanoglobeResult<&mut PerspectiveCamera> {
        Ok(&mut self.entry_mut(handle)?.camera)
    }

    pub fn has_controller(&self, handle: SceneHandle) -> PanoglobeResult<bool> {
        Ok(self.entry(handle)?.controller.is_some())
    }

    pub fn handles(&self) -> impl Iterator<Item = SceneHandle> + '_ {
        (0..self.entries.len()).map(|i| SceneHandle(i as u32))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, handle: SceneHandle) -> PanoglobeResult<&SceneEntry> {
        self.entries
            .get(handle.0 as usize)
            .ok_or_else(|| PanoglobeError::validation(format!("unknown scene handle {}", handle.0)))
    }

    fn entry_mut(&mut self, handle: SceneHandle) -> PanoglobeResult<&mut SceneEntry> {
        self.entries
            .get_mut(handle.0 as usize)
            .ok_or_else(|| PanoglobeError::validation(format!("unknown scene handle {}", handle.0)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/registry.rs"]
mod tests;
