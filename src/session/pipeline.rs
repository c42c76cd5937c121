use crate::animation::ease::Ease;
use crate::animation::tween::Tween;
use crate::assets::store::TextureStore;
use crate::foundation::core::{FrameClock, Quat, Viewport};
use crate::foundation::error::{PanoglobeError, PanoglobeResult};
use crate::render::backend::{FrameRGBA, SceneRenderer};
use crate::render::compositor::{Compositor, CompositorState};
use crate::render::target::{TargetId, TargetPool, TargetPoolOpts};
use crate::scene::camera::PerspectiveCamera;
use crate::scene::controls::{ControlInput, SceneController};
use crate::scene::geo::Location;
use crate::scene::model::Scene;
use crate::scene::registry::{SceneHandle, SceneRegistry};
use crate::session::input::{InputEvent, InputQueue, InputSender};
use crate::session::progress::ProgressController;

/// Options controlling a [`Pipeline`].
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    pub target_pool: TargetPoolOpts,
    /// Split compositor rows across the rayon pool.
    pub parallel: bool,
    /// Globe rotation time for `SelectLocation`.
    pub focus_duration_secs: f64,
    pub focus_ease: Ease,
    /// Hold before the progress animation started by `SelectLocation`.
    pub transition_delay_secs: f64,
    pub transition_duration_secs: f64,
    pub transition_ease: Ease,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            target_pool: TargetPoolOpts::default(),
            parallel: true,
            focus_duration_secs: 1.0,
            focus_ease: Ease::OutQuad,
            transition_delay_secs: 0.5,
            transition_duration_secs: 1.0,
            transition_ease: Ease::OutQuad,
        }
    }
}

/// Per-frame orchestration of scenes, offscreen targets and the compositor.
///
/// Each call to [`render_frame`](Self::render_frame) drains pending input, advances animations and
/// controllers, renders every registered scene into its own target, then composites the two blend
/// inputs into the output frame. Targets are read by the compositor in the same frame they were
/// written.
pub struct Pipeline {
    viewport: Viewport,
    opts: PipelineOpts,
    registry: SceneRegistry,
    textures: TextureStore,
    targets: TargetPool,
    bindings: Vec<(SceneHandle, TargetId)>,
    /// `(planet, panorama)`; the planet scene also receives location focus.
    blend: Option<(SceneHandle, SceneHandle)>,
    renderer: Box<dyn SceneRenderer>,
    compositor: Compositor,
    state: CompositorState,
    progress: ProgressController,
    inputs: InputQueue,
    clock: FrameClock,
    locations: Vec<Location>,
    focus: Option<Tween<Quat>>,
    output: FrameRGBA,
}

impl Pipeline {
    pub fn new(
        viewport: Viewport,
        renderer: Box<dyn SceneRenderer>,
        opts: PipelineOpts,
    ) -> PanoglobeResult<Self> {
        viewport.validate()?;
        Ok(Self {
            viewport,
            registry: SceneRegistry::new(),
            textures: TextureStore::new(),
            targets: TargetPool::new(opts.target_pool),
            bindings: Vec::new(),
            blend: None,
            renderer,
            compositor: Compositor::new().with_parallel(opts.parallel),
            state: CompositorState::default(),
            progress: ProgressController::default(),
            inputs: InputQueue::new(),
            clock: FrameClock::new(),
            locations: Vec::new(),
            focus: None,
            output: FrameRGBA::blank(viewport),
            opts,
        })
    }

    /// Register a scene and allocate its dedicated render target.
    ///
    /// The camera aspect is set to the viewport aspect. Target allocation failures are returned
    /// here, never from `render_frame`.
    pub fn add_scene(
        &mut self,
        scene: Scene,
        mut camera: PerspectiveCamera,
        controller: Option<Box<dyn SceneController>>,
    ) -> PanoglobeResult<SceneHandle> {
        let target = self.targets.create_target(self.viewport)?;
        camera.set_aspect(self.viewport.aspect());
        let handle = self.registry.register(scene, camera, controller);
        self.bindings.push((handle, target));
        tracing::debug!(scene = handle.0, target = target.0, "scene registered");
        Ok(handle)
    }

    /// Choose which two scenes the compositor blends.
    pub fn set_blend_inputs(
        &mut self,
        planet: SceneHandle,
        panorama: SceneHandle,
    ) -> PanoglobeResult<()> {
        self.target_of(planet)?;
        self.target_of(panorama)?;
        self.blend = Some((planet, panorama));
        Ok(())
    }

    pub fn set_compositor(&mut self, compositor: Compositor) {
        self.compositor = compositor;
    }

    pub fn set_locations(&mut self, locations: Vec<Location>) {
        self.locations = locations;
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn set_progress_now(&mut self, value: f64) {
        self.progress.set(value);
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureStore {
        &mut self.textures
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SceneRegistry {
        &mut self.registry
    }

    pub fn targets(&self) -> &TargetPool {
        &self.targets
    }

    pub fn target_of(&self, scene: SceneHandle) -> PanoglobeResult<TargetId> {
        self.bindings
            .iter()
            .find(|(h, _)| *h == scene)
            .map(|(_, t)| *t)
            .ok_or_else(|| PanoglobeError::validation(format!("scene {} has no target", scene.0)))
    }

    pub fn input_sender(&self) -> InputSender {
        self.inputs.sender()
    }

    /// Queue an event for the next frame.
    pub fn push_input(&self, event: InputEvent) {
        self.inputs.push(event);
    }

    /// Raw progress value. The compositor clamps it to `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress.value()
    }

    pub fn compositor_state(&self) -> &CompositorState {
        &self.state
    }

    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Last composited frame.
    pub fn output(&self) -> &FrameRGBA {
        &self.output
    }

    /// Resize every target, camera and the output frame. Contents are cleared.
    ///
    /// On error nothing changes: targets, cameras, output and viewport keep their previous size.
    pub fn resize(&mut self, viewport: Viewport) -> PanoglobeResult<()> {
        viewport.validate()?;
        if viewport == self.viewport {
            return Ok(());
        }
        self.targets.resize_all(viewport)?;
        self.registry.set_aspect_all(viewport.aspect());
        self.output = FrameRGBA::blank(viewport);
        self.viewport = viewport;
        tracing::info!(width = viewport.width, height = viewport.height, "viewport resized");
        Ok(())
    }

    /// Produce one composited frame, advancing animations by `dt` seconds.
    #[tracing::instrument(skip(self), fields(frame = self.clock.frame().0))]
    pub fn render_frame(&mut self, dt: f64) -> PanoglobeResult<&FrameRGBA> {
        let (planet, panorama) = self
            .blend
            .ok_or_else(|| PanoglobeError::validation("blend inputs are not set"))?;

        self.apply_inputs();
        self.textures.poll();

        self.progress.advance(dt);
        if let Some(focus) = self.focus.as_mut() {
            let q = focus.advance(dt);
            let finished = focus.is_finished();
            self.registry.scene_mut(planet)?.orientation = q;
            if finished {
                self.focus = None;
            }
        }
        self.registry.spin_all();
        self.registry.update_all(dt);

        for &(handle, target) in &self.bindings {
            let scene = self.registry.scene(handle)?;
            let camera = self.registry.camera(handle)?;
            self.targets.render_into(
                target,
                &mut *self.renderer,
                scene,
                camera,
                &self.textures,
            )?;
        }

        self.state.set_progress(self.progress.value());
        self.state.set_time(self.clock.time());
        let a = self.targets.get(self.target_of(planet)?)?.buffer();
        let b = self.targets.get(self.target_of(panorama)?)?.buffer();
        self.compositor.composite(a, b, &self.state, &mut self.output)?;

        tracing::debug!(progress = self.state.progress(), "frame composited");
        self.clock.tick();
        Ok(&self.output)
    }

    fn apply_inputs(&mut self) {
        for event in self.inputs.drain() {
            match event {
                InputEvent::SetProgress(v) => self.progress.set(v),
                InputEvent::AnimateProgress {
                    to,
                    delay_secs,
                    duration_secs,
                    ease,
                } => self
                    .progress
                    .set_target_delayed(to, delay_secs, duration_secs, ease),
                InputEvent::SelectLocation(idx) => {
                    if let Err(err) = self.select_location(idx) {
                        tracing::warn!(%err, idx, "ignoring location select");
                    }
                }
                InputEvent::Drag { dx, dy } => self.registry.broadcast_input(&ControlInput::Drag {
                    dx,
                    dy,
                    viewport_height: self.viewport.height as f32,
                }),
                InputEvent::Zoom { delta } => {
                    self.registry.broadcast_input(&ControlInput::Zoom { delta })
                }
                InputEvent::Resize(viewport) => {
                    if let Err(err) = self.resize(viewport) {
                        tracing::warn!(
                            %err,
                            width = viewport.width,
                            height = viewport.height,
                            "ignoring resize"
                        );
                    }
                }
            }
        }
    }

    fn select_location(&mut self, idx: usize) -> PanoglobeResult<()> {
        let Some(loc) = self.locations.get(idx) else {
            tracing::warn!(idx, available = self.locations.len(), "unknown location");
            return Ok(());
        };
        let Some((planet, _)) = self.blend else {
            return Ok(());
        };
        let from = self.registry.scene(planet)?.orientation;
        let to = loc.orientation();
        tracing::info!(title = %loc.title, lat = loc.lat, lon = loc.lon, "focusing location");
        self.focus = Some(Tween::new(
            from,
            to,
            self.opts.focus_duration_secs,
            self.opts.focus_ease,
        ));
        self.progress.set_target_delayed(
            1.0,
            self.opts.transition_delay_secs,
            self.opts.transition_duration_secs,
            self.opts.transition_ease,
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
