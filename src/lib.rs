//! Panoglobe renders two independent 3D scenes off-screen every frame and composites them into
//! one image with a distortion cross-fade driven by a single `progress` value.
//!
//! The public API is pipeline-oriented:
//!
//! - Build a [`Pipeline`] by hand or from a [`DemoConfig`] with [`build_demo`]
//! - Feed it [`InputEvent`]s (progress, location focus, drag, zoom, resize)
//! - Render single frames, or drive it with a [`FrameScheduler`] into a [`FrameSink`]
#![forbid(unsafe_code)]

mod animation;
mod assets;
mod config;
mod encode;
mod foundation;
mod render;
mod scene;
mod session;

pub use crate::foundation::core::{
    Fps, FrameClock, FrameIndex, Point, Quat, Rgba8Premul, Vec3, Viewport,
};
pub use crate::foundation::error::{PanoglobeError, PanoglobeResult};
pub use crate::foundation::math::{mix, smoothstep};

pub use crate::animation::ease::Ease;
pub use crate::animation::tween::{Lerp, Tween};

pub use crate::assets::store::{TextureHandle, TextureState, TextureStore, TextureStoreStats};
pub use crate::assets::texture::{Texture, Wrap};

pub use crate::config::{
    CameraConfig, ColorDef, DemoConfig, MarkerConfig, SceneConfig, SphereConfig, TransitionConfig,
};

pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};

pub use crate::render::backend::{
    BackendKind, FlatRenderer, FrameRGBA, RenderSettings, SceneRenderer, create_backend,
};
pub use crate::render::compositor::{
    CompositeShader, Compositor, CompositorState, DistortCrossfade, DistortParams, ShaderInputs,
    distort, mix_factor, panorama_distortion, planet_distortion,
};
pub use crate::render::cpu::CpuRaycaster;
pub use crate::render::target::{
    BoundTarget, ColorBuffer, Destination, RenderTarget, TargetId, TargetPool, TargetPoolOpts,
    TargetPoolStats,
};

pub use crate::scene::camera::{PerspectiveCamera, Ray, RayGen};
pub use crate::scene::controls::{ControlInput, OrbitControls, SceneController};
pub use crate::scene::geo::{
    Location, default_locations, orientation_from_lat_lon, position_from_lat_lon,
};
pub use crate::scene::model::{Material, Scene, Side, Sphere};
pub use crate::scene::registry::{SceneHandle, SceneRegistry};

pub use crate::session::demo::build_demo;
pub use crate::session::input::{InputEvent, InputQueue, InputSender};
pub use crate::session::pipeline::{Pipeline, PipelineOpts};
pub use crate::session::progress::ProgressController;
pub use crate::session::scheduler::{FrameScheduler, Pacing, RunStats, SchedulerOpts};
