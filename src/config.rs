//! JSON demo configuration.
//!
//! Every field is optional; omitted fields take the values of the original panorama/globe demo.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::foundation::core::{Fps, Rgba8Premul, Viewport};
use crate::foundation::error::{PanoglobeError, PanoglobeResult};
use crate::scene::geo::{Location, default_locations};

/// Opaque or translucent colour, written as `"#RRGGBB"`, `"#RRGGBBAA"` or a `[r, g, b(, a)]`
/// byte array in straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorDef {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorDef {
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for ColorDef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ColorDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self {
                    r: *r,
                    g: *g,
                    b: *b,
                    a: *a,
                }),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<ColorDef, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    match s.len() {
        6 => Ok(ColorDef::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(ColorDef {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
            a: hex_byte(&s[6..8])?,
        }),
        _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

/// Perspective camera orbiting the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Start distance on the +Z axis.
    pub distance: f32,
    /// Orbit damping factor; `None` applies drags immediately.
    pub damping: Option<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 70.0,
            near: 0.001,
            far: 1000.0,
            distance: 3.0,
            damping: None,
        }
    }
}

impl CameraConfig {
    fn validate(&self, name: &str) -> PanoglobeResult<()> {
        if !(self.fov_deg.is_finite() && self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(PanoglobeError::validation(format!(
                "{name}.fov_deg must be in (0, 180), got {}",
                self.fov_deg
            )));
        }
        if !(self.near > 0.0 && self.near < self.far && self.far.is_finite()) {
            return Err(PanoglobeError::validation(format!(
                "{name} needs 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(PanoglobeError::validation(format!(
                "{name}.distance must be > 0"
            )));
        }
        if let Some(d) = self.damping
            && !(d > 0.0 && d <= 1.0)
        {
            return Err(PanoglobeError::validation(format!(
                "{name}.damping must be in (0, 1], got {d}"
            )));
        }
        Ok(())
    }
}

/// A textured sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    /// Equirectangular image, relative to the assets root. `None` renders the placeholder.
    pub texture: Option<PathBuf>,
    pub radius: f32,
    /// Colour drawn until the texture is ready.
    pub placeholder: ColorDef,
    /// Flip the texture horizontally.
    pub mirror: bool,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            texture: None,
            radius: 1.0,
            placeholder: ColorDef::rgb(0x80, 0x80, 0x80),
            mirror: false,
        }
    }
}

/// One input scene of the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub background: ColorDef,
    pub sphere: SphereConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub enabled: bool,
    pub color: ColorDef,
    /// Marker radius relative to the globe radius.
    pub scale: f32,
    pub spin_per_frame: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: ColorDef::rgb(0xff, 0x33, 0x33),
            scale: 0.05,
            spin_per_frame: 0.005,
        }
    }
}

/// Timings of the "select location" interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub focus_duration_secs: f64,
    pub focus_ease: Ease,
    pub delay_secs: f64,
    pub duration_secs: f64,
    pub ease: Ease,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            focus_duration_secs: 1.0,
            focus_ease: Ease::OutQuad,
            delay_secs: 0.5,
            duration_secs: 1.0,
            ease: Ease::OutQuad,
        }
    }
}

/// Full configuration of the panorama/globe demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub viewport: Viewport,
    pub fps: Fps,
    /// Progress at startup.
    pub progress: f64,
    /// Globe scene, composited as the first input.
    pub planet: SceneConfig,
    /// Inside-out panorama scene, composited as the second input.
    pub panorama: SceneConfig,
    pub markers: MarkerConfig,
    pub locations: Vec<Location>,
    pub transition: TransitionConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            fps: Fps::default(),
            progress: 0.0,
            planet: SceneConfig {
                background: ColorDef::WHITE,
                sphere: SphereConfig {
                    texture: Some(PathBuf::from("globe.jpg")),
                    radius: 1.0,
                    placeholder: ColorDef::rgb(0x2a, 0x4d, 0x7a),
                    mirror: false,
                },
                camera: CameraConfig {
                    distance: 2.5,
                    ..CameraConfig::default()
                },
            },
            panorama: SceneConfig {
                background: ColorDef::WHITE,
                sphere: SphereConfig {
                    texture: Some(PathBuf::from("360.jpg")),
                    radius: 10.0,
                    placeholder: ColorDef::rgb(0xb0, 0xc4, 0xde),
                    mirror: true,
                },
                camera: CameraConfig {
                    distance: 3.0,
                    damping: Some(0.05),
                    ..CameraConfig::default()
                },
            },
            markers: MarkerConfig::default(),
            locations: default_locations(),
            transition: TransitionConfig::default(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: ColorDef::WHITE,
            sphere: SphereConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PanoglobeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PanoglobeError::serde(format!("parse demo config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PanoglobeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PanoglobeError::validation(format!("open demo config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> PanoglobeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PanoglobeError::serde(format!("serialize demo config: {e}")))
    }

    pub fn validate(&self) -> PanoglobeResult<()> {
        self.viewport.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.progress.is_finite() {
            return Err(PanoglobeError::validation("progress must be finite"));
        }
        for (name, scene) in [("planet", &self.planet), ("panorama", &self.panorama)] {
            scene.camera.validate(&format!("{name}.camera"))?;
            let r = scene.sphere.radius;
            if !(r.is_finite() && r > 0.0) {
                return Err(PanoglobeError::validation(format!(
                    "{name}.sphere.radius must be > 0, got {r}"
                )));
            }
        }
        if !(self.markers.scale.is_finite() && self.markers.scale > 0.0) {
            return Err(PanoglobeError::validation("markers.scale must be > 0"));
        }
        for loc in &self.locations {
            if !(-90.0..=90.0).contains(&loc.lat) || !(-180.0..=180.0).contains(&loc.lon) {
                return Err(PanoglobeError::validation(format!(
                    "location '{}' has out-of-range coordinates ({}, {})",
                    loc.title, loc.lat, loc.lon
                )));
            }
        }
        let t = &self.transition;
        for (name, v) in [
            ("focus_duration_secs", t.focus_duration_secs),
            ("delay_secs", t.delay_secs),
            ("duration_secs", t.duration_secs),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(PanoglobeError::validation(format!(
                    "transition.{name} must be >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
