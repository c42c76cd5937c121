use crate::foundation::error::{PanoglobeError, PanoglobeResult};

pub use glam::{Quat, Vec3};
pub use kurbo::Point;

/// Absolute 0-based index of a rendered frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> PanoglobeResult<Self> {
        if den == 0 {
            return Err(PanoglobeError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(PanoglobeError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Visible framebuffer dimensions in pixels.
///
/// Every offscreen target is sized to the current viewport. The upper bound comes from the pixel
/// buffer backing render targets, which addresses rows and columns with `u16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Largest supported edge length.
    pub const MAX_EDGE: u32 = u16::MAX as u32;

    /// Create a validated viewport.
    pub fn new(width: u32, height: u32) -> PanoglobeResult<Self> {
        let v = Self { width, height };
        v.validate()?;
        Ok(v)
    }

    /// Check the non-zero and maximum-edge invariants.
    pub fn validate(self) -> PanoglobeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PanoglobeError::validation(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > Self::MAX_EDGE || self.height > Self::MAX_EDGE {
            return Err(PanoglobeError::validation(format!(
                "viewport {}x{} exceeds max edge {}",
                self.width,
                self.height,
                Self::MAX_EDGE
            )));
        }
        Ok(())
    }

    /// Width divided by height.
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Size of a tightly packed RGBA8 buffer covering the viewport.
    pub fn byte_len(self) -> usize {
        self.pixel_count().saturating_mul(4)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque colour; premultiplication is the identity at full alpha.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque colour from a `0xRRGGBB` literal.
    pub const fn from_hex(rgb: u32) -> Self {
        Self::opaque(
            ((rgb >> 16) & 0xff) as u8,
            ((rgb >> 8) & 0xff) as u8,
            (rgb & 0xff) as u8,
        )
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Per-frame counter fed to the compositor as its `time` input.
///
/// Advances by exactly one per rendered frame; it carries no wall-clock meaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameClock {
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the frame about to be rendered.
    pub fn frame(self) -> FrameIndex {
        FrameIndex(self.frame)
    }

    pub fn time(self) -> u64 {
        self.frame
    }

    pub fn tick(&mut self) -> FrameIndex {
        self.frame = self.frame.saturating_add(1);
        FrameIndex(self.frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
