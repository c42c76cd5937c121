//! Geographic placement on the unit globe.

use crate::foundation::core::{Quat, Vec3};

/// A named point of interest on the globe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub title: String,
    /// Latitude in degrees, north positive.
    pub lat: f64,
    /// Longitude in degrees, east positive.
    pub lon: f64,
}

impl Location {
    pub fn new(title: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            title: title.into(),
            lat,
            lon,
        }
    }

    pub fn position(&self) -> Vec3 {
        position_from_lat_lon(self.lat, self.lon)
    }

    pub fn orientation(&self) -> Quat {
        orientation_from_lat_lon(self.lat, self.lon)
    }
}

/// Unit-sphere position for a latitude/longitude pair.
///
/// Longitude is offset by 180 degrees so that the prime meridian faces -X, matching the
/// equirectangular mapping the sphere renderer uses.
pub fn position_from_lat_lon(lat_deg: f64, lon_deg: f64) -> Vec3 {
    let phi = lat_deg.to_radians();
    let theta = (lon_deg + 180.0).to_radians();
    Vec3::new(
        (phi.cos() * theta.cos()) as f32,
        phi.sin() as f32,
        (phi.cos() * theta.sin()) as f32,
    )
}

/// Globe orientation that brings a location towards the viewer.
///
/// Built as intrinsic X-then-Y Euler rotation `(lat, 270 - lon, 0)`.
pub fn orientation_from_lat_lon(lat_deg: f64, lon_deg: f64) -> Quat {
    let phi = lat_deg.to_radians() as f32;
    let theta = (270.0 - lon_deg).to_radians() as f32;
    Quat::from_rotation_x(phi) * Quat::from_rotation_y(theta)
}

/// The three locations shipped with the demo.
pub fn default_locations() -> Vec<Location> {
    vec![
        Location::new("Madagascar", -18.766947, 46.869107),
        Location::new("France", 46.232193, 2.209667),
        Location::new("États-Unis", 36.966428, -95.844032),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/scene/geo.rs"]
mod tests;
