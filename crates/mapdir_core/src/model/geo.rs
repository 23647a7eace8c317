//! Geographic positions and map-native coordinates.
//!
//! Records carry WGS84 longitude/latitude degrees. The map works in Web
//! Mercator (EPSG:3857) metres, so everything handed to the rendering
//! surface goes through `GeoPosition::to_map_coordinate`.

use crate::model::record::RecordValidationError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Half the width of the Web Mercator world square, in metres.
pub const HALF_WORLD_M: f64 = PI * EARTH_RADIUS_M;

/// WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub longitude: f64,
    pub latitude: f64,
}

impl Default for GeoPosition {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl GeoPosition {
    pub const ORIGIN: GeoPosition = GeoPosition {
        longitude: 0.0,
        latitude: 0.0,
    };

    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Checks that both components are finite and inside the WGS84 range.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(RecordValidationError::InvalidLongitude(self.longitude));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(RecordValidationError::InvalidLatitude(self.latitude));
        }
        Ok(())
    }

    /// Projects this position into Web Mercator metres.
    ///
    /// Latitudes near the poles are clamped to the edge of the mercator
    /// square instead of diverging.
    pub fn to_map_coordinate(&self) -> MapCoordinate {
        let x = EARTH_RADIUS_M * self.longitude.to_radians();
        let y = EARTH_RADIUS_M * (PI * (self.latitude + 90.0) / 360.0).tan().ln();
        MapCoordinate {
            x,
            y: y.clamp(-HALF_WORLD_M, HALF_WORLD_M),
        }
    }
}

/// Point in the map's native (Web Mercator) reference.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapCoordinate {
    pub x: f64,
    pub y: f64,
}

impl MapCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: MapCoordinate, t: f64) -> MapCoordinate {
        let t = t.clamp(0.0, 1.0);
        MapCoordinate {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}
