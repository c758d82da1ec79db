//! Geographic primitives shared by discovery and alert matching.

use serde::Serialize;
use thiserror::Error;

/// Search radius applied when the client omits one or sends zero.
pub const DEFAULT_SEARCH_RADIUS_MILES: f64 = 10.0;

/// Fixed radius scanned for alert candidates around a product owner.
pub const ALERT_RADIUS_METRES: f64 = 10_000.0;

/// Convert a distance in miles to metres.
///
/// # Examples
/// ```
/// use marketplace::domain::miles_to_metres;
///
/// assert!((miles_to_metres(10.0) - 16_093.4).abs() < 1e-6);
/// ```
#[must_use]
pub fn miles_to_metres(miles: f64) -> f64 {
    miles * 1.609_34 * 1000.0
}

/// Errors raised when constructing a [`GeoPoint`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoPointError {
    #[error("longitude must be a finite number between -180 and 180, got {value}")]
    Longitude { value: f64 },
    #[error("latitude must be a finite number between -90 and 90, got {value}")]
    Latitude { value: f64 },
}

impl GeoPointError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Longitude { .. } => "longitude",
            Self::Latitude { .. } => "latitude",
        }
    }
}

/// WGS84 point, longitude first as stored by PostGIS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoPointError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoPointError::Longitude { value: longitude });
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoPointError::Latitude { value: latitude });
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}
