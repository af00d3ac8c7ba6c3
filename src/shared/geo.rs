/**
 * Geospatial and Placement Value Types
 *
 * Immutable value objects shared by the page index, the store and the
 * HTTP surface. Field names follow the JSON shape the mobile client
 * already speaks (`lat`/`lng`, `stamp_transformation`, `stamp_size`).
 */

use serde::{Deserialize, Serialize};

use crate::shared::error::{require_text, SharedError};

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geocode {
    pub lat: f64,
    pub lng: f64,
}

impl Geocode {
    /// Build a coordinate, rejecting NaN and infinities
    pub fn new(lat: f64, lng: f64) -> Result<Self, SharedError> {
        let geocode = Self { lat, lng };
        geocode.validate("geocode")?;
        Ok(geocode)
    }

    /// Both components must be finite; no range check is applied
    pub fn validate(&self, field: &str) -> Result<(), SharedError> {
        if !self.lat.is_finite() {
            return Err(SharedError::validation(format!("{field}.lat"), "must be a finite number"));
        }
        if !self.lng.is_finite() {
            return Err(SharedError::validation(format!("{field}.lng"), "must be a finite number"));
        }
        Ok(())
    }
}

/// A named point on the map
///
/// Locations are identified by their display name; no key is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub geocode: Geocode,
}

impl Location {
    pub fn new(name: impl Into<String>, geocode: Geocode) -> Self {
        Self {
            name: name.into(),
            geocode,
        }
    }

    /// Check that the name is non-blank and the coordinate is finite
    ///
    /// `field` prefixes the reported field path, e.g. `attractions[2]`.
    pub fn validate(&self, field: &str) -> Result<(), SharedError> {
        require_text(&format!("{field}.name"), &self.name)?;
        self.geocode.validate(&format!("{field}.geocode"))
    }
}

/// Offset of a sticker relative to the page origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// How a stamp's sticker is placed on its page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Position,
    pub scale: f64,
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Position::default(),
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// Rendered size of a sticker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}
