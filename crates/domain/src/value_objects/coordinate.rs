//! Coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// A longitude/latitude pair in WGS84 degrees
///
/// `x` is the longitude and `y` the latitude, matching the axis order used by
/// the location services on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees (-180 to 180)
    x: f64,
    /// Latitude in degrees (-90 to 90)
    y: f64,
}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if `x` is not in [-180, 180]
    /// or `y` is not in [-90, 90]
    pub fn new(x: f64, y: f64) -> Result<Self, DomainError> {
        if !(-180.0..=180.0).contains(&x) || !(-90.0..=90.0).contains(&y) {
            return Err(DomainError::InvalidCoordinates { x, y });
        }
        Ok(Self { x, y })
    }

    /// Create a coordinate without validation (for trusted sources)
    #[must_use]
    pub const fn new_unchecked(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Longitude
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Latitude
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coordinate {
    type Err = DomainError;

    /// Parse `"x,y"` (whitespace around either part is ignored)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| DomainError::ValidationError(format!("expected 'x,y', got '{s}'")))?;

        let x: f64 = x
            .trim()
            .parse()
            .map_err(|_| DomainError::ValidationError(format!("invalid longitude '{x}'")))?;
        let y: f64 = y
            .trim()
            .parse()
            .map_err(|_| DomainError::ValidationError(format!("invalid latitude '{y}'")))?;

        Self::new(x, y)
    }
}

/// Fixed locations used as defaults
impl Coordinate {
    /// Downtown Washington, DC
    #[must_use]
    pub const fn washington_dc() -> Self {
        Self::new_unchecked(-77.023_439_974_464_736, 38.902_970_048_906_099)
    }

    /// The White House, Washington, DC
    #[must_use]
    pub const fn white_house() -> Self {
        Self::new_unchecked(-77.036_430_054_965_564, 38.897_929_948_352_669)
    }
}
