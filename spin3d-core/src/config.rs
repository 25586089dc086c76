/// Control values the control surface hands to the core
///
/// Loads from JSON strings; file IO is left to the host
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;
use crate::geometry::ShapeFamily;
use crate::shape::{validate_resolution, validate_scale};
use crate::transform::RotationSpeed;

pub const DEFAULT_SCALE: f64 = 1.0;
pub const DEFAULT_RESOLUTION: u32 = 30;

/// Every user-adjustable parameter of the animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlValues {
    /// Shape family; `donut` is accepted as an alias of `torus`
    pub shape: ShapeFamily,
    /// Uniform scale, strictly positive
    pub scale: f64,
    /// Radians added per tick on each axis
    pub speed: RotationSpeed,
    /// Point density in `1..=MAX_RESOLUTION`
    pub resolution: u32,
    /// Fill color as `#rrggbb`
    pub color: Color,
}

impl Default for ControlValues {
    fn default() -> Self {
        Self {
            shape: ShapeFamily::Torus,
            scale: DEFAULT_SCALE,
            speed: RotationSpeed::DEFAULT,
            resolution: DEFAULT_RESOLUTION,
            color: Color::DEFAULT,
        }
    }
}

impl ControlValues {
    /// Parses control values from JSON; missing fields take their defaults
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_scale(self.scale)?;
        validate_resolution(self.resolution)?;
        self.speed.validate()
    }
}
