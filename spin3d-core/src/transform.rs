/// Axis rotations and accumulated rotation state
use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One of the three model axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(Error::Parse(format!("unknown axis {other:?}"))),
        }
    }
}

/// Rotate a point about the X axis (right-handed)
pub fn rotate_x(point: Point3<f64>, angle: f64) -> Point3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle) * point
}

/// Rotate a point about the Y axis (right-handed)
pub fn rotate_y(point: Point3<f64>, angle: f64) -> Point3<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), angle) * point
}

/// Rotate a point about the Z axis (right-handed)
pub fn rotate_z(point: Point3<f64>, angle: f64) -> Point3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle) * point
}

/// Accumulated rotation around three axes (in radians)
///
/// Angles grow without bound; nothing wraps them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Advance by one tick of constant angular velocity
    pub fn advance(&mut self, speed: &RotationSpeed) {
        self.rotate(speed.x, speed.y, speed.z);
    }

    /// Apply X, then Y, then Z to a point
    pub fn apply(&self, point: Point3<f64>) -> Point3<f64> {
        rotate_z(rotate_y(rotate_x(point, self.x), self.y), self.z)
    }

    /// Single matrix equivalent to [`RotationState::apply`]
    pub fn matrix(&self) -> Rotation3<f64> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.y);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), self.z);

        // X is applied first, so it sits rightmost
        rz * ry * rx
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Per-axis angular velocity in radians per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationSpeed {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationSpeed {
    pub const DEFAULT: Self = Self {
        x: 0.01,
        y: 0.02,
        z: 0.005,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for axis in Axis::ALL {
            let v = self.get(axis);
            if !v.is_finite() {
                return Err(Error::InvalidSpeed(v));
            }
        }
        Ok(())
    }
}

impl Default for RotationSpeed {
    fn default() -> Self {
        Self::DEFAULT
    }
}
