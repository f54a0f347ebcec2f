//! Up-axis conversion for exported geometry

use std::f32::consts::FRAC_PI_2;
use std::fmt;

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Which host axis points up in the exported model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpAxis {
    /// Keep host coordinates as they are
    Z,
    #[default]
    Y,
    X,
}

impl UpAxis {
    /// Rotation applied to every exported position and normal
    ///
    /// - Z: identity
    /// - Y: -90 degrees about X
    /// - X: +90 degrees about Y
    pub fn rotation(self) -> Mat3 {
        match self {
            UpAxis::Z => Mat3::IDENTITY,
            UpAxis::Y => Mat3::from_rotation_x(-FRAC_PI_2),
            UpAxis::X => Mat3::from_rotation_y(FRAC_PI_2),
        }
    }

    /// Parse a selector, falling back to Z (identity) when unrecognized
    pub fn from_selector(selector: &str) -> Self {
        let trimmed = selector.trim();
        let key = trimmed
            .strip_prefix("OPT_")
            .or_else(|| trimmed.strip_prefix("opt_"))
            .unwrap_or(trimmed);

        match key.to_ascii_uppercase().as_str() {
            "Z" => UpAxis::Z,
            "Y" => UpAxis::Y,
            "X" => UpAxis::X,
            _ => {
                tracing::warn!("Unknown up axis '{}', exporting without rotation", selector);
                UpAxis::Z
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UpAxis::Z => "Z",
            UpAxis::Y => "Y",
            UpAxis::X => "X",
        }
    }
}

impl fmt::Display for UpAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coordinate conversion resolved once per export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    rotation: Mat3,
}

impl CoordinateTransform {
    pub fn new(up_axis: UpAxis) -> Self {
        Self {
            rotation: up_axis.rotation(),
        }
    }

    pub fn identity() -> Self {
        Self {
            rotation: Mat3::IDENTITY,
        }
    }

    /// Apply to a position or normal (`R * v`)
    pub fn apply(&self, v: [f32; 3]) -> [f32; 3] {
        (self.rotation * Vec3::from_array(v)).to_array()
    }

    /// Rotate an orientation into the converted frame (`R * q`)
    pub fn apply_rotation(&self, q: Quat) -> Quat {
        (Quat::from_mat3(&self.rotation) * q).normalize()
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::identity()
    }
}
