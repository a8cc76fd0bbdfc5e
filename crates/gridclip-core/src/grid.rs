//! Grid classification and the local-to-world coordinate transform.

use geo::Coord;
use std::fmt;

/// The two grid families the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridKind {
    /// Regular row/column lattice, axis-aligned in local coordinates.
    Structured,
    /// Cells are arbitrary polygons given by explicit vertex lists.
    Vertex,
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::Vertex => write!(f, "vertex"),
        }
    }
}

/// Offset and rotation that place a grid's local frame in world space.
///
/// A local coordinate `(x, y)` maps to
/// `(x_offset + x cos θ - y sin θ, y_offset + x sin θ + y cos θ)`.
/// The rotation pivots about the local origin, which is the lower-left
/// corner of a structured grid.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CoordinateTransform {
    /// World x of the local origin.
    pub x_offset: f64,
    /// World y of the local origin.
    pub y_offset: f64,
    /// Counter-clockwise rotation in radians.
    pub rotation: f64,
}

impl CoordinateTransform {
    /// The transform that leaves coordinates unchanged.
    pub const IDENTITY: Self = Self {
        x_offset: 0.0,
        y_offset: 0.0,
        rotation: 0.0,
    };

    /// Build a transform from an offset and a rotation in radians.
    pub fn new(x_offset: f64, y_offset: f64, rotation: f64) -> Self {
        Self {
            x_offset,
            y_offset,
            rotation,
        }
    }

    /// Build a transform from an offset and a rotation in degrees.
    pub fn from_degrees(x_offset: f64, y_offset: f64, degrees: f64) -> Self {
        Self::new(x_offset, y_offset, degrees.to_radians())
    }

    /// True when applying the transform is a no-op.
    pub fn is_identity(&self) -> bool {
        self.x_offset == 0.0 && self.y_offset == 0.0 && self.rotation == 0.0
    }

    /// Map a local coordinate into world space.
    #[inline]
    pub fn apply(&self, c: Coord<f64>) -> Coord<f64> {
        if self.rotation == 0.0 {
            return Coord {
                x: self.x_offset + c.x,
                y: self.y_offset + c.y,
            };
        }
        let (sin, cos) = self.rotation.sin_cos();
        Coord {
            x: self.x_offset + c.x * cos - c.y * sin,
            y: self.y_offset + c.x * sin + c.y * cos,
        }
    }

    /// Map a world coordinate back into the local frame.
    #[inline]
    pub fn invert(&self, c: Coord<f64>) -> Coord<f64> {
        let dx = c.x - self.x_offset;
        let dy = c.y - self.y_offset;
        if self.rotation == 0.0 {
            return Coord { x: dx, y: dy };
        }
        let (sin, cos) = self.rotation.sin_cos();
        Coord {
            x: dx * cos + dy * sin,
            y: -dx * sin + dy * cos,
        }
    }
}
