#![warn(missing_docs)]

//! Math types for the facetag labeling pipeline.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! face-classification geometry (points, directions, bounding boxes) plus
//! the angular-pattern helpers (sector indexing, side resolution)
//! shared by the classifier rules.

use nalgebra::{Unit, Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

// =============================================================================
// Axes
// =============================================================================

/// A principal coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// The component of `v` along this axis.
    pub fn component(&self, v: &Vec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// The coordinate of `p` along this axis.
    pub fn coordinate(&self, p: &Point3) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }

    /// The axis a direction is dominantly aligned with, if any.
    ///
    /// Returns the axis whose absolute component is at least `min_align`
    /// (direction sign is ignored). A direction can dominate at most one
    /// axis for any `min_align` above `1/sqrt(2)`.
    pub fn dominant(dir: &Dir3, min_align: f64) -> Option<Axis> {
        let v = dir.as_ref();
        if v.x.abs() >= min_align {
            Some(Axis::X)
        } else if v.y.abs() >= min_align {
            Some(Axis::Y)
        } else if v.z.abs() >= min_align {
            Some(Axis::Z)
        } else {
            None
        }
    }
}

// =============================================================================
// Bounding box
// =============================================================================

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Create a box from two opposite corners (in any order).
    pub fn from_corners(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Size of the box along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Extent of the box along one axis.
    pub fn span(&self, axis: Axis) -> f64 {
        axis.coordinate(&self.max) - axis.coordinate(&self.min)
    }

    /// Center point of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

// =============================================================================
// Polar helpers
// =============================================================================

/// Distance from the Z axis to the XY projection of `p`.
pub fn radial_distance(p: &Point3) -> f64 {
    p.x.hypot(p.y)
}

/// Polar angle of the XY projection of `p`, in degrees in `[0, 360)`.
pub fn polar_angle_deg(p: &Point3) -> f64 {
    p.y.atan2(p.x).to_degrees().rem_euclid(360.0)
}

/// Check a measured value against a nominal within an absolute tolerance.
pub fn within(value: f64, nominal: f64, tolerance: f64) -> bool {
    (value - nominal).abs() <= tolerance
}

// =============================================================================
// Angular patterns
// =============================================================================

/// Which sector of a radial pattern an angle falls into.
///
/// The pattern has `count` equal sectors of width `360 / count` degrees,
/// with sector 0 centered at `start_deg`. Under the plain convention the
/// index is `round(angle / width) mod count`: centroids of on-center
/// features sit at sector centers and the rounding boundaries fall half a
/// width away, so a feature centroid never lands exactly on a boundary.
///
/// With `half_offset`, sector centers shift by half a width
/// (`round(angle / width - 0.5) mod count`). This is the window convention
/// for features that sit *between* pattern positions (hub arcs, window
/// walls) whose centroids would otherwise land on the plain boundaries.
pub fn sector_index(angle_deg: f64, count: u32, start_deg: f64, half_offset: bool) -> usize {
    debug_assert!(count > 0);
    let width = 360.0 / count as f64;
    let mut t = (angle_deg - start_deg).rem_euclid(360.0) / width;
    if half_offset {
        t -= 0.5;
    }
    t.round().rem_euclid(count as f64) as usize
}

/// Which side of a sector's reference direction a centroid lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Counterclockwise of the reference direction.
    Left,
    /// Clockwise of (or on) the reference direction.
    Right,
}

impl Side {
    /// Label fragment for this side.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Resolve the side of `centroid` relative to the radial reference
/// direction at `reference_deg`.
///
/// The sign of the 2D cross product between the reference direction and
/// the XY projection of the centroid decides the side: positive is left.
pub fn side_of(reference_deg: f64, centroid: &Point3) -> Side {
    let a = reference_deg.to_radians();
    let cross = a.cos() * centroid.y - a.sin() * centroid.x;
    if cross > 0.0 {
        Side::Left
    } else {
        Side::Right
    }
}
