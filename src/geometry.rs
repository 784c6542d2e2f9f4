//! Minimal 3D geometry used for picking and jurisdiction scoring.
//!
//! Data elements describe their extent as an axis-aligned box in index space
//! together with a world transform (origin plus per-axis spacing).

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point in world (or index) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point3D) -> f64 {
        (*self - *other).length()
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Sub for Point3D {
    type Output = Vector3D;

    fn sub(self, rhs: Point3D) -> Vector3D {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add<Vector3D> for Point3D {
    type Output = Point3D;

    fn add(self, rhs: Vector3D) -> Point3D {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vector3D> for Point3D {
    type Output = Point3D;

    fn sub(self, rhs: Vector3D) -> Point3D {
        Point3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

// ============================================================================
// Bounding Box
// ============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3D {
    pub min: Point3D,
    pub max: Point3D,
}

impl BoundingBox3D {
    /// Create a box from two corners, normalizing their order per axis.
    pub fn new(a: Point3D, b: Point3D) -> Self {
        Self {
            min: Point3D::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3D::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn center(&self) -> Point3D {
        Point3D::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Distance from the center to any corner.
    pub fn half_diagonal(&self) -> f64 {
        self.center().distance(&self.max)
    }

    /// Whether the point lies inside or on the boundary.
    pub fn contains(&self, p: &Point3D) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// A box with zero extent along every axis.
    pub fn is_degenerate(&self) -> bool {
        self.half_diagonal() <= f64::EPSILON
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Geometry of a data element at one time step.
///
/// `bounds` is given in index space. World coordinates are obtained by
/// `origin + index * spacing`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry3D {
    pub origin: Point3D,
    pub spacing: Vector3D,
    pub bounds: BoundingBox3D,
}

impl Geometry3D {
    /// Geometry with unit spacing whose index space equals world space.
    pub fn from_world_bounds(bounds: BoundingBox3D) -> Self {
        Self {
            origin: Point3D::ORIGIN,
            spacing: Vector3D::new(1.0, 1.0, 1.0),
            bounds,
        }
    }

    pub fn world_to_index(&self, world: &Point3D) -> Point3D {
        Point3D::new(
            axis_to_index(world.x, self.origin.x, self.spacing.x),
            axis_to_index(world.y, self.origin.y, self.spacing.y),
            axis_to_index(world.z, self.origin.z, self.spacing.z),
        )
    }

    pub fn index_to_world(&self, index: &Point3D) -> Point3D {
        Point3D::new(
            self.origin.x + index.x * self.spacing.x,
            self.origin.y + index.y * self.spacing.y,
            self.origin.z + index.z * self.spacing.z,
        )
    }

    /// Whether a world point lies inside the index-space bounds.
    pub fn is_inside(&self, world: &Point3D) -> bool {
        self.bounds.contains(&self.world_to_index(world))
    }
}

fn axis_to_index(world: f64, origin: f64, spacing: f64) -> f64 {
    if spacing.abs() <= f64::EPSILON {
        world - origin
    } else {
        (world - origin) / spacing
    }
}
