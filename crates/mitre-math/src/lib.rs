#![warn(missing_docs)]

//! Math types for the mitre joint builder.
//!
//! Thin wrappers around nalgebra providing the points, vectors, affine
//! transforms and tolerances shared by the mesh, scene and joint crates,
//! plus the slice-based vector utilities in [`vector`].

pub mod vector;

use nalgebra::{Matrix3, Matrix4, Unit, Vector3, Vector4};
use thiserror::Error;

pub use vector::{angle_between, dot, length};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 3x3 linear map (rotation and scale part of a transform).
pub type Mat3 = Matrix3<f64>;

/// Errors from the vector utilities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// The two operands have a different number of components.
    #[error("dimension mismatch: {left} vs {right} components")]
    DimensionMismatch {
        /// Component count of the left operand.
        left: usize,
        /// Component count of the right operand.
        right: usize,
    },

    /// A vector has zero length where a direction is required.
    #[error("degenerate vector: zero length")]
    DegenerateVector,
}

/// Result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Build a transform from a linear part and a translation.
    pub fn from_parts(linear: &Mat3, translation: &Vec3) -> Self {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(linear);
        m[(0, 3)] = translation.x;
        m[(1, 3)] = translation.y;
        m[(2, 3)] = translation.z;
        Self { matrix: m }
    }

    /// Build a transform whose columns are the given axes, placed at `origin`.
    ///
    /// Maps local `(1, 0, 0)` to `origin + x`, and so on.
    pub fn from_basis(origin: &Point3, x: &Vec3, y: &Vec3, z: &Vec3) -> Self {
        Self::from_parts(&Mat3::from_columns(&[*x, *y, *z]), &origin.coords)
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation, applies rotation/scale).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// The upper-left 3x3 block (rotation and scale).
    pub fn linear(&self) -> Mat3 {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Column `index` of the linear part: the image of a local axis.
    ///
    /// # Panics
    ///
    /// Panics if `index > 2`.
    pub fn axis(&self, index: usize) -> Vec3 {
        assert!(index < 3, "axis index out of range: {index}");
        Vec3::new(
            self.matrix[(0, index)],
            self.matrix[(1, index)],
            self.matrix[(2, index)],
        )
    }

    /// The translation part, i.e. where the local origin lands.
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Copy of this transform with its translation replaced.
    pub fn with_translation(&self, t: &Vec3) -> Self {
        Self::from_parts(&self.linear(), t)
    }

    /// Length of each local axis after transformation.
    pub fn scale_factors(&self) -> Vec3 {
        Vec3::new(self.axis(0).norm(), self.axis(1).norm(), self.axis(2).norm())
    }

    /// Element-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Transform, eps: f64) -> bool {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in scene units.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
