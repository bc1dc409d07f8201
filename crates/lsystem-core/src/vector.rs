//! 3D vectors, the turtle's orientation frame, and axis-aligned bounding boxes.
//!
//! A turtle orientation is conventionally stored as a 3x4 homogeneous matrix with an
//! unused fourth (translation) column. Rather than carry that dead column, the frame here
//! is a 3x3 rotation matrix stored as three named `Vec3` columns — heading, left, and up —
//! exactly the submatrix the turtle ever reads or writes. Rotation still follows a
//! post-multiply-by-a-rotation construction, so the numerics match what a full matrix
//! restricted to its rotational part would produce.

use std::ops::{Add, Mul, Neg, Sub};

/// A vector (or point) in 3-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Returns the unit vector along `self`, or `Vec3::ZERO` if `self` has no length, rather
    /// than dividing by zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            self
        } else {
            self * (1.0 / len)
        }
    }

    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        self * factor
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// One of the three cardinal axes, used by `Frame3::rotate_cardinal` to select which
/// of the per-axis rotation formulas below to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalAxis {
    X,
    Y,
    Z,
}

/// The turtle's orientation: heading (`h`), left (`l`), and up (`u`), an orthonormal
/// right-handed basis. Rotating the turtle post-multiplies this frame by a rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame3 {
    pub h: Vec3,
    pub l: Vec3,
    pub u: Vec3,
}

impl Frame3 {
    #[must_use]
    pub const fn new(h: Vec3, l: Vec3, u: Vec3) -> Self {
        Self { h, l, u }
    }

    /// The world-space identity frame used for any orientation not otherwise given.
    pub const IDENTITY: Self = Self {
        h: Vec3::new(1.0, 0.0, 0.0),
        l: Vec3::new(0.0, 1.0, 0.0),
        u: Vec3::new(0.0, 0.0, 1.0),
    };

    /// Post-multiplies this frame by a rotation of `angle_radians` about `axis`, matching
    /// `Matrix::rotate(axis, alpha)`.
    #[must_use]
    pub fn rotate_cardinal(self, axis: CardinalAxis, angle_radians: f64) -> Self {
        let (ca, sa) = (angle_radians.cos(), angle_radians.sin());
        // Rows of the 3x3 rotation matrix, in (h, l, u)-column order, matching the
        // X/Y/Z row layout for each cardinal case.
        let rows: [[f64; 3]; 3] = match axis {
            CardinalAxis::X => [[1.0, 0.0, 0.0], [0.0, ca, -sa], [0.0, sa, ca]],
            CardinalAxis::Y => [[ca, 0.0, sa], [0.0, 1.0, 0.0], [-sa, 0.0, ca]],
            CardinalAxis::Z => [[ca, -sa, 0.0], [sa, ca, 0.0], [0.0, 0.0, 1.0]],
        };
        self.postmultiply(rows)
    }

    /// Post-multiplies this frame by a rotation of `angle_radians` about an arbitrary
    /// (non-cardinal) `axis`, matching `Matrix::rotate(Vector, alpha)`'s Rodrigues-style
    /// construction. Used by tropism, whose target direction is rarely axis-aligned.
    #[must_use]
    pub fn rotate_about(self, axis: Vec3, angle_radians: f64) -> Self {
        let a = axis.normalized();
        let (ca, sa) = (angle_radians.cos(), angle_radians.sin());
        let one_minus_ca = 1.0 - ca;

        // `c[i][j] = (1 - cos a) * a_i * a_j`
        let c = |i: f64, j: f64| one_minus_ca * i * j;
        // `s` carries the `cos` terms on the diagonal and `sin * (axis cross)` off it.
        let rows: [[f64; 3]; 3] = [
            [ca + c(a.x, a.x), -sa * a.z + c(a.x, a.y), sa * a.y + c(a.x, a.z)],
            [sa * a.z + c(a.y, a.x), ca + c(a.y, a.y), -sa * a.x + c(a.y, a.z)],
            [-sa * a.y + c(a.z, a.x), sa * a.x + c(a.z, a.y), ca + c(a.z, a.z)],
        ];
        self.postmultiply(rows)
    }

    /// Post-multiplies this frame by the 3x3 matrix given as rows of (h, l, u) coefficients,
    /// i.e. `frame' = frame * r`.
    fn postmultiply(self, rows: [[f64; 3]; 3]) -> Self {
        let cols = [self.h, self.l, self.u];
        let combine = |j: usize| {
            let mut acc = Vec3::ZERO;
            for (k, col) in cols.iter().enumerate() {
                acc = acc + *col * rows[k][j];
            }
            acc
        };
        Self::new(combine(0), combine(1), combine(2))
    }

    /// Negates heading and left (a 180-degree turnaround in place), matching
    /// a turnaround in place. Up is left untouched.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self::new(-self.h, -self.l, self.u)
    }
}

/// An axis-aligned bounding box accumulated over every point the turtle visits while
/// drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// An empty box; the first point folded in becomes both corners.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: Vec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Vec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = Vec3::new(self.min.x.min(point.x), self.min.y.min(point.y), self.min.z.min(point.z));
        self.max = Vec3::new(self.max.x.max(point.x), self.max.y.max(point.y), self.max.z.max(point.z));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9 && (a.z - b.z).abs() < 1e-9
    }

    #[test]
    fn cross_of_orthogonal_unit_vectors_gives_third_axis() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert!(approx_eq(x.cross(y), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn normalized_zero_vector_stays_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn rotating_identity_frame_90_about_z_turns_heading_into_left() {
        let rotated = Frame3::IDENTITY.rotate_cardinal(CardinalAxis::Z, std::f64::consts::FRAC_PI_2);
        assert!(approx_eq(rotated.h, Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn reversed_frame_flips_heading_and_left_but_not_up() {
        let reversed = Frame3::IDENTITY.reversed();
        assert!(approx_eq(reversed.h, -Frame3::IDENTITY.h));
        assert!(approx_eq(reversed.l, -Frame3::IDENTITY.l));
        assert!(approx_eq(reversed.u, Frame3::IDENTITY.u));
    }

    #[test]
    fn rotate_about_cardinal_axis_matches_rotate_cardinal() {
        let via_cardinal = Frame3::IDENTITY.rotate_cardinal(CardinalAxis::X, 0.7);
        let via_arbitrary = Frame3::IDENTITY.rotate_about(Vec3::new(1.0, 0.0, 0.0), 0.7);
        assert!(approx_eq(via_cardinal.h, via_arbitrary.h));
        assert!(approx_eq(via_cardinal.l, via_arbitrary.l));
        assert!(approx_eq(via_cardinal.u, via_arbitrary.u));
    }

    #[test]
    fn bounding_box_accumulates_extremes() {
        let mut bbox = BoundingBox::empty();
        bbox.extend(Vec3::new(1.0, -1.0, 0.0));
        bbox.extend(Vec3::new(-1.0, 2.0, 5.0));
        assert_eq!(bbox.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(bbox.max, Vec3::new(1.0, 2.0, 5.0));
    }
}
