//! Mathematical types shared between the renderer and the UI.
//!
//! These are the canonical representations used by widget geometry.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D Vector - UI positions, sizes, texture coords
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// One vector
    pub const ONE: Self = Self::new(1.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 2]) -> Self {
        Self::new(arr[0], arr[1])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Componentwise minimum
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Componentwise maximum
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Returns true if both components are within `epsilon` of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Componentwise product.
impl std::ops::Mul for Vec2 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl std::ops::MulAssign for Vec2 {
    fn mul_assign(&mut self, rhs: Self) {
        self.x *= rhs.x;
        self.y *= rhs.y;
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// 2D affine transform stored as a column-major 3x3 matrix.
///
/// Layout is `[a, b, 0, c, d, 0, tx, ty, 1]`, mapping `(x, y)` to
/// `(a*x + c*y + tx, b*x + d*y + ty)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix3 {
    /// Column-major elements
    pub m: [f32; 9],
}

impl Matrix3 {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Determinants smaller than this are treated as singular.
    const SINGULAR_EPSILON: f32 = 1e-12;

    /// Creates a pure translation.
    #[must_use]
    pub const fn translation(t: Vec2) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, t.x, t.y, 1.0],
        }
    }

    /// Creates a counter-clockwise rotation about the origin.
    #[must_use]
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            m: [cos, sin, 0.0, -sin, cos, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Creates a non-uniform scale about the origin.
    #[must_use]
    pub const fn scale(s: Vec2) -> Self {
        Self {
            m: [s.x, 0.0, 0.0, 0.0, s.y, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Rotation followed by translation.
    #[must_use]
    pub fn from_translation_rotation(t: Vec2, radians: f32) -> Self {
        Self::translation(t) * Self::rotation(radians)
    }

    /// Returns the translation component.
    #[inline]
    #[must_use]
    pub const fn get_translation(&self) -> Vec2 {
        Vec2::new(self.m[6], self.m[7])
    }

    /// Transforms a point (translation applied).
    #[must_use]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(m[0] * p.x + m[3] * p.y + m[6], m[1] * p.x + m[4] * p.y + m[7])
    }

    /// Transforms a direction (translation ignored).
    #[must_use]
    pub fn transform_vector(&self, v: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(m[0] * v.x + m[3] * v.y, m[1] * v.x + m[4] * v.y)
    }

    /// Returns the inverse, or `None` if the transform is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let [a, b, _, c, d, _, tx, ty, _] = self.m;
        let det = a * d - b * c;
        if det.abs() < Self::SINGULAR_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let ia = d * inv_det;
        let ib = -b * inv_det;
        let ic = -c * inv_det;
        let id = a * inv_det;
        let itx = -(ia * tx + ic * ty);
        let ity = -(ib * tx + id * ty);

        Some(Self {
            m: [ia, ib, 0.0, ic, id, 0.0, itx, ity, 1.0],
        })
    }

    /// Returns true if every element is within `epsilon` of `other`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Matrix3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = [0.0_f32; 9];
        for col in 0..3 {
            for row in 0..3 {
                out[col * 3 + row] = (0..3)
                    .map(|k| self.m[k * 3 + row] * rhs.m[col * 3 + k])
                    .sum();
            }
        }
        Self { m: out }
    }
}
