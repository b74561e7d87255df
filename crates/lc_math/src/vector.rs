//! Three-component vector used for positions, directions and linear colors.

use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use serde::{Deserialize, Serialize};

/// Default tolerance for [`Vector3::approx_eq`] and [`crate::Matrix4::approx_eq`].
pub const DEFAULT_PRECISION: f32 = 1e-7;

/// A 3D vector with value semantics.
///
/// The same storage is also read as `r/g/b` for colors and `u/v/w` for
/// texture-like coordinates. Layout is `#[repr(C)]` so slices of vectors can be
/// handed to vertex buffers through `bytemuck`.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::splat(0.0);
    pub const ONE: Vector3 = Vector3::splat(1.0);
    pub const X: Vector3 = Vector3::new(1.0, 0.0, 0.0);
    pub const Y: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    pub const Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create a vector with all three components set to `s`.
    pub const fn splat(s: f32) -> Self {
        Self { x: s, y: s, z: s }
    }

    pub const fn from_array(values: [f32; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn r(&self) -> f32 {
        self.x
    }

    pub fn g(&self) -> f32 {
        self.y
    }

    pub fn b(&self) -> f32 {
        self.z
    }

    pub fn u(&self) -> f32 {
        self.x
    }

    pub fn v(&self) -> f32 {
        self.y
    }

    pub fn w(&self) -> f32 {
        self.z
    }

    /// Linear interpolation, `t = 0` yields `a` and `t = 1` yields `b`.
    pub fn lerp(a: Vector3, b: Vector3, t: f32) -> Vector3 {
        Vector3::new(
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.z + (b.z - a.z) * t,
        )
    }

    pub fn dot(self, rhs: Vector3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Right-handed cross product.
    pub fn cross(self, rhs: Vector3) -> Vector3 {
        Vector3::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// `|a . b|`, the cosine term for two unit vectors regardless of side.
    pub fn abs_cos_theta(a: Vector3, b: Vector3) -> f32 {
        a.dot(b).abs()
    }

    pub fn sqr_len(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn len(self) -> f32 {
        self.sqr_len().sqrt()
    }

    /// Normalize in place and return the length before normalization.
    ///
    /// A vector whose length is exactly zero is left untouched; no epsilon
    /// is applied, so tiny but non-zero vectors are still scaled up.
    pub fn normalize(&mut self) -> f32 {
        let len = self.len();
        if len != 0.0 {
            self.x /= len;
            self.y /= len;
            self.z /= len;
        }
        len
    }

    /// Return a unit-length copy.
    ///
    /// Unlike [`Vector3::normalize`] there is no zero guard: normalizing the
    /// zero vector produces NaN components, which then propagate through any
    /// arithmetic that consumes them.
    pub fn normalized(self) -> Vector3 {
        self / self.len()
    }

    pub fn min(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    pub fn max(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    pub fn min_element(self) -> f32 {
        self.x.min(self.y).min(self.z)
    }

    pub fn max_element(self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    /// A unit vector perpendicular to `a`.
    ///
    /// The helper axis is Y when `|a.x| > |a.y|` and X otherwise, so it is
    /// never parallel to `a` unless `a` is zero.
    pub fn orthogonal(a: Vector3) -> Vector3 {
        let helper = if a.x.abs() > a.y.abs() {
            Vector3::Y
        } else {
            Vector3::X
        };
        a.cross(helper).normalized()
    }

    /// Re-orthonormalize three vectors in place, keeping the direction of `a`.
    ///
    /// When `b` or `c` collapses after projection (squared length below
    /// `1e-5`) it is replaced by `orthogonal(a)` or `cross(a, b)`.
    pub fn gram_schmidt(a: &mut Vector3, b: &mut Vector3, c: &mut Vector3) {
        a.normalize();

        *b -= *a * a.dot(*b);
        if b.dot(*b) < 1e-5 {
            *b = Vector3::orthogonal(*a);
        } else {
            b.normalize();
        }

        *c -= *a * a.dot(*c);
        *c -= *b * b.dot(*c);
        if c.dot(*c) < 1e-5 {
            *c = a.cross(*b);
        } else {
            c.normalize();
        }
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, rhs: &Vector3, precision: f32) -> bool {
        (self.x - rhs.x).abs() <= precision
            && (self.y - rhs.y).abs() <= precision
            && (self.z - rhs.z).abs() <= precision
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {}, {}, {} }}", self.x, self.y, self.z)
    }
}

impl Index<usize> for Vector3 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 index out of range: {index}"),
        }
    }
}

impl IndexMut<usize> for Vector3 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3 index out of range: {index}"),
        }
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

// Component-wise vector/vector and vector/scalar operators.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $assign_trait for Vector3 {
            fn $assign_method(&mut self, rhs: Vector3) {
                self.x $op rhs.x;
                self.y $op rhs.y;
                self.z $op rhs.z;
            }
        }

        impl $assign_trait<f32> for Vector3 {
            fn $assign_method(&mut self, rhs: f32) {
                self.x $op rhs;
                self.y $op rhs;
                self.z $op rhs;
            }
        }

        impl $trait for Vector3 {
            type Output = Vector3;

            fn $method(mut self, rhs: Vector3) -> Vector3 {
                self $op rhs;
                self
            }
        }

        impl $trait<f32> for Vector3 {
            type Output = Vector3;

            fn $method(mut self, rhs: f32) -> Vector3 {
                self $op rhs;
                self
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, +=);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, -=);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, *=);
impl_binary_op!(Div, div, DivAssign, div_assign, /=);

impl Mul<Vector3> for f32 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs * self
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(values: [f32; 3]) -> Self {
        Vector3::from_array(values)
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}
