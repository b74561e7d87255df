//! Row-major 4x4 homogeneous transforms.
//!
//! Matrices premultiply column vectors, so `a * b * v` applies `b` first.
//! Storage is row-major while GPU APIs expect column-major data: uploaders
//! either request a transpose at upload time or use [`Matrix4::to_cols_array`].

use std::fmt;
use std::ops::{Mul, MulAssign};

use crate::Vector3;

/// A 4x4 matrix stored as 16 row-major floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Matrix4 {
    pub v: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4 {
        v: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Create a matrix from 16 values in row-major order.
    pub const fn new(v: [f32; 16]) -> Self {
        Self { v }
    }

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let [r0, r1, r2, r3] = rows;
        Self::new([
            r0[0], r0[1], r0[2], r0[3], //
            r1[0], r1[1], r1[2], r1[3], //
            r2[0], r2[1], r2[2], r2[3], //
            r3[0], r3[1], r3[2], r3[3],
        ])
    }

    /// Element at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.v[row * 4 + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.v[row * 4 + col] = value;
    }

    /// Row-major values, in storage order.
    pub fn as_array(&self) -> &[f32; 16] {
        &self.v
    }

    /// Column-major values, ready for APIs that do not transpose on upload.
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.transposed().v
    }

    /// First column (local X axis).
    pub fn right(&self) -> Vector3 {
        Vector3::new(self.v[0], self.v[4], self.v[8])
    }

    /// Second column (local Y axis).
    pub fn up(&self) -> Vector3 {
        Vector3::new(self.v[1], self.v[5], self.v[9])
    }

    /// Third column (local Z axis).
    pub fn forward(&self) -> Vector3 {
        Vector3::new(self.v[2], self.v[6], self.v[10])
    }

    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.v[3], self.v[7], self.v[11])
    }

    pub fn transposed(&self) -> Matrix4 {
        let v = &self.v;
        Matrix4::new([
            v[0], v[4], v[8], v[12], //
            v[1], v[5], v[9], v[13], //
            v[2], v[6], v[10], v[14], //
            v[3], v[7], v[11], v[15],
        ])
    }

    pub fn transpose(&mut self) {
        self.v.swap(1, 4);
        self.v.swap(2, 8);
        self.v.swap(3, 12);
        self.v.swap(6, 9);
        self.v.swap(7, 13);
        self.v.swap(11, 14);
    }

    /// Transposed cofactor matrix, i.e. `det(M) * M^-1`.
    fn adjugate(&self) -> Matrix4 {
        let v = &self.v;
        let mut inv = [0.0f32; 16];

        inv[0] = v[5] * v[10] * v[15] - v[5] * v[14] * v[11] - v[6] * v[9] * v[15]
            + v[6] * v[13] * v[11]
            + v[7] * v[9] * v[14]
            - v[7] * v[13] * v[10];
        inv[1] = -v[1] * v[10] * v[15] + v[1] * v[14] * v[11] + v[2] * v[9] * v[15]
            - v[2] * v[13] * v[11]
            - v[3] * v[9] * v[14]
            + v[3] * v[13] * v[10];
        inv[2] = v[1] * v[6] * v[15] - v[1] * v[14] * v[7] - v[2] * v[5] * v[15]
            + v[2] * v[13] * v[7]
            + v[3] * v[5] * v[14]
            - v[3] * v[13] * v[6];
        inv[3] = -v[1] * v[6] * v[11] + v[1] * v[10] * v[7] + v[2] * v[5] * v[11]
            - v[2] * v[9] * v[7]
            - v[3] * v[5] * v[10]
            + v[3] * v[9] * v[6];
        inv[4] = -v[4] * v[10] * v[15] + v[4] * v[14] * v[11] + v[6] * v[8] * v[15]
            - v[6] * v[12] * v[11]
            - v[7] * v[8] * v[14]
            + v[7] * v[12] * v[10];
        inv[5] = v[0] * v[10] * v[15] - v[0] * v[14] * v[11] - v[2] * v[8] * v[15]
            + v[2] * v[12] * v[11]
            + v[3] * v[8] * v[14]
            - v[3] * v[12] * v[10];
        inv[6] = -v[0] * v[6] * v[15] + v[0] * v[14] * v[7] + v[2] * v[4] * v[15]
            - v[2] * v[12] * v[7]
            - v[3] * v[4] * v[14]
            + v[3] * v[12] * v[6];
        inv[7] = v[0] * v[6] * v[11] - v[0] * v[10] * v[7] - v[2] * v[4] * v[11]
            + v[2] * v[8] * v[7]
            + v[3] * v[4] * v[10]
            - v[3] * v[8] * v[6];
        inv[8] = v[4] * v[9] * v[15] - v[4] * v[13] * v[11] - v[5] * v[8] * v[15]
            + v[5] * v[12] * v[11]
            + v[7] * v[8] * v[13]
            - v[7] * v[12] * v[9];
        inv[9] = -v[0] * v[9] * v[15] + v[0] * v[13] * v[11] + v[1] * v[8] * v[15]
            - v[1] * v[12] * v[11]
            - v[3] * v[8] * v[13]
            + v[3] * v[12] * v[9];
        inv[10] = v[0] * v[5] * v[15] - v[0] * v[13] * v[7] - v[1] * v[4] * v[15]
            + v[1] * v[12] * v[7]
            + v[3] * v[4] * v[13]
            - v[3] * v[12] * v[5];
        inv[11] = -v[0] * v[5] * v[11] + v[0] * v[9] * v[7] + v[1] * v[4] * v[11]
            - v[1] * v[8] * v[7]
            - v[3] * v[4] * v[9]
            + v[3] * v[8] * v[5];
        inv[12] = -v[4] * v[9] * v[14] + v[4] * v[13] * v[10] + v[5] * v[8] * v[14]
            - v[5] * v[12] * v[10]
            - v[6] * v[8] * v[13]
            + v[6] * v[12] * v[9];
        inv[13] = v[0] * v[9] * v[14] - v[0] * v[13] * v[10] - v[1] * v[8] * v[14]
            + v[1] * v[12] * v[10]
            + v[2] * v[8] * v[13]
            - v[2] * v[12] * v[9];
        inv[14] = -v[0] * v[5] * v[14] + v[0] * v[13] * v[6] + v[1] * v[4] * v[14]
            - v[1] * v[12] * v[6]
            - v[2] * v[4] * v[13]
            + v[2] * v[12] * v[5];
        inv[15] = v[0] * v[5] * v[10] - v[0] * v[9] * v[6] - v[1] * v[4] * v[10]
            + v[1] * v[8] * v[6]
            + v[2] * v[4] * v[9]
            - v[2] * v[8] * v[5];

        Matrix4::new(inv)
    }

    /// Laplace expansion along the first column, reusing the adjugate terms.
    fn determinant_with(&self, adjugate: &Matrix4) -> f32 {
        self.v[0] * adjugate.v[0]
            + self.v[4] * adjugate.v[1]
            + self.v[8] * adjugate.v[2]
            + self.v[12] * adjugate.v[3]
    }

    pub fn determinant(&self) -> f32 {
        self.determinant_with(&self.adjugate())
    }

    /// Invert with the adjugate method.
    ///
    /// Returns `None` only when the determinant is exactly zero; nearly
    /// singular matrices still invert, with the precision loss that implies.
    pub fn try_inverse(&self) -> Option<Matrix4> {
        let mut inv = self.adjugate();
        let det = self.determinant_with(&inv);
        if det == 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;
        for value in inv.v.iter_mut() {
            *value *= inv_det;
        }
        Some(inv)
    }

    pub fn rotate_x(theta: f32) -> Matrix4 {
        let (s, c) = theta.sin_cos();
        Matrix4::new([
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, -s, 0.0, //
            0.0, s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_y(theta: f32) -> Matrix4 {
        let (s, c) = theta.sin_cos();
        Matrix4::new([
            c, 0.0, s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_z(theta: f32) -> Matrix4 {
        let (s, c) = theta.sin_cos();
        Matrix4::new([
            c, -s, 0.0, 0.0, //
            s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Euler rotation `Rz * Ry * Rx`: X is applied first.
    pub fn rotate(rx: f32, ry: f32, rz: f32) -> Matrix4 {
        Matrix4::rotate_z(rz) * Matrix4::rotate_y(ry) * Matrix4::rotate_x(rx)
    }

    /// Rodrigues rotation of `angle` radians around `axis`.
    ///
    /// The axis does not need to be normalized. A zero axis yields identity.
    pub fn rotate_axis_angle(angle: f32, axis: Vector3) -> Matrix4 {
        let mag = axis.len();
        if mag <= 0.0 {
            return Matrix4::IDENTITY;
        }

        let Vector3 { x, y, z } = axis / mag;
        let (s, c) = angle.sin_cos();
        let one_minus_cos = 1.0 - c;

        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, yz, zx) = (x * y, y * z, z * x);
        let (xs, ys, zs) = (x * s, y * s, z * s);

        Matrix4::new([
            one_minus_cos * xx + c,
            one_minus_cos * xy - zs,
            one_minus_cos * zx + ys,
            0.0,
            one_minus_cos * xy + zs,
            one_minus_cos * yy + c,
            one_minus_cos * yz - xs,
            0.0,
            one_minus_cos * zx - ys,
            one_minus_cos * yz + xs,
            one_minus_cos * zz + c,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4 {
        Matrix4::new([
            sx, 0.0, 0.0, 0.0, //
            0.0, sy, 0.0, 0.0, //
            0.0, 0.0, sz, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn translate(tx: f32, ty: f32, tz: f32) -> Matrix4 {
        Matrix4::new([
            1.0, 0.0, 0.0, tx, //
            0.0, 1.0, 0.0, ty, //
            0.0, 0.0, 1.0, tz, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// World-to-camera transform. The camera sits at the origin looking down -Z.
    ///
    /// `up` only needs to be non-parallel to the view direction; the returned
    /// basis is re-orthogonalized.
    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Matrix4 {
        let z = (eye - target).normalized();
        let x = up.cross(z).normalized();
        let y = z.cross(x);

        let rotation = Matrix4::new([
            x.x, x.y, x.z, 0.0, //
            y.x, y.y, y.z, 0.0, //
            z.x, z.y, z.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);

        rotation * Matrix4::translate(-eye.x, -eye.y, -eye.z)
    }

    /// Symmetric perspective projection; `fovy` is the full vertical angle in radians.
    pub fn perspective(fovy: f32, aspect: f32, z_near: f32, z_far: f32) -> Matrix4 {
        let y_max = z_near * (fovy * 0.5).tan();
        let x_max = y_max * aspect;
        Matrix4::frustum(-x_max, x_max, -y_max, y_max, z_near, z_far)
    }

    /// OpenGL-style perspective frustum mapping view space to clip space.
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, z_near: f32, z_far: f32) -> Matrix4 {
        let two_near = 2.0 * z_near;
        let width = right - left;
        let height = top - bottom;
        let depth = z_far - z_near;

        Matrix4::new([
            two_near / width, 0.0, (right + left) / width, 0.0, //
            0.0, two_near / height, (top + bottom) / height, 0.0, //
            0.0, 0.0, (-z_far - z_near) / depth, (-two_near * z_far) / depth, //
            0.0, 0.0, -1.0, 0.0,
        ])
    }

    /// OpenGL-style orthographic projection.
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, z_near: f32, z_far: f32) -> Matrix4 {
        Matrix4::new([
            2.0 / (right - left), 0.0, 0.0, -(right + left) / (right - left), //
            0.0, 2.0 / (top - bottom), 0.0, -(top + bottom) / (top - bottom), //
            0.0, 0.0, -2.0 / (z_far - z_near), -(z_far + z_near) / (z_far - z_near), //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// The `w` a point would get after transformation.
    fn projected_w(&self, p: Vector3) -> f32 {
        self.v[12] * p.x + self.v[13] * p.y + self.v[14] * p.z + self.v[15]
    }

    /// Transform a point (implicit `w = 1`) and divide by the resulting `w`.
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let v = &self.v;
        let w = self.projected_w(p);
        Vector3::new(
            (v[0] * p.x + v[1] * p.y + v[2] * p.z + v[3]) / w,
            (v[4] * p.x + v[5] * p.y + v[6] * p.z + v[7]) / w,
            (v[8] * p.x + v[9] * p.y + v[10] * p.z + v[11]) / w,
        )
    }

    /// Transform a direction with the upper-left 3x3 block.
    ///
    /// Still divides by the point's `w`, which is 1 for affine matrices
    /// (bottom row `[0, 0, 0, 1]`). Normals can be passed through directly
    /// only when the matrix is orthogonal.
    pub fn transform_direction(&self, d: Vector3) -> Vector3 {
        let v = &self.v;
        let w = self.projected_w(d);
        Vector3::new(
            (v[0] * d.x + v[1] * d.y + v[2] * d.z) / w,
            (v[4] * d.x + v[5] * d.y + v[6] * d.z) / w,
            (v[8] * d.x + v[9] * d.y + v[10] * d.z) / w,
        )
    }

    /// Element-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, rhs: &Matrix4, precision: f32) -> bool {
        self.v
            .iter()
            .zip(rhs.v.iter())
            .all(|(a, b)| (a - b).abs() <= precision)
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = self.v[row * 4] * rhs.v[col]
                    + self.v[row * 4 + 1] * rhs.v[4 + col]
                    + self.v[row * 4 + 2] * rhs.v[8 + col]
                    + self.v[row * 4 + 3] * rhs.v[12 + col];
            }
        }
        Matrix4::new(out)
    }
}

impl MulAssign for Matrix4 {
    fn mul_assign(&mut self, rhs: Matrix4) {
        *self = *self * rhs;
    }
}

impl Mul<Vector3> for Matrix4 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        self.transform_point(rhs)
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.v.chunks_exact(4) {
            writeln!(f, "{{ {}, {}, {}, {} }}", row[0], row[1], row[2], row[3])?;
        }
        Ok(())
    }
}

impl From<Matrix4> for glam::Mat4 {
    fn from(m: Matrix4) -> Self {
        glam::Mat4::from_cols_array(&m.to_cols_array())
    }
}

impl From<glam::Mat4> for Matrix4 {
    fn from(m: glam::Mat4) -> Self {
        Matrix4::new(m.transpose().to_cols_array())
    }
}
