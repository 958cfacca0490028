//! Constructors for common transforms and projections.
//!
//! Each `set_*` constructor resets its target to the identity first and tags
//! the result with the tightest structure it can prove.

use crate::numerics::transform::engine::debug_check;
use crate::numerics::transform::{Affine, Structure};
use crate::numerics::types::matrix::{Mat3, Mat4};
use crate::numerics::types::traits::MatrixMut;

/// Rodrigues rotation into the 3x3 block. Returns false, writing nothing,
/// for a zero axis.
fn write_axis_angle<D: MatrixMut + ?Sized>(dest: &mut D, angle: f32, axis: [f32; 3]) -> bool {
    let mag = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    if mag == 0.0 {
        return false;
    }
    let [x, y, z] = axis.map(|v| v / mag);
    let (s, c) = angle.sin_cos();
    let c1 = 1.0 - c;

    dest.set(0, 0, c + x * x * c1);
    dest.set(1, 0, y * x * c1 + z * s);
    dest.set(2, 0, z * x * c1 - y * s);
    dest.set(0, 1, x * y * c1 - z * s);
    dest.set(1, 1, c + y * y * c1);
    dest.set(2, 1, z * y * c1 + x * s);
    dest.set(0, 2, x * z * c1 + y * s);
    dest.set(1, 2, y * z * c1 - x * s);
    dest.set(2, 2, c + z * z * c1);
    true
}

/// Rotation of the normalized quaternion into the 3x3 block. Returns false,
/// writing nothing, for a zero quaternion.
fn write_quaternion<D: MatrixMut + ?Sized>(dest: &mut D, q: [f32; 4]) -> bool {
    let mag = q.iter().map(|v| v * v).sum::<f32>().sqrt();
    if mag == 0.0 {
        return false;
    }
    let [w, x, y, z] = q.map(|v| v / mag);
    let (x2, y2, z2) = (x + x, y + y, z + z);
    let (xx, xy, xz) = (x * x2, x * y2, x * z2);
    let (yy, yz, zz) = (y * y2, y * z2, z * z2);
    let (wx, wy, wz) = (w * x2, w * y2, w * z2);

    dest.set(0, 0, 1.0 - (yy + zz));
    dest.set(0, 1, xy - wz);
    dest.set(0, 2, xz + wy);
    dest.set(1, 0, xy + wz);
    dest.set(1, 1, 1.0 - (xx + zz));
    dest.set(1, 2, yz - wx);
    dest.set(2, 0, xz - wy);
    dest.set(2, 1, yz + wx);
    dest.set(2, 2, 1.0 - (xx + yy));
    true
}

fn write_diagonal<D: MatrixMut + ?Sized>(dest: &mut D, d: [f32; 3]) {
    for (i, &v) in d.iter().enumerate() {
        dest.set(i, i, v);
    }
}

fn is_unit(x: f32, y: f32, z: f32) -> bool {
    x == 1.0 && y == 1.0 && z == 1.0
}

fn is_zero(x: f32, y: f32, z: f32) -> bool {
    x == 0.0 && y == 0.0 && z == 0.0
}

pub fn set_translation<T: Affine>(m: &mut T, x: f32, y: f32, z: f32) {
    m.make_identity();
    if is_zero(x, y, z) {
        return;
    }
    m.set(0, 3, x);
    m.set(1, 3, y);
    m.set(2, 3, z);
    m.assume_structure(Structure::Translation);
}

pub fn set_scale<T: Affine>(m: &mut T, x: f32, y: f32, z: f32) {
    m.make_identity();
    if is_unit(x, y, z) {
        return;
    }
    write_diagonal(m, [x, y, z]);
    m.assume_structure(Structure::Scaling);
}

pub fn set_axis_angle<T: Affine>(m: &mut T, angle: f32, x: f32, y: f32, z: f32) {
    m.make_identity();
    if angle == 0.0 {
        return;
    }
    if write_axis_angle(m, angle, [x, y, z]) {
        m.assume_structure(Structure::Rotation);
        debug_check(m);
    }
}

pub fn set_quaternion<T: Affine>(m: &mut T, w: f32, x: f32, y: f32, z: f32) {
    m.make_identity();
    // No vector part: the identity rotation, or the zero quaternion
    if is_zero(x, y, z) {
        return;
    }
    if write_quaternion(m, [w, x, y, z]) {
        m.assume_structure(Structure::Rotation);
        debug_check(m);
    }
}

/// `m = m * T(x, y, z)`: the translation column gains `M * (x, y, z, 0)`.
pub fn pre_translate<T: Affine>(m: &mut T, x: f32, y: f32, z: f32) {
    for r in 0..m.rows() {
        let v = m.get(r, 0) * x + m.get(r, 1) * y + m.get(r, 2) * z + m.get(r, 3);
        m.set(r, 3, v);
    }
    if !is_zero(x, y, z) {
        m.mark_translation();
    }
}

/// `m = T(x, y, z) * m`: each top row gains a multiple of the bottom row.
pub fn post_translate<T: Affine>(m: &mut T, x: f32, y: f32, z: f32) {
    let bottom = m.row(3);
    for (r, d) in [x, y, z].into_iter().enumerate() {
        if d == 0.0 {
            continue;
        }
        for (c, &b) in bottom.iter().enumerate() {
            if b != 0.0 {
                let v = m.get(r, c) + d * b;
                m.set(r, c, v);
            }
        }
    }
    if !is_zero(x, y, z) {
        m.mark_translation();
    }
}

/// `m = m * S(x, y, z)`: the linear columns are scaled.
pub fn pre_scale<T: Affine>(m: &mut T, x: f32, y: f32, z: f32) {
    if is_unit(x, y, z) {
        return;
    }
    for (c, f) in [x, y, z].into_iter().enumerate() {
        for r in 0..m.rows() {
            let v = m.get(r, c) * f;
            m.set(r, c, v);
        }
    }
    let structure = m.structure().with_scaling();
    m.assume_structure(structure);
}

/// `m = S(x, y, z) * m`: the top three rows are scaled, translation included.
pub fn post_scale<T: Affine>(m: &mut T, x: f32, y: f32, z: f32) {
    if is_unit(x, y, z) {
        return;
    }
    for (r, f) in [x, y, z].into_iter().enumerate() {
        m.scale_row(r, f);
    }
    let structure = m.structure().with_scaling();
    m.assume_structure(structure);
}

impl Mat3 {
    /// Diagonal scale matrix.
    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.make_identity();
        write_diagonal(self, [x, y, z]);
    }

    /// Rotation of `angle` radians about `(x, y, z)`; identity for a zero axis.
    pub fn set_axis_angle(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        self.make_identity();
        write_axis_angle(self, angle, [x, y, z]);
    }

    /// Rotation of the quaternion `<w, x, y, z>`; identity for zero.
    pub fn set_quaternion(&mut self, w: f32, x: f32, y: f32, z: f32) {
        self.make_identity();
        write_quaternion(self, [w, x, y, z]);
    }
}

impl Mat4 {
    /// Perspective projection of the frustum `left..right`, `bottom..top`,
    /// `near..far`, mapping view space to clip space.
    pub fn set_perspective(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        let (width, height, depth) = (right - left, top - bottom, far - near);
        self.make_zero();
        self.set(0, 0, 2.0 * near / width);
        self.set(1, 1, 2.0 * near / height);
        self.set(0, 2, (right + left) / width);
        self.set(1, 2, (top + bottom) / height);
        self.set(2, 2, -(far + near) / depth);
        self.set(3, 2, -1.0);
        self.set(2, 3, -2.0 * near * far / depth);
        self.mark_general();
    }

    /// Symmetric perspective from a vertical field of view in radians.
    pub fn set_perspective_fov(&mut self, fovy: f32, aspect: f32, near: f32, far: f32) {
        let top = near * (fovy * 0.5).tan();
        let right = top * aspect;
        self.set_perspective(-right, right, -top, top, near, far);
    }

    /// Orthographic projection of the box `left..right`, `bottom..top`,
    /// `near..far`.
    pub fn set_orthographic(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        let (width, height, depth) = (right - left, top - bottom, far - near);
        self.make_zero();
        self.set(0, 0, 2.0 / width);
        self.set(1, 1, 2.0 / height);
        self.set(2, 2, -2.0 / depth);
        self.set(0, 3, -(right + left) / width);
        self.set(1, 3, -(top + bottom) / height);
        self.set(2, 3, -(far + near) / depth);
        self.set(3, 3, 1.0);
        self.mark_general();
    }
}
