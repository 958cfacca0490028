// src/numerics/transform/decompose.rs
// Translation * rotation * scale assembly and its inverse.

use crate::numerics::error::MathError;
use crate::numerics::transform::engine::debug_check;
use crate::numerics::transform::Affine;
use crate::numerics::types::matrix::Mat3;
use crate::numerics::types::quaternion;
use crate::numerics::types::traits::{Matrix, MatrixMut};
use crate::numerics::types::vector::{Vector3, Vector4};
use crate::scratch::Scratch;

/// `m = T(position) * R(euler) * S(scale)`
pub fn to_complete_transform<T: Affine>(
    m: &mut T,
    euler: &Vector3,
    scale: &Vector3,
    position: &Vector3,
    scratch: &Scratch,
) {
    if euler.as_slice().iter().all(|&a| a == 0.0) {
        m.make_identity();
    } else {
        let mut q = scratch.lease::<Vector4>();
        quaternion::from_euler(euler, &mut q);
        m.set_quaternion(q[0], q[1], q[2], q[3]);
    }
    m.pre_scale(scale[0], scale[1], scale[2]);
    m.post_translate(position[0], position[1], position[2]);
    debug_check(m);
}

/// Split `m` into a unit rotation quaternion, per-axis scale and translation.
///
/// Scale is the length of each linear column; a zero-length column cannot be
/// split and is reported as degenerate. Shear is not detected and folds into
/// the rotation.
pub fn decompose<T: Affine>(
    m: &T,
    rotation: &mut Vector4,
    scale: &mut Vector3,
    translation: &mut Vector3,
    scratch: &Scratch,
) -> Result<(), MathError> {
    let mut basis = scratch.lease::<Mat3>();
    let mut lengths = [0.0f32; 3];
    for (c, length) in lengths.iter_mut().enumerate() {
        let column = [m.get(0, c), m.get(1, c), m.get(2, c)];
        *length = column.iter().map(|v| v * v).sum::<f32>().sqrt();
        if *length == 0.0 {
            return Err(MathError::DegenerateAxis { axis: c });
        }
        for (r, v) in column.iter().enumerate() {
            basis.set(r, c, v / *length);
        }
    }

    quaternion::from_rotation(&*basis, rotation);
    scale.set_array(lengths);
    translation.set_array(m.translation());
    Ok(())
}

/// Euler angles, scale and position of `m`; the inverse of
/// [`to_complete_transform`] away from gimbal lock.
pub fn from_complete_transform<T: Affine>(
    m: &T,
    euler: &mut Vector3,
    scale: &mut Vector3,
    position: &mut Vector3,
    scratch: &Scratch,
) -> Result<(), MathError> {
    let mut q = scratch.lease::<Vector4>();
    decompose(m, &mut q, scale, position, scratch)?;
    quaternion::to_euler(&q, euler);
    Ok(())
}
