// src/numerics/transform/engine.rs
// Composition, inversion and normal matrices, dispatched on structure tags.

use tracing::trace;

use crate::numerics::error::MathError;
use crate::numerics::kernels;
use crate::numerics::transform::{inspect, Affine, Structure};
use crate::numerics::types::traits::{Matrix, MatrixMut};

/// Verify a freshly produced tag in debug builds.
#[inline]
#[track_caller]
pub(crate) fn debug_check<T: Affine + ?Sized>(m: &T) {
    if cfg!(debug_assertions) {
        m.assert_structure_sound();
    }
}

fn copy_linear<D, S>(dest: &mut D, src: &S)
where
    D: MatrixMut + ?Sized,
    S: Matrix + ?Sized,
{
    for c in 0..3 {
        for r in 0..3 {
            dest.set(r, c, src.get(r, c));
        }
    }
}

/// Re-orthonormalize the linear columns by Gram-Schmidt. A product of two
/// rotations drifts off the rotation group in f32; this pulls it back.
fn orthonormalize_linear<D: MatrixMut + ?Sized>(dest: &mut D) {
    let [x, y, _] = inspect::linear_columns(dest);
    let x = normalized(x);
    let d = inspect::dot(&x, &y);
    let y = normalized([y[0] - d * x[0], y[1] - d * x[1], y[2] - d * x[2]]);
    let z = inspect::cross(&x, &y);
    for (c, column) in [x, y, z].iter().enumerate() {
        for (r, &v) in column.iter().enumerate() {
            dest.set(r, c, v);
        }
    }
}

fn normalized(v: [f32; 3]) -> [f32; 3] {
    let mag = inspect::dot(&v, &v).sqrt();
    v.map(|x| x / mag)
}

fn write_translation<D: MatrixMut + ?Sized>(dest: &mut D, t: [f32; 3]) {
    for (r, &v) in t.iter().enumerate() {
        dest.set(r, 3, v);
    }
}

/// `dest = lhs * rhs`.
///
/// With either operand general the dense kernel of `dest`'s shape runs.
/// Otherwise the result is built from the tagged components alone: the
/// translation is `L_lhs * t_rhs + t_lhs`, the linear block is a 3x3 product
/// only when both sides carry one, and the tag is the union of both tags.
/// A product of two unscaled rotations is re-orthonormalized so that long
/// chains keep their rotation tag honest.
pub fn compose<D, L, R>(dest: &mut D, lhs: &L, rhs: &R)
where
    D: Affine + ?Sized,
    L: Affine + ?Sized,
    R: Affine + ?Sized,
{
    let (fl, fr) = (lhs.structure(), rhs.structure());
    if fl.is_general() || fr.is_general() {
        trace!(lhs = %fl, rhs = %fr, "dense compose");
        dest.dense_product(lhs, rhs);
        return;
    }

    let structure = fl.union(fr);
    let t = match (fl.has_linear(), fr.has_translation()) {
        (true, true) => {
            let (x, y, z) = (rhs.get(0, 3), rhs.get(1, 3), rhs.get(2, 3));
            core::array::from_fn(|i| {
                lhs.get(i, 0) * x + lhs.get(i, 1) * y + lhs.get(i, 2) * z + lhs.get(i, 3)
            })
        }
        (false, true) => {
            let (a, b) = (lhs.translation(), rhs.translation());
            [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
        }
        (_, false) => lhs.translation(),
    };

    dest.make_identity();
    match (fl.has_linear(), fr.has_linear()) {
        (true, true) => {
            kernels::mul33(dest, lhs, rhs);
            if !structure.has_scaling() {
                orthonormalize_linear(dest);
            }
        }
        (true, false) => copy_linear(dest, lhs),
        (false, true) => copy_linear(dest, rhs),
        (false, false) => {}
    }
    if structure.has_translation() {
        write_translation(dest, t);
    }
    dest.assume_structure(structure);
    debug_check(dest);
}

/// `dest = src^-1`.
///
/// Rigid transforms invert by transposing the rotation and rotating the
/// negated translation back; scaled or general ones use a dense kernel and
/// come out general.
pub fn invert_into<S: Affine + ?Sized>(src: &S, dest: &mut S) -> Result<(), MathError> {
    let structure = src.structure();
    if structure.is_general() {
        return src.dense_invert_into(dest);
    }
    if structure.has_scaling() {
        // Affine but not rigid: invert the 3x4 part, keep the bottom row
        kernels::invert34(dest, src)?;
        if dest.rows() > 3 {
            dest.set_row(3, &[0.0, 0.0, 0.0, 1.0]);
        }
        dest.assume_structure(Structure::General);
        return Ok(());
    }

    dest.make_identity();
    if structure.is_identity() {
        return Ok(());
    }
    if structure.has_rotation() {
        for r in 0..3 {
            for c in 0..3 {
                dest.set(r, c, src.get(c, r));
            }
        }
    }
    if structure.has_translation() {
        let t = src.translation();
        for i in 0..3 {
            let v = -(src.get(0, i) * t[0] + src.get(1, i) * t[1] + src.get(2, i) * t[2]);
            dest.set(i, 3, v);
        }
    }
    dest.assume_structure(structure);
    debug_check(dest);
    Ok(())
}

/// `dest = [(L^-1)^T | 0]` for the linear block `L` of `src`.
///
/// A rotation is its own inverse transpose, so rigid transforms only drop
/// their translation.
pub fn normal_into<S: Affine + ?Sized>(src: &S, dest: &mut S) -> Result<(), MathError> {
    let structure = src.structure();
    if structure.is_general() || structure.has_scaling() {
        kernels::transpose_inverse33(dest, src)?;
        write_translation(dest, [0.0; 3]);
        if dest.rows() > 3 {
            dest.set_row(3, &[0.0, 0.0, 0.0, 1.0]);
        }
        dest.assume_structure(Structure::General);
        return Ok(());
    }

    dest.make_identity();
    if structure.has_rotation() {
        copy_linear(dest, src);
    }
    dest.assume_structure(structure.without_translation());
    debug_check(dest);
    Ok(())
}
