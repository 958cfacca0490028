// src/numerics/kernels/multiply.rs
// Unrolled matrix products. Each output row is computed from one row of the
// left operand, each output column from one column of the right operand;
// the aliasing variants rely on exactly that.

use crate::numerics::types::traits::{MatRef, Matrix, MatrixMut};

#[inline(always)]
fn row3<R: Matrix + ?Sized>(a: [f32; 3], rhs: &R) -> [f32; 3] {
    [
        a[0] * rhs.get(0, 0) + a[1] * rhs.get(1, 0) + a[2] * rhs.get(2, 0),
        a[0] * rhs.get(0, 1) + a[1] * rhs.get(1, 1) + a[2] * rhs.get(2, 1),
        a[0] * rhs.get(0, 2) + a[1] * rhs.get(1, 2) + a[2] * rhs.get(2, 2),
    ]
}

#[inline(always)]
fn col3<L: Matrix + ?Sized>(lhs: &L, b: [f32; 3]) -> [f32; 3] {
    [
        lhs.get(0, 0) * b[0] + lhs.get(0, 1) * b[1] + lhs.get(0, 2) * b[2],
        lhs.get(1, 0) * b[0] + lhs.get(1, 1) * b[1] + lhs.get(1, 2) * b[2],
        lhs.get(2, 0) * b[0] + lhs.get(2, 1) * b[1] + lhs.get(2, 2) * b[2],
    ]
}

#[inline(always)]
fn row4<R: Matrix + ?Sized>(a: [f32; 4], rhs: &R) -> [f32; 4] {
    [
        a[0] * rhs.get(0, 0) + a[1] * rhs.get(1, 0) + a[2] * rhs.get(2, 0) + a[3] * rhs.get(3, 0),
        a[0] * rhs.get(0, 1) + a[1] * rhs.get(1, 1) + a[2] * rhs.get(2, 1) + a[3] * rhs.get(3, 1),
        a[0] * rhs.get(0, 2) + a[1] * rhs.get(1, 2) + a[2] * rhs.get(2, 2) + a[3] * rhs.get(3, 2),
        a[0] * rhs.get(0, 3) + a[1] * rhs.get(1, 3) + a[2] * rhs.get(2, 3) + a[3] * rhs.get(3, 3),
    ]
}

/// Rows past `lhs`'s stored shape come from the identity extension.
#[inline(always)]
fn col4<L: Matrix + ?Sized>(lhs: &L, b: [f32; 4]) -> [f32; 4] {
    [
        lhs.get(0, 0) * b[0] + lhs.get(0, 1) * b[1] + lhs.get(0, 2) * b[2] + lhs.get(0, 3) * b[3],
        lhs.get(1, 0) * b[0] + lhs.get(1, 1) * b[1] + lhs.get(1, 2) * b[2] + lhs.get(1, 3) * b[3],
        lhs.get(2, 0) * b[0] + lhs.get(2, 1) * b[1] + lhs.get(2, 2) * b[2] + lhs.get(2, 3) * b[3],
        lhs.get(3, 0) * b[0] + lhs.get(3, 1) * b[1] + lhs.get(3, 2) * b[2] + lhs.get(3, 3) * b[3],
    ]
}

fn write_row<D: MatrixMut + ?Sized>(dest: &mut D, i: usize, values: &[f32]) {
    for (j, &v) in values.iter().enumerate() {
        dest.set(i, j, v);
    }
}

fn write_col<D: MatrixMut + ?Sized>(dest: &mut D, j: usize, values: &[f32]) {
    for (i, &v) in values.iter().enumerate() {
        dest.set(i, j, v);
    }
}

/// 3x3 block of `dest = lhs * rhs`, three-term dot products.
pub fn mul33<D, L, R>(dest: &mut D, lhs: &L, rhs: &R)
where
    D: MatrixMut + ?Sized,
    L: Matrix + ?Sized,
    R: Matrix + ?Sized,
{
    for i in 0..3 {
        let out = row3([lhs.get(i, 0), lhs.get(i, 1), lhs.get(i, 2)], rhs);
        write_row(dest, i, &out);
    }
}

/// `dest = dest * rhs` on the 3x3 block; row-buffered.
pub fn mul33_post_assign<D, R>(dest: &mut D, rhs: &R)
where
    D: MatrixMut + ?Sized,
    R: Matrix + ?Sized,
{
    for i in 0..3 {
        let out = row3([dest.get(i, 0), dest.get(i, 1), dest.get(i, 2)], rhs);
        write_row(dest, i, &out);
    }
}

/// `dest = lhs * dest` on the 3x3 block; column-buffered.
pub fn mul33_pre_assign<D, L>(lhs: &L, dest: &mut D)
where
    D: MatrixMut + ?Sized,
    L: Matrix + ?Sized,
{
    for j in 0..3 {
        let out = col3(lhs, [dest.get(0, j), dest.get(1, j), dest.get(2, j)]);
        write_col(dest, j, &out);
    }
}

/// `dest = dest * dest` on the 3x3 block.
pub fn mul33_square<D: MatrixMut + ?Sized>(dest: &mut D) {
    let snapshot: [f32; 9] = core::array::from_fn(|k| dest.get(k % 3, k / 3));
    let src = MatRef::new_unchecked(&snapshot, 3, 3);
    mul33(dest, &src, &src);
}

/// Top three rows of `dest = lhs * rhs`, four-term dot products.
pub fn mul34<D, L, R>(dest: &mut D, lhs: &L, rhs: &R)
where
    D: MatrixMut + ?Sized,
    L: Matrix + ?Sized,
    R: Matrix + ?Sized,
{
    for i in 0..3 {
        let out = row4(lhs.row(i), rhs);
        write_row(dest, i, &out);
    }
}

/// `dest = dest * rhs` on the top three rows; row-buffered.
pub fn mul34_post_assign<D, R>(dest: &mut D, rhs: &R)
where
    D: MatrixMut + ?Sized,
    R: Matrix + ?Sized,
{
    for i in 0..3 {
        let out = row4(dest.row(i), rhs);
        write_row(dest, i, &out);
    }
}

/// `dest = lhs * dest` on the top three rows; column-buffered.
pub fn mul34_pre_assign<D, L>(lhs: &L, dest: &mut D)
where
    D: MatrixMut + ?Sized,
    L: Matrix + ?Sized,
{
    for j in 0..4 {
        let b = [dest.get(0, j), dest.get(1, j), dest.get(2, j), dest.get(3, j)];
        let out = col4(lhs, b);
        write_col(dest, j, &out[..3]);
    }
}

/// `dest = dest * dest` on the top three rows.
pub fn mul34_square<D: MatrixMut + ?Sized>(dest: &mut D) {
    let snapshot: [f32; 12] = core::array::from_fn(|k| dest.get(k % 3, k / 3));
    let src = MatRef::new_unchecked(&snapshot, 3, 4);
    mul34(dest, &src, &src);
}

/// Full `dest = lhs * rhs` for a 4x4 destination.
pub fn mul44<D, L, R>(dest: &mut D, lhs: &L, rhs: &R)
where
    D: MatrixMut + ?Sized,
    L: Matrix + ?Sized,
    R: Matrix + ?Sized,
{
    for i in 0..4 {
        let out = row4(lhs.row(i), rhs);
        write_row(dest, i, &out);
    }
}

/// `dest = dest * rhs`; row-buffered.
pub fn mul44_post_assign<D, R>(dest: &mut D, rhs: &R)
where
    D: MatrixMut + ?Sized,
    R: Matrix + ?Sized,
{
    for i in 0..4 {
        let out = row4(dest.row(i), rhs);
        write_row(dest, i, &out);
    }
}

/// `dest = lhs * dest`; column-buffered.
pub fn mul44_pre_assign<D, L>(lhs: &L, dest: &mut D)
where
    D: MatrixMut + ?Sized,
    L: Matrix + ?Sized,
{
    for j in 0..4 {
        let b = [dest.get(0, j), dest.get(1, j), dest.get(2, j), dest.get(3, j)];
        let out = col4(lhs, b);
        write_col(dest, j, &out);
    }
}

/// `dest = dest * dest`. Both operands alias the output, so neither row nor
/// column buffering suffices; the whole input is snapshotted first.
pub fn mul44_square<D: MatrixMut + ?Sized>(dest: &mut D) {
    let snapshot: [f32; 16] = core::array::from_fn(|k| dest.get(k % 4, k / 4));
    let src = MatRef::new_unchecked(&snapshot, 4, 4);
    mul44(dest, &src, &src);
}
