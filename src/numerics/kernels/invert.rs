// src/numerics/kernels/invert.rs
// Dense inverses: cofactor for 3x3, rotation-block-plus-translation for 3x4,
// pivoted Gauss-Jordan for 4x4.

use tracing::debug;

use crate::numerics::eps::DETERMINANT_EPSILON;
use crate::numerics::error::MathError;
use crate::numerics::types::traits::{Matrix, MatrixMut};

/// Determinant of the leading 3x3 block.
///
/// The six signed triple products are accumulated into a positive and a
/// negative sum by the sign of their value, so cancellation happens once at
/// the final addition.
pub fn determinant33<M: Matrix + ?Sized>(m: &M) -> f32 {
    let (a, b, c) = (m.get(0, 0), m.get(0, 1), m.get(0, 2));
    let (d, e, f) = (m.get(1, 0), m.get(1, 1), m.get(1, 2));
    let (g, h, i) = (m.get(2, 0), m.get(2, 1), m.get(2, 2));

    let terms = [a * e * i, b * f * g, c * d * h, -(c * e * g), -(b * d * i), -(a * f * h)];
    let (mut pos, mut neg) = (0.0f32, 0.0f32);
    for t in terms {
        if t >= 0.0 {
            pos += t;
        } else {
            neg += t;
        }
    }
    pos + neg
}

/// Write the inverse of `src`'s 3x3 block into `dest`'s 3x3 block.
///
/// Fails without writing when `|det| < DETERMINANT_EPSILON`.
pub fn invert33<D, S>(dest: &mut D, src: &S) -> Result<(), MathError>
where
    D: MatrixMut + ?Sized,
    S: Matrix + ?Sized,
{
    let adj = adjugate33(src)?;
    for (k, &v) in adj.iter().enumerate() {
        dest.set(k % 3, k / 3, v);
    }
    Ok(())
}

/// Write the inverse transpose of `src`'s 3x3 block into `dest`'s 3x3 block.
pub fn transpose_inverse33<D, S>(dest: &mut D, src: &S) -> Result<(), MathError>
where
    D: MatrixMut + ?Sized,
    S: Matrix + ?Sized,
{
    let adj = adjugate33(src)?;
    for (k, &v) in adj.iter().enumerate() {
        dest.set(k / 3, k % 3, v);
    }
    Ok(())
}

/// Column-major inverse of the 3x3 block, scaled adjugate.
fn adjugate33<S: Matrix + ?Sized>(m: &S) -> Result<[f32; 9], MathError> {
    let det = determinant33(m);
    if det.abs() < DETERMINANT_EPSILON {
        debug!(determinant = det, "3x3 block is singular");
        return Err(MathError::SingularDeterminant {
            determinant: det,
            threshold: DETERMINANT_EPSILON,
        });
    }
    let s = 1.0 / det;

    let (a, b, c) = (m.get(0, 0), m.get(0, 1), m.get(0, 2));
    let (d, e, f) = (m.get(1, 0), m.get(1, 1), m.get(1, 2));
    let (g, h, i) = (m.get(2, 0), m.get(2, 1), m.get(2, 2));

    Ok([
        (e * i - f * h) * s,
        (f * g - d * i) * s,
        (d * h - e * g) * s,
        (c * h - b * i) * s,
        (a * i - c * g) * s,
        (b * g - a * h) * s,
        (b * f - c * e) * s,
        (c * d - a * f) * s,
        (a * e - b * d) * s,
    ])
}

/// Inverse of an affine 3x4 transform: `[R | t]^-1 = [R^-1 | -R^-1 t]`.
///
/// Writes the top three rows of `dest`.
pub fn invert34<D, S>(dest: &mut D, src: &S) -> Result<(), MathError>
where
    D: MatrixMut + ?Sized,
    S: Matrix + ?Sized,
{
    let inv = adjugate33(src)?;
    let t = [src.get(0, 3), src.get(1, 3), src.get(2, 3)];
    for (k, &v) in inv.iter().enumerate() {
        dest.set(k % 3, k / 3, v);
    }
    for r in 0..3 {
        let v = -(inv[r] * t[0] + inv[3 + r] * t[1] + inv[6 + r] * t[2]);
        dest.set(r, 3, v);
    }
    Ok(())
}

/// Inverse of a general 4x4 matrix by Gauss-Jordan elimination on `[M | I]`.
///
/// In each column the largest-magnitude remaining entry is bubbled up into
/// the pivot row with pairwise swaps from the bottom (strict `>`, so ties keep
/// the upper row). An exactly-zero pivot fails the call.
pub fn invert44<D, S>(dest: &mut D, src: &S) -> Result<(), MathError>
where
    D: MatrixMut + ?Sized,
    S: Matrix + ?Sized,
{
    let mut rows: [[f32; 8]; 4] = core::array::from_fn(|r| {
        let mut row = [0.0; 8];
        for (c, v) in row.iter_mut().enumerate().take(4) {
            *v = src.get(r, c);
        }
        row[4 + r] = 1.0;
        row
    });

    for col in 0..4 {
        for r in ((col + 1)..4).rev() {
            if rows[r][col].abs() > rows[r - 1][col].abs() {
                rows.swap(r, r - 1);
            }
        }

        let pivot = rows[col][col];
        if pivot == 0.0 {
            debug!(column = col, "zero pivot in 4x4 inverse");
            return Err(MathError::ZeroPivot { column: col });
        }

        for r in (col + 1)..4 {
            let m = rows[r][col] / pivot;
            if m == 0.0 {
                continue;
            }
            let (upper, lower) = rows.split_at_mut(r);
            for (target, &source) in lower[0].iter_mut().zip(upper[col].iter()).skip(col + 1) {
                *target -= m * source;
            }
        }
    }

    // Back substitution, bottom row first; pivots were checked above.
    for i in (0..4).rev() {
        let s = 1.0 / rows[i][i];
        for j in 4..8 {
            let mut acc = rows[i][j];
            for k in (i + 1)..4 {
                acc -= rows[i][k] * rows[k][j];
            }
            rows[i][j] = acc * s;
        }
    }

    for (r, row) in rows.iter().enumerate() {
        for c in 0..4 {
            dest.set(r, c, row[4 + c]);
        }
    }
    Ok(())
}
