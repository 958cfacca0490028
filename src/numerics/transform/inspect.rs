//! Structure discovery and the consistency check between a tag and the
//! matrix it describes.

use crate::numerics::eps;
use crate::numerics::transform::Structure;
use crate::numerics::types::traits::Matrix;

/// Tolerance of [`is_sound`]; looser than inspection so accumulated rounding
/// in long composition chains does not trip it.
pub const SOUNDNESS_TOLERANCE: f32 = 1e-3;

pub(crate) fn linear_columns<M: Matrix + ?Sized>(m: &M) -> [[f32; 3]; 3] {
    core::array::from_fn(|c| [m.get(0, c), m.get(1, c), m.get(2, c)])
}

pub(crate) fn dot(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn has_affine_bottom_row<M: Matrix + ?Sized>(m: &M, tolerance: f32) -> bool {
    m.row(3)
        .iter()
        .zip([0.0, 0.0, 0.0, 1.0])
        .all(|(&a, b)| eps::eq_within(a, b, tolerance))
}

/// Derive the tightest tag the contents of `m` support.
///
/// Anything with a zero or sheared linear column, a left-handed basis, or a
/// projective bottom row is general. Otherwise rotation is reported when any
/// off-diagonal entry is nonzero or any diagonal entry is negative, scaling
/// when any column length differs from 1, translation when any translation
/// entry is nonzero.
pub fn inspect<M: Matrix + ?Sized>(m: &M) -> Structure {
    if m.is_identity() {
        return Structure::Identity;
    }
    if m.rows() > 3 && m.row(3) != [0.0, 0.0, 0.0, 1.0] {
        return Structure::General;
    }

    let [x, y, z] = linear_columns(m);
    let mags = [dot(&x, &x), dot(&y, &y), dot(&z, &z)];
    if mags.iter().any(|&mag| mag == 0.0) {
        return Structure::General;
    }

    // Orthogonal and right-handed: z points along x cross y, x is square to y
    let n = cross(&x, &y);
    let n_mag = dot(&n, &n).sqrt();
    if n_mag == 0.0 {
        return Structure::General;
    }
    let z_mag = mags[2].sqrt();
    let aligned = (0..3).all(|i| eps::eq(n[i] / n_mag, z[i] / z_mag));
    let square = eps::zero(dot(&x, &y) / (mags[0] * mags[1]).sqrt());
    if !aligned || !square {
        return Structure::General;
    }

    let translation = (0..3).any(|r| m.get(r, 3) != 0.0);
    let rotation = (0..3).any(|r| (0..3).any(|c| r != c && m.get(r, c) != 0.0))
        || (0..3).any(|i| m.get(i, i) < 0.0);
    let scaling = mags.iter().any(|&mag| !eps::eq(mag, 1.0));

    Structure::from_components(rotation, translation, scaling)
}

/// Why `structure` misdescribes `m`, if it does.
pub fn soundness_violation<M: Matrix + ?Sized>(m: &M, structure: Structure) -> Option<&'static str> {
    let tol = SOUNDNESS_TOLERANCE;
    let (rotation, translation, scaling) = structure.components()?;

    if m.rows() > 3 && !has_affine_bottom_row(m, tol) {
        return Some("bottom row is not [0, 0, 0, 1]");
    }
    if !translation && (0..3).any(|r| !eps::zero_within(m.get(r, 3), tol)) {
        return Some("translation column is not zero");
    }

    let cols = linear_columns(m);
    if !rotation && !scaling {
        let identity = (0..3).all(|r| (0..3).all(|c| {
            let expected = if r == c { 1.0 } else { 0.0 };
            eps::eq_within(cols[c][r], expected, tol)
        }));
        if !identity {
            return Some("linear block is not the identity");
        }
    } else if !rotation {
        let diagonal = (0..3).all(|r| (0..3).all(|c| r == c || eps::zero_within(cols[c][r], tol)));
        if !diagonal {
            return Some("scaling without rotation is not diagonal");
        }
    } else if !scaling {
        let unit = cols.iter().all(|c| eps::eq_within(dot(c, c), 1.0, tol));
        let orthogonal = eps::zero_within(dot(&cols[0], &cols[1]), tol)
            && eps::zero_within(dot(&cols[0], &cols[2]), tol)
            && eps::zero_within(dot(&cols[1], &cols[2]), tol);
        let right_handed = dot(&cross(&cols[0], &cols[1]), &cols[2]) > 0.0;
        if !(unit && orthogonal && right_handed) {
            return Some("linear block is not a rotation");
        }
    }
    None
}

/// Whether every promise `structure` makes holds for `m`.
pub fn is_sound<M: Matrix + ?Sized>(m: &M, structure: Structure) -> bool {
    soundness_violation(m, structure).is_none()
}
