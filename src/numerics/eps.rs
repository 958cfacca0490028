//! Fixed tolerances for every "is this zero / are these equal" decision.

/// Tolerance for geometric checks (orthogonality, unit length).
pub const EPSILON: f32 = 1e-4;

/// Tolerance for general value equality.
pub const EQUALITY_EPSILON: f32 = 1e-5;

/// Below this magnitude a 3x3 determinant is treated as zero.
pub const DETERMINANT_EPSILON: f32 = 1e-25;

/// `|a - b| <= EPSILON`
#[inline]
pub fn eq(a: f32, b: f32) -> bool {
    eq_within(a, b, EPSILON)
}

#[inline]
pub fn eq_within(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

/// `|a| <= EPSILON`
#[inline]
pub fn zero(a: f32) -> bool {
    zero_within(a, EPSILON)
}

#[inline]
pub fn zero_within(a: f32, eps: f32) -> bool {
    a.abs() <= eps
}

/// Strictly less, by more than `EPSILON`.
#[inline]
pub fn lt(a: f32, b: f32) -> bool {
    a + EPSILON < b
}

/// Less, or equal within `EPSILON`.
#[inline]
pub fn le(a: f32, b: f32) -> bool {
    a <= b + EPSILON
}
