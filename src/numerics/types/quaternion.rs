// src/numerics/types/quaternion.rs
// Quaternion helpers over plain 4-vectors laid out as <w, x, y, z>, and
// Euler angles as 3-vectors <roll, pitch, yaw> (about x, y and z).

use super::traits::Matrix;
use super::vector::{Vector3, Vector4};

/// Below this `1 - cos(theta)` slerp falls back to linear blending.
const SLERP_LINEAR_THRESHOLD: f32 = 0.1;

/// Identity rotation <1, 0, 0, 0>.
pub fn set_identity(q: &mut Vector4) {
    q.set_array([1.0, 0.0, 0.0, 0.0]);
}

/// Unit quaternion of the roll/pitch/yaw rotation.
pub fn from_euler(euler: &Vector3, out: &mut Vector4) {
    let (sr, cr) = (euler[0] * 0.5).sin_cos();
    let (sp, cp) = (euler[1] * 0.5).sin_cos();
    let (sy, cy) = (euler[2] * 0.5).sin_cos();

    out.set_array([
        cr * cp * cy + sr * sp * sy,
        sr * cp * cy - cr * sp * sy,
        cr * sp * cy + sr * cp * sy,
        cr * cp * sy - sr * sp * cy,
    ]);
    out.normalize();
}

/// Roll/pitch/yaw of a unit quaternion. Pitch is clamped to +-pi/2 at the
/// poles.
pub fn to_euler(q: &Vector4, out: &mut Vector3) {
    let (w, x, y, z) = (q[0], q[1], q[2], q[3]);
    let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
    let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
    let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));
    out.set_array([roll, pitch, yaw]);
}

/// Hamilton product `out = a * b`.
pub fn multiply(a: &Vector4, b: &Vector4, out: &mut Vector4) {
    let (aw, ax, ay, az) = (a[0], a[1], a[2], a[3]);
    let (bw, bx, by, bz) = (b[0], b[1], b[2], b[3]);
    out.set_array([
        aw * bw - ax * bx - ay * by - az * bz,
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by + ay * bw + az * bx - ax * bz,
        aw * bz + az * bw + ax * by - ay * bx,
    ]);
}

/// Negate the vector part in place.
pub fn conjugate(q: &mut Vector4) {
    for i in 1..4 {
        q[i] = -q[i];
    }
}

/// Spherical interpolation, in place: `from` becomes the blend toward `to`
/// at `t`. Takes the short arc and blends linearly when the two are close.
pub fn slerp(from: &mut Vector4, to: &Vector4, t: f32) {
    let mut cos_theta = from.dot(to);
    if cos_theta < 0.0 {
        from.scale_by(-1.0);
        cos_theta = -cos_theta;
    }

    let (mut s0, mut s1) = (1.0 - t, t);
    if 1.0 - cos_theta > SLERP_LINEAR_THRESHOLD {
        let theta = cos_theta.acos();
        let sin_theta = theta.sin();
        s0 = (theta * (1.0 - t)).sin() / sin_theta;
        s1 = (theta * t).sin() / sin_theta;
    }

    for i in 0..4 {
        from[i] = from[i] * s0 + to[i] * s1;
    }
}

/// Quaternion of the orthonormal 3x3 block of `m`.
///
/// Picks the largest of `trace, m00, m11, m22` to divide by, which keeps the
/// square root away from zero.
pub fn from_rotation<M: Matrix + ?Sized>(m: &M, out: &mut Vector4) {
    let (m00, m01, m02) = (m.get(0, 0), m.get(0, 1), m.get(0, 2));
    let (m10, m11, m12) = (m.get(1, 0), m.get(1, 1), m.get(1, 2));
    let (m20, m21, m22) = (m.get(2, 0), m.get(2, 1), m.get(2, 2));
    let trace = m00 + m11 + m22;

    let q = if trace >= m00 && trace >= m11 && trace >= m22 {
        let s = (trace + 1.0).sqrt() * 2.0;
        [0.25 * s, (m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s]
    } else if m00 >= m11 && m00 >= m22 {
        let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
        [(m21 - m12) / s, 0.25 * s, (m01 + m10) / s, (m02 + m20) / s]
    } else if m11 >= m22 {
        let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
        [(m02 - m20) / s, (m01 + m10) / s, 0.25 * s, (m12 + m21) / s]
    } else {
        let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
        [(m10 - m01) / s, (m02 + m20) / s, (m12 + m21) / s, 0.25 * s]
    };

    out.set_array(q);
    // Canonical sign: non-negative w
    if out[0] < 0.0 {
        out.scale_by(-1.0);
    }
}
