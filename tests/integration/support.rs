//! Seeded generators shared by the property tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trans3d::{Affine, Mat3, Mat4, MatrixMut, Structure};

/// Samples drawn per property.
pub const SAMPLES: usize = 1000;

/// Componentwise agreement required between two results.
pub const TOLERANCE: f32 = 1e-4;

/// Every non-general tag.
pub const COMBINATIONS: [Structure; 8] = [
    Structure::Identity,
    Structure::Rotation,
    Structure::Translation,
    Structure::Scaling,
    Structure::RotationTranslation,
    Structure::RotationScaling,
    Structure::TranslationScaling,
    Structure::RotationTranslationScaling,
];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_axis(rng: &mut StdRng) -> [f32; 3] {
    loop {
        let v: [f32; 3] = [
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ];
        let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if len > 0.1 {
            return [v[0] / len, v[1] / len, v[2] / len];
        }
    }
}

pub fn random_unit_quaternion(rng: &mut StdRng) -> [f32; 4] {
    loop {
        let q: [f32; 4] = [
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ];
        let len = q.iter().map(|v| v * v).sum::<f32>().sqrt();
        if len > 0.1 {
            return q.map(|v| v / len);
        }
    }
}

pub fn random_scale(rng: &mut StdRng) -> [f32; 3] {
    [
        rng.gen_range(0.5..1.5),
        rng.gen_range(0.5..1.5),
        rng.gen_range(0.5..1.5),
    ]
}

pub fn random_offset(rng: &mut StdRng) -> [f32; 3] {
    [
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
    ]
}

/// A transform built through the constructors and tagged exactly
/// `structure`.
pub fn random_transform<T: Affine + Default>(rng: &mut StdRng, structure: Structure) -> T {
    let (rotation, translation, scaling) = structure.components().unwrap_or((true, true, true));
    let mut m = T::default();
    if rotation {
        let [x, y, z] = random_axis(rng);
        m.set_axis_angle(rng.gen_range(0.1..3.0), x, y, z);
    }
    if scaling {
        let [x, y, z] = random_scale(rng);
        m.pre_scale(x, y, z);
    }
    if translation {
        let [x, y, z] = random_offset(rng);
        m.post_translate(x, y, z);
    }
    assert_eq!(m.structure(), structure);
    m
}

pub fn random_combination(rng: &mut StdRng) -> Structure {
    COMBINATIONS[rng.gen_range(0..COMBINATIONS.len())]
}

/// A well-conditioned dense 4x4 (diagonally dominant), tagged general.
pub fn random_dense4(rng: &mut StdRng) -> Mat4 {
    let mut m = Mat4::new();
    fill_dominant(&mut m, rng);
    m.mark_general();
    m
}

/// A well-conditioned dense 3x3 (diagonally dominant).
pub fn random_dense3(rng: &mut StdRng) -> Mat3 {
    let mut m = Mat3::new();
    fill_dominant(&mut m, rng);
    m
}

fn fill_dominant<M: MatrixMut>(m: &mut M, rng: &mut StdRng) {
    for c in 0..m.columns() {
        for r in 0..m.rows() {
            let base = if r == c { 4.0 } else { 0.0 };
            m.set(r, c, base + rng.gen_range(-1.0..1.0));
        }
    }
}
