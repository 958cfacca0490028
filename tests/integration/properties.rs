//! Seeded algebraic properties of the kernels and the structure engine.

use anyhow::Result;
use rand::Rng;
use trans3d::{Affine, Mat3, Mat3x4, Mat4, Matrix, Scratch, Structure, Vector3, Vector4};

use super::support::*;

#[test]
fn test_invert_round_trip_all_shapes() -> Result<()> {
    println!("=== Invert Round Trip Test ===");
    init_tracing();
    let mut rng = rng(0x1417);

    for _ in 0..SAMPLES {
        let m = random_dense4(&mut rng);
        let mut inv = Mat4::new();
        m.invert_into(&mut inv)?;
        let mut product = m.clone();
        product.post_multiply(&inv);
        assert!(product.approx_eq(&Mat4::new(), TOLERANCE), "M * M^-1 is not identity:\n{product}");
        let mut back = Mat4::new();
        inv.invert_into(&mut back)?;
        assert!(back.approx_eq(&m, TOLERANCE), "double inverse drifted:\n{back}\nvs\n{m}");

        let mut a: Mat3x4 = random_transform(&mut rng, Structure::RotationTranslationScaling);
        a.mark_general();
        let mut inv = Mat3x4::new();
        a.invert_into(&mut inv)?;
        let mut product = Mat3x4::new();
        product.compose(&a, &inv);
        assert!(product.approx_eq(&Mat3x4::new(), TOLERANCE));
        let mut back = Mat3x4::new();
        inv.invert_into(&mut back)?;
        assert!(back.approx_eq(&a, TOLERANCE));

        let b = random_dense3(&mut rng);
        let mut inv = Mat3::new();
        b.invert_into(&mut inv)?;
        let mut product = Mat3::new();
        product.set_product(&b, &inv);
        assert!(product.approx_eq(&Mat3::new(), TOLERANCE));
        let mut back = Mat3::new();
        inv.invert_into(&mut back)?;
        assert!(back.approx_eq(&b, TOLERANCE));
    }

    println!("Invert round trip: OK");
    Ok(())
}

#[test]
fn test_composition_is_associative() {
    println!("=== Associativity Test ===");
    let mut rng = rng(0xa550c);

    for _ in 0..SAMPLES {
        let sa = random_combination(&mut rng);
        let sb = random_combination(&mut rng);
        let sc = random_combination(&mut rng);
        let a: Mat4 = random_transform(&mut rng, sa);
        let b: Mat4 = random_transform(&mut rng, sb);
        let c: Mat4 = random_transform(&mut rng, sc);

        let (mut ab, mut bc) = (Mat4::new(), Mat4::new());
        ab.compose(&a, &b);
        bc.compose(&b, &c);
        let (mut left, mut right) = (Mat4::new(), Mat4::new());
        left.compose(&ab, &c);
        right.compose(&a, &bc);

        assert!(
            left.approx_eq(&right, TOLERANCE),
            "({sa} * {sb}) * {sc} differs from {sa} * ({sb} * {sc})"
        );
        assert_eq!(left.structure(), right.structure());
    }

    println!("Associativity: OK");
}

#[test]
fn test_fast_compose_matches_dense() {
    println!("=== Fast Compose vs Dense Test ===");
    let mut rng = rng(0xc0c0);

    for structure in COMBINATIONS {
        for _ in 0..SAMPLES {
            let lhs: Mat4 = random_transform(&mut rng, structure);
            let other = random_combination(&mut rng);
            let rhs: Mat4 = random_transform(&mut rng, other);

            let mut fast = Mat4::new();
            fast.compose(&lhs, &rhs);
            assert_eq!(fast.structure(), structure.union(other));

            let (mut dl, mut dr) = (lhs.clone(), rhs.clone());
            dl.mark_general();
            dr.mark_general();
            let mut dense = Mat4::new();
            dense.compose(&dl, &dr);
            assert!(dense.structure().is_general());

            assert!(
                fast.approx_eq(&dense, TOLERANCE),
                "{structure} * {other}: fast\n{fast}\ndense\n{dense}"
            );

            // Same operands into the 3x4 shape
            let mut narrow = Mat3x4::new();
            narrow.compose(&lhs, &rhs);
            assert!(narrow.approx_eq(&fast, TOLERANCE));
        }
    }

    println!("Fast compose: OK");
}

#[test]
fn test_fast_invert_matches_dense() -> Result<()> {
    println!("=== Fast Invert vs Dense Test ===");
    let mut rng = rng(0x1a7e);

    for structure in COMBINATIONS {
        for _ in 0..SAMPLES {
            let m: Mat4 = random_transform(&mut rng, structure);

            let mut fast = Mat4::new();
            m.invert_into(&mut fast)?;
            if !structure.has_scaling() {
                assert_eq!(fast.structure(), structure);
            }

            let mut general = m.clone();
            general.mark_general();
            let mut dense = Mat4::new();
            general.invert_into(&mut dense)?;

            assert!(fast.approx_eq(&dense, TOLERANCE), "{structure}: fast\n{fast}\ndense\n{dense}");
            assert!(fast.structure_is_sound());
        }
    }

    println!("Fast invert: OK");
    Ok(())
}

#[test]
fn test_fast_normal_matches_dense() -> Result<()> {
    println!("=== Fast Normal Matrix vs Dense Test ===");
    let mut rng = rng(0x404a1);

    for structure in COMBINATIONS {
        for _ in 0..SAMPLES {
            let m: Mat3x4 = random_transform(&mut rng, structure);

            let mut fast = Mat3x4::new();
            m.normal_into(&mut fast)?;
            assert_eq!(fast.translation(), [0.0; 3]);

            let mut general = m.clone();
            general.mark_general();
            let mut dense = Mat3x4::new();
            general.normal_into(&mut dense)?;

            assert!(fast.approx_eq(&dense, TOLERANCE), "{structure}: fast\n{fast}\ndense\n{dense}");

            // A normal stays perpendicular to a transformed tangent plane
            let tangent = Vector3::from([1.0, 0.0, 0.0]);
            let normal = Vector3::from([0.0, 0.0, 1.0]);
            let (mut t, mut n) = (Vector3::new(), Vector3::new());
            m.transform_vector(&tangent, &mut t);
            fast.transform_vector(&normal, &mut n);
            assert!(t.dot(&n).abs() <= TOLERANCE * 10.0);
        }
    }

    println!("Fast normal: OK");
    Ok(())
}

#[test]
fn test_long_rotation_chain_keeps_its_tag() {
    println!("=== Long Rotation Chain Test ===");
    let scratch = Scratch::new();
    let steps = 40_000;
    let angle = 0.0123f32;

    let mut step = Mat4::new();
    step.set_axis_angle(angle, 0.3, 0.8, -0.5);
    let mut m = Mat4::new();
    for i in 0..steps {
        m.post_compose(&step, &scratch);
        assert!(m.structure_is_sound(), "drifted off the rotation group at step {i}");
    }
    assert_eq!(m.structure(), Structure::Rotation);

    // Still the same rotation, up to accumulated rounding
    let mut expected = Mat4::new();
    expected.set_axis_angle(angle * steps as f32, 0.3, 0.8, -0.5);
    assert!(m.approx_eq(&expected, 2e-2), "chain\n{m}\nexpected\n{expected}");
    assert_eq!(scratch.stats::<Mat4>().outstanding, 0);

    println!("Long rotation chain: OK");
}

#[test]
fn test_tags_stay_sound_under_mutation() -> Result<()> {
    println!("=== Structure Soundness Test ===");
    let scratch = Scratch::new();
    let mut rng = rng(0x50da);

    for _ in 0..SAMPLES {
        let mut m = Mat4::new();
        let mut narrow = Mat3x4::new();
        for _ in 0..8 {
            let [x, y, z] = random_offset(&mut rng);
            let [sx, sy, sz] = random_scale(&mut rng);
            let [ax, ay, az] = random_axis(&mut rng);
            match rng.gen_range(0..11) {
                0 => m.set_translation(x, y, z),
                1 => m.set_scale(sx, sy, sz),
                2 => m.set_axis_angle(x, ax, ay, az),
                3 => {
                    let [w, qx, qy, qz] = random_unit_quaternion(&mut rng);
                    m.set_quaternion(w, qx, qy, qz);
                }
                4 => m.pre_translate(x, y, z),
                5 => m.post_translate(x, y, z),
                6 => m.pre_scale(sx, sy, sz),
                7 => m.post_scale(sx, sy, sz),
                8 => {
                    let other = random_combination(&mut rng);
                    let rhs: Mat4 = random_transform(&mut rng, other);
                    m.post_compose(&rhs, &scratch);
                }
                9 => m.invert(&scratch)?,
                _ => m.normal(&scratch)?,
            }
            assert!(m.structure_is_sound(), "unsound tag {} on\n{m}", m.structure());

            narrow.set_transform(&m);
            assert_eq!(narrow.structure(), m.structure());
            assert!(narrow.structure_is_sound());
        }
    }

    assert_eq!(scratch.stats::<Mat4>().outstanding, 0);
    println!("Structure soundness: OK");
    Ok(())
}

#[test]
fn test_trs_round_trip() -> Result<()> {
    println!("=== TRS Round Trip Test ===");
    let scratch = Scratch::new();
    let mut rng = rng(0x7e5);

    for _ in 0..SAMPLES {
        let q = random_unit_quaternion(&mut rng);
        let s = [
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
        ];
        let t = random_offset(&mut rng);

        let mut m = Mat4::new();
        m.set_quaternion(q[0], q[1], q[2], q[3]);
        m.pre_scale(s[0], s[1], s[2]);
        m.post_translate(t[0], t[1], t[2]);

        let (mut rotation, mut scale, mut translation) = (Vector4::new(), Vector3::new(), Vector3::new());
        m.decompose(&mut rotation, &mut scale, &mut translation, &scratch)?;

        let expected = Vector4::from(q);
        let mut flipped = expected.clone();
        flipped.scale_by(-1.0);
        assert!(
            rotation.approx_eq(&expected, TOLERANCE) || rotation.approx_eq(&flipped, TOLERANCE),
            "rotation {rotation} vs {expected}"
        );
        assert!(scale.approx_eq(&Vector3::from(s), TOLERANCE));
        assert!(translation.approx_eq(&Vector3::from(t), TOLERANCE));
    }

    println!("TRS round trip: OK");
    Ok(())
}

#[test]
fn test_complete_transform_rebuilds() -> Result<()> {
    println!("=== Complete Transform Rebuild Test ===");
    let scratch = Scratch::new();
    let mut rng = rng(0xe1e);

    for _ in 0..SAMPLES {
        let euler = Vector3::from([
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-1.2..1.2),
            rng.gen_range(-3.0..3.0),
        ]);
        let scale = Vector3::from(random_scale(&mut rng));
        let position = Vector3::from(random_offset(&mut rng));

        let mut m = Mat3x4::new();
        m.to_complete_transform(&euler, &scale, &position, &scratch);
        assert!(m.structure_is_sound());

        let (mut e, mut s, mut p) = (Vector3::new(), Vector3::new(), Vector3::new());
        m.from_complete_transform(&mut e, &mut s, &mut p, &scratch)?;

        let mut rebuilt = Mat3x4::new();
        rebuilt.to_complete_transform(&e, &s, &p, &scratch);
        assert!(rebuilt.approx_eq(&m, TOLERANCE), "euler {euler} came back as {e}");
    }

    assert_eq!(scratch.stats::<Vector4>().outstanding, 0);
    assert_eq!(scratch.stats::<Mat3>().outstanding, 0);
    println!("Complete transform rebuild: OK");
    Ok(())
}
