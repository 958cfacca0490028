//! Scratch pool behaviour as seen from transform code.

use anyhow::Result;
use trans3d::{
    Affine, Mat3, Mat3x4, Mat4, Matrix, Pooled, Scratch, ScratchConfig, Vector, Vector1, Vector2, Vector3,
    Vector4,
};

use super::support::*;

fn drain_and_refill<T: Pooled>(scratch: &Scratch) {
    let capacity = scratch.capacity::<T>();
    let items: Vec<T> = (0..capacity).map(|_| scratch.checkout::<T>()).collect();
    assert_eq!(scratch.available::<T>(), 0);

    scratch.checkin_all(items);
    assert_eq!(scratch.available::<T>(), capacity);
    assert_eq!(scratch.stats::<T>().misses, 0);
}

#[test]
fn test_checkout_checkin_restores_every_slot() {
    println!("=== Pool Capacity Test ===");
    let scratch = Scratch::new();

    drain_and_refill::<Vector1>(&scratch);
    drain_and_refill::<Vector2>(&scratch);
    drain_and_refill::<Vector3>(&scratch);
    drain_and_refill::<Vector4>(&scratch);
    drain_and_refill::<Mat3>(&scratch);
    drain_and_refill::<Mat3x4>(&scratch);
    drain_and_refill::<Mat4>(&scratch);

    assert_eq!(scratch.capacity::<Vector3>(), 128);
    println!("Pool capacity: OK");
}

#[test]
fn test_empty_pool_still_serves_shaped_objects() {
    println!("=== Empty Pool Test ===");
    init_tracing();
    let scratch = Scratch::with_config(&ScratchConfig::minimal());

    let v: Vector<3> = scratch.checkout();
    assert_eq!(v.dim(), 3);
    let m: Mat3x4 = scratch.checkout();
    assert_eq!((m.rows(), m.columns()), (3, 4));
    let n: Mat4 = scratch.checkout();
    assert_eq!((n.rows(), n.columns()), (4, 4));
    assert_eq!(scratch.stats::<Mat4>().misses, 1);

    // Nowhere to put them back: dropped silently
    scratch.checkin(v);
    scratch.checkin(m);
    scratch.checkin(n);
    assert_eq!(scratch.available::<Mat4>(), 0);
    assert_eq!(scratch.stats::<Mat4>().discards, 1);
    println!("Empty pool: OK");
}

#[test]
fn test_transform_operations_return_their_temporaries() -> Result<()> {
    println!("=== Balanced Temporaries Test ===");
    let scratch = Scratch::with_config(&ScratchConfig::tracked());
    let mut rng = rng(0x9001);

    for _ in 0..SAMPLES / 10 {
        let structure = random_combination(&mut rng);
        let mut m: Mat4 = random_transform(&mut rng, structure);
        let rhs_structure = random_combination(&mut rng);
        let rhs: Mat4 = random_transform(&mut rng, rhs_structure);

        m.post_compose(&rhs, &scratch);
        m.pre_compose(&rhs, &scratch);
        m.invert(&scratch)?;
        m.normal(&scratch)?;

        let (mut q, mut s, mut t) = (Vector4::new(), Vector3::new(), Vector3::new());
        m.decompose(&mut q, &mut s, &mut t, &scratch)?;
    }

    assert!(scratch.outstanding_sites().is_empty());
    assert_eq!(scratch.report_outstanding(), 0);
    assert_eq!(scratch.available::<Mat4>(), scratch.capacity::<Mat4>());
    assert_eq!(scratch.stats::<Mat3>().misses, 0);
    println!("Balanced temporaries: OK");
    Ok(())
}

#[test]
fn test_leaked_checkout_is_located() {
    println!("=== Leak Location Test ===");
    let scratch = Scratch::with_config(&ScratchConfig::tracked());

    let held: Mat3 = scratch.checkout();
    let sites = scratch.outstanding_sites();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].0, "mat3");
    assert!(sites[0].1.location.file().ends_with("pooling.rs"));

    scratch.checkin(held);
    assert!(scratch.outstanding_sites().is_empty());
    println!("Leak location: OK");
}

#[test]
fn test_config_from_parameter_string() -> Result<()> {
    let config = ScratchConfig::from_params("vec3=4, mat4=2, track=true")?;
    let scratch = Scratch::with_config(&config);
    assert_eq!(scratch.capacity::<Vector3>(), 4);
    assert_eq!(scratch.capacity::<Mat4>(), 2);
    assert_eq!(scratch.capacity::<Mat3>(), 8);

    assert!(ScratchConfig::from_params("mat5=1").is_err());
    assert!(ScratchConfig::from_params("mat4=lots").is_err());
    Ok(())
}
