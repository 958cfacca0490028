// src/numerics/mod.rs
// Top-level numerics module. Exposes a `types` namespace with submodules, the
// numeric kernels and the structure-aware transform engine built on them.

pub mod eps;
pub mod error;
pub mod storage;

pub mod types {
    // The submodules live in src/numerics/types/*.rs
    pub mod matrix;
    pub mod quaternion;
    pub mod traits;
    pub mod vector;
}

pub mod kernels;
pub mod transform;
