//! # trans3d
//!
//! Small fixed-size linear algebra for 3D transforms: column-major float
//! vectors and matrices, dense 3x3 / 3x4 / 4x4 kernels, and affine transforms
//! that track their own structure so composition and inversion can skip work.
//!
//! ```rust
//! use trans3d::{Affine, Mat4, Scratch, Structure};
//!
//! let scratch = Scratch::new();
//!
//! let mut spin = Mat4::new();
//! spin.set_axis_angle(0.5, 0.0, 0.0, 1.0);
//! let mut shift = Mat4::new();
//! shift.set_translation(1.0, 2.0, 3.0);
//!
//! let mut model = Mat4::new();
//! model.compose(&shift, &spin);
//! assert_eq!(model.structure(), Structure::RotationTranslation);
//!
//! // Rigid: inverted by transposition, no elimination
//! model.invert(&scratch).unwrap();
//! assert_eq!(model.structure(), Structure::RotationTranslation);
//! ```

pub mod numerics;
pub mod scratch;

pub use numerics::eps;
pub use numerics::error::MathError;
pub use numerics::kernels;
pub use numerics::storage::{HeapStorage, StorageProvider};
pub use numerics::transform::{inspect, Affine, Structure};
pub use numerics::types::matrix::{Mat3, Mat3x4, Mat4};
pub use numerics::types::quaternion;
pub use numerics::types::traits::{MatMut, MatRef, Matrix, MatrixMut};
pub use numerics::types::vector::{Vector, Vector1, Vector2, Vector3, Vector4};
pub use scratch::{Pooled, Scratch, ScratchConfig};

/// Version information for the trans3d crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
