//! Dense per-shape kernels: products and inverses.
//!
//! Every kernel reads its operands through [`Matrix::get`], so a smaller
//! operand behaves as if padded with the identity to the result's shape. The
//! kernels only write the cells of their own shape (3x3, 3x4 or 4x4) and never
//! touch a transform's structure tag; callers that own a bigger destination
//! fill it with the identity first.
//!
//! [`Matrix::get`]: crate::numerics::types::traits::Matrix::get

pub mod invert;
pub mod multiply;

pub use invert::{invert33, invert34, invert44, transpose_inverse33};
pub use multiply::{
    mul33, mul33_post_assign, mul33_pre_assign, mul33_square, mul34, mul34_post_assign,
    mul34_pre_assign, mul34_square, mul44, mul44_post_assign, mul44_pre_assign, mul44_square,
};
