pub mod pooling;
pub mod properties;
pub mod support;
