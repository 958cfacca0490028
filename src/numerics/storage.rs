//! Pluggable backing memory for vectors and matrices.
//!
//! Every vector and matrix owns one float buffer obtained from a
//! [`StorageProvider`]. Swapping the provider (pinned memory, an arena, ...)
//! needs no change to the numeric code.

/// Source of linear, native-endian backing memory.
pub trait StorageProvider {
    /// `n` zeroed floats.
    fn create_float_storage(&self, n: usize) -> Box<[f32]>;

    /// `n` zeroed bytes.
    fn create_byte_storage(&self, n: usize) -> Box<[u8]>;
}

/// Default provider: plain zero-filled heap memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapStorage;

impl StorageProvider for HeapStorage {
    fn create_float_storage(&self, n: usize) -> Box<[f32]> {
        vec![0.0; n].into_boxed_slice()
    }

    fn create_byte_storage(&self, n: usize) -> Box<[u8]> {
        vec![0; n].into_boxed_slice()
    }
}

/// Native-endian byte image of a float slice.
pub fn to_native_bytes(values: &[f32], provider: &dyn StorageProvider) -> Box<[u8]> {
    let mut bytes = provider.create_byte_storage(values.len() * 4);
    for (chunk, value) in bytes.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
    bytes
}

/// Decode a native-endian byte image into `out`. The lengths must agree.
pub(crate) fn read_native_bytes(
    bytes: &[u8],
    out: &mut [f32],
) -> Result<(), crate::numerics::error::MathError> {
    crate::numerics::error::check_len(out.len() * 4, bytes.len())?;
    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(())
}
