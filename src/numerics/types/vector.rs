// src/numerics/types/vector.rs
// Heap-backed fixed-dimension vectors. The dimension is a const parameter so
// mismatched operands are rejected at compile time.

use core::fmt;
use core::ops::{AddAssign, Index, IndexMut, SubAssign};

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use stash::Reusable;

use crate::numerics::error::{check_len, MathError};
use crate::numerics::storage::{self, HeapStorage, StorageProvider};

/// An `N`-component float vector whose storage comes from a
/// [`StorageProvider`].
#[derive(Clone, Debug, PartialEq)]
pub struct Vector<const N: usize> {
    data: Box<[f32]>,
}

pub type Vector1 = Vector<1>;
pub type Vector2 = Vector<2>;
pub type Vector3 = Vector<3>;
pub type Vector4 = Vector<4>;

impl<const N: usize> Vector<N> {
    /// Zero vector on the heap.
    pub fn new() -> Self {
        Self::with_provider(&HeapStorage)
    }

    /// Zero vector backed by `provider`.
    pub fn with_provider(provider: &dyn StorageProvider) -> Self {
        Self {
            data: provider.create_float_storage(N),
        }
    }

    pub fn from_array(values: [f32; N]) -> Self {
        Self {
            data: Box::new(values),
        }
    }

    /// Build from a runtime-sized slice; the length must be `N`.
    pub fn from_slice(values: &[f32]) -> Result<Self, MathError> {
        check_len(N, values.len())?;
        Ok(Self {
            data: values.into(),
        })
    }

    pub fn from_native_bytes(bytes: &[u8]) -> Result<Self, MathError> {
        let mut v = Self::new();
        storage::read_native_bytes(bytes, &mut v.data)?;
        Ok(v)
    }

    pub fn to_native_bytes(&self, provider: &dyn StorageProvider) -> Box<[u8]> {
        storage::to_native_bytes(&self.data, provider)
    }

    pub const fn dim(&self) -> usize {
        N
    }

    #[inline]
    pub fn get(&self, i: usize) -> f32 {
        self.data[i]
    }

    #[inline]
    pub fn set(&mut self, i: usize, v: f32) {
        self.data[i] = v;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn to_array(&self) -> [f32; N] {
        core::array::from_fn(|i| self.data[i])
    }

    /// Overwrite every component.
    pub fn set_array(&mut self, values: [f32; N]) {
        self.data.copy_from_slice(&values);
    }

    /// Copy another vector's components into this one.
    pub fn set_from(&mut self, other: &Vector<N>) {
        self.data.copy_from_slice(&other.data);
    }

    pub fn copy_from_slice(&mut self, values: &[f32]) -> Result<(), MathError> {
        check_len(N, values.len())?;
        self.data.copy_from_slice(values);
        Ok(())
    }

    pub fn fill(&mut self, v: f32) {
        self.data.fill(v);
    }

    pub fn dot(&self, other: &Vector<N>) -> f32 {
        self.data.iter().zip(other.data.iter()).map(|(a, b)| a * b).sum()
    }

    /// Squared magnitude.
    pub fn mag2(&self) -> f32 {
        self.dot(self)
    }

    pub fn magnitude(&self) -> f32 {
        self.mag2().sqrt()
    }

    /// Scale to unit length. A zero vector is left untouched and `false`
    /// is returned.
    pub fn normalize(&mut self) -> bool {
        let mag = self.magnitude();
        if mag == 0.0 {
            return false;
        }
        self.scale_by(1.0 / mag);
        true
    }

    pub fn scale_by(&mut self, f: f32) {
        self.data.iter_mut().for_each(|v| *v *= f);
    }

    /// `self = a * af + b * bf`
    pub fn linear_comb(&mut self, a: &Vector<N>, af: f32, b: &Vector<N>, bf: f32) {
        for (i, v) in self.data.iter_mut().enumerate() {
            *v = a.data[i] * af + b.data[i] * bf;
        }
    }

    /// Componentwise comparison within `eps`.
    pub fn approx_eq(&self, other: &Vector<N>, eps: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Vector<3> {
    /// `self = a x b`
    pub fn set_cross(&mut self, a: &Vector3, b: &Vector3) {
        let (a, b) = (&a.data, &b.data);
        let x = a[1] * b[2] - a[2] * b[1];
        let y = a[2] * b[0] - a[0] * b[2];
        let z = a[0] * b[1] - a[1] * b[0];
        self.set_array([x, y, z]);
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> From<[f32; N]> for Vector<N> {
    fn from(values: [f32; N]) -> Self {
        Self::from_array(values)
    }
}

impl<const N: usize> From<&Vector<N>> for [f32; N] {
    fn from(v: &Vector<N>) -> Self {
        v.to_array()
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.data[i]
    }
}

impl<const N: usize> AddAssign<&Vector<N>> for Vector<N> {
    fn add_assign(&mut self, other: &Vector<N>) {
        self.data.iter_mut().zip(other.data.iter()).for_each(|(a, b)| *a += b);
    }
}

impl<const N: usize> SubAssign<&Vector<N>> for Vector<N> {
    fn sub_assign(&mut self, other: &Vector<N>) {
        self.data.iter_mut().zip(other.data.iter()).for_each(|(a, b)| *a -= b);
    }
}

impl<const N: usize> fmt::Display for Vector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

impl<const N: usize> Reusable for Vector<N> {
    fn identity(&self) -> usize {
        self.data.as_ptr() as usize
    }
}

impl<const N: usize> Serialize for Vector<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.data.serialize(serializer)
    }
}

impl<'de, const N: usize> Deserialize<'de> for Vector<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<f32>::deserialize(deserializer)?;
        if values.len() != N {
            return Err(D::Error::invalid_length(values.len(), &"a vector of matching dimension"));
        }
        Ok(Self {
            data: values.into_boxed_slice(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_creation() {
        let v = Vector3::new();
        assert_eq!(v.to_array(), [0.0, 0.0, 0.0]);
        assert_eq!(v.dim(), 3);

        let v = Vector4::from([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v[3], 4.0);
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert!(Vector3::from_slice(&[1.0, 2.0, 3.0]).is_ok());
        assert_eq!(
            Vector3::from_slice(&[1.0, 2.0]).unwrap_err(),
            MathError::DimensionMismatch { expected: 3, actual: 2 }
        );

        let mut v = Vector2::new();
        assert!(v.copy_from_slice(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_dot_cross_normalize() {
        let x = Vector3::from([1.0, 0.0, 0.0]);
        let y = Vector3::from([0.0, 1.0, 0.0]);
        let mut z = Vector3::new();
        z.set_cross(&x, &y);
        assert_eq!(z.to_array(), [0.0, 0.0, 1.0]);
        assert_eq!(x.dot(&y), 0.0);

        let mut v = Vector3::from([3.0, 0.0, 4.0]);
        assert_eq!(v.mag2(), 25.0);
        assert!(v.normalize());
        assert!(v.approx_eq(&Vector3::from([0.6, 0.0, 0.8]), 1e-6));

        let mut zero = Vector3::new();
        assert!(!zero.normalize());
        assert_eq!(zero.mag2(), 0.0);
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Vector2::from([1.0, 2.0]);
        let b = Vector2::from([0.5, 0.5]);
        a += &b;
        assert_eq!(a.to_array(), [1.5, 2.5]);
        a -= &b;
        a.scale_by(2.0);
        assert_eq!(a.to_array(), [2.0, 4.0]);

        let mut c = Vector2::new();
        c.linear_comb(&a, 0.5, &b, 2.0);
        assert_eq!(c.to_array(), [2.0, 3.0]);
        assert_eq!(c.to_string(), "[2, 3]");
    }

    #[test]
    fn test_distinct_storage_identity() {
        let a = Vector3::new();
        let b = a.clone();
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn test_native_bytes() {
        let v = Vector3::from([1.0, -2.0, 0.5]);
        let bytes = v.to_native_bytes(&HeapStorage);
        assert_eq!(bytes.len(), 12);
        assert_eq!(Vector3::from_native_bytes(&bytes).unwrap(), v);
        assert!(Vector4::from_native_bytes(&bytes).is_err());
    }

    #[test]
    fn test_bincode_roundtrip() {
        let config = bincode::config::standard();
        let v = Vector3::from([1.0, 2.0, 3.0]);

        let encoded = bincode::serde::encode_to_vec(&v, config).expect("serialize failed");
        assert!(!encoded.is_empty());

        let (decoded, _): (Vector3, usize) =
            bincode::serde::decode_from_slice(&encoded, config).expect("deserialize failed");
        assert_eq!(v, decoded);

        // Wrong dimension is rejected
        let result: Result<(Vector4, usize), _> = bincode::serde::decode_from_slice(&encoded, config);
        assert!(result.is_err());
    }
}
