// src/numerics/types/matrix.rs
// Owned matrix shapes: a plain 3x3, and the two affine-capable shapes (3x4
// with an implicit bottom row, full 4x4) that carry a structure tag.

use core::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use stash::Reusable;

use crate::numerics::error::{check_len, MathError};
use crate::numerics::kernels;
use crate::numerics::storage::{self, HeapStorage, StorageProvider};
use crate::numerics::transform::inspect;
use crate::numerics::transform::Structure;
use crate::numerics::types::traits::{
    copy_reshaped, MatMut, MatRef, Matrix, MatrixMut, IDENTITY_3X3, IDENTITY_3X4, IDENTITY_4X4,
};

/// Shared plumbing: storage accessors, pooling identity and `Default`.
macro_rules! storage_matrix {
    ($name:ident, $rows:expr, $cols:expr) => {
        impl $name {
            pub const ROWS: usize = $rows;
            pub const COLUMNS: usize = $cols;

            /// Identity matrix on the heap.
            pub fn new() -> Self {
                Self::with_provider(&HeapStorage)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Matrix for $name {
            #[inline]
            fn rows(&self) -> usize {
                $rows
            }
            #[inline]
            fn columns(&self) -> usize {
                $cols
            }
            #[inline]
            fn as_slice(&self) -> &[f32] {
                &self.data
            }
        }

        impl Reusable for $name {
            fn identity(&self) -> usize {
                self.data.as_ptr() as usize
            }
        }
    };
}

fn fmt_rows<M: Matrix + ?Sized>(m: &M, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for r in 0..m.rows() {
        write!(f, "[")?;
        for c in 0..m.columns() {
            if c > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:>10.4}", m.get(r, c))?;
        }
        writeln!(f, "]")?;
    }
    Ok(())
}

fn deserialize_values<'de, D>(deserializer: D, expected: usize) -> Result<Box<[f32]>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values = Vec::<f32>::deserialize(deserializer)?;
    if values.len() != expected {
        return Err(D::Error::invalid_length(values.len(), &"a matrix of matching shape"));
    }
    Ok(values.into_boxed_slice())
}

fn storage_from(provider: &dyn StorageProvider, template: &[f32]) -> Box<[f32]> {
    let mut data = provider.create_float_storage(template.len());
    data.copy_from_slice(template);
    data
}

/// 3x3 column-major matrix. Carries no structure tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat3 {
    data: Box<[f32]>,
}

storage_matrix!(Mat3, 3, 3);

impl Mat3 {
    /// Identity matrix backed by `provider`.
    pub fn with_provider(provider: &dyn StorageProvider) -> Self {
        Self {
            data: storage_from(provider, &IDENTITY_3X3),
        }
    }

    pub fn zero() -> Self {
        Self {
            data: HeapStorage.create_float_storage(9),
        }
    }

    pub fn from_column_major(values: &[f32]) -> Result<Self, MathError> {
        check_len(9, values.len())?;
        Ok(Self { data: values.into() })
    }

    /// Construct a new matrix from 3 rows
    pub fn from_rows(r0: [f32; 3], r1: [f32; 3], r2: [f32; 3]) -> Self {
        Self {
            data: Box::new([r0[0], r1[0], r2[0], r0[1], r1[1], r2[1], r0[2], r1[2], r2[2]]),
        }
    }

    /// Construct a new matrix from 3 columns
    pub fn from_columns(c0: [f32; 3], c1: [f32; 3], c2: [f32; 3]) -> Self {
        Self {
            data: Box::new([c0[0], c0[1], c0[2], c1[0], c1[1], c1[2], c2[0], c2[1], c2[2]]),
        }
    }

    pub fn from_native_bytes(bytes: &[u8]) -> Result<Self, MathError> {
        let mut m = Self::zero();
        storage::read_native_bytes(bytes, &mut m.data)?;
        Ok(m)
    }

    pub fn determinant(&self) -> f32 {
        kernels::invert::determinant33(self)
    }

    /// `self = lhs * rhs`, reading the 3x3 blocks of both operands.
    pub fn set_product<L: Matrix + ?Sized, R: Matrix + ?Sized>(&mut self, lhs: &L, rhs: &R) {
        kernels::mul33(self, lhs, rhs);
    }

    /// `self = self * rhs`
    pub fn post_multiply<R: Matrix + ?Sized>(&mut self, rhs: &R) {
        kernels::mul33_post_assign(self, rhs);
    }

    /// `self = lhs * self`
    pub fn pre_multiply<L: Matrix + ?Sized>(&mut self, lhs: &L) {
        kernels::mul33_pre_assign(lhs, self);
    }

    /// `self = self * self`
    pub fn square(&mut self) {
        kernels::mul33_square(self);
    }

    /// Write the inverse into `dest`. Fails on a singular matrix, leaving
    /// `dest` untouched.
    pub fn invert_into(&self, dest: &mut Mat3) -> Result<(), MathError> {
        kernels::invert33(dest, self)
    }

    /// Invert in place; untouched on failure.
    pub fn invert(&mut self) -> Result<(), MathError> {
        let snapshot: [f32; 9] = core::array::from_fn(|k| self.data[k]);
        kernels::invert33(self, &MatRef::new_unchecked(&snapshot, 3, 3))
    }

    /// `self = (L^-1)^T` for the 3x3 block `L` of `m`: the matrix that maps
    /// surface normals through `m`.
    pub fn set_normal_of<M: Matrix + ?Sized>(&mut self, m: &M) -> Result<(), MathError> {
        kernels::transpose_inverse33(self, m)
    }
}

impl MatrixMut for Mat3 {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

impl fmt::Display for Mat3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_rows(self, f)
    }
}

impl Serialize for Mat3 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.data.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Mat3 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self {
            data: deserialize_values(deserializer, 9)?,
        })
    }
}

/// Affine transform stored as 3 rows by 4 columns: linear block in the first
/// three columns, translation in the fourth. The bottom row `[0, 0, 0, 1]`
/// is implicit.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat3x4 {
    data: Box<[f32]>,
    structure: Structure,
}

storage_matrix!(Mat3x4, 3, 4);

impl Mat3x4 {
    /// Identity transform backed by `provider`.
    pub fn with_provider(provider: &dyn StorageProvider) -> Self {
        Self {
            data: storage_from(provider, &IDENTITY_3X4),
            structure: Structure::Identity,
        }
    }

    /// Wrap raw column-major values. Nothing is known about them, so the
    /// result is tagged general until inspected.
    pub fn from_column_major(values: &[f32]) -> Result<Self, MathError> {
        check_len(12, values.len())?;
        Ok(Self {
            data: values.into(),
            structure: Structure::General,
        })
    }

    pub fn from_native_bytes(bytes: &[u8]) -> Result<Self, MathError> {
        let mut m = Self::new();
        storage::read_native_bytes(bytes, &mut m.data)?;
        m.structure = Structure::General;
        Ok(m)
    }

    /// View of the 3x3 linear block.
    pub fn linear(&self) -> MatRef<'_> {
        MatRef::new_unchecked(&self.data[..9], 3, 3)
    }

    /// Mutable view of the 3x3 linear block; writes land in this transform
    /// and leave its tag alone.
    pub fn linear_mut(&mut self) -> MatMut<'_> {
        MatMut::new_unchecked(&mut self.data[..9], 3, 3)
    }

    /// `self = self * rhs`, densely; the result is tagged general.
    pub fn post_multiply<R: Matrix + ?Sized>(&mut self, rhs: &R) {
        kernels::mul34_post_assign(self, rhs);
        self.structure = Structure::General;
    }

    /// `self = lhs * self`, densely; the result is tagged general.
    pub fn pre_multiply<L: Matrix + ?Sized>(&mut self, lhs: &L) {
        kernels::mul34_pre_assign(lhs, self);
        self.structure = Structure::General;
    }

    /// `self = self * self`, densely; the result is tagged general.
    pub fn square(&mut self) {
        kernels::mul34_square(self);
        self.structure = Structure::General;
    }
}

/// 4x4 column-major matrix, affine or projective.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat4 {
    data: Box<[f32]>,
    structure: Structure,
}

storage_matrix!(Mat4, 4, 4);

impl Mat4 {
    /// Identity matrix backed by `provider`.
    pub fn with_provider(provider: &dyn StorageProvider) -> Self {
        Self {
            data: storage_from(provider, &IDENTITY_4X4),
            structure: Structure::Identity,
        }
    }

    /// Wrap raw column-major values, tagged general until inspected.
    pub fn from_column_major(values: &[f32]) -> Result<Self, MathError> {
        check_len(16, values.len())?;
        Ok(Self {
            data: values.into(),
            structure: Structure::General,
        })
    }

    pub fn from_native_bytes(bytes: &[u8]) -> Result<Self, MathError> {
        let mut m = Self::new();
        storage::read_native_bytes(bytes, &mut m.data)?;
        m.structure = Structure::General;
        Ok(m)
    }

    /// Copy the upper-left 3x3 block into `dest`.
    pub fn matrix3_into(&self, dest: &mut Mat3) {
        dest.copy_from(self);
    }

    /// Clear the translation column and the projective row, leaving only the
    /// linear block.
    pub fn make_matrix3(&mut self) {
        for i in 0..3 {
            self.data[12 + i] = 0.0;
            self.data[4 * i + 3] = 0.0;
        }
        self.data[15] = 1.0;
        self.structure = self.structure.without_translation();
    }

    /// `self = self * rhs`, densely; the result is tagged general.
    pub fn post_multiply<R: Matrix + ?Sized>(&mut self, rhs: &R) {
        kernels::mul44_post_assign(self, rhs);
        self.structure = Structure::General;
    }

    /// `self = lhs * self`, densely; the result is tagged general.
    pub fn pre_multiply<L: Matrix + ?Sized>(&mut self, lhs: &L) {
        kernels::mul44_pre_assign(lhs, self);
        self.structure = Structure::General;
    }

    /// `self = self * self`, densely; the result is tagged general.
    pub fn square(&mut self) {
        kernels::mul44_square(self);
        self.structure = Structure::General;
    }
}

/// Tagged shapes: identity and zero fills know their structure, a reshaping
/// copy does not.
macro_rules! tagged_matrix {
    ($name:ident, $template:expr, $len:expr) => {
        impl MatrixMut for $name {
            #[inline]
            fn as_mut_slice(&mut self) -> &mut [f32] {
                &mut self.data
            }

            fn make_identity(&mut self) {
                self.data.copy_from_slice(&$template);
                self.structure = Structure::Identity;
            }

            fn make_zero(&mut self) {
                self.data.fill(0.0);
                self.structure = Structure::General;
            }

            fn copy_from<M: Matrix + ?Sized>(&mut self, src: &M) {
                copy_reshaped(self, src);
                self.structure = Structure::General;
            }
        }

        impl $name {
            pub(crate) fn tag(&self) -> Structure {
                self.structure
            }

            pub(crate) fn set_tag(&mut self, structure: Structure) {
                self.structure = structure;
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt_rows(self, f)?;
                write!(f, "structure={}", self.structure)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                (self.structure, &*self.data).serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let (structure, values) = <(Structure, Vec<f32>)>::deserialize(deserializer)?;
                if values.len() != $len {
                    return Err(D::Error::invalid_length(values.len(), &"a matrix of matching shape"));
                }
                let mut m = Self {
                    data: values.into_boxed_slice(),
                    structure,
                };
                // A tag that does not describe the contents is not trusted
                if !inspect::is_sound(&m, structure) {
                    m.structure = inspect::inspect(&m);
                }
                Ok(m)
            }
        }
    };
}

tagged_matrix!(Mat3x4, IDENTITY_3X4, 12);
tagged_matrix!(Mat4, IDENTITY_4X4, 16);
