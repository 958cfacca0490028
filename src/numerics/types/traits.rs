// src/numerics/types/traits.rs
// Storage-level matrix traits shared by every matrix shape and view.

use crate::numerics::error::{check_len, MathError};
use crate::numerics::storage::{self, StorageProvider};
use crate::numerics::types::vector::Vector;
use crate::scratch::{Pooled, Scratch};

/// Column-major identity templates, one per supported shape.
pub(crate) const IDENTITY_3X3: [f32; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
pub(crate) const IDENTITY_3X4: [f32; 12] = [
    1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
];
pub(crate) const IDENTITY_4X4: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
];

fn identity_template(rows: usize, cols: usize) -> Option<&'static [f32]> {
    match (rows, cols) {
        (3, 3) => Some(&IDENTITY_3X3),
        (3, 4) => Some(&IDENTITY_3X4),
        (4, 4) => Some(&IDENTITY_4X4),
        _ => None,
    }
}

/// Read access to a column-major float matrix.
///
/// Reads outside the stored shape behave as if the matrix were embedded in an
/// infinite identity: `get(r, c)` is 1 when `r == c` and 0 otherwise. A 3x4
/// affine matrix therefore reads as a 4x4 one with bottom row `[0, 0, 0, 1]`,
/// and a 3x3 one as a 4x4 with no translation.
pub trait Matrix {
    fn rows(&self) -> usize;
    fn columns(&self) -> usize;

    /// Backing storage, column-major, `rows * columns` long.
    fn as_slice(&self) -> &[f32];

    #[inline]
    fn get(&self, r: usize, c: usize) -> f32 {
        let rows = self.rows();
        if r >= rows || c >= self.columns() {
            if r == c {
                1.0
            } else {
                0.0
            }
        } else {
            self.as_slice()[c * rows + r]
        }
    }

    /// Stored entries of column `c`.
    fn column(&self, c: usize) -> &[f32] {
        let rows = self.rows();
        &self.as_slice()[c * rows..(c + 1) * rows]
    }

    /// Row `r` as four entries, identity-extended past the stored shape.
    fn row(&self, r: usize) -> [f32; 4] {
        [self.get(r, 0), self.get(r, 1), self.get(r, 2), self.get(r, 3)]
    }

    /// Exact identity test over the stored entries.
    fn is_identity(&self) -> bool {
        let rows = self.rows();
        self.as_slice().iter().enumerate().all(|(i, &v)| {
            let expected = if i % rows == i / rows { 1.0 } else { 0.0 };
            v == expected
        })
    }

    /// Compare the identity-extended 4x4 views of two matrices.
    fn approx_eq<M: Matrix + ?Sized>(&self, other: &M, eps: f32) -> bool {
        (0..4).all(|r| (0..4).all(|c| (self.get(r, c) - other.get(r, c)).abs() <= eps))
    }

    /// Write the transpose into `dest`, clipped to `dest`'s shape.
    fn transpose_into<D: MatrixMut + ?Sized>(&self, dest: &mut D) {
        for r in 0..dest.rows() {
            for c in 0..dest.columns() {
                dest.set(r, c, self.get(c, r));
            }
        }
    }

    /// `out = M * (p, 1)`: the input is a point, missing coordinates up to
    /// the homogeneous `w = 1` are taken from the identity.
    fn transform_point<const I: usize, const O: usize>(&self, input: &Vector<I>, out: &mut Vector<O>) {
        let p = input.as_slice();
        for k in 0..O {
            let mut acc = 0.0;
            for (j, &v) in p.iter().enumerate().take(4) {
                acc += self.get(k, j) * v;
            }
            if I < 4 {
                acc += self.get(k, 3);
            }
            out.set(k, acc);
        }
    }

    /// `out = L * v` for the linear block only; translation is ignored.
    fn transform_vector<const I: usize, const O: usize>(&self, input: &Vector<I>, out: &mut Vector<O>) {
        let v = input.as_slice();
        for k in 0..O {
            let mut acc = 0.0;
            for (j, &x) in v.iter().enumerate().take(3) {
                acc += self.get(k, j) * x;
            }
            out.set(k, acc);
        }
    }

    /// `v = M * (v, 1)`, through a temporary leased from `scratch`.
    fn transform_point_in_place<const N: usize>(&self, v: &mut Vector<N>, scratch: &Scratch)
    where
        Vector<N>: Pooled,
    {
        let mut tmp = scratch.lease::<Vector<N>>();
        self.transform_point(v, &mut tmp);
        v.set_from(&tmp);
    }

    /// `v = L * v`, through a temporary leased from `scratch`.
    fn transform_vector_in_place<const N: usize>(&self, v: &mut Vector<N>, scratch: &Scratch)
    where
        Vector<N>: Pooled,
    {
        let mut tmp = scratch.lease::<Vector<N>>();
        self.transform_vector(v, &mut tmp);
        v.set_from(&tmp);
    }

    /// Native-endian byte image of the backing storage.
    fn to_native_bytes(&self, provider: &dyn StorageProvider) -> Box<[u8]> {
        storage::to_native_bytes(self.as_slice(), provider)
    }
}

/// Write access to a column-major float matrix.
///
/// None of these operations touch a transform's structure tag; overriding
/// implementations do so only where the result is known (identity, zero).
pub trait MatrixMut: Matrix {
    fn as_mut_slice(&mut self) -> &mut [f32];

    /// Store `v` at `(r, c)`. Panics outside the stored shape.
    #[inline]
    fn set(&mut self, r: usize, c: usize, v: f32) {
        let rows = self.rows();
        assert!(r < rows && c < self.columns(), "({r}, {c}) outside the stored shape");
        self.as_mut_slice()[c * rows + r] = v;
    }

    /// Like [`MatrixMut::set`], but silently ignores writes outside the shape.
    #[inline]
    fn safe_set(&mut self, r: usize, c: usize, v: f32) {
        if r < self.rows() && c < self.columns() {
            self.set(r, c, v);
        }
    }

    fn column_mut(&mut self, c: usize) -> &mut [f32] {
        let rows = self.rows();
        &mut self.as_mut_slice()[c * rows..(c + 1) * rows]
    }

    /// Overwrite the leading entries of row `r`; extra values are ignored.
    fn set_row(&mut self, r: usize, values: &[f32]) {
        let cols = self.columns();
        for (c, &v) in values.iter().enumerate().take(cols) {
            self.set(r, c, v);
        }
    }

    /// Overwrite the whole storage from a column-major slice.
    fn copy_from_slice(&mut self, values: &[f32]) -> Result<(), MathError> {
        let dest = self.as_mut_slice();
        check_len(dest.len(), values.len())?;
        dest.copy_from_slice(values);
        Ok(())
    }

    fn make_identity(&mut self) {
        let (rows, cols) = (self.rows(), self.columns());
        match identity_template(rows, cols) {
            Some(template) => self.as_mut_slice().copy_from_slice(template),
            None => {
                let data = self.as_mut_slice();
                for (i, v) in data.iter_mut().enumerate() {
                    *v = if i % rows == i / rows { 1.0 } else { 0.0 };
                }
            }
        }
    }

    fn make_zero(&mut self) {
        self.as_mut_slice().fill(0.0);
    }

    /// Copy `src` into `self`, reshaping as needed.
    ///
    /// Same row count: columns are copied verbatim, extra destination columns
    /// become identity columns and extra source columns are dropped. Different
    /// row count: every destination cell reads the identity-extended source.
    fn copy_from<M: Matrix + ?Sized>(&mut self, src: &M) {
        copy_reshaped(self, src);
    }

    /// Transpose the leading `min(rows, cols)` square block in place.
    fn transpose_in_place(&mut self) {
        let n = self.rows().min(self.columns());
        for r in 0..n {
            for c in (r + 1)..n {
                let upper = self.get(r, c);
                let lower = self.get(c, r);
                self.set(r, c, lower);
                self.set(c, r, upper);
            }
        }
    }

    /// Multiply every entry by `f`.
    fn scale_by(&mut self, f: f32) {
        self.as_mut_slice().iter_mut().for_each(|v| *v *= f);
    }

    /// `self = a * f`, over the shared stored shape.
    fn set_scaled<A: Matrix + ?Sized>(&mut self, a: &A, f: f32) {
        for c in 0..self.columns() {
            for r in 0..self.rows() {
                self.set(r, c, a.get(r, c) * f);
            }
        }
    }

    /// `self = a + b`.
    fn add<A: Matrix + ?Sized, B: Matrix + ?Sized>(&mut self, a: &A, b: &B) {
        self.linear_comb(a, 1.0, b, 1.0);
    }

    /// `self = a * af + b * b_f`.
    fn linear_comb<A: Matrix + ?Sized, B: Matrix + ?Sized>(&mut self, a: &A, af: f32, b: &B, bf: f32) {
        for c in 0..self.columns() {
            for r in 0..self.rows() {
                self.set(r, c, a.get(r, c) * af + b.get(r, c) * bf);
            }
        }
    }

    /// `self = self * sf + b * bf`; the in-place form of [`MatrixMut::linear_comb`].
    fn linear_comb_in_place<B: Matrix + ?Sized>(&mut self, sf: f32, b: &B, bf: f32) {
        for c in 0..self.columns() {
            for r in 0..self.rows() {
                let v = self.get(r, c) * sf + b.get(r, c) * bf;
                self.set(r, c, v);
            }
        }
    }

    /// `self = a*af + b*bf + c*cf + d*df`.
    #[allow(clippy::too_many_arguments)]
    fn linear_comb4<A, B, C, D>(&mut self, a: &A, af: f32, b: &B, bf: f32, c: &C, cf: f32, d: &D, df: f32)
    where
        A: Matrix + ?Sized,
        B: Matrix + ?Sized,
        C: Matrix + ?Sized,
        D: Matrix + ?Sized,
    {
        for col in 0..self.columns() {
            for r in 0..self.rows() {
                let v = a.get(r, col) * af + b.get(r, col) * bf + c.get(r, col) * cf + d.get(r, col) * df;
                self.set(r, col, v);
            }
        }
    }

    /// Swap two rows in place
    fn swap_rows(&mut self, r1: usize, r2: usize) {
        for c in 0..self.columns() {
            let a = self.get(r1, c);
            let b = self.get(r2, c);
            self.set(r1, c, b);
            self.set(r2, c, a);
        }
    }

    /// Scale a row by a scalar
    fn scale_row(&mut self, r: usize, f: f32) {
        for c in 0..self.columns() {
            let v = self.get(r, c) * f;
            self.set(r, c, v);
        }
    }

    /// Add `f * src_row` to `dest_row`
    fn add_row_multiple(&mut self, dest_row: usize, src_row: usize, f: f32) {
        for c in 0..self.columns() {
            let v = self.get(dest_row, c) + f * self.get(src_row, c);
            self.set(dest_row, c, v);
        }
    }
}

/// Body of [`MatrixMut::copy_from`], shared with overriding implementations.
pub(crate) fn copy_reshaped<D, M>(dest: &mut D, src: &M)
where
    D: MatrixMut + ?Sized,
    M: Matrix + ?Sized,
{
    let (rows, cols) = (dest.rows(), dest.columns());
    if rows == src.rows() {
        let shared = rows * cols.min(src.columns());
        if cols > src.columns() {
            dest.make_identity();
        }
        dest.as_mut_slice()[..shared].copy_from_slice(&src.as_slice()[..shared]);
    } else {
        for c in 0..cols {
            for r in 0..rows {
                dest.set(r, c, src.get(r, c));
            }
        }
    }
}

/// Borrowed read-only view over column-major storage.
#[derive(Debug, Clone, Copy)]
pub struct MatRef<'a> {
    data: &'a [f32],
    rows: usize,
    cols: usize,
}

impl<'a> MatRef<'a> {
    /// View `data` as a `rows x cols` matrix.
    pub fn from_slice(data: &'a [f32], rows: usize, cols: usize) -> Result<Self, MathError> {
        check_len(rows * cols, data.len())?;
        Ok(Self { data, rows, cols })
    }

    pub(crate) fn new_unchecked(data: &'a [f32], rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }
}

impl Matrix for MatRef<'_> {
    fn rows(&self) -> usize {
        self.rows
    }
    fn columns(&self) -> usize {
        self.cols
    }
    fn as_slice(&self) -> &[f32] {
        self.data
    }
}

/// Borrowed mutable view over column-major storage, e.g. the linear block of
/// a 3x4 transform. Writes go straight to the owner's storage.
#[derive(Debug)]
pub struct MatMut<'a> {
    data: &'a mut [f32],
    rows: usize,
    cols: usize,
}

impl<'a> MatMut<'a> {
    pub fn from_slice(data: &'a mut [f32], rows: usize, cols: usize) -> Result<Self, MathError> {
        check_len(rows * cols, data.len())?;
        Ok(Self { data, rows, cols })
    }

    pub(crate) fn new_unchecked(data: &'a mut [f32], rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }
}

impl Matrix for MatMut<'_> {
    fn rows(&self) -> usize {
        self.rows
    }
    fn columns(&self) -> usize {
        self.cols
    }
    fn as_slice(&self) -> &[f32] {
        self.data
    }
}

impl MatrixMut for MatMut<'_> {
    fn as_mut_slice(&mut self) -> &mut [f32] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_extension() {
        let data = [2.0f32; 9];
        let m = MatRef::from_slice(&data, 3, 3).unwrap();
        assert_eq!(m.get(1, 1), 2.0);
        assert_eq!(m.get(3, 3), 1.0);
        assert_eq!(m.get(0, 3), 0.0);
        assert_eq!(m.get(3, 0), 0.0);
        assert_eq!(m.get(7, 7), 1.0);
        assert_eq!(m.row(0), [2.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn test_view_length_checked() {
        let data = [0.0f32; 8];
        assert_eq!(
            MatRef::from_slice(&data, 3, 3).unwrap_err(),
            MathError::DimensionMismatch { expected: 9, actual: 8 }
        );
    }

    #[test]
    fn test_identity_and_zero_templates() {
        let mut data = [5.0f32; 12];
        let mut m = MatMut::from_slice(&mut data, 3, 4).unwrap();
        m.make_identity();
        assert!(m.is_identity());
        assert_eq!(m.as_slice(), &IDENTITY_3X4);
        m.make_zero();
        assert!(m.as_slice().iter().all(|&v| v == 0.0));

        // A shape without a template still gets a correct identity
        let mut odd = [3.0f32; 6];
        let mut m = MatMut::from_slice(&mut odd, 2, 3).unwrap();
        m.make_identity();
        assert_eq!(m.as_slice(), &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_copy_widening_and_narrowing() {
        // 3x3 into 3x4: linear block copied, translation column from identity
        let small: Vec<f32> = (1..=9).map(|v| v as f32).collect();
        let mut wide = [7.0f32; 12];
        MatMut::from_slice(&mut wide, 3, 4)
            .unwrap()
            .copy_from(&MatRef::from_slice(&small, 3, 3).unwrap());
        assert_eq!(&wide[..9], &small[..]);
        assert_eq!(&wide[9..], &[0.0, 0.0, 0.0]);

        // 3x4 into 3x3 drops the translation column
        let mut back = [0.0f32; 9];
        MatMut::from_slice(&mut back, 3, 3)
            .unwrap()
            .copy_from(&MatRef::from_slice(&wide, 3, 4).unwrap());
        assert_eq!(&back[..], &small[..]);

        // 3x4 into 4x4 gains the bottom row [0, 0, 0, 1]
        let mut full = [9.0f32; 16];
        let mut dest = MatMut::from_slice(&mut full, 4, 4).unwrap();
        dest.copy_from(&MatRef::from_slice(&wide, 3, 4).unwrap());
        assert_eq!(dest.row(3), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(dest.get(2, 1), 6.0);
    }

    #[test]
    fn test_transpose_leading_block() {
        let mut data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let mut m = MatMut::from_slice(&mut data, 3, 4).unwrap();
        let before = (m.get(0, 1), m.get(1, 0), m.get(2, 3));
        m.transpose_in_place();
        assert_eq!(m.get(1, 0), before.0);
        assert_eq!(m.get(0, 1), before.1);
        // translation column untouched
        assert_eq!(m.get(2, 3), before.2);
    }

    #[test]
    fn test_linear_combinations() {
        let a = [1.0f32; 9];
        let b = [2.0f32; 9];
        let a = MatRef::from_slice(&a, 3, 3).unwrap();
        let b = MatRef::from_slice(&b, 3, 3).unwrap();

        let mut out = [0.0f32; 9];
        let mut m = MatMut::from_slice(&mut out, 3, 3).unwrap();
        m.linear_comb(&a, 3.0, &b, -1.0);
        assert!(m.as_slice().iter().all(|&v| v == 1.0));

        m.linear_comb_in_place(2.0, &b, 0.5);
        assert!(m.as_slice().iter().all(|&v| v == 3.0));

        m.linear_comb4(&a, 1.0, &b, 1.0, &a, 1.0, &b, 1.0);
        assert!(m.as_slice().iter().all(|&v| v == 6.0));

        m.add(&a, &a);
        m.scale_by(0.5);
        assert!(m.as_slice().iter().all(|&v| v == 1.0));

        m.set_scaled(&b, 4.0);
        assert!(m.as_slice().iter().all(|&v| v == 8.0));
    }

    #[test]
    fn test_row_operations() {
        let mut data = IDENTITY_3X3;
        let mut m = MatMut::from_slice(&mut data, 3, 3).unwrap();
        m.set_row(0, &[1.0, 2.0, 3.0, 99.0]);
        m.swap_rows(0, 2);
        assert_eq!(m.row(2), [1.0, 2.0, 3.0, 0.0]);
        m.scale_row(2, 2.0);
        m.add_row_multiple(0, 2, 1.0);
        assert_eq!(m.row(0), [2.0, 4.0, 7.0, 0.0]);

        m.safe_set(5, 5, 1.0);
        m.column_mut(1)[1] = 8.0;
        assert_eq!(m.column(1), &[4.0, 8.0, 4.0]);
    }

    #[test]
    fn test_in_place_transforms_use_scratch() {
        let data = [
            0.0, 1.0, 0.0, //
            -1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, //
            5.0, 0.0, 0.0,
        ];
        let m = MatRef::from_slice(&data, 3, 4).unwrap();
        let scratch = Scratch::new();

        let mut p = Vector::from([1.0, 0.0, 0.0]);
        m.transform_point_in_place(&mut p, &scratch);
        assert_eq!(p.to_array(), [5.0, 1.0, 0.0]);

        let mut v = Vector::from([1.0, 0.0, 0.0]);
        m.transform_vector_in_place(&mut v, &scratch);
        assert_eq!(v.to_array(), [0.0, 1.0, 0.0]);
        assert_eq!(scratch.available::<Vector<3>>(), scratch.capacity::<Vector<3>>());
    }
}
