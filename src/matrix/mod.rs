//! Sparse matrix storage and structural operations.
//!
//! [`SparseMatrix`] is a compressed-sparse-row container generic over the
//! element type.  It provides construction from triples, tuple extraction,
//! transpose, permutation, predicate select (including the triangular
//! extractions used by the counting kernels), type casts, and the equality
//! predicates.  The multiply kernels live in [`crate::matrix::ops`].

pub mod market;
pub mod ops;
pub mod semiring;
pub mod vector;

pub use market::{read_matrix, read_matrix_any, write_matrix, AnyMatrix, MmHeader};
pub use semiring::Semiring;
pub use vector::SparseVector;

use crate::error::{GraphError, Result};
use crate::scalar::Scalar;
use crate::types::{checked_product, ScalarType};
use nalgebra::DMatrix;

/// Compressed-sparse-row matrix over a [`Scalar`] element type.
///
/// Explicit entries are the structure; absent positions carry no value.
/// Row pointers always have length `nrows + 1`, and column indices within
/// each row are sorted ascending.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseMatrix<T> {
    nrows: usize,
    ncols: usize,
    /// Row pointers: entries of row `i` live in `row_ptr[i]..row_ptr[i+1]`.
    row_ptr: Vec<usize>,
    /// Column index of each explicit entry, row-major.
    col_ind: Vec<usize>,
    /// Value of each explicit entry, parallel to `col_ind`.
    values: Vec<T>,
}

impl<T: Scalar> SparseMatrix<T> {
    /// Create an empty matrix of the given dimensions.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            row_ptr: vec![0; nrows + 1],
            col_ind: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from `(row, col, value)` triples, combining duplicates with
    /// `dup`.
    ///
    /// Out-of-range indices fail with [`GraphError::InvalidIndex`] and leave
    /// no partial result behind.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        mut triplets: Vec<(usize, usize, T)>,
        dup: impl Fn(T, T) -> T,
    ) -> Result<Self> {
        checked_product(triplets.len().max(1), core::mem::size_of::<T>().max(1))?;
        for &(r, c, _) in &triplets {
            if r >= nrows {
                return Err(GraphError::InvalidIndex {
                    index: r,
                    bound: nrows,
                    context: "from_triplets row",
                });
            }
            if c >= ncols {
                return Err(GraphError::InvalidIndex {
                    index: c,
                    bound: ncols,
                    context: "from_triplets column",
                });
            }
        }
        triplets.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut row_ptr = vec![0usize; nrows + 1];
        let mut col_ind = Vec::with_capacity(triplets.len());
        let mut values: Vec<T> = Vec::with_capacity(triplets.len());
        let mut current_row = 0usize;
        for (r, c, v) in triplets {
            while current_row < r {
                current_row += 1;
                row_ptr[current_row] = col_ind.len();
            }
            if let (Some(&last_c), true) = (col_ind.last(), row_ptr[current_row] < col_ind.len()) {
                if last_c == c {
                    let last = values.len() - 1;
                    values[last] = dup(values[last], v);
                    continue;
                }
            }
            col_ind.push(c);
            values.push(v);
        }
        while current_row < nrows {
            current_row += 1;
            row_ptr[current_row] = col_ind.len();
        }
        Ok(Self {
            nrows,
            ncols,
            row_ptr,
            col_ind,
            values,
        })
    }

    /// Diagonal matrix with `d[i]` at position `(i, i)` for every explicit
    /// entry of `d`.
    pub fn diagonal(d: &SparseVector<T>) -> Self {
        let n = d.len();
        let mut row_ptr = vec![0usize; n + 1];
        let mut col_ind = Vec::with_capacity(d.nvals());
        let mut values = Vec::with_capacity(d.nvals());
        let mut at = 0usize;
        for i in 0..n {
            if let Some(&v) = d.get(i) {
                col_ind.push(i);
                values.push(v);
                at += 1;
            }
            row_ptr[i + 1] = at;
        }
        Self {
            nrows: n,
            ncols: n,
            row_ptr,
            col_ind,
            values,
        }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of explicit entries.
    pub fn nvals(&self) -> usize {
        self.col_ind.len()
    }

    /// Runtime element-type tag.
    pub fn scalar_type(&self) -> ScalarType {
        T::TYPE
    }

    /// True when `nrows == ncols`.
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Column indices and values of row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[T]) {
        let span = self.row_ptr[i]..self.row_ptr[i + 1];
        (&self.col_ind[span.clone()], &self.values[span])
    }

    /// Number of explicit entries in row `i`.
    pub fn row_nvals(&self, i: usize) -> usize {
        self.row_ptr[i + 1] - self.row_ptr[i]
    }

    /// Value at `(row, col)`, if present.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.nrows {
            return None;
        }
        let (cols, vals) = self.row(row);
        cols.binary_search(&col).ok().map(|p| vals[p])
    }

    /// Insert or overwrite the entry at `(row, col)`.
    ///
    /// Splices the CSR arrays; intended for construction and tests, not for
    /// bulk updates.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.nrows {
            return Err(GraphError::InvalidIndex {
                index: row,
                bound: self.nrows,
                context: "set row",
            });
        }
        if col >= self.ncols {
            return Err(GraphError::InvalidIndex {
                index: col,
                bound: self.ncols,
                context: "set column",
            });
        }
        let span = self.row_ptr[row]..self.row_ptr[row + 1];
        match self.col_ind[span.clone()].binary_search(&col) {
            Ok(p) => {
                self.values[span.start + p] = value;
            }
            Err(p) => {
                let at = span.start + p;
                self.col_ind.insert(at, col);
                self.values.insert(at, value);
                for rp in self.row_ptr[row + 1..].iter_mut() {
                    *rp += 1;
                }
            }
        }
        Ok(())
    }

    /// Iterate all explicit entries as `(row, col, &value)`, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        (0..self.nrows).flat_map(move |i| {
            let (cols, vals) = self.row(i);
            cols.iter().zip(vals).map(move |(&j, v)| (i, j, v))
        })
    }

    /// Extract all entries as parallel `(rows, cols, values)` arrays,
    /// row-major order.
    pub fn extract_tuples(&self) -> (Vec<usize>, Vec<usize>, Vec<T>) {
        let mut rows = Vec::with_capacity(self.nvals());
        for i in 0..self.nrows {
            rows.extend(std::iter::repeat(i).take(self.row_nvals(i)));
        }
        (rows, self.col_ind.clone(), self.values.clone())
    }

    /// Transposed copy, built with a counting sort over columns.
    pub fn transpose(&self) -> Self {
        let mut counts = vec![0usize; self.ncols + 1];
        for &c in &self.col_ind {
            counts[c + 1] += 1;
        }
        for j in 0..self.ncols {
            counts[j + 1] += counts[j];
        }
        let row_ptr = counts.clone();
        let mut col_ind = vec![0usize; self.nvals()];
        let mut values = vec![T::zero(); self.nvals()];
        for i in 0..self.nrows {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals) {
                let at = counts[j];
                counts[j] += 1;
                col_ind[at] = i;
                values[at] = v;
            }
        }
        Self {
            nrows: self.ncols,
            ncols: self.nrows,
            row_ptr,
            col_ind,
            values,
        }
    }

    /// Symmetric permutation `A(P, P)`: entry `(i, j)` of the result is
    /// `A[perm[i], perm[j]]`.  `perm` must be a permutation of `0..n`.
    pub fn permute_symmetric(&self, perm: &[usize]) -> Result<Self> {
        if !self.is_square() {
            return Err(GraphError::InvalidGraph(
                "symmetric permutation needs a square matrix".into(),
            ));
        }
        if perm.len() != self.nrows {
            return Err(GraphError::DimensionMismatch {
                expected: self.nrows,
                actual: perm.len(),
                operation: "permute_symmetric",
            });
        }
        let mut inverse = vec![usize::MAX; self.nrows];
        for (new, &old) in perm.iter().enumerate() {
            if old >= self.nrows || inverse[old] != usize::MAX {
                return Err(GraphError::invalid_value(
                    "permute_symmetric",
                    "perm is not a permutation",
                ));
            }
            inverse[old] = new;
        }
        let mut triplets = Vec::with_capacity(self.nvals());
        for new_row in 0..self.nrows {
            let (cols, vals) = self.row(perm[new_row]);
            for (&j, &v) in cols.iter().zip(vals) {
                triplets.push((new_row, inverse[j], v));
            }
        }
        Self::from_triplets(self.nrows, self.ncols, triplets, |a, _| a)
    }

    /// Entries satisfying `keep(row, col, value)`.
    pub fn select(&self, keep: impl Fn(usize, usize, &T) -> bool) -> Self {
        let mut row_ptr = vec![0usize; self.nrows + 1];
        let mut col_ind = Vec::new();
        let mut values = Vec::new();
        for i in 0..self.nrows {
            let (cols, vals) = self.row(i);
            for (&j, v) in cols.iter().zip(vals) {
                if keep(i, j, v) {
                    col_ind.push(j);
                    values.push(*v);
                }
            }
            row_ptr[i + 1] = col_ind.len();
        }
        Self {
            nrows: self.nrows,
            ncols: self.ncols,
            row_ptr,
            col_ind,
            values,
        }
    }

    /// Strictly-lower-triangular part (entries with `col < row + offset`).
    /// `tril(-1)` is the conventional strict lower triangle.
    pub fn tril(&self, offset: i64) -> Self {
        self.select(|i, j, _| (j as i64) <= (i as i64) + offset)
    }

    /// Upper-triangular counterpart of [`SparseMatrix::tril`]; `triu(1)` is
    /// the strict upper triangle.
    pub fn triu(&self, offset: i64) -> Self {
        self.select(|i, j, _| (j as i64) >= (i as i64) + offset)
    }

    /// Entries off the diagonal.
    pub fn offdiag(&self) -> Self {
        self.select(|i, j, _| i != j)
    }

    /// Number of explicit diagonal entries.
    pub fn ndiag(&self) -> u64 {
        (0..self.nrows.min(self.ncols))
            .filter(|&i| self.get(i, i).is_some())
            .count() as u64
    }

    /// Same structure, every value mapped through `f`.
    pub fn map<U: Scalar>(&self, f: impl Fn(&T) -> U) -> SparseMatrix<U> {
        SparseMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            row_ptr: self.row_ptr.clone(),
            col_ind: self.col_ind.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }

    /// Cast to another element type through the complex-pair conversion
    /// (lossless for the promotions the library performs).
    pub fn cast<U: Scalar>(&self) -> SparseMatrix<U> {
        self.map(|v| {
            let (re, im) = v.to_complex();
            U::from_complex(re, im)
        })
    }

    /// Same structure with every value replaced by `true`.
    pub fn to_pattern(&self) -> SparseMatrix<bool> {
        self.map(|_| true)
    }

    /// True when both matrices have identical dimensions and structure
    /// (values ignored).
    pub fn eq_structure<U: Scalar>(&self, other: &SparseMatrix<U>) -> bool {
        self.nrows == other.nrows
            && self.ncols == other.ncols
            && self.row_ptr == other.row_ptr
            && self.col_ind == other.col_ind
    }

    /// Structure-and-values equality under a caller-supplied predicate,
    /// after a dimension check.  This is the general form of the equality
    /// helpers; see [`SparseMatrix::is_equal`] for the `==` instantiation.
    pub fn isall(&self, other: &Self, op: impl Fn(&T, &T) -> bool) -> bool {
        self.eq_structure(other)
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| op(a, b))
    }

    /// Exact equality: same dimensions, structure, and values.
    ///
    /// `NaN` entries compare unequal, as in any `==` on floats; use
    /// [`SparseMatrix::isall`] with a NaN-tolerant predicate when that
    /// matters.
    pub fn is_equal(&self, other: &Self) -> bool {
        self.isall(other, |a, b| a == b)
    }

    /// Dense `f64` rendition, used by the reference oracles in tests.
    /// Absent entries become `0.0`.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.nrows, self.ncols);
        for (i, j, v) in self.iter() {
            dense[(i, j)] = v.to_f64();
        }
        dense
    }

    /// Borrow the raw CSR pattern (row pointers and column indices).
    pub(crate) fn pattern_parts(&self) -> (&[usize], &[usize]) {
        (&self.row_ptr, &self.col_ind)
    }

    /// Assemble from raw CSR parts; debug-asserts consistency.
    pub(crate) fn from_csr_parts(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_ind: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        debug_assert_eq!(row_ptr.len(), nrows + 1);
        debug_assert_eq!(col_ind.len(), values.len());
        debug_assert_eq!(*row_ptr.last().unwrap_or(&0), col_ind.len());
        Self {
            nrows,
            ncols,
            row_ptr,
            col_ind,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SparseMatrix<f64> {
        // [ .  1 .  ]
        // [ 2  . 3  ]
        // [ .  4 .  ]
        SparseMatrix::from_triplets(
            3,
            3,
            vec![(0, 1, 1.0), (1, 0, 2.0), (1, 2, 3.0), (2, 1, 4.0)],
            |a, _| a,
        )
        .unwrap()
    }

    #[test]
    fn build_and_get() {
        let a = small();
        assert_eq!(a.nvals(), 4);
        assert_eq!(a.get(1, 2), Some(3.0));
        assert_eq!(a.get(0, 0), None);
        assert_eq!(a.scalar_type(), ScalarType::Fp64);
    }

    #[test]
    fn duplicates_are_combined() {
        let a = SparseMatrix::from_triplets(
            2,
            2,
            vec![(0, 0, 1.0), (0, 0, 2.5), (1, 1, 1.0)],
            |x, y| x + y,
        )
        .unwrap();
        assert_eq!(a.get(0, 0), Some(3.5));
        assert_eq!(a.nvals(), 2);
    }

    #[test]
    fn out_of_range_triplet_is_rejected() {
        let err = SparseMatrix::from_triplets(2, 2, vec![(0, 5, 1.0)], |a: f64, _| a);
        assert!(err.is_err());
    }

    #[test]
    fn transpose_round_trip() {
        let a = small();
        let att = a.transpose().transpose();
        assert!(a.is_equal(&att));
        assert_eq!(a.transpose().get(2, 1), Some(3.0));
    }

    #[test]
    fn triangular_parts() {
        let a = small();
        let l = a.tril(-1);
        let u = a.triu(1);
        assert_eq!(l.nvals(), 2);
        assert_eq!(u.nvals(), 2);
        assert_eq!(l.nvals() + u.nvals() + a.ndiag() as usize, a.nvals());
    }

    #[test]
    fn symmetric_permutation() {
        let a = small();
        let p = vec![2, 0, 1];
        let b = a.permute_symmetric(&p).unwrap();
        for (i, j, &v) in b.iter() {
            assert_eq!(a.get(p[i], p[j]), Some(v));
        }
        assert_eq!(b.nvals(), a.nvals());
    }

    #[test]
    fn set_splices_in_place() {
        let mut a = small();
        a.set(0, 0, 9.0).unwrap();
        assert_eq!(a.get(0, 0), Some(9.0));
        assert_eq!(a.nvals(), 5);
        a.set(0, 0, 7.0).unwrap();
        assert_eq!(a.get(0, 0), Some(7.0));
        assert_eq!(a.nvals(), 5);
    }

    #[test]
    fn dense_oracle_matches() {
        let a = small();
        let d = a.to_dense();
        assert_eq!(d[(1, 2)], 3.0);
        assert_eq!(d[(0, 0)], 0.0);
        assert_eq!(d.sum(), 10.0);
    }
}
