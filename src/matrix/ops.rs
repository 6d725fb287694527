//! Multiply and reduction kernels over semirings, with structural masks.
//!
//! Three multiply shapes cover every algorithm in the crate:
//!
//! - [`mxv`]: matrix · vector, row-driven ("pull"): good when the vector is
//!   dense relative to the matrix rows.
//! - [`vxm`]: vector · matrix, scatter-driven ("push"): good when the
//!   vector is sparse.
//! - [`mxm`] / [`mxm_masked`] / [`mxm_dot`]: matrix · matrix by Gustavson
//!   row merge, optionally restricted to an output pattern, and the
//!   `A · Bᵀ` dot-product form that the masked counting kernels use.
//!
//! Masks are structural: a sorted index set (vector case) or the pattern of
//! a matrix (matrix case), optionally complemented.  Kernels always compute
//! a fresh output (the engine's `replace` semantics); accumulation is the
//! caller's business via the element-wise combinators.

use super::semiring::Semiring;
use super::vector::SparseVector;
use super::SparseMatrix;
use crate::error::{GraphError, Result};
use crate::scalar::Scalar;
use bit_set::BitSet;

/// Structural mask over vector positions.
#[derive(Clone, Copy)]
pub struct VectorMask<'a> {
    /// Sorted positions carrying mask entries.
    pub indices: &'a [usize],
    /// When true the mask selects positions *not* listed.
    pub complement: bool,
}

impl<'a> VectorMask<'a> {
    /// Mask from the structural pattern of a vector.
    pub fn from_pattern<T: Scalar>(v: &'a SparseVector<T>, complement: bool) -> Self {
        Self {
            indices: v.pattern(),
            complement,
        }
    }
}

fn mask_test(mask: Option<VectorMask<'_>>, len: usize) -> impl Fn(usize) -> bool {
    let table = mask.map(|m| {
        let mut bits = BitSet::with_capacity(len);
        for &i in m.indices {
            bits.insert(i);
        }
        (bits, m.complement)
    });
    move |i: usize| match &table {
        None => true,
        Some((bits, complement)) => bits.contains(i) != *complement,
    }
}

/// Masked matrix-vector multiply (`w = A · u`), the pull direction.
///
/// `mul` receives `(A[i,k], u[k], k)` and the reduction runs over `k`.
pub fn mxv<A: Scalar, B: Scalar, C: Scalar>(
    a: &SparseMatrix<A>,
    u: &SparseVector<B>,
    s: &Semiring<A, B, C>,
    mask: Option<VectorMask<'_>>,
) -> Result<SparseVector<C>> {
    if a.ncols() != u.len() {
        return Err(GraphError::DimensionMismatch {
            expected: a.ncols(),
            actual: u.len(),
            operation: "mxv",
        });
    }
    let dense_u = u.to_dense();
    let allowed = mask_test(mask, a.nrows());
    let mut out = Vec::new();
    for i in 0..a.nrows() {
        if !allowed(i) {
            continue;
        }
        let (cols, vals) = a.row(i);
        let mut acc: Option<C> = None;
        for (&k, av) in cols.iter().zip(vals) {
            if let Some(uv) = &dense_u[k] {
                let contribution = (s.mul)(av, uv, k);
                acc = Some(match acc {
                    None => contribution,
                    Some(prev) => (s.add)(prev, contribution),
                });
                if s.is_any {
                    break;
                }
            }
        }
        if let Some(v) = acc {
            out.push((i, v));
        }
    }
    SparseVector::from_entries(a.nrows(), out, |x, _| x)
}

/// Masked vector-matrix multiply (`w = u · A`), the push direction.
///
/// `mul` receives `(u[k], A[k,j], k)`; contributions scatter into the
/// output positions `j`.
pub fn vxm<A: Scalar, B: Scalar, C: Scalar>(
    u: &SparseVector<A>,
    a: &SparseMatrix<B>,
    s: &Semiring<A, B, C>,
    mask: Option<VectorMask<'_>>,
) -> Result<SparseVector<C>> {
    if u.len() != a.nrows() {
        return Err(GraphError::DimensionMismatch {
            expected: a.nrows(),
            actual: u.len(),
            operation: "vxm",
        });
    }
    let allowed = mask_test(mask, a.ncols());
    let mut acc: Vec<Option<C>> = vec![None; a.ncols()];
    for (k, uv) in u.iter() {
        let (cols, vals) = a.row(k);
        for (&j, av) in cols.iter().zip(vals) {
            if !allowed(j) {
                continue;
            }
            acc[j] = Some(match acc[j] {
                None => (s.mul)(uv, av, k),
                Some(prev) => {
                    if s.is_any {
                        prev
                    } else {
                        (s.add)(prev, (s.mul)(uv, av, k))
                    }
                }
            });
        }
    }
    Ok(SparseVector::from_dense(acc))
}

/// Unmasked matrix multiply `C = A · B` (Gustavson row merge).
pub fn mxm<A: Scalar, B: Scalar, C: Scalar>(
    a: &SparseMatrix<A>,
    b: &SparseMatrix<B>,
    s: &Semiring<A, B, C>,
) -> Result<SparseMatrix<C>> {
    mxm_impl(a, b, s, None::<fn(usize, usize) -> bool>)
}

/// Matrix multiply restricted to the positions where `keep(row, col)` holds
/// (a structural output mask, arbitrary shape).
pub fn mxm_masked<A: Scalar, B: Scalar, C: Scalar>(
    a: &SparseMatrix<A>,
    b: &SparseMatrix<B>,
    s: &Semiring<A, B, C>,
    keep: impl Fn(usize, usize) -> bool,
) -> Result<SparseMatrix<C>> {
    mxm_impl(a, b, s, Some(keep))
}

fn mxm_impl<A: Scalar, B: Scalar, C: Scalar, F: Fn(usize, usize) -> bool>(
    a: &SparseMatrix<A>,
    b: &SparseMatrix<B>,
    s: &Semiring<A, B, C>,
    keep: Option<F>,
) -> Result<SparseMatrix<C>> {
    if a.ncols() != b.nrows() {
        return Err(GraphError::DimensionMismatch {
            expected: a.ncols(),
            actual: b.nrows(),
            operation: "mxm",
        });
    }
    let mut row_ptr = vec![0usize; a.nrows() + 1];
    let mut col_ind = Vec::new();
    let mut values = Vec::new();
    let mut scratch: Vec<Option<C>> = vec![None; b.ncols()];
    let mut touched: Vec<usize> = Vec::new();
    for i in 0..a.nrows() {
        let (a_cols, a_vals) = a.row(i);
        for (&k, av) in a_cols.iter().zip(a_vals) {
            let (b_cols, b_vals) = b.row(k);
            for (&j, bv) in b_cols.iter().zip(b_vals) {
                if let Some(f) = &keep {
                    if !f(i, j) {
                        continue;
                    }
                }
                match scratch[j] {
                    None => {
                        scratch[j] = Some((s.mul)(av, bv, k));
                        touched.push(j);
                    }
                    Some(prev) => {
                        if !s.is_any {
                            scratch[j] = Some((s.add)(prev, (s.mul)(av, bv, k)));
                        }
                    }
                }
            }
        }
        touched.sort_unstable();
        for &j in &touched {
            if let Some(v) = scratch[j].take() {
                col_ind.push(j);
                values.push(v);
            }
        }
        touched.clear();
        row_ptr[i + 1] = col_ind.len();
    }
    Ok(SparseMatrix::from_csr_parts(
        a.nrows(),
        b.ncols(),
        row_ptr,
        col_ind,
        values,
    ))
}

/// Mask-driven dot-product multiply: `C[i,j] = Σ_k mul(A[i,k], B[j,k], k)`
/// (that is, `A · Bᵀ`) computed only at the positions present in `mask`.
///
/// This is the kernel behind the masked saxpy in k-truss
/// (`C{C} = C · Cᵀ`) and the SandiaDot triangle-count variants.
pub fn mxm_dot<A: Scalar, B: Scalar, C: Scalar, M: Scalar>(
    a: &SparseMatrix<A>,
    b: &SparseMatrix<B>,
    s: &Semiring<A, B, C>,
    mask: &SparseMatrix<M>,
) -> Result<SparseMatrix<C>> {
    if a.ncols() != b.ncols() {
        return Err(GraphError::DimensionMismatch {
            expected: a.ncols(),
            actual: b.ncols(),
            operation: "mxm_dot",
        });
    }
    if mask.nrows() != a.nrows() || mask.ncols() != b.nrows() {
        return Err(GraphError::DimensionMismatch {
            expected: a.nrows(),
            actual: mask.nrows(),
            operation: "mxm_dot mask",
        });
    }
    let mut row_ptr = vec![0usize; a.nrows() + 1];
    let mut col_ind = Vec::new();
    let mut values = Vec::new();
    for i in 0..a.nrows() {
        let (m_cols, _) = mask.row(i);
        let (a_cols, a_vals) = a.row(i);
        for &j in m_cols {
            let (b_cols, b_vals) = b.row(j);
            let mut acc: Option<C> = None;
            let (mut pa, mut pb) = (0usize, 0usize);
            while pa < a_cols.len() && pb < b_cols.len() {
                match a_cols[pa].cmp(&b_cols[pb]) {
                    core::cmp::Ordering::Less => pa += 1,
                    core::cmp::Ordering::Greater => pb += 1,
                    core::cmp::Ordering::Equal => {
                        let k = a_cols[pa];
                        let contribution = (s.mul)(&a_vals[pa], &b_vals[pb], k);
                        acc = Some(match acc {
                            None => contribution,
                            Some(prev) => (s.add)(prev, contribution),
                        });
                        if s.is_any {
                            break;
                        }
                        pa += 1;
                        pb += 1;
                    }
                }
            }
            if let Some(v) = acc {
                col_ind.push(j);
                values.push(v);
            }
        }
        row_ptr[i + 1] = col_ind.len();
    }
    Ok(SparseMatrix::from_csr_parts(
        a.nrows(),
        b.nrows(),
        row_ptr,
        col_ind,
        values,
    ))
}

/// Fold every explicit entry of a matrix into one value.
pub fn reduce_matrix<T: Scalar, C>(m: &SparseMatrix<T>, init: C, f: impl Fn(C, &T) -> C) -> C {
    m.iter().fold(init, |acc, (_, _, v)| f(acc, v))
}

/// Reduce each row of a matrix with a monoid; rows without entries are
/// absent from the output.
pub fn reduce_rows<T: Scalar>(m: &SparseMatrix<T>, add: fn(T, T) -> T) -> SparseVector<T> {
    let mut out = Vec::new();
    for i in 0..m.nrows() {
        let (_, vals) = m.row(i);
        if let Some(first) = vals.first() {
            out.push((i, vals[1..].iter().copied().fold(*first, add)));
        }
    }
    SparseVector::from_entries(m.nrows(), out, |x, _| x).expect("row indices in range")
}
