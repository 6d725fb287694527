//! Sparse vector storage and element-wise operations.
//!
//! [`SparseVector`] mirrors the matrix container for one dimension: a sorted
//! index list plus parallel values.  Frontiers, degree vectors, label
//! vectors, and every per-node algorithm output use it.  The element-wise
//! union/intersection combinators at the bottom are the vector forms of the
//! engine's `eWiseAdd`/`eWiseMult`.

use crate::error::{GraphError, Result};
use crate::scalar::Scalar;
use crate::types::ScalarType;

/// Sparse vector over a [`Scalar`] element type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseVector<T> {
    len: usize,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Scalar> SparseVector<T> {
    /// Empty vector of logical length `len`.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Vector with an explicit entry `value` at every position.
    pub fn full(len: usize, value: T) -> Self {
        Self {
            len,
            indices: (0..len).collect(),
            values: vec![value; len],
        }
    }

    /// Build from `(index, value)` pairs, combining duplicates with `dup`.
    pub fn from_entries(
        len: usize,
        mut entries: Vec<(usize, T)>,
        dup: impl Fn(T, T) -> T,
    ) -> Result<Self> {
        for &(i, _) in &entries {
            if i >= len {
                return Err(GraphError::InvalidIndex {
                    index: i,
                    bound: len,
                    context: "vector from_entries",
                });
            }
        }
        entries.sort_unstable_by_key(|e| e.0);
        let mut indices = Vec::with_capacity(entries.len());
        let mut values: Vec<T> = Vec::with_capacity(entries.len());
        for (i, v) in entries {
            if indices.last() == Some(&i) {
                let last = values.len() - 1;
                values[last] = dup(values[last], v);
            } else {
                indices.push(i);
                values.push(v);
            }
        }
        Ok(Self {
            len,
            indices,
            values,
        })
    }

    /// Build from a dense `Option` image (used by kernels that accumulate
    /// into a dense scratch array).
    pub fn from_dense(dense: Vec<Option<T>>) -> Self {
        let len = dense.len();
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (i, slot) in dense.into_iter().enumerate() {
            if let Some(v) = slot {
                indices.push(i);
                values.push(v);
            }
        }
        Self {
            len,
            indices,
            values,
        }
    }

    /// Logical length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of explicit entries.
    pub fn nvals(&self) -> usize {
        self.indices.len()
    }

    /// Runtime element-type tag.
    pub fn scalar_type(&self) -> ScalarType {
        T::TYPE
    }

    /// Sorted indices of the explicit entries (the structural pattern).
    pub fn pattern(&self) -> &[usize] {
        &self.indices
    }

    /// Values of the explicit entries, parallel to [`SparseVector::pattern`].
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable values (structure unchanged).
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Value at position `i`, if present.
    pub fn get(&self, i: usize) -> Option<&T> {
        self.indices.binary_search(&i).ok().map(|p| &self.values[p])
    }

    /// Insert or overwrite the entry at position `i`.
    pub fn set(&mut self, i: usize, value: T) -> Result<()> {
        if i >= self.len {
            return Err(GraphError::InvalidIndex {
                index: i,
                bound: self.len,
                context: "vector set",
            });
        }
        match self.indices.binary_search(&i) {
            Ok(p) => self.values[p] = value,
            Err(p) => {
                self.indices.insert(p, i);
                self.values.insert(p, value);
            }
        }
        Ok(())
    }

    /// Iterate explicit entries as `(index, &value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter())
    }

    /// Entries satisfying `keep(index, value)`.
    pub fn select(&self, keep: impl Fn(usize, &T) -> bool) -> Self {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (i, v) in self.iter() {
            if keep(i, v) {
                indices.push(i);
                values.push(*v);
            }
        }
        Self {
            len: self.len,
            indices,
            values,
        }
    }

    /// Same structure, values mapped through `f`.
    pub fn map<U: Scalar>(&self, f: impl Fn(&T) -> U) -> SparseVector<U> {
        SparseVector {
            len: self.len,
            indices: self.indices.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }

    /// Fold the explicit values with a monoid operation; `None` when the
    /// vector has no entries.
    pub fn reduce(&self, add: impl Fn(T, T) -> T) -> Option<T> {
        let mut it = self.values.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, add))
    }

    /// Set `value` at every position listed in `mask` (structural masked
    /// assign, `v{mask} = value`).
    pub fn assign_scalar_at(&mut self, mask: &[usize], value: T) -> Result<()> {
        for &i in mask {
            self.set(i, value)?;
        }
        Ok(())
    }

    /// Delete the entries at the positions listed in `mask`
    /// (`v{mask} = empty`).
    pub fn remove_at(&mut self, mask: &[usize]) {
        if mask.is_empty() {
            return;
        }
        let mut keep_indices = Vec::with_capacity(self.indices.len());
        let mut keep_values = Vec::with_capacity(self.values.len());
        let mut m = 0usize;
        for (p, &i) in self.indices.iter().enumerate() {
            while m < mask.len() && mask[m] < i {
                m += 1;
            }
            if m < mask.len() && mask[m] == i {
                continue;
            }
            keep_indices.push(i);
            keep_values.push(self.values[p]);
        }
        self.indices = keep_indices;
        self.values = keep_values;
    }

    /// Keep only the entries at positions listed in `mask`
    /// (`v{mask, replace} = v`).
    pub fn keep_at(&mut self, mask: &[usize]) {
        let mut keep_indices = Vec::new();
        let mut keep_values = Vec::new();
        let mut m = 0usize;
        for (p, &i) in self.indices.iter().enumerate() {
            while m < mask.len() && mask[m] < i {
                m += 1;
            }
            if m < mask.len() && mask[m] == i {
                keep_indices.push(i);
                keep_values.push(self.values[p]);
            }
        }
        self.indices = keep_indices;
        self.values = keep_values;
    }

    /// Dense `Option` image of the vector.
    pub fn to_dense(&self) -> Vec<Option<T>> {
        let mut dense = vec![None; self.len];
        for (i, v) in self.iter() {
            dense[i] = Some(*v);
        }
        dense
    }

    /// Structure-and-values equality under a caller-supplied predicate.
    pub fn isall(&self, other: &Self, op: impl Fn(&T, &T) -> bool) -> bool {
        self.len == other.len
            && self.indices == other.indices
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| op(a, b))
    }

    /// Exact equality: same length, structure, and values.
    pub fn is_equal(&self, other: &Self) -> bool {
        self.isall(other, |a, b| a == b)
    }
}

/// Element-wise intersection (`eWiseMult`): output has an entry exactly
/// where both inputs do.
pub fn ewise_intersect<A: Scalar, B: Scalar, C: Scalar>(
    a: &SparseVector<A>,
    b: &SparseVector<B>,
    f: impl Fn(&A, &B) -> C,
) -> Result<SparseVector<C>> {
    if a.len() != b.len() {
        return Err(GraphError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
            operation: "ewise_intersect",
        });
    }
    let mut indices = Vec::new();
    let mut values = Vec::new();
    let (mut pa, mut pb) = (0usize, 0usize);
    while pa < a.indices.len() && pb < b.indices.len() {
        match a.indices[pa].cmp(&b.indices[pb]) {
            core::cmp::Ordering::Less => pa += 1,
            core::cmp::Ordering::Greater => pb += 1,
            core::cmp::Ordering::Equal => {
                indices.push(a.indices[pa]);
                values.push(f(&a.values[pa], &b.values[pb]));
                pa += 1;
                pb += 1;
            }
        }
    }
    Ok(SparseVector {
        len: a.len(),
        indices,
        values,
    })
}

/// Element-wise union (`eWiseAdd`): output has an entry wherever either
/// input does; `only_a`/`only_b` handle the one-sided positions.
pub fn ewise_union<A: Scalar, B: Scalar, C: Scalar>(
    a: &SparseVector<A>,
    b: &SparseVector<B>,
    only_a: impl Fn(&A) -> C,
    only_b: impl Fn(&B) -> C,
    both: impl Fn(&A, &B) -> C,
) -> Result<SparseVector<C>> {
    if a.len() != b.len() {
        return Err(GraphError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
            operation: "ewise_union",
        });
    }
    let mut indices = Vec::new();
    let mut values = Vec::new();
    let (mut pa, mut pb) = (0usize, 0usize);
    while pa < a.indices.len() || pb < b.indices.len() {
        let ia = a.indices.get(pa).copied().unwrap_or(usize::MAX);
        let ib = b.indices.get(pb).copied().unwrap_or(usize::MAX);
        match ia.cmp(&ib) {
            core::cmp::Ordering::Less => {
                indices.push(ia);
                values.push(only_a(&a.values[pa]));
                pa += 1;
            }
            core::cmp::Ordering::Greater => {
                indices.push(ib);
                values.push(only_b(&b.values[pb]));
                pb += 1;
            }
            core::cmp::Ordering::Equal => {
                indices.push(ia);
                values.push(both(&a.values[pa], &b.values[pb]));
                pa += 1;
                pb += 1;
            }
        }
    }
    Ok(SparseVector {
        len: a.len(),
        indices,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_get_set() {
        let mut v = SparseVector::<i64>::new(5);
        assert_eq!(v.nvals(), 0);
        v.set(3, 7).unwrap();
        v.set(1, 2).unwrap();
        assert_eq!(v.get(3), Some(&7));
        assert_eq!(v.get(0), None);
        assert_eq!(v.pattern(), &[1, 3]);
        assert!(v.set(5, 0).is_err());
    }

    #[test]
    fn masked_assign_and_remove() {
        let mut v = SparseVector::full(6, 1i64);
        v.remove_at(&[0, 2, 4]);
        assert_eq!(v.pattern(), &[1, 3, 5]);
        v.assign_scalar_at(&[0, 1], 9).unwrap();
        assert_eq!(v.get(0), Some(&9));
        assert_eq!(v.get(1), Some(&9));
        v.keep_at(&[1, 5]);
        assert_eq!(v.pattern(), &[1, 5]);
    }

    #[test]
    fn union_and_intersection() {
        let a = SparseVector::from_entries(5, vec![(0, 1.0f64), (2, 2.0)], |x, _| x).unwrap();
        let b = SparseVector::from_entries(5, vec![(2, 5.0f64), (4, 3.0)], |x, _| x).unwrap();

        let isect = ewise_intersect(&a, &b, |x, y| x * y).unwrap();
        assert_eq!(isect.pattern(), &[2]);
        assert_eq!(isect.values(), &[10.0]);

        let union = ewise_union(&a, &b, |x| *x, |y| *y, |x, y| x + y).unwrap();
        assert_eq!(union.pattern(), &[0, 2, 4]);
        assert_eq!(union.values(), &[1.0, 7.0, 3.0]);
    }

    #[test]
    fn reduce_folds_values() {
        let v = SparseVector::from_entries(4, vec![(0, 3i64), (2, 5), (3, 1)], |x, _| x).unwrap();
        assert_eq!(v.reduce(|x, y| x.min(y)), Some(1));
        assert_eq!(v.reduce(|x, y| x + y), Some(9));
        assert_eq!(SparseVector::<i64>::new(4).reduce(|x, y| x + y), None);
    }
}
