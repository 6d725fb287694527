//! In-place sorting of one- and two-key index arrays.
//!
//! Several algorithms (label propagation, the presort in triangle counting,
//! the degree sampler) sort plain integer arrays.  `nthreads == 1` always
//! runs sequentially; larger counts use the rayon pool when the `parallel`
//! feature is enabled and fall back to sequential otherwise.  Stability is
//! not guaranteed.

use crate::error::{GraphError, Result};

#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;

#[cfg(feature = "parallel")]
const SEQUENTIAL_CUTOFF: usize = 1 << 14;

fn sort_slice<K: Ord + Copy + Send>(data: &mut [(K, K)], nthreads: usize) {
    #[cfg(feature = "parallel")]
    {
        if nthreads > 1 && data.len() > SEQUENTIAL_CUTOFF {
            data.par_sort_unstable();
            return;
        }
    }
    let _ = nthreads;
    data.sort_unstable();
}

/// Sort `keys` ascending, in place.  Accepts any length, including zero.
pub fn sort_keys<K: Ord + Copy + Send>(keys: &mut [K], nthreads: usize) {
    #[cfg(feature = "parallel")]
    {
        if nthreads > 1 && keys.len() > SEQUENTIAL_CUTOFF {
            keys.par_sort_unstable();
            return;
        }
    }
    let _ = nthreads;
    keys.sort_unstable();
}

/// Sort the pair array `(keys0[i], keys1[i])` lexicographically ascending,
/// in place: primary order on `keys0`, ties broken on `keys1`.
///
/// The two slices must have equal length.
pub fn sort_pairs<K: Ord + Copy + Send>(
    keys0: &mut [K],
    keys1: &mut [K],
    nthreads: usize,
) -> Result<()> {
    if keys0.len() != keys1.len() {
        return Err(GraphError::DimensionMismatch {
            expected: keys0.len(),
            actual: keys1.len(),
            operation: "sort_pairs",
        });
    }
    let mut pairs: Vec<(K, K)> = keys0
        .iter()
        .copied()
        .zip(keys1.iter().copied())
        .collect();
    sort_slice(&mut pairs, nthreads);
    for (i, (a, b)) in pairs.into_iter().enumerate() {
        keys0[i] = a;
        keys1[i] = b;
    }
    Ok(())
}
