//! HITS: mutual hub/authority power iteration.
//!
//! `a ← Aᵀ·h`, `h ← A·a` (both against the previous iterates), each vector
//! re-normalised to unit L1 mass per round.  The stopping rule is the
//! averaged L1 change of the two vectors falling under the tolerance; the
//! iteration cap is a timeout, not an error.

use crate::error::Result;
use crate::graph::Graph;
use crate::matrix::ops::mxv;
use crate::matrix::semiring;
use crate::matrix::SparseVector;
use crate::scalar::Scalar;
use log::debug;

/// Convergence controls for [`hits`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitsOptions {
    /// Stop once the combined L1 change drops below this.
    pub tol: f64,
    /// Hard iteration cap.
    pub itermax: usize,
}

impl Default for HitsOptions {
    fn default() -> Self {
        Self {
            tol: 1e-4,
            itermax: 100,
        }
    }
}

/// Result of [`hits`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitsResult {
    /// Hub scores, unit L1 mass.
    pub hubs: SparseVector<f64>,
    /// Authority scores, unit L1 mass.
    pub authorities: SparseVector<f64>,
    /// Iterations performed (equals `itermax` when the tolerance was not
    /// reached).
    pub iterations: usize,
}

/// Compute hub and authority scores.
///
/// A directed graph without known-symmetric structure needs the cached
/// transpose ([`GraphError::NotCached`] otherwise).
pub fn hits<T: Scalar>(graph: &Graph<T>, opts: &HitsOptions) -> Result<HitsResult> {
    let n = graph.nrows();
    let a_mat = graph.adjacency();
    let at = graph.incoming()?;

    let mut hubs = vec![1.0f64; n];
    let mut auth = vec![1.0f64; n];
    let sum_second = semiring::plus_second::<T, f64>();

    let mut iterations = 0usize;
    while iterations < opts.itermax {
        iterations += 1;
        let h_old = hubs.clone();
        let a_old = auth.clone();

        // a = Aᵀ·h_old ; h = A·a_old
        let h_vec =
            SparseVector::from_entries(n, h_old.iter().copied().enumerate().collect(), |x, _| x)?;
        let a_vec =
            SparseVector::from_entries(n, a_old.iter().copied().enumerate().collect(), |x, _| x)?;
        let new_a = mxv(at, &h_vec, &sum_second, None)?;
        let new_h = mxv(a_mat, &a_vec, &sum_second, None)?;

        auth = vec![0.0; n];
        for (i, &v) in new_a.iter() {
            auth[i] = v;
        }
        hubs = vec![0.0; n];
        for (i, &v) in new_h.iter() {
            hubs[i] = v;
        }
        normalize_l1(&mut auth);
        normalize_l1(&mut hubs);

        let rdiff = (l1_distance(&auth, &a_old) + l1_distance(&hubs, &h_old)) / 2.0;
        debug!("hits iteration {}: rdiff {:.3e}", iterations, rdiff);
        if rdiff < opts.tol {
            break;
        }
    }

    normalize_l1(&mut auth);
    normalize_l1(&mut hubs);
    Ok(HitsResult {
        hubs: SparseVector::from_entries(n, hubs.into_iter().enumerate().collect(), |x, _| x)?,
        authorities: SparseVector::from_entries(
            n,
            auth.into_iter().enumerate().collect(),
            |x, _| x,
        )?,
        iterations,
    })
}

fn normalize_l1(v: &mut [f64]) {
    let sum: f64 = v.iter().map(|x| x.abs()).sum();
    if sum > 0.0 {
        for x in v.iter_mut() {
            *x /= sum;
        }
    }
}

fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}
