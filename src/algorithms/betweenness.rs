//! Betweenness centrality, batched Brandes style.
//!
//! A batched BFS from all sources records one frontier matrix (with
//! shortest-path counts) per level.  The backward sweep then walks the
//! levels deepest-first, accumulating dependencies through `(+, first)`
//! products against the transposed adjacency, masked to the next level up.
//! The centrality of a node is its dependency total over all sources.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::matrix::ops::mxm_masked;
use crate::matrix::semiring;
use crate::matrix::{SparseMatrix, SparseVector};
use crate::scalar::Scalar;
use log::debug;

/// Batched Brandes betweenness from the given sources.
///
/// Returns the real-valued dependency sums (no pair normalisation).  A
/// directed graph without known-symmetric structure needs the cached
/// transpose.
pub fn betweenness<T: Scalar>(graph: &Graph<T>, sources: &[usize]) -> Result<SparseVector<f64>> {
    let n = graph.nrows();
    let b = sources.len();
    for &s in sources {
        if s >= n {
            return Err(GraphError::InvalidIndex {
                index: s,
                bound: n,
                context: "betweenness source",
            });
        }
    }
    let a = graph.adjacency();
    let at = graph.incoming()?;

    // forward phase: per-level sigma frontiers
    let mut seen = vec![false; b * n];
    let mut paths = vec![0.0f64; b * n];
    let mut frontiers: Vec<SparseMatrix<f64>> = Vec::new();

    let mut triplets = Vec::with_capacity(b);
    for (k, &s) in sources.iter().enumerate() {
        seen[k * n + s] = true;
        paths[k * n + s] = 1.0;
        triplets.push((k, s, 1.0f64));
    }
    let mut frontier = SparseMatrix::from_triplets(b, n, triplets, |x, _| x)?;
    frontiers.push(frontier.clone());

    let forward = semiring::plus_first::<f64, T>();
    loop {
        let next = {
            let seen_ref = &seen;
            mxm_masked(&frontier, a, &forward, |k, j| !seen_ref[k * n + j])?
        };
        if next.nvals() == 0 {
            break;
        }
        for (k, j, &sigma) in next.iter() {
            seen[k * n + j] = true;
            paths[k * n + j] = sigma;
        }
        frontiers.push(next.clone());
        frontier = next;
    }
    let depth = frontiers.len();
    debug!("betweenness: {} sources, depth {}", b, depth);

    // backward phase: dependency accumulation, deepest level first
    let mut delta = vec![0.0f64; b * n];
    for d in (1..depth).rev() {
        // w1 on the level-d pattern: (1 + delta) / sigma
        let w1_triplets: Vec<(usize, usize, f64)> = frontiers[d]
            .iter()
            .map(|(k, w, _)| {
                let at_kw = k * n + w;
                (k, w, (1.0 + delta[at_kw]) / paths[at_kw])
            })
            .collect();
        let w1 = SparseMatrix::from_triplets(b, n, w1_triplets, |x, _| x)?;

        if d == 1 {
            // dependencies never flow into the sources themselves
            break;
        }
        let up = &frontiers[d - 1];
        let w2 = mxm_masked(&w1, at, &semiring::plus_first::<f64, T>(), |k, v| {
            up.get(k, v).is_some()
        })?;
        for (k, v, &x) in w2.iter() {
            let at_kv = k * n + v;
            delta[at_kv] += x * paths[at_kv];
        }
    }

    let mut centrality = vec![0.0f64; n];
    for k in 0..b {
        for v in 0..n {
            centrality[v] += delta[k * n + v];
        }
    }
    SparseVector::from_entries(n, centrality.into_iter().enumerate().collect(), |x, _| x)
}
