//! Single-source breadth-first search.
//!
//! The frontier is a sparse vector updated by a masked multiply per hop:
//! push (`q · A`, scatter over outgoing edges) while the frontier is small,
//! pull (`Aᵀ · q`, scan into unvisited rows) once it grows.  The
//! `(any, secondi)` semiring makes every newly discovered node record one
//! predecessor index, which is the whole parent computation; levels fall
//! out of the iteration counter.

use super::{choose_direction, Direction};
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::matrix::ops::{mxv, vxm, VectorMask};
use crate::matrix::semiring;
use crate::matrix::SparseVector;
use crate::scalar::Scalar;
use log::debug;

/// Which BFS outputs to produce.  At least one must be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BfsOptions {
    /// Produce the hop-distance vector.
    pub compute_level: bool,
    /// Produce the predecessor vector.
    pub compute_parent: bool,
}

impl Default for BfsOptions {
    fn default() -> Self {
        Self {
            compute_level: true,
            compute_parent: true,
        }
    }
}

/// BFS outputs: present exactly when requested.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BfsResult {
    /// `level[i]` = hop distance from the source when `i` is reachable.
    pub level: Option<SparseVector<i64>>,
    /// `parent[i]` = BFS predecessor of `i`; `parent[src] = src`.
    pub parent: Option<SparseVector<i64>>,
}

/// Breadth-first search from `src`, producing level and/or parent vectors.
pub fn breadth_first_search<T: Scalar>(
    graph: &Graph<T>,
    src: usize,
    opts: &BfsOptions,
) -> Result<BfsResult> {
    if !opts.compute_level && !opts.compute_parent {
        return Err(GraphError::invalid_value(
            "breadth_first_search",
            "at least one of level and parent must be requested",
        ));
    }
    let n = graph.nrows();
    if src >= n {
        return Err(GraphError::InvalidIndex {
            index: src,
            bound: n,
            context: "bfs source",
        });
    }

    let a = graph.adjacency();
    // pull traverses incoming edges; without a symmetric structure or a
    // cached transpose we stay in push mode
    let incoming = graph.incoming().ok();

    let mut level_dense: Vec<Option<i64>> = vec![None; n];
    let mut parent_dense: Vec<Option<i64>> = vec![None; n];
    let mut discovered: Vec<usize> = vec![src];
    level_dense[src] = Some(0);
    parent_dense[src] = Some(src as i64);

    let mut q = SparseVector::<i64>::new(n);
    q.set(src, src as i64)?;

    let push = semiring::any_secondi::<i64, T>();
    let pull = semiring::any_secondi::<T, i64>();
    let mut direction = Direction::Push;

    for k in 1.. {
        // the frontier work estimate uses the cached degrees when present
        let work = match graph.out_degree() {
            Some(deg) => q
                .pattern()
                .iter()
                .map(|&i| deg.get(i).copied().unwrap_or(0) as usize)
                .sum::<usize>()
                .min(n),
            None => q.nvals(),
        };
        direction = choose_direction(work, n, direction);
        let mask = VectorMask {
            indices: &discovered,
            complement: true,
        };
        let next = match (direction, incoming) {
            (Direction::Pull, Some(at)) => mxv(at, &q, &pull, Some(mask))?,
            _ => vxm(&q, a, &push, Some(mask))?,
        };
        debug!(
            "bfs level {}: frontier {} -> {} ({:?})",
            k,
            q.nvals(),
            next.nvals(),
            direction
        );
        if next.nvals() == 0 {
            break;
        }
        for (i, &p) in next.iter() {
            level_dense[i] = Some(k);
            parent_dense[i] = Some(p);
        }
        let mut merged = Vec::with_capacity(discovered.len() + next.nvals());
        merge_sorted(&discovered, next.pattern(), &mut merged);
        discovered = merged;
        q = next;
    }

    Ok(BfsResult {
        level: opts
            .compute_level
            .then(|| SparseVector::from_dense(level_dense)),
        parent: opts
            .compute_parent
            .then(|| SparseVector::from_dense(parent_dense)),
    })
}

fn merge_sorted(a: &[usize], b: &[usize], out: &mut Vec<usize>) {
    let (mut pa, mut pb) = (0usize, 0usize);
    while pa < a.len() || pb < b.len() {
        let va = a.get(pa).copied().unwrap_or(usize::MAX);
        let vb = b.get(pb).copied().unwrap_or(usize::MAX);
        match va.cmp(&vb) {
            core::cmp::Ordering::Less => {
                out.push(va);
                pa += 1;
            }
            core::cmp::Ordering::Greater => {
                out.push(vb);
                pb += 1;
            }
            core::cmp::Ordering::Equal => {
                out.push(va);
                pa += 1;
                pb += 1;
            }
        }
    }
}
