//! Multi-source breadth-first search.
//!
//! The single-source frontier vector becomes an `s × n` matrix whose row
//! `k` is the frontier of source `k`; one masked multiply per hop advances
//! the whole batch (push form).  Levels and parents come back as `s × n`
//! matrices with the single-source semantics per row.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::matrix::ops::mxm_masked;
use crate::matrix::semiring;
use crate::matrix::SparseMatrix;
use crate::scalar::Scalar;
use log::debug;

/// Batched BFS outputs, one row per source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MsBfsResult {
    /// `level[k, i]` = hop distance of node `i` from source `k`.
    pub level: Option<SparseMatrix<i64>>,
    /// `parent[k, i]` = predecessor of node `i` in source `k`'s tree.
    pub parent: Option<SparseMatrix<i64>>,
}

/// Breadth-first search from every node in `sources` at once.
///
/// `compute_level` / `compute_parent` choose the outputs; at least one must
/// be requested.  Each source must be a valid node id.
pub fn multi_source_bfs<T: Scalar>(
    graph: &Graph<T>,
    sources: &[usize],
    compute_level: bool,
    compute_parent: bool,
) -> Result<MsBfsResult> {
    if !compute_level && !compute_parent {
        return Err(GraphError::invalid_value(
            "multi_source_bfs",
            "at least one of level and parent must be requested",
        ));
    }
    let n = graph.nrows();
    let nsrc = sources.len();
    for &s in sources {
        if s >= n {
            return Err(GraphError::InvalidIndex {
                index: s,
                bound: n,
                context: "multi_source_bfs source",
            });
        }
    }

    let a = graph.adjacency();
    // dense per-(source, node) images of the outputs; doubles as the
    // visited mask
    let mut level_dense: Vec<Option<i64>> = vec![None; nsrc * n];
    let mut parent_dense: Vec<Option<i64>> = vec![None; nsrc * n];

    let mut q_triplets = Vec::with_capacity(nsrc);
    for (k, &s) in sources.iter().enumerate() {
        level_dense[k * n + s] = Some(0);
        parent_dense[k * n + s] = Some(s as i64);
        q_triplets.push((k, s, s as i64));
    }
    let mut q = SparseMatrix::from_triplets(nsrc, n, q_triplets, |x, _| x)?;

    let sr = semiring::any_secondi::<i64, T>();
    for hop in 1i64.. {
        // {!visited}: the complement of each row's discovered set
        let next = {
            let parent_ref = &parent_dense;
            mxm_masked(&q, a, &sr, |row, col| parent_ref[row * n + col].is_none())?
        };
        debug!("msbfs hop {}: batch frontier {}", hop, next.nvals());
        if next.nvals() == 0 {
            break;
        }
        for (row, col, &p) in next.iter() {
            level_dense[row * n + col] = Some(hop);
            parent_dense[row * n + col] = Some(p);
        }
        q = next;
    }

    let assemble = |dense: &[Option<i64>]| -> Result<SparseMatrix<i64>> {
        let mut triplets = Vec::new();
        for row in 0..nsrc {
            for col in 0..n {
                if let Some(v) = dense[row * n + col] {
                    triplets.push((row, col, v));
                }
            }
        }
        SparseMatrix::from_triplets(nsrc, n, triplets, |x, _| x)
    };

    Ok(MsBfsResult {
        level: if compute_level {
            Some(assemble(&level_dense)?)
        } else {
            None
        },
        parent: if compute_parent {
            Some(assemble(&parent_dense)?)
        } else {
            None
        },
    })
}
