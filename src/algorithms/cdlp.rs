//! Community detection by label propagation (CDLP).
//!
//! Deterministic variant: each node adopts the *minimum mode* label of its
//! neighbourhood, the smallest label among those of maximal frequency.
//! Labels propagate through `A · diag(L)` products; the per-row mode is
//! found by sorting the extracted `(row, label)` pairs and scanning runs.
//! For directed graphs a neighbour reachable over both an in- and an
//! out-edge counts twice.

use crate::context;
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::matrix::ops::mxm;
use crate::matrix::semiring;
use crate::matrix::{SparseMatrix, SparseVector};
use crate::scalar::Scalar;
use crate::util::sort::sort_pairs;
use log::debug;

/// Propagate labels until a fixpoint or `itermax` iterations.
///
/// Initial labels are `node id + 1`.  The graph must have no self edges.
/// Output: the converged label of every node.
pub fn cdlp<T: Scalar>(graph: &Graph<T>, itermax: usize) -> Result<SparseVector<i64>> {
    let ndiag = graph
        .nself_edges()
        .unwrap_or_else(|| graph.adjacency().ndiag());
    if ndiag != 0 {
        return Err(GraphError::SelfEdgesNotAllowed { count: ndiag });
    }

    let n = graph.nrows();
    let s = graph.adjacency().to_pattern();
    // for an asymmetric structure, in-neighbours contribute separately
    let symmetric = graph.has_symmetric_structure();
    let st = if symmetric { None } else { Some(s.transpose()) };

    let mut labels: Vec<i64> = (1..=n as i64).collect();
    let sr = semiring::plus_second::<bool, i64>();
    let nthreads = context::num_threads().outer;

    for iteration in 1..=itermax {
        let diag = SparseMatrix::diagonal(&SparseVector::from_entries(
            n,
            labels.iter().copied().enumerate().collect(),
            |x, _| x,
        )?);

        // M(i, j) carries the label of neighbour j
        let m_in = mxm(&s, &diag, &sr)?;
        let mut rows: Vec<i64> = Vec::with_capacity(m_in.nvals() * 2);
        let mut vals: Vec<i64> = Vec::with_capacity(m_in.nvals() * 2);
        for (i, _, &l) in m_in.iter() {
            rows.push(i as i64);
            vals.push(l);
        }
        if let Some(st) = &st {
            let m_out = mxm(st, &diag, &sr)?;
            for (i, _, &l) in m_out.iter() {
                rows.push(i as i64);
                vals.push(l);
            }
        }

        sort_pairs(&mut rows, &mut vals, nthreads)?;

        let mut next = labels.clone();
        let nnz = rows.len();
        let mut at = 0usize;
        while at < nnz {
            let row = rows[at];
            let mut mode_value = i64::MAX;
            let mut mode_length = 0usize;
            let mut run_start = at;
            while at <= nnz {
                let row_done = at == nnz || rows[at] != row;
                let run_done = row_done || vals[at] != vals[run_start];
                if run_done {
                    let run_length = at - run_start;
                    // strict comparison keeps the smallest label on ties
                    if run_length > mode_length {
                        mode_length = run_length;
                        mode_value = vals[run_start];
                    }
                    run_start = at;
                }
                if row_done {
                    break;
                }
                at += 1;
            }
            next[row as usize] = mode_value;
        }

        let converged = next == labels;
        labels = next;
        debug!("cdlp iteration {}: converged = {}", iteration, converged);
        if converged {
            break;
        }
    }

    SparseVector::from_entries(n, labels.into_iter().enumerate().collect(), |x, _| x)
}
