//! Single-source shortest paths by delta-stepping.
//!
//! Edges split into light (`weight < delta`) and heavy classes.  Buckets of
//! width `delta` settle in order: light edges of the current bucket relax
//! to a fixpoint (a `(min, +)` vector-matrix multiply per pass), heavy
//! edges relax once, and the bucket boundary advances.  Weights must be
//! non-negative integers; callers worried about overflow pick `i64`.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::matrix::ops::vxm;
use crate::matrix::semiring;
use crate::matrix::SparseVector;
use crate::scalar::Scalar;
use log::debug;
use num_traits::PrimInt;

/// Shortest path lengths from `src` over an integer-weighted adjacency.
///
/// `d[src] = 0`; unreachable nodes are absent from the result.
/// `delta <= 0` and negative edge weights are rejected with
/// [`GraphError::InvalidValue`].
pub fn sssp_delta_stepping<T>(graph: &Graph<T>, src: usize, delta: T) -> Result<SparseVector<T>>
where
    T: Scalar + PrimInt,
{
    let n = graph.nrows();
    if src >= n {
        return Err(GraphError::InvalidIndex {
            index: src,
            bound: n,
            context: "sssp source",
        });
    }
    if delta <= <T as Scalar>::zero() {
        return Err(GraphError::invalid_value(
            "sssp_delta_stepping",
            "delta must be positive",
        ));
    }
    let a = graph.adjacency();
    if a.iter().any(|(_, _, &w)| w < <T as Scalar>::zero()) {
        return Err(GraphError::invalid_value(
            "sssp_delta_stepping",
            "edge weights must be non-negative",
        ));
    }

    let light = a.select(|_, _, w| *w < delta);
    let heavy = a.select(|_, _, w| *w >= delta);
    let sr = semiring::min_plus::<T>();

    let mut tentative: Vec<Option<T>> = vec![None; n];
    tentative[src] = Some(<T as Scalar>::zero());

    let mut lo = <T as Scalar>::zero();
    loop {
        let hi = lo.saturating_add(delta);

        // settle the current bucket over light edges
        loop {
            let frontier: Vec<(usize, T)> = tentative
                .iter()
                .enumerate()
                .filter_map(|(i, t)| t.filter(|&t| lo <= t && t < hi).map(|t| (i, t)))
                .collect();
            if frontier.is_empty() {
                break;
            }
            let q = SparseVector::from_entries(n, frontier, |x, _| x)?;
            let relaxed = vxm(&q, &light, &sr, None)?;
            let mut improved_in_bucket = false;
            for (i, &d) in relaxed.iter() {
                if tentative[i].map_or(true, |t| d < t) {
                    tentative[i] = Some(d);
                    if d < hi {
                        improved_in_bucket = true;
                    }
                }
            }
            if !improved_in_bucket {
                break;
            }
        }

        // one heavy relaxation out of the settled bucket
        let settled: Vec<(usize, T)> = tentative
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.filter(|&t| lo <= t && t < hi).map(|t| (i, t)))
            .collect();
        if !settled.is_empty() {
            let q = SparseVector::from_entries(n, settled, |x, _| x)?;
            let relaxed = vxm(&q, &heavy, &sr, None)?;
            for (i, &d) in relaxed.iter() {
                if tentative[i].map_or(true, |t| d < t) {
                    tentative[i] = Some(d);
                }
            }
        }

        lo = hi;
        let pending = tentative
            .iter()
            .flatten()
            .filter(|&&t| t >= lo)
            .count();
        debug!("sssp bucket boundary now {:?}: {} pending", lo, pending);
        if pending == 0 {
            break;
        }
    }

    Ok(SparseVector::from_dense(tentative))
}
