//! Maximal independent set, a Luby-style randomized selection.
//!
//! Every candidate draws a score inversely weighted by its degree; a node
//! joins the set when its score beats every candidate neighbour's (a
//! `max` semiring product), then it and its neighbours leave the candidate
//! pool.  Zero-degree nodes are admitted up front, which keeps the rounds
//! from stalling on them.  The per-node draws come from the shared LCG
//! seed state, so results are reproducible for a given seed.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::matrix::ops::{mxv, vxm, VectorMask};
use crate::matrix::semiring;
use crate::matrix::vector::ewise_union;
use crate::matrix::SparseVector;
use crate::scalar::Scalar;
use crate::types::tuning;
use crate::util::random::{advance_seeds, seed_vector, unit_from_seed};
use log::debug;

/// Compute a maximal independent set.
///
/// Requires a symmetric adjacency structure, no self edges, and the cached
/// out-degree vector.  Output: `true` at every member.  A round that fails
/// to shrink the candidate pool aborts with [`GraphError::Stall`].
pub fn maximal_independent_set<T: Scalar>(
    graph: &Graph<T>,
    seed: u64,
) -> Result<SparseVector<bool>> {
    if !graph.has_symmetric_structure() {
        return Err(GraphError::InvalidGraph(
            "maximal_independent_set requires a symmetric adjacency structure".into(),
        ));
    }
    let degree = graph.out_degree().ok_or(GraphError::NotCached {
        property: "out_degree",
    })?;
    let ndiag = graph
        .nself_edges()
        .unwrap_or_else(|| graph.adjacency().ndiag());
    if ndiag != 0 {
        return Err(GraphError::SelfEdgesNotAllowed { count: ndiag });
    }

    let a = graph.adjacency();
    let n = graph.nrows();
    let push_bound = (tuning::PUSH_FRACTION * n as f64) as usize;
    let pull_bound = (tuning::PULL_FRACTION * n as f64) as usize;

    let mut iset = SparseVector::<bool>::new(n);
    // candidates are the nodes with at least one neighbour; singletons go
    // straight into the set
    let mut candidates = SparseVector::<bool>::new(n);
    for i in 0..n {
        if degree.get(i).is_some() {
            candidates.set(i, true)?;
        } else {
            iset.set(i, true)?;
        }
    }

    let mut seeds = seed_vector(n, seed);
    let max_push = semiring::max_first::<f64, T>();
    let max_pull = semiring::max_second::<T, f64>();
    let reach_push = semiring::any_one::<bool, T>();
    let reach_pull = semiring::any_one::<T, bool>();

    let mut ncandidates = candidates.nvals();
    let mut last_ncandidates = ncandidates;
    let mut round = 0usize;
    while ncandidates > 0 {
        round += 1;

        // prob[i] = draw / degree, over the candidates only
        let prob_entries: Vec<(usize, f64)> = candidates
            .pattern()
            .iter()
            .map(|&i| {
                let d = degree.get(i).copied().unwrap_or(1) as f64;
                (i, unit_from_seed(seeds[i]) / d)
            })
            .collect();
        let prob = SparseVector::from_entries(n, prob_entries, |x, _| x)?;

        // neighbour_max{candidates} = max over candidate neighbours
        let mask = VectorMask::from_pattern(&candidates, false);
        let neighbor_max = if ncandidates < push_bound {
            vxm(&prob, a, &max_push, Some(mask))?
        } else {
            mxv(a, &prob, &max_pull, Some(mask))?
        };

        // winners: higher score than every candidate neighbour; isolated
        // candidates (no entry in neighbour_max) fall through as winners
        let winners = ewise_union(
            &prob,
            &neighbor_max,
            |_| true,
            |_| false,
            |p, m| p > m,
        )?
        .select(|_, &w| w);

        iset.assign_scalar_at(winners.pattern(), true)?;
        candidates.remove_at(winners.pattern());
        ncandidates = candidates.nvals();
        if ncandidates == 0 {
            break;
        }

        // drop the winners' neighbours from the candidate pool
        let mask = VectorMask::from_pattern(&candidates, false);
        let neighbors = if winners.nvals() < pull_bound {
            vxm(&winners, a, &reach_push, Some(mask))?
        } else {
            mxv(a, &winners, &reach_pull, Some(mask))?
        };
        candidates.remove_at(neighbors.pattern());
        ncandidates = candidates.nvals();

        debug!(
            "mis round {}: {} winners, {} candidates left",
            round,
            winners.nvals(),
            ncandidates
        );
        if ncandidates == last_ncandidates {
            return Err(GraphError::Stall {
                algorithm: "maximal_independent_set",
                remaining: ncandidates,
            });
        }
        last_ncandidates = ncandidates;
        advance_seeds(&mut seeds);
    }

    Ok(iset)
}
