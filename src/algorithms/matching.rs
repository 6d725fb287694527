//! Maximal matching via MIS on the implicit line graph.
//!
//! Works on the incidence matrix `E` alone: a two-hop multiply (`E` then
//! `Eᵀ`) stands in for one step on the line graph, so `Eᵀ·E` is never
//! formed.  Each candidate edge draws a score (optionally weighted toward
//! heavy or light edges and damped by its line-graph degree); edges that
//! dominate every edge sharing an endpoint enter the matching, and a
//! validation pass rejects rounds where a node would be matched twice,
//! redrawing the seeds instead.

use crate::error::{GraphError, Result};
use crate::matrix::ops::{mxv, reduce_rows, vxm, VectorMask};
use crate::matrix::semiring;
use crate::matrix::{SparseMatrix, SparseVector};
use crate::scalar::Scalar;
use crate::types::tuning;
use crate::util::random::{advance_seeds, seed_vector, unit_from_seed};
use log::debug;

/// Scoring policy for the matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchingKind {
    /// Uniform random scores.
    #[default]
    Random,
    /// Scores proportional to edge weight (prefers heavy edges).
    Heavy,
    /// Scores inverse to edge weight (prefers light edges).
    Light,
}

/// Compute a maximal matching from an incidence matrix.
///
/// `incidence` is the `n × e` matrix of [`crate::graph::incidence_matrix`].
/// Output: a boolean vector over edge ids; `true` marks matched edges.  A
/// selection conflict redraws the per-edge seeds; after
/// [`tuning::MATCHING_MAX_FAILURES`] redraws the round aborts with
/// [`GraphError::Stall`].
pub fn maximal_matching<T: Scalar>(
    incidence: &SparseMatrix<T>,
    kind: MatchingKind,
    seed: u64,
) -> Result<SparseVector<bool>> {
    let num_nodes = incidence.nrows();
    let num_edges = incidence.ncols();
    let e = incidence;
    let et = incidence.transpose();

    let mut seeds = seed_vector(num_edges, seed);
    let mut matching = SparseVector::<bool>::new(num_edges);
    let mut candidates = SparseVector::full(num_edges, true);

    // line-graph degree, computed once: each edge sums the candidate
    // degrees of its two endpoints (the constant self-count does not
    // disturb relative order)
    let count = semiring::plus_pair::<T, bool>();
    let node_degree = mxv(e, &candidates, &count, None)?;
    let sum_second = semiring::plus_second::<T, i64>();
    let edge_degree = mxv(&et, &node_degree, &sum_second, None)?;

    // per-edge weight: both explicit entries of a column are the weight
    let weight = reduce_rows(&et, |x, _| x);

    let push_bound = (tuning::PUSH_FRACTION * num_edges as f64) as usize;

    let mut nfailures = 0usize;
    let mut ncandidates = candidates.nvals();
    while ncandidates > 0 {
        // score{candidates} = draw / degree, optionally weight-shaped
        let score_entries: Vec<(usize, f64)> = candidates
            .pattern()
            .iter()
            .map(|&k| {
                let d = edge_degree.get(k).copied().unwrap_or(1).max(1) as f64;
                let mut s = unit_from_seed(seeds[k]) / d;
                let w = weight.get(k).map(|w| w.to_f64()).unwrap_or(1.0);
                match kind {
                    MatchingKind::Random => {}
                    MatchingKind::Heavy => s *= w,
                    MatchingKind::Light => s /= w,
                }
                (k, s)
            })
            .collect();
        let score = SparseVector::from_entries(num_edges, score_entries, |x, _| x)?;

        // two-hop max: best incident score per node, then per edge
        let max_node = if ncandidates > push_bound {
            mxv(e, &score, &semiring::max_second::<T, f64>(), None)?
        } else {
            vxm(&score, &et, &semiring::max_first::<f64, T>(), None)?
        };
        let cand_mask = VectorMask::from_pattern(&candidates, false);
        let max_neighbor = if max_node.nvals() > (tuning::PUSH_FRACTION * num_nodes as f64) as usize
        {
            mxv(&et, &max_node, &semiring::max_second::<T, f64>(), Some(cand_mask))?
        } else {
            vxm(&max_node, e, &semiring::max_first::<f64, T>(), Some(cand_mask))?
        };

        // the max includes the edge's own score, so >= selects the winners
        let winners = crate::matrix::vector::ewise_intersect(&score, &max_neighbor, |s, m| s >= m)?
            .select(|_, &w| w);

        // a node may appear in at most one selected edge
        let winner_nodes_degree = mxv(e, &winners, &count, None)?;
        let conflicted = winner_nodes_degree
            .reduce(|x, y| x.max(y))
            .unwrap_or(0)
            > 1;
        if conflicted {
            nfailures += 1;
            debug!("matching round rejected ({} failures)", nfailures);
            if nfailures > tuning::MATCHING_MAX_FAILURES {
                return Err(GraphError::Stall {
                    algorithm: "maximal_matching",
                    remaining: ncandidates,
                });
            }
            seeds = seed_vector(num_edges, seed + nfailures as u64);
            continue;
        }

        matching.assign_scalar_at(winners.pattern(), true)?;

        // drop the winners and every edge sharing a node with them
        let winner_nodes = mxv(e, &winners, &semiring::any_one::<T, bool>(), None)?;
        let blocked = mxv(&et, &winner_nodes, &semiring::any_one::<T, bool>(), None)?;
        candidates.remove_at(blocked.pattern());

        ncandidates = candidates.nvals();
        debug!(
            "matching: {} matched, {} candidates left",
            matching.nvals(),
            ncandidates
        );
        advance_seeds(&mut seeds);
    }

    Ok(matching)
}
