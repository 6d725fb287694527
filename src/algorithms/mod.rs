//! Graph algorithms expressed as sparse semiring algebra.
//!
//! Every algorithm reads a [`crate::graph::Graph`] (and its caches) and
//! produces vectors or matrices of results; none mutates the adjacency.

pub mod betweenness;
pub mod bfs;
pub mod cdlp;
pub mod coarsen;
pub mod components;
pub mod diameter;
pub mod hits;
pub mod ktruss;
pub mod matching;
pub mod mis;
pub mod msbfs;
pub mod sssp;
pub mod triangle;
pub mod vertex_cover;

pub use betweenness::betweenness;
pub use bfs::{breadth_first_search, BfsOptions, BfsResult};
pub use cdlp::cdlp;
pub use coarsen::{coarsen_by_matching, CoarsenOptions, CoarsenResult, CoarsenedAdjacency};
pub use components::{connected_components, connected_components_boruvka};
pub use diameter::{exact_diameter, DiameterResult};
pub use hits::{hits, HitsOptions, HitsResult};
pub use ktruss::{all_ktruss, ktruss, AllKTrussResult};
pub use matching::{maximal_matching, MatchingKind};
pub use mis::maximal_independent_set;
pub use msbfs::{multi_source_bfs, MsBfsResult};
pub use sssp::sssp_delta_stepping;
pub use triangle::{triangle_centrality, triangle_count, Sorting, TriangleMethod};
pub use vertex_cover::vertex_cover;

use crate::types::tuning;

/// Frontier expansion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Push,
    Pull,
}

/// Pick the expansion direction from the size of the active set relative
/// to the problem, with hysteresis between the two thresholds: a small set
/// pushes, a large one pulls, anything in between keeps the previous
/// direction.
pub(crate) fn choose_direction(active: usize, total: usize, previous: Direction) -> Direction {
    let fraction = active as f64 / total.max(1) as f64;
    if fraction < tuning::PUSH_FRACTION {
        Direction::Push
    } else if fraction > tuning::PULL_FRACTION {
        Direction::Pull
    } else {
        previous
    }
}
