//! # algraph: graph analytics as sparse semiring algebra
//!
//! This crate treats a graph as a sparse adjacency matrix and expresses
//! traversals, centrality, components, clustering, and counting as
//! algebraic expressions over user-selectable semirings.
//!
//! ## Key pieces
//!
//! - **Engine**: a compact CSR [`SparseMatrix`] / [`SparseVector`] pair
//!   with semiring-parameterised multiply kernels, structural masks,
//!   select, and reductions
//! - **Graph object**: [`Graph`] bundles the adjacency with lazily
//!   computed cached invariants (transpose, degrees, self-edge count,
//!   structural symmetry)
//! - **Algorithms**: BFS and multi-source BFS, connected components
//!   (FastSV and Boruvka), six triangle-count kernels plus triangle
//!   centrality, k-truss and all-k-truss, delta-stepping shortest paths,
//!   label-propagation communities, Luby's maximal independent set,
//!   maximal matching, matching-based coarsening, HITS, batched Brandes
//!   betweenness, exact diameter, and vertex cover
//! - **I/O**: Matrix Market text read/write with the `%%GraphBLAS` type
//!   extension
//!
//! ## Quick start
//!
//! ```rust
//! use algraph::{breadth_first_search, BfsOptions, Graph, GraphKind, SparseMatrix};
//!
//! // a 4-node undirected path
//! let mut triplets = Vec::new();
//! for (i, j) in [(0, 1), (1, 2), (2, 3)] {
//!     triplets.push((i, j, true));
//!     triplets.push((j, i, true));
//! }
//! let a = SparseMatrix::from_triplets(4, 4, triplets, |x, _| x)?;
//! let graph = Graph::new(a, GraphKind::Undirected);
//!
//! let bfs = breadth_first_search(&graph, 0, &BfsOptions::default())?;
//! let level = bfs.level.unwrap();
//! assert_eq!(level.get(3), Some(&3));
//! # Ok::<(), algraph::GraphError>(())
//! ```
//!
//! ## Features
//!
//! - `serde` (default): serialization derives on the public data types
//! - `parallel`: rayon-backed sorting in the sort primitives
//!
//! ## Concurrency
//!
//! Algorithms are synchronous and data-parallel within a call; distinct
//! [`Graph`] values may be used from distinct threads.  The process-global
//! state lives in [`context`] and is limited to the one-shot
//! initialization flag and the `(outer, inner)` thread counts.

#![warn(missing_docs)]

pub mod algorithms;
pub mod context;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod scalar;
pub mod types;
pub mod util;

// Re-export the working set at the crate root
pub use algorithms::{
    all_ktruss, betweenness, breadth_first_search, cdlp, coarsen_by_matching,
    connected_components, connected_components_boruvka, exact_diameter, hits, ktruss,
    maximal_independent_set, maximal_matching, multi_source_bfs, sssp_delta_stepping,
    triangle_centrality, triangle_count, vertex_cover, AllKTrussResult, BfsOptions, BfsResult,
    CoarsenOptions, CoarsenResult, CoarsenedAdjacency, DiameterResult, HitsOptions, HitsResult,
    MatchingKind, MsBfsResult, Sorting, TriangleMethod,
};
pub use error::{GraphError, Result};
pub use graph::{incidence_matrix, Graph};
pub use matrix::{
    read_matrix, read_matrix_any, write_matrix, AnyMatrix, MmHeader, Semiring, SparseMatrix,
    SparseVector,
};
pub use scalar::Scalar;
pub use types::{GraphKind, ScalarType, Symmetry};
pub use util::{sample_degree, sort_keys, sort_pairs, Lcg};
