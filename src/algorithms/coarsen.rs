//! Graph coarsening driven by a maximal matching.
//!
//! Every matched edge contracts into its smaller endpoint; unmatched nodes
//! survive as themselves.  The parent map becomes a selector matrix `S`
//! (`S[p[i], i] = 1`), optionally with the surviving namespace compressed
//! to `0..n'`, and the coarse adjacency is `S · A · Sᵀ` with weights either
//! combined (`(+, ×)`) or reduced to structure.  Self edges created by the
//! contraction are dropped.
//!
//! Element-type policy, applied uniformly: boolean and integer adjacencies
//! coarsen as `int64`, floating ones as `fp64`.

use super::matching::{maximal_matching, MatchingKind};
use crate::error::{GraphError, Result};
use crate::graph::{incidence_matrix, Graph};
use crate::matrix::ops::{mxm, mxv, VectorMask};
use crate::matrix::semiring;
use crate::matrix::{SparseMatrix, SparseVector};
use crate::scalar::Scalar;
use crate::types::{GraphKind, ScalarType};
use log::debug;

/// Options for one coarsening step.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoarsenOptions {
    /// Matching flavour used to pick the contracted edges.
    pub kind: MatchingKind,
    /// Keep the original node namespace (eliminated nodes become
    /// singletons) instead of renumbering the survivors.
    pub preserve_mapping: bool,
    /// Sum the weights of merged edges; otherwise keep structure only.
    pub combine_weights: bool,
    /// Seed for the matching.
    pub seed: u64,
}

impl Default for CoarsenOptions {
    fn default() -> Self {
        Self {
            kind: MatchingKind::Random,
            preserve_mapping: false,
            combine_weights: true,
            seed: 0,
        }
    }
}

/// The coarse adjacency, typed per the promotion policy.
#[derive(Debug, Clone)]
pub enum CoarsenedAdjacency {
    /// Integer and boolean inputs coarsen as `i64`.
    Int64(SparseMatrix<i64>),
    /// Floating inputs coarsen as `f64`.
    Fp64(SparseMatrix<f64>),
}

impl CoarsenedAdjacency {
    /// Number of nodes in the coarse graph.
    pub fn nrows(&self) -> usize {
        match self {
            CoarsenedAdjacency::Int64(m) => m.nrows(),
            CoarsenedAdjacency::Fp64(m) => m.nrows(),
        }
    }

    /// Number of explicit coarse entries.
    pub fn nvals(&self) -> usize {
        match self {
            CoarsenedAdjacency::Int64(m) => m.nvals(),
            CoarsenedAdjacency::Fp64(m) => m.nvals(),
        }
    }
}

/// Result of [`coarsen_by_matching`].
#[derive(Debug, Clone)]
pub struct CoarsenResult {
    /// The coarse adjacency matrix.
    pub coarsened: CoarsenedAdjacency,
    /// `parent[u]` = the node `u` collapsed into (itself when unmatched).
    pub parent: SparseVector<i64>,
    /// Old label → new label for surviving nodes; `None` when the mapping
    /// was preserved.
    pub newlabels: Option<SparseVector<i64>>,
    /// New label → old label; `None` when the mapping was preserved.
    pub inv_newlabels: Option<SparseVector<i64>>,
}

/// Perform one coarsening step on an undirected graph with no self edges.
pub fn coarsen_by_matching<T: Scalar>(
    graph: &Graph<T>,
    opts: &CoarsenOptions,
) -> Result<CoarsenResult> {
    if graph.kind() != GraphKind::Undirected {
        return Err(GraphError::InvalidGraph(
            "coarsen_by_matching requires an undirected graph".into(),
        ));
    }
    let ndiag = graph
        .nself_edges()
        .unwrap_or_else(|| graph.adjacency().ndiag());
    if ndiag != 0 {
        return Err(GraphError::SelfEdgesNotAllowed { count: ndiag });
    }

    match T::TYPE {
        ScalarType::Fp32 | ScalarType::Fp64 => {
            let (coarsened, parent, newlabels, inv) =
                coarsen_core(graph.adjacency().cast::<f64>(), opts)?;
            Ok(CoarsenResult {
                coarsened: CoarsenedAdjacency::Fp64(coarsened),
                parent,
                newlabels,
                inv_newlabels: inv,
            })
        }
        ScalarType::Complex | ScalarType::UserDefined => Err(GraphError::NotImplemented(
            "coarsening of complex-valued adjacencies",
        )),
        _ => {
            let (coarsened, parent, newlabels, inv) =
                coarsen_core(graph.adjacency().cast::<i64>(), opts)?;
            Ok(CoarsenResult {
                coarsened: CoarsenedAdjacency::Int64(coarsened),
                parent,
                newlabels,
                inv_newlabels: inv,
            })
        }
    }
}

type CoreOutput<W> = (
    SparseMatrix<W>,
    SparseVector<i64>,
    Option<SparseVector<i64>>,
    Option<SparseVector<i64>>,
);

fn coarsen_core<W>(a: SparseMatrix<W>, opts: &CoarsenOptions) -> Result<CoreOutput<W>>
where
    W: Scalar + core::ops::Add<Output = W> + core::ops::Mul<Output = W>,
{
    let n = a.nrows();
    let work = Graph::new(a, GraphKind::Undirected);
    let e = incidence_matrix(&work)?;
    let et = e.transpose();
    let a = work.into_adjacency();

    let matched = maximal_matching(&e, opts.kind, opts.seed)?;
    debug!(
        "coarsen: {} of {} edges matched",
        matched.nvals(),
        e.ncols()
    );

    // edge_parent{matched}: the smaller endpoint of each matched edge
    let full = SparseVector::full(n, true);
    let edge_parent = mxv(
        &et,
        &full,
        &semiring::min_secondi::<W, bool>(),
        Some(VectorMask::from_pattern(&matched, false)),
    )?;

    // node_parent: nodes of matched edges point at the edge's parent;
    // everyone else points at itself
    let node_parent_sparse = mxv(&e, &edge_parent, &semiring::min_second::<W, i64>(), None)?;
    let mut parent: Vec<i64> = (0..n as i64).collect();
    for (i, &p) in node_parent_sparse.iter() {
        parent[i] = p;
    }

    // selector matrix S, optionally with a compressed namespace
    let (s, newlabels, inv_newlabels, coarse_n) = if opts.preserve_mapping {
        let triplets = (0..n).map(|i| (parent[i] as usize, i, W::one())).collect();
        (
            SparseMatrix::from_triplets(n, n, triplets, |x, _| x)?,
            None,
            None,
            n,
        )
    } else {
        // survivors are the self-parented nodes, renumbered by a ramp
        let mut newlabel: Vec<Option<i64>> = vec![None; n];
        let mut inv = Vec::new();
        for i in 0..n {
            if parent[i] == i as i64 {
                newlabel[i] = Some(inv.len() as i64);
                inv.push((inv.len(), i as i64));
            }
        }
        let coarse_n = inv.len();
        let triplets = (0..n)
            .map(|i| {
                let target = newlabel[parent[i] as usize].expect("parent is a survivor");
                (target as usize, i, W::one())
            })
            .collect();
        let s = SparseMatrix::from_triplets(coarse_n, n, triplets, |x, _| x)?;
        let newlabels = SparseVector::from_dense(newlabel);
        let inv_newlabels = SparseVector::from_entries(coarse_n, inv, |x, _| x)?;
        (s, Some(newlabels), Some(inv_newlabels), coarse_n)
    };

    // A' = S · A · Sᵀ, combining weights or keeping structure
    let times = semiring::plus_times::<W>();
    let sa = mxm(&s, &a, &times)?;
    let mut coarse = mxm(&sa, &s.transpose(), &times)?;
    if !opts.combine_weights {
        coarse = coarse.map(|_| W::one());
    }
    // contraction turns matched edges into diagonal entries
    coarse = coarse.offdiag();
    debug_assert_eq!(coarse.nrows(), coarse_n);

    let parent_vec =
        SparseVector::from_entries(n, parent.into_iter().enumerate().collect(), |x, _| x)?;
    Ok((coarse, parent_vec, newlabels, inv_newlabels))
}
