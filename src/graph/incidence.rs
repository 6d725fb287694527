//! Incidence matrix construction.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::matrix::SparseMatrix;
use crate::scalar::Scalar;
use crate::types::GraphKind;

/// Build the `n × e` incidence matrix of an undirected graph.
///
/// Column `k` holds exactly two entries, one per endpoint of the `k`-th
/// edge, both equal to the edge weight.  Edges are enumerated over the
/// strict upper triangle in row-major order, so edge ids are stable for a
/// given adjacency.  The graph must be undirected and free of self edges.
pub fn incidence_matrix<T: Scalar>(graph: &Graph<T>) -> Result<SparseMatrix<T>> {
    if graph.kind() != GraphKind::Undirected {
        return Err(GraphError::InvalidGraph(
            "incidence matrix requires an undirected graph".into(),
        ));
    }
    let a = graph.adjacency();
    let ndiag = a.ndiag();
    if ndiag != 0 {
        return Err(GraphError::SelfEdgesNotAllowed { count: ndiag });
    }

    let nedges = a.nvals() / 2;
    let mut triplets = Vec::with_capacity(a.nvals());
    let mut edge = 0usize;
    for (i, j, v) in a.iter() {
        // each undirected edge appears twice; keep the upper copy
        if i < j {
            triplets.push((i, edge, *v));
            triplets.push((j, edge, *v));
            edge += 1;
        }
    }
    if edge != nedges {
        return Err(GraphError::InvalidGraph(format!(
            "adjacency is not structurally symmetric: {} upper entries vs {} edges",
            edge, nedges
        )));
    }
    SparseMatrix::from_triplets(a.nrows(), nedges, triplets, |x, _| x)
}
