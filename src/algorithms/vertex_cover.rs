//! Minimal vertex cover from the complement of a maximal independent set.

use super::mis::maximal_independent_set;
use crate::error::Result;
use crate::graph::Graph;
use crate::matrix::SparseVector;
use crate::scalar::Scalar;

/// Compute a minimal vertex cover: the structural complement of a maximal
/// independent set.
///
/// Inherits the MIS requirements (symmetric structure, cached out-degree,
/// no self edges).  Output: `true` at every cover member.
pub fn vertex_cover<T: Scalar>(graph: &Graph<T>, seed: u64) -> Result<SparseVector<bool>> {
    let mis = maximal_independent_set(graph, seed)?;
    let n = graph.nrows();
    let mut cover = SparseVector::new(n);
    for i in 0..n {
        if mis.get(i).is_none() {
            cover.set(i, true)?;
        }
    }
    Ok(cover)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SparseMatrix;
    use crate::types::GraphKind;

    fn undirected(n: usize, edges: &[(usize, usize)]) -> Graph<bool> {
        let mut triplets = Vec::new();
        for &(i, j) in edges {
            triplets.push((i, j, true));
            triplets.push((j, i, true));
        }
        let a = SparseMatrix::from_triplets(n, n, triplets, |x, _| x).unwrap();
        let mut g = Graph::new(a, GraphKind::Undirected);
        g.compute_out_degree();
        g
    }

    #[test]
    fn every_edge_is_covered() {
        let g = undirected(7, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 0)]);
        let cover = vertex_cover(&g, 11).unwrap();
        for (i, j, _) in g.adjacency().iter() {
            assert!(
                cover.get(i).is_some() || cover.get(j).is_some(),
                "edge ({}, {}) uncovered",
                i,
                j
            );
        }
    }

    #[test]
    fn cover_and_mis_partition_the_nodes() {
        let g = undirected(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
        let mis = maximal_independent_set(&g, 3).unwrap();
        let cover = vertex_cover(&g, 3).unwrap();
        for i in 0..6 {
            assert_ne!(mis.get(i).is_some(), cover.get(i).is_some());
        }
    }

    #[test]
    fn isolated_nodes_stay_out_of_the_cover() {
        let g = undirected(4, &[(0, 1)]);
        let cover = vertex_cover(&g, 5).unwrap();
        assert_eq!(cover.get(2), None);
        assert_eq!(cover.get(3), None);
    }
}
