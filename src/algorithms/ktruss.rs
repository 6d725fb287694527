//! K-truss and all-k-truss.
//!
//! The k-truss of a graph is the maximal subgraph whose every edge is
//! supported by at least `k - 2` triangles.  One masked dot-product
//! multiply per step recomputes edge supports (`C{C} = C·Cᵀ`), a value
//! select drops under-supported edges, and the iteration converges when
//! the entry count stops changing.  The all-k-truss sweep amortises the
//! work: each truss seeds the search for the next.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::matrix::ops::{mxm_dot, reduce_matrix};
use crate::matrix::semiring;
use crate::matrix::SparseMatrix;
use crate::scalar::Scalar;
use log::debug;

fn check_input<T: Scalar>(graph: &Graph<T>, operation: &str) -> Result<()> {
    if !graph.has_symmetric_structure() {
        return Err(GraphError::InvalidGraph(format!(
            "{} requires a symmetric adjacency structure",
            operation
        )));
    }
    let ndiag = graph
        .nself_edges()
        .unwrap_or_else(|| graph.adjacency().ndiag());
    if ndiag != 0 {
        return Err(GraphError::SelfEdgesNotAllowed { count: ndiag });
    }
    Ok(())
}

/// Compute the k-truss subgraph for one `k >= 3`.
///
/// The result is symmetric with a zero-free diagonal; each entry holds the
/// edge's support (≥ `k - 2`).  The triangle count of the truss is
/// `sum(C) / 6` and its edge count `nvals(C) / 2`.
pub fn ktruss<T: Scalar>(graph: &Graph<T>, k: u32) -> Result<SparseMatrix<u32>> {
    if k < 3 {
        return Err(GraphError::invalid_value(
            "ktruss",
            format!("k is {}, must be at least 3", k),
        ));
    }
    check_input(graph, "ktruss")?;

    let sr = semiring::plus_pair::<i64, i64>();
    let support = (k - 2) as i64;
    let mut c = graph.adjacency().map(|_| 1i64);
    let mut nvals_last = c.nvals();
    loop {
        // C{S} = S·Sᵀ, then keep entries with enough support
        let counts = mxm_dot(&c, &c, &sr, &c)?;
        let next = counts.select(|_, _, v| *v >= support);
        let nvals = next.nvals();
        debug!("ktruss k={}: {} -> {} entries", k, nvals_last, nvals);
        c = next;
        if nvals == nvals_last {
            return Ok(c.map(|&v| v as u32));
        }
        nvals_last = nvals;
    }
}

/// Statistics (and optionally the matrices) of every k-truss from `k = 3`
/// up to the first empty one.
#[derive(Debug, Clone)]
pub struct AllKTrussResult {
    /// Smallest `k` whose k-truss is empty.
    pub kmax: usize,
    /// `ntris[k]` = triangles in the k-truss (indices below 3 unused).
    pub ntris: Vec<u64>,
    /// `nedges[k]` = edges in the k-truss.
    pub nedges: Vec<u64>,
    /// `nsteps[k]` = multiply/select rounds spent on the k-truss.
    pub nsteps: Vec<u64>,
    /// The non-empty truss matrices, indexed by `k`, when requested.
    pub trusses: Option<Vec<Option<SparseMatrix<u32>>>>,
}

/// Compute every k-truss, reusing the k-truss as the seed of the
/// (k+1)-truss search.
pub fn all_ktruss<T: Scalar>(graph: &Graph<T>, keep_trusses: bool) -> Result<AllKTrussResult> {
    check_input(graph, "all_ktruss")?;

    let sr = semiring::plus_pair::<i64, i64>();
    let a = graph.adjacency().map(|_| 1i64);
    let mut nvals_last = a.nvals();
    // C{A} = A·Aᵀ: support of every original edge
    let mut c = mxm_dot(&a, &a, &sr, &a)?;
    let mut nsteps: u64 = 1;

    let mut ntris = vec![0u64; 3];
    let mut nedges = vec![0u64; 3];
    let mut nsteps_out = vec![0u64; 3];
    let mut trusses: Vec<Option<SparseMatrix<u32>>> = vec![None, None, None];

    for k in 3usize.. {
        loop {
            let support = (k - 2) as i64;
            c = c.select(|_, _, v| *v >= support);
            let nvals = c.nvals();
            if nvals == nvals_last {
                // k-truss found
                let total = reduce_matrix(&c, 0i64, |acc, v| acc + v);
                ntris.push((total / 6) as u64);
                nedges.push((nvals / 2) as u64);
                nsteps_out.push(nsteps);
                nsteps = 0;
                if nvals == 0 {
                    trusses.push(None);
                    return Ok(AllKTrussResult {
                        kmax: k,
                        ntris,
                        nedges,
                        nsteps: nsteps_out,
                        trusses: keep_trusses.then_some(trusses),
                    });
                }
                trusses.push(keep_trusses.then(|| c.map(|&v| v as u32)));
                break;
            }
            nvals_last = nvals;
            nsteps += 1;
            c = mxm_dot(&c, &c, &sr, &c)?;
        }
    }
    unreachable!("the sweep always terminates at an empty truss");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GraphKind;

    fn undirected(n: usize, edges: &[(usize, usize)]) -> Graph<bool> {
        let mut triplets = Vec::new();
        for &(i, j) in edges {
            triplets.push((i, j, true));
            triplets.push((j, i, true));
        }
        let a = SparseMatrix::from_triplets(n, n, triplets, |x, _| x).unwrap();
        Graph::new(a, GraphKind::Undirected)
    }

    /// K5 minus one edge, with a tail.
    fn test_graph() -> Graph<bool> {
        let mut edges = Vec::new();
        for i in 0..5usize {
            for j in i + 1..5 {
                if !(i == 0 && j == 4) {
                    edges.push((i, j));
                }
            }
        }
        edges.push((4, 5));
        undirected(6, &edges)
    }

    #[test]
    fn truss_values_meet_support_and_symmetry() {
        let g = test_graph();
        let t3 = ktruss(&g, 3).unwrap();
        assert!(t3.nvals() > 0);
        assert!(t3.is_equal(&t3.transpose()));
        for (_, _, &v) in t3.iter() {
            assert!(v >= 1);
        }
        let t4 = ktruss(&g, 4).unwrap();
        for (_, _, &v) in t4.iter() {
            assert!(v >= 2);
        }
        // (k+1)-truss is a subgraph of the k-truss
        for (i, j, _) in t4.iter() {
            assert!(t3.get(i, j).is_some());
        }
    }

    #[test]
    fn tail_edges_drop_out() {
        let g = test_graph();
        let t3 = ktruss(&g, 3).unwrap();
        assert_eq!(t3.get(4, 5), None);
        assert_eq!(t3.get(5, 4), None);
    }

    #[test]
    fn k_below_three_is_rejected() {
        let g = test_graph();
        assert!(ktruss(&g, 2).is_err());
    }

    #[test]
    fn triangle_graph_truss_counts() {
        // a single triangle is its own 3-truss; the 4-truss is empty
        let g = undirected(3, &[(0, 1), (1, 2), (0, 2)]);
        let t3 = ktruss(&g, 3).unwrap();
        assert_eq!(t3.nvals(), 6);
        let t4 = ktruss(&g, 4).unwrap();
        assert_eq!(t4.nvals(), 0);
    }

    #[test]
    fn all_ktruss_matches_single_runs() {
        let g = test_graph();
        let all = all_ktruss(&g, true).unwrap();
        assert!(all.kmax >= 4);
        let trusses = all.trusses.as_ref().unwrap();
        for k in 3..all.kmax {
            let single = ktruss(&g, k as u32).unwrap();
            assert_eq!(all.nedges[k], (single.nvals() / 2) as u64, "k = {}", k);
            let kept = trusses[k].as_ref().unwrap();
            assert!(kept.is_equal(&single), "k = {}", k);
            let total: u64 = kept.iter().map(|(_, _, &v)| v as u64).sum();
            assert_eq!(all.ntris[k], total / 6);
        }
        // the kmax-truss is empty and not stored
        assert!(trusses[all.kmax].is_none());
        assert_eq!(all.nedges[all.kmax], 0);
    }

    #[test]
    fn all_ktruss_without_matrices() {
        let g = undirected(3, &[(0, 1), (1, 2), (0, 2)]);
        let all = all_ktruss(&g, false).unwrap();
        assert!(all.trusses.is_none());
        assert_eq!(all.kmax, 4);
        assert_eq!(all.ntris[3], 1);
        assert_eq!(all.nedges[3], 3);
    }
}
