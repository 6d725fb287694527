//! The graph object: an adjacency matrix plus lazily computed, cached
//! structural properties.
//!
//! A [`Graph`] owns its adjacency exclusively; algorithms never mutate it.
//! Cached fields (transpose, degrees, self-edge count, symmetry, minimum
//! weight) are performance hints: their absence is never an error, they can
//! be recomputed from the adjacency at any time, and every `compute_*`
//! method is idempotent.

pub mod incidence;

pub use incidence::incidence_matrix;

use crate::error::{GraphError, Result};
use crate::matrix::{SparseMatrix, SparseVector};
use crate::scalar::Scalar;
use crate::types::{GraphKind, Symmetry};
use log::debug;

/// A graph held as an `n × n` sparse adjacency matrix with cached
/// invariants.
#[derive(Debug, Clone)]
pub struct Graph<T: Scalar> {
    adjacency: SparseMatrix<T>,
    kind: GraphKind,
    transpose: Option<SparseMatrix<T>>,
    out_degree: Option<SparseVector<i64>>,
    in_degree: Option<SparseVector<i64>>,
    nself_edges: Option<u64>,
    symmetric_structure: Symmetry,
    min_edge_weight: Option<T>,
}

impl<T: Scalar> Graph<T> {
    /// Take ownership of an adjacency matrix.
    pub fn new(adjacency: SparseMatrix<T>, kind: GraphKind) -> Self {
        let symmetric_structure = match kind {
            GraphKind::Undirected => Symmetry::True,
            GraphKind::Directed => Symmetry::Unknown,
        };
        Self {
            adjacency,
            kind,
            transpose: None,
            out_degree: None,
            in_degree: None,
            nself_edges: None,
            symmetric_structure,
            min_edge_weight: None,
        }
    }

    /// Duplicate an adjacency matrix into a new graph.
    pub fn from_matrix(adjacency: &SparseMatrix<T>, kind: GraphKind) -> Self {
        Self::new(adjacency.clone(), kind)
    }

    /// The adjacency matrix.
    pub fn adjacency(&self) -> &SparseMatrix<T> {
        &self.adjacency
    }

    /// Consume the graph and return the adjacency.
    pub fn into_adjacency(self) -> SparseMatrix<T> {
        self.adjacency
    }

    /// Directedness tag.
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Number of nodes (rows of the adjacency).
    pub fn nrows(&self) -> usize {
        self.adjacency.nrows()
    }

    /// Number of explicit adjacency entries.
    pub fn nvals(&self) -> usize {
        self.adjacency.nvals()
    }

    /// Cached transpose, when computed.  For an undirected graph the
    /// adjacency is its own transpose and this stays `None`.
    pub fn transpose(&self) -> Option<&SparseMatrix<T>> {
        self.transpose.as_ref()
    }

    /// The matrix to traverse incoming edges with: the adjacency itself
    /// when the structure is symmetric, else the cached transpose.
    pub fn incoming(&self) -> Result<&SparseMatrix<T>> {
        if self.kind == GraphKind::Undirected || self.symmetric_structure == Symmetry::True {
            Ok(&self.adjacency)
        } else {
            self.transpose.as_ref().ok_or(GraphError::NotCached {
                property: "transpose",
            })
        }
    }

    /// Cached out-degrees, when computed.
    pub fn out_degree(&self) -> Option<&SparseVector<i64>> {
        self.out_degree.as_ref()
    }

    /// Cached in-degrees, when computed.
    pub fn in_degree(&self) -> Option<&SparseVector<i64>> {
        self.in_degree.as_ref()
    }

    /// Cached count of diagonal entries; `None` means unknown.
    pub fn nself_edges(&self) -> Option<u64> {
        self.nself_edges
    }

    /// Structural symmetry, possibly still [`Symmetry::Unknown`].
    pub fn symmetric_structure(&self) -> Symmetry {
        self.symmetric_structure
    }

    /// Cached minimum edge weight, when computed.
    pub fn min_edge_weight(&self) -> Option<&T> {
        self.min_edge_weight.as_ref()
    }

    /// True when the structure is known symmetric (undirected, or directed
    /// with a confirmed symmetric pattern).
    pub fn has_symmetric_structure(&self) -> bool {
        self.kind == GraphKind::Undirected || self.symmetric_structure == Symmetry::True
    }

    /// Cache the transpose.  No-op for an undirected graph, whose
    /// adjacency already equals its transpose structurally.
    pub fn compute_transpose(&mut self) {
        if self.kind == GraphKind::Undirected || self.transpose.is_some() {
            return;
        }
        self.transpose = Some(self.adjacency.transpose());
    }

    /// Cache the out-degree vector: explicit entries per row, with rows of
    /// zero entries absent.
    pub fn compute_out_degree(&mut self) {
        if self.out_degree.is_some() {
            return;
        }
        let n = self.adjacency.nrows();
        let mut entries = Vec::new();
        for i in 0..n {
            let d = self.adjacency.row_nvals(i);
            if d > 0 {
                entries.push((i, d as i64));
            }
        }
        self.out_degree =
            Some(SparseVector::from_entries(n, entries, |a, _| a).expect("row index in range"));
    }

    /// Cache the in-degree vector: explicit entries per column.  For an
    /// undirected graph this is the out-degree.
    pub fn compute_in_degree(&mut self) {
        if self.in_degree.is_some() {
            return;
        }
        if self.kind == GraphKind::Undirected {
            self.compute_out_degree();
            self.in_degree = self.out_degree.clone();
            return;
        }
        let ncols = self.adjacency.ncols();
        let mut counts = vec![0i64; ncols];
        for (_, j, _) in self.adjacency.iter() {
            counts[j] += 1;
        }
        let entries = counts
            .into_iter()
            .enumerate()
            .filter(|(_, d)| *d > 0)
            .collect();
        self.in_degree =
            Some(SparseVector::from_entries(ncols, entries, |a, _| a).expect("col index in range"));
    }

    /// Cache the diagonal-entry count.
    pub fn compute_nself_edges(&mut self) -> u64 {
        if let Some(d) = self.nself_edges {
            return d;
        }
        let d = self.adjacency.ndiag();
        self.nself_edges = Some(d);
        d
    }

    /// Resolve [`Symmetry::Unknown`]: undirected graphs are symmetric by
    /// definition; a directed graph materialises its transpose (kept in the
    /// cache) and compares structures.
    pub fn compute_symmetric_structure(&mut self) -> Symmetry {
        if self.kind == GraphKind::Undirected {
            self.symmetric_structure = Symmetry::True;
            return Symmetry::True;
        }
        if self.symmetric_structure != Symmetry::Unknown {
            return self.symmetric_structure;
        }
        self.compute_transpose();
        let at = self.transpose.as_ref().expect("just computed");
        self.symmetric_structure = if self.adjacency.eq_structure(at) {
            Symmetry::True
        } else {
            Symmetry::False
        };
        debug!(
            "compute_symmetric_structure: {:?}",
            self.symmetric_structure
        );
        self.symmetric_structure
    }

    /// Cache the minimum explicit edge weight (absent for an empty
    /// adjacency).
    pub fn compute_min_edge_weight(&mut self) -> Option<&T>
    where
        T: PartialOrd,
    {
        if self.min_edge_weight.is_none() {
            let mut min: Option<T> = None;
            for (_, _, v) in self.adjacency.iter() {
                min = Some(match min {
                    None => *v,
                    Some(m) => {
                        if *v < m {
                            *v
                        } else {
                            m
                        }
                    }
                });
            }
            self.min_edge_weight = min;
        }
        self.min_edge_weight.as_ref()
    }

    /// Drop every cached property, keeping only the adjacency and the
    /// kind.
    pub fn clear_cached_properties(&mut self) {
        self.transpose = None;
        self.out_degree = None;
        self.in_degree = None;
        self.nself_edges = None;
        self.min_edge_weight = None;
        self.symmetric_structure = match self.kind {
            GraphKind::Undirected => Symmetry::True,
            GraphKind::Directed => Symmetry::Unknown,
        };
    }

    /// Remove all diagonal entries from the adjacency.  Invalidates the
    /// other caches and records `nself_edges = 0`.
    pub fn delete_self_edges(&mut self) {
        if self.nself_edges == Some(0) {
            return;
        }
        if self.adjacency.ndiag() > 0 {
            self.adjacency = self.adjacency.offdiag();
        }
        self.clear_cached_properties();
        self.nself_edges = Some(0);
    }

    /// Validate the graph and every cached property against the §3
    /// invariants.  Violations are [`GraphError::InvalidGraph`] with a
    /// readable message.
    pub fn check(&self) -> Result<()> {
        let a = &self.adjacency;
        if !a.is_square() {
            return Err(GraphError::InvalidGraph(format!(
                "adjacency must be square, got {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
        if let Some(at) = &self.transpose {
            if at.nrows() != a.ncols() || at.ncols() != a.nrows() {
                return Err(GraphError::InvalidGraph(format!(
                    "cached transpose is {}x{}, expected {}x{}",
                    at.nrows(),
                    at.ncols(),
                    a.ncols(),
                    a.nrows()
                )));
            }
            if !at.eq_structure(&a.transpose()) {
                return Err(GraphError::InvalidGraph(
                    "cached transpose does not match the adjacency".into(),
                ));
            }
        }
        if let Some(deg) = &self.out_degree {
            if deg.len() != a.nrows() {
                return Err(GraphError::InvalidGraph(format!(
                    "out_degree length {} does not match {} rows",
                    deg.len(),
                    a.nrows()
                )));
            }
            for i in 0..a.nrows() {
                let expect = a.row_nvals(i) as i64;
                let have = deg.get(i).copied().unwrap_or(0);
                if expect != have {
                    return Err(GraphError::InvalidGraph(format!(
                        "out_degree[{}] is {}, adjacency row has {} entries",
                        i, have, expect
                    )));
                }
            }
        }
        if let Some(deg) = &self.in_degree {
            if deg.len() != a.ncols() {
                return Err(GraphError::InvalidGraph(format!(
                    "in_degree length {} does not match {} columns",
                    deg.len(),
                    a.ncols()
                )));
            }
            let mut counts = vec![0i64; a.ncols()];
            for (_, j, _) in a.iter() {
                counts[j] += 1;
            }
            for (j, &expect) in counts.iter().enumerate() {
                let have = deg.get(j).copied().unwrap_or(0);
                if expect != have {
                    return Err(GraphError::InvalidGraph(format!(
                        "in_degree[{}] is {}, adjacency column has {} entries",
                        j, have, expect
                    )));
                }
            }
        }
        if let Some(d) = self.nself_edges {
            let actual = a.ndiag();
            if d != actual {
                return Err(GraphError::InvalidGraph(format!(
                    "nself_edges is {}, adjacency has {} diagonal entries",
                    d, actual
                )));
            }
        }
        if self.kind == GraphKind::Undirected {
            if self.symmetric_structure == Symmetry::False {
                return Err(GraphError::InvalidGraph(
                    "undirected graph marked structurally asymmetric".into(),
                ));
            }
            if !a.eq_structure(&a.transpose()) {
                return Err(GraphError::InvalidGraph(
                    "undirected graph has an asymmetric adjacency structure".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GraphKind;

    fn directed_chain() -> Graph<f64> {
        // 0 -> 1 -> 2, plus a self edge at 2
        let a = SparseMatrix::from_triplets(
            3,
            3,
            vec![(0, 1, 1.0), (1, 2, 2.0), (2, 2, 3.0)],
            |x, _| x,
        )
        .unwrap();
        Graph::new(a, GraphKind::Directed)
    }

    #[test]
    fn degrees_match_structure() {
        let mut g = directed_chain();
        g.compute_out_degree();
        g.compute_in_degree();
        let out = g.out_degree().unwrap();
        let inn = g.in_degree().unwrap();
        assert_eq!(out.get(0), Some(&1));
        assert_eq!(out.get(2), Some(&1));
        assert_eq!(inn.get(0), None);
        assert_eq!(inn.get(2), Some(&2));
        g.check().unwrap();
    }

    #[test]
    fn transpose_and_symmetry() {
        let mut g = directed_chain();
        assert_eq!(g.compute_symmetric_structure(), Symmetry::False);
        assert!(g.transpose().is_some());
        g.check().unwrap();

        let sym = SparseMatrix::from_triplets(
            2,
            2,
            vec![(0, 1, 1.0), (1, 0, 2.0)],
            |x: f64, _| x,
        )
        .unwrap();
        let mut h = Graph::new(sym, GraphKind::Directed);
        assert_eq!(h.compute_symmetric_structure(), Symmetry::True);
    }

    #[test]
    fn undirected_transpose_is_noop() {
        let a = SparseMatrix::from_triplets(2, 2, vec![(0, 1, 1.0), (1, 0, 1.0)], |x: f64, _| x)
            .unwrap();
        let mut g = Graph::new(a, GraphKind::Undirected);
        g.compute_transpose();
        assert!(g.transpose().is_none());
        assert!(g.has_symmetric_structure());
    }

    #[test]
    fn self_edges_counted_and_removed() {
        let mut g = directed_chain();
        assert_eq!(g.compute_nself_edges(), 1);
        g.delete_self_edges();
        assert_eq!(g.nself_edges(), Some(0));
        assert_eq!(g.nvals(), 2);
        // idempotent
        g.delete_self_edges();
        assert_eq!(g.nvals(), 2);
    }

    #[test]
    fn min_edge_weight() {
        let mut g = directed_chain();
        assert_eq!(g.compute_min_edge_weight(), Some(&1.0));
    }

    #[test]
    fn check_rejects_non_square() {
        let a = SparseMatrix::<f64>::new(2, 3);
        let g = Graph::new(a, GraphKind::Directed);
        assert!(matches!(g.check(), Err(GraphError::InvalidGraph(_))));
    }

    #[test]
    fn check_rejects_asymmetric_undirected() {
        let a = SparseMatrix::from_triplets(2, 2, vec![(0, 1, 1.0)], |x: f64, _| x).unwrap();
        let g = Graph::new(a, GraphKind::Undirected);
        assert!(g.check().is_err());
    }

    #[test]
    fn clear_caches_resets_state() {
        let mut g = directed_chain();
        g.compute_out_degree();
        g.compute_nself_edges();
        g.compute_symmetric_structure();
        g.clear_cached_properties();
        assert!(g.out_degree().is_none());
        assert!(g.transpose().is_none());
        assert_eq!(g.nself_edges(), None);
        assert_eq!(g.symmetric_structure(), Symmetry::Unknown);
    }
}
