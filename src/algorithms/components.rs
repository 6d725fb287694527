//! Connected components by label propagation.
//!
//! Two methods: the FastSV-style grandparent/hooking iteration (default),
//! and a Boruvka-style contraction fallback that only needs multiply and
//! select.  Both label every node with the smallest node id of its
//! component and require a symmetric adjacency structure.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::matrix::ops::mxv;
use crate::matrix::semiring;
use crate::matrix::SparseVector;
use crate::scalar::Scalar;
use log::debug;

fn require_symmetric<T: Scalar>(graph: &Graph<T>, operation: &str) -> Result<()> {
    if !graph.has_symmetric_structure() {
        return Err(GraphError::InvalidGraph(format!(
            "{} requires a symmetric adjacency structure",
            operation
        )));
    }
    Ok(())
}

/// FastSV-style connected components.
///
/// Each node carries a parent label, initially its own id.  Per iteration:
/// grandparent substitution, minimum hooking along every edge via a
/// `(min, second)` product, and one step of path compression.  Stops when a
/// full pass changes nothing; the converged labels are the component
/// minima.
pub fn connected_components<T: Scalar>(graph: &Graph<T>) -> Result<SparseVector<i64>> {
    require_symmetric(graph, "connected_components")?;
    let a = graph.adjacency();
    let n = graph.nrows();
    let mut parent: Vec<i64> = (0..n as i64).collect();
    let sr = semiring::min_second::<T, i64>();

    for iteration in 1.. {
        let mut changed = false;

        // gp = parent(parent), then parent <- min(parent, gp)
        for i in 0..n {
            let gp = parent[parent[i] as usize];
            if gp < parent[i] {
                parent[i] = gp;
                changed = true;
            }
        }

        // hook: parent[i] <- min over edges (i,j) of parent[j]
        let p_vec = SparseVector::from_entries(
            n,
            parent.iter().copied().enumerate().collect(),
            |x, _| x,
        )?;
        let mnp = mxv(a, &p_vec, &sr, None)?;
        for (i, &m) in mnp.iter() {
            if m < parent[i] {
                parent[i] = m;
                changed = true;
            }
        }

        // one-step compression
        for i in 0..n {
            let gp = parent[parent[i] as usize];
            if gp < parent[i] {
                parent[i] = gp;
                changed = true;
            }
        }

        debug!("connected_components iteration {}", iteration);
        if !changed {
            break;
        }
    }

    SparseVector::from_entries(n, parent.into_iter().enumerate().collect(), |x, _| x)
}

/// Boruvka-style connected components, the fallback for engines without
/// the FastSV extensions.
///
/// Per round: find each node's minimum neighbouring parent, reduce those
/// minima per tree root, hook roots downward, shortcut the forest to
/// fixpoint, and prune intra-component edges with a select predicate over
/// the current parent map.  Terminates when no edges remain.
pub fn connected_components_boruvka<T: Scalar>(graph: &Graph<T>) -> Result<SparseVector<i64>> {
    require_symmetric(graph, "connected_components_boruvka")?;
    let n = graph.nrows();
    let mut s = graph.adjacency().to_pattern();
    let mut f: Vec<usize> = (0..n).collect();
    let sr = semiring::min_second::<bool, i64>();

    let mut round = 0usize;
    while s.nvals() > 0 {
        round += 1;

        // mnp[u] = minimum parent among u's neighbours (n when none)
        let f_vec = SparseVector::from_entries(
            n,
            f.iter().map(|&v| v as i64).enumerate().collect(),
            |x, _| x,
        )?;
        let mnp = mxv(&s, &f_vec, &sr, None)?;

        // ccmn[r] = minimum of mnp over the tree rooted at r
        let mut ccmn: Vec<usize> = vec![n; n];
        for (u, &m) in mnp.iter() {
            let root = f[u];
            ccmn[root] = ccmn[root].min(m as usize);
        }

        // hook each root to its component's minimum neighbour
        for u in 0..n {
            if ccmn[u] != n {
                f[u] = ccmn[u];
            }
        }

        // 2-cycles (f[f[i]] == i) pick the smaller endpoint as root;
        // detection runs on a snapshot so earlier updates cannot mask a
        // cycle
        let snapshot = f.clone();
        for i in 0..n {
            if snapshot[snapshot[i]] == i {
                f[i] = snapshot[i].min(i);
            }
        }

        // shortcut until the forest is flat
        loop {
            let mut diff = false;
            for i in 0..n {
                let gp = f[f[i]];
                if gp != f[i] {
                    f[i] = gp;
                    diff = true;
                }
            }
            if !diff {
                break;
            }
        }

        // prune edges inside a component; the parent map rides along in
        // the predicate closure
        let fr = &f;
        s = s.select(|i, j, _| fr[i] != fr[j]);
        debug!("boruvka round {}: {} edges left", round, s.nvals());
    }

    SparseVector::from_entries(
        n,
        f.into_iter().map(|v| v as i64).enumerate().collect(),
        |x, _| x,
    )
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
        Graph::new(a, GraphKind::Undirected)
    }

    /// Union-find oracle for the component minima.
    fn oracle(n: usize, edges: &[(usize, usize)]) -> Vec<i64> {
        let mut root: Vec<usize> = (0..n).collect();
        fn find(root: &mut Vec<usize>, i: usize) -> usize {
            if root[i] != i {
                let r = find(root, root[i]);
                root[i] = r;
            }
            root[i]
        }
        for &(i, j) in edges {
            let (a, b) = (find(&mut root, i), find(&mut root, j));
            let m = a.min(b);
            root[a] = m;
            root[b] = m;
        }
        let mut minimum = vec![usize::MAX; n];
        for i in 0..n {
            let r = find(&mut root, i);
            minimum[r] = minimum[r].min(i);
        }
        (0..n).map(|i| minimum[find(&mut root, i)] as i64).collect()
    }

    fn check_both(n: usize, edges: &[(usize, usize)]) {
        let g = undirected(n, edges);
        let expect = oracle(n, edges);
        for result in [
            connected_components(&g).unwrap(),
            connected_components_boruvka(&g).unwrap(),
        ] {
            assert_eq!(result.nvals(), n);
            for (i, &c) in result.iter() {
                assert_eq!(c, expect[i], "node {}", i);
            }
        }
    }

    #[test]
    fn tree_is_one_component() {
        check_both(7, &[(0, 1), (0, 2), (1, 3), (1, 4), (2, 5), (2, 6)]);
    }

    #[test]
    fn forest_has_one_label_per_tree() {
        check_both(9, &[(1, 2), (2, 3), (4, 5), (7, 8)]);
    }

    #[test]
    fn long_path_converges() {
        let edges: Vec<(usize, usize)> = (0..63).map(|i| (i, i + 1)).collect();
        check_both(64, &edges);
    }

    #[test]
    fn edges_share_component_labels() {
        let edges = [(0, 3), (3, 6), (1, 4), (4, 7), (2, 5)];
        let g = undirected(8, &edges);
        let comp = connected_components(&g).unwrap();
        for &(i, j) in &edges {
            assert_eq!(comp.get(i), comp.get(j));
        }
    }

    #[test]
    fn directed_graph_requires_known_symmetry() {
        let a = SparseMatrix::from_triplets(2, 2, vec![(0, 1, true)], |x, _| x).unwrap();
        let g = Graph::new(a, GraphKind::Directed);
        assert!(connected_components(&g).is_err());
        assert!(connected_components_boruvka(&g).is_err());
    }
}
