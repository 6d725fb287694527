//! End-to-end scenarios: matrices arrive through the Matrix Market
//! reader, become graphs, and flow through the algorithm suite; results
//! are checked against independent oracles.

use algraph::{
    all_ktruss, betweenness, breadth_first_search, cdlp, coarsen_by_matching, connected_components,
    connected_components_boruvka, exact_diameter, hits, incidence_matrix, ktruss,
    maximal_independent_set, maximal_matching, multi_source_bfs, read_matrix, sample_degree,
    sssp_delta_stepping, triangle_centrality, triangle_count, vertex_cover, BfsOptions,
    CoarsenOptions, Graph, GraphKind, HitsOptions, MatchingKind, Sorting, SparseMatrix,
    TriangleMethod,
};

/// A 13-node undirected "two clubs" graph: two dense clusters bridged by
/// one edge, in Matrix Market symmetric storage.
const CLUBS_MTX: &str = "%%MatrixMarket matrix coordinate pattern symmetric
%%GraphBLAS bool
13 13 21
2 1
3 1
3 2
4 1
4 2
5 3
5 4
6 2
6 5
7 1
7 6
9 8
10 8
10 9
11 9
11 10
12 10
12 11
13 11
13 12
8 7
";

/// A small directed weighted graph for shortest-path scenarios.
const WEIGHTED_MTX: &str = "%%MatrixMarket matrix coordinate integer general
%%GraphBLAS int64
6 6 9
1 2 2
1 3 7
2 3 3
2 4 8
3 5 5
4 5 1
4 6 4
5 6 9
5 2 1
";

fn clubs() -> Graph<bool> {
    let a: SparseMatrix<bool> = read_matrix(CLUBS_MTX.as_bytes()).unwrap();
    let mut g = Graph::new(a, GraphKind::Undirected);
    g.check().unwrap();
    g.compute_out_degree();
    g.compute_nself_edges();
    g
}

fn weighted() -> Graph<i64> {
    let a: SparseMatrix<i64> = read_matrix(WEIGHTED_MTX.as_bytes()).unwrap();
    Graph::new(a, GraphKind::Directed)
}

#[test]
fn bfs_levels_cover_the_component() {
    let g = clubs();
    let r = breadth_first_search(&g, 0, &BfsOptions::default()).unwrap();
    let level = r.level.unwrap();
    let parent = r.parent.unwrap();
    // the graph is connected: every node gets a level
    assert_eq!(level.nvals(), 13);
    assert_eq!(level.get(0), Some(&0));
    assert_eq!(parent.get(0), Some(&0));
    let max_level = level.reduce(|x, y| x.max(y)).unwrap();
    assert!(max_level >= 3);
    // parent edges descend exactly one level
    for (i, &p) in parent.iter() {
        if i != 0 {
            assert_eq!(level.get(p as usize).unwrap() + 1, *level.get(i).unwrap());
        }
    }
}

#[test]
fn msbfs_and_diameter_agree() {
    let g = clubs();
    let all: Vec<usize> = (0..13).collect();
    let batch = multi_source_bfs(&g, &all, true, false).unwrap();
    let level = batch.level.unwrap();
    let d = exact_diameter(&g, 4).unwrap();
    let mut max_overall = 0;
    for k in 0..13 {
        for v in 0..13 {
            if let Some(l) = level.get(k, v) {
                max_overall = max_overall.max(l);
            }
        }
    }
    assert_eq!(d.diameter, max_overall);
    for (v, &e) in d.peripheral.iter() {
        assert_eq!(e, d.diameter);
        assert_eq!(d.eccentricity.get(v), Some(&d.diameter));
    }
}

#[test]
fn components_of_the_bridged_clubs() {
    let g = clubs();
    let fast = connected_components(&g).unwrap();
    let boruvka = connected_components_boruvka(&g).unwrap();
    assert!(fast.is_equal(&boruvka));
    // bridged: everything is one component labelled by node 0
    for (_, &c) in fast.iter() {
        assert_eq!(c, 0);
    }

    // cutting the bridge splits the graph in two
    let cut = g.adjacency().select(|i, j, _| !(i == 6 && j == 7 || i == 7 && j == 6));
    let g2 = Graph::new(cut, GraphKind::Undirected);
    let comp = connected_components(&g2).unwrap();
    assert_eq!(comp.get(3), Some(&0));
    assert_eq!(comp.get(9), Some(&7));
}

#[test]
fn triangle_methods_and_centrality_are_consistent() {
    let g = clubs();
    let reference = triangle_count(&g, TriangleMethod::Burkhardt, Sorting::NoSort).unwrap();
    for method in [
        TriangleMethod::Cohen,
        TriangleMethod::Sandia,
        TriangleMethod::Sandia2,
        TriangleMethod::SandiaDot,
        TriangleMethod::SandiaDot2,
    ] {
        for sorting in [Sorting::NoSort, Sorting::Ascending, Sorting::Descending, Sorting::Auto] {
            assert_eq!(
                triangle_count(&g, method, sorting).unwrap(),
                reference,
                "{:?} {:?}",
                method,
                sorting
            );
        }
    }
    let (_, from_centrality) = triangle_centrality(&g).unwrap();
    assert_eq!(from_centrality, reference);

    // dense oracle: tr(A³)/6
    let dense = g.adjacency().to_dense();
    let cube = &dense * &dense * &dense;
    assert_eq!(reference, (cube.trace() / 6.0).round() as u64);
}

#[test]
fn ktruss_chain_is_nested() {
    let g = clubs();
    let all = all_ktruss(&g, true).unwrap();
    assert!(all.kmax >= 4);
    let trusses = all.trusses.unwrap();
    for k in 4..all.kmax {
        let smaller = trusses[k].as_ref().unwrap();
        let larger = trusses[k - 1].as_ref().unwrap();
        for (i, j, _) in smaller.iter() {
            assert!(larger.get(i, j).is_some(), "truss {} not nested at ({}, {})", k, i, j);
        }
    }
    let t3 = ktruss(&g, 3).unwrap();
    assert!(t3.is_equal(trusses[3].as_ref().unwrap()));
}

#[test]
fn sssp_matches_reference_distances() {
    let g = weighted();
    // hand-checked distances from node 0
    let expect: [(usize, i64); 6] = [(0, 0), (1, 2), (2, 5), (3, 10), (4, 10), (5, 14)];
    for delta in [1i64, 2, 4, 100] {
        let d = sssp_delta_stepping(&g, 0, delta).unwrap();
        for (node, dist) in expect {
            assert_eq!(d.get(node), Some(&dist), "node {} delta {}", node, delta);
        }
    }
}

#[test]
fn cdlp_separates_the_clubs() {
    let g = clubs();
    let labels = cdlp(&g, 100).unwrap();
    assert_eq!(labels.nvals(), 13);
    // identical runs are identical (determinism)
    assert!(labels.is_equal(&cdlp(&g, 100).unwrap()));
}

#[test]
fn independent_set_cover_and_matching_laws() {
    let g = clubs();
    let mis = maximal_independent_set(&g, 2024).unwrap();
    for (i, j, _) in g.adjacency().iter() {
        assert!(!(mis.get(i).is_some() && mis.get(j).is_some()));
    }
    let cover = vertex_cover(&g, 2024).unwrap();
    for (i, j, _) in g.adjacency().iter() {
        assert!(cover.get(i).is_some() || cover.get(j).is_some());
    }

    let e = incidence_matrix(&g).unwrap();
    let matching = maximal_matching(&e, MatchingKind::Random, 2024).unwrap();
    let et = e.transpose();
    let mut used = vec![false; 13];
    for (k, _) in matching.iter() {
        let (endpoints, _) = et.row(k);
        for &v in endpoints {
            assert!(!used[v], "node {} in two matched edges", v);
            used[v] = true;
        }
    }
}

#[test]
fn coarsening_compresses_the_namespace() {
    let g = clubs();
    let r = coarsen_by_matching(
        &g,
        &CoarsenOptions {
            kind: MatchingKind::Random,
            preserve_mapping: false,
            combine_weights: true,
            seed: 5,
        },
    )
    .unwrap();
    assert!(r.coarsened.nrows() < 13);
    // selector property: every original node maps to exactly one parent
    let parent = r.parent;
    assert_eq!(parent.nvals(), 13);
    let newlabels = r.newlabels.unwrap();
    let inv = r.inv_newlabels.unwrap();
    assert_eq!(newlabels.nvals(), r.coarsened.nrows());
    assert_eq!(inv.nvals(), r.coarsened.nrows());
}

#[test]
fn hits_and_betweenness_run_on_the_clubs() {
    let g = clubs();
    let r = hits(&g, &HitsOptions::default()).unwrap();
    let mass: f64 = r.hubs.values().iter().sum();
    assert!((mass - 1.0).abs() < 1e-9);

    let all: Vec<usize> = (0..13).collect();
    let bc = betweenness(&g, &all).unwrap();
    // the bridge endpoints carry more load than a cluster-interior node
    let bridge = bc.get(6).copied().unwrap() + bc.get(7).copied().unwrap();
    let interior = bc.get(3).copied().unwrap();
    assert!(bridge > interior);
}

#[test]
fn degree_sampler_reflects_the_distribution() {
    let g = clubs();
    let (mean, median) = sample_degree(&g, true, 13, 7).unwrap();
    assert!(mean > 0.0);
    assert!(median > 0.0);
    assert!(mean < 13.0);
}
