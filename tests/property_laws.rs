//! Property-based tests for the sort primitives, the stable random
//! generator, and the Matrix Market value round trip.

use algraph::{read_matrix, sort_keys, sort_pairs, write_matrix, Lcg, SparseMatrix};
use proptest::prelude::*;

proptest! {
    #[test]
    fn sort_keys_is_monotone_and_preserves_the_multiset(mut keys in prop::collection::vec(any::<i64>(), 0..200)) {
        let mut expected = keys.clone();
        expected.sort_unstable();
        sort_keys(&mut keys, 1);
        prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn sort_pairs_is_lexicographic(pairs in prop::collection::vec((any::<i64>(), any::<i64>()), 0..200)) {
        let mut k0: Vec<i64> = pairs.iter().map(|p| p.0).collect();
        let mut k1: Vec<i64> = pairs.iter().map(|p| p.1).collect();
        sort_pairs(&mut k0, &mut k1, 1).unwrap();
        let sorted: Vec<(i64, i64)> = k0.iter().copied().zip(k1.iter().copied()).collect();
        prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
        let mut expected = pairs;
        expected.sort_unstable();
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn lcg_streams_are_reproducible(seed in any::<u64>()) {
        let mut a = Lcg::new(seed);
        let mut b = Lcg::new(seed);
        for _ in 0..16 {
            prop_assert_eq!(a.rand64(), b.rand64());
        }
        let v = Lcg::new(seed).unit_f64();
        prop_assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn finite_f64_matrices_round_trip(values in prop::collection::vec(
        (0usize..6, 0usize..6, -1e300f64..1e300), 0..24)
    ) {
        let m = SparseMatrix::from_triplets(6, 6, values, |_, b| b).unwrap();
        let mut text = Vec::new();
        write_matrix(&m, &mut text).unwrap();
        let back: SparseMatrix<f64> = read_matrix(text.as_slice()).unwrap();
        prop_assert!(m.is_equal(&back));
    }

    #[test]
    fn integer_matrices_round_trip(values in prop::collection::vec(
        (0usize..5, 0usize..5, any::<i64>()), 0..20)
    ) {
        let m = SparseMatrix::from_triplets(5, 5, values, |_, b| b).unwrap();
        let mut text = Vec::new();
        write_matrix(&m, &mut text).unwrap();
        let back: SparseMatrix<i64> = read_matrix(text.as_slice()).unwrap();
        prop_assert!(m.is_equal(&back));
    }
}
