//! Semiring descriptors parameterising the multiply kernels.
//!
//! A [`Semiring`] bundles the reduction monoid (`add` + `identity`), the
//! combining operation `mul`, and an `is_any` flag letting kernels stop a
//! reduction after the first contribution.  `mul` receives the reduction
//! index `k` alongside the paired operands, which is how the index-valued
//! operations (`secondi`) observe which neighbour produced a contribution.
//!
//! Operand order convention: `mul(a, b, k)` receives the element of the
//! *first* factor of the product as written (`A` for `A·u`, `u` for `u·A`).

use crate::scalar::Scalar;
use num_traits::{Bounded, PrimInt};

/// A `(monoid, binary-op)` pair driving a sparse multiply.
///
/// `A` and `B` are the operand element types, `C` the reduction type.
#[derive(Clone, Copy)]
pub struct Semiring<A, B, C> {
    /// Identity of the reduction monoid.
    pub identity: C,
    /// Reduction: combines two partial results.
    pub add: fn(C, C) -> C,
    /// Combiner: pairs one element from each operand; `k` is the shared
    /// reduction index.
    pub mul: fn(&A, &B, usize) -> C,
    /// When true the reduction may keep any single contribution; kernels
    /// short-circuit after the first.
    pub is_any: bool,
}

/// Conventional arithmetic semiring `(+, ×)`.
pub fn plus_times<T>() -> Semiring<T, T, T>
where
    T: Scalar + core::ops::Add<Output = T> + core::ops::Mul<Output = T>,
{
    Semiring {
        identity: T::zero(),
        add: |x, y| x + y,
        mul: |a, b, _| *a * *b,
        is_any: false,
    }
}

/// Structural counting semiring `(+, pair)`: every paired entry contributes
/// exactly `1`, so operand values are never read.
pub fn plus_pair<A: Scalar, B: Scalar>() -> Semiring<A, B, i64> {
    Semiring {
        identity: 0,
        add: |x, y| x + y,
        mul: |_, _, _| 1,
        is_any: false,
    }
}

/// `(+, first)`: sums values taken from the first operand.
pub fn plus_first<A, B>() -> Semiring<A, B, A>
where
    A: Scalar + core::ops::Add<Output = A>,
    B: Scalar,
{
    Semiring {
        identity: A::zero(),
        add: |x, y| x + y,
        mul: |a, _, _| *a,
        is_any: false,
    }
}

/// `(+, second)`: sums values taken from the second operand.
pub fn plus_second<A, B>() -> Semiring<A, B, B>
where
    A: Scalar,
    B: Scalar + core::ops::Add<Output = B>,
{
    Semiring {
        identity: B::zero(),
        add: |x, y| x + y,
        mul: |_, b, _| *b,
        is_any: false,
    }
}

/// Tropical semiring `(min, +)` over an integer type, used by the
/// shortest-path relaxations.  Addition saturates so that the identity
/// (`T::MAX`) behaves as infinity.
pub fn min_plus<T>() -> Semiring<T, T, T>
where
    T: Scalar + PrimInt,
{
    Semiring {
        identity: T::max_value(),
        add: |x, y| x.min(y),
        mul: |a, b, _| a.saturating_add(*b),
        is_any: false,
    }
}

/// `(min, first)`.
pub fn min_first<A, B>() -> Semiring<A, B, A>
where
    A: Scalar + Ord + Bounded,
    B: Scalar,
{
    Semiring {
        identity: A::max_value(),
        add: |x, y| x.min(y),
        mul: |a, _, _| *a,
        is_any: false,
    }
}

/// `(min, second)`.
pub fn min_second<A, B>() -> Semiring<A, B, B>
where
    A: Scalar,
    B: Scalar + Ord + Bounded,
{
    Semiring {
        identity: B::max_value(),
        add: |x, y| x.min(y),
        mul: |_, b, _| *b,
        is_any: false,
    }
}

/// `(max, first)` under partial order (usable with floats).
pub fn max_first<A, B>() -> Semiring<A, B, A>
where
    A: Scalar + PartialOrd + Bounded,
    B: Scalar,
{
    Semiring {
        identity: A::min_value(),
        add: |x, y| if y > x { y } else { x },
        mul: |a, _, _| *a,
        is_any: false,
    }
}

/// `(max, second)` under partial order (usable with floats).
pub fn max_second<A, B>() -> Semiring<A, B, B>
where
    A: Scalar,
    B: Scalar + PartialOrd + Bounded,
{
    Semiring {
        identity: B::min_value(),
        add: |x, y| if y > x { y } else { x },
        mul: |_, b, _| *b,
        is_any: false,
    }
}

/// Structural reachability semiring `(any, one)`: output is `true` wherever
/// any pairing exists.
pub fn any_one<A: Scalar, B: Scalar>() -> Semiring<A, B, bool> {
    Semiring {
        identity: false,
        add: |x, _| x,
        mul: |_, _, _| true,
        is_any: true,
    }
}

/// `(any, secondi)`: output is the reduction index of any single pairing.
/// This is the parent-assignment semiring in BFS.
pub fn any_secondi<A: Scalar, B: Scalar>() -> Semiring<A, B, i64> {
    Semiring {
        identity: -1,
        add: |x, _| x,
        mul: |_, _, k| k as i64,
        is_any: true,
    }
}

/// `(min, secondi)`: smallest reduction index over all pairings, used to
/// pick a canonical endpoint per matched edge.
pub fn min_secondi<A: Scalar, B: Scalar>() -> Semiring<A, B, i64> {
    Semiring {
        identity: i64::MAX,
        add: |x, y| x.min(y),
        mul: |_, _, k| k as i64,
        is_any: false,
    }
}

/// Boolean semiring `(lor, land)`.
pub fn lor_land() -> Semiring<bool, bool, bool> {
    Semiring {
        identity: false,
        add: |x, y| x || y,
        mul: |a, b, _| *a && *b,
        is_any: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tropical_saturates() {
        let s = min_plus::<i64>();
        let inf = s.identity;
        assert_eq!((s.mul)(&inf, &5, 0), i64::MAX);
        assert_eq!((s.add)(i64::MAX, 7), 7);
    }

    #[test]
    fn secondi_reports_index() {
        let s = any_secondi::<bool, bool>();
        assert_eq!((s.mul)(&true, &true, 12), 12);
        assert!(s.is_any);
    }

    #[test]
    fn max_second_handles_floats() {
        let s = max_second::<f64, f64>();
        assert_eq!((s.add)(1.0, 2.0), 2.0);
        assert_eq!((s.add)(2.0, 1.0), 2.0);
        assert!(s.identity < -1e300);
    }
}
