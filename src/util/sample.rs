//! Degree sampling for the presort heuristic.
//!
//! Draws `nsamples` node indices uniformly with replacement, gathers their
//! cached degrees, and reports the sample mean together with the median
//! element of the sorted sample.  Triangle counting compares the two to
//! decide whether a degree presort will pay off.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::scalar::Scalar;
use crate::util::random::Lcg;
use crate::util::sort::sort_keys;
use log::trace;

/// Sample the cached out-degrees (`rows = true`) or in-degrees
/// (`rows = false`) of `nsamples` nodes drawn with replacement.
///
/// Returns `(mean, median)`.  Fails with [`GraphError::NotCached`] when the
/// requested degree vector has not been computed, and with
/// [`GraphError::InvalidValue`] when `nsamples` is zero.
pub fn sample_degree<T: Scalar>(
    graph: &Graph<T>,
    rows: bool,
    nsamples: usize,
    seed: u64,
) -> Result<(f64, f64)> {
    if nsamples == 0 {
        return Err(GraphError::invalid_value(
            "sample_degree",
            "nsamples must be positive",
        ));
    }
    let degree = if rows {
        graph.out_degree().ok_or(GraphError::NotCached {
            property: "out_degree",
        })?
    } else {
        graph.in_degree().ok_or(GraphError::NotCached {
            property: "in_degree",
        })?
    };

    let n = graph.nrows();
    let mut rng = Lcg::new(seed);
    let mut samples: Vec<i64> = Vec::with_capacity(nsamples);
    let mut total: i64 = 0;
    for _ in 0..nsamples {
        let node = rng.below(n);
        // absent entry means an empty row/column
        let d = degree.get(node).copied().unwrap_or(0);
        total += d;
        samples.push(d);
    }

    sort_keys(&mut samples, 1);
    let mean = total as f64 / nsamples as f64;
    let median = samples[nsamples / 2] as f64;
    trace!(
        "sample_degree: {} samples, mean {:.3}, median {:.3}",
        nsamples,
        mean,
        median
    );
    Ok((mean, median))
}
