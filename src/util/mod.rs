//! Utility primitives: sorting, the platform-stable random generator, and
//! the degree sampler used by the triangle-count auto-sort heuristic.

pub mod random;
pub mod sample;
pub mod sort;

pub use random::Lcg;
pub use sample::sample_degree;
pub use sort::{sort_keys, sort_pairs};
