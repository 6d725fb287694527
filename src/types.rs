//! Common types shared by the engine, the graph object, and the algorithms.

use crate::error::{GraphError, Result};
use core::fmt;
use std::str::FromStr;

/// Element type tag for a sparse matrix or vector.
///
/// The engine is generic over [`crate::scalar::Scalar`]; this tag is the
/// runtime name of that type, used by Matrix Market headers and by
/// type-introspection helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarType {
    /// `bool`
    Bool,
    /// `i8`
    Int8,
    /// `i16`
    Int16,
    /// `i32`
    Int32,
    /// `i64`
    Int64,
    /// `u8`
    UInt8,
    /// `u16`
    UInt16,
    /// `u32`
    UInt32,
    /// `u64`
    UInt64,
    /// `f32`
    Fp32,
    /// `f64`
    Fp64,
    /// `num_complex::Complex<f64>`
    Complex,
    /// A type outside the built-in set.  Printable, never parseable.
    UserDefined,
}

impl ScalarType {
    /// Canonical lower-case name, as used in `%%GraphBLAS` header lines.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int8 => "int8",
            ScalarType::Int16 => "int16",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::UInt8 => "uint8",
            ScalarType::UInt16 => "uint16",
            ScalarType::UInt32 => "uint32",
            ScalarType::UInt64 => "uint64",
            ScalarType::Fp32 => "fp32",
            ScalarType::Fp64 => "fp64",
            ScalarType::Complex => "complex",
            ScalarType::UserDefined => "user-defined",
        }
    }

    /// Inverse of [`ScalarType::name`].  Unknown names (including
    /// `"user-defined"`, which is a one-way mapping) fail with
    /// [`GraphError::InvalidValue`].
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "bool" => Ok(ScalarType::Bool),
            "int8" => Ok(ScalarType::Int8),
            "int16" => Ok(ScalarType::Int16),
            "int32" => Ok(ScalarType::Int32),
            "int64" => Ok(ScalarType::Int64),
            "uint8" => Ok(ScalarType::UInt8),
            "uint16" => Ok(ScalarType::UInt16),
            "uint32" => Ok(ScalarType::UInt32),
            "uint64" => Ok(ScalarType::UInt64),
            "fp32" => Ok(ScalarType::Fp32),
            "fp64" => Ok(ScalarType::Fp64),
            "complex" => Ok(ScalarType::Complex),
            other => Err(GraphError::invalid_value(
                "ScalarType::from_name",
                format!("unknown type name {:?}", other),
            )),
        }
    }

    /// True for the signed/unsigned integer types (not `bool`).
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarType::Int8
                | ScalarType::Int16
                | ScalarType::Int32
                | ScalarType::Int64
                | ScalarType::UInt8
                | ScalarType::UInt16
                | ScalarType::UInt32
                | ScalarType::UInt64
        )
    }

    /// True for `fp32` / `fp64`.
    pub fn is_float(&self) -> bool {
        matches!(self, ScalarType::Fp32 | ScalarType::Fp64)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        ScalarType::from_name(s)
    }
}

/// Whether a graph's adjacency matrix is interpreted as directed edges or
/// as an undirected (symmetric) edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GraphKind {
    /// Edge `(i, j)` implies edge `(j, i)`; the adjacency must have
    /// symmetric structure.
    Undirected,
    /// Edges are one-directional.
    Directed,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Undirected => f.write_str("undirected"),
            GraphKind::Directed => f.write_str("directed"),
        }
    }
}

/// Tri-state answer for a structural question that may not have been
/// computed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symmetry {
    /// The structure is known to be symmetric.
    True,
    /// The structure is known not to be symmetric.
    False,
    /// Not determined yet.
    #[default]
    Unknown,
}

/// Empirical tuning constants for the frontier-direction and presort
/// heuristics.
///
/// These are thresholds, not semantics: changing them changes performance,
/// never results.
pub mod tuning {
    /// Push (saxpy) is preferred while the frontier holds fewer than this
    /// fraction of all nodes.
    pub const PUSH_FRACTION: f64 = 0.04;

    /// Pull (dot) is preferred once the frontier exceeds this fraction of
    /// all nodes.
    pub const PULL_FRACTION: f64 = 0.10;

    /// Number of row degrees sampled by the triangle-count auto-sort rule.
    pub const SORT_NSAMPLES: usize = 1000;

    /// Auto-sort triggers only when the sampled mean degree exceeds the
    /// sampled median by this factor.
    pub const SORT_MEAN_MEDIAN_RATIO: f64 = 4.0;

    /// Auto-sort is considered only when the average row has at least this
    /// many entries.
    pub const SORT_MIN_MEAN_DEGREE: f64 = 10.0;

    /// Seed-redraw budget for conflict resolution in maximal matching.
    pub const MATCHING_MAX_FAILURES: usize = 50;
}

/// Overflow-checked product of an item count and an item size, used before
/// bulk reservations.  Mirrors the engine convention that a failed size
/// computation must leave outputs untouched.
pub fn checked_product(nitems: usize, item_size: usize) -> Result<usize> {
    nitems
        .checked_mul(item_size)
        .ok_or(GraphError::CapacityOverflow { nitems, item_size })
}
