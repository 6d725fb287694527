//! Error types for graph construction, the sparse engine, and the algorithms.
//!
//! Every fallible operation in the crate returns [`Result`].  Variants carry
//! enough structured context to print a single readable diagnostic line and
//! to let callers branch on the failure class (bad input, missing cached
//! property, convergence trouble, I/O).

use crate::types::ScalarType;
use thiserror::Error;

/// Result type alias for all graph and engine operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Comprehensive error type for graph and sparse-engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// An argument was outside its legal domain.
    #[error("invalid value in {operation}: {message}")]
    InvalidValue {
        /// Operation that rejected the value
        operation: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// A node, edge, or entry index was out of bounds.
    #[error("index {index} out of bounds in {context}: limit is {bound}")]
    InvalidIndex {
        /// The offending index
        index: usize,
        /// Exclusive upper bound that was violated
        bound: usize,
        /// Context where the access happened
        context: &'static str,
    },

    /// Two operands did not agree in dimension.
    #[error("dimension mismatch in {operation}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension found
        actual: usize,
        /// Operation where the mismatch occurred
        operation: &'static str,
    },

    /// A size computation overflowed before allocation.
    #[error("capacity overflow: {nitems} items of {item_size} bytes each")]
    CapacityOverflow {
        /// Number of items requested
        nitems: usize,
        /// Size of each item in bytes
        item_size: usize,
    },

    /// The graph violates one of its structural invariants.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// A required cached property has not been computed.
    #[error("cached property not present: {property} (call the compute_* method first)")]
    NotCached {
        /// Name of the missing property
        property: &'static str,
    },

    /// The graph has self edges but the algorithm forbids them.
    #[error("graph has {count} self edge(s); this operation requires none")]
    SelfEdgesNotAllowed {
        /// Number of diagonal entries found
        count: u64,
    },

    /// The requested operation is not available.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// No entry is present at the requested position.
    #[error("no value present at ({row}, {col})")]
    NoValue {
        /// Row of the missing entry
        row: usize,
        /// Column of the missing entry
        col: usize,
    },

    /// An iterative algorithm exhausted its iteration budget.
    #[error("{algorithm} failed to converge after {iterations} iterations")]
    ConvergenceFailure {
        /// Algorithm that gave up
        algorithm: &'static str,
        /// Iterations performed
        iterations: usize,
    },

    /// A randomized algorithm made no progress across a full round.
    #[error("{algorithm} stalled with {remaining} candidate(s) left")]
    Stall {
        /// Algorithm that stalled
        algorithm: &'static str,
        /// Candidates remaining when progress stopped
        remaining: usize,
    },

    /// The element type of a matrix does not fit the operation.
    #[error("type mismatch in {operation}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Type the operation required
        expected: ScalarType,
        /// Type that was supplied
        actual: ScalarType,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Malformed Matrix Market (or other textual) input.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the input stream
        line: usize,
        /// What was malformed
        message: String,
    },

    /// Underlying I/O failure while reading or writing a matrix.
    #[error("i/o error in {context}: {message}")]
    Io {
        /// Error description from the OS
        message: String,
        /// Context where the failure happened
        context: &'static str,
    },

    /// The process context was initialized twice.
    #[error("library already initialized")]
    AlreadyInitialized,
}

impl GraphError {
    /// Shorthand for [`GraphError::InvalidValue`].
    pub fn invalid_value(operation: &'static str, message: impl Into<String>) -> Self {
        GraphError::InvalidValue {
            operation,
            message: message.into(),
        }
    }

    /// Shorthand for [`GraphError::Parse`].
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        GraphError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Check whether retrying (with a different seed or a larger iteration
    /// budget) can plausibly resolve this error.
    ///
    /// Input and state errors are permanent; convergence-class errors are
    /// not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GraphError::ConvergenceFailure { .. } | GraphError::Stall { .. }
        )
    }
}

impl From<std::io::Error> for GraphError {
    fn from(err: std::io::Error) -> Self {
        GraphError::Io {
            message: err.to_string(),
            context: "stream operation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = GraphError::InvalidIndex {
            index: 42,
            bound: 10,
            context: "bfs source",
        };
        let text = err.to_string();
        assert!(text.contains("42"));
        assert!(text.contains("bfs source"));
    }

    #[test]
    fn recoverability_classes() {
        let stall = GraphError::Stall {
            algorithm: "maximal_independent_set",
            remaining: 3,
        };
        assert!(stall.is_recoverable());

        let bad = GraphError::invalid_value("ktruss", "k must be >= 3");
        assert!(!bad.is_recoverable());
    }
}
