//! Error types for graph mutation and regularization.

use thiserror::Error;

/// Errors from graph resource management.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// All mask slots are currently borrowed.
    #[error("mask pool exhausted: all {in_use} slots are borrowed")]
    MaskPoolExhausted {
        /// Number of slots currently handed out.
        in_use: usize,
    },

    /// A loop builder was given too few vertices.
    #[error("loop needs at least 3 vertices, got {count}")]
    LoopTooShort {
        /// Number of vertices provided.
        count: usize,
    },
}

/// Errors from the validated bridge mutator.
///
/// A rejected join leaves the graph untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    /// One endpoint does not lie inside the other's angular sector; inserting
    /// the bridge would create a self-crossing diagonal.
    #[error("bridge {from}->{to} violates sector containment")]
    SectorViolation {
        /// Node at the bridge origin.
        from: u32,
        /// Node at the bridge target.
        to: u32,
    },

    /// Both endpoints share the same sweep position.
    #[error("bridge {from}->{to} endpoints are coincident")]
    CoincidentEndpoints {
        /// Node at the bridge origin.
        from: u32,
        /// Node at the bridge target.
        to: u32,
    },
}

/// A single sweep pass was abandoned and should be retried from scratch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SweepAbort {
    /// A proposed bridge failed validation.
    #[error("bridge rejected at minimum node {minimum}: {source}")]
    RejectedBridge {
        /// The minimum being processed when the bridge was rejected.
        minimum: u32,
        /// The underlying validation failure.
        #[source]
        source: JoinError,
    },
}

/// Errors from the regularization drivers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegularizeError {
    /// `max_attempts` must allow at least one sweep.
    #[error("max_attempts must be at least 1")]
    InvalidAttempts,

    /// A graph resource error surfaced during the sweep.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
