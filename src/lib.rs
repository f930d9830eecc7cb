//! Sweep-line regularization of planar half-edge graphs.
//!
//! A face of a planar straight-line graph is *monotone* when its boundary
//! loop has exactly one local minimum and one local maximum in sweep order.
//! This crate inserts bridging edge pairs at reflex extrema until every
//! interior face is monotone, which is the precondition a monotone-polygon
//! triangulator needs from its input.
//!
//! ```
//! use monotone_regularize::{regularize_graph, Graph, DEFAULT_MAX_ATTEMPTS};
//!
//! let mut graph = Graph::new();
//! // A pentagon with a reflex vertex at (2, 1).
//! graph
//!     .add_loop(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (2.0, 1.0), (0.0, 4.0)])
//!     .unwrap();
//!
//! let report = regularize_graph(&mut graph, DEFAULT_MAX_ATTEMPTS).unwrap();
//! assert_eq!(report.bridges_added, 1);
//! assert!(report.completed);
//! ```

pub mod error;
pub mod geom;
pub mod graph;
pub mod regularize;
mod sweep;

pub use error::{GraphError, JoinError, RegularizeError};
pub use graph::{mate, Graph, MaskBit, NodeIdx, INVALID};
pub use regularize::{
    regularize_graph, regularize_interior_faces, RegularizeReport, DEFAULT_MAX_ATTEMPTS,
};
