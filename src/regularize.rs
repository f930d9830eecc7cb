//! Multi-attempt bidirectional regularization drivers.
//!
//! A single sweep pass only bridges downward minima. Local maxima needing
//! bridges are handled by rotating the whole graph a half turn (a pure
//! relabeling under which every reflex maximum reads as a reflex minimum)
//! and running the identical pass again. The rotation is always unwound,
//! whatever the second pass does.
//!
//! A pass abandoned by a rejected bridge is retried from scratch, up to
//! `max_attempts` per direction. Exhausting the attempts is advisory, not
//! an error: completed bridges are all valid (the mutator validates before
//! touching the graph), so the caller gets a best-effort graph and a report
//! with `completed` unset.

use tracing::warn;

use crate::error::RegularizeError;
use crate::graph::{Graph, NodeIdx};
use crate::sweep::Sweep;

/// Default bound on sweep attempts per direction.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// What a regularization run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegularizeReport {
    /// Accepted bridges; the graph gained twice this many half-edges.
    pub bridges_added: usize,
    /// Sweep attempts actually run, across directions (and faces, for the
    /// per-face driver).
    pub attempts_used: usize,
    /// False if any direction exhausted its attempts; the graph is then
    /// best-effort and some faces may not be monotone.
    pub completed: bool,
}

#[derive(Clone, Copy)]
enum SweepScope {
    /// Every loop that could bound an interior region, swept together.
    Interior,
    /// One face loop.
    Face(NodeIdx),
}

/// Regularize every interior face of the graph in one global sweep per
/// direction, inserting bridges until each face has a single local minimum
/// and a single local maximum in sweep order.
pub fn regularize_graph(
    graph: &mut Graph,
    max_attempts: usize,
) -> Result<RegularizeReport, RegularizeError> {
    if max_attempts == 0 {
        return Err(RegularizeError::InvalidAttempts);
    }
    let mut report = RegularizeReport {
        completed: true,
        ..Default::default()
    };

    run_direction(graph, max_attempts, SweepScope::Interior, &mut report)?;

    graph.rotate_half_turn();
    let second = run_direction(graph, max_attempts, SweepScope::Interior, &mut report);
    graph.rotate_half_turn();
    second?;

    Ok(report)
}

/// Like [`regularize_graph`], but each interior face loop is swept
/// independently. Holes are assumed to have been bridged into their
/// enclosing loops beforehand.
pub fn regularize_interior_faces(
    graph: &mut Graph,
    max_attempts: usize,
) -> Result<RegularizeReport, RegularizeError> {
    if max_attempts == 0 {
        return Err(RegularizeError::InvalidAttempts);
    }
    let mut report = RegularizeReport {
        completed: true,
        ..Default::default()
    };

    let first = run_per_face(graph, max_attempts, &mut report);
    first?;

    graph.rotate_half_turn();
    let second = run_per_face(graph, max_attempts, &mut report);
    graph.rotate_half_turn();
    second?;

    Ok(report)
}

fn run_per_face(
    graph: &mut Graph,
    max_attempts: usize,
    report: &mut RegularizeReport,
) -> Result<(), RegularizeError> {
    for rep in graph.collect_interior_faces() {
        run_direction(graph, max_attempts, SweepScope::Face(rep), report)?;
    }
    Ok(())
}

/// Bounded-retry loop for one sweep direction. Scope loops are re-collected
/// on every attempt: bridges accepted before an abort have already split
/// their faces.
fn run_direction(
    graph: &mut Graph,
    max_attempts: usize,
    scope: SweepScope,
    report: &mut RegularizeReport,
) -> Result<(), RegularizeError> {
    for attempt in 1..=max_attempts {
        report.attempts_used += 1;
        let loops = scope_loops(graph, scope);

        let mut sweep = Sweep::open(graph)?;
        let outcome = sweep.run(&loops);
        drop(sweep);

        match outcome {
            Ok(stats) => {
                report.bridges_added += stats.bridges;
                return Ok(());
            }
            Err(abort) => {
                warn!(attempt, max_attempts, error = %abort, "sweep attempt abandoned");
            }
        }
    }
    report.completed = false;
    Ok(())
}

fn scope_loops(graph: &Graph, scope: SweepScope) -> Vec<NodeIdx> {
    match scope {
        // Zero-area loops are kept in scope: a degenerate single-edge loop
        // still has its minimum recorded (and skipped) by the sweep.
        SweepScope::Interior => graph
            .face_loops()
            .into_iter()
            .filter(|&rep| graph.loop_area(rep) >= 0.0)
            .collect(),
        SweepScope::Face(rep) => vec![rep],
    }
}
