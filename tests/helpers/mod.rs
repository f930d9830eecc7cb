// Shared test utilities for monotone-regularize tests.

#![allow(dead_code)]

use monotone_regularize::geom::is_below;
use monotone_regularize::{Graph, NodeIdx};

/// Count the local minima and maxima of the face loop through `rep`.
pub fn extrema_of_loop(g: &Graph, rep: NodeIdx) -> (usize, usize) {
    let nodes = g.face_loop_nodes(rep);
    let n = nodes.len();
    let ascending: Vec<bool> = nodes
        .iter()
        .map(|&e| is_below(g.pos(e), g.pos(g.face_next(e))))
        .collect();

    let mut minima = 0;
    let mut maxima = 0;
    for i in 0..n {
        let j = (i + 1) % n;
        if !ascending[i] && ascending[j] {
            minima += 1;
        }
        if ascending[i] && !ascending[j] {
            maxima += 1;
        }
    }
    (minima, maxima)
}

/// Every interior face must have exactly one local minimum and one local
/// maximum in sweep order.
pub fn assert_interior_faces_monotone(g: &Graph) {
    for rep in g.collect_interior_faces() {
        let (minima, maxima) = extrema_of_loop(g, rep);
        assert_eq!(
            minima, 1,
            "face through node {} has {} local minima (loop: {:?})",
            rep,
            minima,
            loop_positions(g, rep)
        );
        assert_eq!(
            maxima, 1,
            "face through node {} has {} local maxima (loop: {:?})",
            rep,
            maxima,
            loop_positions(g, rep)
        );
    }
}

/// Base positions around a face loop, for assertion messages.
pub fn loop_positions(g: &Graph, rep: NodeIdx) -> Vec<(f64, f64)> {
    g.face_loop_nodes(rep).iter().map(|&e| g.pos(e)).collect()
}

/// The bridge endpoints inserted after `before` nodes existed, as position
/// pairs (descending half first).
pub fn bridges_since(g: &Graph, before: usize) -> Vec<((f64, f64), (f64, f64))> {
    (before..g.node_count())
        .step_by(2)
        .map(|p| {
            let p = p as NodeIdx;
            (g.pos(p), g.pos(p + 1))
        })
        .collect()
}
