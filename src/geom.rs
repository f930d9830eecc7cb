//! Pure geometric predicates over sweep coordinates.
//!
//! All functions operate on `(u, v)` coordinate pairs. The sweep order is
//! lexicographic with `v` as the primary key and `u` as the secondary key;
//! comparisons are exact, with no epsilon. Tolerance policy belongs to the
//! code that produces the coordinates, not to these predicates.

use core::cmp::Ordering;

pub type Real = f64;

/// A sweep coordinate pair `(u, v)`.
pub type Pos = (Real, Real);

/// Returns true if `a` strictly precedes `b` in sweep order (v first, then u).
#[inline]
pub fn is_below(a: Pos, b: Pos) -> bool {
    a.1 < b.1 || (a.1 == b.1 && a.0 < b.0)
}

/// Twice the signed area of the triangle `(a, b, c)`: the cross product of
/// the edge vectors meeting at `b`. Positive for a left turn, negative for a
/// right turn, zero for collinear points.
#[inline]
pub fn signed_area(a: Pos, b: Pos, c: Pos) -> Real {
    (b.0 - a.0) * (c.1 - b.1) - (b.1 - a.1) * (c.0 - b.0)
}

/// The `u` coordinate where the sweep line at height `v_scan` crosses the
/// edge `base -> top`. `base` must be at or below `top` in sweep order.
/// An exactly horizontal edge has no unique crossing; `fallback_u` is
/// returned in that case.
#[inline]
pub fn crossing_u(base: Pos, top: Pos, v_scan: Real, fallback_u: Real) -> Real {
    let dv = top.1 - base.1;
    if dv == 0.0 {
        return fallback_u;
    }
    base.0 + (v_scan - base.1) / dv * (top.0 - base.0)
}

/// Orders two edges left-to-right at the midpoint of their shared vertical
/// span. Each edge is given as `(base, top)` with `base` at or below `top`.
///
/// If the spans do not overlap the edges are ordered by their base vertices.
/// When the midpoint rounds onto a span endpoint, the crossing is evaluated
/// at the endpoints themselves so one edge contributes an exact vertex
/// coordinate instead of an interpolated one.
pub fn compare_edges_at_overlap(base_a: Pos, top_a: Pos, base_b: Pos, top_b: Pos) -> Ordering {
    let lo = base_a.1.max(base_b.1);
    let hi = top_a.1.min(top_b.1);

    if lo > hi {
        // No shared span: fall back to the base vertices.
        return if is_below(base_a, base_b) {
            Ordering::Less
        } else if is_below(base_b, base_a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        };
    }

    let at = |v: Real| {
        let ua = crossing_u(base_a, top_a, v, base_a.0);
        let ub = crossing_u(base_b, top_b, v, base_b.0);
        ua.partial_cmp(&ub).unwrap_or(Ordering::Equal)
    };

    let mid = 0.5 * (lo + hi);
    if mid == lo || mid == hi {
        // Degenerately thin span: anchor at the endpoints.
        let ord = at(lo);
        if ord != Ordering::Equal {
            return ord;
        }
        return at(hi);
    }

    let ord = at(mid);
    if ord != Ordering::Equal {
        return ord;
    }
    if is_below(base_a, base_b) {
        Ordering::Less
    } else if is_below(base_b, base_a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Returns true if `q` lies strictly inside the angular sector at `base`
/// bounded by the incoming edge from `prev` and the outgoing edge to `next`.
///
/// For a convex corner the sector is the wedge between the two edges; for a
/// reflex corner it is everything outside the opposite wedge. A diagonal
/// `base -> q` that passes this test at both of its endpoints splits the
/// face without crossing either boundary locally.
pub fn in_sector(prev: Pos, base: Pos, next: Pos, q: Pos) -> bool {
    if signed_area(base, next, prev) >= 0.0 {
        // Convex corner.
        signed_area(base, q, prev) > 0.0 && signed_area(q, base, next) > 0.0
    } else {
        // Reflex corner.
        !(signed_area(base, q, next) >= 0.0 && signed_area(q, base, prev) >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn is_below_primary_key_is_v() {
        assert!(is_below((5.0, 0.0), (0.0, 1.0)));
        assert!(!is_below((0.0, 1.0), (5.0, 0.0)));
    }

    #[test]
    fn is_below_ties_break_on_u() {
        assert!(is_below((0.0, 2.0), (1.0, 2.0)));
        assert!(!is_below((1.0, 2.0), (0.0, 2.0)));
        // Equal points are not below one another.
        assert!(!is_below((1.0, 2.0), (1.0, 2.0)));
    }

    #[test]
    fn signed_area_signs() {
        // Left turn.
        assert!(signed_area((0.0, 0.0), (1.0, 0.0), (1.0, 1.0)) > 0.0);
        // Right turn.
        assert!(signed_area((0.0, 0.0), (1.0, 0.0), (1.0, -1.0)) < 0.0);
        // Collinear.
        assert_eq!(signed_area((0.0, 0.0), (1.0, 0.0), (2.0, 0.0)), 0.0);
    }

    #[test]
    fn crossing_u_interpolates() {
        let u = crossing_u((0.0, 0.0), (2.0, 4.0), 1.0, -1.0);
        assert_relative_eq!(u, 0.5);
    }

    #[test]
    fn crossing_u_horizontal_falls_back() {
        let u = crossing_u((0.0, 3.0), (2.0, 3.0), 3.0, 7.0);
        assert_eq!(u, 7.0);
    }

    #[test]
    fn compare_edges_overlapping_span() {
        // Vertical edge at u=0 vs vertical edge at u=2, both spanning v 0..4.
        let ord = compare_edges_at_overlap((0.0, 0.0), (0.0, 4.0), (2.0, 0.0), (2.0, 4.0));
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn compare_edges_slanted() {
        // At the midpoint of the shared span (v=1) edge a is still left of
        // the vertical edge b even though it overtakes it further up.
        let a = ((0.0, 0.0), (3.0, 2.0));
        let b = ((2.0, 0.0), (2.0, 2.0));
        assert_eq!(compare_edges_at_overlap(a.0, a.1, b.0, b.1), Ordering::Less);
    }

    #[test]
    fn compare_edges_disjoint_spans_use_bases() {
        let ord = compare_edges_at_overlap((0.0, 0.0), (0.0, 1.0), (5.0, 2.0), (5.0, 3.0));
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn in_sector_convex() {
        // Square corner at the origin: prev above, next to the right.
        let prev = (0.0, 4.0);
        let base = (0.0, 0.0);
        let next = (4.0, 0.0);
        assert!(in_sector(prev, base, next, (1.0, 1.0)));
        // A point collinear with the outgoing edge is not strictly inside.
        assert!(!in_sector(prev, base, next, (2.0, 0.0)));
        assert!(!in_sector(prev, base, next, (-1.0, -1.0)));
    }

    #[test]
    fn in_sector_reflex() {
        // Reflex corner: incoming from the upper right, outgoing to the
        // upper left; the sector opens downward.
        let prev = (2.0, 2.0);
        let base = (0.0, 0.0);
        let next = (-2.0, 2.0);
        assert!(in_sector(prev, base, next, (0.0, -1.0)));
        assert!(!in_sector(prev, base, next, (0.0, 1.0)));
    }
}
