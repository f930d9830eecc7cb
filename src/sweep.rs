//! The regularization sweep: direction classification, extremum detection,
//! event sequencing, and the active-chain state machine.
//!
//! One `Sweep` value owns the transient state of a single pass: two mask
//! slots and four scratch arrays borrowed from the graph, released on every
//! exit path when the value drops. A pass walks the sorted minima and
//! bridges every downward (reflex) minimum to the best target on the active
//! frontier; a rejected bridge aborts the whole pass so the driver can
//! retry from scratch.
//!
//! Frontier representation:
//! - `right_chains` holds ascending edges: boundaries that can bracket a
//!   future minimum from the right, advanced forward along `face_next`.
//! - `left_chains` holds nodes whose face-predecessor is descending:
//!   boundaries advanced backward along `face_prev` that can bracket a
//!   minimum from the left.
//! - `peaks` holds the descending edge at each local maximum both of whose
//!   chains have topped out there; a peak is retired when a bridge lands
//!   on it.

use core::cmp::Ordering;
use core::mem;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{GraphError, SweepAbort};
use crate::geom::{compare_edges_at_overlap, crossing_u, is_below, signed_area, Pos, Real};
use crate::graph::{Graph, MaskBit, NodeIdx};

/// Outcome of one completed sweep pass.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SweepStats {
    pub minima: usize,
    pub bridges: usize,
}

/// A chain entry that currently brackets the sweep line, with its bracket
/// edge endpoints snapshotted before any mutation in the same event.
#[derive(Clone, Copy, Debug)]
struct Bracket {
    /// The chain entry node; its base vertex is the bridge target.
    entry: NodeIdx,
    /// Lower endpoint of the bracketing edge.
    base: Pos,
    /// Upper endpoint of the bracketing edge.
    top: Pos,
}

pub(crate) struct Sweep<'g> {
    g: &'g mut Graph,
    ascending: MaskBit,
    downward: MaskBit,
    minima: Vec<NodeIdx>,
    right_chains: Vec<NodeIdx>,
    left_chains: Vec<NodeIdx>,
    peaks: Vec<NodeIdx>,
    bridges: usize,
}

impl<'g> Sweep<'g> {
    /// Borrow masks and scratch arrays for one pass.
    pub(crate) fn open(g: &'g mut Graph) -> Result<Self, GraphError> {
        let ascending = g.alloc_mask()?;
        let downward = match g.alloc_mask() {
            Ok(bit) => bit,
            Err(err) => {
                g.free_mask(ascending);
                return Err(err);
            }
        };
        let minima = g.alloc_scratch();
        let right_chains = g.alloc_scratch();
        let left_chains = g.alloc_scratch();
        let peaks = g.alloc_scratch();
        Ok(Sweep {
            g,
            ascending,
            downward,
            minima,
            right_chains,
            left_chains,
            peaks,
            bridges: 0,
        })
    }

    #[inline]
    fn asc(&self, n: NodeIdx) -> bool {
        self.g.test_mask(n, self.ascending)
    }

    #[inline]
    fn down(&self, n: NodeIdx) -> bool {
        self.g.test_mask(n, self.downward)
    }

    /// Run one full pass over the given face loops.
    pub(crate) fn run(&mut self, loops: &[NodeIdx]) -> Result<SweepStats, SweepAbort> {
        self.mark_ascending_edges(loops);
        self.collect_minima(loops);
        let minima_count = self.minima.len();

        let queue = mem::take(&mut self.minima);
        for i in 0..queue.len() {
            if let Err(abort) = self.process_minimum(queue[i]) {
                self.minima = queue;
                return Err(abort);
            }
        }
        self.minima = queue;

        debug!(
            minima = minima_count,
            bridges = self.bridges,
            "sweep pass complete"
        );
        Ok(SweepStats {
            minima: minima_count,
            bridges: self.bridges,
        })
    }

    // ─────────────────── Classification and detection ─────────────────────

    /// Tag every directed edge of the given loops: the mask is set on `n`
    /// iff `n` precedes its face successor in sweep order.
    fn mark_ascending_edges(&mut self, loops: &[NodeIdx]) {
        for &rep in loops {
            let mut n = rep;
            loop {
                let next = self.g.face_next(n);
                if is_below(self.g.pos(n), self.g.pos(next)) {
                    self.g.set_mask(n, self.ascending);
                } else {
                    self.g.clear_mask(n, self.ascending);
                }
                n = next;
                if n == rep {
                    break;
                }
            }
        }
    }

    /// Find every local extremum, enqueue the minima, and flag the downward
    /// ones. Afterwards the queue is sorted into processing order.
    fn collect_minima(&mut self, loops: &[NodeIdx]) {
        for &rep in loops {
            let mut curr = rep;
            loop {
                let next = self.g.face_next(curr);
                let curr_asc = self.asc(curr);
                let next_asc = self.asc(next);

                if !curr_asc && next_asc {
                    // Local minimum at next's base vertex.
                    self.minima.push(next);
                    let lone = self.g.vertex_next(next) == next;
                    if lone || self.corner_area(curr, next) <= 0.0 {
                        self.g.set_mask(next, self.downward);
                    }
                } else if curr_asc && !next_asc {
                    // Local maximum. A reflex maximum can never serve as a
                    // bridge target, so flag it; a convex one becomes a peak
                    // when its chains top out.
                    let lone = self.g.vertex_next(next) == next;
                    if !lone && self.corner_area(curr, next) <= 0.0 {
                        self.g.set_mask(next, self.downward);
                    }
                }

                curr = next;
                if curr == rep {
                    break;
                }
            }
        }
        self.sort_minima();
    }

    /// Orientation of the corner at `next`'s base vertex.
    fn corner_area(&self, curr: NodeIdx, next: NodeIdx) -> Real {
        signed_area(
            self.g.pos(curr),
            self.g.pos(next),
            self.g.pos(self.g.face_next(next)),
        )
    }

    /// Sweep order, with the tie-break: at an exactly coincident position a
    /// downward minimum is processed strictly before an upward one, so its
    /// bridge lands before the upward minimum claims the coordinate.
    fn sort_minima(&mut self) {
        let mut queue = mem::take(&mut self.minima);
        queue.sort_by(|&a, &b| {
            let pa = self.g.pos(a);
            let pb = self.g.pos(b);
            if is_below(pa, pb) {
                Ordering::Less
            } else if is_below(pb, pa) {
                Ordering::Greater
            } else {
                match (self.down(a), self.down(b)) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => Ordering::Equal,
                }
            }
        });
        self.minima = queue;
    }

    // ─────────────────── Event processing ─────────────────────────────────

    fn process_minimum(&mut self, m: NodeIdx) -> Result<(), SweepAbort> {
        if !self.down(m) {
            // Upward minimum: opens a new boundary on both sides.
            self.right_chains.push(m);
            self.left_chains.push(m);
            return Ok(());
        }

        if self.g.vertex_next(m) == m {
            // Degenerate single-edge loop: recorded but never bridged;
            // nothing can legally be inserted at a lone vertex.
            self.right_chains.push(m);
            self.left_chains.push(m);
            return Ok(());
        }

        let m_pos = self.g.pos(m);
        trace!(node = m, u = m_pos.0, v = m_pos.1, "downward minimum");

        let right = self.advance_right_chains(m_pos);
        let left = self.advance_left_chains(m_pos);

        if let Some(idx) = self.pick_peak(m_pos, left.as_ref(), right.as_ref()) {
            // Bridging to the peak closes the channel; the two edges meeting
            // at the peak become the fresh chain heads on either side of the
            // bridge. The bracket candidates stay live.
            let pk = self.peaks.swap_remove(idx);
            let desc = self.join_checked(m, pk)?;
            self.right_chains.push(desc ^ 1);
            self.left_chains.push(pk);
            return Ok(());
        }

        match (left, right) {
            (Some(l), Some(r)) => {
                // Bridge to the higher chain top; the lower bracket stays
                // live and is reconsidered at a later event.
                if is_below(l.base, r.base) {
                    self.bridge_to_right(m, r)?;
                    self.left_chains.push(r.entry);
                } else {
                    let desc = self.bridge_to_left(m, l)?;
                    self.right_chains.push(desc ^ 1);
                }
            }
            (None, Some(r)) => {
                self.bridge_to_right(m, r)?;
            }
            (Some(l), None) => {
                self.bridge_to_left(m, l)?;
            }
            (None, None) => {
                // Isolated minimum: seed fresh chains, no bridge. This is
                // also where a single-edge degenerate loop lands.
                self.right_chains.push(m);
                self.left_chains.push(m);
            }
        }
        Ok(())
    }

    /// Bridge `m` to the right bracket's chain top. The consumed entry is
    /// replaced by `m`'s own node as the continuing right-chain head.
    fn bridge_to_right(&mut self, m: NodeIdx, r: Bracket) -> Result<(), SweepAbort> {
        self.join_checked(m, r.entry)?;
        remove_entry(&mut self.right_chains, r.entry);
        self.right_chains.push(m);
        Ok(())
    }

    /// Bridge `m` to the left bracket's chain top. The consumed entry is
    /// replaced by the bridge's descending half, whose face-predecessor is
    /// the descending edge into `m`.
    fn bridge_to_left(&mut self, m: NodeIdx, l: Bracket) -> Result<NodeIdx, SweepAbort> {
        let desc = self.join_checked(m, l.entry)?;
        remove_entry(&mut self.left_chains, l.entry);
        self.left_chains.push(desc);
        Ok(desc)
    }

    /// Validated bridge insertion. The new ascending half is tagged so later
    /// chain walks traverse it like any boundary edge.
    fn join_checked(&mut self, m: NodeIdx, target: NodeIdx) -> Result<NodeIdx, SweepAbort> {
        match self.g.join(m, target) {
            Ok(desc) => {
                self.g.set_mask(desc ^ 1, self.ascending);
                self.bridges += 1;
                trace!(from = m, to = target, "bridge inserted");
                Ok(desc)
            }
            Err(source) => Err(SweepAbort::RejectedBridge { minimum: m, source }),
        }
    }

    /// Advance every right chain to the sweep line through `m_pos` and
    /// return the nearest bracket to the right of it.
    ///
    /// Chains walk forward along ascending edges. A chain whose next vertex
    /// reaches the sweep line stops there and brackets; a chain that runs
    /// out of ascending edges has topped out at a local maximum and is
    /// retired (into `peaks` if the maximum can accept a bridge).
    fn advance_right_chains(&mut self, m_pos: Pos) -> Option<Bracket> {
        let mut candidates: SmallVec<[Bracket; 4]> = SmallVec::new();
        let mut i = 0;
        while i < self.right_chains.len() {
            let mut e = self.right_chains[i];
            loop {
                let next = self.g.face_next(e);
                let top = self.g.pos(next);
                if !is_below(top, m_pos) {
                    // Brackets the sweep line.
                    self.right_chains[i] = e;
                    let base = self.g.pos(e);
                    let x = crossing_u(base, top, m_pos.1, base.0);
                    if x > m_pos.0 {
                        candidates.push(Bracket { entry: e, base, top });
                    }
                    i += 1;
                    break;
                }
                if self.asc(next) {
                    e = next;
                    continue;
                }
                // Topped out: next's base vertex is a local maximum.
                self.right_chains.swap_remove(i);
                if !self.down(next) && !self.peaks.contains(&next) {
                    self.peaks.push(next);
                }
                break;
            }
        }
        nearest(candidates, Ordering::Less)
    }

    /// Mirror image of `advance_right_chains`: walk backward along
    /// descending face-predecessors and return the nearest bracket to the
    /// left of the sweep position.
    fn advance_left_chains(&mut self, m_pos: Pos) -> Option<Bracket> {
        let mut candidates: SmallVec<[Bracket; 4]> = SmallVec::new();
        let mut i = 0;
        while i < self.left_chains.len() {
            let mut e = self.left_chains[i];
            loop {
                let prev = self.g.face_prev(e);
                if self.asc(prev) {
                    // The predecessor climbs into this vertex: local maximum.
                    self.left_chains.swap_remove(i);
                    if !self.down(e) && !self.peaks.contains(&e) {
                        self.peaks.push(e);
                    }
                    break;
                }
                let top = self.g.pos(prev);
                if !is_below(top, m_pos) {
                    self.left_chains[i] = e;
                    let base = self.g.pos(e);
                    let x = crossing_u(base, top, m_pos.1, base.0);
                    if x < m_pos.0 {
                        candidates.push(Bracket { entry: e, base, top });
                    }
                    i += 1;
                    break;
                }
                e = prev;
            }
        }
        nearest(candidates, Ordering::Greater)
    }

    /// The topmost active peak strictly between the chosen brackets and
    /// below the event, tested against each bracket at the peak's own
    /// height. Returns its index in `peaks`.
    fn pick_peak(
        &self,
        m_pos: Pos,
        left: Option<&Bracket>,
        right: Option<&Bracket>,
    ) -> Option<usize> {
        let mut best: Option<(usize, Pos)> = None;
        for (idx, &pk) in self.peaks.iter().enumerate() {
            let p = self.g.pos(pk);
            if !is_below(p, m_pos) {
                continue;
            }
            if let Some(r) = right {
                if p.0 >= crossing_u(r.base, r.top, p.1, r.base.0) {
                    continue;
                }
            }
            if let Some(l) = left {
                if p.0 <= crossing_u(l.base, l.top, p.1, l.base.0) {
                    continue;
                }
            }
            if best.map_or(true, |(_, bp)| is_below(bp, p)) {
                best = Some((idx, p));
            }
        }
        best.map(|(idx, _)| idx)
    }
}

impl Drop for Sweep<'_> {
    fn drop(&mut self) {
        let minima = mem::take(&mut self.minima);
        let right = mem::take(&mut self.right_chains);
        let left = mem::take(&mut self.left_chains);
        let peaks = mem::take(&mut self.peaks);
        self.g.free_scratch(minima);
        self.g.free_scratch(right);
        self.g.free_scratch(left);
        self.g.free_scratch(peaks);
        self.g.free_mask(self.ascending);
        self.g.free_mask(self.downward);
    }
}

/// Among bracket candidates, the edge closest to the sweep position:
/// leftmost (`Ordering::Less` wins) for right brackets, rightmost for left
/// brackets.
fn nearest(candidates: SmallVec<[Bracket; 4]>, wins: Ordering) -> Option<Bracket> {
    candidates.into_iter().reduce(|best, c| {
        if compare_edges_at_overlap(c.base, c.top, best.base, best.top) == wins {
            c
        } else {
            best
        }
    })
}

fn remove_entry(chains: &mut Vec<NodeIdx>, entry: NodeIdx) {
    if let Some(i) = chains.iter().position(|&n| n == entry) {
        chains.swap_remove(i);
    }
}
