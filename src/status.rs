use std::cmp::Ordering;

use slab::Slab;

use crate::segment::{equal, SegmentData};

/// Context every status comparison depends on: the slot-to-number
/// assignment and the sweep abscissa. Owned by the engine and passed
/// explicitly wherever the order is consulted, so the key's dependence
/// on the sweep line is visible in the signatures.
#[derive(Debug)]
pub(crate) struct SweepContext {
    /// Segment number currently held by each slot. A crossing swaps the
    /// two slots' assignments; nothing else changes it mid-run.
    pub(crate) order: Vec<usize>,
    /// Abscissa of the sweep line, advanced exactly at event extraction.
    pub(crate) x: f64,
    pub(crate) eps: f64,
}

impl SweepContext {
    pub(crate) fn new(order: Vec<usize>, eps: f64) -> Self {
        SweepContext { order, x: 0., eps }
    }

    pub(crate) fn segment<'a>(&self, segments: &'a Slab<SegmentData>, slot: usize) -> &'a SegmentData {
        &segments[self.order[slot]]
    }
}

/// Order two slots by the y-coordinate of their current segments at the
/// sweep line.
///
/// When the keys agree under the tolerance, a vertical segment sits
/// above any non-vertical one; two non-vertical segments are both
/// re-evaluated at the first operand's begin abscissa, which recovers
/// the order the pair had when the left one entered (comparisons of a
/// crossing pair happen before their swap). The sweep abscissa itself
/// is left untouched. Ties that survive break by slot so distinct
/// segments always occupy distinct positions.
fn compare(
    segments: &Slab<SegmentData>,
    ctx: &SweepContext,
    a_slot: usize,
    b_slot: usize,
) -> Ordering {
    if a_slot == b_slot {
        return Ordering::Equal;
    }
    let eps = ctx.eps;
    let a = ctx.segment(segments, a_slot);
    let b = ctx.segment(segments, b_slot);

    let ya = a.y_at(ctx.x, eps);
    let yb = b.y_at(ctx.x, eps);
    if !equal(ya, yb, eps) {
        return ya
            .partial_cmp(&yb)
            .expect("status order requires finite keys");
    }

    match (a.is_vertical(eps), b.is_vertical(eps)) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => a_slot.cmp(&b_slot),
        (false, false) => {
            let x0 = a.start.x;
            a.y_at(x0, eps)
                .partial_cmp(&b.y_at(x0, eps))
                .expect("status order requires finite keys")
                .then_with(|| a_slot.cmp(&b_slot))
        }
    }
}

/// The status structure: slots of the segments currently intersected by
/// the sweep line, ordered bottom to top.
///
/// The comparison key is extrinsic, so only insertion consults it.
/// Membership is decided by slot identity and neighbors by position,
/// which keeps the engine's navigation exact even while a batch of
/// coincident crossings is being worked through and the stored order is
/// momentarily ahead of the comparator. A slot-to-position index is
/// kept in lockstep with the entries so identity lookups are constant
/// time; ordering probes are binary searches.
#[derive(Debug, Default)]
pub(crate) struct Status {
    entries: Vec<usize>,
    /// Current position of each slot, `None` while it is not active.
    index: Vec<Option<usize>>,
}

impl Status {
    pub(crate) fn new() -> Self {
        Status::default()
    }

    /// Insert a slot at its ordered position and return that position.
    /// A slot that is already present is left where it is.
    pub(crate) fn insert(
        &mut self,
        segments: &Slab<SegmentData>,
        ctx: &SweepContext,
        slot: usize,
    ) -> usize {
        if let Some(pos) = self.position(slot) {
            return pos;
        }
        let pos = match self
            .entries
            .binary_search_by(|&probe| compare(segments, ctx, probe, slot))
        {
            Ok(pos) | Err(pos) => pos,
        };
        self.entries.insert(pos, slot);
        if self.index.len() <= slot {
            self.index.resize(slot + 1, None);
        }
        self.reindex_from(pos);
        pos
    }

    /// Position of a slot, by identity.
    pub(crate) fn position(&self, slot: usize) -> Option<usize> {
        self.index.get(slot).copied().flatten()
    }

    /// Repair the index for every entry at or after `pos`.
    fn reindex_from(&mut self, pos: usize) {
        for (i, &slot) in self.entries.iter().enumerate().skip(pos) {
            self.index[slot] = Some(i);
        }
    }

    /// Slot just below the given position.
    pub(crate) fn prev(&self, pos: usize) -> Option<usize> {
        pos.checked_sub(1).map(|i| self.entries[i])
    }

    /// Slot just above the given position.
    pub(crate) fn next(&self, pos: usize) -> Option<usize> {
        self.entries.get(pos + 1).copied()
    }

    pub(crate) fn remove_at(&mut self, pos: usize) -> usize {
        let slot = self.entries.remove(pos);
        self.index[slot] = None;
        self.reindex_from(pos);
        slot
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn snapshot(&self) -> &[usize] {
        &self.entries
    }
}
