use geo_types::Coordinate;
use log::{debug, trace};
use slab::Slab;

use crate::crossings::Crossing;
use crate::events::{Event, EventKind, EventQueue};
use crate::segment::{less, SegmentData};
use crate::status::{Status, SweepContext};
use crate::PrecisionError;

/// The plane sweep for detecting all crossings.
///
/// Maintains the ordered queue of pending events and the status
/// structure of segments currently intersected by the sweep line, per
/// [Bentley-Ottmann]. Crossings are reported through a callback and
/// recorded on the segments as neighbor edges.
///
/// [Bentley-Ottmann]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
pub(crate) struct Sweep {
    segments: Slab<SegmentData>,
    ctx: SweepContext,
    events: EventQueue,
    status: Status,
}

impl Sweep {
    /// Take over the arena and seed begin and end events for every
    /// segment. Per-run segment state left over from an earlier solve is
    /// reset first.
    pub(crate) fn new(mut segments: Slab<SegmentData>, eps: f64) -> Self {
        crate::segment::reset_runs(&mut segments);

        let ctx = SweepContext::new(segments.iter().map(|(number, _)| number).collect(), eps);

        let mut events = EventQueue::new(eps);
        for (_, segment) in segments.iter() {
            // Coinciding duplicates are absorbed by the queue order.
            events.insert(Event::begin(segment));
            events.insert(Event::end(segment));
        }

        Sweep {
            segments,
            ctx,
            events,
            status: Status::new(),
        }
    }

    /// Hand the arena back after the run.
    pub(crate) fn into_segments(self) -> Slab<SegmentData> {
        self.segments
    }

    /// Drive the sweep to completion, reporting each crossing pair once.
    pub(crate) fn run<F: FnMut(Crossing)>(&mut self, cb: &mut F) -> Result<(), PrecisionError> {
        let mut last_x = f64::NEG_INFINITY;
        while let Some(event) = self.events.pop_first() {
            debug_assert!(
                !less(event.point.x, last_x, self.ctx.eps),
                "events extracted out of sweep order"
            );
            last_x = event.point.x;
            self.ctx.x = event.point.x;
            trace!("handling event: {:?}", event);

            match event.kind {
                EventKind::Begin => self.handle_begin(&event)?,
                EventKind::End => self.handle_end(&event)?,
                EventKind::Cross => self.handle_cross(&event, cb)?,
            }
        }

        if !self.status.is_empty() {
            debug!(
                "queue drained with {} segments still active",
                self.status.len()
            );
            return Err(PrecisionError::Residue(self.status.len()));
        }
        Ok(())
    }

    /// Queue a crossing of the ordered pair `(below, above)`.
    ///
    /// A pair of straight segments crosses at most once, so a pair that
    /// is already connected has had its crossing processed and is not
    /// queued again; this is what lets several crossings coincide at one
    /// point without the pairwise swaps re-discovering each other
    /// forever. A rejected insert means the queue already holds this
    /// pair under the equality rule, which the run must not survive.
    fn insert_cross(
        &mut self,
        below: usize,
        above: usize,
        point: Coordinate<f64>,
    ) -> Result<(), PrecisionError> {
        if self.segments[below].neighbors.contains(&above) {
            trace!("crossing of #{} and #{} already recorded", below, above);
            return Ok(());
        }
        debug!(
            "found crossing of #{} and #{} at ({}, {})",
            below, above, point.x, point.y
        );
        if self.events.insert(Event::cross(below, above, point)) {
            Ok(())
        } else {
            Err(PrecisionError::EventCollision(below, above))
        }
    }

    /// The owner enters the status; its new neighbors stop being each
    /// other's and may instead cross it.
    fn handle_begin(&mut self, event: &Event) -> Result<(), PrecisionError> {
        let eps = self.ctx.eps;
        let number = event.owner;
        let slot = self.segments[number].slot;

        let pos = self.status.insert(&self.segments, &self.ctx, slot);
        let prev = self.status.prev(pos);
        let next = self.status.next(pos);

        if let (Some(p), Some(r)) = (prev, next) {
            let below = self.ctx.order[p];
            let above = self.ctx.order[r];
            if let Some(pt) = self.segments[below].intersection(&self.segments[above], eps) {
                // Split apart by the new segment; their crossing is no
                // longer a neighbor crossing.
                self.events.remove(&Event::cross(below, above, pt));
            }
        }

        if let Some(p) = prev {
            let below = self.ctx.order[p];
            if let Some(pt) = self.segments[below].intersection(&self.segments[number], eps) {
                self.insert_cross(below, number, pt)?;
            }
        }
        if let Some(r) = next {
            let above = self.ctx.order[r];
            if let Some(pt) = self.segments[number].intersection(&self.segments[above], eps) {
                self.insert_cross(number, above, pt)?;
            }
        }
        Ok(())
    }

    /// The owner leaves the status; the segments around it become
    /// neighbors and may cross ahead of the sweep line.
    fn handle_end(&mut self, event: &Event) -> Result<(), PrecisionError> {
        let eps = self.ctx.eps;
        let number = event.owner;
        let slot = self.segments[number].slot;

        // Normally already present, in which case this returns the
        // existing position.
        let pos = self.status.insert(&self.segments, &self.ctx, slot);
        let prev = self.status.prev(pos);
        let next = self.status.next(pos);

        if let (Some(p), Some(r)) = (prev, next) {
            let below = self.ctx.order[p];
            let above = self.ctx.order[r];
            if let Some(pt) = self.segments[below].intersection(&self.segments[above], eps) {
                if !less(pt.x, event.point.x, eps) {
                    self.insert_cross(below, above, pt)?;
                }
            }
        }

        self.status.remove_at(pos);
        Ok(())
    }

    /// Two adjacent segments cross: record the edge, re-schedule the
    /// crossings of the pair's new neighborhoods, and exchange the two
    /// slots' payloads so the status reads in swapped order past the
    /// crossing.
    fn handle_cross<F: FnMut(Crossing)>(
        &mut self,
        event: &Event,
        cb: &mut F,
    ) -> Result<(), PrecisionError> {
        let eps = self.ctx.eps;
        let first = event.owner;
        let second = event.other.expect("crossing event without a second segment");

        // A pair crosses at most once; a second delivery would swap the
        // pair back and corrupt the status order.
        if self.segments[first].neighbors.contains(&second) {
            trace!("crossing of #{} and #{} already processed", first, second);
            return Ok(());
        }

        self.segments[first].neighbors.push(second);
        self.segments[second].neighbors.push(first);
        cb(Crossing {
            point: event.point,
            first,
            second,
        });

        let slot1 = self.segments[first].slot;
        let slot2 = self.segments[second].slot;
        let pos1 = match self.status.position(slot1) {
            Some(pos) => pos,
            None => {
                debug!("crossing segment #{} lost from the status", first);
                return Err(PrecisionError::LostSegment(first));
            }
        };
        let pos2 = match self.status.position(slot2) {
            Some(pos) => pos,
            None => {
                debug!("crossing segment #{} lost from the status", second);
                return Err(PrecisionError::LostSegment(second));
            }
        };

        // `first` is still below `second` at this instant.
        let prev = self.status.prev(pos1);
        let next = self.status.next(pos2);

        if let Some(r) = next {
            let above = self.ctx.order[r];
            if let Some(pt) = self.segments[second].intersection(&self.segments[above], eps) {
                self.events.remove(&Event::cross(second, above, pt));
            }
        }
        if let Some(p) = prev {
            let below = self.ctx.order[p];
            if let Some(pt) = self.segments[below].intersection(&self.segments[first], eps) {
                self.events.remove(&Event::cross(below, first, pt));
            }
        }

        if let Some(r) = next {
            let above = self.ctx.order[r];
            if let Some(pt) = self.segments[first].intersection(&self.segments[above], eps) {
                if !less(pt.x, event.point.x, eps) {
                    self.insert_cross(first, above, pt)?;
                }
            }
        }
        if let Some(p) = prev {
            let below = self.ctx.order[p];
            if let Some(pt) = self.segments[below].intersection(&self.segments[second], eps) {
                if !less(pt.x, event.point.x, eps) {
                    self.insert_cross(below, second, pt)?;
                }
            }
        }

        // A vertical partner adopts the other's y so its status position
        // tracks the crossing as the sweep continues up the line.
        if self.segments[first].is_vertical(eps) {
            let y = self.segments[second].y_at(self.ctx.x, eps);
            self.segments[first].special_y = y;
        }
        if self.segments[second].is_vertical(eps) {
            let y = self.segments[first].y_at(self.ctx.x, eps);
            self.segments[second].special_y = y;
        }

        // The logical swap: the slots trade segments, the status entries
        // stay put, and the pair reads in swapped order just past the
        // crossing.
        trace!("swapping slots {} and {}", slot1, slot2);
        self.ctx.order.swap(slot1, slot2);
        self.segments[first].slot = slot2;
        self.segments[second].slot = slot1;
        Ok(())
    }
}
