use std::cmp::Ordering;
use std::collections::BTreeSet;

use geo_types::Coordinate;

use crate::segment::{equal, less, SegmentData};

/// Event kind. The variant order is significant: events of one segment,
/// and of a crossing pair at a shared point, are processed begin first,
/// then crossings, then ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum EventKind {
    Begin,
    Cross,
    End,
}

/// A point at which the status structure changes.
///
/// `owner` and `other` are stable segment numbers; `other` is present
/// only for crossings and names the second segment of the pair.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Event {
    pub(crate) point: Coordinate<f64>,
    pub(crate) kind: EventKind,
    pub(crate) owner: usize,
    pub(crate) other: Option<usize>,
}

impl Event {
    pub(crate) fn begin(segment: &SegmentData) -> Self {
        Event {
            point: segment.start,
            kind: EventKind::Begin,
            owner: segment.number,
            other: None,
        }
    }

    pub(crate) fn end(segment: &SegmentData) -> Self {
        Event {
            point: segment.end,
            kind: EventKind::End,
            owner: segment.number,
            other: None,
        }
    }

    pub(crate) fn cross(owner: usize, other: usize, point: Coordinate<f64>) -> Self {
        Event {
            point,
            kind: EventKind::Cross,
            owner,
            other: Some(other),
        }
    }
}

/// Total order over events.
///
/// Identical events (same owner, kind and other) are equal, which is what
/// de-duplicates them in the queue. Ties between the events of one owner,
/// and between a crossing and an end point of either of its segments at a
/// shared location, resolve by kind. Everything else orders by location
/// under the tolerance; coincident events of distinct identity then order
/// crossings first so that a begin or end landing on a crossing point is
/// handled after the swap, and stay distinct so none of them is lost.
fn order(a: &Event, b: &Event, eps: f64) -> Ordering {
    if a.owner == b.owner && a.kind == b.kind && a.other == b.other {
        return Ordering::Equal;
    }

    if a.kind != b.kind {
        let related = a.owner == b.owner
            || (a.kind == EventKind::Cross && a.other == Some(b.owner))
            || (b.kind == EventKind::Cross && b.other == Some(a.owner));
        if related {
            return a.kind.cmp(&b.kind);
        }
    }

    if !equal(a.point.x, b.point.x, eps) {
        return if less(a.point.x, b.point.x, eps) {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    if !equal(a.point.y, b.point.y, eps) {
        return if less(a.point.y, b.point.y, eps) {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    fn coincident_rank(kind: EventKind) -> u8 {
        match kind {
            EventKind::Cross => 0,
            EventKind::Begin => 1,
            EventKind::End => 2,
        }
    }
    coincident_rank(a.kind)
        .cmp(&coincident_rank(b.kind))
        .then(a.owner.cmp(&b.owner))
        .then(a.other.cmp(&b.other))
}

/// Queue entry. Carries the queue's tolerance so the `Ord` impl needs no
/// outside context.
#[derive(Debug, Clone, Copy)]
struct Entry {
    event: Event,
    eps: f64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        order(&self.event, &other.event, self.eps)
    }
}

/// The ordered set of pending events.
#[derive(Debug)]
pub(crate) struct EventQueue {
    set: BTreeSet<Entry>,
    eps: f64,
}

impl EventQueue {
    pub(crate) fn new(eps: f64) -> Self {
        EventQueue {
            set: BTreeSet::new(),
            eps,
        }
    }

    /// Insert an event. Returns `false` when an equal event is already
    /// queued; the caller decides whether that is absorption or a
    /// collision.
    pub(crate) fn insert(&mut self, event: Event) -> bool {
        assert!(
            event.point.x.is_finite() && event.point.y.is_finite(),
            "event requires a finite location"
        );
        self.set.insert(Entry {
            event,
            eps: self.eps,
        })
    }

    /// Remove an event equal to `event` under the queue order.
    pub(crate) fn remove(&mut self, event: &Event) -> bool {
        self.set.remove(&Entry {
            event: *event,
            eps: self.eps,
        })
    }

    /// Extract the least pending event.
    pub(crate) fn pop_first(&mut self) -> Option<Event> {
        self.set.pop_first().map(|e| e.event)
    }

    #[allow(dead_code)]
    pub(crate) fn contains(&self, event: &Event) -> bool {
        self.set.contains(&Entry {
            event: *event,
            eps: self.eps,
        })
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    #[allow(dead_code)]
    pub(crate) fn len(&self) -> usize {
        self.set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slab::Slab;

    const EPS: f64 = 1e-4;

    fn seg(storage: &mut Slab<SegmentData>, line: [(f64, f64); 2]) -> usize {
        SegmentData::new(storage, line.into()).number
    }

    #[test]
    fn events_pop_in_sweep_order() {
        let mut storage = Slab::new();
        let a = seg(&mut storage, [(0., 0.), (10., 10.)]);
        let b = seg(&mut storage, [(0., 10.), (10., 0.)]);

        let mut queue = EventQueue::new(EPS);
        assert!(queue.insert(Event::begin(&storage[a])));
        assert!(queue.insert(Event::end(&storage[a])));
        assert!(queue.insert(Event::begin(&storage[b])));
        assert!(queue.insert(Event::end(&storage[b])));
        assert!(queue.insert(Event::cross(a, b, (5., 5.).into())));

        let kinds: Vec<_> = std::iter::from_fn(|| queue.pop_first())
            .map(|e| (e.kind, e.owner))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (EventKind::Begin, a),
                (EventKind::Begin, b),
                (EventKind::Cross, a),
                (EventKind::End, b),
                (EventKind::End, a),
            ]
        );
    }

    #[test]
    fn identical_events_are_absorbed() {
        let mut storage = Slab::new();
        let a = seg(&mut storage, [(0., 0.), (10., 10.)]);

        let mut queue = EventQueue::new(EPS);
        assert!(queue.insert(Event::begin(&storage[a])));
        assert!(!queue.insert(Event::begin(&storage[a])));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn same_pair_at_contradictory_location_collides() {
        let mut queue = EventQueue::new(EPS);
        assert!(queue.insert(Event::cross(0, 1, (5., 5.).into())));
        // Same identity elsewhere is still "the same" event; the engine
        // turns this rejection into a precision failure.
        assert!(!queue.insert(Event::cross(0, 1, (7., 3.).into())));
    }

    #[test]
    fn coincident_events_of_distinct_pairs_coexist() {
        let mut queue = EventQueue::new(EPS);
        assert!(queue.insert(Event::cross(0, 1, (5., 5.).into())));
        assert!(queue.insert(Event::cross(2, 0, (5., 5.).into())));
        assert!(queue.insert(Event::cross(2, 1, (5., 5.).into())));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn crossing_precedes_end_of_its_pair_at_shared_point() {
        let mut storage = Slab::new();
        let a = seg(&mut storage, [(0., 0.), (5., 5.)]);
        let b = seg(&mut storage, [(2., 8.), (8., 2.)]);
        // Crossing exactly at a's right end point.
        let cross = Event::cross(b, a, (5., 5.).into());

        let mut queue = EventQueue::new(EPS);
        queue.insert(Event::end(&storage[a]));
        queue.insert(cross);
        assert_eq!(queue.pop_first().unwrap().kind, EventKind::Cross);
        assert_eq!(queue.pop_first().unwrap().kind, EventKind::End);
    }

    #[test]
    fn begin_at_foreign_end_point_precedes_it() {
        let mut storage = Slab::new();
        let a = seg(&mut storage, [(0., 0.), (5., 0.)]);
        let b = seg(&mut storage, [(5., 0.), (10., 0.)]);

        let mut queue = EventQueue::new(EPS);
        queue.insert(Event::end(&storage[a]));
        queue.insert(Event::begin(&storage[b]));
        assert_eq!(queue.len(), 2);

        let first = queue.pop_first().unwrap();
        assert_eq!((first.kind, first.owner), (EventKind::Begin, b));
        let second = queue.pop_first().unwrap();
        assert_eq!((second.kind, second.owner), (EventKind::End, a));
    }

    #[test]
    fn removal_by_value() {
        let mut queue = EventQueue::new(EPS);
        queue.insert(Event::cross(0, 1, (5., 5.).into()));
        queue.insert(Event::cross(1, 2, (6., 6.).into()));
        assert!(queue.remove(&Event::cross(0, 1, (5., 5.).into())));
        assert!(!queue.remove(&Event::cross(0, 1, (5., 5.).into())));
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(&Event::cross(1, 2, (6., 6.).into())));
    }
}
