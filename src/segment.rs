use geo_types::{Coordinate, Line};
use slab::Slab;

/// Tolerant equality: `a` and `b` are at most `eps` apart.
#[inline]
pub(crate) fn equal(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Tolerant strict order: `a` is below `b` by more than `eps`.
#[inline]
pub(crate) fn less(a: f64, b: f64, eps: f64) -> bool {
    b - a > eps
}

/// Reset the per-run fields every solver rebuilds.
pub(crate) fn reset_runs(segments: &mut Slab<SegmentData>) {
    for (number, segment) in segments.iter_mut() {
        segment.slot = number;
        segment.special_y = segment.start.y;
        segment.neighbors.clear();
        segment.group = None;
    }
}

/// A segment of the input, stored in the arena under its `number`.
///
/// End points are canonicalized so that `start.x <= end.x`. The `number`
/// is the stable identity of the segment for the whole run; the `slot` is
/// its current logical position in the status structure and is exchanged
/// with its partner's when the sweep processes their crossing.
#[derive(Debug, Clone)]
pub(crate) struct SegmentData {
    pub(crate) start: Coordinate<f64>,
    pub(crate) end: Coordinate<f64>,
    pub(crate) delta: Coordinate<f64>,
    /// Stand-in y for vertical segments, which have no single y at the
    /// sweep line. Starts at `start.y`; the engine moves it to the
    /// partner's y at each crossing.
    pub(crate) special_y: f64,
    pub(crate) number: usize,
    pub(crate) slot: usize,
    /// Numbers of the segments this one crosses.
    pub(crate) neighbors: Vec<usize>,
    pub(crate) group: Option<usize>,
}

impl SegmentData {
    /// Create and store a segment with canonical end point order.
    pub(crate) fn new(storage: &mut Slab<Self>, line: Line<f64>) -> &mut Self {
        assert!(
            line.start.x.is_finite()
                && line.start.y.is_finite()
                && line.end.x.is_finite()
                && line.end.y.is_finite(),
            "segment requires finite coordinates"
        );
        let (start, end) = if line.start.x <= line.end.x {
            (line.start, line.end)
        } else {
            (line.end, line.start)
        };
        let entry = storage.vacant_entry();
        let number = entry.key();
        entry.insert(SegmentData {
            start,
            end,
            delta: end - start,
            special_y: start.y,
            number,
            slot: number,
            neighbors: Vec::new(),
            group: None,
        })
    }

    pub(crate) fn line(&self) -> Line<f64> {
        Line::new(self.start, self.end)
    }

    pub(crate) fn is_vertical(&self, eps: f64) -> bool {
        equal(self.delta.x, 0., eps)
    }

    /// End points coincide under the tolerance; such a segment behaves as
    /// a point and never intersects anything.
    pub(crate) fn is_degenerate(&self, eps: f64) -> bool {
        equal(self.delta.x, 0., eps) && equal(self.delta.y, 0., eps)
    }

    /// The y-coordinate of this segment at abscissa `x`.
    ///
    /// A vertical segment has no single y there; it reports its
    /// engine-maintained stand-in instead.
    pub(crate) fn y_at(&self, x: f64, eps: f64) -> f64 {
        if self.is_vertical(eps) {
            self.special_y
        } else {
            self.start.y + (x - self.start.x) * self.delta.y / self.delta.x
        }
    }

    /// Intersection point of `self` and `other`, if any.
    ///
    /// Proper crossings solve the two-parameter system and accept
    /// parameters in `[0, 1]`. Parallel segments intersect only when
    /// collinear with overlapping x-intervals, in which case the leftmost
    /// end point of the overlap is reported.
    pub(crate) fn intersection(&self, other: &SegmentData, eps: f64) -> Option<Coordinate<f64>> {
        if self.is_degenerate(eps) || other.is_degenerate(eps) {
            return None;
        }

        let d = -other.delta.x * self.delta.y + self.delta.x * other.delta.y;
        if d == 0. {
            let ax = other.start.x - self.start.x;
            let ay = other.start.y - self.start.y;
            if ax * self.delta.y - ay * self.delta.x != 0. {
                // Parallel but not collinear.
                return None;
            }
            if other.start.x <= self.start.x && self.start.x <= other.end.x {
                return Some(self.start);
            }
            if self.start.x <= other.start.x && other.start.x <= self.end.x {
                return Some(other.start);
            }
            return None;
        }

        let u = (-self.delta.y * (self.start.x - other.start.x)
            + self.delta.x * (self.start.y - other.start.y))
            / d;
        let t = (other.delta.x * (self.start.y - other.start.y)
            - other.delta.y * (self.start.x - other.start.x))
            / d;
        if (0. ..=1.).contains(&u) && (0. ..=1.).contains(&t) {
            Some(Coordinate {
                x: self.start.x + t * self.delta.x,
                y: self.start.y + t * self.delta.y,
            })
        } else {
            None
        }
    }
}
