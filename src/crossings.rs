use geo_types::{Coordinate, Line, Rect};
use log::warn;
use rand::Rng;
use slab::Slab;

use crate::components::{breadth_label, union_label};
use crate::events::{Event, EventKind, EventQueue};
use crate::segment::{reset_runs, SegmentData};
use crate::sweep::Sweep;
use crate::PrecisionError;

/// A crossing of two segments: the intersection point and the numbers
/// of the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub point: Coordinate<f64>,
    pub first: usize,
    pub second: usize,
}

/// View of one segment and the results attached to it.
#[derive(Debug, Clone, Copy)]
pub struct SegmentView<'a> {
    pub number: usize,
    pub line: Line<f64>,
    /// Connected component the segment was labeled with, `None` before
    /// a successful solve.
    pub group: Option<usize>,
    /// Numbers of the segments this one crosses.
    pub neighbors: &'a [usize],
}

/// Intersection solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionAlgorithm {
    /// The optimized plane sweep.
    BentleyOttmann,
    /// Test every pair.
    BruteForce,
    /// Test the pairs that are simultaneously open in a left-to-right
    /// scan of the end points.
    SortedBruteForce,
}

/// Component labelers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAlgorithm {
    /// Breadth-first traversal of the crossing graph.
    Breadth,
    /// Union-find over the crossing graph.
    UnionFind,
}

/// Configuration for solving and segment generation.
#[derive(Debug, Clone)]
pub struct Config {
    pub intersection: IntersectionAlgorithm,
    pub components: ComponentAlgorithm,
    /// Lower corner of the square generated segments live in.
    pub min: f64,
    /// Upper corner of that square.
    pub max: f64,
    /// Tolerance used by every coordinate comparison.
    pub epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            intersection: IntersectionAlgorithm::BentleyOttmann,
            components: ComponentAlgorithm::Breadth,
            min: 0.,
            max: 1000.,
            epsilon: 1e-4,
        }
    }
}

/// Crossings of line segments in the plane, and the connected
/// components of the crossing graph.
///
/// Add or generate segments, call [`solve`](PlanarCrossings::solve),
/// then read the results back through
/// [`crossings`](PlanarCrossings::crossings) and
/// [`segments`](PlanarCrossings::segments).
#[derive(Debug, Default)]
pub struct PlanarCrossings {
    segments: Slab<SegmentData>,
    crossings: Vec<Crossing>,
    config: Config,
}

impl PlanarCrossings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        PlanarCrossings {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Append a segment; its end points are canonicalized so the one
    /// with the smaller x comes first. Returns the segment's number.
    pub fn add_segment(&mut self, line: impl Into<Line<f64>>) -> usize {
        SegmentData::new(&mut self.segments, line.into()).number
    }

    /// Drop all segments and results.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.crossings.clear();
    }

    /// Replace the segments with `n` random ones inside the configured
    /// square, each with Chebyshev length at most `max_len`.
    pub fn generate_segments(&mut self, n: usize, max_len: f64) {
        self.generate_segments_with(&mut rand::thread_rng(), n, max_len)
    }

    /// [`generate_segments`](PlanarCrossings::generate_segments) with a
    /// caller-provided source of randomness.
    pub fn generate_segments_with<R: Rng>(&mut self, rng: &mut R, n: usize, max_len: f64) {
        self.clear();
        let bounds = Rect::new(
            Coordinate {
                x: self.config.min,
                y: self.config.min,
            },
            Coordinate {
                x: self.config.max,
                y: self.config.max,
            },
        );
        for _ in 0..n {
            let line = uniform_line_with_length(rng, bounds, max_len);
            self.add_segment(line);
        }
    }

    /// Find all crossings with the configured intersection algorithm,
    /// then label connected components with the configured labeler.
    ///
    /// On a precision failure the partial graph is discarded and no
    /// groups are assigned; the caller may re-invoke.
    pub fn solve(&mut self) -> Result<(), PrecisionError> {
        self.crossings.clear();

        let result = match self.config.intersection {
            IntersectionAlgorithm::BentleyOttmann => self.sweep(),
            IntersectionAlgorithm::BruteForce => {
                self.brute_force();
                Ok(())
            }
            IntersectionAlgorithm::SortedBruteForce => {
                self.sorted_brute_force();
                Ok(())
            }
        };
        if let Err(err) = result {
            warn!("sweep aborted: {}", err);
            self.discard_results();
            return Err(err);
        }

        match self.config.components {
            ComponentAlgorithm::Breadth => breadth_label(&mut self.segments),
            ComponentAlgorithm::UnionFind => union_label(&mut self.segments),
        }
        Ok(())
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The crossings recorded by the last solve.
    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    /// Iterate the segments in number order.
    pub fn segments(&self) -> impl Iterator<Item = SegmentView<'_>> + '_ {
        self.segments.iter().map(|(number, segment)| SegmentView {
            number,
            line: segment.line(),
            group: segment.group,
            neighbors: &segment.neighbors,
        })
    }

    /// Component label of one segment.
    pub fn group_of(&self, number: usize) -> Option<usize> {
        self.segments.get(number).and_then(|s| s.group)
    }

    fn sweep(&mut self) -> Result<(), PrecisionError> {
        let segments = std::mem::take(&mut self.segments);
        let mut sweep = Sweep::new(segments, self.config.epsilon);
        let crossings = &mut self.crossings;
        let result = sweep.run(&mut |c| crossings.push(c));
        self.segments = sweep.into_segments();
        result
    }

    fn brute_force(&mut self) {
        reset_runs(&mut self.segments);
        let eps = self.config.epsilon;
        let numbers: Vec<usize> = self.segments.iter().map(|(number, _)| number).collect();
        for (i, &a) in numbers.iter().enumerate() {
            for &b in &numbers[i + 1..] {
                if let Some(pt) = self.segments[a].intersection(&self.segments[b], eps) {
                    self.connect(a, b, pt);
                }
            }
        }
    }

    fn sorted_brute_force(&mut self) {
        reset_runs(&mut self.segments);
        let eps = self.config.epsilon;

        let mut queue = EventQueue::new(eps);
        for (_, segment) in self.segments.iter() {
            queue.insert(Event::begin(segment));
            queue.insert(Event::end(segment));
        }

        let mut open: Vec<usize> = Vec::new();
        while let Some(event) = queue.pop_first() {
            match event.kind {
                EventKind::Begin => {
                    for i in 0..open.len() {
                        let other = open[i];
                        let hit = self.segments[event.owner]
                            .intersection(&self.segments[other], eps);
                        if let Some(pt) = hit {
                            self.connect(event.owner, other, pt);
                        }
                    }
                    open.push(event.owner);
                }
                EventKind::End => open.retain(|&n| n != event.owner),
                EventKind::Cross => unreachable!("only end point events are seeded"),
            }
        }
    }

    fn connect(&mut self, a: usize, b: usize, point: Coordinate<f64>) {
        self.segments[a].neighbors.push(b);
        self.segments[b].neighbors.push(a);
        self.crossings.push(Crossing {
            point,
            first: a,
            second: b,
        });
    }

    fn discard_results(&mut self) {
        self.crossings.clear();
        for (_, segment) in self.segments.iter_mut() {
            segment.neighbors.clear();
            segment.group = None;
        }
    }
}

fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * rng.gen::<f64>(),
        y: bounds.min().y + dims.y * rng.gen::<f64>(),
    }
}

/// A random segment starting inside `bounds` with Chebyshev length at
/// most `max_len`; shifts that would leave the box are retried.
fn uniform_line_with_length<R: Rng>(rng: &mut R, bounds: Rect<f64>, max_len: f64) -> Line<f64> {
    let start = uniform_point(rng, bounds);
    loop {
        let end = Coordinate {
            x: start.x + rng.gen_range(-max_len..=max_len),
            y: start.y + rng.gen_range(-max_len..=max_len),
        };
        if bounds.min().x <= end.x
            && end.x <= bounds.max().x
            && bounds.min().y <= end.y
            && end.y <= bounds.max().y
        {
            return Line::new(start, end);
        }
    }
}
