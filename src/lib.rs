//! Crossings of line segments in the plane.
//!
//! This crate computes the pairwise intersection points of a collection
//! of straight line segments and the connected components of the
//! crossing graph. The optimized path is a [Bentley-Ottmann] plane
//! sweep with tolerant coordinate comparisons; two quadratic solvers
//! are available as reference oracles, and components can be labeled by
//! breadth-first traversal or through a union-find.
//!
//! [Bentley-Ottmann]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
//!
//! # Example
//!
//! ```
//! use planar_crossings::PlanarCrossings;
//!
//! let mut plane = PlanarCrossings::new();
//! plane.add_segment([(0., 0.), (10., 10.)]);
//! plane.add_segment([(0., 10.), (10., 0.)]);
//! plane.add_segment([(20., 0.), (20., 10.)]);
//! plane.solve().expect("input is well separated");
//!
//! assert_eq!(plane.crossings().len(), 1);
//! assert_eq!(plane.group_of(0), plane.group_of(1));
//! assert_ne!(plane.group_of(0), plane.group_of(2));
//! ```

use std::fmt;

mod components;
mod events;
mod segment;
mod status;
mod sweep;

pub mod crossings;
pub mod disjoint;

pub use crossings::{
    ComponentAlgorithm, Config, Crossing, IntersectionAlgorithm, PlanarCrossings, SegmentView,
};
pub use disjoint::DisjointSet;

/// Ways the plane sweep can lose track of its own ordering.
///
/// All variants mean the same thing to the caller: the coordinates were
/// too tangled for the tolerance and the partial crossing graph was
/// discarded. Re-invoking, possibly with different input, is the only
/// recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionError {
    /// A crossing named a segment that was no longer in the status
    /// structure.
    LostSegment(usize),
    /// A queued crossing collided with an already queued event for the
    /// same pair at a different location.
    EventCollision(usize, usize),
    /// Segments were still in the status structure when the event queue
    /// drained.
    Residue(usize),
}

impl fmt::Display for PrecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecisionError::LostSegment(number) => {
                write!(f, "crossing segment #{} not found in the status", number)
            }
            PrecisionError::EventCollision(a, b) => {
                write!(f, "conflicting crossing events for #{} and #{}", a, b)
            }
            PrecisionError::Residue(count) => {
                write!(f, "{} segments left in the status after the sweep", count)
            }
        }
    }
}

impl std::error::Error for PrecisionError {}
