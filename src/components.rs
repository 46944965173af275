use std::collections::VecDeque;

use slab::Slab;

use crate::disjoint::DisjointSet;
use crate::segment::SegmentData;

fn index_bound(segments: &Slab<SegmentData>) -> usize {
    segments.iter().map(|(k, _)| k + 1).max().unwrap_or(0)
}

/// Label connected components by breadth-first traversal.
///
/// Segments are visited in number order; every unvisited one opens a
/// fresh group and floods it across the neighbor relation.
pub(crate) fn breadth_label(segments: &mut Slab<SegmentData>) {
    let mut visited = vec![false; index_bound(segments)];
    let mut queue = VecDeque::new();
    let mut group = 0;

    let numbers: Vec<usize> = segments.iter().map(|(k, _)| k).collect();
    for number in numbers {
        if visited[number] {
            continue;
        }
        visited[number] = true;
        segments[number].group = Some(group);
        queue.push_back(number);

        while let Some(current) = queue.pop_front() {
            for i in 0..segments[current].neighbors.len() {
                let neighbor = segments[current].neighbors[i];
                if visited[neighbor] {
                    continue;
                }
                visited[neighbor] = true;
                segments[neighbor].group = Some(group);
                queue.push_back(neighbor);
            }
        }
        group += 1;
    }
}

/// Label connected components through the disjoint-set structure.
///
/// Produces the same partition as [`breadth_label`]; the labels are set
/// roots rather than dense counters.
pub(crate) fn union_label(segments: &mut Slab<SegmentData>) {
    let mut sets = DisjointSet::new(index_bound(segments));
    for (number, segment) in segments.iter() {
        for &neighbor in &segment.neighbors {
            sets.union(number, neighbor);
        }
    }

    let roots = sets.groups().to_vec();
    for (number, segment) in segments.iter_mut() {
        segment.group = Some(roots[number]);
    }
}
