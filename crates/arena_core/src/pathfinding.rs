//! Connectivity checks over habitable cells.
//!
//! This is not a general router: it answers whether two cells are joined by
//! habitable, 4-adjacent steps, which the map generator asks once per
//! neighbour pair of every candidate obstacle. The search is best-first,
//! ordered by path length plus Manhattan distance to the destination, and
//! has no randomness.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid::Grid;
use crate::location::{Direction, Location};

/// A path tip in the open set.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct SearchNode {
    location: Location,
    /// Steps from the source to `location`.
    path_length: u32,
    /// path_length + Manhattan distance to the destination.
    priority: u32,
    /// Insertion counter, so equal priorities pop first-in first-out.
    sequence: u64,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the lowest priority pops first.
        match other.priority.cmp(&self.priority) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Habitable on-grid neighbours of `location`, in [`Direction::ALL`] order.
#[must_use]
pub fn adjacent_habitable(grid: &Grid, location: Location) -> Vec<Location> {
    Direction::ALL
        .iter()
        .map(|&direction| location + direction)
        .filter(|&neighbour| grid.try_get_cell(neighbour).is_some_and(|c| c.habitable))
        .collect()
}

/// Find a path of habitable cells from `source` to `destination`.
///
/// Returns the cells visited in order, both endpoints included, or `None`
/// when the frontier runs dry first. The source need not be habitable, but
/// an uninhabitable destination is never reached.
#[must_use]
pub fn find_path(grid: &Grid, source: Location, destination: Location) -> Option<Vec<Location>> {
    if source == destination {
        return Some(vec![source]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Location, Location> = HashMap::new();
    let mut visited: HashSet<Location> = HashSet::new();
    let mut sequence = 0u64;

    visited.insert(source);
    open_set.push(SearchNode {
        location: source,
        path_length: 0,
        priority: source.manhattan_distance(destination),
        sequence,
    });

    while let Some(current) = open_set.pop() {
        for neighbour in adjacent_habitable(grid, current.location) {
            // Visited on enqueue, not on pop.
            if !visited.insert(neighbour) {
                continue;
            }
            came_from.insert(neighbour, current.location);

            if neighbour == destination {
                return Some(reconstruct_path(&came_from, destination));
            }

            sequence += 1;
            let path_length = current.path_length + 1;
            open_set.push(SearchNode {
                location: neighbour,
                path_length,
                priority: path_length + neighbour.manhattan_distance(destination),
                sequence,
            });
        }
    }

    None
}

/// Check whether `source` and `destination` are connected.
#[must_use]
pub fn path_exists(grid: &Grid, source: Location, destination: Location) -> bool {
    find_path(grid, source, destination).is_some()
}

fn reconstruct_path(came_from: &HashMap<Location, Location>, destination: Location) -> Vec<Location> {
    let mut path = vec![destination];
    let mut current = destination;

    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }

    path.reverse();
    path
}
