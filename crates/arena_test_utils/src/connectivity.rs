//! Connectivity oracle.
//!
//! Plain breadth-first flood fill, independent of `arena_core::pathfinding`.

use std::collections::{HashSet, VecDeque};

use arena_core::grid::Grid;
use arena_core::location::{Direction, Location};
use arena_core::world_map::WorldMap;

/// Habitable cells reachable from `start`, `start` included.
#[must_use]
pub fn flood_fill(grid: &Grid, start: Location) -> HashSet<Location> {
    let mut reached = HashSet::new();
    if !grid.try_get_cell(start).is_some_and(|c| c.habitable) {
        return reached;
    }

    let mut queue = VecDeque::from([start]);
    reached.insert(start);

    while let Some(current) = queue.pop_front() {
        for direction in Direction::ALL {
            let next = current + direction;
            let open = grid.try_get_cell(next).is_some_and(|c| c.habitable);
            if open && reached.insert(next) {
                queue.push_back(next);
            }
        }
    }

    reached
}

/// Number of separate habitable regions.
#[must_use]
pub fn habitable_components(grid: &Grid) -> usize {
    let mut seen: HashSet<Location> = HashSet::new();
    let mut components = 0;

    for cell in grid.cells().filter(|c| c.habitable) {
        if seen.contains(&cell.location) {
            continue;
        }
        components += 1;
        seen.extend(flood_fill(grid, cell.location));
    }

    components
}

/// Assert that every habitable cell can reach every other one.
///
/// # Panics
///
/// Panics with a rendered map if the habitable area is split.
pub fn assert_connected(world: &WorldMap) {
    let components = habitable_components(world.grid());
    assert!(
        components <= 1,
        "habitable area split into {components} regions:\n{}",
        arena_core::render::render_ascii(world)
    );
}
