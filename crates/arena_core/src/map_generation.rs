//! Procedural arena generation with connectivity-safe obstacles.
//!
//! Generates maps where:
//! - Obstacles only ever sit on the perimeter
//! - One non-corner edge cell is always left open so the arena can grow
//! - Every habitable cell can reach every other habitable cell
//!
//! Each candidate obstacle is placed tentatively and kept only if all of its
//! habitable neighbours can still reach each other. Checking consecutive
//! neighbour pairs is enough: connectivity chains through the pairs, so the
//! whole neighbour set stays joined and the region cannot have been split.
//!
//! Placement is greedy and order-sensitive; the final shape depends on the
//! random visiting order as well as the ratio.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ArenaError, Result};
use crate::grid::Grid;
use crate::location::Location;
use crate::pathfinding::{adjacent_habitable, path_exists};
use crate::world_map::WorldMap;

/// Map configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Map width in cells. Odd, at least 3.
    pub width: u32,
    /// Map height in cells. Odd, at least 3.
    pub height: u32,
    /// Chance that each edge cell is tried as an obstacle (0.0 = open, 1.0 = every edge cell).
    pub obstacle_ratio: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
            obstacle_ratio: 0.1,
        }
    }
}

impl MapConfig {
    /// Create a config for a `width` x `height` arena.
    #[must_use]
    pub fn new(width: u32, height: u32, obstacle_ratio: f64) -> Self {
        Self {
            width,
            height,
            obstacle_ratio,
        }
    }

    /// Set the dimensions.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the obstacle ratio.
    #[must_use]
    pub fn with_obstacle_ratio(mut self, obstacle_ratio: f64) -> Self {
        self.obstacle_ratio = obstacle_ratio;
        self
    }

    /// Check the generation preconditions.
    pub fn validate(&self) -> Result<()> {
        let valid_dim = |dim: u32| dim >= 3 && dim % 2 == 1;
        if !valid_dim(self.width) || !valid_dim(self.height) {
            return Err(ArenaError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=1.0).contains(&self.obstacle_ratio) {
            return Err(ArenaError::InvalidObstacleRatio(self.obstacle_ratio));
        }
        Ok(())
    }
}

/// A freshly generated map with generation details.
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    /// The arena.
    pub world: WorldMap,
    /// The edge cell that was kept open.
    pub reserved_edge: Location,
    /// Obstacles that were kept.
    pub obstacles_placed: usize,
    /// Obstacles that were reverted because they would have split the map.
    pub obstacles_rejected: usize,
}

/// Generate an arena.
///
/// # Errors
///
/// Returns an error if the config fails [`MapConfig::validate`].
pub fn generate_map<R: Rng + ?Sized>(config: &MapConfig, rng: &mut R) -> Result<WorldMap> {
    generate_map_detailed(config, rng).map(|generated| generated.world)
}

/// Generate an arena, also reporting the reserved edge cell and obstacle counts.
///
/// # Errors
///
/// Returns an error if the config fails [`MapConfig::validate`].
pub fn generate_map_detailed<R: Rng + ?Sized>(
    config: &MapConfig,
    rng: &mut R,
) -> Result<GeneratedMap> {
    config.validate()?;

    let mut grid = Grid::new(config.width, config.height);

    // One non-corner edge cell stays open so the map can be expanded later
    let (edge_x, edge_y) = random_edge_index(config.height, config.width, rng);
    let reserved_edge = edge_to_location(&grid, edge_x, edge_y);

    let mut edges = edge_coordinates(config.height, config.width);
    edges.shuffle(rng);

    let mut obstacles_placed = 0;
    let mut obstacles_rejected = 0;

    for (x, y) in edges {
        let location = edge_to_location(&grid, x, y);
        if location == reserved_edge || rng.gen::<f64>() >= config.obstacle_ratio {
            continue;
        }

        grid.get_cell_mut(location).habitable = false;
        if all_habitable_neighbours_connected(&grid, location) {
            obstacles_placed += 1;
        } else {
            grid.get_cell_mut(location).habitable = true;
            obstacles_rejected += 1;
            trace!(%location, "Obstacle would split the map, reverted");
        }
    }

    debug!(
        width = config.width,
        height = config.height,
        obstacle_ratio = config.obstacle_ratio,
        obstacles_placed,
        obstacles_rejected,
        %reserved_edge,
        "Generated map"
    );

    Ok(GeneratedMap {
        world: WorldMap::new(grid),
        reserved_edge,
        obstacles_placed,
        obstacles_rejected,
    })
}

/// Pick a uniformly random non-corner perimeter cell.
///
/// Returns zero-based `(column, row)` storage coordinates.
///
/// # Panics
///
/// Panics if `height` or `width` is below 2, or if the grid has no
/// non-corner edge cells.
pub fn random_edge_index<R: Rng + ?Sized>(height: u32, width: u32, rng: &mut R) -> (u32, u32) {
    assert!(height >= 2 && width >= 2, "Edge cells need a grid of at least 2x2");

    let num_row_cells = width - 2;
    let num_col_cells = height - 2;
    let num_edge_cells = 2 * num_row_cells + 2 * num_col_cells;
    let mut slot = rng.gen_range(0..num_edge_cells);

    if slot < num_row_cells {
        // First row
        return (slot + 1, 0);
    } else if slot < 2 * num_row_cells {
        // Last row
        slot -= num_row_cells;
        return (slot + 1, height - 1);
    }

    slot -= 2 * num_row_cells;

    if slot < num_col_cells {
        // First column
        (0, slot + 1)
    } else if slot < 2 * num_col_cells {
        // Last column
        slot -= num_col_cells;
        (width - 1, slot + 1)
    } else {
        unreachable!("edge slot {slot} outside every perimeter segment")
    }
}

/// Every perimeter cell, corners included, as zero-based `(column, row)`.
#[must_use]
pub fn edge_coordinates(height: u32, width: u32) -> Vec<(u32, u32)> {
    let mut edges = Vec::new();
    for x in 0..width {
        for y in 0..height {
            if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                edges.push((x, y));
            }
        }
    }
    edges
}

/// Translate zero-based storage coordinates onto the centered grid.
fn edge_to_location(grid: &Grid, x: u32, y: u32) -> Location {
    Location::new(grid.min_x() + x as i32, grid.min_y() + y as i32)
}

/// True if the habitable neighbours of `location` still form one group.
fn all_habitable_neighbours_connected(grid: &Grid, location: Location) -> bool {
    let neighbours = adjacent_habitable(grid, location);

    // The cell was habitable and joined to the region a moment ago
    assert!(
        !neighbours.is_empty(),
        "habitable cell {location} had no habitable neighbours"
    );

    neighbours
        .windows(2)
        .all(|pair| path_exists(grid, pair[0], pair[1]))
}
