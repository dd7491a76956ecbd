//! Plain-text rendering of a world map for terminals and logs.
//!
//! North is up: the first line is the top row (`max_y - 1`).

use crate::grid::Cell;
use crate::location::Location;
use crate::world_map::WorldMap;

/// Character for an obstacle.
pub const OBSTACLE: char = '#';
/// Character for an open, empty cell.
pub const OPEN: char = '.';
/// Character for a score cell.
pub const SCORE: char = '$';
/// Character for a cell holding a pickup.
pub const PICKUP: char = '+';
/// Character for a cell holding an avatar.
pub const AVATAR: char = '@';

/// Character representation for a cell. Avatars hide whatever is under them.
#[must_use]
pub fn cell_char(cell: &Cell) -> char {
    if !cell.habitable {
        OBSTACLE
    } else if cell.avatar.is_some() {
        AVATAR
    } else if cell.pickup.is_some() {
        PICKUP
    } else if cell.generates_score {
        SCORE
    } else {
        OPEN
    }
}

/// Render the map, one line per row.
#[must_use]
pub fn render_ascii(world: &WorldMap) -> String {
    let grid = world.grid();
    let mut output = String::with_capacity(((grid.width() + 1) * grid.height()) as usize);

    for y in (grid.min_y()..grid.max_y()).rev() {
        for x in grid.min_x()..grid.max_x() {
            output.push(cell_char(grid.get_cell(Location::new(x, y))));
        }
        output.push('\n');
    }

    output
}

/// A one-line legend for [`render_ascii`] output.
#[must_use]
pub fn legend() -> String {
    format!("{OBSTACLE} obstacle  {OPEN} open  {SCORE} score  {PICKUP} pickup  {AVATAR} avatar")
}
