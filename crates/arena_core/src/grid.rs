//! Odd-sized cell grid with centered coordinates.
//!
//! Locations range over `[min_x, max_x) x [min_y, max_y)` with `(0, 0)` in
//! the middle. Storage is a dense row-major `Vec` indexed through the
//! zig-zag mapping, which folds signed coordinates onto `0, 1, 2, ...`:
//!
//! ```text
//! coordinate:  0  -1   1  -2   2  -3   3
//! index:       0   1   2   3   4   5   6
//! ```

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Map a signed axis coordinate to its storage index.
///
/// Non-negative `n` maps to `2n`, negative `n` to `-2n - 1`.
#[inline]
#[must_use]
pub const fn zigzag_encode(n: i32) -> usize {
    let n = n as i64;
    if n >= 0 {
        (2 * n) as usize
    } else {
        (-2 * n - 1) as usize
    }
}

/// Inverse of [`zigzag_encode`].
#[inline]
#[must_use]
pub const fn zigzag_decode(index: usize) -> i32 {
    let index = index as i64;
    if index % 2 == 0 {
        (index / 2) as i32
    } else {
        (-(index + 1) / 2) as i32
    }
}

/// Axis coordinates in storage order: `0, -1, 1, -2, 2, ...` below an
/// exclusive bound.
///
/// This is the traversal the grid uses when laying out cells, so the n-th
/// value yielded lands at storage index n.
#[derive(Debug, Clone)]
pub struct AlternatingAxis {
    next_index: usize,
    exclusive_max: i32,
}

impl AlternatingAxis {
    /// Walk the axis `(-exclusive_max, exclusive_max)` in zig-zag order.
    #[must_use]
    pub const fn new(exclusive_max: i32) -> Self {
        Self {
            next_index: 0,
            exclusive_max,
        }
    }
}

impl Iterator for AlternatingAxis {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let value = zigzag_decode(self.next_index);
        if value.abs() >= self.exclusive_max {
            return None;
        }
        self.next_index += 1;
        Some(value)
    }
}

/// Opaque handle to an avatar standing on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AvatarId(pub u64);

/// Restores health to the avatar that collects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HealthPickup {
    /// Health points restored.
    pub health_restored: u32,
}

impl HealthPickup {
    /// Health restored when nothing else is configured.
    pub const DEFAULT_HEALTH_RESTORED: u32 = 3;

    /// Create a pickup restoring `health_restored` points.
    #[must_use]
    pub const fn new(health_restored: u32) -> Self {
        Self { health_restored }
    }
}

impl Default for HealthPickup {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HEALTH_RESTORED)
    }
}

/// An item lying on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pickup {
    /// Health pack.
    Health(HealthPickup),
}

/// One position on the world grid.
///
/// Two cells are equal when they share a location; the mutable state is
/// ignored for equality and hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// Where this cell sits.
    pub location: Location,
    /// Whether avatars may stand on or cross this cell.
    pub habitable: bool,
    /// Whether standing here earns score.
    pub generates_score: bool,
    /// Avatar currently occupying the cell.
    pub avatar: Option<AvatarId>,
    /// Item waiting to be collected.
    pub pickup: Option<Pickup>,
}

impl Cell {
    /// A habitable, empty cell.
    #[must_use]
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            habitable: true,
            generates_score: false,
            avatar: None,
            pickup: None,
        }
    }

    /// Habitable and free of avatars, score and pickups.
    #[must_use]
    pub const fn is_potential_spawn(&self) -> bool {
        self.habitable && !self.generates_score && self.avatar.is_none() && self.pickup.is_none()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location.hash(state);
    }
}

/// Fixed-size grid of cells with odd width and height.
///
/// Deserialization re-checks the layout, so a snapshot whose dimensions,
/// bounds or cell order disagree is rejected instead of loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridSnapshot")]
pub struct Grid {
    width: u32,
    height: u32,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
    /// Row-major, rows and columns in zig-zag order.
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a fully habitable grid.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero or even.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0, "Grid width must be positive");
        assert!(height > 0, "Grid height must be positive");
        assert!(width % 2 == 1, "Grid width must be odd, got {width}");
        assert!(height % 2 == 1, "Grid height must be odd, got {height}");

        let (min_x, max_x) = axis_bounds(width);
        let (min_y, max_y) = axis_bounds(height);

        let mut cells = Vec::with_capacity((width as usize) * (height as usize));
        for y in AlternatingAxis::new(max_y) {
            for x in AlternatingAxis::new(max_x) {
                cells.push(Cell::new(Location::new(x, y)));
            }
        }
        debug_assert_eq!(cells.len(), (width as usize) * (height as usize));

        Self {
            width,
            height,
            min_x,
            max_x,
            min_y,
            max_y,
            cells,
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Smallest valid x (inclusive).
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Largest valid x (exclusive).
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Smallest valid y (inclusive).
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Largest valid y (exclusive).
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Check if a location lies on the grid.
    #[must_use]
    pub const fn contains_cell(&self, location: Location) -> bool {
        self.min_x <= location.x
            && location.x < self.max_x
            && self.min_y <= location.y
            && location.y < self.max_y
    }

    /// Get the cell at `location`.
    ///
    /// # Panics
    ///
    /// Panics if the location is off the grid.
    #[must_use]
    pub fn get_cell(&self, location: Location) -> &Cell {
        &self.cells[self.storage_index(location)]
    }

    /// Get the cell at `location` for mutation.
    ///
    /// # Panics
    ///
    /// Panics if the location is off the grid.
    pub fn get_cell_mut(&mut self, location: Location) -> &mut Cell {
        let index = self.storage_index(location);
        &mut self.cells[index]
    }

    /// Get the cell at `location`, or `None` if it is off the grid.
    #[must_use]
    pub fn try_get_cell(&self, location: Location) -> Option<&Cell> {
        self.contains_cell(location)
            .then(|| self.get_cell(location))
    }

    /// All cells in storage order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// All cells in storage order, mutably.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    fn storage_index(&self, location: Location) -> usize {
        assert!(
            self.contains_cell(location),
            "Location {location} is outside the {}x{} grid",
            self.width,
            self.height
        );
        zigzag_encode(location.y) * (self.width as usize) + zigzag_encode(location.x)
    }
}

/// Raw serialized form of a [`Grid`], checked before use.
#[derive(Deserialize)]
struct GridSnapshot {
    width: u32,
    height: u32,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
    cells: Vec<Cell>,
}

impl TryFrom<GridSnapshot> for Grid {
    type Error = String;

    fn try_from(snapshot: GridSnapshot) -> Result<Self, Self::Error> {
        let GridSnapshot {
            width,
            height,
            min_x,
            max_x,
            min_y,
            max_y,
            cells,
        } = snapshot;

        if width % 2 == 0 || height % 2 == 0 {
            return Err(format!("grid must be odd-sized, got {width}x{height}"));
        }
        if (min_x, max_x) != axis_bounds(width) || (min_y, max_y) != axis_bounds(height) {
            return Err(format!(
                "bounds [{min_x}, {max_x}) x [{min_y}, {max_y}) do not fit a {width}x{height} grid"
            ));
        }
        let expected = (width as usize) * (height as usize);
        if cells.len() != expected {
            return Err(format!(
                "{width}x{height} grid needs {expected} cells, got {}",
                cells.len()
            ));
        }

        let layout = Self::new(width, height);
        if let Some((index, cell)) = cells
            .iter()
            .enumerate()
            .find(|(index, cell)| cell.location != layout.cells[*index].location)
        {
            return Err(format!(
                "cell {index} is at {}, expected {}",
                cell.location, layout.cells[index].location
            ));
        }

        Ok(Self { cells, ..layout })
    }
}

/// `[min, max)` for an axis of `dim` cells centered on zero.
fn axis_bounds(dim: u32) -> (i32, i32) {
    let dim = dim as i32;
    ((-dim + 1).div_euclid(2), dim.div_euclid(2) + 1)
}
