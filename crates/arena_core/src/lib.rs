//! # Arena Core
//!
//! Map generation and round state for a multiplayer grid arena.
//!
//! This crate contains **only** in-memory logic:
//! - No rendering beyond a plain-text dump
//! - No IO
//! - No hidden global randomness (every random decision takes an injected RNG)
//!
//! The arena is an odd-sized grid addressed by centered coordinates, so the
//! middle cell is always `(0, 0)`. Obstacles are only ever placed on the
//! perimeter, and every placement is checked so the habitable region stays
//! a single connected component.
//!
//! ## Crate Structure
//!
//! - [`location`] - Signed grid coordinates and the four movement directions
//! - [`grid`] - Zig-zag coordinate mapping and the cell grid
//! - [`pathfinding`] - Best-first connectivity search
//! - [`map_generation`] - Edge obstacle placement
//! - [`world_map`] - Score and pickup reconciliation between rounds
//! - [`arena`] - A round's world map together with its seeded RNG
//! - [`settings`] - RON-loadable configuration
//! - [`render`] - ASCII rendering

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod arena;
pub mod error;
pub mod grid;
pub mod location;
pub mod map_generation;
pub mod pathfinding;
pub mod render;
pub mod settings;
pub mod world_map;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::arena::Arena;
    pub use crate::error::{ArenaError, Result};
    pub use crate::grid::{AvatarId, Cell, Grid, HealthPickup, Pickup};
    pub use crate::location::{Direction, Location};
    pub use crate::map_generation::{generate_map, GeneratedMap, MapConfig};
    pub use crate::pathfinding::{find_path, path_exists};
    pub use crate::settings::ArenaSettings;
    pub use crate::world_map::{RoundReport, SpawnSettings, WorldMap};
}
