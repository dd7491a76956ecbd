//! Test fixtures and helpers.
//!
//! Pre-built maps and seeded RNGs for consistent testing.

use arena_core::grid::{AvatarId, Grid};
use arena_core::location::Location;
use arena_core::world_map::{SpawnSettings, WorldMap};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG for tests.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A fully open `width` x `height` world with default spawn settings.
#[must_use]
pub fn open_world(width: u32, height: u32) -> WorldMap {
    WorldMap::new(Grid::new(width, height))
}

/// An open world whose score cells never despawn and whose pickups always spawn.
///
/// Useful when a test needs exact counts after reconciliation.
#[must_use]
pub fn certain_world(width: u32, height: u32) -> WorldMap {
    WorldMap::with_spawn_settings(
        Grid::new(width, height),
        SpawnSettings {
            score_despawn_chance: 0.0,
            pickup_spawn_chance: 1.0,
            ..Default::default()
        },
    )
}

/// Close every cell in `locations`.
pub fn block_all(world: &mut WorldMap, locations: impl IntoIterator<Item = Location>) {
    for location in locations {
        if let Some(cell) = world.get_cell_mut(location) {
            cell.habitable = false;
        }
    }
}

/// Place avatars `0..count` on the first free cells in storage order.
///
/// Returns where each avatar was placed.
///
/// # Panics
///
/// Panics if the world has fewer than `count` free cells.
pub fn place_avatars(world: &mut WorldMap, count: u64) -> Vec<Location> {
    let free: Vec<Location> = world
        .all_cells()
        .filter(|c| c.habitable && c.avatar.is_none())
        .map(|c| c.location)
        .take(count as usize)
        .collect();
    assert_eq!(free.len() as u64, count, "not enough free cells for {count} avatars");

    for (id, &location) in free.iter().enumerate() {
        assert!(world.place_avatar(AvatarId(id as u64), location));
    }
    free
}
