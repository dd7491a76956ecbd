//! A round's arena: the world map plus the RNG that drives it.
//!
//! Randomness is injected at construction, so two arenas built from the
//! same settings and seed play out identically.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::error::Result;
use crate::location::Location;
use crate::map_generation::generate_map_detailed;
use crate::settings::ArenaSettings;
use crate::world_map::{RoundReport, WorldMap};

/// Owns the world map for one round and the RNG that shapes it.
#[derive(Debug, Clone)]
pub struct Arena {
    settings: ArenaSettings,
    rng: ChaCha8Rng,
    world: WorldMap,
    reserved_edge: Location,
    round: u64,
}

impl Arena {
    /// Generate an arena, seeding the RNG from `settings.seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation.
    pub fn new(settings: ArenaSettings) -> Result<Self> {
        let rng = ChaCha8Rng::seed_from_u64(settings.seed);
        Self::with_rng(settings, rng)
    }

    /// Generate an arena with the default settings and the given seed.
    ///
    /// # Errors
    ///
    /// See [`Arena::new`].
    pub fn from_seed(seed: u64) -> Result<Self> {
        Self::new(ArenaSettings::default().with_seed(seed))
    }

    /// Generate an arena driven by an explicit RNG. `settings.seed` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation.
    pub fn with_rng(settings: ArenaSettings, mut rng: ChaCha8Rng) -> Result<Self> {
        settings.validate()?;

        let generated = generate_map_detailed(&settings.map, &mut rng)?;
        let mut world = generated.world;
        world.set_spawn_settings(settings.spawn.clone());

        info!(
            width = settings.map.width,
            height = settings.map.height,
            obstacles = generated.obstacles_placed,
            "Arena ready"
        );

        Ok(Self {
            settings,
            rng,
            world,
            reserved_edge: generated.reserved_edge,
            round: 0,
        })
    }

    /// Settings the arena was built from.
    #[must_use]
    pub const fn settings(&self) -> &ArenaSettings {
        &self.settings
    }

    /// The world map.
    #[must_use]
    pub const fn world(&self) -> &WorldMap {
        &self.world
    }

    /// The world map, for avatar logic.
    pub fn world_mut(&mut self) -> &mut WorldMap {
        &mut self.world
    }

    /// Give up the arena, keeping only the world map.
    #[must_use]
    pub fn into_world(self) -> WorldMap {
        self.world
    }

    /// Edge cell kept open during generation.
    #[must_use]
    pub const fn reserved_edge(&self) -> Location {
        self.reserved_edge
    }

    /// Number of completed reconciliations.
    #[must_use]
    pub const fn round_number(&self) -> u64 {
        self.round
    }

    /// Refresh score cells and pickups for `num_avatars` players.
    ///
    /// # Errors
    ///
    /// See [`WorldMap::reconstruct_interactive_state`].
    pub fn reconstruct_interactive_state(&mut self, num_avatars: usize) -> Result<RoundReport> {
        let report = self
            .world
            .reconstruct_interactive_state(num_avatars, &mut self.rng)?;
        self.round += 1;
        Ok(report)
    }

    /// A random free cell for an avatar to spawn on.
    ///
    /// # Errors
    ///
    /// See [`WorldMap::random_spawn_location`].
    pub fn random_spawn_location(&mut self) -> Result<Location> {
        self.world.random_spawn_location(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArenaError;
    use crate::grid::AvatarId;
    use crate::map_generation::MapConfig;

    #[test]
    fn test_same_seed_same_arena() {
        let mut a = Arena::from_seed(5).unwrap();
        let mut b = Arena::from_seed(5).unwrap();
        assert_eq!(a.world().state_hash(), b.world().state_hash());
        assert_eq!(a.reserved_edge(), b.reserved_edge());

        for _ in 0..10 {
            assert_eq!(
                a.reconstruct_interactive_state(4).unwrap(),
                b.reconstruct_interactive_state(4).unwrap()
            );
        }
        assert_eq!(a.world().state_hash(), b.world().state_hash());
        assert_eq!(a.random_spawn_location().unwrap(), b.random_spawn_location().unwrap());
    }

    #[test]
    fn test_invalid_settings() {
        let settings = ArenaSettings::default().with_map(MapConfig::new(10, 11, 0.2));
        assert_eq!(
            Arena::new(settings).unwrap_err(),
            ArenaError::InvalidDimensions { width: 10, height: 11 }
        );
    }

    #[test]
    fn test_round_counter() {
        let mut arena = Arena::from_seed(1).unwrap();
        assert_eq!(arena.round_number(), 0);
        arena.reconstruct_interactive_state(2).unwrap();
        arena.reconstruct_interactive_state(2).unwrap();
        assert_eq!(arena.round_number(), 2);
    }

    #[test]
    fn test_spawn_settings_carried_into_world() {
        let mut settings = ArenaSettings::default();
        settings.spawn.health_restored = 9;
        let arena = Arena::new(settings).unwrap();
        assert_eq!(arena.world().spawn_settings().health_restored, 9);
    }

    #[test]
    fn test_spawned_avatar_occupies_cell() {
        let mut arena = Arena::from_seed(3).unwrap();
        let location = arena.random_spawn_location().unwrap();
        assert!(arena.world_mut().place_avatar(AvatarId(1), location));
        assert!(!arena.world().can_move_to(location));
    }
}
