//! The non-player world state and its per-round reconciliation.
//!
//! Between rounds some score cells fade out and new ones appear until there
//! are enough for the current player count. Health pickups trickle in the
//! same way, but each sampled cell only gets a pickup with a small chance,
//! which keeps pickups from appearing in bursts.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ArenaError, Result};
use crate::grid::{AvatarId, Cell, Grid, HealthPickup, Pickup};
use crate::location::Location;

/// Target densities and chances for round reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Score cells wanted per avatar (rounded up over all avatars).
    pub target_score_per_avatar: f64,
    /// Chance that a score cell stops scoring each round.
    pub score_despawn_chance: f64,
    /// Pickups wanted per avatar (rounded up over all avatars).
    pub target_pickups_per_avatar: f64,
    /// Chance that a sampled cell actually receives a pickup.
    pub pickup_spawn_chance: f64,
    /// Health restored by spawned pickups.
    pub health_restored: u32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            target_score_per_avatar: 0.5,
            score_despawn_chance: 0.02,
            target_pickups_per_avatar: 0.5,
            pickup_spawn_chance: 0.02,
            health_restored: HealthPickup::DEFAULT_HEALTH_RESTORED,
        }
    }
}

impl SpawnSettings {
    /// Check that chances lie in `[0, 1]` and targets are non-negative.
    pub fn validate(&self) -> Result<()> {
        let chances = [
            ("score_despawn_chance", self.score_despawn_chance),
            ("pickup_spawn_chance", self.pickup_spawn_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ArenaError::InvalidProbability { name, value });
            }
        }

        let targets = [
            ("target_score_per_avatar", self.target_score_per_avatar),
            ("target_pickups_per_avatar", self.target_pickups_per_avatar),
        ];
        for (name, value) in targets {
            if !value.is_finite() || value < 0.0 {
                return Err(ArenaError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }

    /// Score cells wanted for `num_avatars`.
    #[must_use]
    pub fn target_score_cells(&self, num_avatars: usize) -> usize {
        scaled_target(num_avatars, self.target_score_per_avatar)
    }

    /// Pickups wanted for `num_avatars`.
    #[must_use]
    pub fn target_pickups(&self, num_avatars: usize) -> usize {
        scaled_target(num_avatars, self.target_pickups_per_avatar)
    }
}

fn scaled_target(num_avatars: usize, per_avatar: f64) -> usize {
    (num_avatars as f64 * per_avatar).ceil() as usize
}

/// `count` distinct locations, sampled without replacement.
fn sample<R: Rng + ?Sized>(candidates: &[Location], count: usize, rng: &mut R) -> Vec<Location> {
    candidates.choose_multiple(rng, count).copied().collect()
}

/// What a round of reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Score cells that stopped scoring.
    pub scores_despawned: usize,
    /// Cells promoted to score cells.
    pub scores_spawned: usize,
    /// Pickups placed.
    pub pickups_spawned: usize,
}

/// The full non-player world state exposed to the rest of the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMap {
    grid: Grid,
    spawn: SpawnSettings,
}

impl WorldMap {
    /// Wrap a grid using the default spawn settings.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self::with_spawn_settings(grid, SpawnSettings::default())
    }

    /// Wrap a grid with explicit spawn settings.
    #[must_use]
    pub fn with_spawn_settings(grid: Grid, spawn: SpawnSettings) -> Self {
        Self { grid, spawn }
    }

    /// The underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Spawn settings used by [`Self::reconstruct_interactive_state`].
    #[must_use]
    pub const fn spawn_settings(&self) -> &SpawnSettings {
        &self.spawn
    }

    /// Replace the spawn settings.
    pub fn set_spawn_settings(&mut self, spawn: SpawnSettings) {
        self.spawn = spawn;
    }

    /// Every cell on the map.
    pub fn all_cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.cells()
    }

    /// Cells currently generating score.
    pub fn score_cells(&self) -> impl Iterator<Item = &Cell> {
        self.all_cells().filter(|c| c.generates_score)
    }

    /// Cells holding a pickup.
    pub fn pickup_cells(&self) -> impl Iterator<Item = &Cell> {
        self.all_cells().filter(|c| c.pickup.is_some())
    }

    /// Habitable cells with no score, avatar or pickup.
    pub fn potential_spawn_locations(&self) -> impl Iterator<Item = &Cell> {
        self.all_cells().filter(|c| c.is_potential_spawn())
    }

    /// Check if a location lies on the map.
    #[must_use]
    pub const fn is_on_map(&self, location: Location) -> bool {
        self.grid.contains_cell(location)
    }

    /// Get the cell at `location`, or `None` if it is off the map.
    #[must_use]
    pub fn get_cell(&self, location: Location) -> Option<&Cell> {
        self.grid.try_get_cell(location)
    }

    /// Get the cell at `location` for mutation, or `None` if it is off the map.
    pub fn get_cell_mut(&mut self, location: Location) -> Option<&mut Cell> {
        if self.is_on_map(location) {
            Some(self.grid.get_cell_mut(location))
        } else {
            None
        }
    }

    /// True if an avatar may step onto `location`.
    #[must_use]
    pub fn can_move_to(&self, location: Location) -> bool {
        self.get_cell(location)
            .is_some_and(|cell| cell.habitable && cell.avatar.is_none())
    }

    /// Put an avatar on a free cell. Returns `false` if the cell cannot take it.
    pub fn place_avatar(&mut self, avatar: AvatarId, location: Location) -> bool {
        if !self.can_move_to(location) {
            return false;
        }
        self.grid.get_cell_mut(location).avatar = Some(avatar);
        true
    }

    /// Take the avatar off a cell.
    pub fn remove_avatar(&mut self, location: Location) -> Option<AvatarId> {
        self.get_cell_mut(location)?.avatar.take()
    }

    /// Move the avatar at `from` to `to`.
    ///
    /// Returns `false` and leaves the map untouched if `from` is empty or `to`
    /// is not a legal destination.
    pub fn move_avatar(&mut self, from: Location, to: Location) -> bool {
        let Some(avatar) = self.get_cell(from).and_then(|c| c.avatar) else {
            return false;
        };
        if !self.can_move_to(to) {
            return false;
        }
        self.grid.get_cell_mut(from).avatar = None;
        self.grid.get_cell_mut(to).avatar = Some(avatar);
        true
    }

    /// Remove and return the pickup lying at `location`.
    pub fn consume_pickup(&mut self, location: Location) -> Option<Pickup> {
        self.get_cell_mut(location)?.pickup.take()
    }

    /// A uniformly random potential spawn location.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NoSpawnLocation`] if every cell is taken or blocked.
    pub fn random_spawn_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Location> {
        let candidates: Vec<Location> = self
            .potential_spawn_locations()
            .map(|c| c.location)
            .collect();
        candidates
            .choose(rng)
            .copied()
            .ok_or(ArenaError::NoSpawnLocation)
    }

    /// Refresh score cells and pickups for the next round.
    ///
    /// Despawn rolls are drawn and both shortfalls checked before any cell
    /// changes, so an error leaves the map exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InsufficientSpawnLocations`] if the map cannot
    /// hold the number of new score cells or pickup candidates required.
    pub fn reconstruct_interactive_state<R: Rng + ?Sized>(
        &mut self,
        num_avatars: usize,
        rng: &mut R,
    ) -> Result<RoundReport> {
        let despawn_chance = self.spawn.score_despawn_chance;
        let despawned: HashSet<Location> = self
            .score_cells()
            .map(|c| c.location)
            .filter(|_| rng.gen::<f64>() < despawn_chance)
            .collect();

        // Free cells once the despawns land, in storage order
        let candidates: Vec<Location> = self
            .all_cells()
            .filter(|c| {
                c.is_potential_spawn()
                    || (despawned.contains(&c.location)
                        && c.habitable
                        && c.avatar.is_none()
                        && c.pickup.is_none())
            })
            .map(|c| c.location)
            .collect();

        let remaining_scores = self.score_cells().count() - despawned.len();
        let scores_to_add = self
            .spawn
            .target_score_cells(num_avatars)
            .saturating_sub(remaining_scores);
        let pickups_to_add = self
            .spawn
            .target_pickups(num_avatars)
            .saturating_sub(self.pickup_cells().count());

        if scores_to_add > candidates.len() {
            return Err(ArenaError::InsufficientSpawnLocations {
                requested: scores_to_add,
                available: candidates.len(),
            });
        }
        let left_for_pickups = candidates.len() - scores_to_add;
        if pickups_to_add > left_for_pickups {
            return Err(ArenaError::InsufficientSpawnLocations {
                requested: pickups_to_add,
                available: left_for_pickups,
            });
        }

        for &location in &despawned {
            self.grid.get_cell_mut(location).generates_score = false;
        }
        if scores_to_add > 0 {
            for location in sample(&candidates, scores_to_add, rng) {
                self.grid.get_cell_mut(location).generates_score = true;
            }
        }
        let pickups_spawned = self.add_pickups(pickups_to_add, rng);

        let report = RoundReport {
            scores_despawned: despawned.len(),
            scores_spawned: scores_to_add,
            pickups_spawned,
        };
        debug!(num_avatars, ?report, "Reconstructed interactive state");
        Ok(report)
    }

    /// Sample `max_to_add` free cells and roll a spawn chance for each.
    fn add_pickups<R: Rng + ?Sized>(&mut self, max_to_add: usize, rng: &mut R) -> usize {
        if max_to_add == 0 {
            return 0;
        }

        let candidates: Vec<Location> = self
            .potential_spawn_locations()
            .map(|c| c.location)
            .collect();
        let pickup = Pickup::Health(HealthPickup::new(self.spawn.health_restored));
        let mut spawned = 0;
        for location in sample(&candidates, max_to_add, rng) {
            if rng.gen::<f64>() < self.spawn.pickup_spawn_chance {
                self.grid.get_cell_mut(location).pickup = Some(pickup);
                spawned += 1;
            }
        }
        spawned
    }

    /// Compute a hash of all cell state for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for cell in self.all_cells() {
            cell.location.hash(&mut hasher);
            cell.habitable.hash(&mut hasher);
            cell.generates_score.hash(&mut hasher);
            cell.avatar.hash(&mut hasher);
            cell.pickup.hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn open_map(size: u32) -> WorldMap {
        WorldMap::new(Grid::new(size, size))
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(2024)
    }

    #[test]
    fn test_default_spawn_settings() {
        let settings = SpawnSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.target_score_cells(4), 2);
        assert_eq!(settings.target_score_cells(3), 2);
        assert_eq!(settings.target_pickups(1), 1);
        assert_eq!(settings.target_pickups(0), 0);
    }

    #[test]
    fn test_spawn_settings_validation() {
        let bad_chance = SpawnSettings {
            pickup_spawn_chance: 1.5,
            ..Default::default()
        };
        assert_eq!(
            bad_chance.validate(),
            Err(ArenaError::InvalidProbability {
                name: "pickup_spawn_chance",
                value: 1.5
            })
        );

        let bad_target = SpawnSettings {
            target_score_per_avatar: -1.0,
            ..Default::default()
        };
        assert!(bad_target.validate().is_err());
    }

    #[test]
    fn test_can_move_to() {
        let mut map = open_map(5);
        assert!(!map.can_move_to(Location::new(3, 0)));
        assert!(!map.can_move_to(Location::new(0, -3)));
        assert!(map.can_move_to(Location::ORIGIN));

        map.get_cell_mut(Location::ORIGIN).unwrap().avatar = Some(AvatarId(1));
        assert!(!map.can_move_to(Location::ORIGIN));

        map.get_cell_mut(Location::new(1, 1)).unwrap().habitable = false;
        assert!(!map.can_move_to(Location::new(1, 1)));
    }

    #[test]
    fn test_get_cell_off_map_is_none() {
        let mut map = open_map(3);
        assert!(map.get_cell(Location::new(2, 2)).is_none());
        assert!(map.get_cell_mut(Location::new(-2, 0)).is_none());
        assert!(!map.is_on_map(Location::new(-2, 0)));
    }

    #[test]
    fn test_avatar_bookkeeping() {
        let mut map = open_map(5);
        let a = AvatarId(7);
        assert!(map.place_avatar(a, Location::ORIGIN));
        assert!(!map.place_avatar(AvatarId(8), Location::ORIGIN));

        assert!(map.move_avatar(Location::ORIGIN, Location::new(1, 0)));
        assert_eq!(map.get_cell(Location::new(1, 0)).unwrap().avatar, Some(a));
        assert!(map.get_cell(Location::ORIGIN).unwrap().avatar.is_none());

        // Nobody at the origin any more
        assert!(!map.move_avatar(Location::ORIGIN, Location::new(0, 1)));
        // Off the map
        assert!(!map.move_avatar(Location::new(1, 0), Location::new(3, 0)));

        assert_eq!(map.remove_avatar(Location::new(1, 0)), Some(a));
        assert_eq!(map.remove_avatar(Location::new(1, 0)), None);
    }

    #[test]
    fn test_consume_pickup() {
        let mut map = open_map(3);
        let pickup = Pickup::Health(HealthPickup::default());
        map.get_cell_mut(Location::ORIGIN).unwrap().pickup = Some(pickup);
        assert_eq!(map.pickup_cells().count(), 1);

        assert_eq!(map.consume_pickup(Location::ORIGIN), Some(pickup));
        assert_eq!(map.consume_pickup(Location::ORIGIN), None);
        assert_eq!(map.pickup_cells().count(), 0);
    }

    #[test]
    fn test_potential_spawn_locations_exclude_taken_cells() {
        let mut map = open_map(3);
        map.get_cell_mut(Location::new(-1, -1)).unwrap().habitable = false;
        map.get_cell_mut(Location::new(0, -1)).unwrap().generates_score = true;
        map.get_cell_mut(Location::new(1, -1)).unwrap().avatar = Some(AvatarId(1));
        map.get_cell_mut(Location::new(-1, 0)).unwrap().pickup =
            Some(Pickup::Health(HealthPickup::default()));

        assert_eq!(map.potential_spawn_locations().count(), 5);
    }

    #[test]
    fn test_random_spawn_location_is_free() {
        let mut map = open_map(5);
        map.get_cell_mut(Location::ORIGIN).unwrap().generates_score = true;
        let mut rng = rng();
        for _ in 0..100 {
            let location = map.random_spawn_location(&mut rng).unwrap();
            assert!(map.get_cell(location).unwrap().is_potential_spawn());
        }
    }

    #[test]
    fn test_random_spawn_location_on_full_map() {
        let mut map = open_map(1);
        map.get_cell_mut(Location::ORIGIN).unwrap().avatar = Some(AvatarId(1));
        assert_eq!(map.random_spawn_location(&mut rng()), Err(ArenaError::NoSpawnLocation));
    }

    #[test]
    fn test_score_cells_reach_target() {
        let mut map = open_map(9);
        let report = map.reconstruct_interactive_state(4, &mut rng()).unwrap();
        assert_eq!(report.scores_spawned, 2);
        assert_eq!(map.score_cells().count(), 2);
        assert!(map.score_cells().all(|c| c.habitable));
    }

    #[test]
    fn test_score_cells_never_exceed_target() {
        let mut map = open_map(9);
        let mut rng = rng();
        for _ in 0..200 {
            map.reconstruct_interactive_state(4, &mut rng).unwrap();
            assert_eq!(map.score_cells().count(), 2);
        }
    }

    #[test]
    fn test_existing_scores_above_target_are_kept() {
        let mut map = open_map(5);
        map.set_spawn_settings(SpawnSettings {
            score_despawn_chance: 0.0,
            ..Default::default()
        });
        for x in -2..=2 {
            map.get_cell_mut(Location::new(x, 0)).unwrap().generates_score = true;
        }
        let report = map.reconstruct_interactive_state(2, &mut rng()).unwrap();
        assert_eq!(report.scores_spawned, 0);
        assert_eq!(map.score_cells().count(), 5);
    }

    #[test]
    fn test_certain_despawn_then_respawn() {
        let mut map = open_map(5);
        map.set_spawn_settings(SpawnSettings {
            score_despawn_chance: 1.0,
            ..Default::default()
        });
        map.get_cell_mut(Location::ORIGIN).unwrap().generates_score = true;

        let report = map.reconstruct_interactive_state(2, &mut rng()).unwrap();
        assert_eq!(report.scores_despawned, 1);
        assert_eq!(report.scores_spawned, 1);
        assert_eq!(map.score_cells().count(), 1);
    }

    #[test]
    fn test_pickups_with_certain_spawn_chance() {
        let mut map = open_map(7);
        map.set_spawn_settings(SpawnSettings {
            pickup_spawn_chance: 1.0,
            health_restored: 5,
            ..Default::default()
        });
        let report = map.reconstruct_interactive_state(6, &mut rng()).unwrap();
        assert_eq!(report.pickups_spawned, 3);
        assert_eq!(map.pickup_cells().count(), 3);
        for cell in map.pickup_cells() {
            assert_eq!(cell.pickup, Some(Pickup::Health(HealthPickup::new(5))));
            assert!(!cell.generates_score);
        }

        // Already at target: nothing more
        let report = map.reconstruct_interactive_state(6, &mut rng()).unwrap();
        assert_eq!(report.pickups_spawned, 0);
    }

    #[test]
    fn test_pickups_with_zero_spawn_chance() {
        let mut map = open_map(7);
        map.set_spawn_settings(SpawnSettings {
            pickup_spawn_chance: 0.0,
            ..Default::default()
        });
        let mut rng = rng();
        for _ in 0..20 {
            let report = map.reconstruct_interactive_state(8, &mut rng).unwrap();
            assert_eq!(report.pickups_spawned, 0);
        }
        assert_eq!(map.pickup_cells().count(), 0);
    }

    #[test]
    fn test_insufficient_spawn_locations() {
        let mut map = open_map(3);
        let result = map.reconstruct_interactive_state(100, &mut rng());
        assert_eq!(
            result,
            Err(ArenaError::InsufficientSpawnLocations {
                requested: 50,
                available: 9
            })
        );
    }

    #[test]
    fn test_pickup_shortfall_leaves_map_untouched() {
        // 6 score cells fit on a 3x3 map, but then only 3 cells remain for 6 pickups
        let mut map = open_map(3);
        map.get_cell_mut(Location::ORIGIN).unwrap().generates_score = true;
        map.set_spawn_settings(SpawnSettings {
            score_despawn_chance: 1.0,
            ..Default::default()
        });
        let before = map.state_hash();

        let result = map.reconstruct_interactive_state(12, &mut rng());

        assert_eq!(
            result,
            Err(ArenaError::InsufficientSpawnLocations {
                requested: 6,
                available: 3
            })
        );
        assert_eq!(map.state_hash(), before);
        assert_eq!(map.score_cells().count(), 1);
        assert_eq!(map.pickup_cells().count(), 0);
    }

    #[test]
    fn test_despawned_cells_count_as_free() {
        // Every cell scores; with certain despawn all 9 are free again
        let mut map = open_map(3);
        for cell in map.grid.cells_mut() {
            cell.generates_score = true;
        }
        map.set_spawn_settings(SpawnSettings {
            score_despawn_chance: 1.0,
            pickup_spawn_chance: 1.0,
            ..Default::default()
        });

        let report = map.reconstruct_interactive_state(8, &mut rng()).unwrap();
        assert_eq!(report.scores_despawned, 9);
        assert_eq!(report.scores_spawned, 4);
        assert_eq!(report.pickups_spawned, 4);
        assert_eq!(map.potential_spawn_locations().count(), 1);
    }

    #[test]
    fn test_no_avatars_is_a_no_op() {
        let mut map = open_map(5);
        let before = map.state_hash();
        let report = map.reconstruct_interactive_state(0, &mut rng()).unwrap();
        assert_eq!(report, RoundReport::default());
        assert_eq!(map.state_hash(), before);
    }

    #[test]
    fn test_state_hash_tracks_changes() {
        let mut map = open_map(5);
        let before = map.state_hash();
        map.get_cell_mut(Location::ORIGIN).unwrap().generates_score = true;
        assert_ne!(map.state_hash(), before);
    }
}
