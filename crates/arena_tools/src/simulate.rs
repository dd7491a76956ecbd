//! Headless round simulation.
//!
//! Avatars spawn on free cells, wander one step per round and eat any pickup
//! they land on. The world is reconciled after every round.

use std::fmt;

use arena_core::arena::Arena;
use arena_core::grid::AvatarId;
use arena_core::location::{Direction, Location};
use arena_core::settings::ArenaSettings;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;

/// Totals gathered over a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    /// Rounds played.
    pub rounds: u64,
    /// Avatars on the map.
    pub avatars: usize,
    /// Score cells created over the run.
    pub scores_spawned: usize,
    /// Score cells that faded out over the run.
    pub scores_despawned: usize,
    /// Pickups created over the run.
    pub pickups_spawned: usize,
    /// Pickups eaten by avatars.
    pub pickups_consumed: usize,
    /// Score cells at the end.
    pub final_score_cells: usize,
    /// Pickups on the map at the end.
    pub final_pickups: usize,
    /// Hash of the final world state.
    pub world_hash: u64,
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} rounds with {} avatars", self.rounds, self.avatars)?;
        writeln!(
            f,
            "score cells: {} spawned, {} despawned, {} at end",
            self.scores_spawned, self.scores_despawned, self.final_score_cells
        )?;
        writeln!(
            f,
            "pickups: {} spawned, {} consumed, {} at end",
            self.pickups_spawned, self.pickups_consumed, self.final_pickups
        )?;
        write!(f, "world hash: {:016x}", self.world_hash)
    }
}

/// Play `rounds` rounds with `num_avatars` wandering avatars.
///
/// # Errors
///
/// Returns an error if the settings are invalid or the map runs out of room.
pub fn run_simulation(
    settings: &ArenaSettings,
    rounds: u64,
    num_avatars: usize,
) -> Result<SimulationSummary> {
    let mut arena = Arena::new(settings.clone())?;

    let mut positions = spawn_avatars(&mut arena, num_avatars)?;

    let mut summary = SimulationSummary {
        rounds,
        avatars: num_avatars,
        ..Default::default()
    };

    for round in 0..rounds {
        for (id, position) in positions.iter_mut().enumerate() {
            summary.pickups_consumed += step_avatar(&mut arena, position, round as usize + id);
        }

        let report = arena.reconstruct_interactive_state(num_avatars)?;
        summary.scores_spawned += report.scores_spawned;
        summary.scores_despawned += report.scores_despawned;
        summary.pickups_spawned += report.pickups_spawned;
        debug!(round, ?report, "Round complete");
    }

    let world = arena.world();
    summary.final_score_cells = world.score_cells().count();
    summary.final_pickups = world.pickup_cells().count();
    summary.world_hash = world.state_hash();

    info!(rounds, avatars = num_avatars, "Simulation finished");
    Ok(summary)
}

/// Put avatars `0..num_avatars` on random free cells, returning where each landed.
fn spawn_avatars(arena: &mut Arena, num_avatars: usize) -> Result<Vec<Location>> {
    let mut positions = Vec::with_capacity(num_avatars);
    for id in 0..num_avatars {
        let location = arena.random_spawn_location()?;
        let placed = arena.world_mut().place_avatar(AvatarId(id as u64), location);
        assert!(placed, "spawn location {location} was not free");
        positions.push(location);
    }
    Ok(positions)
}

/// Move one step, trying directions in turn from `turn`. Returns pickups eaten.
fn step_avatar(arena: &mut Arena, position: &mut Location, turn: usize) -> usize {
    let world = arena.world_mut();
    let target = (0..Direction::ALL.len())
        .map(|offset| *position + Direction::ALL[(turn + offset) % Direction::ALL.len()])
        .find(|&candidate| world.can_move_to(candidate));

    let Some(target) = target else {
        return 0;
    };
    if !world.move_avatar(*position, target) {
        return 0;
    }
    *position = target;
    usize::from(world.consume_pickup(target).is_some())
}
