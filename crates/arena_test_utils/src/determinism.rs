//! Determinism testing utilities.
//!
//! Provides a harness for verifying that arena generation and round
//! reconciliation produce identical results given identical seeds.
//!
//! # Testing Strategy
//!
//! Every random decision in `arena_core` draws from an injected RNG, so the
//! same settings must always give the same arena. Sources of divergence to
//! watch for:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Cells are always walked in grid storage order, never through a map.
//!
//! - **Hidden randomness**: No `thread_rng()` in library code. All
//!   randomness goes through the arena's seeded `ChaCha8Rng`.
//!
//! - **Snapshot drift**: A world map written to RON and read back must hash
//!   the same as before.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use arena_core::arena::Arena;
use arena_core::settings::ArenaSettings;
use arena_core::world_map::WorldMap;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of rounds played.
    pub rounds: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic arena).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs were deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Arena is non-deterministic!\n\
                 Runs: {}\n\
                 Rounds: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.rounds,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a setup/step loop multiple times and verify the final hashes match.
///
/// # Arguments
///
/// * `runs` - Number of independent runs
/// * `rounds` - Number of steps per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance state by one round
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    rounds: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..rounds {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        rounds,
    }
}

/// Build the same arena twice, play `rounds` reconciliations for
/// `num_avatars`, and compare final world hashes.
///
/// # Panics
///
/// Panics if `settings` are invalid or a round fails.
pub fn verify_arena_determinism(
    settings: &ArenaSettings,
    rounds: u64,
    num_avatars: usize,
) -> DeterminismResult {
    verify_determinism(
        2,
        rounds,
        || Arena::new(settings.clone()).expect("valid arena settings"),
        |arena| {
            arena
                .reconstruct_interactive_state(num_avatars)
                .expect("round reconciliation");
        },
        |arena| arena.world().state_hash(),
    )
}

/// Compare two arena runs round-by-round, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs agree throughout, `Some(round)` for the first round
/// where they differ (0 means the generated maps already differ).
///
/// # Panics
///
/// Panics if `settings` are invalid or a round fails.
pub fn find_first_divergence(
    settings: &ArenaSettings,
    rounds: u64,
    num_avatars: usize,
) -> Option<u64> {
    let mut first = Arena::new(settings.clone()).expect("valid arena settings");
    let mut second = Arena::new(settings.clone()).expect("valid arena settings");

    if first.world().state_hash() != second.world().state_hash() {
        return Some(0);
    }

    for round in 1..=rounds {
        first
            .reconstruct_interactive_state(num_avatars)
            .expect("round reconciliation");
        second
            .reconstruct_interactive_state(num_avatars)
            .expect("round reconciliation");

        if first.world().state_hash() != second.world().state_hash() {
            return Some(round);
        }
    }

    None
}

/// Generate arenas on several threads at once and collect their hashes.
///
/// # Panics
///
/// Panics if `settings` are invalid or a thread panics.
pub fn run_parallel_arenas_scoped(
    settings: &ArenaSettings,
    num_arenas: usize,
    rounds: u64,
    num_avatars: usize,
) -> DeterminismResult {
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_arenas)
            .map(|_| {
                s.spawn(|| {
                    let mut arena = Arena::new(settings.clone()).expect("valid arena settings");
                    for _ in 0..rounds {
                        arena
                            .reconstruct_interactive_state(num_avatars)
                            .expect("round reconciliation");
                    }
                    arena.world().state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        rounds,
    }
}

/// Verify that a RON snapshot round-trip preserves world state exactly.
pub fn verify_snapshot_round_trip(world: &WorldMap) -> bool {
    let Ok(text) = ron::to_string(world) else {
        return false;
    };
    let Ok(restored) = ron::from_str::<WorldMap>(&text) else {
        return false;
    };
    restored.state_hash() == world.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for arena testing.
pub mod strategies {
    use arena_core::map_generation::MapConfig;
    use arena_core::settings::ArenaSettings;
    use proptest::prelude::*;

    /// Odd map dimension from 3 up to `max` (inclusive when odd).
    ///
    /// # Panics
    ///
    /// Panics if `max` is below 3, the smallest valid dimension.
    pub fn arb_odd_dimension(max: u32) -> impl Strategy<Value = u32> {
        assert!(max >= 3, "arb_odd_dimension needs max >= 3, got {max}");
        (1..=(max - 1) / 2).prop_map(|half| 2 * half + 1)
    }

    /// Obstacle ratio covering both ends of `[0, 1]`.
    pub fn arb_obstacle_ratio() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.0), Just(1.0), 0.0..=1.0f64]
    }

    /// A valid map config no larger than `max_dim` on either side.
    pub fn arb_map_config(max_dim: u32) -> impl Strategy<Value = MapConfig> {
        (arb_odd_dimension(max_dim), arb_odd_dimension(max_dim), arb_obstacle_ratio())
            .prop_map(|(width, height, ratio)| MapConfig::new(width, height, ratio))
    }

    /// Valid arena settings with a random seed and map.
    pub fn arb_arena_settings(max_dim: u32) -> impl Strategy<Value = ArenaSettings> {
        (any::<u64>(), arb_map_config(max_dim)).prop_map(|(seed, map)| {
            ArenaSettings::default().with_seed(seed).with_map(map)
        })
    }
}
