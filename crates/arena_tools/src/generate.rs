//! Map previews and world snapshots.

use std::fmt;
use std::path::Path;

use arena_core::arena::Arena;
use arena_core::location::Location;
use arena_core::render::{legend, render_ascii};
use arena_core::settings::ArenaSettings;
use arena_core::world_map::WorldMap;
use ron::ser::PrettyConfig;
use tracing::info;

use crate::error::{Result, ToolError};

/// A generated map ready to print.
#[derive(Debug, Clone)]
pub struct Preview {
    /// Settings the map was generated from.
    pub settings: ArenaSettings,
    /// Edge cell kept open during generation.
    pub reserved_edge: Location,
    /// Number of obstacle cells.
    pub obstacles: usize,
    /// The generated world.
    pub world: WorldMap,
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = &self.settings.map;
        writeln!(
            f,
            "{}x{} arena, seed {}, obstacle ratio {}",
            map.width, map.height, self.settings.seed, map.obstacle_ratio
        )?;
        writeln!(
            f,
            "{} obstacles, reserved edge {}",
            self.obstacles, self.reserved_edge
        )?;
        writeln!(f)?;
        write!(f, "{}", render_ascii(&self.world))?;
        writeln!(f)?;
        write!(f, "{}", legend())
    }
}

/// Generate a map from `settings` for previewing.
///
/// # Errors
///
/// Returns an error if the settings are invalid.
pub fn preview_map(settings: &ArenaSettings) -> Result<Preview> {
    let arena = Arena::new(settings.clone())?;
    let reserved_edge = arena.reserved_edge();
    let world = arena.into_world();
    let obstacles = world.all_cells().filter(|c| !c.habitable).count();

    Ok(Preview {
        settings: settings.clone(),
        reserved_edge,
        obstacles,
        world,
    })
}

/// Write a world map to `path` as pretty RON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_snapshot(world: &WorldMap, path: &Path) -> Result<()> {
    let text = ron::ser::to_string_pretty(world, PrettyConfig::default())
        .map_err(|e| ToolError::Snapshot(e.to_string()))?;
    std::fs::write(path, text).map_err(|e| ToolError::io(path, e))?;
    info!("Wrote snapshot to {}", path.display());
    Ok(())
}
