//! Settings validation utilities.

use std::path::Path;

use arena_core::settings::ArenaSettings;
use tracing::{debug, warn};

use crate::error::{Result, ToolError};

/// Load and validate a single RON settings file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or holds
/// out-of-range values.
pub fn validate_settings_file(path: &Path) -> Result<ArenaSettings> {
    let text = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    let settings = ArenaSettings::from_ron(&text).map_err(|source| ToolError::InvalidSettings {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Validated {}", path.display());
    Ok(settings)
}

/// Validate every `.ron` file in a directory.
///
/// Returns the number of files checked.
///
/// # Errors
///
/// Returns the first failure, after logging every bad file.
pub fn validate_data_directory(path: &Path) -> Result<usize> {
    let entries = std::fs::read_dir(path).map_err(|e| ToolError::io(path, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ToolError::io(path, e))?;
        let file = entry.path();
        if file.extension().is_some_and(|ext| ext == "ron") {
            files.push(file);
        }
    }
    files.sort();

    let mut first_error = None;
    for file in &files {
        if let Err(e) = validate_settings_file(file) {
            warn!("{e}");
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(files.len()),
    }
}
