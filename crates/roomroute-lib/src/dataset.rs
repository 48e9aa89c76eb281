use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};

/// Default filename for the room snapshot database.
const SNAPSHOT_FILENAME: &str = "rooms.db";

/// Environment variable overriding the snapshot location.
pub const SNAPSHOT_ENV_VAR: &str = "ROOMROUTE_SNAPSHOT";

/// Resolve the default snapshot location using platform-specific project directories.
pub fn default_snapshot_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "roomroute", "roomroute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(SNAPSHOT_FILENAME))
}

/// Locate the snapshot file to load.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `ROOMROUTE_SNAPSHOT` environment variable.
/// 3. Platform-specific project data directory.
///
/// Paths without an extension are treated as directories holding `rooms.db`.
/// The resolved file must exist.
pub fn resolve_snapshot_path(target: Option<&Path>) -> Result<PathBuf> {
    let resolved = if let Some(explicit) = target {
        canonical_snapshot_path(explicit)
    } else if let Some(env_path) = env::var_os(SNAPSHOT_ENV_VAR) {
        canonical_snapshot_path(Path::new(&env_path))
    } else {
        default_snapshot_path()?
    };

    debug!(path = %resolved.display(), "resolved room snapshot path");

    if !resolved.is_file() {
        return Err(Error::SnapshotNotFound { path: resolved });
    }
    Ok(resolved)
}

fn canonical_snapshot_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        return path.to_path_buf();
    }

    path.join(SNAPSHOT_FILENAME)
}
