//! Application state for HTTP services.
//!
//! The state owns the most recent good [`RoomSnapshot`]. Occupancy changes
//! while the service runs, so handlers call [`AppState::current_snapshot`],
//! which re-reads the data path and keeps serving the previous snapshot when
//! the re-read fails.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use roomroute_lib::{load_snapshot, Error as LibError, RoomSnapshot};

use crate::config::PathfindingConfig;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The snapshot file does not exist.
    SnapshotNotFound(String),

    /// The snapshot exists but could not be loaded.
    SnapshotLoad(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SnapshotNotFound(path) => write!(f, "room snapshot not found: {path}"),
            Self::SnapshotLoad(e) => write!(f, "failed to load room snapshot: {e}"),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SnapshotLoad(e) => Some(e),
            Self::SnapshotNotFound(_) => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::SnapshotLoad(err)
    }
}

/// Shared application state for all axum handlers.
///
/// Cheap to clone; share it through axum's `State` extractor.
///
/// ```ignore
/// use axum::{extract::State, routing::get, Router};
/// use roomroute_service_shared::{AppState, PathfindingConfig};
///
/// async fn handler(State(state): State<AppState>) -> String {
///     state.current_snapshot().await.rooms.len().to_string()
/// }
///
/// let state = AppState::load("/data/rooms.db", PathfindingConfig::from_env())?;
/// let app = Router::new().route("/rooms", get(handler)).with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    data_path: Option<PathBuf>,
    config: PathfindingConfig,
    current: RwLock<LoadedSnapshot>,
}

#[derive(Clone)]
struct LoadedSnapshot {
    snapshot: Arc<RoomSnapshot>,
    loaded_at: DateTime<Utc>,
}

impl AppState {
    /// Load the initial snapshot from `data_path`.
    ///
    /// Later calls to [`current_snapshot`](Self::current_snapshot) re-read
    /// the same path.
    pub fn load(
        data_path: impl AsRef<Path>,
        config: PathfindingConfig,
    ) -> Result<Self, AppStateError> {
        let data_path = data_path.as_ref();
        if !data_path.is_file() {
            return Err(AppStateError::SnapshotNotFound(
                data_path.display().to_string(),
            ));
        }

        info!(path = %data_path.display(), "loading room snapshot");
        let snapshot = load_snapshot(data_path)?;
        info!(
            rooms = snapshot.rooms.len(),
            connections = snapshot.connections.len(),
            "room snapshot loaded"
        );

        Ok(Self::build(Some(data_path.to_path_buf()), snapshot, config))
    }

    /// Create state around a fixed, in-memory snapshot that is never re-read.
    pub fn from_snapshot(snapshot: RoomSnapshot, config: PathfindingConfig) -> Self {
        Self::build(None, snapshot, config)
    }

    fn build(data_path: Option<PathBuf>, snapshot: RoomSnapshot, config: PathfindingConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                data_path,
                config,
                current: RwLock::new(LoadedSnapshot {
                    snapshot: Arc::new(snapshot),
                    loaded_at: Utc::now(),
                }),
            }),
        }
    }

    /// Query defaults for pathfinding requests.
    pub fn config(&self) -> &PathfindingConfig {
        &self.inner.config
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.inner.data_path.as_deref()
    }

    /// The last good snapshot, without touching the data path.
    pub fn snapshot(&self) -> Arc<RoomSnapshot> {
        self.loaded().snapshot
    }

    /// When the last good snapshot was read.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded().loaded_at
    }

    /// Re-read the data path and return the freshest usable snapshot.
    ///
    /// Runs the blocking read on tokio's blocking pool.
    pub async fn current_snapshot(&self) -> Arc<RoomSnapshot> {
        if self.inner.data_path.is_none() {
            return self.snapshot();
        }

        let state = self.clone();
        match tokio::task::spawn_blocking(move || state.refresh()).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(error = %error, "snapshot refresh task failed; serving last good snapshot");
                self.snapshot()
            }
        }
    }

    /// Synchronous form of [`current_snapshot`](Self::current_snapshot).
    pub fn refresh(&self) -> Arc<RoomSnapshot> {
        let Some(path) = self.inner.data_path.as_deref() else {
            return self.snapshot();
        };

        match load_snapshot(path) {
            Ok(snapshot) => {
                debug!(rooms = snapshot.rooms.len(), "room snapshot refreshed");
                let loaded = LoadedSnapshot {
                    snapshot: Arc::new(snapshot),
                    loaded_at: Utc::now(),
                };
                let fresh = Arc::clone(&loaded.snapshot);
                *self
                    .inner
                    .current
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = loaded;
                fresh
            }
            Err(error) => {
                let last = self.loaded();
                warn!(
                    path = %path.display(),
                    error = %error,
                    last_loaded_at = %last.loaded_at.to_rfc3339(),
                    "failed to re-read room snapshot; serving last good snapshot"
                );
                last.snapshot
            }
        }
    }

    fn loaded(&self) -> LoadedSnapshot {
        self.inner
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded = self.loaded();
        f.debug_struct("AppState")
            .field("data_path", &self.inner.data_path)
            .field("room_count", &loaded.snapshot.rooms.len())
            .field("loaded_at", &loaded.loaded_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use roomroute_lib::{Connection, Room};
    use tempfile::tempdir;

    fn snapshot_json(lobby_occupancy: u32) -> String {
        format!(
            r#"{{
                "rooms": [
                    {{"id": 1, "name": "Lobby", "area": 40.0, "capacity_max": 10, "occupancy": {lobby_occupancy}}},
                    {{"id": 2, "name": "Lab", "area": 20.0, "capacity_max": 5, "occupancy": 1}}
                ],
                "connections": [{{"id": 1, "room_from": 1, "room_to": 2}}]
            }}"#
        )
    }

    #[test]
    fn from_snapshot_never_rereads() {
        let snapshot = RoomSnapshot::new(
            vec![Room {
                id: 1,
                name: "Lobby".to_string(),
                area: 10.0,
                capacity_max: 5,
                occupancy: 0,
            }],
            Vec::<Connection>::new(),
        );
        let state = AppState::from_snapshot(snapshot, PathfindingConfig::default());

        assert!(state.data_path().is_none());
        assert_eq!(state.refresh().rooms.len(), 1);
        assert!(format!("{state:?}").contains("room_count: 1"));
    }

    #[test]
    fn refresh_picks_up_new_occupancy() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("rooms.json");
        fs::write(&path, snapshot_json(2)).expect("write snapshot");

        let state = AppState::load(&path, PathfindingConfig::default()).expect("loads");
        assert_eq!(state.snapshot().rooms[0].occupancy, 2);

        fs::write(&path, snapshot_json(9)).expect("rewrite snapshot");
        assert_eq!(state.refresh().rooms[0].occupancy, 9);
        assert_eq!(state.snapshot().rooms[0].occupancy, 9);
    }

    #[test]
    fn refresh_falls_back_to_last_good_snapshot() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("rooms.json");
        fs::write(&path, snapshot_json(3)).expect("write snapshot");
        let state = AppState::load(&path, PathfindingConfig::default()).expect("loads");

        fs::write(&path, "{ not json").expect("corrupt snapshot");
        let snapshot = state.refresh();
        assert_eq!(snapshot.rooms.len(), 2);
        assert_eq!(snapshot.rooms[0].occupancy, 3);
    }

    #[tokio::test]
    async fn current_snapshot_refreshes_off_thread() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("rooms.json");
        fs::write(&path, snapshot_json(1)).expect("write snapshot");
        let state = AppState::load(&path, PathfindingConfig::default()).expect("loads");

        fs::write(&path, snapshot_json(7)).expect("rewrite snapshot");
        assert_eq!(state.current_snapshot().await.rooms[0].occupancy, 7);
    }

    #[test]
    fn load_reports_missing_file() {
        match AppState::load("/nonexistent/rooms.db", PathfindingConfig::default()) {
            Err(AppStateError::SnapshotNotFound(path)) => assert!(path.contains("nonexistent")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
