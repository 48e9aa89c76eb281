use std::path::PathBuf;

use thiserror::Error;

use crate::db::RoomId;

/// Convenient result alias for the roomroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the query itself is malformed (empty target, equal endpoints, zero bounds).
    #[error("invalid route query: {reason}")]
    InvalidInput { reason: String },

    /// Raised when the start room id is not part of the snapshot.
    #[error("unknown room id: {id}")]
    UnknownRoomId { id: RoomId },

    /// Raised when a room name could not be resolved against the snapshot.
    #[error("unknown room name: {name}{}", format_suggestions(.suggestions))]
    UnknownRoom {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a room name query matches more than one room.
    #[error("room name '{query}' is ambiguous; matches {}", quote_all(.candidates))]
    AmbiguousRoom {
        query: String,
        candidates: Vec<String>,
    },

    /// Raised when no simple path exists within the enumeration bounds.
    #[error("no path found between {start} and {target}")]
    NoPathFound { start: String, target: String },

    /// Raised when a ranked route does not start or end where it was asked to.
    #[error("internal inconsistency: {reason}")]
    InternalInconsistency { reason: String },

    /// Snapshot file could not be located at the resolved path.
    #[error("room snapshot not found at {path}")]
    SnapshotNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the default snapshot location")]
    ProjectDirsUnavailable,

    /// Raised when attempting to load a database schema that is not supported.
    #[error("unsupported snapshot schema; expected rooms/connections tables")]
    UnsupportedSchema,

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON snapshot parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Coarse failure classes that callers map onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInput,
    NotFound,
    NoPathFound,
    InternalInconsistency,
    Storage,
}

impl Error {
    /// Classify this error for transport-level mapping.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::InvalidInput { .. } => FailureKind::InvalidInput,
            Error::UnknownRoomId { .. }
            | Error::UnknownRoom { .. }
            | Error::AmbiguousRoom { .. } => FailureKind::NotFound,
            Error::NoPathFound { .. } => FailureKind::NoPathFound,
            Error::InternalInconsistency { .. } => FailureKind::InternalInconsistency,
            Error::SnapshotNotFound { .. }
            | Error::ProjectDirsUnavailable
            | Error::UnsupportedSchema
            | Error::Sqlite(_)
            | Error::Io(_)
            | Error::Json(_) => FailureKind::Storage,
        }
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(". Did you mean one of: {}?", quote_all(suggestions))
    }
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ")
}
