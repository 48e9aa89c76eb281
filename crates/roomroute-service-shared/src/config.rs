//! Service configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `ROOMROUTE_DATA_PATH`: snapshot file (default `/data/rooms.db`)
//! - `SERVICE_PORT`: HTTP port (default `8080`)
//! - `ROOMROUTE_MAX_PATHS`: default enumeration cap per query
//! - `ROOMROUTE_MAX_DEPTH`: default route length bound in steps
//! - `ROOMROUTE_BLOCKING_PERCENT`: occupancy percentage at which a room blocks
//!
//! Unparseable or out-of-range values fall back to the default with a warning.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use roomroute_lib::{
    CapacityPolicy, RouteOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PATHS, FULL_CAPACITY_PERCENT,
    STRICT_CAPACITY_PERCENT,
};

/// Default snapshot location inside the service container.
pub const DEFAULT_DATA_PATH: &str = "/data/rooms.db";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Upper bound accepted for `max_paths`, from requests and the environment alike.
pub const MAX_PATHS_LIMIT: usize = 100;

/// Upper bound accepted for `max_depth`, from requests and the environment alike.
pub const MAX_DEPTH_LIMIT: usize = 32;

/// Process-level settings for a service binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub data_path: PathBuf,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let data_path = std::env::var_os("ROOMROUTE_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        let port = env_or("SERVICE_PORT", DEFAULT_PORT, |port| *port > 0);
        Self { data_path, port }
    }
}

/// Query defaults applied when a request leaves a bound unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathfindingConfig {
    pub max_paths: usize,
    pub max_depth: usize,
    /// Occupancy percentage at which a room blocks the optimal route.
    pub blocking_percent: u32,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_PATHS,
            max_depth: DEFAULT_MAX_DEPTH,
            blocking_percent: FULL_CAPACITY_PERCENT,
        }
    }
}

impl PathfindingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_paths: env_or("ROOMROUTE_MAX_PATHS", defaults.max_paths, |v| {
                (1..=MAX_PATHS_LIMIT).contains(v)
            }),
            max_depth: env_or("ROOMROUTE_MAX_DEPTH", defaults.max_depth, |v| {
                (1..=MAX_DEPTH_LIMIT).contains(v)
            }),
            blocking_percent: env_or(
                "ROOMROUTE_BLOCKING_PERCENT",
                defaults.blocking_percent,
                |v| (1..=FULL_CAPACITY_PERCENT).contains(v),
            ),
        }
    }

    /// Build library options, letting request overrides win over these defaults.
    ///
    /// `strict_capacity` tightens the blocking threshold to 90% but never
    /// loosens a stricter configured one.
    pub fn route_options(
        &self,
        max_paths: Option<usize>,
        max_depth: Option<usize>,
        strict_capacity: bool,
    ) -> RouteOptions {
        let blocking_percent = if strict_capacity {
            self.blocking_percent.min(STRICT_CAPACITY_PERCENT)
        } else {
            self.blocking_percent
        };
        RouteOptions {
            max_paths: max_paths.unwrap_or(self.max_paths),
            max_depth: max_depth.unwrap_or(self.max_depth),
            capacity: CapacityPolicy { blocking_percent },
            ..RouteOptions::default()
        }
    }
}

fn env_or<T>(key: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            warn!(key, value = %raw, default = %default, "ignoring invalid environment value");
            default
        }
    }
}
