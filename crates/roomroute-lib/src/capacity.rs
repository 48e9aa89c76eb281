use std::fmt;

use serde::Serialize;

use crate::db::{Room, RoomId, RoomIndex};

/// A room blocks when it is at or above its maximum capacity.
pub const FULL_CAPACITY_PERCENT: u32 = 100;
/// Stricter policy: a room blocks from 90% occupancy onwards.
pub const STRICT_CAPACITY_PERCENT: u32 = 90;

/// Occupancy threshold at which a room stops being passable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPolicy {
    pub blocking_percent: u32,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self::full()
    }
}

impl CapacityPolicy {
    pub fn full() -> Self {
        Self {
            blocking_percent: FULL_CAPACITY_PERCENT,
        }
    }

    pub fn strict() -> Self {
        Self {
            blocking_percent: STRICT_CAPACITY_PERCENT,
        }
    }

    /// Integer comparison so thresholds are exact: `occupancy * 100 >= capacity * percent`.
    pub fn is_blocking(&self, room: &Room) -> bool {
        u64::from(room.occupancy) * 100
            >= u64::from(room.capacity_max) * u64::from(self.blocking_percent)
    }
}

/// Passability of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    #[default]
    Safe,
    Blocked,
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteStatus::Safe => "safe",
            RouteStatus::Blocked => "blocked",
        };
        f.write_str(value)
    }
}

/// A room on the route that meets the blocking threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockingRoom {
    pub id: RoomId,
    pub name: String,
    pub occupancy: u32,
    pub capacity_max: u32,
}

impl BlockingRoom {
    /// `occupancy/capacity`, e.g. `10/10`.
    pub fn occupancy_label(&self) -> String {
        format!("{}/{}", self.occupancy, self.capacity_max)
    }
}

/// Outcome of a capacity check along one route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapacityVerdict {
    pub status: RouteStatus,
    pub blocking_rooms: Vec<BlockingRoom>,
}

impl CapacityVerdict {
    pub fn is_blocked(&self) -> bool {
        self.status == RouteStatus::Blocked
    }
}

/// Check every room on `route` against `policy`, in route order.
pub fn evaluate_capacity(
    route: &[RoomId],
    rooms: &RoomIndex<'_>,
    policy: CapacityPolicy,
) -> CapacityVerdict {
    let blocking_rooms: Vec<BlockingRoom> = route
        .iter()
        .filter_map(|id| rooms.get(id))
        .filter(|room| policy.is_blocking(room))
        .map(|room| BlockingRoom {
            id: room.id,
            name: room.name.clone(),
            occupancy: room.occupancy,
            capacity_max: room.capacity_max,
        })
        .collect();

    let status = if blocking_rooms.is_empty() {
        RouteStatus::Safe
    } else {
        RouteStatus::Blocked
    };

    CapacityVerdict {
        status,
        blocking_rooms,
    }
}
