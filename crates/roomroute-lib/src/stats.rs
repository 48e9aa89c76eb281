use serde::Serialize;

use crate::db::{OccupancyLevel, Room};

/// Number of rooms in each occupancy band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

/// Aggregate occupancy figures across every room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomStats {
    pub total_rooms: usize,
    pub total_capacity: u64,
    pub total_occupancy: u64,
    /// Mean of per-room occupancy ratios, e.g. `42.5%`.
    pub average_occupancy: String,
    pub status_breakdown: StatusBreakdown,
}

impl RoomStats {
    pub fn from_rooms(rooms: &[Room]) -> Self {
        let mut breakdown = StatusBreakdown::default();
        for room in rooms {
            match room.occupancy_level() {
                OccupancyLevel::Green => breakdown.green += 1,
                OccupancyLevel::Yellow => breakdown.yellow += 1,
                OccupancyLevel::Red => breakdown.red += 1,
            }
        }

        let average_occupancy = if rooms.is_empty() {
            "0%".to_string()
        } else {
            let mean = rooms.iter().map(Room::occupancy_ratio).sum::<f64>() / rooms.len() as f64;
            format!("{:.1}%", mean * 100.0)
        };

        Self {
            total_rooms: rooms.len(),
            total_capacity: rooms.iter().map(|room| u64::from(room.capacity_max)).sum(),
            total_occupancy: rooms.iter().map(|room| u64::from(room.occupancy)).sum(),
            average_occupancy,
            status_breakdown: breakdown,
        }
    }
}
