//! Route scoring.
//!
//! A route's efficiency score blends a length term, which loses a fixed share
//! per step, with an occupancy term derived from the average fill ratio of the
//! rooms it passes through. The default weights are empirical constants kept
//! for parity with the deployed system; [`ScoringPolicy`] exposes them as
//! tunable policy.

use serde::Serialize;

use crate::db::{RoomId, RoomIndex};

/// Highest possible efficiency score.
pub const MAX_EFFICIENCY_SCORE: u32 = 100;

/// Weights used to turn a path into an efficiency score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    /// Weight of the length term.
    pub length_weight: f64,
    /// Weight of the occupancy term.
    pub occupancy_weight: f64,
    /// Share of the length term lost per edge traversed.
    pub step_penalty: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            length_weight: 0.4,
            occupancy_weight: 0.6,
            step_penalty: 0.1,
        }
    }
}

impl ScoringPolicy {
    /// Length term in `[0, 1]`: one step costs `step_penalty`, floored at zero.
    pub fn length_score(&self, step_count: usize) -> f64 {
        (1.0 - self.step_penalty * step_count as f64).max(0.0)
    }

    /// Combined score in `[0, 100]`.
    pub fn efficiency_score(&self, step_count: usize, avg_occupancy_ratio: f64) -> u32 {
        let occupancy_score = 1.0 - avg_occupancy_ratio;
        let raw = (self.length_weight * self.length_score(step_count)
            + self.occupancy_weight * occupancy_score)
            * 100.0;
        raw.round().clamp(0.0, f64::from(MAX_EFFICIENCY_SCORE)) as u32
    }
}

/// A candidate path together with its score and ranking annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRoute {
    pub path: Vec<RoomId>,
    pub room_names: Vec<String>,
    pub step_count: usize,
    pub avg_occupancy_ratio: f64,
    pub efficiency_score: u32,
    pub is_optimal: bool,
    /// Percentage of the optimal route's score, filled in by ranking.
    pub relative_to_optimal: u32,
}

impl ScoredRoute {
    /// Average occupancy formatted as a percentage, e.g. `20.0%`.
    pub fn avg_occupancy_label(&self) -> String {
        format!("{:.1}%", self.avg_occupancy_ratio * 100.0)
    }
}

/// Scores paths against one room snapshot.
#[derive(Debug)]
pub struct RouteScorer<'a> {
    rooms: &'a RoomIndex<'a>,
    policy: ScoringPolicy,
}

impl<'a> RouteScorer<'a> {
    pub fn new(rooms: &'a RoomIndex<'a>, policy: ScoringPolicy) -> Self {
        Self { rooms, policy }
    }

    /// Score a single path.
    ///
    /// Rooms missing from the snapshot are left out of the occupancy average.
    /// When none of the rooms are known the route scores zero.
    pub fn score(&self, path: &[RoomId]) -> ScoredRoute {
        let step_count = path.len().saturating_sub(1);

        let mut room_names = Vec::with_capacity(path.len());
        let mut ratio_sum = 0.0;
        let mut known = 0usize;
        for id in path {
            match self.rooms.get(id) {
                Some(room) => {
                    room_names.push(room.name.clone());
                    ratio_sum += room.occupancy_ratio();
                    known += 1;
                }
                None => room_names.push(id.to_string()),
            }
        }

        let (avg_occupancy_ratio, efficiency_score) = if known == 0 {
            (0.0, 0)
        } else {
            let avg = (ratio_sum / known as f64).clamp(0.0, 1.0);
            (avg, self.policy.efficiency_score(step_count, avg))
        };

        ScoredRoute {
            path: path.to_vec(),
            room_names,
            step_count,
            avg_occupancy_ratio,
            efficiency_score,
            is_optimal: false,
            relative_to_optimal: 0,
        }
    }

    pub fn score_all(&self, paths: &[Vec<RoomId>]) -> Vec<ScoredRoute> {
        paths.iter().map(|path| self.score(path)).collect()
    }
}
