use std::fmt::Write;

use serde::Serialize;

use crate::capacity::{BlockingRoom, CapacityVerdict, RouteStatus};
use crate::db::{Room, RoomId};
use crate::scoring::ScoredRoute;

/// Presentation style for turning a [`RouteResult`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
    Note,
}

/// One ranked route as exposed to consumers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub route: Vec<String>,
    pub steps: usize,
    pub score: u32,
    /// Average occupancy, e.g. `20.0%`.
    pub avg_occupancy: String,
    /// Share of the optimal score, e.g. `88%`.
    pub relative_to_optimal: String,
    pub is_optimal: bool,
}

impl From<&ScoredRoute> for RouteEntry {
    fn from(route: &ScoredRoute) -> Self {
        Self {
            route: route.room_names.clone(),
            steps: route.step_count,
            score: route.efficiency_score,
            avg_occupancy: route.avg_occupancy_label(),
            relative_to_optimal: format!("{}%", route.relative_to_optimal),
            is_optimal: route.is_optimal,
        }
    }
}

/// Outcome of a successful route query.
///
/// Serialises to the JSON contract consumed by the dashboard. The ranked
/// routes, resolved endpoint ids and blocking room details are kept for
/// in-process callers but left out of the payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub status: RouteStatus,
    pub optimal_route: Vec<String>,
    pub all_routes: Vec<RouteEntry>,
    pub origin_room: String,
    pub target_room: String,
    /// Target occupancy, e.g. `12/15 (80.0%)`.
    pub target_occupancy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_rooms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_occupancy: Option<Vec<String>>,
    #[serde(skip)]
    pub start_id: RoomId,
    #[serde(skip)]
    pub target_id: RoomId,
    #[serde(skip)]
    pub ranked: Vec<ScoredRoute>,
    #[serde(skip)]
    pub blocking_rooms: Vec<BlockingRoom>,
}

impl RouteResult {
    /// Assemble the result from ranked routes (best first) and the verdict on the best one.
    pub fn new(
        start: &Room,
        target: &Room,
        ranked: Vec<ScoredRoute>,
        verdict: CapacityVerdict,
    ) -> Self {
        let optimal_route = ranked
            .first()
            .map(|route| route.room_names.clone())
            .unwrap_or_default();
        let all_routes = ranked.iter().map(RouteEntry::from).collect();

        let (blocked_rooms, blocked_occupancy) = if verdict.is_blocked() {
            (
                Some(
                    verdict
                        .blocking_rooms
                        .iter()
                        .map(|room| room.name.clone())
                        .collect(),
                ),
                Some(
                    verdict
                        .blocking_rooms
                        .iter()
                        .map(BlockingRoom::occupancy_label)
                        .collect(),
                ),
            )
        } else {
            (None, None)
        };

        Self {
            status: verdict.status,
            optimal_route,
            all_routes,
            origin_room: start.name.clone(),
            target_room: target.name.clone(),
            target_occupancy: target.occupancy_label(),
            blocked_rooms,
            blocked_occupancy,
            start_id: start.id,
            target_id: target.id,
            ranked,
            blocking_rooms: verdict.blocking_rooms,
        }
    }

    /// Number of edges on the optimal route.
    pub fn optimal_steps(&self) -> usize {
        self.ranked.first().map_or(0, |route| route.step_count)
    }

    /// Render the result using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
            RouteRenderMode::Note => self.render_note(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} steps, status: {})",
            self.origin_room,
            self.target_room,
            self.optimal_steps(),
            self.status
        );
        let _ = writeln!(buffer, "Optimal: {}", self.optimal_route.join(" -> "));
        let _ = writeln!(buffer, "Target occupancy: {}", self.target_occupancy);
        for (name, occupancy) in self.blocked_pairs() {
            let _ = writeln!(buffer, "Blocked: {name} ({occupancy})");
        }

        let _ = writeln!(buffer, "Candidates:");
        for (index, entry) in self.all_routes.iter().enumerate() {
            let marker = if entry.is_optimal { "*" } else { " " };
            let _ = writeln!(
                buffer,
                "{marker}{:>2}: score {:>3} ({:>4}) steps {} avg {} | {}",
                index + 1,
                entry.score,
                entry.relative_to_optimal,
                entry.steps,
                entry.avg_occupancy,
                entry.route.join(" -> ")
            );
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route** _{} → {}_ ({} steps, status: `{}`)",
            self.origin_room,
            self.target_room,
            self.optimal_steps(),
            self.status
        );
        let _ = writeln!(buffer, "Target occupancy: `{}`", self.target_occupancy);
        for (name, occupancy) in self.blocked_pairs() {
            let _ = writeln!(buffer, "> **Blocked:** {name} (`{occupancy}`)");
        }
        for (index, entry) in self.all_routes.iter().enumerate() {
            let label = if entry.is_optimal { " **optimal**" } else { "" };
            let _ = writeln!(
                buffer,
                "* {:>2}. score `{}` ({}, avg {}){label}: {}",
                index + 1,
                entry.score,
                entry.relative_to_optimal,
                entry.avg_occupancy,
                entry.route.join(" → ")
            );
        }
        buffer
    }

    fn render_note(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "{} -> {} [{}]",
            self.origin_room, self.target_room, self.status
        );
        for name in &self.optimal_route {
            let _ = writeln!(buffer, "{name}");
        }
        buffer
    }

    fn blocked_pairs(&self) -> impl Iterator<Item = (&String, &String)> {
        self.blocked_rooms
            .iter()
            .flatten()
            .zip(self.blocked_occupancy.iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{find_path, RouteOptions};
    use crate::test_helpers::lobby_hall_lab;

    fn result(hall_occupancy: u32) -> RouteResult {
        let snapshot = lobby_hall_lab(hall_occupancy);
        find_path(
            &snapshot.rooms,
            &snapshot.connections,
            1,
            "Lab",
            &RouteOptions::default(),
        )
        .expect("route exists")
    }

    #[test]
    fn safe_result_omits_blocked_fields() {
        let json = serde_json::to_value(result(2)).expect("serialises");
        assert_eq!(json["status"], "safe");
        assert_eq!(json["optimalRoute"], serde_json::json!(["Lobby", "Hall", "Lab"]));
        assert_eq!(json["originRoom"], "Lobby");
        assert_eq!(json["targetRoom"], "Lab");
        assert_eq!(json["targetOccupancy"], "1/5 (20.0%)");
        assert_eq!(json["allRoutes"][0]["avgOccupancy"], "20.0%");
        assert_eq!(json["allRoutes"][0]["relativeToOptimal"], "100%");
        assert_eq!(json["allRoutes"][0]["isOptimal"], true);
        assert!(json.get("blockedRooms").is_none());
        assert!(json.get("blockedOccupancy").is_none());
        assert!(json.get("ranked").is_none());
    }

    #[test]
    fn blocked_result_lists_rooms_and_occupancy() {
        let json = serde_json::to_value(result(10)).expect("serialises");
        assert_eq!(json["status"], "blocked");
        assert_eq!(json["blockedRooms"], serde_json::json!(["Hall"]));
        assert_eq!(json["blockedOccupancy"], serde_json::json!(["10/10"]));
    }

    #[test]
    fn plain_render_mentions_route_and_blockers() {
        let text = result(10).render(RouteRenderMode::PlainText);
        assert!(text.contains("Route: Lobby -> Lab (2 steps, status: blocked)"));
        assert!(text.contains("Optimal: Lobby -> Hall -> Lab"));
        assert!(text.contains("Blocked: Hall (10/10)"));
    }

    #[test]
    fn note_render_lists_one_room_per_line() {
        let text = result(2).render(RouteRenderMode::Note);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Lobby -> Lab [safe]", "Lobby", "Hall", "Lab"]);
    }
}
