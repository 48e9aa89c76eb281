mod common;

use std::collections::BTreeSet;

use common::{campus_snapshot, links, room};
use roomroute_lib::{
    build_graph, enumerate_paths_dfs, find_path, find_path_observed, CapacityPolicy,
    EnumerationStrategy, Error, FailureKind, PathLimits, RouteOptions, RouteStatus,
    TracingObserver,
};

fn chain(hall_occupancy: u32) -> (Vec<roomroute_lib::Room>, Vec<roomroute_lib::Connection>) {
    (
        vec![
            room(1, "Lobby", 10, 2),
            room(2, "Hall", 10, hall_occupancy),
            room(3, "Lab", 5, 1),
        ],
        links(&[(1, 2), (2, 3)]),
    )
}

#[test]
fn safe_route_through_chain() {
    let (rooms, connections) = chain(2);
    let result =
        find_path(&rooms, &connections, 1, "Lab", &RouteOptions::default()).expect("route exists");

    assert_eq!(result.optimal_route, vec!["Lobby", "Hall", "Lab"]);
    assert_eq!(result.status, RouteStatus::Safe);
    assert_eq!(result.start_id, 1);
    assert_eq!(result.target_id, 3);
    assert!(result.blocked_rooms.is_none());
}

#[test]
fn full_room_on_only_path_blocks_route() {
    let (rooms, connections) = chain(10);
    let result =
        find_path(&rooms, &connections, 1, "Lab", &RouteOptions::default()).expect("route exists");

    assert_eq!(result.optimal_route, vec!["Lobby", "Hall", "Lab"]);
    assert_eq!(result.status, RouteStatus::Blocked);
    assert_eq!(result.blocked_rooms, Some(vec!["Hall".to_string()]));
    assert_eq!(result.blocked_occupancy, Some(vec!["10/10".to_string()]));
}

#[test]
fn disconnected_room_has_no_path() {
    let (mut rooms, connections) = chain(2);
    rooms.push(room(4, "Annex", 10, 0));

    let err = find_path(&rooms, &connections, 1, "Annex", &RouteOptions::default())
        .expect_err("annex is unreachable");
    assert_eq!(err.kind(), FailureKind::NoPathFound);
    assert_eq!(err.to_string(), "no path found between Lobby and Annex");
}

#[test]
fn unknown_start_is_not_found() {
    let (rooms, connections) = chain(2);
    let err = find_path(&rooms, &connections, 42, "Lab", &RouteOptions::default())
        .expect_err("start is unknown");
    assert!(matches!(err, Error::UnknownRoomId { id: 42 }));
    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[test]
fn unknown_target_is_not_found() {
    let (rooms, connections) = chain(2);
    let err = find_path(&rooms, &connections, 1, "Gym", &RouteOptions::default())
        .expect_err("target is unknown");
    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[test]
fn quieter_parallel_route_is_optimal() {
    let rooms = vec![
        room(1, "Start", 10, 1),
        room(2, "Busy", 10, 9),
        room(3, "Quiet", 10, 1),
        room(4, "End", 10, 1),
    ];
    let connections = links(&[(1, 2), (2, 4), (1, 3), (3, 4)]);

    let result =
        find_path(&rooms, &connections, 1, "End", &RouteOptions::default()).expect("route exists");

    assert_eq!(result.optimal_route, vec!["Start", "Quiet", "End"]);
    assert!(result.all_routes[0].is_optimal);
    assert!(!result.all_routes[1].is_optimal);
    assert!(result.all_routes[0].score > result.all_routes[1].score);
    assert_eq!(result.ranked[0].path, vec![1, 3, 4]);
}

#[test]
fn campus_route_ranks_all_candidates() {
    let snapshot = campus_snapshot();
    let result = find_path(
        &snapshot.rooms,
        &snapshot.connections,
        1,
        "server",
        &RouteOptions::default(),
    )
    .expect("route exists");

    assert_eq!(
        result.optimal_route,
        vec!["Lobby", "Library", "Computer Lab", "Server Room"]
    );
    let scores: Vec<u32> = result.all_routes.iter().map(|route| route.score).collect();
    assert_eq!(scores, vec![73, 63, 56]);
    let relative: Vec<&str> = result
        .all_routes
        .iter()
        .map(|route| route.relative_to_optimal.as_str())
        .collect();
    assert_eq!(relative, vec!["100%", "86%", "77%"]);
    assert_eq!(result.target_occupancy, "1/5 (20.0%)");
}

#[test]
fn full_target_blocks_every_route() {
    let snapshot = campus_snapshot();
    let result = find_path(
        &snapshot.rooms,
        &snapshot.connections,
        1,
        "chemistry",
        &RouteOptions::default(),
    )
    .expect("route exists");

    assert_eq!(
        result.optimal_route,
        vec!["Lobby", "Library", "Computer Lab", "Chemistry Lab"]
    );
    assert_eq!(result.status, RouteStatus::Blocked);
    assert_eq!(result.blocked_rooms, Some(vec!["Chemistry Lab".to_string()]));
}

#[test]
fn ambiguous_target_is_not_found() {
    let snapshot = campus_snapshot();
    let err = find_path(
        &snapshot.rooms,
        &snapshot.connections,
        1,
        "lab",
        &RouteOptions::default(),
    )
    .expect_err("two labs match");
    assert_eq!(err.kind(), FailureKind::NotFound);
    assert!(err.to_string().contains("'Computer Lab', 'Chemistry Lab'"));
}

#[test]
fn strict_policy_flags_busy_rooms() {
    let rooms = vec![room(1, "Lobby", 10, 1), room(2, "Stage", 20, 18)];
    let connections = links(&[(1, 2)]);
    let strict = RouteOptions {
        capacity: CapacityPolicy::strict(),
        ..RouteOptions::default()
    };

    let default = find_path(&rooms, &connections, 1, "Stage", &RouteOptions::default())
        .expect("route exists");
    let flagged = find_path(&rooms, &connections, 1, "Stage", &strict).expect("route exists");

    assert_eq!(default.status, RouteStatus::Safe);
    assert_eq!(flagged.status, RouteStatus::Blocked);
}

#[test]
fn both_strategies_agree_on_the_optimal_route() {
    let snapshot = campus_snapshot();
    let bfs = RouteOptions {
        strategy: EnumerationStrategy::BreadthFirst,
        ..RouteOptions::default()
    };

    let depth_first = find_path(
        &snapshot.rooms,
        &snapshot.connections,
        1,
        "Server Room",
        &RouteOptions::default(),
    )
    .expect("dfs route");
    let breadth_first = find_path(
        &snapshot.rooms,
        &snapshot.connections,
        1,
        "Server Room",
        &bfs,
    )
    .expect("bfs route");

    assert_eq!(depth_first.optimal_route, breadth_first.optimal_route);
    assert_eq!(depth_first.all_routes.len(), breadth_first.all_routes.len());
}

#[test]
fn repeated_queries_are_identical() {
    let snapshot = campus_snapshot();
    let run = || {
        find_path_observed(
            &snapshot.rooms,
            &snapshot.connections,
            1,
            "Server Room",
            &RouteOptions::default(),
            Some(&TracingObserver),
        )
        .expect("route exists")
    };
    assert_eq!(run(), run());
}

#[test]
fn reversed_queries_yield_reversed_paths() {
    let snapshot = campus_snapshot();
    let graph = build_graph(&snapshot);
    let limits = PathLimits::default();

    let forward: BTreeSet<Vec<i64>> = enumerate_paths_dfs(&graph, 1, 7, limits)
        .into_iter()
        .collect();
    let backward: BTreeSet<Vec<i64>> = enumerate_paths_dfs(&graph, 7, 1, limits)
        .into_iter()
        .map(|mut path| {
            path.reverse();
            path
        })
        .collect();

    assert!(!forward.is_empty());
    assert_eq!(forward, backward);
}

#[test]
fn enumerated_paths_are_simple_and_bounded() {
    let snapshot = campus_snapshot();
    let graph = build_graph(&snapshot);

    for max_depth in 1..=6 {
        let limits = PathLimits {
            max_paths: 10,
            max_depth,
        };
        for start in 1..=8 {
            for target in 1..=8 {
                for path in enumerate_paths_dfs(&graph, start, target, limits) {
                    assert_eq!(path.first(), Some(&start));
                    assert_eq!(path.last(), Some(&target));
                    assert!(path.len() - 1 <= max_depth);
                    let unique: BTreeSet<i64> = path.iter().copied().collect();
                    assert_eq!(unique.len(), path.len(), "path {path:?} repeats a room");
                }
            }
        }
    }
}

#[test]
fn scores_stay_within_bounds() {
    let snapshot = campus_snapshot();
    for target in ["Main Hall", "Library", "Computer Lab", "Chemistry", "Cafeteria", "Server"] {
        let result = find_path(
            &snapshot.rooms,
            &snapshot.connections,
            1,
            target,
            &RouteOptions::default(),
        )
        .expect("route exists");
        assert!(result.ranked.iter().all(|route| route.efficiency_score <= 100));
        assert!(result
            .ranked
            .windows(2)
            .all(|pair| pair[0].efficiency_score >= pair[1].efficiency_score));
    }
}
