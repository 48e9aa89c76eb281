mod common;

use std::fs;

use common::fixtures_dir;
use roomroute_lib::{
    build_graph, load_snapshot, load_snapshot_json, Error, FailureKind, Result, SnapshotIssue,
};
use rusqlite::Connection;
use tempfile::{tempdir, NamedTempFile};

#[test]
fn load_campus_fixture() -> Result<()> {
    let snapshot = load_snapshot_json(&fixtures_dir().join("campus.json"))?;

    assert_eq!(snapshot.rooms.len(), 8);
    assert_eq!(snapshot.connections.len(), 8);
    assert!(snapshot.validate().is_empty());

    let graph = build_graph(&snapshot);
    assert_eq!(graph.node_count(), 8);
    assert!(graph.neighbours(8).is_empty());
    Ok(())
}

#[test]
fn load_current_sqlite_schema() -> Result<()> {
    let file = NamedTempFile::new()?;
    let conn = Connection::open(file.path())?;
    conn.execute_batch(
        r#"
        CREATE TABLE rooms (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            area REAL NOT NULL,
            capacity_max INTEGER NOT NULL,
            occupancy INTEGER DEFAULT 0
        );
        CREATE TABLE connections (
            id INTEGER PRIMARY KEY,
            room_from INTEGER NOT NULL,
            room_to INTEGER NOT NULL
        );
        INSERT INTO rooms (id, name, area, capacity_max, occupancy) VALUES
            (2, 'Hall', 80.5, 10, 4),
            (1, 'Lobby', 40, 10, NULL),
            (3, 'Lab', 25.0, 5, 1);
        INSERT INTO connections (id, room_from, room_to) VALUES
            (1, 1, 2),
            (2, 2, 3),
            (3, 3, 3),
            (4, 3, 99);
        "#,
    )?;
    drop(conn);

    let snapshot = load_snapshot(file.path())?;

    let ids: Vec<i64> = snapshot.rooms.iter().map(|room| room.id).collect();
    assert_eq!(ids, vec![1, 2, 3], "rooms are ordered by id");
    assert_eq!(snapshot.rooms[0].occupancy, 0);
    assert_eq!(snapshot.rooms[0].area, 40.0);
    assert_eq!(snapshot.rooms[1].name, "Hall");
    assert_eq!(
        snapshot.connections.len(),
        2,
        "self-loops and dangling connections are skipped"
    );
    Ok(())
}

#[test]
fn load_legacy_sqlite_schema() -> Result<()> {
    let file = NamedTempFile::new()?;
    let conn = Connection::open(file.path())?;
    conn.execute_batch(
        r#"
        CREATE TABLE rooms (
            id INTEGER PRIMARY KEY,
            nama_ruangan TEXT NOT NULL,
            luas REAL NOT NULL,
            kapasitas_max INTEGER NOT NULL,
            occupancy INTEGER DEFAULT 0
        );
        CREATE TABLE connections (
            id INTEGER PRIMARY KEY,
            room_from INTEGER NOT NULL,
            room_to INTEGER NOT NULL
        );
        INSERT INTO rooms (id, nama_ruangan, luas, kapasitas_max, occupancy) VALUES
            (1, 'Aula', 200, 100, 20),
            (2, 'Perpustakaan', 150, 40, 36);
        INSERT INTO connections (id, room_from, room_to) VALUES (1, 1, 2);
        "#,
    )?;
    drop(conn);

    let snapshot = load_snapshot(file.path())?;
    assert_eq!(snapshot.rooms.len(), 2);
    assert_eq!(snapshot.rooms[1].name, "Perpustakaan");
    assert_eq!(snapshot.rooms[1].capacity_max, 40);
    assert_eq!(snapshot.connections.len(), 1);
    Ok(())
}

#[test]
fn rejects_schema_with_missing_columns() {
    let file = NamedTempFile::new().expect("tempfile");
    let conn = Connection::open(file.path()).expect("open temp db");
    conn.execute_batch(
        r#"
        CREATE TABLE rooms (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE connections (
            id INTEGER PRIMARY KEY,
            room_from INTEGER NOT NULL,
            room_to INTEGER NOT NULL
        );
        "#,
    )
    .expect("create schema");
    drop(conn);

    let err = load_snapshot(file.path()).expect_err("should reject schema");
    assert!(matches!(err, Error::UnsupportedSchema));
    assert_eq!(err.kind(), FailureKind::Storage);
}

#[test]
fn missing_snapshot_is_reported() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nowhere.json");
    let err = load_snapshot(&path).expect_err("file is missing");
    assert!(matches!(err, Error::SnapshotNotFound { .. }));
}

#[test]
fn invariant_violations_are_reported_not_fatal() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("overfull.json");
    fs::write(
        &path,
        r#"{
            "rooms": [
                {"id": 1, "name": "Lobby", "area": 10.0, "capacityMax": 5, "occupancy": 7},
                {"id": 2, "name": "Hall", "area": 0.0, "capacityMax": 5}
            ],
            "connections": [{"id": 1, "roomFrom": 1, "roomTo": 2}]
        }"#,
    )?;

    let snapshot = load_snapshot(&path)?;
    let issues = snapshot.validate();
    assert!(issues.contains(&SnapshotIssue::OccupancyExceedsCapacity {
        id: 1,
        occupancy: 7,
        capacity_max: 5
    }));
    assert!(issues.contains(&SnapshotIssue::NonPositiveArea { id: 2 }));
    assert_eq!(snapshot.rooms[1].occupancy, 0);
    Ok(())
}
