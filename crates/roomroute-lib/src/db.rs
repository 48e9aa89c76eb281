use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use rusqlite::{Connection as SqliteConnection, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Numeric identifier for a room.
pub type RoomId = i64;

/// Similarity floor for fuzzy room-name suggestions.
const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// A room with its capacity and live occupancy, as read from the room store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    #[serde(alias = "nama_ruangan")]
    pub name: String,
    #[serde(alias = "luas")]
    pub area: f64,
    #[serde(alias = "capacityMax", alias = "kapasitas_max")]
    pub capacity_max: u32,
    #[serde(default)]
    pub occupancy: u32,
}

impl Room {
    /// Fraction of capacity in use. Rooms without capacity report zero.
    pub fn occupancy_ratio(&self) -> f64 {
        if self.capacity_max == 0 {
            return 0.0;
        }
        f64::from(self.occupancy) / f64::from(self.capacity_max)
    }

    /// Traffic-light classification of the current occupancy.
    pub fn occupancy_level(&self) -> OccupancyLevel {
        OccupancyLevel::classify(self.occupancy, self.capacity_max)
    }

    /// `occupancy/capacity`, e.g. `10/10`.
    pub fn occupancy_fraction(&self) -> String {
        format!("{}/{}", self.occupancy, self.capacity_max)
    }

    /// `occupancy/capacity (percent)`, e.g. `12/15 (80.0%)`.
    pub fn occupancy_label(&self) -> String {
        format!(
            "{} ({:.1}%)",
            self.occupancy_fraction(),
            self.occupancy_ratio() * 100.0
        )
    }
}

/// Occupancy bands shown on dashboards: below 70%, below 90%, and the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyLevel {
    Green,
    Yellow,
    Red,
}

impl OccupancyLevel {
    /// Integer comparison keeps the 70% and 90% band edges exact.
    pub fn classify(occupancy: u32, capacity_max: u32) -> Self {
        let scaled = u64::from(occupancy) * 100;
        let capacity = u64::from(capacity_max);
        if scaled < capacity * 70 {
            OccupancyLevel::Green
        } else if scaled < capacity * 90 {
            OccupancyLevel::Yellow
        } else {
            OccupancyLevel::Red
        }
    }
}

impl fmt::Display for OccupancyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            OccupancyLevel::Green => "green",
            OccupancyLevel::Yellow => "yellow",
            OccupancyLevel::Red => "red",
        };
        f.write_str(value)
    }
}

/// One undirected link between two rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: i64,
    #[serde(alias = "roomFrom")]
    pub room_from: RoomId,
    #[serde(alias = "roomTo")]
    pub room_to: RoomId,
}

impl Connection {
    pub fn is_self_loop(&self) -> bool {
        self.room_from == self.room_to
    }
}

/// Read-only view of the room store for the duration of one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl RoomSnapshot {
    pub fn new(rooms: Vec<Room>, connections: Vec<Connection>) -> Self {
        Self { rooms, connections }
    }

    /// Lookup a room by identifier.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Lookup a room by its exact, case-sensitive name.
    pub fn room_by_name(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.name == name)
    }

    /// Suggest room names similar to `query`, best match first.
    pub fn fuzzy_room_matches(&self, query: &str, limit: usize) -> Vec<String> {
        fuzzy_matches(&self.rooms, query, limit)
    }

    /// Report violations of the invariants the room store is expected to uphold.
    pub fn validate(&self) -> Vec<SnapshotIssue> {
        let mut issues = Vec::new();
        let mut ids = HashSet::new();
        let mut names = HashSet::new();

        for room in &self.rooms {
            if !ids.insert(room.id) {
                issues.push(SnapshotIssue::DuplicateRoomId { id: room.id });
            }
            if room.name.trim().is_empty() {
                issues.push(SnapshotIssue::EmptyName { id: room.id });
            } else if !names.insert(room.name.as_str()) {
                issues.push(SnapshotIssue::DuplicateName {
                    name: room.name.clone(),
                });
            }
            if room.area <= 0.0 {
                issues.push(SnapshotIssue::NonPositiveArea { id: room.id });
            }
            if room.capacity_max == 0 {
                issues.push(SnapshotIssue::NonPositiveCapacity { id: room.id });
            } else if room.occupancy > room.capacity_max {
                issues.push(SnapshotIssue::OccupancyExceedsCapacity {
                    id: room.id,
                    occupancy: room.occupancy,
                    capacity_max: room.capacity_max,
                });
            }
        }

        for connection in &self.connections {
            if connection.is_self_loop() {
                issues.push(SnapshotIssue::SelfLoop { id: connection.id });
                continue;
            }
            for endpoint in [connection.room_from, connection.room_to] {
                if !ids.contains(&endpoint) {
                    issues.push(SnapshotIssue::DanglingConnection {
                        id: connection.id,
                        room: endpoint,
                    });
                }
            }
        }

        issues
    }
}

/// Rooms keyed by id. The first room wins when ids repeat.
pub type RoomIndex<'a> = HashMap<RoomId, &'a Room>;

pub fn index_rooms(rooms: &[Room]) -> RoomIndex<'_> {
    let mut index = HashMap::with_capacity(rooms.len());
    for room in rooms {
        index.entry(room.id).or_insert(room);
    }
    index
}

/// A store-invariant violation found in a loaded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotIssue {
    DuplicateRoomId { id: RoomId },
    DuplicateName { name: String },
    EmptyName { id: RoomId },
    NonPositiveArea { id: RoomId },
    NonPositiveCapacity { id: RoomId },
    OccupancyExceedsCapacity {
        id: RoomId,
        occupancy: u32,
        capacity_max: u32,
    },
    SelfLoop { id: i64 },
    DanglingConnection { id: i64, room: RoomId },
}

impl fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRoomId { id } => write!(f, "room id {id} appears more than once"),
            Self::DuplicateName { name } => write!(f, "room name '{name}' appears more than once"),
            Self::EmptyName { id } => write!(f, "room {id} has an empty name"),
            Self::NonPositiveArea { id } => write!(f, "room {id} has a non-positive area"),
            Self::NonPositiveCapacity { id } => write!(f, "room {id} has no capacity"),
            Self::OccupancyExceedsCapacity {
                id,
                occupancy,
                capacity_max,
            } => write!(
                f,
                "room {id} occupancy {occupancy} exceeds capacity {capacity_max}"
            ),
            Self::SelfLoop { id } => write!(f, "connection {id} links a room to itself"),
            Self::DanglingConnection { id, room } => {
                write!(f, "connection {id} references unknown room {room}")
            }
        }
    }
}

pub(crate) fn fuzzy_matches(rooms: &[Room], query: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    let mut scored: Vec<(f64, &str)> = rooms
        .iter()
        .map(|room| {
            let score = strsim::jaro_winkler(&needle, &room.name.to_lowercase());
            (score, room.name.as_str())
        })
        .filter(|(score, _)| *score >= FUZZY_MATCH_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Load a snapshot from disk, choosing the format from the file extension.
///
/// `.json` files are parsed as `{ "rooms": [...], "connections": [...] }`;
/// anything else is opened as a SQLite database.
pub fn load_snapshot(path: &Path) -> Result<RoomSnapshot> {
    if !path.exists() {
        return Err(Error::SnapshotNotFound {
            path: path.to_path_buf(),
        });
    }

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let snapshot = if is_json {
        load_snapshot_json(path)?
    } else {
        load_snapshot_sqlite(path)?
    };

    for issue in snapshot.validate() {
        warn!(path = %path.display(), %issue, "snapshot invariant violated");
    }

    Ok(snapshot)
}

/// Parse a JSON snapshot document.
pub fn load_snapshot_json(path: &Path) -> Result<RoomSnapshot> {
    let raw = fs::read_to_string(path)?;
    let snapshot: RoomSnapshot = serde_json::from_str(&raw)?;
    debug!(
        path = %path.display(),
        rooms = snapshot.rooms.len(),
        connections = snapshot.connections.len(),
        "loaded json snapshot"
    );
    Ok(snapshot)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaVariant {
    Current,
    Legacy,
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SchemaVariant::Current => "current",
            SchemaVariant::Legacy => "legacy",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SchemaDefinition {
    variant: SchemaVariant,
    rooms_table: &'static str,
    room_id_column: &'static str,
    room_name_column: &'static str,
    room_area_column: &'static str,
    room_capacity_column: &'static str,
    room_occupancy_column: &'static str,
    connections_table: &'static str,
    connection_id_column: &'static str,
    connection_from_column: &'static str,
    connection_to_column: &'static str,
}

impl SchemaVariant {
    fn definition(self) -> SchemaDefinition {
        let (name, area, capacity) = match self {
            SchemaVariant::Current => ("name", "area", "capacity_max"),
            SchemaVariant::Legacy => ("nama_ruangan", "luas", "kapasitas_max"),
        };
        SchemaDefinition {
            variant: self,
            rooms_table: "rooms",
            room_id_column: "id",
            room_name_column: name,
            room_area_column: area,
            room_capacity_column: capacity,
            room_occupancy_column: "occupancy",
            connections_table: "connections",
            connection_id_column: "id",
            connection_from_column: "room_from",
            connection_to_column: "room_to",
        }
    }
}

/// Load rooms and connections from a SQLite database.
///
/// Both the current English column layout and the legacy layout of the
/// original room store (`nama_ruangan`, `luas`, `kapasitas_max`) are
/// detected at runtime. Connections that reference unknown rooms or loop back
/// onto their own room are dropped here so they never reach the graph.
pub fn load_snapshot_sqlite(path: &Path) -> Result<RoomSnapshot> {
    let connection = SqliteConnection::open(path)?;
    let schema = detect_schema(&connection)?;
    debug!(schema = %schema.variant, path = %path.display(), "loading room snapshot");

    let rooms = load_rooms(&connection, &schema)?;
    let connections = load_connections(&connection, &schema, &rooms)?;

    Ok(RoomSnapshot { rooms, connections })
}

fn detect_schema(connection: &SqliteConnection) -> Result<SchemaDefinition> {
    for variant in [SchemaVariant::Current, SchemaVariant::Legacy] {
        let schema = variant.definition();
        if schema_matches(connection, &schema)? {
            return Ok(schema);
        }
    }
    Err(Error::UnsupportedSchema)
}

fn schema_matches(connection: &SqliteConnection, schema: &SchemaDefinition) -> Result<bool> {
    if !table_exists(connection, schema.rooms_table)?
        || !table_exists(connection, schema.connections_table)?
    {
        return Ok(false);
    }

    let rooms_ok = table_has_columns(
        connection,
        schema.rooms_table,
        &[
            schema.room_id_column,
            schema.room_name_column,
            schema.room_area_column,
            schema.room_capacity_column,
            schema.room_occupancy_column,
        ],
    )?;
    let connections_ok = table_has_columns(
        connection,
        schema.connections_table,
        &[
            schema.connection_id_column,
            schema.connection_from_column,
            schema.connection_to_column,
        ],
    )?;

    Ok(rooms_ok && connections_ok)
}

fn load_rooms(connection: &SqliteConnection, schema: &SchemaDefinition) -> Result<Vec<Room>> {
    let sql = format!(
        "SELECT {id}, {name}, {area}, {capacity}, {occupancy} FROM {table} ORDER BY {id}",
        id = schema.room_id_column,
        name = schema.room_name_column,
        area = schema.room_area_column,
        capacity = schema.room_capacity_column,
        occupancy = schema.room_occupancy_column,
        table = schema.rooms_table
    );

    let mut stmt = connection.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_room)?;

    let mut rooms = Vec::new();
    for entry in rows {
        rooms.push(entry?);
    }
    Ok(rooms)
}

fn load_connections(
    connection: &SqliteConnection,
    schema: &SchemaDefinition,
    rooms: &[Room],
) -> Result<Vec<Connection>> {
    let sql = format!(
        "SELECT {id}, {from}, {to} FROM {table} ORDER BY {id}",
        id = schema.connection_id_column,
        from = schema.connection_from_column,
        to = schema.connection_to_column,
        table = schema.connections_table
    );

    let known: HashSet<RoomId> = rooms.iter().map(|room| room.id).collect();

    let mut stmt = connection.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(Connection {
            id: row.get(0)?,
            room_from: row.get(1)?,
            room_to: row.get(2)?,
        })
    })?;

    let mut connections = Vec::new();
    let mut skipped_edges = 0usize;
    for row in rows {
        let link = row?;
        if link.is_self_loop()
            || !known.contains(&link.room_from)
            || !known.contains(&link.room_to)
        {
            skipped_edges += 1;
            continue;
        }
        connections.push(link);
    }

    if skipped_edges > 0 {
        warn!(
            skipped_edges,
            "ignored connections referencing unknown rooms or looping onto themselves",
        );
    }

    Ok(connections)
}

fn row_to_room(row: &Row<'_>) -> rusqlite::Result<Room> {
    let capacity: Option<i64> = row.get(3)?;
    let occupancy: Option<i64> = row.get(4)?;
    Ok(Room {
        id: row.get(0)?,
        name: row.get(1)?,
        area: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
        capacity_max: clamp_count(capacity),
        occupancy: clamp_count(occupancy),
    })
}

fn clamp_count(value: Option<i64>) -> u32 {
    let value = value.unwrap_or(0).max(0);
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn table_exists(connection: &SqliteConnection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

fn table_has_columns(
    connection: &SqliteConnection,
    table: &str,
    required: &[&str],
) -> Result<bool> {
    let pragma = format!("PRAGMA table_info('{table}')");
    let mut stmt = connection.prepare(&pragma)?;
    let mut rows = stmt.query([])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        columns.push(name);
    }

    Ok(required.iter().all(|required| {
        columns
            .iter()
            .any(|column| column.eq_ignore_ascii_case(required))
    }))
}
