//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order. A
//! `schema_migrations` table tracks which versions have been applied.

use holocron_core::{Error, Result};
use rusqlite::Connection;

/// V1: catalog schema -- the six entity tables.
const V1_CATALOG: &str = r#"
-- Accounts
CREATE TABLE user (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    username  VARCHAR(100) NOT NULL UNIQUE,
    email     VARCHAR(120) NOT NULL UNIQUE,
    password  VARCHAR(80)  NOT NULL,
    is_active BOOLEAN      NOT NULL
);

-- Catalog entities
CREATE TABLE species (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             VARCHAR(250) NOT NULL,
    classification   VARCHAR(250),
    designation      VARCHAR(250),
    average_height   VARCHAR(20),
    skin_colors      VARCHAR(250),
    hair_colors      VARCHAR(250),
    eye_colors       VARCHAR(250),
    average_lifespan VARCHAR(20),
    homeworld        VARCHAR(250),
    language         VARCHAR(250),
    created          DATETIME,
    edited           DATETIME,
    url              VARCHAR(250)
);

CREATE TABLE character (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         VARCHAR(250) NOT NULL,
    height       INTEGER,
    mass         INTEGER,
    hair_color   VARCHAR(20),
    skin_color   VARCHAR(20),
    eyes_color   VARCHAR(20),
    birth_year   VARCHAR(20),
    gender       VARCHAR(20),
    created      DATETIME,
    edited       DATETIME,
    homeworld    VARCHAR(250),
    url          VARCHAR(250),
    species_id   INTEGER REFERENCES species(id) ON DELETE SET NULL,
    starship_ids TEXT NOT NULL DEFAULT '[]',
    vehicle_ids  TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE planet (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            VARCHAR(250) NOT NULL,
    diameter        INTEGER,
    rotation_period INTEGER,
    orbital_period  INTEGER,
    gravity         VARCHAR(20),
    population      INTEGER,
    climate         VARCHAR(20),
    terrain         VARCHAR(20),
    surface_water   TEXT,
    created         DATETIME,
    edited          DATETIME,
    url             VARCHAR(250)
);

CREATE TABLE vehicle (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    name                   VARCHAR(250) NOT NULL,
    model                  TEXT,
    manufacturer           TEXT,
    cost_in_credits        INTEGER,
    -- DECIMAL(20,1); TEXT affinity keeps the canonical string intact
    length                 TEXT,
    crew                   INTEGER,
    passengers             INTEGER,
    max_atmosphering_speed INTEGER,
    cargo_capacity         INTEGER,
    consumable             VARCHAR(20),
    films                  TEXT NOT NULL DEFAULT '[]',
    pilots                 TEXT NOT NULL DEFAULT '[]',
    created                DATETIME,
    edited                 DATETIME,
    url                    VARCHAR(250)
);

-- Favorites
CREATE TABLE favorite (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         VARCHAR(250) NOT NULL,
    user_id      INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
    character_id INTEGER REFERENCES character(id) ON DELETE SET NULL,
    planet_id    INTEGER REFERENCES planet(id) ON DELETE SET NULL,
    vehicle_id   INTEGER REFERENCES vehicle(id) ON DELETE SET NULL
);
"#;

/// V2: indexes backing the derived relationship queries.
const V2_RELATION_INDEXES: &str = r#"
CREATE INDEX idx_favorite_user ON favorite(user_id);
CREATE INDEX idx_favorite_character ON favorite(character_id);
CREATE INDEX idx_character_species ON character(species_id);
"#;

const MIGRATIONS: &[(i64, &str)] = &[(1, V1_CATALOG), (2, V2_RELATION_INDEXES)];

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction. Returns
/// the number of migrations applied.
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    let mut applied = 0;
    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::info!("Applied migration V{version}");
        applied += 1;
    }

    Ok(applied)
}

/// The highest applied schema version (0 for an empty database).
pub fn current_version(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// The latest version embedded in this build.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|&(v, _)| v).unwrap_or(0)
}
