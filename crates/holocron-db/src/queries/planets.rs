//! Planet operations.

use holocron_core::{timestamp, Error, PlanetId, Result};
use rusqlite::Connection;

use super::map_write_error;
use crate::models::{NewPlanet, Planet};

const COLS: &str = "id, name, diameter, rotation_period, orbital_period, gravity, population, \
                    climate, terrain, surface_water, created, edited, url";

/// Insert a planet and return it.
pub fn create_planet(conn: &Connection, new: &NewPlanet) -> Result<Planet> {
    new.validate()?;

    let created = new.created.map(timestamp::truncate);
    let edited = new.edited.map(timestamp::truncate);

    conn.execute(
        "INSERT INTO planet (name, diameter, rotation_period, orbital_period, gravity,
            population, climate, terrain, surface_water, created, edited, url)
         VALUES (:name, :diameter, :rotation_period, :orbital_period, :gravity,
            :population, :climate, :terrain, :surface_water, :created, :edited, :url)",
        rusqlite::named_params! {
            ":name": new.name,
            ":diameter": new.diameter,
            ":rotation_period": new.rotation_period,
            ":orbital_period": new.orbital_period,
            ":gravity": new.gravity,
            ":population": new.population,
            ":climate": new.climate,
            ":terrain": new.terrain,
            ":surface_water": new.surface_water,
            ":created": timestamp::format_opt(created.as_ref()),
            ":edited": timestamp::format_opt(edited.as_ref()),
            ":url": new.url,
        },
    )
    .map_err(|e| map_write_error("planet", e))?;

    let id = PlanetId::from(conn.last_insert_rowid());
    tracing::debug!(planet_id = %id, name = %new.name, "Created planet");

    Ok(Planet {
        id,
        name: new.name.clone(),
        diameter: new.diameter,
        rotation_period: new.rotation_period,
        orbital_period: new.orbital_period,
        gravity: new.gravity.clone(),
        population: new.population,
        climate: new.climate.clone(),
        terrain: new.terrain.clone(),
        surface_water: new.surface_water.clone(),
        created,
        edited,
        url: new.url.clone(),
    })
}

/// Get a planet by primary key.
pub fn get_planet(conn: &Connection, id: PlanetId) -> Result<Option<Planet>> {
    let q = format!("SELECT {COLS} FROM planet WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Planet::from_row);
    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all planets ordered by id.
pub fn list_planets(conn: &Connection) -> Result<Vec<Planet>> {
    let q = format!("SELECT {COLS} FROM planet ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Planet::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a planet. Favorites pointing at it lose the reference.
pub fn delete_planet(conn: &Connection, id: PlanetId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM planet WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
