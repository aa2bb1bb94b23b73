//! Vehicle operations.
//!
//! `length` is a `DECIMAL(20, 1)` value: it is rounded to one fractional
//! digit on insert and stored as text so it never passes through a float.

use holocron_core::{timestamp, Error, Result, VehicleId};
use rusqlite::Connection;

use super::{map_write_error, to_json};
use crate::models::{normalize_length, NewVehicle, Vehicle};

const COLS: &str = "id, name, model, manufacturer, cost_in_credits, length, crew, passengers, \
                    max_atmosphering_speed, cargo_capacity, consumable, films, pilots, \
                    created, edited, url";

/// Insert a vehicle and return it.
pub fn create_vehicle(conn: &Connection, new: &NewVehicle) -> Result<Vehicle> {
    new.validate()?;

    let length = new.length.map(normalize_length).transpose()?;
    let created = new.created.map(timestamp::truncate);
    let edited = new.edited.map(timestamp::truncate);

    conn.execute(
        "INSERT INTO vehicle (name, model, manufacturer, cost_in_credits, length, crew,
            passengers, max_atmosphering_speed, cargo_capacity, consumable, films, pilots,
            created, edited, url)
         VALUES (:name, :model, :manufacturer, :cost_in_credits, :length, :crew,
            :passengers, :max_atmosphering_speed, :cargo_capacity, :consumable, :films, :pilots,
            :created, :edited, :url)",
        rusqlite::named_params! {
            ":name": new.name,
            ":model": new.model,
            ":manufacturer": new.manufacturer,
            ":cost_in_credits": new.cost_in_credits,
            ":length": length.map(|d| d.to_string()),
            ":crew": new.crew,
            ":passengers": new.passengers,
            ":max_atmosphering_speed": new.max_atmosphering_speed,
            ":cargo_capacity": new.cargo_capacity,
            ":consumable": new.consumable,
            ":films": to_json(&new.films)?,
            ":pilots": to_json(&new.pilots)?,
            ":created": timestamp::format_opt(created.as_ref()),
            ":edited": timestamp::format_opt(edited.as_ref()),
            ":url": new.url,
        },
    )
    .map_err(|e| map_write_error("vehicle", e))?;

    let id = VehicleId::from(conn.last_insert_rowid());
    tracing::debug!(vehicle_id = %id, name = %new.name, "Created vehicle");

    Ok(Vehicle {
        id,
        name: new.name.clone(),
        model: new.model.clone(),
        manufacturer: new.manufacturer.clone(),
        cost_in_credits: new.cost_in_credits,
        length,
        crew: new.crew,
        passengers: new.passengers,
        max_atmosphering_speed: new.max_atmosphering_speed,
        cargo_capacity: new.cargo_capacity,
        consumable: new.consumable.clone(),
        films: new.films.clone(),
        pilots: new.pilots.clone(),
        created,
        edited,
        url: new.url.clone(),
    })
}

/// Get a vehicle by primary key.
pub fn get_vehicle(conn: &Connection, id: VehicleId) -> Result<Option<Vehicle>> {
    let q = format!("SELECT {COLS} FROM vehicle WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Vehicle::from_row);
    match result {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all vehicles ordered by id.
pub fn list_vehicles(conn: &Connection) -> Result<Vec<Vehicle>> {
    let q = format!("SELECT {COLS} FROM vehicle ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Vehicle::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a vehicle. Favorites pointing at it lose the reference.
pub fn delete_vehicle(conn: &Connection, id: VehicleId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM vehicle WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::views::ExternalView;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sand_crawler() -> NewVehicle {
        NewVehicle {
            name: "Sand Crawler".into(),
            model: Some("Digger Crawler".into()),
            manufacturer: Some("Corellia Mining Corporation".into()),
            cost_in_credits: Some(150_000),
            length: Some(Decimal::from_str("12.3").unwrap()),
            crew: Some(46),
            passengers: Some(30),
            max_atmosphering_speed: Some(30),
            cargo_capacity: Some(50_000),
            consumable: Some("2 months".into()),
            films: vec!["A New Hope".into(), "The Phantom Menace".into()],
            pilots: vec![],
            ..NewVehicle::default()
        }
    }

    #[test]
    fn length_survives_storage_exactly() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let v = create_vehicle(&conn, &sand_crawler()).unwrap();

        let raw: String = conn
            .query_row("SELECT length FROM vehicle WHERE id = ?1", [v.id.get()], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(raw, "12.3");

        let json = get_vehicle(&conn, v.id).unwrap().unwrap().serialize().unwrap();
        assert_eq!(json["length"], "12.3");
    }

    #[test]
    fn length_halfway_rounds_away_from_zero() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        for (input, expected) in [("7.25", "7.3"), ("-7.25", "-7.3"), ("0.05", "0.1")] {
            let mut new = sand_crawler();
            new.length = Some(Decimal::from_str(input).unwrap());
            let v = create_vehicle(&conn, &new).unwrap();

            let raw: String = conn
                .query_row("SELECT length FROM vehicle WHERE id = ?1", [v.id.get()], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(raw, expected, "{input}");

            let stored = get_vehicle(&conn, v.id).unwrap().unwrap();
            assert_eq!(stored.length.unwrap().to_string(), expected);
            assert_eq!(stored.length.unwrap().scale(), 1);
        }
    }

    #[test]
    fn oversized_length_rejected() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let mut new = sand_crawler();
        new.length = Some(Decimal::from_str("123456789012345678901").unwrap());
        assert!(matches!(
            create_vehicle(&conn, &new),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn arrays_pass_through_in_order() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let v = create_vehicle(&conn, &sand_crawler()).unwrap();
        let stored = get_vehicle(&conn, v.id).unwrap().unwrap();
        assert_eq!(stored.films, ["A New Hope", "The Phantom Menace"]);
        assert!(stored.pilots.is_empty());
        assert_eq!(stored, v);
    }

    #[test]
    fn absent_length_is_null() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let v = create_vehicle(&conn, &NewVehicle::named("T-16 skyhopper")).unwrap();
        let json = get_vehicle(&conn, v.id).unwrap().unwrap().serialize().unwrap();
        assert!(json["length"].is_null());
    }

    #[test]
    fn list_and_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let a = create_vehicle(&conn, &NewVehicle::named("X-34 landspeeder")).unwrap();
        create_vehicle(&conn, &NewVehicle::named("TIE/LN starfighter")).unwrap();
        assert!(delete_vehicle(&conn, a.id).unwrap());
        let rest = list_vehicles(&conn).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "TIE/LN starfighter");
    }
}
