//! Species operations.
//!
//! A species' characters are derived with
//! [`characters_by_species`](super::characters::characters_by_species).

use holocron_core::{timestamp, Error, Result, SpeciesId};
use rusqlite::Connection;

use super::map_write_error;
use crate::models::{NewSpecies, Species};

const COLS: &str = "id, name, classification, designation, average_height, skin_colors, \
                    hair_colors, eye_colors, average_lifespan, homeworld, language, \
                    created, edited, url";

/// Insert a species and return it.
pub fn create_species(conn: &Connection, new: &NewSpecies) -> Result<Species> {
    new.validate()?;

    let created = new.created.map(timestamp::truncate);
    let edited = new.edited.map(timestamp::truncate);

    conn.execute(
        "INSERT INTO species (name, classification, designation, average_height,
            skin_colors, hair_colors, eye_colors, average_lifespan, homeworld, language,
            created, edited, url)
         VALUES (:name, :classification, :designation, :average_height,
            :skin_colors, :hair_colors, :eye_colors, :average_lifespan, :homeworld, :language,
            :created, :edited, :url)",
        rusqlite::named_params! {
            ":name": new.name,
            ":classification": new.classification,
            ":designation": new.designation,
            ":average_height": new.average_height,
            ":skin_colors": new.skin_colors,
            ":hair_colors": new.hair_colors,
            ":eye_colors": new.eye_colors,
            ":average_lifespan": new.average_lifespan,
            ":homeworld": new.homeworld,
            ":language": new.language,
            ":created": timestamp::format_opt(created.as_ref()),
            ":edited": timestamp::format_opt(edited.as_ref()),
            ":url": new.url,
        },
    )
    .map_err(|e| map_write_error("species", e))?;

    let id = SpeciesId::from(conn.last_insert_rowid());
    tracing::debug!(species_id = %id, name = %new.name, "Created species");

    Ok(Species {
        id,
        name: new.name.clone(),
        classification: new.classification.clone(),
        designation: new.designation.clone(),
        average_height: new.average_height.clone(),
        skin_colors: new.skin_colors.clone(),
        hair_colors: new.hair_colors.clone(),
        eye_colors: new.eye_colors.clone(),
        average_lifespan: new.average_lifespan.clone(),
        homeworld: new.homeworld.clone(),
        language: new.language.clone(),
        created,
        edited,
        url: new.url.clone(),
    })
}

/// Get a species by primary key.
pub fn get_species(conn: &Connection, id: SpeciesId) -> Result<Option<Species>> {
    let q = format!("SELECT {COLS} FROM species WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Species::from_row);
    match result {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Find a species by exact name. Names are not unique; the lowest id wins.
pub fn get_species_by_name(conn: &Connection, name: &str) -> Result<Option<Species>> {
    let q = format!("SELECT {COLS} FROM species WHERE name = ?1 ORDER BY id ASC LIMIT 1");
    let result = conn.query_row(&q, [name], Species::from_row);
    match result {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all species ordered by id.
pub fn list_species(conn: &Connection) -> Result<Vec<Species>> {
    let q = format!("SELECT {COLS} FROM species ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Species::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Delete a species. Its characters keep existing without a species.
pub fn delete_species(conn: &Connection, id: SpeciesId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM species WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCharacter;
    use crate::pool::init_memory_pool;
    use crate::queries::characters;
    use crate::views::ExternalView;

    #[test]
    fn create_and_get() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let mut new = NewSpecies::named("Yoda's species");
        new.average_height = Some("66".into());
        new.average_lifespan = Some("900".into());
        new.skin_colors = Some("green, yellow".into());
        let s = create_species(&conn, &new).unwrap();

        let found = get_species(&conn, s.id).unwrap().unwrap();
        assert_eq!(found, s);
        assert_eq!(found.skin_colors.as_deref(), Some("green, yellow"));
    }

    #[test]
    fn non_numeric_averages_are_kept() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let mut new = NewSpecies::named("Droid");
        new.average_height = Some("n/a".into());
        new.average_lifespan = Some("indefinite".into());
        let s = create_species(&conn, &new).unwrap();

        let json = s.serialize().unwrap();
        assert_eq!(json["average_height"], "n/a");
        assert_eq!(json["average_lifespan"], "indefinite");
        assert!(json["created"].is_null());
        assert!(json["edited"].is_null());
    }

    #[test]
    fn lookup_by_name() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let first = create_species(&conn, &NewSpecies::named("Human")).unwrap();
        create_species(&conn, &NewSpecies::named("Human")).unwrap();

        let found = get_species_by_name(&conn, "Human").unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert!(get_species_by_name(&conn, "Hutt").unwrap().is_none());
    }

    #[test]
    fn deleting_species_orphans_characters() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let wookiee = create_species(&conn, &NewSpecies::named("Wookiee")).unwrap();
        let mut chewie = NewCharacter::named("Chewbacca");
        chewie.species_id = Some(wookiee.id);
        let chewie = characters::create_character(&conn, &chewie).unwrap();

        assert!(delete_species(&conn, wookiee.id).unwrap());
        let after = characters::get_character(&conn, chewie.id).unwrap().unwrap();
        assert_eq!(after.species_id, None);
        assert!(list_species(&conn).unwrap().is_empty());
    }
}
