//! Favorite operations.
//!
//! A user's favorites are not stored on the user; they are always derived
//! with [`favorites_by_user`].

use holocron_core::{CharacterId, Error, FavoriteId, Result, UserId};
use rusqlite::Connection;

use super::map_write_error;
use crate::models::{Favorite, NewFavorite};

const COLS: &str = "id, name, user_id, character_id, planet_id, vehicle_id";

/// Record a favorite for a user.
///
/// Fails with `Validation` when the name or user reference is missing and
/// with `Reference` when the user or any target does not exist.
pub fn create_favorite(conn: &Connection, new: &NewFavorite) -> Result<Favorite> {
    let user_id = new.validate()?;
    let character_id = new.character_id.map(|id| id.get());
    let planet_id = new.planet_id.map(|id| id.get());
    let vehicle_id = new.vehicle_id.map(|id| id.get());

    conn.execute(
        "INSERT INTO favorite (name, user_id, character_id, planet_id, vehicle_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![new.name, user_id.get(), character_id, planet_id, vehicle_id],
    )
    .map_err(|e| map_write_error("favorite", e))?;

    let id = FavoriteId::from(conn.last_insert_rowid());
    tracing::debug!(favorite_id = %id, user_id = %user_id, "Created favorite");

    Ok(Favorite {
        id,
        name: new.name.clone(),
        user_id,
        character_id: new.character_id,
        planet_id: new.planet_id,
        vehicle_id: new.vehicle_id,
    })
}

/// Get a favorite by primary key.
pub fn get_favorite(conn: &Connection, id: FavoriteId) -> Result<Option<Favorite>> {
    let q = format!("SELECT {COLS} FROM favorite WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Favorite::from_row);
    match result {
        Ok(f) => Ok(Some(f)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all favorites across users ordered by id.
pub fn list_favorites(conn: &Connection) -> Result<Vec<Favorite>> {
    let q = format!("SELECT {COLS} FROM favorite ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Favorite::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// All favorites owned by `user_id`, oldest first.
pub fn favorites_by_user(conn: &Connection, user_id: UserId) -> Result<Vec<Favorite>> {
    let q = format!("SELECT {COLS} FROM favorite WHERE user_id = ?1 ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([user_id.get()], Favorite::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// All favorites pointing at a character, across users.
pub fn favorites_for_character(
    conn: &Connection,
    character_id: CharacterId,
) -> Result<Vec<Favorite>> {
    let q = format!("SELECT {COLS} FROM favorite WHERE character_id = ?1 ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([character_id.get()], Favorite::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Remove a favorite. Returns true if removed.
pub fn delete_favorite(conn: &Connection, id: FavoriteId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM favorite WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Remove every favorite a user owns. Returns the number removed.
pub fn delete_favorites_by_user(conn: &Connection, user_id: UserId) -> Result<usize> {
    conn.execute("DELETE FROM favorite WHERE user_id = ?1", [user_id.get()])
        .map_err(|e| Error::database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCharacter, NewPlanet, NewUser, NewVehicle};
    use crate::pool::{init_memory_pool, PooledConnection};
    use crate::queries::{characters, planets, users, vehicles};
    use holocron_core::PlanetId;

    fn setup() -> (PooledConnection, UserId) {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let user = users::create_user(&conn, &NewUser::new("favuser", "fav@x.io", "pw")).unwrap();
        (conn, user.id)
    }

    #[test]
    fn add_and_remove() {
        let (conn, uid) = setup();
        let luke =
            characters::create_character(&conn, &NewCharacter::named("Luke Skywalker")).unwrap();

        let fav = create_favorite(&conn, &NewFavorite::new(uid, "Luke").character(luke.id))
            .unwrap();
        assert_eq!(fav.character_id, Some(luke.id));
        assert_eq!(get_favorite(&conn, fav.id).unwrap().unwrap(), fav);

        assert!(delete_favorite(&conn, fav.id).unwrap());
        assert!(get_favorite(&conn, fav.id).unwrap().is_none());
        assert!(!delete_favorite(&conn, fav.id).unwrap());
    }

    #[test]
    fn missing_user_reference_is_validation_error() {
        let (conn, _) = setup();
        let new = NewFavorite {
            name: "orphan".into(),
            ..NewFavorite::default()
        };
        assert!(matches!(
            create_favorite(&conn, &new),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn unknown_user_is_reference_error() {
        let (conn, _) = setup();
        let new = NewFavorite::new(UserId::from(999), "ghost");
        assert!(matches!(
            create_favorite(&conn, &new),
            Err(Error::Reference(_))
        ));
    }

    #[test]
    fn unknown_target_is_reference_error() {
        let (conn, uid) = setup();
        let new = NewFavorite::new(uid, "nowhere").planet(PlanetId::from(77));
        assert!(matches!(
            create_favorite(&conn, &new),
            Err(Error::Reference(_))
        ));
    }

    #[test]
    fn targets_may_overlap() {
        let (conn, uid) = setup();
        let hoth = planets::create_planet(&conn, &NewPlanet::named("Hoth")).unwrap();
        let speeder = vehicles::create_vehicle(&conn, &NewVehicle::named("Snowspeeder")).unwrap();

        let fav = create_favorite(
            &conn,
            &NewFavorite::new(uid, "Battle of Hoth")
                .planet(hoth.id)
                .vehicle(speeder.id),
        )
        .unwrap();
        assert_eq!(fav.targets().len(), 2);

        let none = create_favorite(&conn, &NewFavorite::new(uid, "just a note")).unwrap();
        assert!(none.targets().is_empty());
    }

    #[test]
    fn by_user_is_scoped_and_ordered() {
        let (conn, uid) = setup();
        let other = users::create_user(&conn, &NewUser::new("other", "o@x.io", "pw")).unwrap();

        create_favorite(&conn, &NewFavorite::new(uid, "first")).unwrap();
        create_favorite(&conn, &NewFavorite::new(other.id, "theirs")).unwrap();
        create_favorite(&conn, &NewFavorite::new(uid, "second")).unwrap();

        let mine = favorites_by_user(&conn, uid).unwrap();
        let names: Vec<_> = mine.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn list_spans_users_in_id_order() {
        let (conn, uid) = setup();
        let other = users::create_user(&conn, &NewUser::new("other", "o@x.io", "pw")).unwrap();

        create_favorite(&conn, &NewFavorite::new(other.id, "theirs")).unwrap();
        create_favorite(&conn, &NewFavorite::new(uid, "mine")).unwrap();

        let names: Vec<_> = list_favorites(&conn)
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["theirs", "mine"]);
    }

    #[test]
    fn deleting_user_cascades() {
        let (conn, uid) = setup();
        create_favorite(&conn, &NewFavorite::new(uid, "a")).unwrap();
        create_favorite(&conn, &NewFavorite::new(uid, "b")).unwrap();

        assert!(users::delete_user(&conn, uid).unwrap());
        assert!(favorites_by_user(&conn, uid).unwrap().is_empty());
    }

    #[test]
    fn deleting_target_clears_reference() {
        let (conn, uid) = setup();
        let leia = characters::create_character(&conn, &NewCharacter::named("Leia")).unwrap();
        let fav = create_favorite(&conn, &NewFavorite::new(uid, "Leia").character(leia.id))
            .unwrap();
        assert_eq!(favorites_for_character(&conn, leia.id).unwrap().len(), 1);

        assert!(characters::delete_character(&conn, leia.id).unwrap());
        let after = get_favorite(&conn, fav.id).unwrap().unwrap();
        assert_eq!(after.character_id, None);
        assert_eq!(after.user_id, uid);
    }

    #[test]
    fn delete_all_for_user() {
        let (conn, uid) = setup();
        create_favorite(&conn, &NewFavorite::new(uid, "b")).unwrap();
        create_favorite(&conn, &NewFavorite::new(uid, "c")).unwrap();

        assert_eq!(delete_favorites_by_user(&conn, uid).unwrap(), 2);
        assert!(favorites_by_user(&conn, uid).unwrap().is_empty());
    }
}
