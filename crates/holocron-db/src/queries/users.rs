//! User account operations.
//!
//! `username` and `email` are unique across all users; violations surface
//! as `Error::ConstraintViolation`. Passwords are stored as given.

use holocron_core::{Error, Result, UserId};
use rusqlite::Connection;

use super::map_write_error;
use crate::models::{validate_email, validate_password, NewUser, User};

const COLS: &str = "id, username, email, password, is_active";

/// Register a new user and return it.
pub fn create_user(conn: &Connection, new: &NewUser) -> Result<User> {
    new.validate()?;

    conn.execute(
        "INSERT INTO user (username, email, password, is_active) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![new.username, new.email, new.password, new.is_active],
    )
    .map_err(|e| map_write_error("user", e))?;

    let id = UserId::from(conn.last_insert_rowid());
    tracing::debug!(user_id = %id, username = %new.username, "Created user");

    Ok(User {
        id,
        username: new.username.clone(),
        email: new.email.clone(),
        password: new.password.clone(),
        is_active: new.is_active,
    })
}

/// Get a user by primary key.
pub fn get_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let q = format!("SELECT {COLS} FROM user WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], User::from_row);
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a user by username.
pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let q = format!("SELECT {COLS} FROM user WHERE username = ?1");
    let result = conn.query_row(&q, [username], User::from_row);
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a user by email address.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let q = format!("SELECT {COLS} FROM user WHERE email = ?1");
    let result = conn.query_row(&q, [email], User::from_row);
    match result {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all users ordered by id.
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let q = format!("SELECT {COLS} FROM user ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], User::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Change a user's email. Applies the registration rules and fails with
/// `ConstraintViolation` if another user already holds it.
pub fn update_email(conn: &Connection, id: UserId, email: &str) -> Result<()> {
    validate_email(email)?;
    let n = conn
        .execute(
            "UPDATE user SET email = ?1 WHERE id = ?2",
            rusqlite::params![email, id.get()],
        )
        .map_err(|e| map_write_error("user", e))?;
    if n == 0 {
        return Err(Error::not_found("user", id));
    }
    Ok(())
}

/// Replace a user's password. Applies the registration rules.
pub fn update_password(conn: &Connection, id: UserId, password: &str) -> Result<()> {
    validate_password(password)?;
    let n = conn
        .execute(
            "UPDATE user SET password = ?1 WHERE id = ?2",
            rusqlite::params![password, id.get()],
        )
        .map_err(|e| map_write_error("user", e))?;
    if n == 0 {
        return Err(Error::not_found("user", id));
    }
    Ok(())
}

/// Activate or deactivate an account.
pub fn set_active(conn: &Connection, id: UserId, is_active: bool) -> Result<()> {
    let n = conn
        .execute(
            "UPDATE user SET is_active = ?1 WHERE id = ?2",
            rusqlite::params![is_active, id.get()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    if n == 0 {
        return Err(Error::not_found("user", id));
    }
    Ok(())
}

/// Delete a user by ID. Their favorites are removed with them.
/// Returns true if a row was deleted.
pub fn delete_user(conn: &Connection, id: UserId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM user WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn create_and_get() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = create_user(&conn, &NewUser::new("luke", "luke@tatooine.net", "pw")).unwrap();
        assert_eq!(u.username, "luke");
        assert!(u.is_active);

        let found = get_user(&conn, u.id).unwrap().unwrap();
        assert_eq!(found, u);
    }

    #[test]
    fn get_missing_is_none() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        assert!(get_user(&conn, UserId::from(404)).unwrap().is_none());
    }

    #[test]
    fn lookup_by_username_and_email() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = create_user(&conn, &NewUser::new("han", "han@falcon.io", "pw")).unwrap();

        assert_eq!(get_user_by_username(&conn, "han").unwrap().unwrap().id, u.id);
        assert_eq!(
            get_user_by_email(&conn, "han@falcon.io").unwrap().unwrap().id,
            u.id
        );
        assert!(get_user_by_username(&conn, "greedo").unwrap().is_none());
    }

    #[test]
    fn duplicate_username() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        create_user(&conn, &NewUser::new("dup", "one@x.io", "pw")).unwrap();
        let err = create_user(&conn, &NewUser::new("dup", "two@x.io", "pw")).unwrap_err();
        assert!(matches!(
            err,
            Error::ConstraintViolation { ref field, .. } if field == "username"
        ));
    }

    #[test]
    fn duplicate_email() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        create_user(&conn, &NewUser::new("one", "same@x.io", "pw")).unwrap();
        let err = create_user(&conn, &NewUser::new("two", "same@x.io", "pw")).unwrap_err();
        assert!(matches!(
            err,
            Error::ConstraintViolation { ref field, .. } if field == "email"
        ));
    }

    #[test]
    fn empty_username_is_validation_error() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let err = create_user(&conn, &NewUser::new("", "x@x.io", "pw")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(list_users(&conn).unwrap().is_empty());
    }

    #[test]
    fn list_is_ordered_by_id() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        create_user(&conn, &NewUser::new("zed", "z@x.io", "pw")).unwrap();
        create_user(&conn, &NewUser::new("amy", "a@x.io", "pw")).unwrap();

        let users = list_users(&conn).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "zed");
        assert_eq!(users[1].username, "amy");
    }

    #[test]
    fn update_email_conflict() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        create_user(&conn, &NewUser::new("a", "a@x.io", "pw")).unwrap();
        let b = create_user(&conn, &NewUser::new("b", "b@x.io", "pw")).unwrap();

        let err = update_email(&conn, b.id, "a@x.io").unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation { .. }));

        update_email(&conn, b.id, "bee@x.io").unwrap();
        assert_eq!(get_user(&conn, b.id).unwrap().unwrap().email, "bee@x.io");
    }

    #[test]
    fn updates_apply_registration_rules() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = create_user(&conn, &NewUser::new("lando", "lando@bespin.gov", "pw")).unwrap();

        let err = update_password(&conn, u.id, "   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = update_password(&conn, u.id, &"p".repeat(81)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = update_email(&conn, u.id, &"e".repeat(500)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = update_email(&conn, u.id, " ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let stored = get_user(&conn, u.id).unwrap().unwrap();
        assert_eq!(stored.password, "pw");
        assert_eq!(stored.email, "lando@bespin.gov");
    }

    #[test]
    fn update_missing_user() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let err = update_password(&conn, UserId::from(9), "pw").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn password_and_active_flag() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = create_user(&conn, &NewUser::new("vader", "v@empire.gov", "old")).unwrap();

        update_password(&conn, u.id, "new").unwrap();
        set_active(&conn, u.id, false).unwrap();

        let found = get_user(&conn, u.id).unwrap().unwrap();
        assert_eq!(found.password, "new");
        assert!(!found.is_active);
    }

    #[test]
    fn delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let u = create_user(&conn, &NewUser::new("del", "d@x.io", "pw")).unwrap();
        assert!(delete_user(&conn, u.id).unwrap());
        assert!(!delete_user(&conn, u.id).unwrap());
        assert!(get_user(&conn, u.id).unwrap().is_none());
    }
}
