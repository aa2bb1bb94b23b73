//! holocron-db: catalog persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, typed models with create-time validation, query
//! modules for every catalog entity, external representations, and a
//! transactional catalog importer.
//!
//! # Example
//!
//! ```
//! use holocron_db::models::NewPlanet;
//! use holocron_db::pool::{get_conn, init_memory_pool};
//! use holocron_db::queries::planets;
//! use holocron_db::views::ExternalView;
//!
//! let pool = init_memory_pool().unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let tatooine = planets::create_planet(&conn, &NewPlanet::named("Tatooine")).unwrap();
//! assert_eq!(tatooine.serialize().unwrap()["name"], "Tatooine");
//! ```

pub mod import;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod views;
