//! Bulk catalog import.
//!
//! A catalog document is a JSON object with optional `species`, `planets`,
//! `vehicles` and `characters` arrays. Each element has the shape of the
//! matching `New*` struct. Characters may name their species instead of
//! carrying a `species_id`:
//!
//! ```json
//! {
//!   "species": [{ "name": "Human", "language": "Galactic Basic" }],
//!   "characters": [{ "name": "Luke Skywalker", "species": "Human" }]
//! }
//! ```
//!
//! Species are inserted first so characters can refer to them. The whole
//! document is written in a single transaction.

use holocron_core::{Error, Result};
use rusqlite::Connection;
use serde::Deserialize;

use crate::models::{NewCharacter, NewPlanet, NewSpecies, NewVehicle};
use crate::queries::{characters, planets, species, vehicles};

/// A character entry, optionally naming its species.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterRecord {
    #[serde(flatten)]
    pub character: NewCharacter,
    /// Species name, resolved against the species table at import time.
    /// Takes precedence over `species_id` when both are present.
    #[serde(default)]
    pub species: Option<String>,
}

/// A parsed catalog document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    pub species: Vec<NewSpecies>,
    pub planets: Vec<NewPlanet>,
    pub vehicles: Vec<NewVehicle>,
    pub characters: Vec<CharacterRecord>,
}

impl CatalogDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::validation(format!("invalid catalog document: {e}")))
    }
}

/// Records written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub species: usize,
    pub planets: usize,
    pub vehicles: usize,
    pub characters: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.species + self.planets + self.vehicles + self.characters
    }
}

/// Parse and import a JSON catalog document.
pub fn import_catalog(conn: &Connection, json: &str) -> Result<ImportSummary> {
    let doc = CatalogDocument::from_json(json)?;
    import_document(conn, &doc)
}

/// Import an already parsed document. Nothing is written unless every
/// record succeeds.
pub fn import_document(conn: &Connection, doc: &CatalogDocument) -> Result<ImportSummary> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    let mut summary = ImportSummary::default();

    for new in &doc.species {
        species::create_species(&tx, new)?;
        summary.species += 1;
    }
    for new in &doc.planets {
        planets::create_planet(&tx, new)?;
        summary.planets += 1;
    }
    for new in &doc.vehicles {
        vehicles::create_vehicle(&tx, new)?;
        summary.vehicles += 1;
    }
    for record in &doc.characters {
        let new = resolve_species(&tx, record)?;
        characters::create_character(&tx, &new)?;
        summary.characters += 1;
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    tracing::info!(
        species = summary.species,
        planets = summary.planets,
        vehicles = summary.vehicles,
        characters = summary.characters,
        "Imported catalog"
    );
    Ok(summary)
}

fn resolve_species(conn: &Connection, record: &CharacterRecord) -> Result<NewCharacter> {
    let mut new = record.character.clone();
    if let Some(name) = &record.species {
        let found = species::get_species_by_name(conn, name)?.ok_or_else(|| {
            Error::reference(format!(
                "character '{}' names unknown species '{name}'",
                new.name
            ))
        })?;
        new.species_id = Some(found.id);
    }
    Ok(new)
}
