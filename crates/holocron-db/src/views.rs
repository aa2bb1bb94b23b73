//! External representations of catalog records.
//!
//! Every model maps onto a flat view struct that derives `Serialize`; the
//! [`ExternalView`] trait ties the two together and renders the view as a
//! `serde_json::Value` for transport. Timestamps are rendered in the fixed
//! `YYYY-MM-DD HH:MM:SS` UTC layout and `Vehicle.length` as a decimal string.

use holocron_core::{
    timestamp, CharacterId, FavoriteId, PlanetId, Result, SpeciesId, UserId, VehicleId,
};
use serde::Serialize;

use crate::models::{Character, Favorite, Planet, Species, User, Vehicle};

/// A record with a stable external representation.
pub trait ExternalView {
    type View: Serialize;

    /// Build the typed external representation.
    fn view(&self) -> Self::View;

    /// Render the external representation as JSON.
    fn serialize(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.view())?)
    }
}

// ---------------------------------------------------------------------------
// User / Favorite
// ---------------------------------------------------------------------------

/// Password and the active flag are never exposed.
///
/// `User` does not implement [`ExternalView`]: its view always needs the
/// favorites, so it is built with [`User::view_with`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub favorites: Vec<FavoriteView>,
}

impl User {
    /// Build the view with this user's favorites embedded.
    ///
    /// Favorites are a derived query (see
    /// [`crate::queries::favorites::favorites_by_user`]), so the caller
    /// supplies them.
    pub fn view_with(&self, favorites: &[Favorite]) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            favorites: favorites.iter().map(Favorite::view).collect(),
        }
    }

    /// Render the view with favorites embedded as JSON.
    pub fn serialize_with(&self, favorites: &[Favorite]) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.view_with(favorites))?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteView {
    pub id: FavoriteId,
    pub name: String,
    pub user_id: UserId,
    pub character_id: Option<CharacterId>,
    pub planet_id: Option<PlanetId>,
    pub vehicle_id: Option<VehicleId>,
}

impl ExternalView for Favorite {
    type View = FavoriteView;

    fn view(&self) -> FavoriteView {
        FavoriteView {
            id: self.id,
            name: self.name.clone(),
            user_id: self.user_id,
            character_id: self.character_id,
            planet_id: self.planet_id,
            vehicle_id: self.vehicle_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Species and the starship/vehicle id lists are stored but not exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterView {
    pub id: CharacterId,
    pub name: String,
    pub height: Option<i64>,
    pub mass: Option<i64>,
    pub hair_color: Option<String>,
    pub skin_color: Option<String>,
    pub eyes_color: Option<String>,
    pub birth_year: Option<String>,
    pub gender: Option<String>,
    pub created: Option<String>,
    pub edited: Option<String>,
    pub homeworld: Option<String>,
    pub url: Option<String>,
}

impl ExternalView for Character {
    type View = CharacterView;

    fn view(&self) -> CharacterView {
        CharacterView {
            id: self.id,
            name: self.name.clone(),
            height: self.height,
            mass: self.mass,
            hair_color: self.hair_color.clone(),
            skin_color: self.skin_color.clone(),
            eyes_color: self.eyes_color.clone(),
            birth_year: self.birth_year.clone(),
            gender: self.gender.clone(),
            created: timestamp::format_opt(self.created.as_ref()),
            edited: timestamp::format_opt(self.edited.as_ref()),
            homeworld: self.homeworld.clone(),
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetView {
    pub id: PlanetId,
    pub name: String,
    pub diameter: Option<i64>,
    pub rotation_period: Option<i64>,
    pub orbital_period: Option<i64>,
    pub gravity: Option<String>,
    pub population: Option<i64>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub surface_water: Option<String>,
    pub created: Option<String>,
    pub edited: Option<String>,
    pub url: Option<String>,
}

impl ExternalView for Planet {
    type View = PlanetView;

    fn view(&self) -> PlanetView {
        PlanetView {
            id: self.id,
            name: self.name.clone(),
            diameter: self.diameter,
            rotation_period: self.rotation_period,
            orbital_period: self.orbital_period,
            gravity: self.gravity.clone(),
            population: self.population,
            climate: self.climate.clone(),
            terrain: self.terrain.clone(),
            surface_water: self.surface_water.clone(),
            created: timestamp::format_opt(self.created.as_ref()),
            edited: timestamp::format_opt(self.edited.as_ref()),
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleView {
    pub id: VehicleId,
    pub name: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub cost_in_credits: Option<i64>,
    pub length: Option<String>,
    pub crew: Option<i64>,
    pub passengers: Option<i64>,
    pub max_atmosphering_speed: Option<i64>,
    pub cargo_capacity: Option<i64>,
    pub consumable: Option<String>,
    pub films: Vec<String>,
    pub pilots: Vec<String>,
    pub created: Option<String>,
    pub edited: Option<String>,
    pub url: Option<String>,
}

impl ExternalView for Vehicle {
    type View = VehicleView;

    fn view(&self) -> VehicleView {
        VehicleView {
            id: self.id,
            name: self.name.clone(),
            model: self.model.clone(),
            manufacturer: self.manufacturer.clone(),
            cost_in_credits: self.cost_in_credits,
            length: self.length.map(|d| d.to_string()),
            crew: self.crew,
            passengers: self.passengers,
            max_atmosphering_speed: self.max_atmosphering_speed,
            cargo_capacity: self.cargo_capacity,
            consumable: self.consumable.clone(),
            films: self.films.clone(),
            pilots: self.pilots.clone(),
            created: timestamp::format_opt(self.created.as_ref()),
            edited: timestamp::format_opt(self.edited.as_ref()),
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesView {
    pub id: SpeciesId,
    pub name: String,
    pub classification: Option<String>,
    pub designation: Option<String>,
    pub average_height: Option<String>,
    pub skin_colors: Option<String>,
    pub hair_colors: Option<String>,
    pub eye_colors: Option<String>,
    pub average_lifespan: Option<String>,
    pub homeworld: Option<String>,
    pub language: Option<String>,
    pub created: Option<String>,
    pub edited: Option<String>,
    pub url: Option<String>,
}

impl ExternalView for Species {
    type View = SpeciesView;

    fn view(&self) -> SpeciesView {
        SpeciesView {
            id: self.id,
            name: self.name.clone(),
            classification: self.classification.clone(),
            designation: self.designation.clone(),
            average_height: self.average_height.clone(),
            skin_colors: self.skin_colors.clone(),
            hair_colors: self.hair_colors.clone(),
            eye_colors: self.eye_colors.clone(),
            average_lifespan: self.average_lifespan.clone(),
            homeworld: self.homeworld.clone(),
            language: self.language.clone(),
            created: timestamp::format_opt(self.created.as_ref()),
            edited: timestamp::format_opt(self.edited.as_ref()),
            url: self.url.clone(),
        }
    }
}
