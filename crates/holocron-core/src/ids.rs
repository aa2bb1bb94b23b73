//! Typed ID wrappers providing compile-time safety for record identifiers.
//!
//! Each ID type is a newtype over the `i64` rowid SQLite assigns on insert,
//! preventing accidental misuse (e.g., passing a `PlanetId` where a
//! `VehicleId` is expected).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generate a newtype ID wrapper over `i64`.
///
/// The macro produces a struct with:
/// - `get()` returning the raw integer
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`, `Serialize`, `Deserialize`
/// - `Display` and `FromStr` delegating to the inner integer
/// - `From<i64>` and `Into<i64>` conversions
macro_rules! typed_id {
    ($($(#[doc = $doc:expr])* $name:ident),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(i64);

            impl $name {
                /// Return the raw integer value.
                #[must_use]
                pub fn get(self) -> i64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    s.parse().map(Self)
                }
            }

            impl From<i64> for $name {
                fn from(raw: i64) -> Self {
                    Self(raw)
                }
            }

            impl From<$name> for i64 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

typed_id! {
    /// Unique identifier for a user account.
    UserId,
    /// Unique identifier for a favorite.
    FavoriteId,
    /// Unique identifier for a character.
    CharacterId,
    /// Unique identifier for a planet.
    PlanetId,
    /// Unique identifier for a vehicle.
    VehicleId,
    /// Unique identifier for a species.
    SpeciesId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_i64() {
        let id = PlanetId::from(42);
        let back: i64 = id.into();
        assert_eq!(back, 42);
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn display_and_from_str() {
        let id = VehicleId::from(7);
        let s = id.to_string();
        assert_eq!(s, "7");
        let parsed: VehicleId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("seven".parse::<UserId>().is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let id = SpeciesId::from(3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
        let back: SpeciesId = serde_json::from_str("3").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn ordering_follows_integer() {
        let mut ids = vec![CharacterId::from(3), CharacterId::from(1), CharacterId::from(2)];
        ids.sort();
        assert_eq!(
            ids,
            vec![CharacterId::from(1), CharacterId::from(2), CharacterId::from(3)]
        );
    }
}
