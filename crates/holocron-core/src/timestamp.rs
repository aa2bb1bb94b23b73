//! Timestamp convention shared by storage and external representations.
//!
//! `created`/`edited` values are UTC instants with second precision. They
//! are stored and rendered as `YYYY-MM-DD HH:MM:SS`; absent values render as
//! `null`.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

use crate::{Error, Result};

/// The fixed `strftime` layout used for every stored and rendered timestamp.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a timestamp in the fixed layout.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.format(FORMAT).to_string()
}

/// Render an optional timestamp; `None` stays `None` (serialized as `null`).
pub fn format_opt(ts: Option<&DateTime<Utc>>) -> Option<String> {
    ts.map(format)
}

/// Parse a timestamp in the fixed layout, interpreting it as UTC.
pub fn parse(s: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::validation(format!("invalid timestamp '{s}': {e}")))
}

/// Parse either the fixed layout or an RFC 3339 string (as found in
/// upstream catalog dumps such as `2014-12-09T13:50:51.644000Z`).
pub fn parse_lenient(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(truncate(ts.with_timezone(&Utc)));
    }
    parse(s)
}

/// Drop sub-second precision so the value matches what storage keeps.
pub fn truncate(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(0)
}

/// Serde adapter for `Option<DateTime<Utc>>` fields.
///
/// Serializes in the fixed layout and accepts either the fixed layout or
/// RFC 3339 on input.
pub mod opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&super::format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| super::parse_lenient(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
