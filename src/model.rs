//! Record types delivered by the show data provider.
//!
//! Every record is an immutable snapshot of what the provider returned for a
//! single booklet generation.  Optional fields deserialize to empty strings so
//! that missing data renders as blank text rather than aborting a run.

use serde::Deserialize;

/// One entry in the show picker: identifier plus human-readable description.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ShowSummary {
    pub id: String,
    pub description: String,
}

/// The full detail record for a single show.
///
/// Dates are carried as `YYYY-MM-DD` strings; parsing happens lazily in the
/// pipeline via [`crate::dates::parse_calendar_date`] so that a malformed date
/// degrades to blank header components instead of a generation failure.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Show {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub location_address: String,
    #[serde(default)]
    pub location_city: String,
    #[serde(default)]
    pub location_state: String,
    #[serde(default)]
    pub location_postal_code: String,
    #[serde(default)]
    pub location_phone: String,
    #[serde(default)]
    pub location_fax: String,
    #[serde(default)]
    pub coordinator: String,
    #[serde(default)]
    pub coordinator_phone: String,
    #[serde(default)]
    pub coordinator_email: String,
    #[serde(default)]
    pub next_show: String,
}

/// One exhibitor's name-card data, already ordered by (last name, first name).
///
/// `phone`, `fax`, `cell` and `email` are optional contact lines; the card
/// builder skips the ones that are empty.  `lines` is the free-text list of
/// product lines the exhibitor represents and is always rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExhibitorCard {
    pub full_name: String,
    pub room: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
    pub fax: String,
    pub cell: String,
    pub email: String,
    pub lines: String,
}

/// One row of the line/room directory, ordered by (line, last name, first name).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineRoomEntry {
    pub line: String,
    pub room: String,
    pub exhibitor: String,
}
