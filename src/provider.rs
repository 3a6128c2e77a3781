//! Record retrieval for booklet generation.
//!
//! The pipeline consumes the [`ShowProvider`] trait and nothing else; the data
//! store behind it is interchangeable.  [`JsonShowProvider`] is the shipped
//! implementation: a single JSON file holding every show together with its
//! exhibitor and line/room rows.  Ordering guarantees live here, not in the
//! pipeline -- shows come back newest first (file order), exhibitor cards by
//! (last name, first name) and directory rows by (line, last name, first name).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::{ExhibitorCard, LineRoomEntry, Show, ShowSummary};

/// Failures raised by a record provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read show data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("show data in {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no show with id {0}")]
    ShowNotFound(String),
}

/// The record-retrieval contract consumed by the booklet pipeline.
pub trait ShowProvider {
    /// All shows known to the data store, newest first.
    fn list_shows(&self) -> Result<Vec<ShowSummary>, ProviderError>;

    /// The detail record for one show; fails if the id is unknown.
    fn get_show_detail(&self, show_id: &str) -> Result<Show, ProviderError>;

    /// Exhibitor name-card rows for one show, ordered by (last, first) name.
    fn get_exhibitor_cards(&self, show_id: &str) -> Result<Vec<ExhibitorCard>, ProviderError>;

    /// Line/room directory rows for one show, ordered by (line, last, first).
    fn get_line_room_entries(&self, show_id: &str) -> Result<Vec<LineRoomEntry>, ProviderError>;
}

#[derive(Debug, Default, Deserialize)]
struct DataFile {
    #[serde(default)]
    shows: Vec<ShowRecord>,
}

#[derive(Debug, Deserialize)]
struct ShowRecord {
    #[serde(flatten)]
    detail: Show,
    #[serde(default)]
    exhibitors: Vec<ExhibitorRecord>,
    #[serde(default)]
    line_room: Vec<LineRoomRecord>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct ExhibitorRecord {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    room: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    postal_code: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    fax: String,
    #[serde(default)]
    cell: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    lines: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct LineRoomRecord {
    #[serde(default)]
    line: String,
    #[serde(default)]
    room: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last).trim().to_string()
}

/// File-backed provider reading the whole data set once at construction.
#[derive(Debug)]
pub struct JsonShowProvider {
    data: DataFile,
}

impl JsonShowProvider {
    /// Opens and parses the JSON data file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = serde_json::from_str(&raw).map_err(|source| ProviderError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { data })
    }

    fn find_show(&self, show_id: &str) -> Result<&ShowRecord, ProviderError> {
        self.data
            .shows
            .iter()
            .find(|record| record.detail.id == show_id)
            .ok_or_else(|| ProviderError::ShowNotFound(show_id.to_string()))
    }
}

impl ShowProvider for JsonShowProvider {
    fn list_shows(&self) -> Result<Vec<ShowSummary>, ProviderError> {
        // The data file keeps shows newest first.
        Ok(self
            .data
            .shows
            .iter()
            .map(|record| ShowSummary {
                id: record.detail.id.clone(),
                description: record.detail.description.clone(),
            })
            .collect())
    }

    fn get_show_detail(&self, show_id: &str) -> Result<Show, ProviderError> {
        Ok(self.find_show(show_id)?.detail.clone())
    }

    fn get_exhibitor_cards(&self, show_id: &str) -> Result<Vec<ExhibitorCard>, ProviderError> {
        let mut records = self.find_show(show_id)?.exhibitors.clone();
        records.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(records
            .into_iter()
            .map(|record| ExhibitorCard {
                full_name: full_name(&record.first_name, &record.last_name),
                room: record.room,
                address: record.address,
                city: record.city,
                state: record.state,
                postal_code: record.postal_code,
                phone: record.phone,
                fax: record.fax,
                cell: record.cell,
                email: record.email,
                lines: record.lines,
            })
            .collect())
    }

    fn get_line_room_entries(&self, show_id: &str) -> Result<Vec<LineRoomEntry>, ProviderError> {
        let mut records = self.find_show(show_id)?.line_room.clone();
        records.sort_by(|a, b| {
            (a.line.as_str(), a.last_name.as_str(), a.first_name.as_str()).cmp(&(
                b.line.as_str(),
                b.last_name.as_str(),
                b.first_name.as_str(),
            ))
        });
        Ok(records
            .into_iter()
            .map(|record| LineRoomEntry {
                line: record.line,
                room: record.room,
                exhibitor: full_name(&record.first_name, &record.last_name),
            })
            .collect())
    }
}
