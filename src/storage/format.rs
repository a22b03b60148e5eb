//! On-disk layout of the record store.
//!
//! The store is a single UTF-8 JSON document:
//!
//! ```json
//! {
//!   "format": "release-watch/store",
//!   "version": 1,
//!   "saved_at": "2024-01-01T00:00:00Z",
//!   "entries": [ { "title": "...", "link": "...", "summary": "..." } ]
//! }
//! ```
//!
//! `format` and `version` are checked on every read. Only version 1 exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::feed::Entry;

pub const FORMAT_TAG: &str = "release-watch/store";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreDocument {
    pub format: String,
    pub version: u32,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    pub entries: Vec<Entry>,
}

impl StoreDocument {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            format: FORMAT_TAG.to_string(),
            version: FORMAT_VERSION,
            saved_at: Some(Utc::now()),
            entries,
        }
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode and check the header. Anything unreadable is reported as a
    /// corrupt store rather than a generic serialization error.
    pub fn decode(content: &str) -> Result<Self> {
        let document: StoreDocument = serde_json::from_str(content)
            .map_err(|e| Error::CorruptStore(format!("cannot decode store: {}", e)))?;

        if document.format != FORMAT_TAG {
            return Err(Error::CorruptStore(format!(
                "unexpected format tag '{}'",
                document.format
            )));
        }

        if document.version != FORMAT_VERSION {
            return Err(Error::CorruptStore(format!(
                "unsupported store version {} (expected {})",
                document.version, FORMAT_VERSION
            )));
        }

        Ok(document)
    }
}
