//! Snapshot types for persisting and restoring a [`MemoryStore`](crate::MemoryStore).
//!
//! Snapshots are plain JSON documents. Swimmers are kept in a `BTreeMap` so
//! that serialization order is deterministic; records keep their submission
//! order.

use crate::{error::Result, Error, Swimmer, SwimmerId, TimeRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Version of the snapshot format for future compatibility.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// A point-in-time copy of an in-memory store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Snapshot format version
    pub format_version: u32,
    /// Last numeric id handed out
    pub next_id: u64,
    /// Registered swimmers keyed by id
    #[serde(default)]
    pub swimmers: BTreeMap<SwimmerId, Swimmer>,
    /// Records in submission order
    #[serde(default)]
    pub records: Vec<TimeRecord>,
}

impl StoreSnapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            next_id: 0,
            swimmers: BTreeMap::new(),
            records: Vec::new(),
        }
    }

    pub fn add_swimmer(&mut self, swimmer: Swimmer) {
        self.swimmers.insert(swimmer.id.clone(), swimmer);
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Check format version, record invariants and id uniqueness.
    pub fn validate(&self) -> Result<()> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(Error::InvalidSnapshot(format!(
                "unsupported format version {} (expected {})",
                self.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        let mut seen = HashSet::new();
        for record in &self.records {
            if !seen.insert(record.id.as_str()) {
                return Err(Error::InvalidSnapshot(format!(
                    "duplicate record id: {}",
                    record.id
                )));
            }
            record.check_invariants().map_err(|e| {
                Error::InvalidSnapshot(format!("record {}: {}", record.id, e))
            })?;
        }

        for (id, swimmer) in &self.swimmers {
            if *id != swimmer.id {
                return Err(Error::InvalidSnapshot(format!(
                    "swimmer keyed as {} has id {}",
                    id, swimmer.id
                )));
            }
        }

        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
