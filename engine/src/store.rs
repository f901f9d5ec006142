//! Record store collaborator.
//!
//! [`RecordStore`] is the seam between the engine and whatever owns the
//! records (usually the club backend). [`MemoryStore`] is an in-memory
//! implementation holding records in submission order, used for offline work
//! and in tests.

use crate::snapshot::{StoreSnapshot, SNAPSHOT_FORMAT_VERSION};
use crate::{
    error::Result, Error, RecordId, Swimmer, SwimmerDirectory, SwimmerId, TimeRecord,
    TimeSubmission,
};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Prefix of the ids [`MemoryStore`] allocates.
const ID_PREFIX: &str = "time_";

/// Source and sink of time records.
///
/// `list` returns a snapshot; the engine never assumes it stays current.
pub trait RecordStore {
    type Error: fmt::Display + Send;

    fn list(
        &self,
    ) -> impl Future<Output = std::result::Result<Vec<TimeRecord>, Self::Error>> + Send;

    fn create(
        &self,
        submission: TimeSubmission,
    ) -> impl Future<Output = std::result::Result<TimeRecord, Self::Error>> + Send;

    /// Replace every field of an existing record.
    fn update(
        &self,
        id: &str,
        submission: TimeSubmission,
    ) -> impl Future<Output = std::result::Result<TimeRecord, Self::Error>> + Send;

    fn delete(
        &self,
        id: &str,
    ) -> impl Future<Output = std::result::Result<(), Self::Error>> + Send;
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<TimeRecord>,
    swimmers: BTreeMap<SwimmerId, Swimmer>,
    next_id: u64,
}

impl MemoryState {
    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))
    }

    /// Validate a submission the way the backend does.
    fn check(&self, submission: &TimeSubmission) -> Result<()> {
        submission.validate()?;
        if !self.swimmers.is_empty() && !self.swimmers.contains_key(&submission.swimmer_id) {
            return Err(Error::UnknownSwimmer(submission.swimmer_id.clone()));
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        format!("{ID_PREFIX}{}", self.next_id)
    }
}

/// In-memory record store.
///
/// When a roster is registered, submissions for swimmers outside it are
/// rejected with [`Error::UnknownSwimmer`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store with no roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that only accepts times for the given swimmers.
    pub fn with_swimmers(swimmers: impl IntoIterator<Item = Swimmer>) -> Self {
        let store = Self::new();
        for swimmer in swimmers {
            store.add_swimmer(swimmer);
        }
        store
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_swimmer(&self, swimmer: Swimmer) {
        self.state().swimmers.insert(swimmer.id.clone(), swimmer);
    }

    /// Registered swimmers, ordered by id.
    pub fn swimmers(&self) -> Vec<Swimmer> {
        self.state().swimmers.values().cloned().collect()
    }

    /// Name lookup over the registered swimmers.
    pub fn directory(&self) -> SwimmerDirectory {
        self.swimmers().into_iter().collect()
    }

    /// Current records in submission order.
    pub fn records(&self) -> Vec<TimeRecord> {
        self.state().records.clone()
    }

    pub fn get(&self, id: &str) -> Option<TimeRecord> {
        self.state().records.iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&self, submission: TimeSubmission) -> Result<TimeRecord> {
        let mut state = self.state();
        state.check(&submission)?;

        let id = state.allocate_id();
        let record = TimeRecord::from_submission(id, submission);
        state.records.push(record.clone());

        tracing::debug!(
            record_id = %record.id,
            swimmer_id = %record.swimmer_id,
            "created time record"
        );
        Ok(record)
    }

    pub fn replace(&self, id: &str, submission: TimeSubmission) -> Result<TimeRecord> {
        let mut state = self.state();
        state.check(&submission)?;

        let index = state.position(id)?;
        let record = &mut state.records[index];
        record.replace_with(submission);

        tracing::debug!(record_id = %id, "replaced time record");
        Ok(record.clone())
    }

    pub fn remove(&self, id: &str) -> Result<TimeRecord> {
        let mut state = self.state();
        let index = state.position(id)?;

        tracing::debug!(record_id = %id, "deleted time record");
        Ok(state.records.remove(index))
    }

    // ========== State Export/Import ==========

    /// Export the store for persistence.
    pub fn export_state(&self) -> StoreSnapshot {
        let state = self.state();
        StoreSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            next_id: state.next_id,
            swimmers: state.swimmers.clone(),
            records: state.records.clone(),
        }
    }

    /// Replace the store's contents with a validated snapshot.
    pub fn import_state(&self, snapshot: StoreSnapshot) -> Result<()> {
        snapshot.validate()?;

        // A stale counter must not hand out ids that are already taken
        let highest_taken = snapshot
            .records
            .iter()
            .filter_map(|r| r.id.strip_prefix(ID_PREFIX)?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let mut state = self.state();
        state.next_id = snapshot.next_id.max(highest_taken);
        state.swimmers = snapshot.swimmers;
        state.records = snapshot.records;
        Ok(())
    }

    /// Build a store from a snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let store = Self::new();
        store.import_state(snapshot)?;
        Ok(store)
    }
}

impl RecordStore for MemoryStore {
    type Error = Error;

    async fn list(&self) -> Result<Vec<TimeRecord>> {
        Ok(self.records())
    }

    async fn create(&self, submission: TimeSubmission) -> Result<TimeRecord> {
        self.insert(submission)
    }

    async fn update(&self, id: &str, submission: TimeSubmission) -> Result<TimeRecord> {
        self.replace(id, submission)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.remove(id).map(|_| ())
    }
}
