//! # Swimtime Engine
//!
//! The data model and query engine behind a swimming club's race-time
//! records.
//!
//! The engine takes a snapshot of time records from a record store and
//! derives the views a club needs: filtered and sorted lists, personal bests,
//! and CSV exports. It also turns uploaded JSON documents into batches of
//! submissions.
//!
//! ## Design Principles
//!
//! - **No ambient state**: every operation is a function of the records passed in
//! - **Deterministic**: ties in sorting and personal bests resolve the same way every time
//! - **Permissive input**: typed-in times never fail to parse; bad parts count as zero
//!
//! ## Core Concepts
//!
//! ### Time codec
//!
//! [`time::encode`] folds minutes, seconds and milliseconds into canonical
//! seconds; [`time::decode`] and [`time::format`] go the other way, and
//! [`time::derive_pace`] normalises a time to 100 m.
//!
//! ### Records
//!
//! A [`TimeRecord`] is one timed swim: swimmer, [`Distance`], [`Style`],
//! time, date, optional competition, official flag and two tri-state
//! [`Qualification`] flags. New and edited times travel as a
//! [`TimeSubmission`], usually built from a form [`TimeEntry`].
//!
//! ### Queries
//!
//! - [`filter`] applies a [`FilterCriteria`] under a [`Combinator`]
//! - [`sort`] orders by a [`SortKey`] and [`Direction`], stably
//! - [`TimeQuery`] chains the two
//! - [`personal_bests`] keeps the fastest time per swimmer, distance and style
//!
//! ### Exchange
//!
//! [`export_csv`] writes the eight-column export document;
//! [`parse_import`] and [`submit_batch`] load a JSON upload into any
//! [`RecordStore`], tallying successes and failures.
//!
//! ## Quick Start
//!
//! ```rust
//! use swimtime_engine::{
//!     personal_bests, time, Distance, MemoryStore, Style, Swimmer, TimeSubmission,
//!     parse_instant,
//! };
//!
//! let store = MemoryStore::with_swimmers([Swimmer::new("s1", "Ane")]);
//!
//! let seconds = time::encode(1.0, 5.0, 320.0);
//! store
//!     .insert(TimeSubmission::new(
//!         "s1",
//!         Distance::M100,
//!         Style::Freestyle,
//!         seconds,
//!         parse_instant("2024-05-01").unwrap(),
//!     ))
//!     .unwrap();
//!
//! let records = store.records();
//! let bests = personal_bests(&records);
//! assert_eq!(time::format(bests[0].best_time_seconds), "01:05.320");
//! ```

pub mod bests;
pub mod directory;
pub mod error;
pub mod exchange;
pub mod filter;
pub mod locale;
pub mod query;
pub mod record;
pub mod snapshot;
pub mod sort;
pub mod store;
pub mod time;

#[cfg(test)]
mod test_support;

// Re-export main types at crate root
pub use bests::{group_by_style, personal_bests, personal_bests_for, PersonalBest};
pub use directory::{SwimmerDirectory, SwimmerLookup, UNKNOWN_SWIMMER};
pub use error::Error;
pub use exchange::{
    export_csv, import_document, parse_import, submit_batch, ExportOptions, ImportBatch,
    ImportFailure, ImportReport, IMPORT_CONCURRENCY,
};
pub use filter::{filter, Combinator, FilterCriteria};
pub use locale::Locale;
pub use query::TimeQuery;
pub use record::{
    normalize_competition, parse_instant, Distance, Qualification, Style, Swimmer, TimeEntry,
    TimeRecord, TimeSubmission,
};
pub use snapshot::{StoreSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use sort::{sort, Direction, SortKey};
pub use store::{MemoryStore, RecordStore};
pub use time::TimeParts;

/// Type aliases for clarity
pub type RecordId = String;
pub type SwimmerId = String;
