//! Exchange codec: CSV export and JSON batch import.
//!
//! Export writes an eight-column CSV document. Import reads a JSON array of
//! submission objects and hands every element to a [`RecordStore`]
//! independently, so one bad row never sinks the rest of the batch.

use crate::{
    error::Result, time, Error, Locale, RecordStore, SwimmerLookup, TimeRecord, TimeSubmission,
};
use futures::stream::{self, StreamExt};
use serde::Serialize;

/// Placeholder written for a record with no competition.
pub const NO_COMPETITION: &str = "-";

/// Number of columns in an exported document.
pub const COLUMN_COUNT: usize = 8;

/// Upper bound on store calls in flight during a batch import.
pub const IMPORT_CONCURRENCY: usize = 8;

/// Options for [`export_csv`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub locale: Locale,
}

impl ExportOptions {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

/// Column headers, in export order.
pub fn headers(locale: Locale) -> [&'static str; COLUMN_COUNT] {
    match locale {
        Locale::Es => [
            "Fecha",
            "Nadador",
            "Distancia",
            "Estilo",
            "Tiempo",
            "Ritmo/100m",
            "Competición",
            "Oficial",
        ],
        Locale::En => [
            "Date",
            "Swimmer",
            "Distance",
            "Style",
            "Time",
            "Pace/100m",
            "Competition",
            "Official",
        ],
    }
}

fn export_row<L>(record: &TimeRecord, lookup: &L, locale: Locale) -> [String; COLUMN_COUNT]
where
    L: SwimmerLookup + ?Sized,
{
    [
        record.day().format("%Y-%m-%d").to_string(),
        lookup.resolve_name(&record.swimmer_id),
        record.distance.to_string(),
        record.style.label(locale).to_string(),
        time::format(record.time_seconds),
        time::format(record.pace()),
        record
            .competition
            .clone()
            .unwrap_or_else(|| NO_COMPETITION.to_string()),
        locale.yes_no(record.is_official).to_string(),
    ]
}

/// Write records as CSV, one row per record in the given order.
///
/// Fields containing the delimiter, quotes or newlines are quoted. Rows end
/// with `\n`.
pub fn export_csv<'a, I, L>(records: I, lookup: &L, options: &ExportOptions) -> Result<String>
where
    I: IntoIterator<Item = &'a TimeRecord>,
    L: SwimmerLookup + ?Sized,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers(options.locale))?;
    let mut rows = 0usize;
    for record in records {
        writer.write_record(export_row(record, lookup, options.locale))?;
        rows += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Csv(e.to_string()))?;
    tracing::debug!(rows, "exported time records");

    String::from_utf8(bytes).map_err(|e| Error::Csv(e.to_string()))
}

/// An element of an import document that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    /// Zero-based position in the import document
    pub index: usize,
    pub reason: String,
}

/// A parsed import document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    /// Decoded submissions with their position in the document
    pub submissions: Vec<(usize, TimeSubmission)>,
    /// Elements that did not decode into a valid submission
    pub rejected: Vec<ImportFailure>,
}

impl ImportBatch {
    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.submissions.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a batch import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Records created by the store, in document order
    #[serde(skip)]
    pub created: Vec<TimeRecord>,
    /// Failures in document order
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Parse an import document.
///
/// The document must be a JSON array of objects; anything else fails the
/// whole import with [`Error::InvalidDocument`]. Objects that are missing
/// fields or carry invalid values are kept as rejected entries and counted
/// as failures when the batch is submitted.
pub fn parse_import(text: &str) -> Result<ImportBatch> {
    let elements: Vec<serde_json::Value> = serde_json::from_str(text)
        .map_err(|e| Error::InvalidDocument(format!("expected a JSON array: {e}")))?;

    let mut batch = ImportBatch::default();
    for (index, element) in elements.into_iter().enumerate() {
        if !element.is_object() {
            return Err(Error::InvalidDocument(format!(
                "element {index} is not an object"
            )));
        }

        let decoded = serde_json::from_value::<TimeSubmission>(element)
            .map_err(|e| e.to_string())
            .and_then(|submission| {
                submission
                    .validate()
                    .map(|()| submission)
                    .map_err(|e| e.to_string())
            });

        match decoded {
            Ok(submission) => batch.submissions.push((index, submission)),
            Err(reason) => batch.rejected.push(ImportFailure { index, reason }),
        }
    }

    Ok(batch)
}

/// Submit every decoded element of `batch` to `store`.
///
/// Submissions run concurrently, at most [`IMPORT_CONCURRENCY`] at a time,
/// and every one is awaited to completion; a failed element never cancels
/// its siblings. The report always accounts for every element of the
/// document.
pub async fn submit_batch<S>(store: &S, batch: ImportBatch) -> ImportReport
where
    S: RecordStore + ?Sized,
{
    let ImportBatch {
        submissions,
        rejected,
    } = batch;

    let attempts = submissions
        .into_iter()
        .map(|(index, submission)| async move { (index, store.create(submission).await) });
    let outcomes: Vec<_> = stream::iter(attempts)
        .buffered(IMPORT_CONCURRENCY)
        .collect()
        .await;

    let mut report = ImportReport {
        failures: rejected,
        ..ImportReport::default()
    };
    for (index, outcome) in outcomes {
        match outcome {
            Ok(record) => report.created.push(record),
            Err(e) => {
                tracing::debug!(index, error = %e, "import element rejected by store");
                report.failures.push(ImportFailure {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }
    report.failures.sort_by_key(|f| f.index);
    report.succeeded = report.created.len();
    report.failed = report.failures.len();

    tracing::debug!(
        succeeded = report.succeeded,
        failed = report.failed,
        "batch import finished"
    );
    report
}

/// Parse a document and submit it.
///
/// Fails only when the document itself is malformed; per-element problems
/// end up in the report.
pub async fn import_document<S>(store: &S, text: &str) -> Result<ImportReport>
where
    S: RecordStore + ?Sized,
{
    let batch = parse_import(text)?;
    Ok(submit_batch(store, batch).await)
}
