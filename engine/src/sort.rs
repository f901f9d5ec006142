//! Sort engine.

use crate::{Error, SwimmerLookup, TimeRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::str::FromStr;

/// Column a time list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    SwimmerName,
    Distance,
    Style,
    Time,
    Pace,
    #[default]
    Date,
    Competition,
    Official,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "swimmer" | "swimmername" | "name" => SortKey::SwimmerName,
            "distance" => SortKey::Distance,
            "style" => SortKey::Style,
            "time" => SortKey::Time,
            "pace" => SortKey::Pace,
            "date" => SortKey::Date,
            "competition" => SortKey::Competition,
            "official" | "isofficial" => SortKey::Official,
            _ => {
                return Err(Error::Unrecognised {
                    kind: "sort key",
                    value: s.to_string(),
                })
            }
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Ascending),
            "desc" | "descending" => Ok(Direction::Descending),
            _ => Err(Error::Unrecognised {
                kind: "sort direction",
                value: s.to_string(),
            }),
        }
    }
}

/// A key extracted from a record, compared with a total order.
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Number(f64),
    Text(String),
    Instant(DateTime<Utc>),
    Flag(bool),
}

impl Eq for SortValue {}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Instant(a), SortValue::Instant(b)) => a.cmp(b),
            (SortValue::Flag(a), SortValue::Flag(b)) => a.cmp(b),
            // One sort call only ever extracts a single variant.
            _ => Ordering::Equal,
        }
    }
}

fn sort_value<L>(record: &TimeRecord, key: SortKey, lookup: &L) -> SortValue
where
    L: SwimmerLookup + ?Sized,
{
    match key {
        SortKey::SwimmerName => {
            SortValue::Text(lookup.resolve_name(&record.swimmer_id).to_lowercase())
        }
        SortKey::Distance => SortValue::Number(record.distance.meters() as f64),
        SortKey::Style => SortValue::Text(record.style.to_string().to_lowercase()),
        SortKey::Time => SortValue::Number(record.time_seconds),
        SortKey::Pace => SortValue::Number(record.pace()),
        SortKey::Date => SortValue::Instant(record.date),
        SortKey::Competition => {
            SortValue::Text(record.competition.as_deref().unwrap_or_default().to_lowercase())
        }
        SortKey::Official => SortValue::Flag(record.is_official),
    }
}

/// Order records by `key`.
///
/// Returns a new sequence; records with equal keys keep their input order in
/// both directions.
pub fn sort<'a, I, L>(
    records: I,
    key: SortKey,
    direction: Direction,
    lookup: &L,
) -> Vec<&'a TimeRecord>
where
    I: IntoIterator<Item = &'a TimeRecord>,
    L: SwimmerLookup + ?Sized,
{
    let mut sorted: Vec<&'a TimeRecord> = records.into_iter().collect();
    match direction {
        Direction::Ascending => sorted.sort_by_cached_key(|r| sort_value(r, key, lookup)),
        Direction::Descending => {
            sorted.sort_by_cached_key(|r| Reverse(sort_value(r, key, lookup)))
        }
    }
    sorted
}
