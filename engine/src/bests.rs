//! Personal-best reduction.

use crate::{Distance, Style, SwimmerId, TimeRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fastest time a swimmer has recorded for one distance and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBest {
    pub swimmer_id: SwimmerId,
    #[serde(rename = "distanceMeters")]
    pub distance: Distance,
    pub style: Style,
    pub best_time_seconds: f64,
    pub date: DateTime<Utc>,
    pub competition: Option<String>,
}

impl PersonalBest {
    fn from_record(record: &TimeRecord) -> Self {
        Self {
            swimmer_id: record.swimmer_id.clone(),
            distance: record.distance,
            style: record.style,
            best_time_seconds: record.time_seconds,
            date: record.date,
            competition: record.competition.clone(),
        }
    }
}

type GroupKey<'a> = (&'a str, Distance, Style);

/// Reduce records to one personal best per (swimmer, distance, style).
///
/// The fastest time wins. On equal times the earlier swim wins, and on equal
/// time and date the record seen first. Output is ordered by swimmer id,
/// then distance, then style.
pub fn personal_bests<'a, I>(records: I) -> Vec<PersonalBest>
where
    I: IntoIterator<Item = &'a TimeRecord>,
{
    let mut winners: BTreeMap<GroupKey<'a>, &'a TimeRecord> = BTreeMap::new();

    for record in records {
        let key = (record.swimmer_id.as_str(), record.distance, record.style);
        winners
            .entry(key)
            .and_modify(|best| {
                if beats(record, best) {
                    *best = record;
                }
            })
            .or_insert(record);
    }

    winners
        .into_values()
        .map(PersonalBest::from_record)
        .collect()
}

/// Personal bests of a single swimmer.
pub fn personal_bests_for<'a, I>(records: I, swimmer_id: &str) -> Vec<PersonalBest>
where
    I: IntoIterator<Item = &'a TimeRecord>,
{
    personal_bests(
        records
            .into_iter()
            .filter(|record| record.swimmer_id == swimmer_id),
    )
}

/// Group personal bests by style for display, keeping their order within
/// each style.
pub fn group_by_style(bests: &[PersonalBest]) -> BTreeMap<Style, Vec<&PersonalBest>> {
    let mut groups: BTreeMap<Style, Vec<&PersonalBest>> = BTreeMap::new();
    for best in bests {
        groups.entry(best.style).or_default().push(best);
    }
    groups
}

fn beats(candidate: &TimeRecord, current: &TimeRecord) -> bool {
    match candidate.time_seconds.total_cmp(&current.time_seconds) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Equal => candidate.date < current.date,
        std::cmp::Ordering::Greater => false,
    }
}
