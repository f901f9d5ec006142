//! Filter engine.
//!
//! A [`FilterCriteria`] holds up to six independent constraints. Each one is
//! either unset or a concrete value, and the set ones are joined with a
//! [`Combinator`]:
//!
//! - [`Combinator::All`] keeps a record that satisfies every set criterion.
//! - [`Combinator::Any`] keeps a record that satisfies at least one set
//!   criterion. Unset criteria never count as satisfied.
//!
//! With nothing set the input is returned as is under either combinator.

use crate::{Distance, Error, Qualification, Style, SwimmerId, TimeRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How set criteria are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Every set criterion must match
    #[default]
    All,
    /// At least one set criterion must match
    Any,
}

impl FromStr for Combinator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "and" => Ok(Combinator::All),
            "any" | "or" => Ok(Combinator::Any),
            _ => Err(Error::Unrecognised {
                kind: "combinator",
                value: s.to_string(),
            }),
        }
    }
}

/// Per-field constraints. `None` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub swimmer_id: Option<SwimmerId>,
    pub distance: Option<Distance>,
    pub style: Option<Style>,
    /// Calendar day the swim took place on, compared with the record's
    /// instant converted to UTC. The backend stores UTC instants, so this is
    /// the day prefix of its ISO strings; an instant written with another
    /// offset is matched on its UTC day, not its local one.
    pub date: Option<NaiveDate>,
    pub standard_a: Option<Qualification>,
    pub standard_b: Option<Qualification>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn swimmer(mut self, swimmer_id: impl Into<SwimmerId>) -> Self {
        self.swimmer_id = Some(swimmer_id.into());
        self
    }

    pub fn distance(mut self, distance: Distance) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn standard_a(mut self, flag: Qualification) -> Self {
        self.standard_a = Some(flag);
        self
    }

    pub fn standard_b(mut self, flag: Qualification) -> Self {
        self.standard_b = Some(flag);
        self
    }

    /// True when no criterion is set.
    pub fn is_unset(&self) -> bool {
        self.swimmer_id.is_none()
            && self.distance.is_none()
            && self.style.is_none()
            && self.date.is_none()
            && self.standard_a.is_none()
            && self.standard_b.is_none()
    }

    /// Evaluate the set criteria against one record.
    ///
    /// This is the raw predicate: with nothing set it returns `true` for
    /// `All` and `false` for `Any`. Use [`filter`] for collection semantics.
    pub fn matches(&self, record: &TimeRecord, combinator: Combinator) -> bool {
        let mut outcomes = self.outcomes(record).into_iter().flatten();
        match combinator {
            Combinator::All => outcomes.all(|matched| matched),
            Combinator::Any => outcomes.any(|matched| matched),
        }
    }

    /// One slot per criterion; `None` for unset ones.
    fn outcomes(&self, record: &TimeRecord) -> [Option<bool>; 6] {
        [
            self.swimmer_id.as_ref().map(|id| *id == record.swimmer_id),
            self.distance.map(|d| d == record.distance),
            self.style.map(|s| s == record.style),
            self.date.map(|day| day == record.day()),
            self.standard_a.map(|flag| flag == record.meets_standard_a),
            self.standard_b.map(|flag| flag == record.meets_standard_b),
        ]
    }
}

/// Keep the records that satisfy `criteria` under `combinator`.
///
/// Input order is preserved and each record appears at most once.
pub fn filter<'a, I>(
    records: I,
    criteria: &FilterCriteria,
    combinator: Combinator,
) -> Vec<&'a TimeRecord>
where
    I: IntoIterator<Item = &'a TimeRecord>,
{
    if criteria.is_unset() {
        return records.into_iter().collect();
    }

    records
        .into_iter()
        .filter(|record| criteria.matches(record, combinator))
        .collect()
}
