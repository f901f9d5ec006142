//! Builder for querying a snapshot of time records.

use crate::{
    filter, sort, Combinator, Direction, Distance, FilterCriteria, Qualification, SortKey, Style,
    SwimmerId, SwimmerLookup, TimeRecord,
};
use chrono::NaiveDate;

/// Filter-then-sort query over a borrowed record collection.
///
/// ```rust
/// use swimtime_engine::{
///     parse_instant, Distance, Style, SwimmerDirectory, TimeQuery, TimeRecord, TimeSubmission,
/// };
///
/// let records = vec![
///     TimeRecord::from_submission(
///         "t1",
///         TimeSubmission::new("s1", Distance::M100, Style::Freestyle, 61.0,
///             parse_instant("2024-05-01").unwrap()),
///     ),
///     TimeRecord::from_submission(
///         "t2",
///         TimeSubmission::new("s1", Distance::M100, Style::Freestyle, 59.4,
///             parse_instant("2024-06-01").unwrap()),
///     ),
/// ];
///
/// let fastest = TimeQuery::new(&records)
///     .distance(Distance::M100)
///     .sort_by(swimtime_engine::SortKey::Time)
///     .run(&SwimmerDirectory::new());
/// assert_eq!(fastest[0].id, "t2");
/// ```
#[derive(Debug)]
pub struct TimeQuery<'a> {
    records: &'a [TimeRecord],
    criteria: FilterCriteria,
    combinator: Combinator,
    order: Option<(SortKey, Direction)>,
}

impl<'a> TimeQuery<'a> {
    pub fn new(records: &'a [TimeRecord]) -> Self {
        Self {
            records,
            criteria: FilterCriteria::default(),
            combinator: Combinator::All,
            order: None,
        }
    }

    /// Replace the whole criteria set.
    pub fn criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn swimmer(mut self, swimmer_id: impl Into<SwimmerId>) -> Self {
        self.criteria = self.criteria.swimmer(swimmer_id);
        self
    }

    pub fn distance(mut self, distance: Distance) -> Self {
        self.criteria = self.criteria.distance(distance);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.criteria = self.criteria.style(style);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.criteria = self.criteria.on(date);
        self
    }

    pub fn standard_a(mut self, flag: Qualification) -> Self {
        self.criteria = self.criteria.standard_a(flag);
        self
    }

    pub fn standard_b(mut self, flag: Qualification) -> Self {
        self.criteria = self.criteria.standard_b(flag);
        self
    }

    /// Keep records matching any set criterion instead of all of them.
    pub fn any(mut self) -> Self {
        self.combinator = Combinator::Any;
        self
    }

    pub fn combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    /// Sort ascending by `key`.
    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.order = Some((key, Direction::Ascending));
        self
    }

    pub fn order(mut self, key: SortKey, direction: Direction) -> Self {
        self.order = Some((key, direction));
        self
    }

    /// Count matching records without sorting.
    pub fn count(&self) -> usize {
        filter(self.records, &self.criteria, self.combinator).len()
    }

    /// Filter, then sort if an order was requested.
    pub fn run<L>(self, lookup: &L) -> Vec<&'a TimeRecord>
    where
        L: SwimmerLookup + ?Sized,
    {
        let matched = filter(self.records, &self.criteria, self.combinator);
        match self.order {
            Some((key, direction)) => sort(matched, key, direction, lookup),
            None => matched,
        }
    }
}
