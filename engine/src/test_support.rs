//! Record builders shared by the unit tests.

use crate::{parse_instant, Distance, Style, TimeRecord, TimeSubmission};

pub(crate) fn record(
    id: &str,
    swimmer_id: &str,
    distance: Distance,
    style: Style,
    time_seconds: f64,
    date: &str,
) -> TimeRecord {
    let submission = TimeSubmission::new(
        swimmer_id,
        distance,
        style,
        time_seconds,
        parse_instant(date).unwrap(),
    );
    TimeRecord::from_submission(id, submission)
}

pub(crate) fn ids<'a, I>(records: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a TimeRecord>,
{
    records.into_iter().map(|r| r.id.as_str()).collect()
}
