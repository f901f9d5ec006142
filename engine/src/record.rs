//! Record types for swim times.

use crate::{error::Result, time, Error, Locale, RecordId, SwimmerId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Tolerance used when comparing a cached pace with the derived one.
pub const PACE_TOLERANCE: f64 = 1e-6;

/// Race distance. Only the pool distances the club records are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Distance {
    M50,
    M100,
    M200,
    M400,
    M800,
    M1500,
}

impl Distance {
    /// All distances, shortest first.
    pub const ALL: [Distance; 6] = [
        Distance::M50,
        Distance::M100,
        Distance::M200,
        Distance::M400,
        Distance::M800,
        Distance::M1500,
    ];

    /// Length in metres.
    pub fn meters(self) -> u32 {
        match self {
            Distance::M50 => 50,
            Distance::M100 => 100,
            Distance::M200 => 200,
            Distance::M400 => 400,
            Distance::M800 => 800,
            Distance::M1500 => 1500,
        }
    }

    /// Pace per 100 m for a time swum over this distance.
    pub fn pace_for(self, time_seconds: f64) -> f64 {
        time_seconds / (self.meters() as f64 / 100.0)
    }
}

impl TryFrom<u32> for Distance {
    type Error = Error;

    fn try_from(meters: u32) -> Result<Self> {
        Distance::ALL
            .into_iter()
            .find(|d| d.meters() == meters)
            .ok_or(Error::InvalidDistance(meters))
    }
}

impl From<Distance> for u32 {
    fn from(distance: Distance) -> Self {
        distance.meters()
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.meters())
    }
}

impl FromStr for Distance {
    type Err = Error;

    /// Accepts `100` or `100m`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_end_matches(['m', 'M']);
        let meters: u32 = digits.parse().map_err(|_| Error::Unrecognised {
            kind: "distance",
            value: s.to_string(),
        })?;
        Distance::try_from(meters)
    }
}

/// Swimming stroke.
///
/// Serialized with the club's Spanish labels; English names are accepted on
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Style {
    #[serde(rename = "Libre", alias = "Freestyle")]
    Freestyle,
    #[serde(rename = "Espalda", alias = "Backstroke")]
    Backstroke,
    #[serde(rename = "Braza", alias = "Breaststroke")]
    Breaststroke,
    #[serde(rename = "Mariposa", alias = "Butterfly")]
    Butterfly,
    #[serde(rename = "Estilos", alias = "Medley")]
    Medley,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Style::Freestyle,
        Style::Backstroke,
        Style::Breaststroke,
        Style::Butterfly,
        Style::Medley,
    ];

    /// Display label in the given locale.
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Style::Freestyle, Locale::Es) => "Libre",
            (Style::Backstroke, Locale::Es) => "Espalda",
            (Style::Breaststroke, Locale::Es) => "Braza",
            (Style::Butterfly, Locale::Es) => "Mariposa",
            (Style::Medley, Locale::Es) => "Estilos",
            (Style::Freestyle, Locale::En) => "Freestyle",
            (Style::Backstroke, Locale::En) => "Backstroke",
            (Style::Breaststroke, Locale::En) => "Breaststroke",
            (Style::Butterfly, Locale::En) => "Butterfly",
            (Style::Medley, Locale::En) => "Medley",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Locale::default()))
    }
}

impl FromStr for Style {
    type Err = Error;

    /// Case-insensitive match on either language's label.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Style::ALL
            .into_iter()
            .find(|style| {
                [Locale::Es, Locale::En]
                    .into_iter()
                    .any(|locale| style.label(locale).eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| Error::InvalidStyle(s.to_string()))
    }
}

/// Whether a time meets an external federation standard.
///
/// Set by the qualification process outside this engine. Records that were
/// never assessed are `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Qualification {
    Yes,
    No,
    #[default]
    Unknown,
}

impl<'de> Deserialize<'de> for Qualification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Flag(bool),
            Text(String),
        }

        Ok(match Option::<Wire>::deserialize(deserializer)? {
            None => Qualification::Unknown,
            Some(Wire::Flag(true)) => Qualification::Yes,
            Some(Wire::Flag(false)) => Qualification::No,
            Some(Wire::Text(text)) => text.parse().unwrap_or(Qualification::Unknown),
        })
    }
}

impl Serialize for Qualification {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Qualification::Yes => serializer.serialize_str("si"),
            Qualification::No => serializer.serialize_str("no"),
            Qualification::Unknown => serializer.serialize_none(),
        }
    }
}

impl FromStr for Qualification {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "si" | "sí" | "yes" | "y" | "true" => Ok(Qualification::Yes),
            "no" | "n" | "false" => Ok(Qualification::No),
            "unknown" | "" => Ok(Qualification::Unknown),
            _ => Err(Error::Unrecognised {
                kind: "qualification flag",
                value: s.to_string(),
            }),
        }
    }
}

/// A swimmer identity, owned by user management.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swimmer {
    pub id: SwimmerId,
    pub name: String,
}

impl Swimmer {
    pub fn new(id: impl Into<SwimmerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One timed swim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    /// Identifier assigned by the record store
    pub id: RecordId,
    #[serde(alias = "swimmer_id")]
    pub swimmer_id: SwimmerId,
    #[serde(rename = "distanceMeters", alias = "distance")]
    pub distance: Distance,
    pub style: Style,
    /// Canonical elapsed time in seconds, millisecond resolution
    #[serde(alias = "time_seconds")]
    pub time_seconds: f64,
    /// Cached pace; derived from the time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_seconds_100m: Option<f64>,
    #[serde(deserialize_with = "deserialize_instant")]
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_competition")]
    pub competition: Option<String>,
    #[serde(default = "default_official", alias = "oficial", alias = "is_official")]
    pub is_official: bool,
    #[serde(default, alias = "minima_eh")]
    pub meets_standard_a: Qualification,
    #[serde(default, alias = "minima_bizkaia")]
    pub meets_standard_b: Qualification,
}

impl TimeRecord {
    /// Build a stored record from a submission.
    pub fn from_submission(id: impl Into<RecordId>, submission: TimeSubmission) -> Self {
        Self {
            id: id.into(),
            swimmer_id: submission.swimmer_id,
            distance: submission.distance,
            style: submission.style,
            time_seconds: submission.time_seconds,
            pace_seconds_100m: None,
            date: submission.date,
            competition: normalize_competition(submission.competition),
            is_official: submission.is_official,
            meets_standard_a: Qualification::Unknown,
            meets_standard_b: Qualification::Unknown,
        }
    }

    /// Replace every submitted field.
    ///
    /// The cached pace and the qualification flags describe the old time, so
    /// they are cleared too.
    pub fn replace_with(&mut self, submission: TimeSubmission) {
        let id = std::mem::take(&mut self.id);
        *self = Self::from_submission(id, submission);
    }

    /// Pace per 100 m, cached or derived.
    pub fn pace(&self) -> f64 {
        self.pace_seconds_100m
            .unwrap_or_else(|| self.distance.pace_for(self.time_seconds))
    }

    /// UTC calendar day of the swim.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Check the record's data invariants.
    pub fn check_invariants(&self) -> Result<()> {
        if !self.time_seconds.is_finite() || self.time_seconds < 0.0 {
            return Err(Error::InvalidTime(self.time_seconds));
        }
        if let Some(cached) = self.pace_seconds_100m {
            let derived = self.distance.pace_for(self.time_seconds);
            if (cached - derived).abs() > PACE_TOLERANCE {
                return Err(Error::PaceMismatch { cached, derived });
            }
        }
        Ok(())
    }
}

/// The payload sent to the record store to create or replace a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSubmission {
    #[serde(alias = "swimmer_id")]
    pub swimmer_id: SwimmerId,
    #[serde(rename = "distanceMeters", alias = "distance")]
    pub distance: Distance,
    pub style: Style,
    #[serde(alias = "time_seconds")]
    pub time_seconds: f64,
    #[serde(deserialize_with = "deserialize_instant")]
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_competition")]
    pub competition: Option<String>,
    #[serde(default = "default_official", alias = "oficial", alias = "is_official")]
    pub is_official: bool,
}

impl TimeSubmission {
    pub fn new(
        swimmer_id: impl Into<SwimmerId>,
        distance: Distance,
        style: Style,
        time_seconds: f64,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            swimmer_id: swimmer_id.into(),
            distance,
            style,
            time_seconds,
            date,
            competition: None,
            is_official: true,
        }
    }

    /// Set the competition label. Blank labels are stored as absent.
    pub fn with_competition(mut self, competition: impl Into<String>) -> Self {
        self.competition = normalize_competition(Some(competition.into()));
        self
    }

    pub fn with_official(mut self, is_official: bool) -> Self {
        self.is_official = is_official;
        self
    }

    /// Reject times that are negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.time_seconds.is_finite() || self.time_seconds < 0.0 {
            return Err(Error::InvalidTime(self.time_seconds));
        }
        Ok(())
    }
}

impl From<&TimeRecord> for TimeSubmission {
    fn from(record: &TimeRecord) -> Self {
        Self {
            swimmer_id: record.swimmer_id.clone(),
            distance: record.distance,
            style: record.style,
            time_seconds: record.time_seconds,
            date: record.date,
            competition: record.competition.clone(),
            is_official: record.is_official,
        }
    }
}

/// Structured form input for a new or edited time.
///
/// The time components are kept as the raw text the user typed; they are
/// parsed permissively by [`time::encode_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub swimmer_id: SwimmerId,
    pub distance: Distance,
    pub style: Style,
    pub minutes: String,
    pub seconds: String,
    pub milliseconds: String,
    pub date: NaiveDate,
    pub competition: String,
    /// `None` when the submitting role cannot choose; treated as official
    pub is_official: Option<bool>,
}

impl TimeEntry {
    pub fn into_submission(self) -> TimeSubmission {
        TimeSubmission {
            time_seconds: time::encode_text(&self.minutes, &self.seconds, &self.milliseconds),
            swimmer_id: self.swimmer_id,
            distance: self.distance,
            style: self.style,
            date: self.date.and_time(NaiveTime::MIN).and_utc(),
            competition: normalize_competition(Some(self.competition)),
            is_official: self.is_official.unwrap_or(true),
        }
    }
}

/// Parse an instant in any of the shapes the backend has produced.
///
/// Accepts RFC 3339, a naive date-time (taken as UTC) and a bare calendar
/// date (midnight UTC).
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>> {
    let s = input.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }

    for pattern in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| Error::InvalidDate(input.to_string()))
}

/// Blank competition labels mean "no competition".
pub fn normalize_competition(competition: Option<String>) -> Option<String> {
    competition
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn default_official() -> bool {
    true
}

fn deserialize_instant<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_competition<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(normalize_competition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_submission() -> TimeSubmission {
        TimeSubmission::new(
            "swimmer-1",
            Distance::M100,
            Style::Freestyle,
            62.5,
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn distance_from_meters() {
        assert_eq!(Distance::try_from(200).unwrap(), Distance::M200);
        assert_eq!(Distance::try_from(75), Err(Error::InvalidDistance(75)));
        assert_eq!("1500m".parse::<Distance>().unwrap(), Distance::M1500);
        assert_eq!(Distance::M50.to_string(), "50m");
    }

    #[test]
    fn style_labels_in_both_languages() {
        assert_eq!("braza".parse::<Style>().unwrap(), Style::Breaststroke);
        assert_eq!("Butterfly".parse::<Style>().unwrap(), Style::Butterfly);
        assert!("Crawl".parse::<Style>().is_err());
        assert_eq!(Style::Medley.label(Locale::En), "Medley");
        assert_eq!(Style::Medley.to_string(), "Estilos");
    }

    #[test]
    fn create_record_from_submission() {
        let record = TimeRecord::from_submission("time_1", sample_submission());

        assert_eq!(record.id, "time_1");
        assert_eq!(record.swimmer_id, "swimmer-1");
        assert_eq!(record.pace_seconds_100m, None);
        assert!(record.is_official);
        assert_eq!(record.meets_standard_a, Qualification::Unknown);
        assert!((record.pace() - 62.5).abs() < 1e-9);
    }

    #[test]
    fn replace_clears_derived_fields() {
        let mut record = TimeRecord::from_submission("time_1", sample_submission());
        record.pace_seconds_100m = Some(62.5);
        record.meets_standard_a = Qualification::Yes;

        let mut replacement = sample_submission();
        replacement.distance = Distance::M200;
        replacement.time_seconds = 130.0;
        record.replace_with(replacement);

        assert_eq!(record.id, "time_1");
        assert_eq!(record.distance, Distance::M200);
        assert_eq!(record.pace_seconds_100m, None);
        assert_eq!(record.meets_standard_a, Qualification::Unknown);
        assert!((record.pace() - 65.0).abs() < 1e-9);
    }

    #[test]
    fn deserialize_backend_shape() {
        let record: TimeRecord = serde_json::from_value(json!({
            "id": "t1",
            "swimmer_id": "s1",
            "distance": 50,
            "style": "Mariposa",
            "time_seconds": 31.2,
            "date": "2024-03-02T00:00:00",
            "competition": "",
            "oficial": false,
            "minima_eh": "si",
            "minima_bizkaia": null
        }))
        .unwrap();

        assert_eq!(record.swimmer_id, "s1");
        assert_eq!(record.distance, Distance::M50);
        assert_eq!(record.style, Style::Butterfly);
        assert_eq!(record.competition, None);
        assert!(!record.is_official);
        assert_eq!(record.meets_standard_a, Qualification::Yes);
        assert_eq!(record.meets_standard_b, Qualification::Unknown);
        assert_eq!(record.day(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn deserialize_rejects_unknown_distance() {
        let result: std::result::Result<TimeSubmission, _> = serde_json::from_value(json!({
            "swimmerId": "s1",
            "distanceMeters": 25,
            "style": "Libre",
            "timeSeconds": 12.0,
            "date": "2024-03-02"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn submission_defaults() {
        let submission: TimeSubmission = serde_json::from_value(json!({
            "swimmerId": "s1",
            "distanceMeters": 100,
            "style": "Freestyle",
            "timeSeconds": 65.0,
            "date": "2024-03-02"
        }))
        .unwrap();

        assert!(submission.is_official);
        assert_eq!(submission.competition, None);
        assert_eq!(submission.style, Style::Freestyle);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut record = TimeRecord::from_submission(
            "time_1",
            sample_submission().with_competition("Open de Bilbao"),
        );
        record.meets_standard_b = Qualification::No;

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"distanceMeters\":100"));
        assert!(json.contains("\"style\":\"Libre\""));
        let parsed: TimeRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, parsed);
    }

    #[test]
    fn entry_to_submission() {
        let entry = TimeEntry {
            swimmer_id: "s1".into(),
            distance: Distance::M100,
            style: Style::Backstroke,
            minutes: "1".into(),
            seconds: "10".into(),
            milliseconds: "111".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
            competition: "   ".into(),
            is_official: None,
        };

        let submission = entry.into_submission();
        assert!((submission.time_seconds - 70.111).abs() < 1e-9);
        assert_eq!(submission.competition, None);
        assert!(submission.is_official);
        assert_eq!(submission.date.to_rfc3339(), "2024-06-09T00:00:00+00:00");
    }

    #[test]
    fn instant_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_instant("2024-01-02T03:04:05Z").unwrap(), expected);
        assert_eq!(parse_instant("2024-01-02T05:04:05+02:00").unwrap(), expected);
        assert_eq!(parse_instant("2024-01-02T03:04:05").unwrap(), expected);
        assert_eq!(
            parse_instant("2024-01-02").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn invariants() {
        let mut record = TimeRecord::from_submission("t", sample_submission());
        assert!(record.check_invariants().is_ok());

        record.pace_seconds_100m = Some(99.0);
        assert!(matches!(
            record.check_invariants(),
            Err(Error::PaceMismatch { .. })
        ));

        record.pace_seconds_100m = None;
        record.time_seconds = -1.0;
        assert_eq!(record.check_invariants(), Err(Error::InvalidTime(-1.0)));
    }

    #[test]
    fn qualification_wire_values() {
        let q: Qualification = serde_json::from_value(json!("no")).unwrap();
        assert_eq!(q, Qualification::No);
        let q: Qualification = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(q, Qualification::Yes);
        let q: Qualification = serde_json::from_value(json!("maybe")).unwrap();
        assert_eq!(q, Qualification::Unknown);
        assert_eq!(serde_json::to_value(Qualification::Yes).unwrap(), json!("si"));
    }
}
