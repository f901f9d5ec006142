//! Command-line surface of the `swimtime` binary.

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use swimtime_engine::{
    Combinator, Direction, Distance, FilterCriteria, Locale, Qualification, SortKey, Style,
    TimeEntry,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Swimming club race-time records", long_about = None)]
pub struct Cli {
    /// Work against a local JSON snapshot instead of the club backend
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List times, filtered and sorted
    List(ListArgs),
    /// Export times as CSV
    Export(ExportArgs),
    /// Import a JSON array of times
    Import(ImportArgs),
    /// Show personal bests grouped by style
    Bests(BestsArgs),
    /// Record a new time
    Add(EntryArgs),
    /// Replace an existing time
    Edit(EditArgs),
    /// Delete a time
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this swimmer id
    #[arg(long)]
    pub swimmer: Option<String>,

    /// Only this distance in meters (50, 100, 200, 400, 800, 1500)
    #[arg(long)]
    pub distance: Option<Distance>,

    /// Only this stroke
    #[arg(long)]
    pub style: Option<Style>,

    /// Only swims on this day (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Standard A flag (si, no, unknown)
    #[arg(long)]
    pub standard_a: Option<Qualification>,

    /// Standard B flag (si, no, unknown)
    #[arg(long)]
    pub standard_b: Option<Qualification>,

    /// Keep records matching any filter instead of all of them
    #[arg(long, action = ArgAction::SetTrue)]
    pub any: bool,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            swimmer_id: self.swimmer.clone(),
            distance: self.distance,
            style: self.style,
            date: self.date,
            standard_a: self.standard_a,
            standard_b: self.standard_b,
        }
    }

    pub fn combinator(&self) -> Combinator {
        if self.any {
            Combinator::Any
        } else {
            Combinator::All
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SortArgs {
    /// Sort column (swimmer, distance, style, time, pace, date, competition, official)
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long, action = ArgAction::SetTrue)]
    pub desc: bool,
}

impl SortArgs {
    pub fn order(&self) -> Option<(SortKey, Direction)> {
        let direction = if self.desc {
            Direction::Descending
        } else {
            Direction::Ascending
        };
        self.sort.map(|key| (key, direction))
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Print JSON instead of a table
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Output CSV path (`-` for stdout)
    #[arg(short, long, default_value = "-", value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Header language (es, en); defaults to SWIMTIME_LOCALE
    #[arg(long)]
    pub locale: Option<Locale>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON document to import
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct BestsArgs {
    /// Only this swimmer id
    #[arg(long)]
    pub swimmer: Option<String>,

    /// Print JSON instead of a table
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EntryArgs {
    /// Swimmer id
    #[arg(long)]
    pub swimmer: String,

    /// Distance in meters
    #[arg(long)]
    pub distance: Distance,

    /// Stroke
    #[arg(long)]
    pub style: Style,

    /// Minutes as typed
    #[arg(long, default_value = "")]
    pub minutes: String,

    /// Seconds as typed
    #[arg(long, default_value = "")]
    pub seconds: String,

    /// Milliseconds as typed
    #[arg(long, default_value = "")]
    pub millis: String,

    /// Day of the swim (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Competition name
    #[arg(long, default_value = "")]
    pub competition: String,

    /// Mark the time as unofficial
    #[arg(long, action = ArgAction::SetTrue)]
    pub unofficial: bool,
}

impl EntryArgs {
    pub fn into_entry(self, today: NaiveDate) -> TimeEntry {
        TimeEntry {
            swimmer_id: self.swimmer,
            distance: self.distance,
            style: self.style,
            minutes: self.minutes,
            seconds: self.seconds,
            milliseconds: self.millis,
            date: self.date.unwrap_or(today),
            competition: self.competition,
            is_official: Some(!self.unofficial),
        }
    }
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Id of the time to replace
    pub id: String,

    #[command(flatten)]
    pub entry: EntryArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the time to delete
    pub id: String,
}
