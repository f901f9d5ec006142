//! Command handlers.
//!
//! Each handler reads from the [`Backend`], runs the engine and writes its
//! result to `out`. Diagnostics go through `tracing`, never to `out`.

use crate::backend::Backend;
use crate::cli::{
    BestsArgs, Command, DeleteArgs, EditArgs, EntryArgs, ExportArgs, FilterArgs, ImportArgs,
    ListArgs, SortArgs,
};
use crate::config::Config;
use crate::error::{AppError, Result};
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::Path;
use swimtime_engine::{
    export_csv, group_by_style, import_document, personal_bests, personal_bests_for, time,
    ExportOptions, RecordStore, SwimmerDirectory, SwimmerLookup, TimeQuery, TimeRecord,
    TimeSubmission,
};

/// Run one parsed command.
pub async fn run<W: Write>(
    command: Command,
    backend: &Backend,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::List(args) => list(args, backend, out).await,
        Command::Export(args) => export(args, backend, config, out).await,
        Command::Import(args) => import(args, backend, out).await,
        Command::Bests(args) => bests(args, backend, out).await,
        Command::Add(args) => add(args, backend, out).await,
        Command::Edit(args) => edit(args, backend, out).await,
        Command::Delete(args) => delete(args, backend, out).await,
    }
}

// ========== Queries ==========

fn select<'a>(
    records: &'a [TimeRecord],
    filter: &FilterArgs,
    sort: &SortArgs,
    directory: &SwimmerDirectory,
) -> Vec<&'a TimeRecord> {
    let mut query = TimeQuery::new(records)
        .criteria(filter.criteria())
        .combinator(filter.combinator());
    if let Some((key, direction)) = sort.order() {
        query = query.order(key, direction);
    }
    query.run(directory)
}

async fn list<W: Write>(args: ListArgs, backend: &Backend, out: &mut W) -> Result<()> {
    let records = backend.list().await?;
    let directory = backend.directory().await?;
    let selected = select(&records, &args.filter, &args.sort, &directory);
    tracing::info!(total = records.len(), shown = selected.len(), "listing times");

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &selected)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<12} {:<20} {:>6} {:<10} {:>10} {:>10} {:<10} {:<20}",
        "ID", "SWIMMER", "DIST", "STYLE", "TIME", "PACE", "DATE", "COMPETITION"
    )?;
    for record in selected {
        writeln!(
            out,
            "{:<12} {:<20} {:>6} {:<10} {:>10} {:>10} {:<10} {:<20}",
            record.id,
            directory.resolve_name(&record.swimmer_id),
            record.distance.to_string(),
            record.style.to_string(),
            time::format(record.time_seconds),
            time::format(record.pace()),
            record.day(),
            record.competition.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

async fn export<W: Write>(
    args: ExportArgs,
    backend: &Backend,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let records = backend.list().await?;
    let directory = backend.directory().await?;
    let selected = select(&records, &args.filter, &args.sort, &directory);

    let options = ExportOptions::new(args.locale.unwrap_or(config.locale));
    let document = export_csv(selected.iter().copied(), &directory, &options)?;

    if args.output == Path::new("-") {
        out.write_all(document.as_bytes())?;
    } else {
        fs::write(&args.output, document)?;
        tracing::info!(
            path = %args.output.display(),
            rows = selected.len(),
            "wrote export"
        );
    }
    Ok(())
}

async fn bests<W: Write>(args: BestsArgs, backend: &Backend, out: &mut W) -> Result<()> {
    let records = backend.list().await?;
    let bests = match &args.swimmer {
        Some(swimmer_id) => personal_bests_for(&records, swimmer_id),
        None => personal_bests(&records),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &bests)?;
        writeln!(out)?;
        return Ok(());
    }

    let directory = backend.directory().await?;
    for (style, group) in group_by_style(&bests) {
        writeln!(out, "{style}")?;
        for best in group {
            writeln!(
                out,
                "  {:<20} {:>6} {:>10} {:<10} {}",
                directory.resolve_name(&best.swimmer_id),
                best.distance.to_string(),
                time::format(best.best_time_seconds),
                best.date.date_naive(),
                best.competition.as_deref().unwrap_or("-"),
            )?;
        }
    }
    Ok(())
}

// ========== Mutations ==========

async fn import<W: Write>(args: ImportArgs, backend: &Backend, out: &mut W) -> Result<()> {
    let text = fs::read_to_string(&args.input)?;
    let report = import_document(backend, &text).await?;
    backend.persist()?;

    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "import finished"
    );
    writeln!(
        out,
        "Imported {} time(s), {} failed",
        report.succeeded, report.failed
    )?;
    for failure in &report.failures {
        writeln!(out, "  element {}: {}", failure.index, failure.reason)?;
    }

    if report.all_succeeded() {
        Ok(())
    } else {
        Err(AppError::ImportIncomplete {
            failed: report.failed,
            total: report.succeeded + report.failed,
        })
    }
}

fn submission_from(args: EntryArgs) -> Result<TimeSubmission> {
    let submission = args
        .into_entry(Utc::now().date_naive())
        .into_submission();
    submission.validate()?;
    Ok(submission)
}

async fn add<W: Write>(args: EntryArgs, backend: &Backend, out: &mut W) -> Result<()> {
    let record = backend.create(submission_from(args)?).await?;
    backend.persist()?;

    tracing::info!(id = %record.id, "time recorded");
    writeln!(out, "{} {}", record.id, time::format(record.time_seconds))?;
    Ok(())
}

async fn edit<W: Write>(args: EditArgs, backend: &Backend, out: &mut W) -> Result<()> {
    let record = backend.update(&args.id, submission_from(args.entry)?).await?;
    backend.persist()?;

    tracing::info!(id = %record.id, "time replaced");
    writeln!(out, "{} {}", record.id, time::format(record.time_seconds))?;
    Ok(())
}

async fn delete<W: Write>(args: DeleteArgs, backend: &Backend, out: &mut W) -> Result<()> {
    backend.delete(&args.id).await?;
    backend.persist()?;

    tracing::info!(id = %args.id, "time deleted");
    writeln!(out, "deleted {}", args.id)?;
    Ok(())
}
