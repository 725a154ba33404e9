//! Keystroke Stats - key press frequencies from recorded event logs

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use keystroke_stats::{
    config::Config,
    corpus::CorpusReader,
    keyboard::{Resolver, DEFAULT_LABELS},
    pipeline::{EventPipeline, PipelineStats},
    report::FrequencyReport,
    stats::{key_down_labels, FrequencyTable},
    utils::TimeWindow,
};

/// Key press frequencies from recorded evdev event logs
#[derive(Parser, Debug)]
#[command(name = "keystroke-stats", version, about)]
struct Args {
    /// Slice of the corpus to analyse (defaults to today)
    #[command(subcommand)]
    range: Option<Range>,

    /// Count every key-down by code, modifiers included
    #[arg(long, global = true)]
    raw: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a JSON report to this file
    #[arg(long, global = true, value_name = "PATH")]
    export: Option<PathBuf>,
}

/// Which slice of the corpus to analyse
#[derive(Subcommand, Debug, Clone, Copy, PartialEq)]
enum Range {
    /// Events of the current local day
    Today,
    /// Events of one local calendar day
    Day {
        #[arg(value_name = "YYYY-MM-DD", value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Every event in the directory
    All,
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().context("failed to load config")?,
    };

    let events_path = config.events_path().ok_or_else(|| {
        anyhow!("no event directory: set INPUT_EVENTS_PATH or input.events_path in the config")
    })?;

    let window = match args.range.unwrap_or(Range::Today) {
        Range::Today => TimeWindow::today(),
        Range::Day { date } => TimeWindow::for_date(date),
        Range::All => Some(TimeWindow::all()),
    }
    .ok_or_else(|| anyhow!("no local midnight for the requested day"))?;

    let reader = CorpusReader::new(&events_path).sorted(config.input.sort);
    let events = reader.read_window(window)?;
    info!("Read {} events from {}", events.len(), events_path.display());

    let ambiguity = config.ambiguity_table();
    let (table, stats, expiries) = if args.raw {
        let key_downs = key_down_labels(&events, &DEFAULT_LABELS);
        let stats = PipelineStats {
            events_seen: events.len() as u64,
            ..PipelineStats::default()
        };
        (FrequencyTable::from_key_downs(&key_downs, &ambiguity), stats, 0)
    } else {
        let resolver = Resolver::new(&DEFAULT_LABELS, &ambiguity);
        let mut pipeline = EventPipeline::new(resolver, config.modifier_tracker());
        let presses = pipeline.run(&events);
        let stats = pipeline.stats();
        let expiries = pipeline.tracker().expired_count();
        (FrequencyTable::from_presses(&presses), stats, expiries)
    };

    for (label, count) in table.sorted() {
        println!("{:>16} {}", label, count);
    }
    println!();
    println!("Distinct labels: {}", table.len());
    println!("Total key presses: {}", table.total());
    if stats.dropped > 0 {
        println!("Dropped presses: {}", stats.dropped);
    }

    if let Some(path) = &args.export {
        let report = FrequencyReport::new(window, &table, stats, expiries);
        report
            .export_json(path)
            .with_context(|| format!("failed to export report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
