#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the kehilot map.
//!
//! Queries the historical tables for a year, walks the timeline, and runs
//! the dataset maintenance tools (event sorting, census conversion and the
//! single-row towns report).
//!
//! The configuration file is taken from `--config` or `KEHILOT_MAP_CONFIG`,
//! and the data directory (or base URL) from `--data-dir` or
//! `KEHILOT_MAP_DATA_DIR`. Without either, the built-in configuration reads
//! `data/` relative to the working directory.

mod render;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use kehilot_map_calendar::{dual_year_label, to_hebrew_year, to_letter_numeral};
use kehilot_map_engine::classify::SizeScale;
use kehilot_map_engine::{QueryEngine, QueryResult, YearRange};
use kehilot_map_history_models::{ClusterGroup, Language};
use kehilot_map_source::config::MapConfig;
use kehilot_map_source::store::DataStore;
use kehilot_map_source::tables::EventTable;
use kehilot_map_spatial::{ClusterParams, cluster_projections};
use kehilot_map_timeline::{Playback, PlaybackSettings, historical_events, markers};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "kehilot_map", about = "Historical map of Jewish communities")]
struct Cli {
    /// Configuration file (overrides `KEHILOT_MAP_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Data directory or base URL (overrides `KEHILOT_MAP_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<String>,
    /// Language for names and titles
    #[arg(long, global = true, value_enum, default_value = "en")]
    lang: DisplayLanguage,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show everything active in a year
    Query {
        /// Gregorian year (negative for BCE)
        #[arg(long, allow_negative_numbers = true)]
        year: i32,
        /// Cluster radius in pixels (defaults to the configured radius)
        #[arg(long)]
        radius: Option<u32>,
        /// Map zoom level (defaults to the configured zoom)
        #[arg(long)]
        zoom: Option<f64>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Convert a Gregorian year to the Hebrew calendar
    Year {
        /// Gregorian year (negative for BCE)
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },
    /// List the landmark events on the timeline
    Timeline,
    /// Auto-advance through the timeline, printing a summary per year
    Play {
        /// First year
        #[arg(long, allow_negative_numbers = true)]
        from: i32,
        /// Last year (defaults to the end of the timeline)
        #[arg(long, allow_negative_numbers = true)]
        to: Option<i32>,
    },
    /// Rewrite an event table sorted by start year
    SortEvents {
        /// Which table layout the file uses
        #[arg(long, value_enum)]
        table: TableKind,
        /// Input CSV file
        input: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Convert census observation rows into settlement rows
    Convert {
        /// Input CSV file of observations
        input: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List towns that have only one settlement row
    SingleRowTowns {
        /// Settlement CSV file
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TableKind {
    Ellipse,
    Polygon,
    Migration,
}

impl From<TableKind> for EventTable {
    fn from(kind: TableKind) -> Self {
        match kind {
            TableKind::Ellipse => Self::Ellipse,
            TableKind::Polygon => Self::Polygon,
            TableKind::Migration => Self::Migration,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DisplayLanguage {
    En,
    He,
    Fr,
}

impl From<DisplayLanguage> for Language {
    fn from(language: DisplayLanguage) -> Self {
        match language {
            DisplayLanguage::En => Self::En,
            DisplayLanguage::He => Self::He,
            DisplayLanguage::Fr => Self::Fr,
        }
    }
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    #[serde(flatten)]
    result: &'a QueryResult<'a>,
    clusters: Vec<ClusterGroup>,
}

fn load_config(path: Option<PathBuf>) -> Result<MapConfig, Box<dyn std::error::Error>> {
    let path = path.or_else(|| std::env::var("KEHILOT_MAP_CONFIG").ok().map(PathBuf::from));
    Ok(MapConfig::load(path.as_deref())?)
}

async fn load_engine(config: &MapConfig, data_dir: Option<String>) -> QueryEngine {
    let data_dir = data_dir.or_else(|| std::env::var("KEHILOT_MAP_DATA_DIR").ok());
    let fetcher = config.data.fetcher(data_dir.as_deref());
    let store = DataStore::new(fetcher, config.data.clone());
    QueryEngine::new(store.load().await, YearRange::from(config.years))
}

fn write_output(text: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let language = Language::from(cli.lang);

    match cli.command {
        Commands::Query {
            year,
            radius,
            zoom,
            json,
        } => {
            let config = load_config(cli.config)?;
            let engine = load_engine(&config, cli.data_dir).await;
            let result = engine.set_query_year(year)?;

            let params = ClusterParams {
                radius_px: f64::from(radius.unwrap_or(config.cluster.radius_px)),
                zoom: zoom.unwrap_or(config.cluster.zoom),
            };
            let clusters = cluster_projections(&result.settlements, params);

            if json {
                let output = QueryOutput {
                    result: &result,
                    clusters,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let scale = SizeScale::from(&config.size);
                println!("{}", render::summary_line(&result));
                println!();
                for line in render::settlement_lines(&result, &scale, language) {
                    println!("  {line}");
                }
                for line in render::event_lines(&result, language) {
                    println!("  {line}");
                }
                println!();
                println!(
                    "{} cluster(s) at zoom {} within {} px:",
                    clusters.len(),
                    params.zoom,
                    params.radius_px
                );
                for line in render::cluster_lines(&clusters) {
                    println!("  {line}");
                }
            }
        }
        Commands::Year { year } => {
            let hebrew = to_hebrew_year(year);
            println!("Gregorian: {year}");
            println!("Hebrew:    {hebrew}");
            match to_letter_numeral(hebrew) {
                Ok(numeral) => println!("Numeral:   {numeral}"),
                Err(e) => log::warn!("{e}"),
            }
            println!("Label:     {}", dual_year_label(year));
        }
        Commands::Timeline => {
            let config = load_config(cli.config)?;
            let range = config.years.min..=config.years.max;
            for marker in markers(historical_events(), &range) {
                println!(
                    "{:>6.2}%  {:<28} {}",
                    marker.position,
                    marker.label,
                    marker.event.title(language)
                );
            }
        }
        Commands::Play { from, to } => {
            let config = load_config(cli.config)?;
            let engine = load_engine(&config, cli.data_dir).await;
            let range = engine.range();
            let max_year = to.unwrap_or(range.max).min(range.max);

            let mut playback = Playback::new(PlaybackSettings {
                step_years: config.playback.step_years,
                interval: Duration::from_millis(config.playback.interval_ms),
                max_year,
            });

            println!("{}", render::summary_line(&engine.set_query_year(from)?));
            let mut years = playback.start(from);
            loop {
                tokio::select! {
                    year = years.recv() => {
                        let Some(year) = year else { break };
                        println!("{}", render::summary_line(&engine.set_query_year(year)?));
                    }
                    _ = tokio::signal::ctrl_c() => {
                        log::info!("Playback interrupted");
                        playback.stop();
                        break;
                    }
                }
            }
        }
        Commands::SortEvents {
            table,
            input,
            output,
        } => {
            let text = std::fs::read_to_string(&input)?;
            let sorted = kehilot_map_source::sort::sort_events_by_year(&text, table.into())?;
            write_output(&sorted, output.as_deref())?;
        }
        Commands::Convert { input, output } => {
            let text = std::fs::read_to_string(&input)?;
            let conversion = kehilot_map_source::convert::convert_observations(&text);
            log::info!(
                "Converted {} observation(s), skipped {}",
                conversion.rows.len(),
                conversion.skipped
            );
            write_output(&conversion.to_table()?, output.as_deref())?;
        }
        Commands::SingleRowTowns { input } => {
            let text = std::fs::read_to_string(&input)?;
            let towns = kehilot_map_source::towns::single_row_towns(&text);
            println!("Found {} town(s) with only one row:", towns.len());
            for (i, town) in towns.iter().enumerate() {
                let population = town
                    .population_start
                    .map_or_else(|| "N/A".to_string(), |p| p.to_string());
                println!(
                    "{:>3}. {}, {} - Population: {population}",
                    i + 1,
                    town.country,
                    town.city
                );
            }
        }
    }

    Ok(())
}
