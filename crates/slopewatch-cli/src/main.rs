//! Field tool for recording slope observations and reviewing landslide risk.
//!
//! Observations are appended to a local JSON log; risk levels are recomputed
//! from the stored readings every time they are shown.

mod config;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::AppConfig;
use slopewatch_core::{
    assess_latest, assess_record, classify, find_by_id, history, mitigation, Assessment,
    JsonFileStore, Observation, ObservationDraft, ObservationStore, Reading, RiskLabel, RiskLevel,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "slopewatch", about = "Record slope observations and assess landslide risk")]
struct Args {
    /// Observation log (JSON). Overrides the config file.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// TOML config file with `store_path` and `log_filter`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append a new observation and show its risk.
    Record {
        #[command(flatten)]
        readings: ReadingArgs,
        /// Where the readings were taken.
        #[arg(long)]
        location: String,
    },
    /// Classify readings without storing them.
    Classify {
        #[command(flatten)]
        readings: ReadingArgs,
    },
    /// Assess the latest observation, or the one with `--id`.
    Assess {
        #[arg(long)]
        id: Option<String>,
    },
    /// List every observation, newest first, with its risk.
    History,
    /// Show recommended actions for a risk label.
    Actions {
        /// Risk label, e.g. Moderate or NoData.
        label: String,
    },
    /// Delete every stored observation.
    Clear {
        /// Confirm the deletion; it cannot be undone.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct ReadingArgs {
    /// Soil humidity in percent.
    #[arg(long, allow_hyphen_values = true)]
    humidity: String,

    /// Ground inclination in degrees.
    #[arg(long, allow_hyphen_values = true)]
    inclination: String,

    /// Ambient temperature in degrees Celsius.
    #[arg(long, allow_hyphen_values = true)]
    temperature: String,

    /// It rained during the last week.
    #[arg(long)]
    rained: bool,
}

impl ReadingArgs {
    fn into_draft(self, location: String) -> ObservationDraft {
        ObservationDraft {
            soil_humidity_percent: self.humidity,
            inclination_degrees: self.inclination,
            ambient_temperature_celsius: self.temperature,
            rained_last_week: self.rained,
            location,
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    assessment: &'a Assessment,
    actions: &'static [&'static str],
}

fn print_level(level: &RiskLevel) {
    println!("Risk level: {} ({})", level.label, level.severity_color);
    println!("Recommended actions:");
    for (i, action) in level.actions().iter().enumerate() {
        println!("  {}. {action}", i + 1);
    }
}

fn print_observation(obs: &Observation) {
    println!("Record {} at {}", obs.id(), obs.recorded_at().to_rfc3339());
    println!("  location:    {}", or_na(obs.location()));
    println!("  humidity:    {}%", reading_text(obs.soil_humidity_percent()));
    println!("  inclination: {}°", reading_text(obs.inclination_degrees()));
    println!("  temperature: {}°C", reading_text(obs.ambient_temperature_celsius()));
    println!("  rained last week: {}", if obs.rained_last_week() { "yes" } else { "no" });
}

fn reading_text(reading: &Reading) -> String {
    match reading {
        Reading::Number(v) => v.to_string(),
        Reading::Text(s) => or_na(s).to_string(),
        Reading::Missing => "N/A".to_string(),
    }
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

fn emit(assessment: &Assessment, json: bool) -> Result<()> {
    if json {
        let report = Report {
            assessment,
            actions: assessment.level.actions(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if let Some(obs) = &assessment.observation {
        print_observation(obs);
    }
    print_level(&assessment.level);
    Ok(())
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn record(store: &mut JsonFileStore, draft: ObservationDraft, json: bool) -> Result<()> {
    let observation = draft
        .into_observation(Utc::now())
        .context("observation not recorded")?;
    let observation = store
        .append_and_save(observation)
        .context("saving observation")?;
    info!(id = observation.id(), path = %store.path().display(), "observation recorded");

    let assessment = Assessment {
        level: assess_record(Some(&observation)),
        observation: Some(observation),
    };
    emit(&assessment, json)
}

fn classify_only(readings: ReadingArgs, json: bool) -> Result<()> {
    let ReadingArgs {
        humidity,
        inclination,
        temperature,
        rained,
    } = readings;
    let observation = Observation::new(humidity, inclination, temperature, rained, "", Utc::now());
    let level = classify(&observation);
    if json {
        #[derive(Serialize)]
        struct Classified {
            level: RiskLevel,
            actions: &'static [&'static str],
        }
        let out = Classified {
            level,
            actions: level.actions(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_level(&level);
    }
    Ok(())
}

fn show_history(store: &JsonFileStore, json: bool) -> Result<()> {
    let rows = history(store).context("loading observation history")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No observations recorded.");
        return Ok(());
    }
    for row in &rows {
        print_observation(&row.observation);
        println!("  risk: {} ({})", row.level.label, row.level.severity_color);
        println!();
    }
    Ok(())
}

fn show_actions(label: &str, json: bool) -> Result<()> {
    let label: RiskLabel = label.parse()?;
    let actions = mitigation::actions_for(label);
    if json {
        println!("{}", serde_json::to_string_pretty(actions)?);
    } else {
        print_level(&RiskLevel::for_label(label));
    }
    Ok(())
}

fn clear(store: &mut JsonFileStore, yes: bool) -> Result<()> {
    if !yes {
        bail!(
            "refusing to delete every observation in {} without --yes",
            store.path().display()
        );
    }
    store.clear().context("clearing observations")?;
    info!(path = %store.path().display(), "observation log cleared");
    println!("All observations deleted.");
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::resolve(args.config.as_deref(), args.store, args.verbose)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut store = JsonFileStore::new(&config.store_path);

    match args.command {
        Command::Record { readings, location } => {
            record(&mut store, readings.into_draft(location), args.json)
        }
        Command::Classify { readings } => classify_only(readings, args.json),
        Command::Assess { id } => {
            let assessment = match id {
                Some(id) => find_by_id(&store, &id),
                None => assess_latest(&store),
            };
            emit(&assessment, args.json)
        }
        Command::History => show_history(&store, args.json),
        Command::Actions { label } => show_actions(&label, args.json),
        Command::Clear { yes } => clear(&mut store, yes),
    }
}
