//! `gridiron` - command-line driver for the simulation core.
//!
//! Runs seeded matches with a scripted policy, records and archives replays,
//! diffs and validates them, and checks configuration files.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gridiron_core::batch::{run_matches, BatchConfig};
use gridiron_core::policy::{ActionSource, FormationChaser, IdlePolicy};
use gridiron_core::replay::{
    diff_replays, read_archive, validate_replay, write_archive, ReplayArchive, ReplayLog, ReplayRecorder,
    DEFAULT_TOLERANCE,
};
use gridiron_core::serialization::snapshot_schema;
use gridiron_core::{SimConfig, SimulationContext};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gridiron")]
#[command(about = "Deterministic 7v7 match simulation: run, record, diff and validate replays")]
struct Cli {
    /// Config file (YAML or JSON); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Use the arcade preset instead of the default config
    #[arg(long, global = true, conflicts_with = "config")]
    arcade: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one seeded match with a scripted policy
    Run {
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Ticks to simulate; defaults to the configured max_ticks
        #[arg(long)]
        ticks: Option<u64>,
        #[arg(long, value_enum, default_value_t = PolicyKind::Chaser)]
        policy: PolicyKind,
        /// Ability the chaser casts near goal
        #[arg(long)]
        ability: Option<String>,
        /// Write one JSON frame per tick to this file
        #[arg(long)]
        record: Option<PathBuf>,
        /// Write a compressed archive of all frames to this file
        #[arg(long)]
        archive: Option<PathBuf>,
    },
    /// Run many seeds in parallel and print per-seed summaries as JSON
    Batch {
        /// Comma-separated seeds
        #[arg(long, conflicts_with_all = ["seed_start", "seed_count"])]
        seeds: Option<String>,
        #[arg(long, default_value_t = 0)]
        seed_start: u64,
        #[arg(long, default_value_t = 8)]
        seed_count: u64,
        #[arg(long)]
        ticks: Option<u64>,
        #[arg(long)]
        jobs: Option<usize>,
        #[arg(long)]
        ability: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Report the first tick at which two replays diverge
    Diff {
        a: PathBuf,
        b: PathBuf,
        #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,
    },
    /// Check a replay for ordering, bounds and version consistency
    Validate { replay: PathBuf },
    /// Load and validate a config file
    ValidateConfig { path: PathBuf },
    /// Print one frame of a replay, or a summary when no tick is given
    Inspect {
        replay: PathBuf,
        #[arg(long)]
        tick: Option<u64>,
    },
    /// Print the JSON schema of a snapshot frame
    Schema,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyKind {
    Idle,
    Chaser,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.arcade)?;

    match cli.command {
        Commands::Run { seed, ticks, policy, ability, record, archive } => {
            let summary = run_single(&config, seed, ticks, policy, ability.as_deref(), record.as_deref(), archive.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Batch { seeds, seed_start, seed_count, ticks, jobs, ability, output } => {
            let seeds = match seeds {
                Some(csv) => parse_seed_csv(&csv)?,
                None => (seed_start..seed_start + seed_count).collect(),
            };
            let batch = BatchConfig { seeds, ticks, jobs, ability };
            let summaries = run_matches(&config, &batch)?;
            let json = serde_json::to_string_pretty(&summaries)?;
            match output {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
                    println!("wrote {} summaries to {}", summaries.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Diff { a, b, tolerance } => {
            let log_a = load_replay(&a)?;
            let log_b = load_replay(&b)?;
            match diff_replays(&log_a, &log_b, tolerance) {
                Some(divergence) => {
                    println!("{divergence}");
                    std::process::exit(1);
                }
                None => println!("replays match ({} frames)", log_a.len()),
            }
        }
        Commands::Validate { replay } => {
            let log = load_replay(&replay)?;
            if let Err(reason) = validate_replay(&log, &config.pitch) {
                bail!("{} is invalid: {reason}", replay.display());
            }
            println!("{} is valid ({} frames)", replay.display(), log.len());
        }
        Commands::ValidateConfig { path } => {
            let loaded = SimConfig::load(&path).with_context(|| format!("failed to load {}", path.display()))?;
            loaded.validate_all().with_context(|| format!("{} is invalid", path.display()))?;
            println!("{} is valid", path.display());
        }
        Commands::Inspect { replay, tick } => {
            let log = load_replay(&replay)?;
            match tick {
                Some(t) => {
                    let frame = log.frame(t).with_context(|| format!("no frame at tick {t}"))?;
                    println!("{}", serde_json::to_string_pretty(frame)?);
                }
                None => print_log_summary(&log),
            }
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&snapshot_schema())?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>, arcade: bool) -> Result<SimConfig> {
    let config = match path {
        Some(p) => SimConfig::load(p).with_context(|| format!("failed to load config {}", p.display()))?,
        None if arcade => SimConfig::arcade(),
        None => SimConfig::default(),
    };
    config.validate_all().context("invalid configuration")?;
    Ok(config)
}

/// JSONL logs by extension, compressed archives otherwise.
fn load_replay(path: &Path) -> Result<ReplayLog> {
    let is_jsonl = path.extension().map_or(false, |ext| ext == "jsonl");
    if is_jsonl {
        ReplayLog::open(path).with_context(|| format!("failed to read replay {}", path.display()))
    } else {
        let archive = read_archive(path).with_context(|| format!("failed to read archive {}", path.display()))?;
        Ok(archive.into_log())
    }
}

fn parse_seed_csv(csv: &str) -> Result<Vec<u64>> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().with_context(|| format!("invalid seed '{s}'")))
        .collect()
}

#[derive(Debug, serde::Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    blue: u32,
    red: u32,
    spectacle_score: f64,
    events: usize,
    frames_recorded: usize,
}

fn run_single(
    config: &SimConfig,
    seed: u64,
    ticks: Option<u64>,
    policy: PolicyKind,
    ability: Option<&str>,
    record: Option<&Path>,
    archive: Option<&Path>,
) -> Result<RunSummary> {
    let mut ctx = SimulationContext::new(config.clone(), seed).context("failed to start match")?;
    let mut source: Box<dyn ActionSource> = match (policy, ability) {
        (PolicyKind::Idle, _) => Box::new(IdlePolicy),
        (PolicyKind::Chaser, Some(id)) => Box::new(FormationChaser::new().with_ability(id)),
        (PolicyKind::Chaser, None) => Box::new(FormationChaser::new()),
    };
    let mut recorder = record
        .map(|p| ReplayRecorder::create(p).with_context(|| format!("failed to create {}", p.display())))
        .transpose()?;
    let mut frames = Vec::new();
    let mut events = 0;
    let ticks = ticks.unwrap_or(config.match_cfg.max_ticks);

    for _ in 0..ticks {
        let action = source.act(ctx.state(), ctx.config());
        ctx.step(&action)?;
        if let Some(rec) = recorder.as_mut() {
            rec.record(&ctx)?;
        }
        if archive.is_some() {
            frames.push(ctx.snapshot());
        }
        for event in ctx.drain_events() {
            tracing::debug!(id = %event.event_id, "event");
            events += 1;
        }
    }

    let frames_recorded = match recorder {
        Some(rec) => rec.finish()?,
        None => 0,
    };
    if let Some(path) = archive {
        let bytes = write_archive(path, &ReplayArchive::new(frames, Some(seed)))
            .with_context(|| format!("failed to write archive {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes, "archive written");
    }

    let state = ctx.state();
    Ok(RunSummary {
        seed,
        ticks: state.tick,
        blue: state.score.blue,
        red: state.score.red,
        spectacle_score: state.spectacle_score,
        events,
        frames_recorded,
    })
}

fn print_log_summary(log: &ReplayLog) {
    let (Some(first), Some(last)) = (log.frames().first(), log.frames().last()) else {
        println!("empty replay");
        return;
    };
    println!("frames:  {}", log.len());
    println!("ticks:   {}..={}", first.t, last.t);
    println!("players: {}", last.p.len());
    println!("score:   BLUE {} - {} RED", last.score("BLUE"), last.score("RED"));
    let events: usize = log.frames().iter().map(|f| f.e.len()).sum();
    println!("events:  {events}");
}
