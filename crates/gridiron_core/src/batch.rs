//! Parallel match batches.
//!
//! Each seed gets its own `SimulationContext` and policy; nothing mutable is
//! shared between matches, so results do not depend on scheduling or thread
//! count. Summaries come back in seed order.

use crate::config::SimConfig;
use crate::engine::SimulationContext;
use crate::error::SimError;
use crate::events::EventType;
use crate::policy::{ActionSource, FormationChaser};
use crate::state::Score;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("match with seed {seed} failed: {source}")]
    Match {
        seed: u64,
        #[source]
        source: SimError,
    },

    #[error("frame encoding failed for seed {seed} at tick {tick}: {source}")]
    Encode {
        seed: u64,
        tick: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub seeds: Vec<u64>,
    /// Ticks per match; `None` runs to `max_ticks`
    pub ticks: Option<u64>,
    /// Worker threads; `None` uses the global pool
    pub jobs: Option<usize>,
    /// Ability the scripted chaser casts
    pub ability: Option<String>,
}

impl BatchConfig {
    pub fn new(seeds: Vec<u64>) -> Self {
        Self { seeds, ticks: None, jobs: None, ability: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub seed: u64,
    pub ticks: u64,
    pub score: Score,
    pub spectacle_score: f64,
    pub event_counts: BTreeMap<EventType, usize>,
    /// SHA-256 over every JSON frame, one per tick
    pub frame_digest: String,
}

/// Run one scripted match and summarise it.
pub fn run_match(config: &SimConfig, seed: u64, ticks: u64, ability: Option<&str>) -> Result<MatchSummary, BatchError> {
    let sim_failed = |source: SimError| BatchError::Match { seed, source };
    let mut ctx = SimulationContext::new(config.clone(), seed).map_err(sim_failed)?;
    let mut policy = match ability {
        Some(id) => FormationChaser::new().with_ability(id),
        None => FormationChaser::new(),
    };
    let mut hasher = Sha256::new();
    let mut event_counts = BTreeMap::new();

    for _ in 0..ticks {
        let action = policy.act(ctx.state(), ctx.config());
        ctx.step(&action).map_err(sim_failed)?;
        let frame = ctx
            .snapshot()
            .to_json()
            .map_err(|source| BatchError::Encode { seed, tick: ctx.state().tick, source })?;
        hasher.update(frame.as_bytes());
        hasher.update(b"\n");
        for event in ctx.drain_events() {
            *event_counts.entry(event.event_type()).or_insert(0) += 1;
        }
    }

    let state = ctx.state();
    tracing::debug!(seed, ticks = state.tick, blue = state.score.blue, red = state.score.red, "match finished");
    Ok(MatchSummary {
        seed,
        ticks: state.tick,
        score: state.score,
        spectacle_score: state.spectacle_score,
        event_counts,
        frame_digest: format!("{:x}", hasher.finalize()),
    })
}

/// Run every seed in parallel. Fails with the first failing seed in seed order.
pub fn run_matches(config: &SimConfig, batch: &BatchConfig) -> Result<Vec<MatchSummary>, BatchError> {
    let ticks = batch.ticks.unwrap_or(config.match_cfg.max_ticks);
    let ability = batch.ability.as_deref();
    let run_one = |seed: &u64| run_match(config, *seed, ticks, ability);

    let results: Vec<Result<MatchSummary, BatchError>> = if let Some(jobs) = batch.jobs {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(|| batch.seeds.par_iter().map(run_one).collect())
    } else {
        batch.seeds.par_iter().map(run_one).collect()
    };
    results.into_iter().collect()
}
