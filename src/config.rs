use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agent::Strategy;
use crate::board::DEFAULT_SIZE;
use crate::error::{Error, Result};
use crate::heuristics::Heuristic;

/// When to give up on a search, in milliseconds of turn time left.
///
/// The guard fires once `time_left() < timeout_ms - safety_margin_ms`; the margin
/// absorbs the cost of unwinding and returning the move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub timeout_ms: f64,
    pub safety_margin_ms: f64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { timeout_ms: 10.0, safety_margin_ms: 0.5 }
    }
}

impl TimeoutConfig {
    pub fn threshold_ms(&self) -> f64 {
        self.timeout_ms - self.safety_margin_ms
    }

    pub fn validate(&self) -> Result<()> {
        if !self.timeout_ms.is_finite() || !self.safety_margin_ms.is_finite() {
            return Err(Error::InvalidConfig("timeout values must be finite".to_string()));
        }
        if self.safety_margin_ms < 0.0 || self.safety_margin_ms >= self.timeout_ms {
            return Err(Error::InvalidConfig(format!(
                "safety margin {}ms must be in [0, {})",
                self.safety_margin_ms, self.timeout_ms
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    #[serde(default)]
    pub heuristic: Heuristic,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub timeout: TimeoutConfig,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>, heuristic: Heuristic, strategy: Strategy) -> Self {
        Self { name: name.into(), heuristic, strategy, timeout: TimeoutConfig::default() }
    }

    pub fn validate(&self) -> Result<()> {
        self.timeout.validate()?;
        match self.strategy {
            Strategy::Minimax { depth: 0 } => Err(Error::InvalidConfig(format!("{}: minimax depth must be at least 1", self.name))),
            Strategy::AlphaBeta { max_depth: Some(0), .. } => Err(Error::InvalidConfig(format!("{}: max_depth must be at least 1", self.name))),
            _ => Ok(()),
        }
    }
}

/// Settings for the match runner, loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub width: usize,
    pub height: usize,
    pub time_limit_ms: u64,
    pub games: u32,
    pub seed: Option<u64>,
    pub random_openings: usize,
    pub player_one: AgentConfig,
    pub player_two: AgentConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            time_limit_ms: 150,
            games: 10,
            seed: None,
            random_openings: 2,
            player_one: AgentConfig::new("asymmetric", Heuristic::AsymmetricMobility, Strategy::default()),
            player_two: AgentConfig::new("improved", Heuristic::MobilityDifference, Strategy::default()),
        }
    }
}

impl MatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        if self.games == 0 {
            return Err(Error::InvalidConfig("games must be at least 1".to_string()));
        }
        for agent in [&self.player_one, &self.player_two] {
            agent.validate()?;
            if agent.timeout.timeout_ms >= self.time_limit_ms as f64 {
                return Err(Error::InvalidConfig(format!(
                    "{}: timeout {}ms leaves no search time within the {}ms limit",
                    agent.name, agent.timeout.timeout_ms, self.time_limit_ms
                )));
            }
        }
        Ok(())
    }
}
