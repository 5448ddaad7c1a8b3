use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_NUM_SIMULATIONS, DEFAULT_QUAL_ZONE_SIZE, DEFAULT_RELEGATION_ZONE_SIZE,
    DEFAULT_SHARPENING_EXPONENT, MAX_PROBABILITY_TOLERANCE, PROBABILITY_TOLERANCE,
};
use crate::error::{ProjectionError, Result};

/// How teams level on points are ordered within one simulated table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Keep the order in which teams appear in the standings.
    #[default]
    InputOrder,
    /// Alphabetical by team name.
    TeamName,
}

/// Rounding applied to projected points and percentages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go to the even neighbour (12.5 -> 12, 13.5 -> 14).
    #[default]
    HalfEven,
    /// Ties go up (12.5 -> 13).
    HalfUp,
}

/// Parameters of one projection run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_simulations: usize,
    pub sharpening_exponent: f64,
    pub qual_zone_size: usize,
    pub relegation_zone_size: usize,
    pub tie_policy: TiePolicy,
    pub rounding: RoundingMode,
    pub probability_tolerance: f64,

    /// Base seed; `None` draws one from entropy.
    pub seed: Option<u64>,

    /// Spread iterations over the rayon pool. Results do not depend on it.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            sharpening_exponent: DEFAULT_SHARPENING_EXPONENT,
            qual_zone_size: DEFAULT_QUAL_ZONE_SIZE,
            relegation_zone_size: DEFAULT_RELEGATION_ZONE_SIZE,
            tie_policy: TiePolicy::default(),
            rounding: RoundingMode::default(),
            probability_tolerance: PROBABILITY_TOLERANCE,
            seed: None,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    /// Parse a (possibly partial) JSON document; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_num_simulations(mut self, num_simulations: usize) -> Self {
        self.num_simulations = num_simulations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sharpening_exponent(mut self, exponent: f64) -> Self {
        self.sharpening_exponent = exponent;
        self
    }

    pub fn with_zones(mut self, qual_zone_size: usize, relegation_zone_size: usize) -> Self {
        self.qual_zone_size = qual_zone_size;
        self.relegation_zone_size = relegation_zone_size;
        self
    }

    pub fn with_tie_policy(mut self, tie_policy: TiePolicy) -> Self {
        self.tie_policy = tie_policy;
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check the parameters that do not depend on the league.
    pub fn validate(&self) -> Result<()> {
        if self.num_simulations == 0 {
            return Err(ProjectionError::InvalidConfig(
                "num_simulations must be positive".to_string(),
            ));
        }
        validate_exponent(self.sharpening_exponent)?;
        if !(0.0..=MAX_PROBABILITY_TOLERANCE).contains(&self.probability_tolerance) {
            return Err(ProjectionError::InvalidConfig(format!(
                "probability_tolerance must be in [0, {}], got {}",
                MAX_PROBABILITY_TOLERANCE, self.probability_tolerance
            )));
        }
        Ok(())
    }

    /// Check everything, including that both zones fit in a league of `team_count`.
    pub fn validate_for_league(&self, team_count: usize) -> Result<()> {
        self.validate()?;
        if team_count == 0 {
            return Err(ProjectionError::InvalidArgument(
                "standings contain no teams".to_string(),
            ));
        }
        if self.qual_zone_size > team_count {
            return Err(ProjectionError::InvalidConfig(format!(
                "qual_zone_size {} exceeds league size {}",
                self.qual_zone_size, team_count
            )));
        }
        if self.relegation_zone_size > team_count {
            return Err(ProjectionError::InvalidConfig(format!(
                "relegation_zone_size {} exceeds league size {}",
                self.relegation_zone_size, team_count
            )));
        }
        Ok(())
    }
}

/// Convert a count supplied as a signed integer, rejecting negatives as
/// invalid configuration.
#[cfg_attr(not(feature = "python"), allow(dead_code))]
pub(crate) fn count_from_signed(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        ProjectionError::InvalidConfig(format!("{} must not be negative, got {}", name, value))
    })
}

pub(crate) fn validate_exponent(exponent: f64) -> Result<()> {
    if !exponent.is_finite() || exponent < 1.0 {
        return Err(ProjectionError::InvalidConfig(format!(
            "sharpening_exponent must be >= 1, got {}",
            exponent
        )));
    }
    Ok(())
}
