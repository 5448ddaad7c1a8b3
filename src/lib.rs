//! Standings Core - Monte Carlo projection of a league season.
//!
//! Given each team's current points and a (home win, draw, away win)
//! probability triple for every remaining fixture, this library simulates the
//! rest of the season many times and reports each team's expected final points
//! and how often it finishes first, in the qualification zone, or in the
//! relegation zone.
//!
//! Python bindings are available behind the `python` feature.

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod fixture;
pub mod outcome;
pub mod report;
pub mod season;
pub mod sharpen;
pub mod standings;
pub mod team;

#[cfg(feature = "python")]
mod python;

pub use aggregate::{Accumulator, RankAggregator, TeamTally};
pub use config::{RoundingMode, SimulationConfig, TiePolicy};
pub use constants::{
    DEFAULT_NUM_SIMULATIONS, DEFAULT_QUAL_ZONE_SIZE, DEFAULT_RELEGATION_ZONE_SIZE,
    DEFAULT_SHARPENING_EXPONENT, PIPELINE_NUM_SIMULATIONS, POINTS_FOR_DRAW, POINTS_FOR_WIN,
};
pub use error::{InvalidProbabilities, ProjectionError, Result};
pub use fixture::{parse_percentage, Fixture};
pub use outcome::MatchOutcome;
pub use report::{build_report, sort_for_display, ProjectionRow};
pub use season::{iteration_rng, SeasonSimulator, SharpenedFixture};
pub use sharpen::{sharpen, OutcomeProbs};
pub use standings::{Standings, TeamAliases};
pub use team::{MatchResult, TeamStanding};

/// Project the final table.
///
/// Validates every input, runs `config.num_simulations` iterations and
/// returns one row per team in standings order.
pub fn project_standings(
    standings: &Standings,
    fixtures: &[Fixture],
    config: &SimulationConfig,
) -> Result<Vec<ProjectionRow>> {
    let simulator = SeasonSimulator::new(standings, fixtures, config.clone())?;
    let acc = simulator.run();
    build_report(standings, &acc, config.rounding)
}
