use std::cmp::Ordering;

use serde::Serialize;

use crate::aggregate::Accumulator;
use crate::config::RoundingMode;
use crate::error::{ProjectionError, Result};
use crate::standings::Standings;

/// Projected final position of one team.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectionRow {
    pub team: String,
    pub played: u32,
    pub current_points: u32,
    pub projected_points: u32,

    /// Percentages, rounded to one decimal
    pub title_pct: f64,
    pub qual_pct: f64,
    pub relegation_pct: f64,
}

/// Round `numerator / denominator` to an integer without going through floats.
fn round_ratio(numerator: u64, denominator: u64, mode: RoundingMode) -> u64 {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);

    let round_up = match twice_remainder.cmp(&denominator) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => match mode {
            RoundingMode::HalfUp => true,
            RoundingMode::HalfEven => quotient % 2 == 1,
        },
    };

    quotient + u64::from(round_up)
}

/// `100 * count / n`, rounded to one decimal.
fn percentage(count: u64, n: u64, mode: RoundingMode) -> f64 {
    round_ratio(1000 * count, n, mode) as f64 / 10.0
}

/// Turn the totals of a finished run into one row per team.
///
/// Rows come out in standings order. Fails if no iterations were recorded or
/// the accumulator does not belong to `standings`.
pub fn build_report(
    standings: &Standings,
    acc: &Accumulator,
    rounding: RoundingMode,
) -> Result<Vec<ProjectionRow>> {
    let n = acc.iterations();
    if n == 0 {
        return Err(ProjectionError::InvalidArgument(
            "cannot build a report from zero iterations".to_string(),
        ));
    }
    if acc.team_count() != standings.len() {
        return Err(ProjectionError::InvalidArgument(format!(
            "accumulator covers {} teams, standings have {}",
            acc.team_count(),
            standings.len()
        )));
    }

    let rows = standings
        .iter()
        .zip(acc.tallies())
        .map(|(team, tally)| ProjectionRow {
            team: team.name.clone(),
            played: team.played,
            current_points: team.points,
            projected_points: round_ratio(tally.points_sum, n, rounding) as u32,
            title_pct: percentage(tally.titles, n, rounding),
            qual_pct: percentage(tally.qualifications, n, rounding),
            relegation_pct: percentage(tally.relegations, n, rounding),
        })
        .collect();

    Ok(rows)
}

/// Order rows for display: projected points, then title chances, then
/// current points (all descending), then name.
pub fn sort_for_display(rows: &mut [ProjectionRow]) {
    rows.sort_by(|a, b| {
        b.projected_points
            .cmp(&a.projected_points)
            .then_with(|| b.title_pct.total_cmp(&a.title_pct))
            .then_with(|| b.current_points.cmp(&a.current_points))
            .then_with(|| a.team.cmp(&b.team))
    });
}
