//! Rank aggregation across simulation iterations.
//!
//! Each iteration produces one final points table. [`RankAggregator`] orders
//! that table and folds it into an [`Accumulator`]. Accumulators built on
//! separate workers are combined with [`Accumulator::merge`], which is plain
//! element-wise addition, so the merge order never changes the result.

use std::cmp::Ordering;

use serde::Serialize;

use crate::config::TiePolicy;
use crate::error::{ProjectionError, Result};

/// Running totals for one team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TeamTally {
    pub points_sum: u64,
    pub titles: u64,
    pub qualifications: u64,
    pub relegations: u64,
}

impl TeamTally {
    fn add(&mut self, other: &TeamTally) {
        self.points_sum += other.points_sum;
        self.titles += other.titles;
        self.qualifications += other.qualifications;
        self.relegations += other.relegations;
    }
}

/// Per-team totals over every iteration recorded so far.
///
/// Tallies are indexed like the [`Standings`](crate::standings::Standings)
/// the run was built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Accumulator {
    tallies: Vec<TeamTally>,
    iterations: u64,
}

impl Accumulator {
    pub fn new(team_count: usize) -> Self {
        Accumulator {
            tallies: vec![TeamTally::default(); team_count],
            iterations: 0,
        }
    }

    pub fn tallies(&self) -> &[TeamTally] {
        &self.tallies
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn team_count(&self) -> usize {
        self.tallies.len()
    }

    /// Combine two partial accumulators of the same league.
    pub fn merge(self, other: Accumulator) -> Result<Accumulator> {
        if self.tallies.len() != other.tallies.len() {
            return Err(ProjectionError::InvalidArgument(format!(
                "cannot merge accumulators for {} and {} teams",
                self.tallies.len(),
                other.tallies.len()
            )));
        }
        Ok(self.merge_unchecked(other))
    }

    /// Merge accumulators known to cover the same league.
    pub(crate) fn merge_unchecked(mut self, other: Accumulator) -> Accumulator {
        for (mine, theirs) in self.tallies.iter_mut().zip(other.tallies.iter()) {
            mine.add(theirs);
        }
        self.iterations += other.iterations;
        self
    }
}

/// Orders one simulated table and records each team's rank band.
#[derive(Clone, Debug)]
pub struct RankAggregator {
    qual_zone_size: usize,
    relegation_zone_size: usize,

    /// Secondary sort key per team; lower sorts first among equal points.
    tie_keys: Vec<usize>,
}

impl RankAggregator {
    /// Build an aggregator for a league whose teams are named `names`,
    /// in standings order.
    pub fn new(
        names: &[&str],
        qual_zone_size: usize,
        relegation_zone_size: usize,
        tie_policy: TiePolicy,
    ) -> Result<Self> {
        let team_count = names.len();
        if qual_zone_size > team_count || relegation_zone_size > team_count {
            return Err(ProjectionError::InvalidConfig(format!(
                "zones (top {}, bottom {}) do not fit a league of {} teams",
                qual_zone_size, relegation_zone_size, team_count
            )));
        }

        let tie_keys = match tie_policy {
            TiePolicy::InputOrder => (0..team_count).collect(),
            TiePolicy::TeamName => {
                let mut by_name: Vec<usize> = (0..team_count).collect();
                by_name.sort_by(|&a, &b| names[a].cmp(names[b]));
                let mut keys = vec![0; team_count];
                for (position, &team) in by_name.iter().enumerate() {
                    keys[team] = position;
                }
                keys
            }
        };

        Ok(RankAggregator {
            qual_zone_size,
            relegation_zone_size,
            tie_keys,
        })
    }

    pub fn team_count(&self) -> usize {
        self.tie_keys.len()
    }

    fn check_len(&self, points: &[u32]) -> Result<()> {
        if points.len() != self.team_count() {
            return Err(ProjectionError::InvalidArgument(format!(
                "table has {} teams, league has {}",
                points.len(),
                self.team_count()
            )));
        }
        Ok(())
    }

    /// Team indices from first place to last.
    ///
    /// `order` is reused as scratch space to avoid allocating per iteration.
    pub fn rank_into(&self, points: &[u32], order: &mut Vec<usize>) -> Result<()> {
        self.check_len(points)?;
        self.sort_into(points, order);
        Ok(())
    }

    /// Convenience wrapper around [`rank_into`](Self::rank_into).
    pub fn rank(&self, points: &[u32]) -> Result<Vec<usize>> {
        let mut order = Vec::with_capacity(points.len());
        self.rank_into(points, &mut order)?;
        Ok(order)
    }

    fn sort_into(&self, points: &[u32], order: &mut Vec<usize>) {
        order.clear();
        order.extend(0..points.len());
        order.sort_unstable_by(|&a, &b| self.compare(points, a, b));
    }

    fn compare(&self, points: &[u32], a: usize, b: usize) -> Ordering {
        points[b]
            .cmp(&points[a])
            .then_with(|| self.tie_keys[a].cmp(&self.tie_keys[b]))
    }

    /// Fold one finished table into `acc`.
    ///
    /// Both `points` and `acc` must cover this aggregator's league.
    pub fn record(&self, points: &[u32], order: &mut Vec<usize>, acc: &mut Accumulator) -> Result<()> {
        self.check_len(points)?;
        if acc.team_count() != self.team_count() {
            return Err(ProjectionError::InvalidArgument(format!(
                "accumulator has {} teams, league has {}",
                acc.team_count(),
                self.team_count()
            )));
        }
        self.record_unchecked(points, order, acc);
        Ok(())
    }

    /// [`record`](Self::record) for tables sized by the caller's own league.
    pub(crate) fn record_unchecked(&self, points: &[u32], order: &mut Vec<usize>, acc: &mut Accumulator) {
        self.sort_into(points, order);

        let team_count = points.len();
        let relegation_start = team_count - self.relegation_zone_size;

        for (rank, &team) in order.iter().enumerate() {
            let tally = &mut acc.tallies[team];
            tally.points_sum += u64::from(points[team]);
            if rank == 0 {
                tally.titles += 1;
            }
            if rank < self.qual_zone_size {
                tally.qualifications += 1;
            }
            if rank >= relegation_start {
                tally.relegations += 1;
            }
        }
        acc.iterations += 1;
    }
}
