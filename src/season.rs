use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregate::{Accumulator, RankAggregator};
use crate::config::SimulationConfig;
use crate::error::{ProjectionError, Result};
use crate::fixture::Fixture;
use crate::outcome::MatchOutcome;
use crate::sharpen::OutcomeProbs;
use crate::standings::Standings;

/// A remaining fixture with its sharpened probabilities and team indices.
///
/// A side naming a team missing from the standings resolves to `None`
/// and earns no points.
#[derive(Clone, Debug)]
pub struct SharpenedFixture {
    pub home: Option<usize>,
    pub away: Option<usize>,
    pub probs: OutcomeProbs,
}

/// Season simulation state: current points, remaining fixtures, and
/// the aggregation rules for one projection run.
#[derive(Clone, Debug)]
pub struct SeasonSimulator {
    names: Vec<String>,
    start_points: Vec<u32>,
    fixtures: Vec<SharpenedFixture>,
    aggregator: RankAggregator,
    config: SimulationConfig,
}

impl SeasonSimulator {
    /// Validate the configuration and every fixture, then sharpen each
    /// fixture once.
    ///
    /// Nothing is simulated if any input is rejected.
    pub fn new(standings: &Standings, fixtures: &[Fixture], config: SimulationConfig) -> Result<Self> {
        config.validate_for_league(standings.len())?;

        let names: Vec<String> = standings.iter().map(|t| t.name.clone()).collect();
        let start_points: Vec<u32> = standings.iter().map(|t| t.points).collect();

        let mut sharpened = Vec::with_capacity(fixtures.len());
        for (index, fixture) in fixtures.iter().enumerate() {
            let malformed = |source| ProjectionError::MalformedFixture {
                index,
                home: fixture.home.clone(),
                away: fixture.away.clone(),
                source,
            };
            let raw = OutcomeProbs::with_tolerance(
                fixture.home_win,
                fixture.draw,
                fixture.away_win,
                config.probability_tolerance,
            )
            .map_err(malformed)?;

            let home = standings.index_of(&fixture.home);
            let away = standings.index_of(&fixture.away);
            for (side, name) in [(home, &fixture.home), (away, &fixture.away)] {
                if side.is_none() {
                    warn!(fixture = index, team = %name, "team not in standings; its points are ignored");
                }
            }

            let probs = raw
                .sharpen_unchecked(config.sharpening_exponent)
                .map_err(malformed)?;
            sharpened.push(SharpenedFixture { home, away, probs });
        }
        debug!(
            fixtures = sharpened.len(),
            exponent = config.sharpening_exponent,
            "sharpened fixture probabilities"
        );

        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let aggregator = RankAggregator::new(
            &name_refs,
            config.qual_zone_size,
            config.relegation_zone_size,
            config.tie_policy,
        )?;

        Ok(SeasonSimulator {
            names,
            start_points,
            fixtures: sharpened,
            aggregator,
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn fixtures(&self) -> &[SharpenedFixture] {
        &self.fixtures
    }

    /// Team names in standings order.
    pub fn team_names(&self) -> &[String] {
        &self.names
    }

    /// Play out every remaining fixture once.
    ///
    /// Returns final points indexed like the standings.
    pub fn simulate_once<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u32> {
        let mut points = self.start_points.clone();
        self.play_fixtures(&mut points, rng);
        points
    }

    /// One simulated final table as (team, points), in standings order.
    pub fn final_table<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(String, u32)> {
        self.names
            .iter()
            .cloned()
            .zip(self.simulate_once(rng))
            .collect()
    }

    fn play_fixtures<R: Rng + ?Sized>(&self, points: &mut [u32], rng: &mut R) {
        for fixture in &self.fixtures {
            let (home_pts, away_pts) = MatchOutcome::sample(&fixture.probs, rng).points();
            if let Some(home) = fixture.home {
                points[home] += home_pts;
            }
            if let Some(away) = fixture.away {
                points[away] += away_pts;
            }
        }
    }

    /// Run `iterations` simulations drawing every iteration from a single
    /// random stream, in order.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, iterations: usize, rng: &mut R) -> Accumulator {
        let mut worker = Worker::new(self);
        for _ in 0..iterations {
            worker.iterate(self, rng);
        }
        worker.acc
    }

    /// Run `iterations` simulations, iteration `i` using the generator
    /// returned by `make_rng(i)`.
    ///
    /// With `config.parallel` set, iterations are spread over the rayon pool;
    /// each worker keeps its own accumulator and the partial results are
    /// summed. The result is identical to a sequential run.
    pub fn run_with<F, R>(&self, iterations: usize, make_rng: F) -> Accumulator
    where
        F: Fn(usize) -> R + Sync,
        R: Rng,
    {
        if self.config.parallel {
            (0..iterations)
                .into_par_iter()
                .fold(
                    || Worker::new(self),
                    |mut worker, i| {
                        worker.iterate(self, &mut make_rng(i));
                        worker
                    },
                )
                .map(|worker| worker.acc)
                .reduce(|| Accumulator::new(self.names.len()), Accumulator::merge_unchecked)
        } else {
            let mut worker = Worker::new(self);
            for i in 0..iterations {
                worker.iterate(self, &mut make_rng(i));
            }
            worker.acc
        }
    }

    /// Run the configured number of simulations.
    ///
    /// Iteration `i` uses ChaCha8 stream `i` under the base seed, so results
    /// depend only on the seed and the inputs.
    pub fn run(&self) -> Accumulator {
        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let iterations = self.config.num_simulations;
        info!(
            iterations,
            teams = self.names.len(),
            fixtures = self.fixtures.len(),
            seed = base_seed,
            parallel = self.config.parallel,
            "simulating season"
        );

        let start = Instant::now();
        let acc = self.run_with(iterations, |i| iteration_rng(base_seed, i));
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "simulation finished");
        acc
    }
}

/// Independent generator for one iteration.
pub fn iteration_rng(base_seed: u64, iteration: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    rng.set_stream(iteration as u64);
    rng
}

/// Per-worker scratch space and partial totals.
struct Worker {
    points: Vec<u32>,
    order: Vec<usize>,
    acc: Accumulator,
}

impl Worker {
    fn new(sim: &SeasonSimulator) -> Self {
        let team_count = sim.names.len();
        Worker {
            points: Vec::with_capacity(team_count),
            order: Vec::with_capacity(team_count),
            acc: Accumulator::new(team_count),
        }
    }

    fn iterate<R: Rng + ?Sized>(&mut self, sim: &SeasonSimulator, rng: &mut R) {
        self.points.clear();
        self.points.extend_from_slice(&sim.start_points);
        sim.play_fixtures(&mut self.points, rng);
        sim.aggregator
            .record_unchecked(&self.points, &mut self.order, &mut self.acc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidProbabilities;
    use crate::team::TeamStanding;

    fn make_league() -> (Standings, Vec<Fixture>) {
        let standings = Standings::from_teams(vec![
            TeamStanding::with_points("A", 30, 70),
            TeamStanding::with_points("B", 30, 65),
            TeamStanding::with_points("C", 30, 50),
            TeamStanding::with_points("D", 30, 40),
            TeamStanding::with_points("E", 30, 30),
            TeamStanding::with_points("F", 30, 28),
        ])
        .unwrap();

        let fixtures = vec![
            Fixture::new("A", "B", 0.45, 0.30, 0.25),
            Fixture::new("C", "D", 0.50, 0.25, 0.25),
            Fixture::new("E", "F", 0.40, 0.30, 0.30),
            Fixture::new("B", "C", 0.55, 0.25, 0.20),
            Fixture::new("D", "E", 0.35, 0.30, 0.35),
            Fixture::new("F", "A", 0.15, 0.25, 0.60),
        ];

        (standings, fixtures)
    }

    fn config() -> SimulationConfig {
        SimulationConfig::default()
            .with_zones(2, 2)
            .with_num_simulations(2000)
            .with_seed(42)
    }

    #[test]
    fn test_simulate_once_adds_match_points() {
        let (standings, fixtures) = make_league();
        let sim = SeasonSimulator::new(&standings, &fixtures, config()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let start: u32 = standings.iter().map(|t| t.points).sum();
        let end: u32 = sim.simulate_once(&mut rng).iter().sum();

        // Each fixture hands out 3 points (win) or 2 (draw)
        let awarded = end - start;
        assert!((12..=18).contains(&awarded), "awarded {awarded}");
    }

    #[test]
    fn test_final_table_names() {
        let (standings, fixtures) = make_league();
        let sim = SeasonSimulator::new(&standings, &fixtures, config()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let table = sim.final_table(&mut rng);
        let names: Vec<&str> = table.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E", "F"]);
        assert!(table[0].1 >= 70);
    }

    #[test]
    fn test_run_is_deterministic() {
        let (standings, fixtures) = make_league();
        let sim = SeasonSimulator::new(&standings, &fixtures, config()).unwrap();
        assert_eq!(sim.run(), sim.run());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (standings, fixtures) = make_league();
        let parallel = SeasonSimulator::new(&standings, &fixtures, config()).unwrap();
        let sequential =
            SeasonSimulator::new(&standings, &fixtures, config().sequential()).unwrap();

        assert_eq!(parallel.run(), sequential.run());
    }

    #[test]
    fn test_different_seeds_differ() {
        let (standings, fixtures) = make_league();
        let a = SeasonSimulator::new(&standings, &fixtures, config().with_seed(1)).unwrap();
        let b = SeasonSimulator::new(&standings, &fixtures, config().with_seed(2)).unwrap();
        assert_ne!(a.run(), b.run());
    }

    #[test]
    fn test_counters_conserved() {
        let (standings, fixtures) = make_league();
        let sim = SeasonSimulator::new(&standings, &fixtures, config()).unwrap();
        let acc = sim.run();

        let n = 2000u64;
        assert_eq!(acc.iterations(), n);
        assert_eq!(acc.tallies().iter().map(|t| t.titles).sum::<u64>(), n);
        assert_eq!(acc.tallies().iter().map(|t| t.qualifications).sum::<u64>(), 2 * n);
        assert_eq!(acc.tallies().iter().map(|t| t.relegations).sum::<u64>(), 2 * n);
    }

    #[test]
    fn test_run_with_rng_single_stream() {
        let (standings, fixtures) = make_league();
        let sim = SeasonSimulator::new(&standings, &fixtures, config()).unwrap();

        let acc1 = sim.run_with_rng(500, &mut ChaCha8Rng::seed_from_u64(9));
        let acc2 = sim.run_with_rng(500, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(acc1, acc2);
        assert_eq!(acc1.iterations(), 500);
    }

    #[test]
    fn test_unknown_team_is_skipped() {
        let (standings, mut fixtures) = make_league();
        fixtures.clear();
        fixtures.push(Fixture::new("A", "Ghost FC", 0.0, 1.0, 0.0));

        let sim = SeasonSimulator::new(&standings, &fixtures, config()).unwrap();
        assert_eq!(sim.fixtures()[0].home, Some(0));
        assert_eq!(sim.fixtures()[0].away, None);

        // A certain draw: A gains a point, the unknown side is dropped
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let points = sim.simulate_once(&mut rng);
        assert_eq!(points, vec![71, 65, 50, 40, 30, 28]);
    }

    #[test]
    fn test_malformed_fixture_identified() {
        let (standings, mut fixtures) = make_league();
        fixtures[3].draw = 0.9;

        let err = SeasonSimulator::new(&standings, &fixtures, config()).unwrap_err();
        match err {
            ProjectionError::MalformedFixture { index, home, away, .. } => {
                assert_eq!(index, 3);
                assert_eq!((home.as_str(), away.as_str()), ("B", "C"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_loose_tolerance_rejected() {
        let (standings, mut fixtures) = make_league();
        fixtures.push(Fixture::new("A", "B", 1.0, 1.0, 1.0));
        let loose = SimulationConfig {
            probability_tolerance: 5.0,
            ..config()
        };

        let err = SeasonSimulator::new(&standings, &fixtures, loose).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_triple_names_fixture() {
        let (standings, mut fixtures) = make_league();
        fixtures[2] = Fixture::new("E", "F", 0.0, 0.0, 0.0);
        let widest = SimulationConfig {
            probability_tolerance: 0.1,
            ..config()
        };

        let err = SeasonSimulator::new(&standings, &fixtures, widest).unwrap_err();
        match err {
            ProjectionError::MalformedFixture { index, home, source, .. } => {
                assert_eq!(index, 2);
                assert_eq!(home, "E");
                assert_eq!(source, InvalidProbabilities::NoMass);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let (standings, fixtures) = make_league();
        let err = SeasonSimulator::new(&standings, &fixtures, config().with_num_simulations(0))
            .unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidConfig(_)));

        let err = SeasonSimulator::new(&standings, &fixtures, config().with_zones(7, 3))
            .unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_standings_rejected() {
        let err = SeasonSimulator::new(&Standings::new(), &[], config()).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidArgument(_)));
    }
}
