use rand::Rng;
use serde::Serialize;

use crate::constants::{POINTS_FOR_DRAW, POINTS_FOR_WIN};
use crate::sharpen::OutcomeProbs;

/// Result of one simulated fixture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MatchOutcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchOutcome {
    /// Invert the cumulative distribution of `probs` at `u`.
    ///
    /// `u` is a uniform draw in [0, 1). An outcome with zero probability is
    /// never returned, even when rounding leaves the cumulative sum short of 1.
    pub fn from_uniform(probs: &OutcomeProbs, u: f64) -> Self {
        let home = probs.home();
        let draw = probs.draw();
        let away = probs.away();

        if u < home || (draw == 0.0 && away == 0.0) {
            MatchOutcome::HomeWin
        } else if u < home + draw || away == 0.0 {
            MatchOutcome::Draw
        } else {
            MatchOutcome::AwayWin
        }
    }

    /// Draw one outcome, consuming exactly one `f64` from `rng`.
    pub fn sample<R: Rng + ?Sized>(probs: &OutcomeProbs, rng: &mut R) -> Self {
        Self::from_uniform(probs, rng.gen::<f64>())
    }

    /// League points earned as (home, away).
    pub fn points(self) -> (u32, u32) {
        match self {
            MatchOutcome::HomeWin => (POINTS_FOR_WIN, 0),
            MatchOutcome::Draw => (POINTS_FOR_DRAW, POINTS_FOR_DRAW),
            MatchOutcome::AwayWin => (0, POINTS_FOR_WIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use statrs::distribution::{ChiSquared, ContinuousCDF};

    #[test]
    fn test_cdf_inversion() {
        let probs = OutcomeProbs::new(0.5, 0.3, 0.2).unwrap();

        assert_eq!(MatchOutcome::from_uniform(&probs, 0.0), MatchOutcome::HomeWin);
        assert_eq!(MatchOutcome::from_uniform(&probs, 0.49), MatchOutcome::HomeWin);
        assert_eq!(MatchOutcome::from_uniform(&probs, 0.5), MatchOutcome::Draw);
        assert_eq!(MatchOutcome::from_uniform(&probs, 0.79), MatchOutcome::Draw);
        assert_eq!(MatchOutcome::from_uniform(&probs, 0.81), MatchOutcome::AwayWin);
        assert_eq!(MatchOutcome::from_uniform(&probs, 0.999), MatchOutcome::AwayWin);
    }

    #[test]
    fn test_impossible_outcome_never_drawn() {
        // Sums to 1 - 5e-4, inside the default tolerance
        let probs = OutcomeProbs::new(0.6, 0.3995, 0.0).unwrap();
        assert_eq!(MatchOutcome::from_uniform(&probs, 0.9999), MatchOutcome::Draw);

        let certain = OutcomeProbs::new(1.0, 0.0, 0.0).unwrap();
        for u in [0.0, 0.5, 0.999_999] {
            assert_eq!(MatchOutcome::from_uniform(&certain, u), MatchOutcome::HomeWin);
        }

        let no_home = OutcomeProbs::new(0.0, 0.5, 0.5).unwrap();
        assert_eq!(MatchOutcome::from_uniform(&no_home, 0.0), MatchOutcome::Draw);
    }

    #[test]
    fn test_points() {
        assert_eq!(MatchOutcome::HomeWin.points(), (3, 0));
        assert_eq!(MatchOutcome::Draw.points(), (1, 1));
        assert_eq!(MatchOutcome::AwayWin.points(), (0, 3));
    }

    #[test]
    fn test_sample_deterministic() {
        let probs = OutcomeProbs::new(0.4, 0.35, 0.25).unwrap();
        let mut rng1 = ChaCha8Rng::seed_from_u64(7);
        let mut rng2 = ChaCha8Rng::seed_from_u64(7);

        let draws1: Vec<_> = (0..100).map(|_| MatchOutcome::sample(&probs, &mut rng1)).collect();
        let draws2: Vec<_> = (0..100).map(|_| MatchOutcome::sample(&probs, &mut rng2)).collect();
        assert_eq!(draws1, draws2);
    }

    #[test]
    fn test_empirical_frequencies_match() {
        let probs = OutcomeProbs::new(0.5, 0.3, 0.2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 50_000;

        let mut counts = [0u64; 3];
        for _ in 0..n {
            let idx = match MatchOutcome::sample(&probs, &mut rng) {
                MatchOutcome::HomeWin => 0,
                MatchOutcome::Draw => 1,
                MatchOutcome::AwayWin => 2,
            };
            counts[idx] += 1;
        }

        let statistic: f64 = counts
            .iter()
            .zip(probs.as_array())
            .map(|(&observed, p)| {
                let expected = p * n as f64;
                (observed as f64 - expected).powi(2) / expected
            })
            .sum();

        // Two degrees of freedom; fail only on a 1-in-100000 deviation
        let critical = ChiSquared::new(2.0).unwrap().inverse_cdf(1.0 - 1e-5);
        assert!(
            statistic < critical,
            "chi-squared {statistic} exceeds {critical}, counts {counts:?}"
        );
    }
}
