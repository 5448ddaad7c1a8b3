use serde::Serialize;

use crate::config::validate_exponent;
use crate::constants::PROBABILITY_TOLERANCE;
use crate::error::{InvalidProbabilities, ProjectionError, Result};

/// A validated (home win, draw, away win) probability triple.
///
/// Each component is in [0, 1] and the components sum to 1 within the
/// tolerance used at construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OutcomeProbs {
    home: f64,
    draw: f64,
    away: f64,
}

impl OutcomeProbs {
    /// Validate a raw triple with the default tolerance.
    pub fn new(home: f64, draw: f64, away: f64) -> std::result::Result<Self, InvalidProbabilities> {
        Self::with_tolerance(home, draw, away, PROBABILITY_TOLERANCE)
    }

    pub fn with_tolerance(
        home: f64,
        draw: f64,
        away: f64,
        tolerance: f64,
    ) -> std::result::Result<Self, InvalidProbabilities> {
        for p in [home, draw, away] {
            if p.is_nan() {
                return Err(InvalidProbabilities::NotANumber);
            }
            if !(0.0..=1.0).contains(&p) {
                return Err(InvalidProbabilities::OutOfRange(p));
            }
        }

        let sum = home + draw + away;
        if sum <= 0.0 {
            return Err(InvalidProbabilities::NoMass);
        }
        if (sum - 1.0).abs() > tolerance {
            return Err(InvalidProbabilities::NotNormalized { sum, tolerance });
        }

        Ok(OutcomeProbs { home, draw, away })
    }

    pub fn home(&self) -> f64 {
        self.home
    }

    pub fn draw(&self) -> f64 {
        self.draw
    }

    pub fn away(&self) -> f64 {
        self.away
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.home, self.draw, self.away]
    }

    /// Raise each component to `exponent` and renormalize.
    ///
    /// Zero components stay zero, and the ordering of the three
    /// outcomes is preserved.
    pub fn sharpen(&self, exponent: f64) -> Result<OutcomeProbs> {
        validate_exponent(exponent)?;
        self.sharpen_unchecked(exponent).map_err(|source| {
            ProjectionError::InvalidArgument(format!(
                "cannot sharpen {:?}: {source}",
                self.as_array()
            ))
        })
    }

    /// Sharpen with an exponent the caller has already validated.
    pub(crate) fn sharpen_unchecked(
        &self,
        exponent: f64,
    ) -> std::result::Result<OutcomeProbs, InvalidProbabilities> {
        let home = self.home.powf(exponent);
        let draw = self.draw.powf(exponent);
        let away = self.away.powf(exponent);
        let total = home + draw + away;
        if total <= 0.0 {
            return Err(InvalidProbabilities::NoMass);
        }

        Ok(OutcomeProbs {
            home: home / total,
            draw: draw / total,
            away: away / total,
        })
    }
}

/// Validate a raw triple and sharpen it in one step.
pub fn sharpen(home: f64, draw: f64, away: f64, exponent: f64) -> Result<OutcomeProbs> {
    let raw = OutcomeProbs::new(home, draw, away).map_err(|source| {
        ProjectionError::InvalidArgument(format!(
            "cannot sharpen ({home}, {draw}, {away}): {source}"
        ))
    })?;
    raw.sharpen(exponent)
}
