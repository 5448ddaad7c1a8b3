use serde::{Deserialize, Serialize};

use crate::error::InvalidProbabilities;

/// A remaining match with the classifier's raw outcome probabilities.
///
/// Probabilities are fractions, not percentages. They are validated when the
/// fixture list is handed to a [`SeasonSimulator`](crate::season::SeasonSimulator).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl Fixture {
    pub fn new(
        home: impl Into<String>,
        away: impl Into<String>,
        home_win: f64,
        draw: f64,
        away_win: f64,
    ) -> Self {
        Fixture {
            home: home.into(),
            away: away.into(),
            home_win,
            draw,
            away_win,
        }
    }

    /// Build a fixture from percentage strings such as `"42.50%"`.
    pub fn from_percentages(
        home: impl Into<String>,
        away: impl Into<String>,
        home_win: &str,
        draw: &str,
        away_win: &str,
    ) -> Result<Self, InvalidProbabilities> {
        Ok(Fixture::new(
            home,
            away,
            parse_percentage(home_win)?,
            parse_percentage(draw)?,
            parse_percentage(away_win)?,
        ))
    }

    /// Raw probabilities in (home, draw, away) order.
    pub fn raw_probs(&self) -> [f64; 3] {
        [self.home_win, self.draw, self.away_win]
    }
}

/// Parse `"42.50%"` (or `"42.5"`) into the fraction `0.425`.
pub fn parse_percentage(text: &str) -> Result<f64, InvalidProbabilities> {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value / 100.0)
        .ok_or_else(|| InvalidProbabilities::BadPercentage(text.to_string()))
}
