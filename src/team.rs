use serde::{Deserialize, Serialize};

use crate::constants::{POINTS_FOR_DRAW, POINTS_FOR_WIN};

/// Result of one completed match from a single team's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    /// Parse the `W` / `D` / `L` codes used in match-history tables.
    ///
    /// Anything that is not a win or a draw counts as a loss.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "W" | "w" => MatchResult::Win,
            "D" | "d" => MatchResult::Draw,
            _ => MatchResult::Loss,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            MatchResult::Win => POINTS_FOR_WIN,
            MatchResult::Draw => POINTS_FOR_DRAW,
            MatchResult::Loss => 0,
        }
    }
}

/// A team's record from completed matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub name: String,
    pub played: u32,

    /// Points from completed matches
    pub points: u32,

    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl TeamStanding {
    /// A team with no matches played.
    pub fn new(name: impl Into<String>) -> Self {
        TeamStanding {
            name: name.into(),
            played: 0,
            points: 0,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    /// Build a standing from a win/draw/loss record.
    pub fn from_record(name: impl Into<String>, wins: u32, draws: u32, losses: u32) -> Self {
        TeamStanding {
            name: name.into(),
            played: wins + draws + losses,
            points: wins * POINTS_FOR_WIN + draws * POINTS_FOR_DRAW,
            wins,
            draws,
            losses,
        }
    }

    /// A standing known only by matches played and points.
    pub fn with_points(name: impl Into<String>, played: u32, points: u32) -> Self {
        TeamStanding {
            played,
            points,
            ..TeamStanding::new(name)
        }
    }

    /// Apply one completed match.
    pub fn record(&mut self, result: MatchResult) {
        self.played += 1;
        self.points += result.points();
        match result {
            MatchResult::Win => self.wins += 1,
            MatchResult::Draw => self.draws += 1,
            MatchResult::Loss => self.losses += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record() {
        let team = TeamStanding::from_record("Arsenal", 5, 2, 1);
        assert_eq!(team.played, 8);
        assert_eq!(team.points, 17);
    }

    #[test]
    fn test_record_updates_counters() {
        let mut team = TeamStanding::new("Wolves");
        team.record(MatchResult::Win);
        team.record(MatchResult::Draw);
        team.record(MatchResult::Loss);

        assert_eq!(team, TeamStanding::from_record("Wolves", 1, 1, 1));
        assert_eq!(team.points, 4);
    }

    #[test]
    fn test_result_codes() {
        assert_eq!(MatchResult::from_code("W"), MatchResult::Win);
        assert_eq!(MatchResult::from_code(" D "), MatchResult::Draw);
        assert_eq!(MatchResult::from_code("L"), MatchResult::Loss);
        assert_eq!(MatchResult::from_code(""), MatchResult::Loss);
    }
}
