use std::collections::HashMap;

use crate::error::{ProjectionError, Result};
use crate::team::{MatchResult, TeamStanding};

/// Canonical names for teams that appear under different spellings
/// in different data sources.
#[derive(Clone, Debug, Default)]
pub struct TeamAliases {
    aliases: HashMap<String, String>,
}

impl TeamAliases {
    pub fn new() -> Self {
        TeamAliases::default()
    }

    /// Map `alias` onto `canonical`.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases.insert(alias.to_string(), canonical.to_string());
    }

    /// Canonical spelling of `name`; unknown names pass through unchanged.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl<A: Into<String>, C: Into<String>> FromIterator<(A, C)> for TeamAliases {
    fn from_iter<I: IntoIterator<Item = (A, C)>>(iter: I) -> Self {
        TeamAliases {
            aliases: iter.into_iter().map(|(a, c)| (a.into(), c.into())).collect(),
        }
    }
}

/// Current league table, keyed by team name.
///
/// Insertion order is preserved; it is the order used to break
/// ties under [`TiePolicy::InputOrder`](crate::config::TiePolicy).
#[derive(Clone, Debug, Default)]
pub struct Standings {
    teams: Vec<TeamStanding>,
    index: HashMap<String, usize>,
}

impl Standings {
    pub fn new() -> Self {
        Standings::default()
    }

    /// Build from a list of standings, rejecting duplicate names.
    pub fn from_teams(teams: impl IntoIterator<Item = TeamStanding>) -> Result<Self> {
        let mut standings = Standings::new();
        for team in teams {
            standings.insert(team)?;
        }
        Ok(standings)
    }

    /// Build the table from completed-match history.
    ///
    /// Each row is one team's result in one match. Names are canonicalised
    /// through `aliases`; a team's first appearance fixes its position.
    pub fn from_results<'a, I>(results: I, aliases: &TeamAliases) -> Self
    where
        I: IntoIterator<Item = (&'a str, MatchResult)>,
    {
        let mut standings = Standings::new();
        for (name, result) in results {
            let name = aliases.canonical(name);
            let idx = match standings.index.get(name) {
                Some(&idx) => idx,
                None => standings.push(TeamStanding::new(name)),
            };
            standings.teams[idx].record(result);
        }
        standings
    }

    pub fn insert(&mut self, team: TeamStanding) -> Result<()> {
        if self.index.contains_key(&team.name) {
            return Err(ProjectionError::DuplicateTeam(team.name));
        }
        self.push(team);
        Ok(())
    }

    fn push(&mut self, team: TeamStanding) -> usize {
        let idx = self.teams.len();
        self.index.insert(team.name.clone(), idx);
        self.teams.push(team);
        idx
    }

    pub fn get(&self, name: &str) -> Option<&TeamStanding> {
        self.index.get(name).map(|&idx| &self.teams[idx])
    }

    /// Position of `name` in insertion order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn teams(&self) -> &[TeamStanding] {
        &self.teams
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TeamStanding> {
        self.teams.iter()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

impl<'a> IntoIterator for &'a Standings {
    type Item = &'a TeamStanding;
    type IntoIter = std::slice::Iter<'a, TeamStanding>;

    fn into_iter(self) -> Self::IntoIter {
        self.teams.iter()
    }
}
