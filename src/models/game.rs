//! Match (game) and Stage for group and knockout fixtures.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a match. Assigned sequentially, starting at 1.
pub type MatchId = u32;

/// Phase of the competition a match (or knockout pairing) belongs to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Group,
    Round16,
    Quarter,
    Semi,
    Final,
}

impl Stage {
    /// Ordering weight used when listing match history (later stages first).
    pub fn priority(self) -> u8 {
        match self {
            Stage::Group => 1,
            Stage::Round16 => 2,
            Stage::Quarter => 3,
            Stage::Semi => 4,
            Stage::Final => 5,
        }
    }

    pub fn is_knockout(self) -> bool {
        self != Stage::Group
    }
}

/// Result of a completed match from the home side's point of view.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Home,
    Away,
    Draw,
}

/// A single fixture between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: MatchId,
    pub home_team: TeamId,
    pub away_team: TeamId,
    /// None until the match has been played.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
    /// 1-based.
    pub matchday: u32,
    pub stage: Stage,
    /// Group label; always set for group-stage matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Leg number (1 or 2) for two-legged knockout ties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leg: Option<u8>,
}

impl GameMatch {
    /// An unplayed group-stage fixture.
    pub fn group_fixture(
        id: MatchId,
        home_team: TeamId,
        away_team: TeamId,
        matchday: u32,
        group: impl Into<String>,
    ) -> Self {
        Self {
            id,
            home_team,
            away_team,
            home_score: None,
            away_score: None,
            matchday,
            stage: Stage::Group,
            group: Some(group.into()),
            completed: false,
            leg: None,
        }
    }

    /// Record a final score and mark the match completed.
    pub fn record_score(&mut self, home_score: u32, away_score: u32) {
        self.home_score = Some(home_score);
        self.away_score = Some(away_score);
        self.completed = true;
    }

    /// Goals for (home, away). Missing scores count as 0.
    pub fn goals(&self) -> (u32, u32) {
        (self.home_score.unwrap_or(0), self.away_score.unwrap_or(0))
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// True if the match is between `a` and `b`, in either orientation.
    pub fn is_between(&self, a: TeamId, b: TeamId) -> bool {
        (self.home_team == a && self.away_team == b) || (self.home_team == b && self.away_team == a)
    }

    /// Outcome of a completed match; None while unplayed.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if !self.completed {
            return None;
        }
        let (home, away) = self.goals();
        Some(match home.cmp(&away) {
            std::cmp::Ordering::Greater => MatchOutcome::Home,
            std::cmp::Ordering::Less => MatchOutcome::Away,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        })
    }
}
