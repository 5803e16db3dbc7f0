//! Group and GroupStanding data structures.

use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// Teams per group. Fixtures are only generated for full groups.
pub const GROUP_CAPACITY: usize = 4;

/// Groups are labelled A..Z, so at most 26 of them.
pub const MAX_GROUPS: usize = 26;

/// Label for the group at `index` (0 -> "A", 1 -> "B", ...).
pub fn group_label(index: usize) -> String {
    debug_assert!(index < MAX_GROUPS);
    char::from(b'A' + (index % MAX_GROUPS) as u8).to_string()
}

/// A group of up to four teams with its derived table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub teams: Vec<Team>,
    /// Derived from completed matches; only ever rewritten by a standings recalculation.
    #[serde(default)]
    pub standings: Vec<GroupStanding>,
}

impl Group {
    /// An empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            teams: Vec::new(),
            standings: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.teams.len() >= GROUP_CAPACITY
    }

    pub fn contains_team(&self, id: TeamId) -> bool {
        self.teams.iter().any(|t| t.id == id)
    }
}

/// One row of a group table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
    /// 1-based rank within the group; 0 until ranked.
    pub position: u32,
}

impl GroupStanding {
    /// All-zero row for a team that has not played yet.
    pub fn new(team: &Team) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            ..Default::default()
        }
    }

    /// Record one played match: goals plus win (3 pts), draw (1 pt) or loss.
    pub fn record_result(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won += 1;
                self.points += 3;
            }
            std::cmp::Ordering::Less => self.lost += 1,
            std::cmp::Ordering::Equal => {
                self.drawn += 1;
                self.points += 1;
            }
        }
    }

    pub fn update_goal_difference(&mut self) {
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
    }
}
