//! CompetitionState, CompetitionStage and AdminError.

use crate::models::game::{GameMatch, MatchId};
use crate::models::group::{group_label, Group};
use crate::models::knockout::KnockoutPairing;
use crate::models::team::{Team, TeamId};
use crate::storage::StorageError;
use serde::{Deserialize, Serialize};

/// Number of (empty) groups in a fresh competition: A..F.
pub const DEFAULT_GROUP_COUNT: usize = 6;

/// Errors returned by admin actions. The competition state is left unchanged
/// for every variant except `Storage`.
#[derive(Debug)]
pub enum AdminError {
    /// Team name is empty after trimming.
    EmptyTeamName,
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    GroupNotFound(String),
    /// The group already holds four teams.
    GroupFull(String),
    TeamNotFound(TeamId),
    MatchNotFound(MatchId),
    /// Home and away team are the same.
    SameTeam,
    /// A new match can only be recorded between teams of the same group.
    TeamsNotInSameGroup,
    /// Group count must be between 1 and 26.
    InvalidGroupCount(usize),
    /// Shrinking would remove groups that still own teams.
    GroupsNotEmpty,
    /// Bulk import failed at this (1-based) line.
    Csv { line: u64, message: String },
    /// The change was applied in memory but could not be persisted.
    Storage(StorageError),
}

impl std::fmt::Display for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminError::EmptyTeamName => write!(f, "Please enter a team name"),
            AdminError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            AdminError::GroupNotFound(name) => write!(f, "Group {} not found", name),
            AdminError::GroupFull(name) => write!(f, "Group {} already has 4 teams", name),
            AdminError::TeamNotFound(_) => write!(f, "Team not found"),
            AdminError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            AdminError::SameTeam => write!(f, "Home and away team must differ"),
            AdminError::TeamsNotInSameGroup => write!(f, "Teams must be from the same group"),
            AdminError::InvalidGroupCount(n) => {
                write!(f, "Number of groups must be between 1 and 26 (got {})", n)
            }
            AdminError::GroupsNotEmpty => {
                write!(f, "Some groups contain teams. Please remove teams first")
            }
            AdminError::Csv { line, message } => write!(f, "Import failed at line {}: {}", line, message),
            AdminError::Storage(e) => write!(f, "Change applied but not saved: {}", e),
        }
    }
}

impl std::error::Error for AdminError {}

impl From<StorageError> for AdminError {
    fn from(e: StorageError) -> Self {
        AdminError::Storage(e)
    }
}

/// Current phase of the competition.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStage {
    /// Teams play their group fixtures. Advances to Round16 automatically once
    /// every group match is completed.
    #[default]
    Group,
    Round16,
    Quarter,
    Semi,
    Final,
    Completed,
}

/// Full competition state: the single record that is persisted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionState {
    pub teams: Vec<Team>,
    pub groups: Vec<Group>,
    pub matches: Vec<GameMatch>,
    #[serde(default)]
    pub knockout_pairings: Vec<KnockoutPairing>,
    pub current_stage: CompetitionStage,
    #[serde(default)]
    pub group_stage_completed: bool,
    /// Away-goals tie-break flag for two-legged ties. Stored but not read by
    /// standings or qualification.
    #[serde(default = "default_away_goal_rule")]
    pub away_goal_rule: bool,
}

fn default_away_goal_rule() -> bool {
    true
}

impl Default for CompetitionState {
    /// Six empty groups A..F, no teams or matches, group stage.
    fn default() -> Self {
        Self {
            teams: Vec::new(),
            groups: (0..DEFAULT_GROUP_COUNT).map(|i| Group::new(group_label(i))).collect(),
            matches: Vec::new(),
            knockout_pairings: Vec::new(),
            current_stage: CompetitionStage::Group,
            group_stage_completed: false,
            away_goal_rule: default_away_goal_rule(),
        }
    }
}

impl CompetitionState {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn game_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Next free sequential match id.
    pub fn next_match_id(&self) -> MatchId {
        self.matches.iter().map(|m| m.id).max().unwrap_or(0) + 1
    }
}
