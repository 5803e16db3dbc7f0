//! Read-only projections of the competition for display: fixtures, history,
//! labels, qualification zones and summary statistics.

use crate::models::{CompetitionStage, CompetitionState, GameMatch, Stage, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder for a team id that no longer resolves.
pub const UNKNOWN_TEAM: &str = "Unknown Team";
/// Placeholder for an unresolved knockout slot.
pub const TBD: &str = "TBD";

/// Team name, or "Unknown Team" if the id is stale.
pub fn team_name(state: &CompetitionState, id: TeamId) -> &str {
    state.team(id).map_or(UNKNOWN_TEAM, |t| t.name.as_str())
}

/// Team name for bracket display, or "TBD".
pub fn bracket_team_name(state: &CompetitionState, id: TeamId) -> &str {
    state.team(id).map_or(TBD, |t| t.name.as_str())
}

/// Distinct matchdays of the group stage, ascending.
pub fn matchdays(matches: &[GameMatch]) -> Vec<u32> {
    let mut days: Vec<u32> = matches
        .iter()
        .filter(|m| m.stage == Stage::Group)
        .map(|m| m.matchday)
        .collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// Group matches on one matchday, keyed by group label.
pub fn fixtures_for_matchday(matches: &[GameMatch], matchday: u32) -> BTreeMap<String, Vec<&GameMatch>> {
    let mut by_group: BTreeMap<String, Vec<&GameMatch>> = BTreeMap::new();
    for m in matches
        .iter()
        .filter(|m| m.stage == Stage::Group && m.matchday == matchday)
    {
        let label = m.group.clone().unwrap_or_default();
        by_group.entry(label).or_default().push(m);
    }
    by_group
}

/// Which completed matches to list in the history.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    #[default]
    All,
    Group,
    Knockout,
}

/// Completed matches, latest stage first, then highest matchday first.
pub fn match_history(matches: &[GameMatch], filter: HistoryFilter) -> Vec<&GameMatch> {
    let mut history: Vec<&GameMatch> = matches
        .iter()
        .filter(|m| m.completed)
        .filter(|m| match filter {
            HistoryFilter::All => true,
            HistoryFilter::Group => m.stage == Stage::Group,
            HistoryFilter::Knockout => m.stage.is_knockout(),
        })
        .collect();
    history.sort_by(|a, b| {
        b.stage
            .priority()
            .cmp(&a.stage.priority())
            .then(b.matchday.cmp(&a.matchday))
    });
    history
}

/// Short label for where a match sits, e.g. "Group A - MD 3" or "Semi Final".
pub fn stage_label(m: &GameMatch) -> String {
    match m.stage {
        Stage::Group => match &m.group {
            Some(group) => format!("Group {} - MD {}", group, m.matchday),
            None => format!("Group Stage - MD {}", m.matchday),
        },
        Stage::Round16 => "Round of 16".to_string(),
        Stage::Quarter => "Quarter Final".to_string(),
        Stage::Semi => "Semi Final".to_string(),
        Stage::Final => "Final".to_string(),
    }
}

/// Headline for the competition's current stage.
pub fn stage_status(stage: CompetitionStage) -> &'static str {
    match stage {
        CompetitionStage::Group => "Group Stage in Progress",
        CompetitionStage::Round16 => "Round of 16",
        CompetitionStage::Quarter => "Quarter Finals",
        CompetitionStage::Semi => "Semi Finals",
        CompetitionStage::Final => "Champions League Final",
        CompetitionStage::Completed => "Tournament Completed",
    }
}

/// Where a group position leads.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationStatus {
    ChampionsLeagueWinner,
    ChampionsLeagueQualifier,
    EuropaLeague,
    Eliminated,
}

impl QualificationStatus {
    pub fn label(self) -> &'static str {
        match self {
            QualificationStatus::ChampionsLeagueWinner => "Champions League Winner",
            QualificationStatus::ChampionsLeagueQualifier => "Champions League Qualifier",
            QualificationStatus::EuropaLeague => "Europa League",
            QualificationStatus::Eliminated => "Eliminated",
        }
    }
}

pub fn qualification_status(position: u32) -> QualificationStatus {
    match position {
        1 => QualificationStatus::ChampionsLeagueWinner,
        2 => QualificationStatus::ChampionsLeagueQualifier,
        3 => QualificationStatus::EuropaLeague,
        _ => QualificationStatus::Eliminated,
    }
}

/// A group's current leader.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLeader {
    pub team_id: TeamId,
    pub team_name: String,
    pub group: String,
    pub points: u32,
}

/// Leaders of each ranked group, most points first, at most `limit`.
pub fn top_group_leaders(state: &CompetitionState, limit: usize) -> Vec<GroupLeader> {
    let mut leaders: Vec<GroupLeader> = state
        .groups
        .iter()
        .filter_map(|g| {
            let top = g.standings.first()?;
            let team = state.team(top.team_id)?;
            Some(GroupLeader {
                team_id: team.id,
                team_name: team.name.clone(),
                group: g.name.clone(),
                points: top.points,
            })
        })
        .collect();
    leaders.sort_by(|a, b| b.points.cmp(&a.points));
    leaders.truncate(limit);
    leaders
}

/// Summary numbers for the overview page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionStats {
    pub total_teams: usize,
    pub total_matches: usize,
    pub completed_matches: usize,
    pub remaining_matches: usize,
    pub total_goals: u32,
    /// Goals per completed match; 0 before any match is played.
    pub average_goals: f64,
    /// Rounded share of matches completed, 0..=100.
    pub completion_percentage: u32,
}

pub fn competition_stats(state: &CompetitionState) -> CompetitionStats {
    let total_matches = state.matches.len();
    let completed: Vec<&GameMatch> = state.matches.iter().filter(|m| m.completed).collect();
    let total_goals: u32 = completed
        .iter()
        .map(|m| {
            let (home, away) = m.goals();
            home + away
        })
        .sum();
    let average_goals = if completed.is_empty() {
        0.0
    } else {
        f64::from(total_goals) / completed.len() as f64
    };
    let completion_percentage = if total_matches == 0 {
        0
    } else {
        (completed.len() as f64 * 100.0 / total_matches as f64).round() as u32
    };
    CompetitionStats {
        total_teams: state.teams.len(),
        total_matches,
        completed_matches: completed.len(),
        remaining_matches: total_matches - completed.len(),
        total_goals,
        average_goals,
        completion_percentage,
    }
}
