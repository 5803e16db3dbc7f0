//! Group stage completion, qualified teams and Round-of-16 seeding.

use crate::models::{GameMatch, Group, KnockoutPairing, Stage, TeamId};
use serde::{Deserialize, Serialize};

/// Teams that finished first, second and third in their group.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedTeams {
    pub winners: Vec<TeamId>,
    pub runners_up: Vec<TeamId>,
    /// Third place drops into the Europa League.
    pub europa_league: Vec<TeamId>,
}

/// True iff at least one group match exists and all group matches are completed.
///
/// `groups` is accepted for symmetry with the other derivations; completion is
/// decided from the match list alone.
pub fn is_group_stage_complete(_groups: &[Group], matches: &[GameMatch]) -> bool {
    let mut group_matches = matches.iter().filter(|m| m.stage == Stage::Group).peekable();
    group_matches.peek().is_some() && group_matches.all(|m| m.completed)
}

/// Positions 1, 2 and 3 of every group with at least three ranked teams.
/// Smaller groups contribute nothing.
pub fn get_qualified_teams(groups: &[Group]) -> QualifiedTeams {
    let mut qualified = QualifiedTeams::default();
    for group in groups.iter().filter(|g| g.standings.len() >= 3) {
        qualified.winners.push(group.standings[0].team_id);
        qualified.runners_up.push(group.standings[1].team_id);
        qualified.europa_league.push(group.standings[2].team_id);
    }
    qualified
}

/// Knockout ties for `stage`. Only the Round of 16 is generated: the i-th
/// group winner hosts the i-th runner-up, in group order. Other stages yield
/// no ties.
pub fn generate_knockout_pairings(groups: &[Group], stage: Stage) -> Vec<KnockoutPairing> {
    if stage != Stage::Round16 {
        return Vec::new();
    }

    let (winners, runners_up): (Vec<TeamId>, Vec<TeamId>) = groups
        .iter()
        .filter(|g| g.standings.len() >= 2)
        .map(|g| (g.standings[0].team_id, g.standings[1].team_id))
        .unzip();

    winners
        .into_iter()
        .zip(runners_up)
        .enumerate()
        .map(|(i, (home, away))| KnockoutPairing::new(format!("R16-{}", i + 1), home, away, Stage::Round16))
        .collect()
}
