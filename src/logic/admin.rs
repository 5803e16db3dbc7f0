//! Operator actions: validate against the current state, then dispatch commands.
//!
//! On a validation error nothing is dispatched and the state is unchanged.

use crate::logic::fixtures::generate_group_fixtures;
use crate::logic::qualification::generate_knockout_pairings;
use crate::logic::state::{Command, CompetitionManager};
use crate::models::{
    group_label, AdminError, CompetitionStage, GameMatch, Group, MatchId, Stage, Team, TeamId,
    MAX_GROUPS,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which match a submitted score belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreTarget {
    /// An existing match by id.
    Match { match_id: MatchId },
    /// The match between two teams (either orientation). Created if missing.
    Teams { home_team: TeamId, away_team: TeamId },
}

/// Add a team to a group. Names are trimmed and must be unique (case-insensitive);
/// the group must exist and have room.
pub fn add_team(
    manager: &mut CompetitionManager,
    name: &str,
    group: &str,
) -> Result<TeamId, AdminError> {
    let state = manager.state();
    let name = name.trim();
    if name.is_empty() {
        return Err(AdminError::EmptyTeamName);
    }
    if state.teams.iter().any(|t| t.has_name(name)) {
        return Err(AdminError::DuplicateTeamName);
    }
    let target = state
        .group(group)
        .ok_or_else(|| AdminError::GroupNotFound(group.to_string()))?;
    if target.is_full() {
        return Err(AdminError::GroupFull(group.to_string()));
    }

    let team = Team::new(name, group);
    let id = team.id;
    let mut teams = state.teams.clone();
    teams.push(team.clone());
    let mut groups = state.groups.clone();
    if let Some(g) = groups.iter_mut().find(|g| g.name == group) {
        g.teams.push(team);
    }

    info!("Adding team {} to group {}", name, group);
    manager.dispatch_all([Command::SetTeams(teams), Command::SetGroups(groups)])?;
    Ok(id)
}

/// Remove a team, its group membership, and every match it plays in.
pub fn remove_team(manager: &mut CompetitionManager, team_id: TeamId) -> Result<(), AdminError> {
    let state = manager.state();
    let team = state.team(team_id).ok_or(AdminError::TeamNotFound(team_id))?;
    info!("Removing team {}", team.name);

    let teams: Vec<Team> = state.teams.iter().filter(|t| t.id != team_id).cloned().collect();
    let matches: Vec<GameMatch> = state
        .matches
        .iter()
        .filter(|m| !m.involves(team_id))
        .cloned()
        .collect();
    let groups: Vec<Group> = state
        .groups
        .iter()
        .cloned()
        .map(|mut g| {
            g.teams.retain(|t| t.id != team_id);
            g
        })
        .collect();

    // Matches go in before groups so the group update recalculates against them.
    manager.dispatch_all([
        Command::SetTeams(teams),
        Command::SetMatches(matches),
        Command::SetGroups(groups),
    ])?;
    Ok(())
}

/// Replace all matches with a fresh group stage schedule. Returns the number
/// of fixtures generated (0 if no group has exactly four teams).
pub fn generate_fixtures(manager: &mut CompetitionManager) -> Result<usize, AdminError> {
    let fixtures = generate_group_fixtures(&manager.state().groups);
    let count = fixtures.len();
    info!("Generated {} group fixtures", count);
    manager.dispatch_all([Command::SetMatches(fixtures), Command::RecalculateStandings])?;
    Ok(count)
}

/// Record a final score and recalculate standings. Returns the id of the
/// match that was updated or created.
pub fn submit_score(
    manager: &mut CompetitionManager,
    target: ScoreTarget,
    home_score: u32,
    away_score: u32,
) -> Result<MatchId, AdminError> {
    let state = manager.state();
    let mut matches = state.matches.clone();

    let match_id = match target {
        ScoreTarget::Match { match_id } => {
            let m = matches
                .iter_mut()
                .find(|m| m.id == match_id)
                .ok_or(AdminError::MatchNotFound(match_id))?;
            m.record_score(home_score, away_score);
            match_id
        }
        ScoreTarget::Teams {
            home_team,
            away_team,
        } => {
            if home_team == away_team {
                return Err(AdminError::SameTeam);
            }
            if let Some(index) = pair_match_index(&matches, home_team, away_team) {
                // The submitted orientation wins over the scheduled one.
                let m = &mut matches[index];
                m.home_team = home_team;
                m.away_team = away_team;
                m.record_score(home_score, away_score);
                m.id
            } else {
                let home = state
                    .team(home_team)
                    .ok_or(AdminError::TeamNotFound(home_team))?;
                let away = state
                    .team(away_team)
                    .ok_or(AdminError::TeamNotFound(away_team))?;
                let group = match (&home.group, &away.group) {
                    (Some(h), Some(a)) if h == a => h.clone(),
                    _ => return Err(AdminError::TeamsNotInSameGroup),
                };
                let id = state.next_match_id();
                let mut m = GameMatch::group_fixture(id, home_team, away_team, 1, group);
                m.record_score(home_score, away_score);
                matches.push(m);
                id
            }
        }
    };

    info!("Score recorded for match {}: {}-{}", match_id, home_score, away_score);
    manager.dispatch_all([Command::SetMatches(matches), Command::RecalculateStandings])?;
    Ok(match_id)
}

/// Match between two teams that a pair submission should fill: an unplayed leg
/// in the submitted orientation, then any unplayed leg, then the first meeting.
fn pair_match_index(matches: &[GameMatch], home: TeamId, away: TeamId) -> Option<usize> {
    let open = |m: &GameMatch| m.is_between(home, away) && !m.completed;
    matches
        .iter()
        .position(|m| open(m) && m.home_team == home)
        .or_else(|| matches.iter().position(open))
        .or_else(|| matches.iter().position(|m| m.is_between(home, away)))
}

pub fn recalculate_standings(manager: &mut CompetitionManager) -> Result<(), AdminError> {
    manager.dispatch(Command::RecalculateStandings)?;
    Ok(())
}

pub fn reset_competition(manager: &mut CompetitionManager) -> Result<(), AdminError> {
    info!("Resetting competition");
    manager.dispatch(Command::Reset)?;
    Ok(())
}

/// Set the stage manually (later knockout rounds are advanced by hand).
pub fn set_stage(manager: &mut CompetitionManager, stage: CompetitionStage) -> Result<(), AdminError> {
    info!("Setting stage to {:?}", stage);
    manager.dispatch(Command::SetStage(stage))?;
    Ok(())
}

/// Seed the Round of 16 from the current group tables. Returns the number of ties.
pub fn seed_round_of_16(manager: &mut CompetitionManager) -> Result<usize, AdminError> {
    let pairings = generate_knockout_pairings(&manager.state().groups, Stage::Round16);
    let count = pairings.len();
    manager.dispatch(Command::SetKnockoutPairings(pairings))?;
    Ok(count)
}

/// Resize to `count` groups (1..=26), labelled A.. in order.
///
/// Growing appends empty groups. Shrinking is refused if a removed group still
/// owns teams. Any group whose label changes has the new label written to its
/// teams and matches too.
pub fn configure_group_count(
    manager: &mut CompetitionManager,
    count: usize,
) -> Result<(), AdminError> {
    if !(1..=MAX_GROUPS).contains(&count) {
        return Err(AdminError::InvalidGroupCount(count));
    }
    let state = manager.state();
    let current = state.groups.len();

    if count < current {
        let removed = &state.groups[count..];
        let owns_teams = removed.iter().any(|g| {
            !g.teams.is_empty() || state.teams.iter().any(|t| t.is_in_group(&g.name))
        });
        if owns_teams {
            return Err(AdminError::GroupsNotEmpty);
        }
    }

    let mut groups: Vec<Group> = state.groups.iter().take(count).cloned().collect();
    groups.extend((current..count).map(|i| Group::new(group_label(i))));

    let mut renames: HashMap<String, String> = HashMap::new();
    for (index, group) in groups.iter_mut().enumerate() {
        let label = group_label(index);
        if group.name != label {
            renames.insert(group.name.clone(), label.clone());
            group.name = label;
            for team in &mut group.teams {
                team.group = Some(group.name.clone());
            }
        }
    }

    let relabel = |label: &mut Option<String>| {
        if let Some(new) = label.as_ref().and_then(|l| renames.get(l)) {
            *label = Some(new.clone());
        }
    };
    let mut teams = state.teams.clone();
    teams.iter_mut().for_each(|t| relabel(&mut t.group));
    let mut matches = state.matches.clone();
    matches.iter_mut().for_each(|m| relabel(&mut m.group));

    info!("Configuring {} groups (was {})", count, current);
    manager.dispatch_all([
        Command::SetTeams(teams),
        Command::SetMatches(matches),
        Command::SetGroups(groups),
    ])?;
    Ok(())
}

/// Bulk-add teams from CSV rows of `name,group`. A leading `name,group`
/// header is skipped. Rows are added in order through [`add_team`]; the first
/// rejected row stops the import, keeping the rows before it. Returns the
/// number of teams added.
pub fn import_teams_csv<R: std::io::Read>(
    manager: &mut CompetitionManager,
    reader: R,
) -> Result<usize, AdminError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut imported = 0;
    for (index, record) in rdr.records().enumerate() {
        // Blank lines are skipped by the reader, so the index is only a fallback.
        let fallback = index as u64 + 1;
        let record = record.map_err(|e| AdminError::Csv {
            line: e.position().map_or(fallback, |p| p.line()),
            message: e.to_string(),
        })?;
        let line = record.position().map_or(fallback, |p| p.line());
        let name = record.get(0).unwrap_or_default();
        let group = record.get(1).unwrap_or_default();
        if index == 0 && name.eq_ignore_ascii_case("name") && group.eq_ignore_ascii_case("group") {
            continue;
        }
        match add_team(manager, name, group) {
            Ok(_) => imported += 1,
            Err(AdminError::Storage(e)) => return Err(AdminError::Storage(e)),
            Err(e) => {
                return Err(AdminError::Csv {
                    line,
                    message: e.to_string(),
                })
            }
        }
    }
    info!("Imported {} teams from CSV", imported);
    Ok(imported)
}
