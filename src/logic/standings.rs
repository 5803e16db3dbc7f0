//! Group table calculation.

use crate::models::{GameMatch, Group, GroupStanding};

/// Compute the ranked table for one group from scratch.
///
/// 1. Start every team in the group on an all-zero row (group order).
/// 2. Apply each completed match labelled with this group; missing scores count as 0.
/// 3. Sort by points, then goal difference, then goals for (all descending).
///    Equal rows keep their insertion order.
/// 4. Number positions from 1.
pub fn calculate_group_standings(group: &Group, matches: &[GameMatch]) -> Vec<GroupStanding> {
    let mut standings: Vec<GroupStanding> = group.teams.iter().map(GroupStanding::new).collect();

    let group_matches = matches
        .iter()
        .filter(|m| m.completed && m.group.as_deref() == Some(group.name.as_str()));

    for m in group_matches {
        let home = standings.iter().position(|s| s.team_id == m.home_team);
        let away = standings.iter().position(|s| s.team_id == m.away_team);
        // Matches against teams no longer in the group are ignored.
        let (Some(home), Some(away)) = (home, away) else {
            continue;
        };
        let (home_goals, away_goals) = m.goals();
        standings[home].record_result(home_goals, away_goals);
        standings[away].record_result(away_goals, home_goals);
    }

    for s in &mut standings {
        s.update_goal_difference();
    }

    // sort_by is stable, so ties keep group order.
    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });

    for (index, s) in standings.iter_mut().enumerate() {
        s.position = index as u32 + 1;
    }

    standings
}
