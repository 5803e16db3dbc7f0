//! Group stage fixture generation.

use crate::models::{GameMatch, Group, MatchId, GROUP_CAPACITY};
use log::debug;

/// Home/away slots per matchday, as indices into a group's four teams.
/// Matchdays 4-6 repeat 1-3 with home and away swapped.
const ROTATION: [[(usize, usize); 2]; 6] = [
    [(0, 1), (2, 3)],
    [(1, 2), (3, 0)],
    [(0, 2), (1, 3)],
    [(1, 0), (3, 2)],
    [(2, 1), (0, 3)],
    [(2, 0), (3, 1)],
];

/// Generate the group stage schedule for every full group.
///
/// A group with exactly four teams gets 6 matchdays of 2 matches. Groups with
/// any other team count get no fixtures. Match ids run from 1 across all
/// groups in the call. Matches are unplayed and carry the group's name.
pub fn generate_group_fixtures(groups: &[Group]) -> Vec<GameMatch> {
    let mut matches = Vec::new();
    let mut next_id: MatchId = 1;

    for group in groups {
        if group.teams.len() != GROUP_CAPACITY {
            debug!(
                "Skipping fixtures for group {} ({} teams)",
                group.name,
                group.teams.len()
            );
            continue;
        }
        let teams = &group.teams;
        for (day, pairs) in ROTATION.iter().enumerate() {
            for &(home, away) in pairs {
                matches.push(GameMatch::group_fixture(
                    next_id,
                    teams[home].id,
                    teams[away].id,
                    day as u32 + 1,
                    group.name.as_str(),
                ));
                next_id += 1;
            }
        }
    }

    matches
}
