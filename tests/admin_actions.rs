//! Integration tests for operator actions: validation, cascades and score submission.

use champions_league_web::{
    add_team, configure_group_count, generate_fixtures, import_teams_csv, remove_team,
    reset_competition, seed_round_of_16, submit_score, AdminError, CompetitionManager,
    CompetitionStage, CompetitionState, MemoryStore, ScoreTarget, TeamId,
};

fn manager() -> (CompetitionManager, MemoryStore) {
    let store = MemoryStore::new();
    (CompetitionManager::new(Box::new(store.clone())), store)
}

/// Manager with four teams in each listed group.
fn manager_with_full_groups(groups: &[&str]) -> CompetitionManager {
    let (mut m, _) = manager();
    for g in groups {
        for i in 0..4 {
            add_team(&mut m, &format!("{g}{i}"), g).unwrap();
        }
    }
    m
}

fn team_id(m: &CompetitionManager, name: &str) -> TeamId {
    m.state().teams.iter().find(|t| t.name == name).unwrap().id
}

#[test]
fn add_team_places_team_in_group_and_table() {
    let (mut m, store) = manager();
    let id = add_team(&mut m, "  Real Madrid ", "A").unwrap();
    let state = m.state();
    assert_eq!(state.teams.len(), 1);
    assert_eq!(state.teams[0].name, "Real Madrid");
    assert_eq!(state.teams[0].group.as_deref(), Some("A"));
    assert_eq!(state.groups[0].teams[0].id, id);
    assert_eq!(state.groups[0].standings[0].team_id, id);
    assert_eq!(store.saved().as_ref(), Some(state));
}

#[test]
fn add_team_rejections_leave_state_unchanged() {
    let mut m = manager_with_full_groups(&["A"]);
    let before = m.state().clone();

    assert!(matches!(add_team(&mut m, "   ", "B"), Err(AdminError::EmptyTeamName)));
    assert!(matches!(add_team(&mut m, "a0", "B"), Err(AdminError::DuplicateTeamName)));
    assert!(matches!(add_team(&mut m, "New", "A"), Err(AdminError::GroupFull(_))));
    assert!(matches!(add_team(&mut m, "New", "Z"), Err(AdminError::GroupNotFound(_))));
    assert_eq!(m.state(), &before);
}

#[test]
fn removing_a_team_cascades_to_group_and_matches() {
    let mut m = manager_with_full_groups(&["A", "B"]);
    generate_fixtures(&mut m).unwrap();
    let gone = team_id(&m, "A2");

    remove_team(&mut m, gone).unwrap();
    let state = m.state();
    assert!(state.team(gone).is_none());
    assert!(!state.groups[0].contains_team(gone));
    assert!(state.matches.iter().all(|g| !g.involves(gone)));
    // 6 of group A's 12 fixtures involve the removed team.
    assert_eq!(state.matches.len(), 24 - 6);
    assert_eq!(state.groups[0].standings.len(), 3);
}

#[test]
fn removing_unknown_team_is_rejected() {
    let (mut m, _) = manager();
    let stray = uuid::Uuid::new_v4();
    assert!(matches!(remove_team(&mut m, stray), Err(AdminError::TeamNotFound(id)) if id == stray));
}

#[test]
fn generate_fixtures_only_covers_full_groups() {
    let mut m = manager_with_full_groups(&["A"]);
    add_team(&mut m, "Lonely", "B").unwrap();
    assert_eq!(generate_fixtures(&mut m).unwrap(), 12);
    assert!(m.state().matches.iter().all(|g| g.group.as_deref() == Some("A")));
}

#[test]
fn submitting_every_score_completes_group_stage() {
    let mut m = manager_with_full_groups(&["A", "B"]);
    generate_fixtures(&mut m).unwrap();
    let ids: Vec<u32> = m.state().matches.iter().map(|g| g.id).collect();
    let (last, rest) = ids.split_last().unwrap();
    for id in rest {
        submit_score(&mut m, ScoreTarget::Match { match_id: *id }, 1, 0).unwrap();
    }
    assert_eq!(m.state().current_stage, CompetitionStage::Group);
    assert!(!m.state().group_stage_completed);

    submit_score(&mut m, ScoreTarget::Match { match_id: *last }, 0, 0).unwrap();
    assert!(m.state().group_stage_completed);
    assert_eq!(m.state().current_stage, CompetitionStage::Round16);
    for g in &m.state().groups {
        let played: u32 = g.standings.iter().map(|s| s.played).sum();
        assert_eq!(played, 24);
    }

    assert_eq!(seed_round_of_16(&mut m).unwrap(), 2);
    let pairings = &m.state().knockout_pairings;
    assert_eq!(pairings[0].home_team, m.state().groups[0].standings[0].team_id);
    assert_eq!(pairings[0].away_team, m.state().groups[0].standings[1].team_id);
}

#[test]
fn score_by_teams_fills_both_legs() {
    let mut m = manager_with_full_groups(&["A"]);
    generate_fixtures(&mut m).unwrap();
    let (a0, a1) = (team_id(&m, "A0"), team_id(&m, "A1"));
    // A0 v A1 is match 1 (matchday 1); A1 v A0 is match 7 (matchday 4).
    let first = ScoreTarget::Teams { home_team: a0, away_team: a1 };
    let second = ScoreTarget::Teams { home_team: a1, away_team: a0 };
    assert_eq!(submit_score(&mut m, first, 1, 0).unwrap(), 1);
    assert_eq!(submit_score(&mut m, second, 2, 2).unwrap(), 7);

    let state = m.state();
    assert_eq!(state.game_match(1).unwrap().home_score, Some(1));
    assert_eq!(state.game_match(7).unwrap().home_score, Some(2));
    assert_eq!(state.matches.len(), 12);
    let a0_row = state.groups[0].standings.iter().find(|s| s.team_id == a0).unwrap();
    assert_eq!((a0_row.played, a0_row.points), (2, 4));

    // With both legs played, a further submission corrects the first meeting.
    assert_eq!(submit_score(&mut m, first, 3, 0).unwrap(), 1);
    assert_eq!(m.state().game_match(1).unwrap().home_score, Some(3));
}

#[test]
fn score_by_teams_takes_open_leg_in_submitted_orientation() {
    let mut m = manager_with_full_groups(&["A"]);
    generate_fixtures(&mut m).unwrap();
    let (a0, a1) = (team_id(&m, "A0"), team_id(&m, "A1"));
    let target = ScoreTarget::Teams { home_team: a1, away_team: a0 };
    assert_eq!(submit_score(&mut m, target, 2, 0).unwrap(), 7);

    // The matchday 4 leg is played, so the matchday 1 leg takes the submitted orientation.
    let id = submit_score(&mut m, target, 1, 0).unwrap();
    assert_eq!(id, 1);
    let game = m.state().game_match(id).unwrap();
    assert_eq!((game.home_team, game.away_team), (a1, a0));
    assert_eq!((game.home_score, game.away_score), (Some(1), Some(0)));
    assert!(game.completed);
    assert_eq!(m.state().groups[0].standings[0].team_id, a1);
}

#[test]
fn score_by_teams_creates_match_within_a_group() {
    let (mut m, _) = manager();
    let home = add_team(&mut m, "Inter", "C").unwrap();
    let away = add_team(&mut m, "Milan", "C").unwrap();
    let id = submit_score(&mut m, ScoreTarget::Teams { home_team: home, away_team: away }, 1, 1).unwrap();
    let game = m.state().game_match(id).unwrap();
    assert_eq!(game.group.as_deref(), Some("C"));
    assert_eq!(game.matchday, 1);
    assert!(game.completed);
    let table = &m.state().group("C").unwrap().standings;
    assert!(table.iter().all(|s| s.points == 1 && s.drawn == 1));
}

#[test]
fn score_rejections_leave_state_unchanged() {
    let (mut m, _) = manager();
    let a = add_team(&mut m, "Ajax", "A").unwrap();
    let b = add_team(&mut m, "Benfica", "B").unwrap();
    let before = m.state().clone();

    assert!(matches!(
        submit_score(&mut m, ScoreTarget::Match { match_id: 42 }, 1, 0),
        Err(AdminError::MatchNotFound(42))
    ));
    assert!(matches!(
        submit_score(&mut m, ScoreTarget::Teams { home_team: a, away_team: a }, 1, 0),
        Err(AdminError::SameTeam)
    ));
    assert!(matches!(
        submit_score(&mut m, ScoreTarget::Teams { home_team: a, away_team: b }, 1, 0),
        Err(AdminError::TeamsNotInSameGroup)
    ));
    assert!(matches!(
        submit_score(&mut m, ScoreTarget::Teams { home_team: a, away_team: uuid::Uuid::new_v4() }, 1, 0),
        Err(AdminError::TeamNotFound(_))
    ));
    assert_eq!(m.state(), &before);
}

#[test]
fn growing_group_count_appends_letters() {
    let (mut m, _) = manager();
    configure_group_count(&mut m, 8).unwrap();
    let names: Vec<&str> = m.state().groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C", "D", "E", "F", "G", "H"]);
}

#[test]
fn shrinking_is_refused_while_removed_groups_hold_teams() {
    let (mut m, _) = manager();
    add_team(&mut m, "Porto", "E").unwrap();
    let before = m.state().clone();
    assert!(matches!(configure_group_count(&mut m, 4), Err(AdminError::GroupsNotEmpty)));
    assert_eq!(m.state(), &before);

    configure_group_count(&mut m, 5).unwrap();
    assert_eq!(m.state().groups.len(), 5);
}

#[test]
fn group_count_out_of_range_is_rejected() {
    let (mut m, _) = manager();
    assert!(matches!(configure_group_count(&mut m, 0), Err(AdminError::InvalidGroupCount(0))));
    assert!(matches!(configure_group_count(&mut m, 27), Err(AdminError::InvalidGroupCount(27))));
}

#[test]
fn group_count_relabels_out_of_order_groups() {
    let (mut m, _) = manager();
    add_team(&mut m, "Celtic", "C").unwrap();
    // Drop group B by hand so the labels are A, C, D, E, F.
    let mut groups = m.state().groups.clone();
    groups.remove(1);
    m.dispatch(champions_league_web::Command::SetGroups(groups)).unwrap();

    configure_group_count(&mut m, 5).unwrap();
    let state = m.state();
    let names: Vec<&str> = state.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    assert_eq!(state.teams[0].group.as_deref(), Some("B"));
    assert_eq!(state.groups[1].teams[0].group.as_deref(), Some("B"));
}

#[test]
fn csv_import_adds_rows_and_skips_header() {
    let (mut m, _) = manager();
    let csv = "name,group\nLiverpool,A\n Bayern , B\n";
    assert_eq!(import_teams_csv(&mut m, csv.as_bytes()).unwrap(), 2);
    assert_eq!(m.state().group("B").unwrap().teams[0].name, "Bayern");
}

#[test]
fn csv_import_stops_at_first_bad_row() {
    let (mut m, _) = manager();
    let csv = "Liverpool,A\nliverpool,B\nBarcelona,C\n";
    match import_teams_csv(&mut m, csv.as_bytes()) {
        Err(AdminError::Csv { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected csv error, got {other:?}"),
    }
    assert_eq!(m.state().teams.len(), 1);
}

#[test]
fn csv_import_reports_physical_line_past_blank_lines() {
    let (mut m, _) = manager();
    let csv = "Liverpool,A\n\nBarcelona,Z\n";
    match import_teams_csv(&mut m, csv.as_bytes()) {
        Err(AdminError::Csv { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected csv error, got {other:?}"),
    }
    assert_eq!(m.state().teams.len(), 1);
}

#[test]
fn reset_restores_default_shape() {
    let mut m = manager_with_full_groups(&["A"]);
    generate_fixtures(&mut m).unwrap();
    reset_competition(&mut m).unwrap();
    assert_eq!(m.state(), &CompetitionState::default());
}
