//! Integration tests for group stage fixture generation.

use champions_league_web::{generate_group_fixtures, Group, Stage, Team, TeamId};
use std::collections::HashMap;

fn group_with_teams(name: &str, n: usize) -> Group {
    let mut group = Group::new(name);
    group.teams = (0..n).map(|i| Team::new(format!("{name}{i}"), name)).collect();
    group
}

fn ids(group: &Group) -> Vec<TeamId> {
    group.teams.iter().map(|t| t.id).collect()
}

#[test]
fn full_group_gets_twelve_matches_over_six_matchdays() {
    let group = group_with_teams("A", 4);
    let matches = generate_group_fixtures(&[group]);
    assert_eq!(matches.len(), 12);
    for day in 1..=6 {
        assert_eq!(matches.iter().filter(|m| m.matchday == day).count(), 2);
    }
    for m in &matches {
        assert_eq!(m.stage, Stage::Group);
        assert_eq!(m.group.as_deref(), Some("A"));
        assert!(!m.completed);
        assert_eq!(m.home_score, None);
        assert_eq!(m.away_score, None);
        assert_ne!(m.home_team, m.away_team);
    }
}

#[test]
fn every_team_plays_once_per_matchday() {
    let group = group_with_teams("A", 4);
    let t = ids(&group);
    let matches = generate_group_fixtures(&[group]);
    for day in 1..=6 {
        for team in &t {
            let games = matches
                .iter()
                .filter(|m| m.matchday == day && m.involves(*team))
                .count();
            assert_eq!(games, 1, "team plays once on matchday {day}");
        }
    }
    for team in &t {
        assert_eq!(matches.iter().filter(|m| m.involves(*team)).count(), 6);
    }
}

#[test]
fn matchday_four_reverses_matchday_one() {
    let group = group_with_teams("A", 4);
    let t = ids(&group);
    let matches = generate_group_fixtures(&[group]);
    let day = |d: u32| -> Vec<(TeamId, TeamId)> {
        matches
            .iter()
            .filter(|m| m.matchday == d)
            .map(|m| (m.home_team, m.away_team))
            .collect()
    };
    assert_eq!(day(1), vec![(t[0], t[1]), (t[2], t[3])]);
    assert_eq!(day(4), vec![(t[1], t[0]), (t[3], t[2])]);
}

#[test]
fn each_pair_meets_home_and_away() {
    let group = group_with_teams("A", 4);
    let matches = generate_group_fixtures(&[group]);
    let mut fixtures: HashMap<(TeamId, TeamId), usize> = HashMap::new();
    for m in &matches {
        *fixtures.entry((m.home_team, m.away_team)).or_default() += 1;
    }
    assert_eq!(fixtures.len(), 12);
    for (home, away) in fixtures.keys() {
        assert!(fixtures.contains_key(&(*away, *home)));
    }
}

#[test]
fn ids_are_sequential_across_groups() {
    let groups = vec![group_with_teams("A", 4), group_with_teams("B", 4)];
    let matches = generate_group_fixtures(&groups);
    let ids: Vec<u32> = matches.iter().map(|m| m.id).collect();
    assert_eq!(ids, (1..=24).collect::<Vec<u32>>());
    assert!(matches[..12].iter().all(|m| m.group.as_deref() == Some("A")));
    assert!(matches[12..].iter().all(|m| m.group.as_deref() == Some("B")));
}

#[test]
fn groups_without_exactly_four_teams_are_skipped() {
    let groups = vec![
        group_with_teams("A", 3),
        group_with_teams("B", 4),
        group_with_teams("C", 0),
        group_with_teams("D", 5),
    ];
    let matches = generate_group_fixtures(&groups);
    assert_eq!(matches.len(), 12);
    assert!(matches.iter().all(|m| m.group.as_deref() == Some("B")));
    assert_eq!(matches[0].id, 1);
}
