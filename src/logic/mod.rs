//! Competition business logic: fixtures, standings, qualification, state management, admin actions.

mod admin;
mod fixtures;
mod qualification;
mod standings;
mod state;
pub mod views;

pub use admin::{
    add_team, configure_group_count, generate_fixtures, import_teams_csv, recalculate_standings,
    remove_team, reset_competition, seed_round_of_16, set_stage, submit_score, ScoreTarget,
};
pub use fixtures::generate_group_fixtures;
pub use qualification::{
    generate_knockout_pairings, get_qualified_teams, is_group_stage_complete, QualifiedTeams,
};
pub use standings::calculate_group_standings;
pub use state::{apply, Command, CompetitionManager};
