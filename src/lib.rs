//! Champions League style tournament manager: library with models, business logic and storage.

pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    add_team, apply, calculate_group_standings, configure_group_count, generate_fixtures,
    generate_group_fixtures, generate_knockout_pairings, get_qualified_teams, import_teams_csv,
    is_group_stage_complete, recalculate_standings, remove_team, reset_competition,
    seed_round_of_16, set_stage, submit_score, Command, CompetitionManager, QualifiedTeams,
    ScoreTarget,
};
pub use models::{
    AdminError, AdminSession, CompetitionStage, CompetitionState, GameMatch, Group, GroupStanding,
    KnockoutPairing, MatchId, MatchOutcome, Stage, Team, TeamId,
};
pub use storage::{CompetitionStore, JsonFileStore, MemoryStore, StorageError};
