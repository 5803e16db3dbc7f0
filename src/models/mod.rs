//! Data structures for the competition: teams, matches, groups, knockout ties, competition state.

mod competition;
mod game;
mod group;
mod knockout;
mod session;
mod team;

pub use competition::{AdminError, CompetitionStage, CompetitionState, DEFAULT_GROUP_COUNT};
pub use game::{GameMatch, MatchId, MatchOutcome, Stage};
pub use group::{group_label, Group, GroupStanding, GROUP_CAPACITY, MAX_GROUPS};
pub use knockout::KnockoutPairing;
pub use session::{session_ttl, AdminSession};
pub use team::{Team, TeamId};
