//! Competition state manager: command type, pure transition function, and the
//! owning manager that persists after every command.

use crate::logic::qualification::is_group_stage_complete;
use crate::logic::standings::calculate_group_standings;
use crate::models::{
    CompetitionStage, CompetitionState, GameMatch, Group, KnockoutPairing, Team,
};
use crate::storage::{CompetitionStore, StorageError};
use log::{debug, info, warn};

/// The only ways the competition state can change.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replace the whole state (startup restore).
    Load(CompetitionState),
    SetTeams(Vec<Team>),
    SetMatches(Vec<GameMatch>),
    /// Replace groups, then recalculate standings and stage.
    SetGroups(Vec<Group>),
    SetKnockoutPairings(Vec<KnockoutPairing>),
    SetStage(CompetitionStage),
    /// Recompute every group table from the current matches.
    RecalculateStandings,
    /// Back to six empty groups.
    Reset,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Load(_) => "load",
            Command::SetTeams(_) => "set_teams",
            Command::SetMatches(_) => "set_matches",
            Command::SetGroups(_) => "set_groups",
            Command::SetKnockoutPairings(_) => "set_knockout_pairings",
            Command::SetStage(_) => "set_stage",
            Command::RecalculateStandings => "recalculate_standings",
            Command::Reset => "reset",
        }
    }
}

/// Apply one command to a state and return the new state.
///
/// Sub-collections are replaced verbatim; validation is the caller's job.
pub fn apply(state: CompetitionState, command: Command) -> CompetitionState {
    match command {
        Command::Load(loaded) => loaded,
        Command::SetTeams(teams) => CompetitionState { teams, ..state },
        Command::SetMatches(matches) => CompetitionState { matches, ..state },
        Command::SetGroups(groups) => recalculate(CompetitionState { groups, ..state }),
        Command::SetKnockoutPairings(knockout_pairings) => CompetitionState {
            knockout_pairings,
            ..state
        },
        Command::SetStage(current_stage) => CompetitionState {
            current_stage,
            ..state
        },
        Command::RecalculateStandings => recalculate(state),
        Command::Reset => CompetitionState::default(),
    }
}

/// Rebuild every group's standings, re-derive completion, and move from the
/// group stage to the Round of 16 once all group matches are played. No other
/// stage transition happens here.
fn recalculate(mut state: CompetitionState) -> CompetitionState {
    for group in &mut state.groups {
        group.standings = calculate_group_standings(group, &state.matches);
    }
    state.group_stage_completed = is_group_stage_complete(&state.groups, &state.matches);
    if state.group_stage_completed && state.current_stage == CompetitionStage::Group {
        info!("Group stage complete, advancing to round of 16");
        state.current_stage = CompetitionStage::Round16;
    }
    state
}

/// Owns the authoritative competition state. Every command is applied through
/// [`apply`] and the result is written to the store.
pub struct CompetitionManager {
    state: CompetitionState,
    store: Box<dyn CompetitionStore>,
}

impl CompetitionManager {
    /// Start from the default state, replaced by whatever the store holds.
    /// A store that fails to load is logged and ignored.
    pub fn new(store: Box<dyn CompetitionStore>) -> Self {
        let mut state = CompetitionState::default();
        match store.load() {
            Ok(Some(saved)) => {
                info!(
                    "Restored competition: {} teams, {} matches",
                    saved.teams.len(),
                    saved.matches.len()
                );
                state = apply(state, Command::Load(saved));
            }
            Ok(None) => debug!("No saved competition, starting fresh"),
            Err(e) => warn!("Could not load saved competition, starting fresh: {}", e),
        }
        Self { state, store }
    }

    pub fn state(&self) -> &CompetitionState {
        &self.state
    }

    /// Apply `command` and persist the result. A save failure is logged and
    /// returned; the new state is kept in memory either way.
    pub fn dispatch(&mut self, command: Command) -> Result<(), StorageError> {
        debug!("Dispatching {}", command.name());
        let current = std::mem::take(&mut self.state);
        self.state = apply(current, command);
        self.store.save(&self.state).map_err(|e| {
            warn!("Failed to save competition: {}", e);
            e
        })
    }

    /// Dispatch commands in order. Every command is applied even if an earlier
    /// save failed; the first save error is returned.
    pub fn dispatch_all(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<(), StorageError> {
        let mut first_error = None;
        for command in commands {
            if let Err(e) = self.dispatch(command) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for CompetitionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompetitionManager")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
