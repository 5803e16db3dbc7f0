//! Knockout tie between two qualified teams.

use crate::models::game::{GameMatch, Stage};
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// A knockout tie. Only Round-of-16 ties are generated; legs, winner and
/// aggregate stay empty until later rounds are played.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnockoutPairing {
    /// e.g. "R16-1".
    pub id: String,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub stage: Stage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_leg: Option<GameMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_leg: Option<GameMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<TeamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_home: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_away: Option<u32>,
}

impl KnockoutPairing {
    pub fn new(id: impl Into<String>, home_team: TeamId, away_team: TeamId, stage: Stage) -> Self {
        Self {
            id: id.into(),
            home_team,
            away_team,
            stage,
            first_leg: None,
            second_leg: None,
            winner: None,
            aggregate_home: None,
            aggregate_away: None,
        }
    }
}
