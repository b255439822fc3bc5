use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::standings::{scorers::ScoringKind, CompletedMatch};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Halftime,
    Completed,
    Postponed,
    Cancelled,
}

impl MatchStatus {
    /// Lifecycle: scheduled -> live <-> halftime -> completed, with
    /// postponement from scheduled or live and cancellation from anywhere.
    /// A postponed match can be rescheduled. Staying put is always allowed.
    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        use MatchStatus::*;

        if self == next {
            return true;
        }
        match (self, next) {
            (Cancelled, _) => false,
            (_, Cancelled) => true,
            (Scheduled, Live | Completed | Postponed) => true,
            (Live, Halftime | Completed | Postponed) => true,
            (Halftime, Live) => true,
            (Postponed, Scheduled) => true,
            _ => false,
        }
    }

    /// Events can only be logged once a match has kicked off
    pub fn accepts_events(self) -> bool {
        matches!(
            self,
            MatchStatus::Live | MatchStatus::Halftime | MatchStatus::Completed
        )
    }
}

/// Database model for matches table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchModel {
    pub id: i64,
    pub league_id: i64,
    pub group_id: Option<i64>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub venue: Option<String>,
    pub matchday: Option<i32>,
    pub status: MatchStatus,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub home_halftime_score: Option<i32>,
    pub away_halftime_score: Option<i32>,
    pub attendance: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchModel {
    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// The standings view of this match. Scores are passed through untouched
    /// so that a missing one is caught by the engine.
    pub fn to_completed(&self) -> CompletedMatch {
        CompletedMatch {
            id: self.id,
            home_team_id: self.home_team_id,
            away_team_id: self.away_team_id,
            home_goals: self.home_score,
            away_goals: self.away_score,
            scheduled_at: self.scheduled_at,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    Goal,
    PenaltyGoal,
    OwnGoal,
    YellowCard,
    RedCard,
    SubstitutionIn,
    SubstitutionOut,
}

impl EventType {
    pub fn scoring_kind(self) -> Option<ScoringKind> {
        match self {
            EventType::Goal => Some(ScoringKind::Goal),
            EventType::PenaltyGoal => Some(ScoringKind::PenaltyGoal),
            EventType::OwnGoal => Some(ScoringKind::OwnGoal),
            _ => None,
        }
    }

    /// Only goals scored for the player's side carry an assist
    pub fn allows_assist(self) -> bool {
        matches!(self, EventType::Goal | EventType::PenaltyGoal)
    }
}

/// Database model for match_events table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEventModel {
    pub id: i64,
    pub match_id: i64,
    pub player_id: i64,
    pub team_id: i64,
    pub event_type: EventType,
    pub minute: i32,
    pub additional_time: i32, // e.g. the 2 in 45+2
    pub assist_player_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use MatchStatus::*;

    #[rstest]
    #[case(Scheduled, Live, true)]
    #[case(Scheduled, Completed, true)]
    #[case(Scheduled, Postponed, true)]
    #[case(Scheduled, Halftime, false)]
    #[case(Live, Halftime, true)]
    #[case(Halftime, Live, true)]
    #[case(Halftime, Completed, false)]
    #[case(Live, Completed, true)]
    #[case(Live, Scheduled, false)]
    #[case(Completed, Live, false)]
    #[case(Completed, Completed, true)]
    #[case(Completed, Cancelled, true)]
    #[case(Postponed, Scheduled, true)]
    #[case(Postponed, Live, false)]
    #[case(Cancelled, Scheduled, false)]
    #[case(Cancelled, Cancelled, true)]
    fn status_transitions(#[case] from: MatchStatus, #[case] to: MatchStatus, #[case] ok: bool) {
        assert_eq!(from.can_transition_to(to), ok);
    }

    #[test]
    fn only_played_matches_accept_events() {
        assert!(Live.accepts_events());
        assert!(Completed.accepts_events());
        assert!(!Scheduled.accepts_events());
        assert!(!Cancelled.accepts_events());
    }

    #[test]
    fn event_type_text_matches_database_values() {
        assert_eq!(EventType::PenaltyGoal.to_string(), "penalty_goal");
        assert_eq!(EventType::SubstitutionOut.to_string(), "substitution_out");
        let parsed: EventType = serde_json::from_str(r#""yellow_card""#).unwrap();
        assert_eq!(parsed, EventType::YellowCard);
    }

    #[test]
    fn cards_are_not_scoring_events() {
        assert_eq!(EventType::RedCard.scoring_kind(), None);
        assert_eq!(EventType::OwnGoal.scoring_kind(), Some(ScoringKind::OwnGoal));
        assert!(!EventType::OwnGoal.allows_assist());
    }
}
