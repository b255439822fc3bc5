use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StandingsError {
    /// Null or negative score on a completed match, or a team playing itself
    #[error("Invalid match data: {0}")]
    InvalidMatchData(String),

    #[error("Match {match_id} references team {team_id} which is not registered to the group")]
    UnknownTeamReference { match_id: i64, team_id: i64 },
}
