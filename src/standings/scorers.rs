use std::collections::HashMap;

use tracing::instrument;

use super::{ScorerRow, StandingsError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerPlayer {
    pub id: i64,
    pub team_id: i64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringKind {
    Goal,
    PenaltyGoal,
    /// Counts against the player's side; credits nobody
    OwnGoal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringEvent {
    pub match_id: i64,
    pub player_id: i64,
    pub assist_player_id: Option<i64>,
    pub kind: ScoringKind,
}

#[derive(Debug, Default)]
struct Tally {
    goals: u32,
    penalties: u32,
    assists: u32,
}

/// Goal and assist leaders for a set of scoring events.
///
/// Rows are ordered by goals, then assists (both descending), then surname,
/// first name and player id. Players with neither goals nor assists are left
/// out.
#[instrument(skip_all, fields(players = players.len(), events = events.len()))]
pub fn compute_top_scorers(
    players: &[ScorerPlayer],
    events: &[ScoringEvent],
) -> Result<Vec<ScorerRow>, StandingsError> {
    let by_id: HashMap<i64, &ScorerPlayer> = players.iter().map(|p| (p.id, p)).collect();
    let mut tallies: HashMap<i64, Tally> = HashMap::new();

    for event in events {
        if !by_id.contains_key(&event.player_id) {
            return Err(StandingsError::InvalidMatchData(format!(
                "match {} has a scoring event for unknown player {}",
                event.match_id, event.player_id
            )));
        }

        match event.kind {
            ScoringKind::Goal => tallies.entry(event.player_id).or_default().goals += 1,
            ScoringKind::PenaltyGoal => {
                let tally = tallies.entry(event.player_id).or_default();
                tally.goals += 1;
                tally.penalties += 1;
            }
            ScoringKind::OwnGoal => continue,
        }

        if let Some(assist_id) = event.assist_player_id {
            if by_id.contains_key(&assist_id) {
                tallies.entry(assist_id).or_default().assists += 1;
            }
        }
    }

    let mut rows: Vec<(&ScorerPlayer, Tally)> = tallies
        .into_iter()
        .filter(|(_, tally)| tally.goals > 0 || tally.assists > 0)
        .filter_map(|(id, tally)| by_id.get(&id).map(|player| (*player, tally)))
        .collect();

    rows.sort_by(|(pa, ta), (pb, tb)| {
        tb.goals
            .cmp(&ta.goals)
            .then_with(|| tb.assists.cmp(&ta.assists))
            .then_with(|| pa.last_name.cmp(&pb.last_name))
            .then_with(|| pa.first_name.cmp(&pb.first_name))
            .then_with(|| pa.id.cmp(&pb.id))
    });

    Ok(rows
        .into_iter()
        .map(|(player, tally)| ScorerRow {
            player_id: player.id,
            team_id: player.team_id,
            player_name: format!("{} {}", player.first_name, player.last_name),
            goals: tally.goals,
            penalties: tally.penalties,
            assists: tally.assists,
        })
        .collect())
}
