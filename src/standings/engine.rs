use std::collections::HashMap;

use tracing::{debug, instrument};

use super::{
    form::FormHistory, ordering, scoring, CompletedMatch, FormResult, StandingsError,
    StandingsRow, StandingsTeam, TableSummary, FORM_WINDOW,
};

#[derive(Debug, Default)]
struct TeamAccumulator {
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    goals_for: u32,
    goals_against: u32,
    history: FormHistory,
}

impl TeamAccumulator {
    fn apply(
        &mut self,
        match_record: &CompletedMatch,
        scored: u32,
        conceded: u32,
    ) -> Result<(), StandingsError> {
        let goals_for = self.goals_for.checked_add(scored);
        let goals_against = self.goals_against.checked_add(conceded);
        let (Some(goals_for), Some(goals_against)) = (goals_for, goals_against) else {
            return Err(goal_overflow(match_record.id));
        };

        let result = FormResult::from_score(scored, conceded);
        self.played += 1;
        match result {
            FormResult::Win => self.won += 1,
            FormResult::Draw => self.drawn += 1,
            FormResult::Loss => self.lost += 1,
        }
        self.goals_for = goals_for;
        self.goals_against = goals_against;
        self.history
            .record(match_record.scheduled_at, match_record.id, result);
        Ok(())
    }

    fn into_row(self, team: &StandingsTeam) -> Result<StandingsRow, StandingsError> {
        let difference = i64::from(self.goals_for) - i64::from(self.goals_against);
        let goal_difference = i32::try_from(difference).map_err(|_| {
            StandingsError::InvalidMatchData(format!(
                "goal difference {difference} of team {} is out of range",
                team.id
            ))
        })?;

        Ok(StandingsRow {
            position: 0,
            team_id: team.id,
            team_name: team.name.clone(),
            short_name: team.short_name.clone(),
            played: self.played,
            won: self.won,
            drawn: self.drawn,
            lost: self.lost,
            goals_for: self.goals_for,
            goals_against: self.goals_against,
            goal_difference,
            points: scoring::points(self.won, self.drawn),
            form: self.history.recent(FORM_WINDOW),
        })
    }
}

/// Builds the ordered table for one group.
///
/// Every team in `teams` gets a row, played or not. Any malformed match fails
/// the whole computation; no partial table is returned.
#[instrument(skip_all, fields(teams = teams.len(), matches = matches.len()))]
pub fn compute_table(
    teams: &[StandingsTeam],
    matches: &[CompletedMatch],
) -> Result<Vec<StandingsRow>, StandingsError> {
    let mut accumulators: HashMap<i64, TeamAccumulator> = HashMap::with_capacity(teams.len());
    for team in teams {
        accumulators.entry(team.id).or_default();
    }

    for match_record in matches {
        let (home_goals, away_goals) = validate(match_record, &accumulators)?;

        if let Some(home) = accumulators.get_mut(&match_record.home_team_id) {
            home.apply(match_record, home_goals, away_goals)?;
        }
        if let Some(away) = accumulators.get_mut(&match_record.away_team_id) {
            away.apply(match_record, away_goals, home_goals)?;
        }
    }

    // Walk `teams` rather than the map so duplicate ids collapse to one row.
    let mut rows = Vec::with_capacity(accumulators.len());
    for team in teams {
        if let Some(accumulator) = accumulators.remove(&team.id) {
            rows.push(accumulator.into_row(team)?);
        }
    }

    ordering::rank(&mut rows);

    debug!(rows = rows.len(), "Standings table computed");
    Ok(rows)
}

/// Aggregate figures for a computed table
pub fn summarize(rows: &[StandingsRow]) -> TableSummary {
    let played: u32 = rows.iter().map(|r| r.played).sum();
    let drawn: u32 = rows.iter().map(|r| r.drawn).sum();

    TableSummary {
        teams: rows.len() as u32,
        matches_played: played / 2,
        total_goals: rows
            .iter()
            .fold(0u32, |total, r| total.saturating_add(r.goals_for)),
        draws: drawn / 2,
    }
}

fn validate(
    match_record: &CompletedMatch,
    accumulators: &HashMap<i64, TeamAccumulator>,
) -> Result<(u32, u32), StandingsError> {
    if match_record.home_team_id == match_record.away_team_id {
        return Err(StandingsError::InvalidMatchData(format!(
            "match {} has team {} playing itself",
            match_record.id, match_record.home_team_id
        )));
    }

    for team_id in [match_record.home_team_id, match_record.away_team_id] {
        if !accumulators.contains_key(&team_id) {
            return Err(StandingsError::UnknownTeamReference {
                match_id: match_record.id,
                team_id,
            });
        }
    }

    let home = goals(match_record.id, "home", match_record.home_goals)?;
    let away = goals(match_record.id, "away", match_record.away_goals)?;
    Ok((home, away))
}

fn goal_overflow(match_id: i64) -> StandingsError {
    StandingsError::InvalidMatchData(format!("match {match_id} overflows a team's goal tally"))
}

fn goals(match_id: i64, side: &str, value: Option<i32>) -> Result<u32, StandingsError> {
    match value {
        Some(goals) if goals >= 0 => Ok(goals as u32),
        Some(goals) => Err(StandingsError::InvalidMatchData(format!(
            "match {match_id} has negative {side} score {goals}"
        ))),
        None => Err(StandingsError::InvalidMatchData(format!(
            "match {match_id} is completed but has no {side} score"
        ))),
    }
}
