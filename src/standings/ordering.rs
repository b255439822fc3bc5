use std::cmp::Ordering;

use super::StandingsRow;

/// Table order: points, goal difference and goals scored (all descending),
/// then team name ascending. Team id settles rows whose names are identical
/// so the order is total.
pub fn compare_rows(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.team_name.cmp(&b.team_name))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

/// Sorts the table and numbers it 1..=n. Level rows still receive distinct
/// consecutive positions; there are no joint ranks.
pub fn rank(rows: &mut [StandingsRow]) {
    rows.sort_by(compare_rows);
    for (index, row) in rows.iter_mut().enumerate() {
        row.position = index as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(team_id: i64, name: &str, points: u32, goal_difference: i32, goals_for: u32) -> StandingsRow {
        StandingsRow {
            position: 0,
            team_id,
            team_name: name.to_string(),
            short_name: None,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for,
            goals_against: 0,
            goal_difference,
            points,
            form: vec![],
        }
    }

    fn names(rows: &[StandingsRow]) -> Vec<&str> {
        rows.iter().map(|r| r.team_name.as_str()).collect()
    }

    #[test]
    fn points_rank_first() {
        let mut rows = vec![row(1, "Low", 3, 10, 10), row(2, "High", 6, -2, 1)];
        rank(&mut rows);
        assert_eq!(names(&rows), vec!["High", "Low"]);
    }

    #[test]
    fn goal_difference_breaks_level_points() {
        let mut rows = vec![row(1, "Alpha", 4, 1, 5), row(2, "Bravo", 4, 3, 4)];
        rank(&mut rows);
        assert_eq!(names(&rows), vec!["Bravo", "Alpha"]);
    }

    #[test]
    fn goals_for_breaks_level_goal_difference() {
        let mut rows = vec![row(1, "Alpha", 4, 2, 3), row(2, "Bravo", 4, 2, 6)];
        rank(&mut rows);
        assert_eq!(names(&rows), vec!["Bravo", "Alpha"]);
    }

    #[test]
    fn name_breaks_full_tie() {
        let mut rows = vec![row(1, "Zulu", 1, 0, 0), row(2, "Echo", 1, 0, 0)];
        rank(&mut rows);
        assert_eq!(names(&rows), vec!["Echo", "Zulu"]);
    }

    #[test]
    fn identical_names_order_by_team_id() {
        let mut rows = vec![row(7, "United", 0, 0, 0), row(3, "United", 0, 0, 0)];
        rank(&mut rows);
        assert_eq!(rows[0].team_id, 3);
        assert_eq!(rows[1].team_id, 7);
    }

    #[test]
    fn positions_are_dense_even_when_level() {
        let mut rows = vec![
            row(1, "Alpha", 0, 0, 0),
            row(2, "Bravo", 0, 0, 0),
            row(3, "Charlie", 0, 0, 0),
        ];
        rank(&mut rows);
        let positions: Vec<u32> = rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }
}
