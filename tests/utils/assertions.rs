//! Test assertion helpers - fluent API for verifying standings tables
#![allow(dead_code)] // Test utilities may not all be used in every test

use league_dashboard::{standings::ordering::compare_rows, StandingsRow, StandingsTable};

// ============================================================================
// Invariants every table must satisfy
// ============================================================================

pub fn assert_table_invariants(rows: &[StandingsRow]) {
    let won: u32 = rows.iter().map(|r| r.won).sum();
    let lost: u32 = rows.iter().map(|r| r.lost).sum();
    let drawn: u32 = rows.iter().map(|r| r.drawn).sum();
    assert_eq!(won, lost, "every win needs a matching loss");
    assert_eq!(drawn % 2, 0, "draws come in pairs");

    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row.position as usize, index + 1, "{} has a gap in positions", row.team_name);
        assert_eq!(row.played, row.won + row.drawn + row.lost, "{}", row.team_name);
        assert_eq!(row.points, 3 * row.won + row.drawn, "{}", row.team_name);
        assert_eq!(
            row.goal_difference,
            row.goals_for as i32 - row.goals_against as i32,
            "{}",
            row.team_name
        );
        assert!(row.form.len() <= 5, "{} form too long", row.team_name);
        assert!(row.form.len() as u32 <= row.played, "{}", row.team_name);
    }

    for pair in rows.windows(2) {
        assert!(
            compare_rows(&pair[0], &pair[1]).is_lt(),
            "{} should rank above {}",
            pair[0].team_name,
            pair[1].team_name
        );
    }
}

// ============================================================================
// Fluent assertions
// ============================================================================

pub struct TableAssertion<'a> {
    table: &'a StandingsTable,
}

impl<'a> TableAssertion<'a> {
    pub fn new(table: &'a StandingsTable) -> Self {
        assert_table_invariants(&table.rows);
        Self { table }
    }

    pub fn has_order(self, names: &[&str]) -> Self {
        let actual: Vec<&str> = self.table.rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(actual, names, "unexpected table order");
        self
    }

    pub fn row(&self, name: &str) -> &'a StandingsRow {
        self.table
            .rows
            .iter()
            .find(|r| r.team_name == name)
            .unwrap_or_else(|| panic!("{name} missing from table"))
    }

    pub fn has_points(self, name: &str, points: u32) -> Self {
        assert_eq!(self.row(name).points, points, "points of {name}");
        self
    }

    pub fn has_record(self, name: &str, won: u32, drawn: u32, lost: u32) -> Self {
        let row = self.row(name);
        assert_eq!((row.won, row.drawn, row.lost), (won, drawn, lost), "record of {name}");
        self
    }

    pub fn has_goals(self, name: &str, scored: u32, conceded: u32) -> Self {
        let row = self.row(name);
        assert_eq!((row.goals_for, row.goals_against), (scored, conceded), "goals of {name}");
        self
    }

    /// Form as a compact string, most recent result last
    pub fn has_form(self, name: &str, form: &str) -> Self {
        assert_eq!(self.row(name).form_string(), form, "form of {name}");
        self
    }
}
