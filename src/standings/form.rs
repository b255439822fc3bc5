use chrono::{DateTime, Utc};

use super::FormResult;

/// Per-team record of match outcomes, ordered lazily by kick-off time
#[derive(Debug, Clone, Default)]
pub struct FormHistory {
    entries: Vec<(DateTime<Utc>, i64, FormResult)>,
}

impl FormHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, scheduled_at: DateTime<Utc>, match_id: i64, result: FormResult) {
        self.entries.push((scheduled_at, match_id, result));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `window` outcomes in chronological order, most recent last.
    /// Matches sharing a kick-off time are ordered by match id.
    pub fn recent(&self, window: usize) -> Vec<FormResult> {
        let mut ordered = self.entries.clone();
        ordered.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let skip = ordered.len().saturating_sub(window);
        ordered
            .into_iter()
            .skip(skip)
            .map(|(_, _, result)| result)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, d, 15, 0, 0).unwrap()
    }

    #[test]
    fn empty_history_has_no_form() {
        let history = FormHistory::new();
        assert!(history.is_empty());
        assert!(history.recent(5).is_empty());
    }

    #[test]
    fn orders_by_kickoff_regardless_of_recording_order() {
        let mut history = FormHistory::new();
        history.record(day(10), 3, FormResult::Loss);
        history.record(day(1), 1, FormResult::Win);
        history.record(day(5), 2, FormResult::Draw);

        assert_eq!(
            history.recent(5),
            vec![FormResult::Win, FormResult::Draw, FormResult::Loss]
        );
    }

    #[test]
    fn keeps_only_the_most_recent_window() {
        let mut history = FormHistory::new();
        let results = [
            FormResult::Loss,
            FormResult::Loss,
            FormResult::Win,
            FormResult::Draw,
            FormResult::Win,
            FormResult::Win,
            FormResult::Draw,
        ];
        for (i, result) in results.iter().enumerate() {
            history.record(day(i as u32 + 1), i as i64, *result);
        }

        assert_eq!(history.len(), 7);
        assert_eq!(
            history.recent(5),
            vec![
                FormResult::Win,
                FormResult::Draw,
                FormResult::Win,
                FormResult::Win,
                FormResult::Draw
            ]
        );
    }

    #[test]
    fn same_kickoff_falls_back_to_match_id() {
        let mut history = FormHistory::new();
        history.record(day(1), 9, FormResult::Loss);
        history.record(day(1), 4, FormResult::Win);

        assert_eq!(history.recent(5), vec![FormResult::Win, FormResult::Loss]);
    }
}
