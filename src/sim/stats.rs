//! Per-run statistics for the results charts
//!
//! Indexed like `Session::runs`. Every figure is accumulated over all of a
//! run's laps, echo laps included.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub coins_collected: u32,
    /// Seconds spent on the corridor (idle time between laps not counted)
    pub lifetime: f32,
    pub points_scored: u64,
    /// Runs this one eliminated
    pub kills: u32,
    pub jumps: u32,
    /// Highest age bonus reached
    pub max_age: u32,
    /// Longest coin combo
    pub max_combo: u32,
}

/// Statistics for every run of a session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub runs: Vec<RunStats>,
}

impl SessionStats {
    fn entry(&mut self, run: usize) -> &mut RunStats {
        if run >= self.runs.len() {
            self.runs.resize(run + 1, RunStats::default());
        }
        &mut self.runs[run]
    }

    pub fn record_pickup(&mut self, run: usize, gain: u64, combo: u32) {
        let stats = self.entry(run);
        stats.coins_collected += 1;
        stats.points_scored = stats.points_scored.saturating_add(gain);
        stats.max_combo = stats.max_combo.max(combo);
    }

    /// One tick on the corridor at the given age
    pub fn record_time(&mut self, run: usize, dt: f32, age_bonus: u32) {
        let stats = self.entry(run);
        stats.lifetime += dt;
        stats.max_age = stats.max_age.max(age_bonus);
    }

    pub fn record_jump(&mut self, run: usize) {
        self.entry(run).jumps += 1;
    }

    pub fn record_kill(&mut self, run: usize) {
        self.entry(run).kills += 1;
    }

    pub fn total_points(&self) -> u64 {
        self.runs.iter().map(|r| r.points_scored).sum()
    }

    /// Run that scored the most points (lowest index on ties)
    pub fn best_run(&self) -> Option<usize> {
        self.runs
            .iter()
            .enumerate()
            .filter(|(_, r)| r.points_scored > 0)
            .max_by(|(ia, a), (ib, b)| a.points_scored.cmp(&b.points_scored).then(ib.cmp(ia)))
            .map(|(i, _)| i)
    }

    /// Largest value of every column, floored so charts never divide by zero
    pub fn column_maxima(&self) -> RunStats {
        self.runs.iter().fold(
            RunStats {
                coins_collected: 1,
                lifetime: 1.0,
                points_scored: 1,
                kills: 1,
                jumps: 1,
                max_age: 1,
                max_combo: 1,
            },
            |acc, r| RunStats {
                coins_collected: acc.coins_collected.max(r.coins_collected),
                lifetime: acc.lifetime.max(r.lifetime),
                points_scored: acc.points_scored.max(r.points_scored),
                kills: acc.kills.max(r.kills),
                jumps: acc.jumps.max(r.jumps),
                max_age: acc.max_age.max(r.max_age),
                max_combo: acc.max_combo.max(r.max_combo),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_grow_on_demand() {
        let mut stats = SessionStats::default();
        stats.record_kill(3);
        assert_eq!(stats.runs.len(), 4);
        assert_eq!(stats.runs[3].kills, 1);
        assert_eq!(stats.runs[0], RunStats::default());
    }

    #[test]
    fn test_pickups_accumulate() {
        let mut stats = SessionStats::default();
        stats.record_pickup(0, 10, 1);
        stats.record_pickup(0, 20, 2);
        stats.record_pickup(0, 10, 1);
        stats.record_pickup(1, 40, 1);
        assert_eq!(stats.runs[0].coins_collected, 3);
        assert_eq!(stats.runs[0].points_scored, 40);
        assert_eq!(stats.runs[0].max_combo, 2);
        assert_eq!(stats.total_points(), 80);
        assert_eq!(stats.best_run(), Some(0));
    }

    #[test]
    fn test_time_tracks_max_age() {
        let mut stats = SessionStats::default();
        stats.record_time(0, 0.5, 0);
        stats.record_time(0, 0.5, 2);
        stats.record_time(0, 0.5, 1);
        assert_eq!(stats.runs[0].lifetime, 1.5);
        assert_eq!(stats.runs[0].max_age, 2);
    }

    #[test]
    fn test_empty_stats() {
        let stats = SessionStats::default();
        assert_eq!(stats.best_run(), None);
        let max = stats.column_maxima();
        assert_eq!(max.points_scored, 1);
        assert_eq!(max.lifetime, 1.0);
    }

    #[test]
    fn test_column_maxima() {
        let mut stats = SessionStats::default();
        stats.record_pickup(0, 10, 1);
        stats.record_pickup(1, 70, 3);
        stats.record_jump(1);
        stats.record_jump(1);
        stats.record_time(0, 4.0, 0);
        let max = stats.column_maxima();
        assert_eq!(max.points_scored, 70);
        assert_eq!(max.jumps, 2);
        assert_eq!(max.max_combo, 3);
        assert_eq!(max.lifetime, 4.0);
        assert_eq!(max.kills, 1);
    }
}
