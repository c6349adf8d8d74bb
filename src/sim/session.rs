//! One play-through: the ordered runs, the course and the running totals
//!
//! The session owns every run by value, indexed by spawn order. At most one
//! run is live at a time; the rest are echoes replaying their own past.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{collect_coins, eliminators, find_eliminations};
use super::course::{CoinId, Course};
use super::run::Run;
use super::stats::SessionStats;
use crate::settings::{EliminationPolicy, GameConfig};

/// Mixed into the session seed for the echo restart stream
const DELAY_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// What the renderer/audio side gets told about (drained once per frame)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    RunSpawned { run: usize, direction: i8 },
    JumpFired { run: usize },
    CoinCollected { run: usize, coin: CoinId, gain: u64, live: bool },
    RunEliminated { run: usize },
    LapCompleted { run: usize, laps: u32 },
    SessionComplete { score: u64, currency: u32 },
}

/// What happened after the live run's life ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeOutcome {
    /// A new live run was spawned at this index
    Spawned(usize),
    /// Quota reached
    Complete,
}

/// Final totals of a session, handed to the score store
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub currency: u32,
    pub runs: u32,
    pub stats: SessionStats,
}

/// A single play-through
#[derive(Debug, Clone)]
pub struct Session {
    pub course: Course,
    /// Every run spawned so far, in spawn order (`runs[i].index == i`)
    pub runs: Vec<Run>,
    pub score: u64,
    /// Coins banked by live runs
    pub currency: u32,
    pub quota: u32,
    /// Player presses are ignored while false (tutorial drives the jumps)
    pub input_enabled: bool,
    pub policy: EliminationPolicy,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub stats: SessionStats,
    config: GameConfig,
    rng: Pcg32,
    events: Vec<SimEvent>,
    spawned: u32,
    complete: bool,
    ended: bool,
}

impl Session {
    /// Fresh session with the first run (index 0, heading right) on the start line
    pub fn start(config: &GameConfig, seed: u64) -> Self {
        assert!(config.runs_per_session > 0, "a session needs at least one run");
        let mut session = Self {
            course: Course::generate(seed, config.coins_per_course),
            runs: Vec::with_capacity(config.runs_per_session as usize),
            score: 0,
            currency: 0,
            quota: config.runs_per_session,
            input_enabled: true,
            policy: config.elimination_policy,
            time_ticks: 0,
            stats: SessionStats::default(),
            config: config.clone(),
            rng: Pcg32::seed_from_u64(seed ^ DELAY_STREAM),
            events: Vec::new(),
            spawned: 0,
            complete: false,
            ended: false,
        };
        log::info!(
            "Session started: seed {seed}, {} runs, policy {}",
            session.quota,
            session.policy.as_str()
        );
        session.spawn_run();
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Quota reached, nothing left to play
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Runs spawned so far
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn live_index(&self) -> Option<usize> {
        self.runs.iter().position(|r| r.live)
    }

    pub fn live_run(&self) -> Option<&Run> {
        self.runs.iter().find(|r| r.live)
    }

    pub fn live_run_mut(&mut self) -> Option<&mut Run> {
        self.runs.iter_mut().find(|r| r.live)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            currency: self.currency,
            runs: self.spawned,
            stats: self.stats.clone(),
        }
    }

    pub(crate) fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Hand over everything that happened since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    fn spawn_run(&mut self) -> usize {
        debug_assert!(self.live_index().is_none());
        let index = self.runs.len();
        let direction = if index % 2 == 0 { 1 } else { -1 };
        let speed = self.config.speed_for_run(index as u32);
        self.runs.push(Run::new(index, direction, speed, &self.course));
        self.spawned += 1;
        self.push_event(SimEvent::RunSpawned { run: index, direction });
        log::info!("Run {index} spawned (dir {direction:+}, speed {speed:.2})");
        index
    }

    /// Idle before an echo's next lap, seeded
    fn roll_restart_delay(&mut self) -> f32 {
        let max = self.config.echo_restart_delay;
        if max <= 0.0 {
            0.0
        } else {
            self.rng.random_range(0.0..=max)
        }
    }

    /// The live run crossed the end line: it becomes an echo and the next
    /// run is spawned, or the session completes once the quota is used up.
    pub fn on_run_finished(&mut self, index: usize) -> LifeOutcome {
        assert!(self.runs[index].live, "run {index} finished but is not live");
        self.complete_lap(index);
        self.next_life()
    }

    fn complete_lap(&mut self, index: usize) {
        let delay = self.roll_restart_delay();
        let run = &mut self.runs[index];
        run.complete_lap(delay);
        let laps = run.laps;
        self.push_event(SimEvent::LapCompleted { run: index, laps });
        log::debug!("Run {index} lap {laps} done, restarting in {delay:.2}s");
    }

    fn next_life(&mut self) -> LifeOutcome {
        if self.spawned < self.quota {
            LifeOutcome::Spawned(self.spawn_run())
        } else {
            self.complete = true;
            self.push_event(SimEvent::SessionComplete {
                score: self.score,
                currency: self.currency,
            });
            log::info!(
                "Session complete: score {}, currency {}",
                self.score,
                self.currency
            );
            LifeOutcome::Complete
        }
    }

    /// Remove eliminated runs for this tick
    pub(crate) fn resolve_eliminations(&mut self) {
        let victims = find_eliminations(&self.runs, self.policy, self.config.elimination_grace);
        if victims.is_empty() {
            return;
        }

        let mut live_lost = false;
        let ages: Vec<u32> = victims.iter().map(|&v| self.runs[v].age_bonus).collect();
        let credits: Vec<usize> = victims
            .iter()
            .flat_map(|&v| eliminators(&self.runs, v, self.policy))
            .collect();
        for killer in credits {
            self.stats.record_kill(killer);
        }
        for &victim in &victims {
            live_lost |= self.runs[victim].live;
            self.runs[victim].retire();
            self.push_event(SimEvent::RunEliminated { run: victim });
            log::info!("Run {victim} eliminated");
        }

        // Older survivors move down one level per eliminated younger run
        for age in ages {
            for run in self.runs.iter_mut().filter(|r| !r.retired && r.age_bonus > age) {
                run.age_bonus -= 1;
            }
        }

        if live_lost && !self.complete {
            self.next_life();
        }
    }

    /// Credit coin pickups for every run
    pub(crate) fn resolve_pickups(&mut self) {
        let base = self.config.coin_base_value;
        for i in 0..self.runs.len() {
            let pickups = collect_coins(&mut self.runs[i], &self.course, base);
            for p in pickups {
                self.score += p.gain;
                self.stats.record_pickup(p.run, p.gain, p.combo);
                if p.live {
                    self.currency += 1;
                }
                log::debug!("Run {} took coin {} for {}", p.run, p.coin.0, p.gain);
                self.push_event(SimEvent::CoinCollected {
                    run: p.run,
                    coin: p.coin,
                    gain: p.gain,
                    live: p.live,
                });
            }
        }
    }

    /// Time on the corridor for every moving run
    pub(crate) fn record_time(&mut self, dt: f32) {
        for run in self.runs.iter().filter(|r| r.is_on_course()) {
            self.stats.record_time(run.index, dt, run.age_bonus);
        }
    }

    /// Laps for echoes, next life for the live run
    pub(crate) fn resolve_finishes(&mut self) {
        for i in 0..self.runs.len() {
            if !self.runs[i].finished || self.runs[i].retired {
                continue;
            }
            if self.runs[i].live {
                if self.on_run_finished(i) == LifeOutcome::Complete {
                    return;
                }
            } else {
                self.complete_lap(i);
            }
        }
    }

    /// Tear the session down: no runs, no coins. Safe to call repeatedly.
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.runs.clear();
        self.course.clear();
        log::info!(
            "Session ended after {} runs: score {}, currency {}",
            self.spawned,
            self.score,
            self.currency
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn config() -> GameConfig {
        GameConfig {
            coins_per_course: 0,
            ..Default::default()
        }
    }

    /// Two runs facing each other at the center, both past the grace period
    fn head_on(policy: EliminationPolicy) -> Session {
        let mut session = Session::start(
            &GameConfig {
                elimination_policy: policy,
                echo_restart_delay: 0.0,
                ..config()
            },
            3,
        );
        session.on_run_finished(0);
        for run in &mut session.runs {
            run.pos.x = 0.0;
            run.elapsed = 1.0;
        }
        session
    }

    #[test]
    fn test_start_session() {
        let session = Session::start(&GameConfig::default(), 42);
        assert_eq!(session.runs.len(), 1);
        assert_eq!(session.runs[0].direction, 1);
        assert!(session.runs[0].live);
        assert_eq!(session.course.coins.len(), COINS_PER_COURSE);
        assert_eq!(session.score, 0);
        assert_eq!(session.currency, 0);
        assert_eq!(session.quota, 10);
    }

    #[test]
    fn test_finish_spawns_alternating_runs() {
        let mut session = Session::start(&config(), 1);
        assert_eq!(session.on_run_finished(0), LifeOutcome::Spawned(1));
        assert_eq!(session.on_run_finished(1), LifeOutcome::Spawned(2));
        let dirs: Vec<i8> = session.runs.iter().map(|r| r.direction).collect();
        assert_eq!(dirs, vec![1, -1, 1]);
        assert_eq!(session.live_index(), Some(2));
        assert!(session.runs[0].is_echo() && session.runs[1].is_echo());
        assert_eq!(session.runs[0].age_bonus, 1);
    }

    #[test]
    fn test_quota_is_exactly_ten_runs() {
        let mut session = Session::start(&config(), 1);
        let mut outcome = LifeOutcome::Spawned(0);
        while let LifeOutcome::Spawned(i) = outcome {
            outcome = session.on_run_finished(i);
        }
        assert_eq!(session.runs.len(), 10);
        assert_eq!(session.spawned(), 10);
        assert!(session.is_complete());
        assert!(session.live_index().is_none());
        let spawned = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::RunSpawned { .. }))
            .count();
        assert_eq!(spawned, 10);
    }

    #[test]
    fn test_speed_ramp() {
        let mut session = Session::start(
            &GameConfig {
                speed_coeff: 0.5,
                ..config()
            },
            1,
        );
        session.on_run_finished(0);
        let base = session.config().speed_const;
        assert_eq!(session.runs[0].speed, base);
        assert_eq!(session.runs[1].speed, -(base + 0.5));
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut session = Session::start(&GameConfig::default(), 5);
        session.score = 120;
        session.end();
        let summary = session.summary();
        session.end();
        assert!(session.is_ended());
        assert!(session.runs.is_empty());
        assert!(session.course.coins.is_empty());
        assert_eq!(session.summary(), summary);
        assert_eq!(summary.score, 120);
    }

    #[test]
    fn test_echo_eliminated_live_survives() {
        let mut session = head_on(EliminationPolicy::AnyOpposing);
        session.resolve_eliminations();
        assert!(session.runs[0].retired);
        assert!(session.runs[1].live && !session.runs[1].retired);
        assert_eq!(session.runs.len(), 2);
    }

    #[test]
    fn test_live_killed_spawns_next_run() {
        let mut session = head_on(EliminationPolicy::LiveKillable);
        session.resolve_eliminations();
        assert!(session.runs[0].retired && session.runs[1].retired);
        assert_eq!(session.runs.len(), 3);
        assert_eq!(session.live_index(), Some(2));
    }

    #[test]
    fn test_elimination_compacts_ages() {
        let mut session = head_on(EliminationPolicy::LiveThreatOnly);
        session.on_run_finished(1);
        session.runs[0].age_bonus = 2;
        session.runs[0].pos.x = 0.0;
        session.runs[0].idle = 0.0;
        session.runs[0].elapsed = 1.0;
        session.runs[1].age_bonus = 1;
        session.runs[1].pos.x = 25.0;
        session.runs[1].idle = 0.0;
        // live run 2 heads right; nothing in front of it
        session.runs[2].pos.x = -25.0;
        session.resolve_eliminations();
        assert!(!session.runs[0].retired);

        // Move the live run onto echo 1 (heading left, age 1)
        session.runs[2].pos.x = 25.0;
        session.runs[2].elapsed = 1.0;
        session.runs[1].elapsed = 1.0;
        session.resolve_eliminations();
        assert!(session.runs[1].retired);
        assert_eq!(session.runs[0].age_bonus, 1);
        assert_eq!(session.runs[2].age_bonus, 0);
    }

    #[test]
    fn test_pickups_score_and_currency() {
        let mut session = Session::start(&GameConfig::default(), 9);
        let coin = session.course.coins[0];
        session.on_run_finished(0);
        // Echo 0 (age 1) and live run 1 both sitting on the first coin
        session.runs[0].idle = 0.0;
        session.runs[0].pos = glam::Vec2::new(coin.pos.x - FOOTPRINT_OFFSET_X, coin.pos.y - 0.9);
        session.runs[1].pos = glam::Vec2::new(coin.pos.x + FOOTPRINT_OFFSET_X, coin.pos.y - 0.9);
        session.drain_events();

        session.resolve_pickups();
        assert_eq!(session.score, 20 + 10);
        assert_eq!(session.currency, 1);
        let collected: Vec<_> = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::CoinCollected { .. }))
            .collect();
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn test_stats_follow_pickups_and_kills() {
        let mut session = Session::start(&GameConfig::default(), 9);
        let coin = session.course.coins[0];
        session.on_run_finished(0);
        session.runs[0].idle = 0.0;
        session.runs[0].pos = glam::Vec2::new(coin.pos.x - FOOTPRINT_OFFSET_X, coin.pos.y - 0.9);
        session.runs[1].pos = glam::Vec2::new(coin.pos.x + FOOTPRINT_OFFSET_X, coin.pos.y - 0.9);
        session.resolve_pickups();
        session.record_time(0.5);

        let stats = &session.stats.runs;
        assert_eq!(stats[0].coins_collected, 1);
        assert_eq!(stats[0].points_scored, 20);
        assert_eq!(stats[0].max_age, 1);
        assert_eq!(stats[1].points_scored, 10);
        assert_eq!(stats[1].lifetime, 0.5);
        assert_eq!(session.stats.total_points(), session.score);

        // Both past the grace period: the live run takes out the echo
        session.runs[0].elapsed = 1.0;
        session.runs[1].elapsed = 1.0;
        session.runs[0].pos.x = 0.0;
        session.runs[1].pos.x = 0.0;
        session.resolve_eliminations();
        assert!(session.runs[0].retired);
        assert_eq!(session.stats.runs[1].kills, 1);
        assert_eq!(session.stats.runs[0].kills, 0);

        let summary = session.summary();
        assert_eq!(summary.stats, session.stats);
    }

    #[test]
    fn test_restart_delay_is_seeded() {
        let mut a = Session::start(&config(), 77);
        let mut b = Session::start(&config(), 77);
        a.on_run_finished(0);
        b.on_run_finished(0);
        assert_eq!(a.runs[0].idle, b.runs[0].idle);
        assert!(a.runs[0].idle <= ECHO_RESTART_DELAY);
    }
}
