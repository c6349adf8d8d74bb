//! Collision detection and scoring
//!
//! Two checks run every tick once all runs have moved: coin pickups (per run,
//! independent of every other run) and runner-vs-runner eliminations.
//! Both are pure geometry over footprints; empty inputs simply yield nothing.

use super::course::{CoinId, Course};
use super::run::Run;
use crate::settings::EliminationPolicy;

/// A coin credited to a run this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub run: usize,
    pub coin: CoinId,
    pub gain: u64,
    /// Combo this coin was scored at
    pub combo: u32,
    /// Picked up by the live run (only those count as currency)
    pub live: bool,
}

/// Points for one coin: `base * 2^age * combo`
pub fn coin_gain(base: u64, age_bonus: u32, combo: u32) -> u64 {
    base.saturating_mul(2u64.saturating_pow(age_bonus))
        .saturating_mul(u64::from(combo))
}

/// Collect every coin `run` overlaps this tick
///
/// Coins are walked in the run's direction. A pickup right after the coin
/// that precedes it in that order extends the combo, anything else resets it.
pub fn collect_coins(run: &mut Run, course: &Course, base_value: u64) -> Vec<Pickup> {
    let mut pickups = Vec::new();
    if !run.is_on_course() {
        return pickups;
    }

    let footprint = run.footprint();
    let mut prev: Option<CoinId> = None;
    for coin in course.coins_in_direction(run.direction) {
        if !run.collected.contains(&coin.id) && footprint.intersects(&coin.pickup_rect()) {
            if let Some(&last) = run.collected.last() {
                if prev == Some(last) {
                    run.combo += 1;
                } else {
                    run.combo = 1;
                }
            }
            run.collected.push(coin.id);

            let gain = coin_gain(base_value, run.age_bonus, run.combo);
            pickups.push(Pickup {
                run: run.index,
                coin: coin.id,
                gain,
                combo: run.combo,
                live: run.live,
            });
        }
        prev = Some(coin.id);
    }
    pickups
}

/// Runs eliminated by a runner-vs-runner contact this tick
///
/// Evaluated against a snapshot: every pair is tested before anyone is
/// removed, so the result doesn't depend on run order. A run is only
/// eliminated by a run heading the opposite way, and only once it has been
/// on its lap for at least `grace` seconds.
pub fn find_eliminations(runs: &[Run], policy: EliminationPolicy, grace: f32) -> Vec<usize> {
    let active: Vec<&Run> = runs.iter().filter(|r| r.is_on_course()).collect();

    active
        .iter()
        .filter(|victim| policy.is_vulnerable(victim.live) && victim.elapsed >= grace)
        .filter(|victim| active.iter().any(|threat| hits(threat, victim, policy)))
        .map(|victim| victim.index)
        .collect()
}

/// Runs touching `victim` that count as a threat to it, for kill credit
pub fn eliminators(runs: &[Run], victim: usize, policy: EliminationPolicy) -> Vec<usize> {
    let Some(victim) = runs.get(victim).filter(|r| r.is_on_course()) else {
        return Vec::new();
    };
    runs.iter()
        .filter(|threat| threat.is_on_course() && hits(threat, victim, policy))
        .map(|threat| threat.index)
        .collect()
}

fn hits(threat: &Run, victim: &Run, policy: EliminationPolicy) -> bool {
    threat.index != victim.index
        && threat.direction != victim.direction
        && policy.is_threat(threat.live)
        && victim.footprint().intersects(&threat.footprint())
}
