//! Jump recording and replay
//!
//! The live run appends one entry per press and stretches it while the press
//! is held. Every run, live or echo, then fires its entries through
//! [`replay_step`], so an echo reproduces the live trajectory tick for tick.

use serde::{Deserialize, Serialize};

use super::run::Run;
use crate::consts::*;

/// A recorded jump: when it was pressed and how long it was held
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpEntry {
    /// Lap time of the press (seconds)
    pub trigger_time: f32,
    /// Hold duration (seconds)
    pub duration: f32,
}

/// Append-only list of jumps for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpTrace {
    entries: Vec<JumpEntry>,
}

impl JumpTrace {
    pub fn entries(&self) -> &[JumpEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&JumpEntry> {
        self.entries.get(index)
    }

    fn push(&mut self, entry: JumpEntry) {
        self.entries.push(entry);
    }

    fn last_mut(&mut self) -> Option<&mut JumpEntry> {
        self.entries.last_mut()
    }
}

/// Whether the live run may start a new recorded jump right now
pub fn can_record_jump(run: &Run) -> bool {
    run.live
        && !run.retired
        && run.jumping_since <= 0.0
        && run.is_grounded()
        && run.next_jump == run.trace.len()
}

/// Record a fresh press on the live run
///
/// Returns false when the run is airborne or already has a jump pending.
/// Panics if `run` is not the live run: echoes never gain entries.
pub fn record_jump_start(run: &mut Run) -> bool {
    record_jump(run, MIN_JUMP_DURATION)
}

/// Record a jump with a fixed hold duration (scripted input, tutorial)
pub fn record_jump(run: &mut Run, duration: f32) -> bool {
    assert!(run.live, "run {} is an echo, its trace is read-only", run.index);
    if !can_record_jump(run) {
        return false;
    }
    let entry = JumpEntry {
        trigger_time: run.elapsed,
        duration: duration.clamp(MIN_JUMP_DURATION, MAX_JUMP_DURATION),
    };
    log::debug!("run {} jump recorded at {:.3}s", run.index, entry.trigger_time);
    run.trace.push(entry);
    true
}

/// Stretch the jump being held on the live run
pub fn extend_jump(run: &mut Run, dt: f32) {
    assert!(run.live, "run {} is an echo, its trace is read-only", run.index);
    // Only the newest entry, and only while it is pending or in flight
    if run.next_jump + 1 < run.trace.len() || run.next_jump >= run.trace.len() {
        return;
    }
    if let Some(last) = run.trace.last_mut() {
        last.duration = (last.duration + dt).min(MAX_JUMP_DURATION);
    }
}

/// Fire, hold or release the run's current trace entry for this tick
///
/// Uses a threshold on `elapsed`, so a trigger time that falls between two
/// ticks still fires. Returns true on the tick a jump starts.
/// Run it after [`Run::advance`] in the same tick.
pub fn replay_step(run: &mut Run, dt: f32) -> bool {
    if !run.is_on_course() {
        return false;
    }
    let Some(entry) = run.trace.get(run.next_jump).copied() else {
        return false;
    };

    if run.jumping_since <= 0.0 {
        // Presses are sampled before the clock moves, so fire strictly after
        // the trigger: an echo must not jump one tick ahead of the run it copies.
        if run.elapsed > entry.trigger_time {
            run.start_jump();
            return true;
        }
    } else {
        run.jumping_since += dt;
        if run.jumping_since > entry.duration {
            run.release_jump();
            run.next_jump += 1;
        } else {
            run.hold_jump(dt);
        }
    }
    false
}
