//! Fixed timestep simulation tick
//!
//! Phase order is fixed: input, advance, replay, collisions (eliminations
//! first, then pickups), finish check.

use super::replay::{extend_jump, record_jump_start, replay_step};
use super::session::{Session, SimEvent};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump button held this tick
    pub pressed: bool,
    /// Jump button held last tick
    pub was_pressed: bool,
}

impl TickInput {
    pub fn new(pressed: bool, was_pressed: bool) -> Self {
        Self {
            pressed,
            was_pressed,
        }
    }

    pub fn just_pressed(&self) -> bool {
        self.pressed && !self.was_pressed
    }

    pub fn held(&self) -> bool {
        self.pressed && self.was_pressed
    }
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    if session.is_complete() || session.is_ended() {
        return;
    }
    session.time_ticks += 1;

    if session.input_enabled {
        apply_input(session, input, dt);
    }

    for run in &mut session.runs {
        run.advance(dt);
    }
    session.record_time(dt);

    let mut fired = Vec::new();
    for run in &mut session.runs {
        if replay_step(run, dt) {
            fired.push(run.index);
        }
    }
    for run in fired {
        session.stats.record_jump(run);
        session.push_event(SimEvent::JumpFired { run });
    }

    session.resolve_eliminations();
    session.resolve_pickups();
    session.resolve_finishes();
}

fn apply_input(session: &mut Session, input: &TickInput, dt: f32) {
    let Some(live) = session.live_run_mut() else {
        return;
    };
    if input.just_pressed() {
        record_jump_start(live);
    } else if input.held() {
        extend_jump(live, dt);
    }
}
