//! A single run through the corridor, live or echo
//!
//! Movement is plain fixed-step integration with no randomness, so two runs
//! fed the same `dt` sequence and the same jump trace follow the same path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::course::{CoinId, Course};
use super::geometry::Rect;
use super::replay::JumpTrace;
use crate::consts::*;

/// One life of the player: the live run takes input, echoes replay their trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Spawn order within the session
    pub index: usize,
    /// +1 runs left to right, -1 right to left
    pub direction: i8,
    pub start_x: f32,
    pub end_x: f32,
    /// Signed horizontal speed
    pub speed: f32,
    /// Bottom-center of the runner
    pub pos: Vec2,
    pub vel_y: f32,
    pub gravity: f32,
    ground_y: f32,
    /// Seconds since the current lap started
    pub elapsed: f32,
    /// Seconds left to wait at the start line before the lap begins
    pub idle: f32,
    pub trace: JumpTrace,
    /// Next trace entry to fire
    pub next_jump: usize,
    /// Time spent in the current jump, 0 when not jumping
    pub jumping_since: f32,
    pub live: bool,
    pub retired: bool,
    pub finished: bool,
    /// Coins picked up this lap, in pickup order
    pub collected: Vec<CoinId>,
    pub combo: u32,
    pub age_bonus: u32,
    /// Laps completed so far
    pub laps: u32,
}

impl Run {
    /// New live run at the start of the corridor
    pub fn new(index: usize, direction: i8, speed: f32, course: &Course) -> Self {
        let start_x = course.start_x(direction);
        Self {
            index,
            direction,
            start_x,
            end_x: course.end_x(direction),
            speed: f32::from(direction) * speed.abs(),
            pos: Vec2::new(start_x, course.ground_y),
            vel_y: 0.0,
            gravity: 0.0,
            ground_y: course.ground_y,
            elapsed: 0.0,
            idle: 0.0,
            trace: JumpTrace::default(),
            next_jump: 0,
            jumping_since: 0.0,
            live: true,
            retired: false,
            finished: false,
            collected: Vec::new(),
            combo: 1,
            age_bonus: 0,
            laps: 0,
        }
    }

    pub fn is_echo(&self) -> bool {
        !self.live
    }

    pub fn is_idle(&self) -> bool {
        self.idle > 0.0
    }

    /// Moving along the corridor and taking part in collisions
    pub fn is_on_course(&self) -> bool {
        !self.retired && !self.finished && !self.is_idle()
    }

    pub fn is_grounded(&self) -> bool {
        self.vel_y == 0.0 && self.pos.y <= self.ground_y
    }

    /// The hitbox: thinner than the sprite, shifted toward the running direction
    pub fn footprint(&self) -> Rect {
        let offset = Vec2::new(
            FOOTPRINT_OFFSET_X * f32::from(self.direction),
            RUNNER_HEIGHT * 0.5 + FOOTPRINT_OFFSET_Y,
        );
        Rect::new(self.pos + offset, Vec2::new(FOOTPRINT_WIDTH, FOOTPRINT_HEIGHT))
    }

    /// Move forward one tick. Sets `finished` when the end line is crossed.
    pub fn advance(&mut self, dt: f32) {
        if self.retired || self.finished {
            return;
        }
        if self.is_idle() {
            self.idle = (self.idle - dt).max(0.0);
            return;
        }

        self.elapsed += dt;
        self.pos.x += self.speed * dt;

        if self.gravity != 0.0 || self.vel_y != 0.0 {
            self.vel_y += self.gravity * dt;
            self.pos.y += self.vel_y * dt;
            if self.pos.y <= self.ground_y && self.vel_y <= 0.0 {
                self.land();
            }
        }

        let crossed = if self.speed > 0.0 {
            self.pos.x > self.end_x
        } else {
            self.pos.x < self.end_x
        };
        if crossed {
            self.finished = true;
        }
    }

    fn land(&mut self) {
        self.pos.y = self.ground_y;
        self.vel_y = 0.0;
        self.gravity = 0.0;
    }

    /// Kick off a jump (shared by live input and replay)
    pub(crate) fn start_jump(&mut self) {
        self.vel_y += JUMP_IMPULSE;
        self.gravity = JUMP_GRAVITY;
        self.jumping_since = JUMP_EPSILON;
    }

    /// Keep pushing up while the jump is held
    pub(crate) fn hold_jump(&mut self, dt: f32) {
        self.vel_y += JUMP_HOLD_ACCEL * dt;
    }

    /// Jump released: fall with full gravity
    pub(crate) fn release_jump(&mut self) {
        self.gravity = FALL_GRAVITY;
        self.jumping_since = 0.0;
    }

    /// Lap done: one level older, back to the start line as an echo
    pub fn complete_lap(&mut self, restart_delay: f32) {
        self.laps += 1;
        self.age_bonus += 1;
        self.live = false;
        self.restart(restart_delay);
    }

    /// Rewind to the start line; the trace is kept and replays from its first entry
    fn restart(&mut self, delay: f32) {
        self.pos = Vec2::new(self.start_x, self.ground_y);
        self.vel_y = 0.0;
        self.gravity = 0.0;
        self.elapsed = 0.0;
        self.idle = delay.max(0.0);
        self.next_jump = 0;
        self.jumping_since = 0.0;
        self.finished = false;
        self.collected.clear();
        self.combo = 1;
    }

    /// Eliminated for good
    pub fn retire(&mut self) {
        self.retired = true;
        self.live = false;
        self.vel_y = 0.0;
        self.gravity = 0.0;
        self.jumping_since = 0.0;
    }
}
