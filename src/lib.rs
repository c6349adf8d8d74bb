//! Recursive Runner - run the corridor again and again, against yourself
//!
//! Core modules:
//! - `sim`: Deterministic simulation (runs, jump replay, collisions, scoring, sessions)
//! - `scene`: Phased scene state machine and the game's screens
//! - `app`: Fixed-timestep driver owning the scene machine and its context
//! - `highscores`: Leaderboard and score persistence
//! - `settings`: Data-driven game configuration

pub mod app;
pub mod error;
pub mod highscores;
pub mod scene;
pub mod settings;
pub mod sim;

pub use app::App;
pub use error::{Error, Result};
pub use highscores::{HighScores, JsonScoreStore, ScoreStore};
pub use settings::{EliminationPolicy, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World units per screen width
    pub const SCREEN_WIDTH: f32 = 20.0;
    /// Corridor length in screens
    pub const LEVEL_SIZE: f32 = 3.0;
    /// Corridor length in world units
    pub const LEVEL_WIDTH: f32 = SCREEN_WIDTH * LEVEL_SIZE;
    /// Height of the floor everybody runs on
    pub const GROUND_Y: f32 = 0.0;

    /// Runner sprite size (position is the bottom-center of the sprite)
    pub const RUNNER_WIDTH: f32 = 1.7;
    pub const RUNNER_HEIGHT: f32 = 1.8;
    /// Collision footprint: much thinner than the sprite, nudged forward
    pub const FOOTPRINT_OFFSET_X: f32 = 0.15;
    pub const FOOTPRINT_OFFSET_Y: f32 = 0.0;
    pub const FOOTPRINT_WIDTH: f32 = 0.35;
    pub const FOOTPRINT_HEIGHT: f32 = 0.8;

    /// Runs per session
    pub const RUNS_PER_SESSION: u32 = 10;
    /// Duration of a whole session at constant speed (seconds)
    pub const SESSION_DURATION: f32 = 90.5;

    /// Coins laid along the corridor
    pub const COINS_PER_COURSE: usize = 20;
    /// Coin sprite size
    pub const COIN_SIZE: f32 = 0.6;
    /// Pickup rectangle is the coin size scaled by this (x, y)
    pub const COIN_PICKUP_SHRINK: (f32, f32) = (0.5, 0.6);
    /// Points for a single coin before multipliers
    pub const COIN_BASE_VALUE: u64 = 10;

    /// Jumps: vertical kick when a jump fires (u/s)
    pub const JUMP_IMPULSE: f32 = 13.5;
    /// Extra upward acceleration while a jump is held (u/s²)
    pub const JUMP_HOLD_ACCEL: f32 = 100.0;
    /// Gravity while a jump is held
    pub const JUMP_GRAVITY: f32 = -50.0;
    /// Gravity once the jump is released
    pub const FALL_GRAVITY: f32 = -150.0;
    /// Shortest recorded jump
    pub const MIN_JUMP_DURATION: f32 = 0.005;
    /// Longest a jump can be held
    pub const MAX_JUMP_DURATION: f32 = 0.2;
    /// `jumping_since` value on the tick a jump fires
    pub const JUMP_EPSILON: f32 = 0.001;

    /// A freshly started run can't be eliminated before this (seconds)
    pub const ELIMINATION_GRACE: f32 = 0.25;
    /// Longest idle before an echo starts its next lap (seconds)
    pub const ECHO_RESTART_DELAY: f32 = 2.0;
}

/// Base speed such that a full session lasts `duration` seconds
#[inline]
pub fn speed_for_session_duration(runs: u32, duration: f32) -> f32 {
    runs as f32 * (consts::LEVEL_WIDTH + 2.0 * 0.85) / duration
}
