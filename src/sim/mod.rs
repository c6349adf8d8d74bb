//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (runs by spawn index, coins left to right)
//! - No rendering or platform dependencies

pub mod collision;
pub mod course;
pub mod geometry;
pub mod replay;
pub mod run;
pub mod session;
pub mod stats;
pub mod tick;

pub use collision::{Pickup, coin_gain, collect_coins, eliminators, find_eliminations};
pub use course::{Coin, CoinId, Course};
pub use geometry::Rect;
pub use replay::{
    JumpEntry, JumpTrace, can_record_jump, extend_jump, record_jump, record_jump_start,
    replay_step,
};
pub use run::Run;
pub use session::{LifeOutcome, Session, SessionSummary, SimEvent};
pub use stats::{RunStats, SessionStats};
pub use tick::{TickInput, tick};
