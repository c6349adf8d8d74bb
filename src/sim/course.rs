//! The corridor every run crosses
//!
//! Static for a whole session: width, floor height and the coin layout.
//! Coins carry no pickup state; each run keeps its own list of collected coins.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Heights a coin can float at: on the run line, short jump, mid jump, long jump
const COIN_LANES: [f32; 4] = [1.0, 1.7, 2.6, 3.6];

/// Coin identifier, equal to its index in left-to-right order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoinId(pub u32);

/// A coin (a "light" to switch on)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: CoinId,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Coin {
    /// Rectangle used for pickup tests, smaller than the sprite
    pub fn pickup_rect(&self) -> Rect {
        let (sx, sy) = COIN_PICKUP_SHRINK;
        Rect::new(self.pos, self.size).scaled(Vec2::new(sx, sy))
    }
}

/// Corridor description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub level_width: f32,
    pub ground_y: f32,
    /// Sorted left to right
    pub coins: Vec<Coin>,
}

impl Course {
    /// Corridor with no coins
    pub fn empty(level_width: f32) -> Self {
        Self {
            level_width,
            ground_y: GROUND_Y,
            coins: Vec::new(),
        }
    }

    /// Lay out `coin_count` evenly spaced coins, heights picked by `seed`
    pub fn generate(seed: u64, coin_count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut course = Self::empty(LEVEL_WIDTH);
        if coin_count == 0 {
            return course;
        }

        let spacing = course.level_width / coin_count as f32;
        let left = -course.level_width * 0.5;
        for i in 0..coin_count {
            let lane = COIN_LANES[rng.random_range(0..COIN_LANES.len())];
            course.coins.push(Coin {
                id: CoinId(i as u32),
                pos: Vec2::new(left + (i as f32 + 0.5) * spacing, course.ground_y + lane),
                size: Vec2::splat(COIN_SIZE),
            });
        }
        log::debug!("Generated course with {} coins (seed {seed})", coin_count);
        course
    }

    /// Where a run heading `direction` starts (just off the corridor)
    pub fn start_x(&self, direction: i8) -> f32 {
        -f32::from(direction) * (self.level_width + RUNNER_WIDTH) * 0.5
    }

    /// Where a run heading `direction` is done
    pub fn end_x(&self, direction: i8) -> f32 {
        -self.start_x(direction)
    }

    /// Coins in the order a run heading `direction` meets them
    pub fn coins_in_direction(&self, direction: i8) -> impl Iterator<Item = &Coin> + '_ {
        let last = self.coins.len().saturating_sub(1);
        (0..self.coins.len()).map(move |i| {
            if direction >= 0 {
                &self.coins[i]
            } else {
                &self.coins[last - i]
            }
        })
    }

    pub fn clear(&mut self) {
        self.coins.clear();
    }
}
