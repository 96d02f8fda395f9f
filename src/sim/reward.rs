//! Falling rewards released by destroyed bricks

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::{REWARD_HEIGHT, REWARD_WIDTH, SCREEN_HEIGHT};

/// Gap between a brick's corner and its first reward slot
const SLOT_PADDING: f32 = 2.0;

/// Initial fall speed, drawn per reward
pub const REWARD_SPEED_RANGE: RangeInclusive<f32> = 0.5..=0.75;

/// Power-up carried by some rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// One extra life
    LifeUp,
    /// Balls stop falling for G seconds
    Antigravity,
    /// Faster paddle until the next game
    PaddleSpeed,
    /// Catches score double for G seconds
    DoublePoints,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::LifeUp,
        PowerUpKind::Antigravity,
        PowerUpKind::PaddleSpeed,
        PowerUpKind::DoublePoints,
    ];

    /// True for the effects with a running timer
    pub fn is_timed(self) -> bool {
        matches!(self, PowerUpKind::Antigravity | PowerUpKind::DoublePoints)
    }

    /// Uniform pick over all kinds
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Instruction from the coordinator: release rewards from a destroyed brick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardDrop {
    pub brick_id: u32,
    /// Top-left of the destroyed brick
    pub origin: Vec2,
    pub count: u8,
}

impl RewardDrop {
    /// Spawn positions, the first `count` of four fixed slots
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        drop_positions(self.origin, self.count)
    }
}

/// Reward slots inside a brick at `origin`: a 2x2 grid, first `count` used
pub fn drop_positions(origin: Vec2, count: u8) -> impl Iterator<Item = Vec2> {
    let slots = [
        Vec2::new(SLOT_PADDING, SLOT_PADDING),
        Vec2::new(REWARD_WIDTH + SLOT_PADDING, SLOT_PADDING),
        Vec2::new(SLOT_PADDING, 2.0 * REWARD_HEIGHT + SLOT_PADDING),
        Vec2::new(REWARD_WIDTH + SLOT_PADDING, 2.0 * REWARD_HEIGHT + SLOT_PADDING),
    ];
    slots
        .into_iter()
        .take(usize::from(count))
        .map(move |offset| origin + offset)
}

/// What happened to a reward this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardOutcome {
    Falling,
    Caught,
    Missed,
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed_y: f32,
    /// Added to `speed_y` each tick
    pub accel: f32,
    pub points: u32,
    pub powerup: Option<PowerUpKind>,
}

impl Reward {
    pub fn new(id: u32, pos: Vec2, speed_y: f32, accel: f32, points: u32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(REWARD_WIDTH, REWARD_HEIGHT),
            speed_y,
            accel,
            points,
            powerup: None,
        }
    }

    pub fn with_powerup(mut self, powerup: Option<PowerUpKind>) -> Self {
        self.powerup = powerup;
        self
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Fall one tick
    pub fn update(&mut self) {
        self.speed_y += self.accel;
        self.pos.y += self.speed_y;
    }

    /// Missed once past the bottom edge, caught on paddle overlap
    pub fn check(&self, paddle: &Aabb) -> RewardOutcome {
        if self.pos.y >= SCREEN_HEIGHT {
            RewardOutcome::Missed
        } else if self.bounds().overlaps(paddle) {
            RewardOutcome::Caught
        } else {
            RewardOutcome::Falling
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_drop_positions_fill_slots_in_order() {
        let slots: Vec<Vec2> = drop_positions(Vec2::new(100.0, 40.0), 3).collect();
        assert_eq!(
            slots,
            vec![
                Vec2::new(102.0, 42.0),
                Vec2::new(110.0, 42.0),
                Vec2::new(102.0, 62.0),
            ]
        );
        assert_eq!(drop_positions(Vec2::ZERO, 4).count(), 4);
        assert_eq!(drop_positions(Vec2::ZERO, 9).count(), 4);
        assert_eq!(drop_positions(Vec2::ZERO, 0).count(), 0);
    }

    #[test]
    fn test_reward_accelerates() {
        let mut reward = Reward::new(1, Vec2::new(50.0, 50.0), 0.5, 0.01, 10);
        reward.update();
        assert!((reward.speed_y - 0.51).abs() < 1e-6);
        assert!((reward.pos.y - 50.51).abs() < 1e-4);
        reward.update();
        assert!((reward.pos.y - 51.03).abs() < 1e-4);
    }

    #[test]
    fn test_check_outcomes() {
        let paddle = Aabb::from_pos_size(Vec2::new(100.0, 170.0), Vec2::new(72.0, 14.0));

        let falling = Reward::new(1, Vec2::new(120.0, 100.0), 0.5, 0.0, 10);
        assert_eq!(falling.check(&paddle), RewardOutcome::Falling);

        let caught = Reward::new(2, Vec2::new(120.0, 165.0), 0.5, 0.0, 10);
        assert_eq!(caught.check(&paddle), RewardOutcome::Caught);

        let missed = Reward::new(3, Vec2::new(20.0, SCREEN_HEIGHT), 0.5, 0.0, 10);
        assert_eq!(missed.check(&paddle), RewardOutcome::Missed);
    }

    #[test]
    fn test_random_powerup_covers_all_kinds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(PowerUpKind::random(&mut rng));
        }
        assert_eq!(seen.len(), PowerUpKind::ALL.len());
    }

    #[test]
    fn test_timed_kinds() {
        assert!(PowerUpKind::Antigravity.is_timed());
        assert!(PowerUpKind::DoublePoints.is_timed());
        assert!(!PowerUpKind::LifeUp.is_timed());
        assert!(!PowerUpKind::PaddleSpeed.is_timed());
    }
}
