//! Rectangular obstacles: bricks and the paddle

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::durability::Durability;
use crate::consts::*;
use crate::settings::PhysicsSettings;

/// Which angle policy a face hit uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeflectionProfile {
    /// Bottom-face hits always go straight down
    Paddle,
    Brick,
}

/// Per-kind construction data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindSpec {
    pub width: f32,
    pub height: f32,
    /// Hit points, `None` for indestructible
    pub health: Option<u8>,
    pub profile: DeflectionProfile,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Paddle,
    /// One hit
    Regular,
    /// Two hits
    Sturdy,
    /// Three hits, half width
    Reinforced,
    /// Cannot be destroyed, doesn't count for stage clear
    Indestructible,
    /// Releases an extra ball instead of rewards
    Spawner,
}

impl ObstacleKind {
    pub const fn spec(self) -> KindSpec {
        let brick = DeflectionProfile::Brick;
        let (width, height, health, profile) = match self {
            ObstacleKind::Paddle => (PADDLE_WIDTH, PADDLE_HEIGHT, None, DeflectionProfile::Paddle),
            ObstacleKind::Regular => (32.0, 16.0, Some(1), brick),
            ObstacleKind::Sturdy => (32.0, 16.0, Some(2), brick),
            ObstacleKind::Reinforced => (16.0, 16.0, Some(3), brick),
            ObstacleKind::Indestructible => (32.0, 16.0, None, brick),
            ObstacleKind::Spawner => (32.0, 16.0, Some(1), brick),
        };
        KindSpec {
            width,
            height,
            health,
            profile,
        }
    }

    /// Map a stage file `brick_type` (1..=5) to a kind
    pub fn from_brick_type(brick_type: u8) -> Option<Self> {
        match brick_type {
            1 => Some(ObstacleKind::Regular),
            2 => Some(ObstacleKind::Sturdy),
            3 => Some(ObstacleKind::Reinforced),
            4 => Some(ObstacleKind::Indestructible),
            5 => Some(ObstacleKind::Spawner),
            _ => None,
        }
    }

    #[inline]
    pub fn profile(self) -> DeflectionProfile {
        self.spec().profile
    }

    #[inline]
    pub fn is_brick(self) -> bool {
        self != ObstacleKind::Paddle
    }

    /// Returns true if a brick of this kind must be destroyed to clear a stage
    #[inline]
    pub fn counts_for_clear(self) -> bool {
        self.is_brick() && self != ObstacleKind::Indestructible
    }
}

/// An axis-aligned obstacle. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
    pub durability: Durability,
    /// Reward pickups released on destruction
    pub rewards: u8,
}

impl Obstacle {
    /// A brick sized and armoured by its kind
    pub fn brick(id: u32, pos: Vec2, kind: ObstacleKind, rewards: u8) -> Self {
        let spec = kind.spec();
        let mut brick = Self::with_size(id, pos, Vec2::new(spec.width, spec.height), kind);
        brick.rewards = rewards;
        brick
    }

    /// An obstacle with explicit size.
    ///
    /// Panics on non-positive extents: the deflection model divides by them.
    pub fn with_size(id: u32, pos: Vec2, size: Vec2, kind: ObstacleKind) -> Self {
        assert!(
            size.x > 0.0 && size.y > 0.0,
            "obstacle {} has degenerate size {:?}",
            id,
            size
        );
        Self {
            id,
            pos,
            size,
            kind,
            durability: Durability::with_health(kind.spec().health),
            rewards: 0,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn profile(&self) -> DeflectionProfile {
        self.kind.profile()
    }

    #[inline]
    pub fn counts_for_clear(&self) -> bool {
        self.kind.counts_for_clear()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub body: Obstacle,
    /// Max horizontal travel per tick
    pub speed: f32,
    base_speed: f32,
}

impl Paddle {
    /// Paddle centred horizontally near the bottom of the screen
    pub fn new(physics: &PhysicsSettings) -> Self {
        let size = Vec2::new(physics.paddle_width, physics.paddle_height);
        let pos = Vec2::new(
            (SCREEN_WIDTH - size.x) / 2.0,
            SCREEN_HEIGHT - PADDLE_FLOOR_GAP,
        );
        Self {
            body: Obstacle::with_size(0, pos, size, ObstacleKind::Paddle),
            speed: physics.paddle_speed,
            base_speed: physics.paddle_speed,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.body.bounds()
    }

    /// Slide toward a target centre x at most `speed` per tick, staying on screen
    pub fn move_toward(&mut self, target_center_x: f32) {
        let target = target_center_x - self.body.size.x / 2.0;
        let delta = (target - self.body.pos.x).clamp(-self.speed, self.speed);
        self.body.pos.x = (self.body.pos.x + delta).clamp(0.0, SCREEN_WIDTH - self.body.size.x);
    }

    /// Permanently raise the paddle speed (until the next game)
    pub fn boost(&mut self, amount: f32) {
        self.speed += amount;
    }

    pub fn reset_speed(&mut self) {
        self.speed = self.base_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table() {
        assert_eq!(ObstacleKind::from_brick_type(1), Some(ObstacleKind::Regular));
        assert_eq!(ObstacleKind::from_brick_type(5), Some(ObstacleKind::Spawner));
        assert_eq!(ObstacleKind::from_brick_type(0), None);
        assert_eq!(ObstacleKind::from_brick_type(6), None);

        let eggs = ObstacleKind::Reinforced.spec();
        assert_eq!((eggs.width, eggs.height, eggs.health), (16.0, 16.0, Some(3)));
        assert_eq!(ObstacleKind::Indestructible.spec().health, None);
    }

    #[test]
    fn test_profiles() {
        assert_eq!(ObstacleKind::Paddle.profile(), DeflectionProfile::Paddle);
        assert_eq!(ObstacleKind::Sturdy.profile(), DeflectionProfile::Brick);
    }

    #[test]
    fn test_counts_for_clear() {
        assert!(ObstacleKind::Regular.counts_for_clear());
        assert!(ObstacleKind::Spawner.counts_for_clear());
        assert!(!ObstacleKind::Indestructible.counts_for_clear());
        assert!(!ObstacleKind::Paddle.counts_for_clear());
    }

    #[test]
    fn test_brick_geometry() {
        let brick = Obstacle::brick(7, Vec2::new(90.0, 108.0), ObstacleKind::Sturdy, 3);
        assert_eq!(brick.center(), Vec2::new(106.0, 116.0));
        assert_eq!(brick.durability.health(), Some(2));
        assert_eq!(brick.rewards, 3);
    }

    #[test]
    #[should_panic(expected = "degenerate size")]
    fn test_zero_size_fails_fast() {
        let _ = Obstacle::with_size(1, Vec2::ZERO, Vec2::new(0.0, 16.0), ObstacleKind::Regular);
    }

    #[test]
    fn test_paddle_moves_at_limited_speed() {
        let mut paddle = Paddle::new(&PhysicsSettings::default());
        let start = paddle.body.pos.x;
        paddle.move_toward(SCREEN_WIDTH);
        assert!((paddle.body.pos.x - (start + paddle.speed)).abs() < 1e-5);

        // Close targets are reached exactly
        let center = paddle.body.center().x;
        paddle.move_toward(center - 1.0);
        assert!((paddle.body.center().x - (center - 1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_paddle_stays_on_screen() {
        let mut paddle = Paddle::new(&PhysicsSettings::default());
        for _ in 0..500 {
            paddle.move_toward(-1000.0);
        }
        assert_eq!(paddle.body.pos.x, 0.0);
        for _ in 0..500 {
            paddle.move_toward(1000.0);
        }
        assert_eq!(paddle.body.pos.x, SCREEN_WIDTH - paddle.body.size.x);
    }

    #[test]
    fn test_paddle_boost_and_reset() {
        let mut paddle = Paddle::new(&PhysicsSettings::default());
        paddle.boost(PADDLE_SPEED_BONUS);
        assert!(paddle.speed > PADDLE_SPEED);
        paddle.reset_speed();
        assert_eq!(paddle.speed, PADDLE_SPEED);
    }
}
