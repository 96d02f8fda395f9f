//! Multi-ball coordinator
//!
//! Owns the ordered ball collection and runs one physics step for all of them:
//! every ball integrates first, then each resolves at most one collision
//! (paddle before bricks, bricks in reverse order).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::ball::Ball;
use super::collision::Resolver;
use super::obstacle::{Obstacle, ObstacleKind, Paddle};
use super::reward::RewardDrop;
use super::state::GameEvent;
use crate::settings::PhysicsSettings;

/// Result of one coordinator step
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub events: Vec<GameEvent>,
    /// Rewards to release for bricks destroyed this step
    pub drops: Vec<RewardDrop>,
    /// The last ball in play left through the bottom
    pub life_lost: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coordinator {
    /// Balls in play; the first is the one served from the paddle
    pub balls: Vec<Ball>,
    next_ball_id: u32,
}

impl Coordinator {
    /// One ball, not yet placed
    pub fn new(physics: &PhysicsSettings) -> Self {
        Self {
            balls: vec![Ball::new(1, physics)],
            next_ball_id: 2,
        }
    }

    /// Advance all balls by one tick
    pub fn step(
        &mut self,
        paddle: &mut Paddle,
        bricks: &mut Vec<Obstacle>,
        resolver: &Resolver,
        physics: &PhysicsSettings,
        rng: &mut impl Rng,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        for ball in &mut self.balls {
            ball.integrate();
        }

        // Spawns are deferred so new balls don't collide this tick
        let mut spawns: Vec<(Vec2, f32)> = Vec::new();

        for ball in &mut self.balls {
            if resolver.resolve(ball, &mut paddle.body) {
                outcome.events.push(GameEvent::PaddleHit);
                continue;
            }

            for i in (0..bricks.len()).rev() {
                if !resolver.resolve(ball, &mut bricks[i]) {
                    continue;
                }

                let id = bricks[i].id;
                if ball.take_destroy_signal() {
                    let brick = bricks.remove(i);
                    log::debug!("Brick {} ({:?}) destroyed by ball {}", id, brick.kind, ball.id);
                    outcome.events.push(GameEvent::BrickDestroyed {
                        id,
                        kind: brick.kind,
                    });
                    if brick.kind == ObstacleKind::Spawner {
                        spawns.push((brick.center(), ball.gravity));
                    } else {
                        outcome.drops.push(RewardDrop {
                            brick_id: id,
                            origin: brick.pos,
                            count: brick.rewards,
                        });
                    }
                } else {
                    outcome.events.push(GameEvent::BrickHit { id });
                }
                break;
            }
        }

        for (center, gravity) in spawns {
            let id = self.spawn_at(center, gravity, physics, rng);
            outcome.events.push(GameEvent::BallSpawned { id });
        }

        outcome.life_lost = self.prune();
        outcome
    }

    /// Add a ball centred on `center` with a random heading and speed
    pub fn spawn_at(
        &mut self,
        center: Vec2,
        gravity: f32,
        physics: &PhysicsSettings,
        rng: &mut impl Rng,
    ) -> u32 {
        let id = self.next_ball_id;
        self.next_ball_id += 1;

        let mut ball = Ball::new(id, physics);
        ball.gravity = gravity;
        ball.pos = center - Vec2::splat(ball.radius);

        let angle = rng.random_range(0.0..360.0f32);
        let speed = rng.random_range(physics.max_speed.min(1.0)..=physics.max_speed);
        ball.launch(angle, speed);

        log::debug!("Spawned ball {} at {:?} (angle {:.0}, speed {:.2})", id, center, angle, speed);
        self.balls.push(ball);
        id
    }

    /// Drop out-of-bounds balls while others remain in play.
    ///
    /// Returns true when a single ball is left and it is out of bounds.
    pub fn prune(&mut self) -> bool {
        if self.balls.len() > 1 {
            if self.balls.iter().all(|b| b.out_of_bounds) {
                self.balls.truncate(1);
            } else {
                self.balls.retain(|b| !b.out_of_bounds);
            }
        }
        self.balls.len() == 1 && self.balls[0].out_of_bounds
    }

    /// Back to a single ball resting on the paddle
    pub fn reset_to_single(&mut self, paddle: &Aabb, physics: &PhysicsSettings) {
        self.balls.truncate(1);
        if self.balls.is_empty() {
            let id = self.next_ball_id;
            self.next_ball_id += 1;
            self.balls.push(Ball::new(id, physics));
        }
        self.balls[0].rest_on(paddle);
    }

    /// Keep the served ball centred on the paddle
    pub fn follow(&mut self, paddle: &Aabb) {
        if let Some(ball) = self.balls.first_mut() {
            ball.pos.x = paddle.center().x - ball.radius;
        }
    }

    /// Fire the served ball along `angle_deg`
    pub fn launch(&mut self, angle_deg: f32, speed: f32) {
        if let Some(ball) = self.balls.first_mut() {
            ball.launch(angle_deg, speed);
        }
    }

    /// Apply a gravity value to every ball in play
    pub fn set_gravity(&mut self, gravity: f32) {
        for ball in &mut self.balls {
            ball.gravity = gravity;
        }
    }
}
