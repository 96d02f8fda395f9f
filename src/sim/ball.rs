//! The ball: free-flight integration, screen edges and trail

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::settings::{MAX_TRAIL_LENGTH, PhysicsSettings};

/// A ball entity. `pos` is the top-left corner of its bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Sign of travel on each axis, each always -1 or +1
    pub direction: (i8, i8),
    /// Added to vertical speed every tick (zeroed by antigravity)
    pub gravity: f32,
    pub velocity_increase: f32,
    pub max_speed: f32,
    pub terminal_fall_speed: f32,
    /// Set when the ball reaches the bottom edge
    pub out_of_bounds: bool,
    /// One-shot message: the last brick hit ran out of health
    pub destroy_brick: bool,
    /// Past positions for rendering (oldest first)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
    pub trail_length: usize,
}

impl Ball {
    pub fn new(id: u32, physics: &PhysicsSettings) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: physics.ball_radius,
            direction: (1, -1),
            gravity: physics.gravity,
            velocity_increase: physics.velocity_increase,
            max_speed: physics.max_speed,
            terminal_fall_speed: physics.terminal_fall_speed,
            out_of_bounds: false,
            destroy_brick: false,
            trail: VecDeque::with_capacity(physics.trail_length.min(MAX_TRAIL_LENGTH) + 1),
            trail_length: physics.trail_length,
        }
    }

    #[inline]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    /// Bounding box at the current position
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds_at(self.pos)
    }

    /// Bounding box if the ball were at `pos`
    #[inline]
    pub fn bounds_at(&self, pos: Vec2) -> Aabb {
        Aabb::from_pos_size(pos, Vec2::splat(self.diameter()))
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Advance one tick: record trail, apply gravity, move, handle edges
    pub fn integrate(&mut self) {
        self.record_trail();

        self.vel.y += self.gravity;
        self.vel.y = self.vel.y.min(self.terminal_fall_speed);
        self.pos += self.vel;
        self.sync_direction();

        self.check_bounds();
    }

    /// Refresh direction signs from velocity. A zero component keeps its sign.
    pub fn sync_direction(&mut self) {
        if self.vel.x != 0.0 {
            self.direction.0 = if self.vel.x > 0.0 { 1 } else { -1 };
        }
        if self.vel.y != 0.0 {
            self.direction.1 = if self.vel.y > 0.0 { 1 } else { -1 };
        }
    }

    /// Reflect off the side and top edges; flag the bottom edge
    fn check_bounds(&mut self) {
        let d = self.diameter();

        if self.pos.x <= 0.0 {
            self.pos.x = 0.0;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + d >= SCREEN_WIDTH {
            self.pos.x = SCREEN_WIDTH - d;
            self.vel.x = -self.vel.x.abs();
        }

        if self.pos.y <= 0.0 {
            self.pos.y = 0.0;
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y + d >= SCREEN_HEIGHT {
            self.pos.y = SCREEN_HEIGHT - d;
            self.out_of_bounds = true;
        }

        self.sync_direction();
    }

    /// Record current position to trail (call each tick while in play)
    pub fn record_trail(&mut self) {
        if self.trail_length == 0 {
            return;
        }
        self.trail.push_back(self.pos);
        while self.trail.len() > self.trail_length {
            self.trail.pop_front();
        }
    }

    /// Clear trail (on reset to the paddle)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Consume the destroy-brick message
    pub fn take_destroy_signal(&mut self) -> bool {
        std::mem::take(&mut self.destroy_brick)
    }

    /// Park the ball on top of the paddle, centred, at rest
    pub fn rest_on(&mut self, paddle: &Aabb) {
        self.clear_trail();
        self.pos = Vec2::new(
            paddle.center().x - self.radius,
            paddle.top() - self.diameter(),
        );
        self.vel = Vec2::ZERO;
        self.direction = (1, -1);
        self.out_of_bounds = false;
        self.destroy_brick = false;
    }

    /// Launch from rest along `angle_deg` (0 = right, 90 = up)
    pub fn launch(&mut self, angle_deg: f32, speed: f32) {
        self.vel = crate::screen_direction(angle_deg) * speed;
        self.sync_direction();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        let physics = PhysicsSettings {
            gravity: 0.0,
            ..Default::default()
        };
        let mut ball = Ball::new(1, &physics);
        ball.pos = Vec2::new(x, y);
        ball.vel = Vec2::new(vx, vy);
        ball
    }

    #[test]
    fn test_integrate_moves_by_velocity() {
        let mut ball = ball_at(100.0, 100.0, 1.5, -2.0);
        ball.integrate();
        assert_eq!(ball.pos, Vec2::new(101.5, 98.0));
        assert_eq!(ball.direction, (1, -1));
    }

    #[test]
    fn test_gravity_and_terminal_speed() {
        let mut ball = ball_at(100.0, 20.0, 0.0, 4.995);
        ball.gravity = 0.01;
        ball.integrate();
        assert!((ball.vel.y - 5.0).abs() < 1e-5);
        ball.integrate();
        assert_eq!(ball.vel.y, ball.terminal_fall_speed);
    }

    #[test]
    fn test_zero_velocity_keeps_direction() {
        let mut ball = ball_at(100.0, 100.0, -1.0, 1.0);
        ball.integrate();
        assert_eq!(ball.direction, (-1, 1));
        ball.vel = Vec2::ZERO;
        ball.integrate();
        assert_eq!(ball.direction, (-1, 1));
    }

    #[test]
    fn test_left_edge_reflects() {
        let mut ball = ball_at(0.0, 100.0, -2.0, 0.0);
        ball.integrate();
        assert!(ball.vel.x > 0.0);
        assert!(ball.pos.x >= 0.0);
        assert_eq!(ball.direction.0, 1);
    }

    #[test]
    fn test_right_edge_reflects() {
        let mut ball = ball_at(SCREEN_WIDTH - 8.5, 100.0, 2.0, 0.0);
        ball.integrate();
        assert!(ball.vel.x < 0.0);
        assert!(ball.pos.x + ball.diameter() <= SCREEN_WIDTH);
    }

    #[test]
    fn test_top_edge_reflects() {
        let mut ball = ball_at(100.0, 1.0, 0.5, -2.0);
        ball.integrate();
        assert!(ball.vel.y > 0.0);
        assert_eq!(ball.pos.y, 0.0);
    }

    #[test]
    fn test_bottom_edge_sets_out_of_bounds_without_reflecting() {
        let mut ball = ball_at(100.0, SCREEN_HEIGHT - 9.0, 0.0, 2.0);
        ball.integrate();
        assert!(ball.out_of_bounds);
        assert!(ball.vel.y > 0.0);
        assert_eq!(ball.pos.y, SCREEN_HEIGHT - ball.diameter());
    }

    #[test]
    fn test_trail_is_bounded_fifo() {
        let mut ball = ball_at(10.0, 10.0, 1.0, 1.0);
        for _ in 0..(ball.trail_length + 5) {
            ball.integrate();
        }
        assert_eq!(ball.trail.len(), ball.trail_length);
        // Oldest entry is the position recorded five ticks in
        assert_eq!(ball.trail.front().copied(), Some(Vec2::new(15.0, 15.0)));

        ball.clear_trail();
        assert!(ball.trail.is_empty());
    }

    #[test]
    fn test_huge_trail_length_does_not_overflow() {
        let physics = PhysicsSettings {
            trail_length: usize::MAX,
            ..Default::default()
        };
        let mut ball = Ball::new(1, &physics);
        assert!(ball.trail.is_empty());
        ball.vel = Vec2::new(1.0, 1.0);
        ball.integrate();
        assert_eq!(ball.trail.len(), 1);
    }

    #[test]
    fn test_rest_on_paddle() {
        let mut ball = ball_at(5.0, 5.0, 1.0, 1.0);
        ball.out_of_bounds = true;
        ball.record_trail();
        let paddle = Aabb::from_pos_size(Vec2::new(100.0, 170.0), Vec2::new(72.0, 14.0));
        ball.rest_on(&paddle);
        assert_eq!(ball.pos, Vec2::new(132.0, 162.0));
        assert_eq!(ball.vel, Vec2::ZERO);
        assert!(!ball.out_of_bounds);
        assert!(ball.trail.is_empty());
    }

    #[test]
    fn test_launch_straight_up() {
        let mut ball = ball_at(100.0, 100.0, 0.0, 0.0);
        ball.launch(90.0, 2.5);
        assert!(ball.vel.x.abs() < 1e-5);
        assert!((ball.vel.y + 2.5).abs() < 1e-5);
    }
}
