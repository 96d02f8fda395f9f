//! Fixed timestep simulation tick
//!
//! Core game loop that advances the state machine and physics by one frame.

use rand::Rng;

use super::reward::{PowerUpKind, REWARD_SPEED_RANGE, Reward, RewardOutcome};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Where the paddle centre should head (mouse x)
    pub target_x: Option<f32>,
    /// Launch the ball from the paddle
    pub launch: bool,
    /// Leave the title screen
    pub start: bool,
    /// New game after game over or win
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.time_ticks += 1;

    if let Some(target) = input.target_x {
        state.paddle.move_toward(target);
    }

    match state.phase {
        GamePhase::Start => {
            if input.start {
                enter_transition(state);
            }
        }
        GamePhase::StageTransition => {
            state.phase_ticks = state.phase_ticks.saturating_sub(1);
            if state.phase_ticks == 0 {
                begin_stage(state);
            }
        }
        GamePhase::Ready => {
            let paddle = state.paddle.bounds();
            state.coordinator.follow(&paddle);
            if input.launch {
                let speed = state.settings.physics.launch_speed;
                state.coordinator.launch(state.aim.angle, speed);
                state.phase = GamePhase::Running;
                state.emit(GameEvent::Launched);
                log::debug!("Launched at {:.0} degrees", state.aim.angle);
            } else {
                state.aim.advance();
            }
        }
        GamePhase::Running => run(state),
        GamePhase::Dropped => {
            state.phase_ticks = state.phase_ticks.saturating_sub(1);
            if state.phase_ticks == 0 {
                state.reset_ball();
                state.phase = GamePhase::Ready;
            }
        }
        GamePhase::GameOver | GamePhase::Win => {
            if input.restart {
                state.start_new_game();
            }
        }
    }
}

fn run(state: &mut GameState) {
    state.streak.tick();
    for kind in state.effects.tick() {
        expire(state, kind);
    }

    for reward in &mut state.rewards {
        reward.update();
    }

    let resolver = state.resolver();
    let outcome = state.coordinator.step(
        &mut state.paddle,
        &mut state.bricks,
        &resolver,
        &state.settings.physics,
        &mut state.rng,
    );

    for event in &outcome.events {
        if matches!(event, GameEvent::BrickDestroyed { .. }) {
            state.stats.bricks_destroyed += 1;
        }
    }
    state.events.extend(outcome.events);

    for release in &outcome.drops {
        spawn_rewards(state, release.positions());
    }
    settle_rewards(state);

    if state.is_stage_cleared() {
        clear_stage(state);
    } else if outcome.life_lost {
        lose_life(state);
    }
}

fn spawn_rewards(state: &mut GameState, positions: impl Iterator<Item = glam::Vec2>) {
    let tuning = state.stages.tuning;
    let accel = state.settings.physics.gravity;
    for pos in positions {
        let id = state.next_entity_id();
        let speed_y = state.rng.random_range(REWARD_SPEED_RANGE);
        let powerup = (state.rng.random_range(1..=100u32) <= tuning.powerup_chance)
            .then(|| PowerUpKind::random(&mut state.rng));
        state
            .rewards
            .push(Reward::new(id, pos, speed_y, accel, tuning.points).with_powerup(powerup));
    }
}

/// Score caught rewards, break the streak on misses, drop both from play
fn settle_rewards(state: &mut GameState) {
    let paddle = state.paddle.bounds();
    // None marks a miss
    let mut settled = Vec::new();
    state.rewards.retain(|reward| match reward.check(&paddle) {
        RewardOutcome::Falling => true,
        RewardOutcome::Caught => {
            settled.push(Some((reward.points, reward.powerup)));
            false
        }
        RewardOutcome::Missed => {
            settled.push(None);
            false
        }
    });

    for entry in settled {
        match entry {
            Some((points, powerup)) => collect_reward(state, points, powerup),
            None => {
                state.streak.reset();
                state.stats.rewards_missed += 1;
                state.emit(GameEvent::RewardMissed);
            }
        }
    }
}

fn collect_reward(state: &mut GameState, points: u32, powerup: Option<PowerUpKind>) {
    let streak = state.streak.hit();
    let bonus = (streak - 1).saturating_mul(state.stages.tuning.streak_bonus);
    let mut earned = points.saturating_add(bonus);

    if let Some(kind) = powerup {
        apply_powerup(state, kind);
    }
    if state.effects.double_points() {
        earned = earned.saturating_mul(2);
    }

    state.stats.score += u64::from(earned);
    state.stats.rewards_caught += 1;
    state.emit(GameEvent::RewardCollected { points: earned, powerup });
}

fn apply_powerup(state: &mut GameState, kind: PowerUpKind) {
    log::info!("Power-up: {:?}", kind);
    match kind {
        PowerUpKind::LifeUp => state.stats.lives += 1,
        PowerUpKind::Antigravity => {
            let ticks = state.stages.tuning.powerup_ticks();
            state.effects.extend(kind, ticks);
            state.coordinator.set_gravity(0.0);
        }
        PowerUpKind::PaddleSpeed => {
            let bonus = state.settings.physics.paddle_speed_bonus;
            state.paddle.boost(bonus);
        }
        PowerUpKind::DoublePoints => {
            let ticks = state.stages.tuning.powerup_ticks();
            state.effects.extend(kind, ticks);
        }
    }
}

fn expire(state: &mut GameState, kind: PowerUpKind) {
    if kind == PowerUpKind::Antigravity {
        let gravity = state.settings.physics.gravity;
        state.coordinator.set_gravity(gravity);
    }
    log::info!("{:?} wore off", kind);
    state.emit(GameEvent::PowerUpExpired(kind));
}

fn clear_stage(state: &mut GameState) {
    for kind in state.disable_timed_effects() {
        state.emit(GameEvent::PowerUpExpired(kind));
    }
    state.streak.reset();

    let stage = state.stage_number();
    state.emit(GameEvent::StageCleared { stage });
    log::info!("Stage {} cleared, score {}", stage, state.stats.score);

    if state.is_last_stage() {
        state.phase = GamePhase::Win;
        state.emit(GameEvent::Won);
        log::info!("All stages cleared");
    } else {
        state.stage_index += 1;
        enter_transition(state);
    }
}

fn lose_life(state: &mut GameState) {
    state.stats.lives = state.stats.lives.saturating_sub(1);
    let lives_left = state.stats.lives;
    state.emit(GameEvent::LifeLost { lives_left });

    if lives_left > 0 {
        log::info!("Ball lost, {} lives left", lives_left);
        state.phase = GamePhase::Dropped;
        state.phase_ticks = DROPPED_TICKS;
    } else {
        log::info!("Game over, final score {}", state.stats.score);
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::GameOver);
    }
}

fn enter_transition(state: &mut GameState) {
    state.phase = GamePhase::StageTransition;
    state.phase_ticks = TRANSITION_TICKS;
}

fn begin_stage(state: &mut GameState) {
    state.load_stage();
    state.reset_ball();
    state.phase = GamePhase::Ready;
    let stage = state.stage_number();
    state.emit(GameEvent::StageStarted { stage });
}

/// Input for a simple computer player: starts the game, launches near a
/// per-stage aim and keeps the paddle under the most urgent ball.
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    match state.phase {
        GamePhase::Start => input.start = true,
        GamePhase::Ready => {
            let target = 50.0 + ((state.stage_index * 37 + state.stats.lives as usize * 13) % 80) as f32;
            input.launch = (state.aim.angle - target).abs() <= 1.0;
        }
        GamePhase::Running => {
            // Lowest ball that is falling, else the lowest ball
            let urgent = state
                .balls()
                .iter()
                .filter(|b| !b.out_of_bounds)
                .max_by(|a, b| {
                    let key = |ball: &super::Ball| (ball.vel.y > 0.0, ball.center().y);
                    key(a)
                        .partial_cmp(&key(b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });

            let ball_is_safe = urgent.is_none_or(|b| b.vel.y <= 0.0 || b.center().y < SCREEN_HEIGHT * 0.4);
            let reward_x = state
                .rewards
                .iter()
                .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal))
                .map(|r| r.bounds().center().x);

            input.target_x = match (ball_is_safe, reward_x, urgent) {
                (true, Some(x), _) => Some(x),
                (_, _, Some(ball)) => {
                    // Wander off centre so the ball doesn't loop straight up and down
                    let phase = state.time_ticks as f32 * 0.01;
                    let offset = (phase.sin() * 0.6 + (phase * 0.7).sin() * 0.3) * state.paddle.body.size.x * 0.5;
                    Some(ball.center().x + offset)
                }
                _ => None,
            };
        }
        _ => {}
    }
    input
}
