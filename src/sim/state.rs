//! Game state and core simulation types
//!
//! Everything that must be reproduced from a seed lives here: the RNG,
//! stage progress, the paddle, balls, bricks and falling rewards.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::Resolver;
use super::coordinator::Coordinator;
use super::obstacle::{Obstacle, ObstacleKind, Paddle};
use super::reward::{PowerUpKind, Reward};
use crate::consts::*;
use crate::error::Error;
use crate::settings::Settings;
use crate::stage::StageSet;

/// Rewards released per destroyed brick, drawn at stage load
const MIN_REWARDS_PER_BRICK: u8 = 2;
const MAX_REWARDS_PER_BRICK: u8 = 4;

/// Launch aim sweeps back and forth across the upper half circle
const AIM_MIN: f32 = 0.0;
const AIM_MAX: f32 = 180.0;
const AIM_STEP: f32 = 2.0;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start input
    Start,
    /// Pause between stages
    StageTransition,
    /// Ball resting on the paddle, waiting for launch
    Ready,
    /// Active gameplay
    Running,
    /// Pause after losing a life
    Dropped,
    GameOver,
    /// Final stage cleared
    Win,
}

/// Things that happened during a tick, for rendering and audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched,
    PaddleHit,
    BrickHit { id: u32 },
    BrickDestroyed { id: u32, kind: ObstacleKind },
    BallSpawned { id: u32 },
    RewardCollected { points: u32, powerup: Option<PowerUpKind> },
    RewardMissed,
    PowerUpExpired(PowerUpKind),
    LifeLost { lives_left: u32 },
    StageCleared { stage: usize },
    StageStarted { stage: usize },
    GameOver,
    Won,
}

/// Per-game totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub score: u64,
    pub lives: u32,
    pub bricks_destroyed: u32,
    pub rewards_caught: u32,
    pub rewards_missed: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            bricks_destroyed: 0,
            rewards_caught: 0,
            rewards_missed: 0,
        }
    }
}

/// Timed power-ups, as remaining ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub antigravity_remaining: Option<u32>,
    pub double_points_remaining: Option<u32>,
}

impl ActiveEffects {
    pub fn antigravity(&self) -> bool {
        self.antigravity_remaining.is_some()
    }

    pub fn double_points(&self) -> bool {
        self.double_points_remaining.is_some()
    }

    /// Start or lengthen a timed effect. Durations stack.
    pub fn extend(&mut self, kind: PowerUpKind, ticks: u32) {
        let Some(slot) = self.slot(kind) else {
            return;
        };
        *slot = Some(slot.unwrap_or(0).saturating_add(ticks));
    }

    /// Count down one tick, returning the effects that ran out
    pub fn tick(&mut self) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in [PowerUpKind::Antigravity, PowerUpKind::DoublePoints] {
            let Some(slot) = self.slot(kind) else {
                continue;
            };
            if let Some(remaining) = *slot {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    *slot = None;
                    expired.push(kind);
                } else {
                    *slot = Some(remaining);
                }
            }
        }
        expired
    }

    /// Cancel everything, returning what was active
    pub fn clear(&mut self) -> Vec<PowerUpKind> {
        let mut active = Vec::new();
        if self.antigravity_remaining.take().is_some() {
            active.push(PowerUpKind::Antigravity);
        }
        if self.double_points_remaining.take().is_some() {
            active.push(PowerUpKind::DoublePoints);
        }
        active
    }

    fn slot(&mut self, kind: PowerUpKind) -> Option<&mut Option<u32>> {
        match kind {
            PowerUpKind::Antigravity => Some(&mut self.antigravity_remaining),
            PowerUpKind::DoublePoints => Some(&mut self.double_points_remaining),
            PowerUpKind::LifeUp | PowerUpKind::PaddleSpeed => None,
        }
    }
}

/// Consecutive catches without a miss
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub count: u32,
    /// Ticks left to show the streak banner
    pub display_ticks: u32,
}

impl Streak {
    /// Count a catch and return the new streak length
    pub fn hit(&mut self) -> u32 {
        self.count += 1;
        self.display_ticks = STREAK_DISPLAY_TICKS;
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn tick(&mut self) {
        self.display_ticks = self.display_ticks.saturating_sub(1);
    }

    /// Banner shown (only for streaks of two or more)
    pub fn visible(&self) -> bool {
        self.count > 1 && self.display_ticks > 0
    }
}

/// Launch direction indicator, oscillating 0..=180 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchAim {
    pub angle: f32,
    step: f32,
}

impl Default for LaunchAim {
    fn default() -> Self {
        Self {
            angle: AIM_MIN,
            step: AIM_STEP,
        }
    }
}

impl LaunchAim {
    pub fn advance(&mut self) {
        self.angle += self.step;
        if self.angle >= AIM_MAX {
            self.angle = AIM_MAX;
            self.step = -AIM_STEP;
        } else if self.angle <= AIM_MIN {
            self.angle = AIM_MIN;
            self.step = AIM_STEP;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub stages: StageSet,
    /// Current stage (0-based)
    pub stage_index: usize,
    pub phase: GamePhase,
    /// Ticks left in a timed phase (stage transition, dropped)
    pub phase_ticks: u32,
    pub stats: Stats,
    pub paddle: Paddle,
    pub coordinator: Coordinator,
    pub bricks: Vec<Obstacle>,
    pub rewards: Vec<Reward>,
    pub effects: ActiveEffects,
    pub streak: Streak,
    pub aim: LaunchAim,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised during the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game on the title screen. Settings are assumed validated.
    pub fn new(seed: u64, stages: StageSet, settings: Settings) -> Self {
        let paddle = Paddle::new(&settings.physics);
        let coordinator = Coordinator::new(&settings.physics);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            stages,
            stage_index: 0,
            phase: GamePhase::Start,
            phase_ticks: 0,
            stats: Stats::default(),
            paddle,
            coordinator,
            bricks: Vec::new(),
            rewards: Vec::new(),
            effects: ActiveEffects::default(),
            streak: Streak::default(),
            aim: LaunchAim::default(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.start_new_game();
        state
    }

    /// New game with the built-in stages and default tuning
    pub fn with_builtin_stages(seed: u64) -> Result<Self, Error> {
        Ok(Self::new(seed, StageSet::builtin()?, Settings::default()))
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset score, lives and progress and go back to the title screen
    pub fn start_new_game(&mut self) {
        self.stats = Stats::default();
        self.paddle.reset_speed();
        self.rewards.clear();
        self.disable_timed_effects();
        self.streak.reset();
        self.stage_index = 0;
        self.load_stage();
        self.reset_ball();
        self.phase = GamePhase::Start;
        self.phase_ticks = 0;
        log::info!("New game (seed {})", self.seed);
    }

    /// Build the bricks of the current stage
    pub fn load_stage(&mut self) {
        self.bricks.clear();
        let Some(layout) = self.stages.stage(self.stage_index) else {
            log::warn!("Stage {} does not exist", self.stage_number());
            return;
        };

        let placements = layout.bricks.clone();
        for placement in placements {
            // Stage files are validated on load
            let Some(kind) = placement.kind() else {
                continue;
            };
            let id = self.next_entity_id();
            let rewards = self
                .rng
                .random_range(MIN_REWARDS_PER_BRICK..=MAX_REWARDS_PER_BRICK);
            let pos = glam::Vec2::new(placement.x, placement.y);
            self.bricks.push(Obstacle::brick(id, pos, kind, rewards));
        }
        log::info!(
            "Loaded stage {} ({} bricks)",
            self.stage_number(),
            self.bricks.len()
        );
    }

    /// Single ball back on the paddle, aim reset
    pub fn reset_ball(&mut self) {
        let paddle = self.paddle.bounds();
        self.coordinator
            .reset_to_single(&paddle, &self.settings.physics);
        self.coordinator.set_gravity(self.world_gravity());
        self.aim.reset();
    }

    /// Turn off antigravity and double points, returning what was active
    pub fn disable_timed_effects(&mut self) -> Vec<PowerUpKind> {
        let active = self.effects.clear();
        self.coordinator.set_gravity(self.settings.physics.gravity);
        active
    }

    /// Gravity applied to balls right now
    pub fn world_gravity(&self) -> f32 {
        if self.effects.antigravity() {
            0.0
        } else {
            self.settings.physics.gravity
        }
    }

    pub fn balls(&self) -> &[Ball] {
        &self.coordinator.balls
    }

    /// 1-based stage number for display
    pub fn stage_number(&self) -> usize {
        self.stage_index + 1
    }

    pub fn is_last_stage(&self) -> bool {
        self.stage_index + 1 >= self.stages.len()
    }

    /// No destructible bricks left and nothing still falling
    pub fn is_stage_cleared(&self) -> bool {
        !self.bricks.iter().any(Obstacle::counts_for_clear) && self.rewards.is_empty()
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::from_settings(&self.settings)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{BrickPlacement, StageLayout, StageTuning};

    fn stage_set(stages: Vec<Vec<(f32, f32, u8)>>) -> StageSet {
        StageSet {
            tuning: StageTuning {
                points: 10,
                powerup_seconds: 10,
                powerup_chance: 0,
                streak_bonus: 5,
            },
            stages: stages
                .into_iter()
                .map(|bricks| StageLayout {
                    bricks: bricks
                        .into_iter()
                        .map(|(x, y, brick_type)| BrickPlacement { x, y, brick_type })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_new_game_on_title_screen() {
        let set = stage_set(vec![vec![(40.0, 30.0, 1), (80.0, 30.0, 4)]]);
        let state = GameState::new(1, set, Settings::default());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.stats.lives, STARTING_LIVES);
        assert_eq!(state.bricks.len(), 2);
        assert_eq!(state.balls().len(), 1);
        assert_eq!(state.balls()[0].vel, glam::Vec2::ZERO);
        for brick in &state.bricks {
            assert!((MIN_REWARDS_PER_BRICK..=MAX_REWARDS_PER_BRICK).contains(&brick.rewards));
        }
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let set = stage_set(vec![vec![(40.0, 30.0, 1), (80.0, 30.0, 2), (120.0, 30.0, 3)]]);
        let mut state = GameState::new(1, set, Settings::default());
        let mut ids: Vec<u32> = state.bricks.iter().map(|b| b.id).collect();
        ids.push(state.next_entity_id());
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_stage_clear_ignores_indestructible() {
        let set = stage_set(vec![vec![(40.0, 30.0, 4), (80.0, 30.0, 4)]]);
        let mut state = GameState::new(1, set, Settings::default());
        assert!(state.is_stage_cleared());

        state
            .rewards
            .push(Reward::new(99, glam::Vec2::new(10.0, 10.0), 0.5, 0.01, 10));
        assert!(!state.is_stage_cleared(), "rewards still falling");
    }

    #[test]
    fn test_effects_stack_and_expire() {
        let mut effects = ActiveEffects::default();
        effects.extend(PowerUpKind::Antigravity, 2);
        effects.extend(PowerUpKind::Antigravity, 3);
        effects.extend(PowerUpKind::LifeUp, 100);
        assert_eq!(effects.antigravity_remaining, Some(5));
        assert!(!effects.double_points());

        for _ in 0..4 {
            assert!(effects.tick().is_empty());
        }
        assert_eq!(effects.tick(), vec![PowerUpKind::Antigravity]);
        assert!(!effects.antigravity());
        assert!(effects.tick().is_empty());
    }

    #[test]
    fn test_effects_clear_reports_active() {
        let mut effects = ActiveEffects::default();
        effects.extend(PowerUpKind::DoublePoints, 10);
        assert_eq!(effects.clear(), vec![PowerUpKind::DoublePoints]);
        assert_eq!(effects, ActiveEffects::default());
    }

    #[test]
    fn test_streak_counts_and_fades() {
        let mut streak = Streak::default();
        assert_eq!(streak.hit(), 1);
        assert!(!streak.visible());
        assert_eq!(streak.hit(), 2);
        assert!(streak.visible());
        for _ in 0..STREAK_DISPLAY_TICKS {
            streak.tick();
        }
        assert!(!streak.visible());
        assert_eq!(streak.count, 2);
        streak.reset();
        assert_eq!(streak.count, 0);
    }

    #[test]
    fn test_launch_aim_oscillates() {
        let mut aim = LaunchAim::default();
        for _ in 0..90 {
            aim.advance();
        }
        assert_eq!(aim.angle, 180.0);
        aim.advance();
        assert_eq!(aim.angle, 178.0);
        for _ in 0..89 {
            aim.advance();
        }
        assert_eq!(aim.angle, 0.0);
        aim.advance();
        assert_eq!(aim.angle, 2.0);
    }

    #[test]
    fn test_antigravity_zeroes_ball_gravity_on_reset() {
        let set = stage_set(vec![vec![(40.0, 30.0, 1)]]);
        let mut state = GameState::new(1, set, Settings::default());
        state.effects.extend(PowerUpKind::Antigravity, 60);
        state.reset_ball();
        assert_eq!(state.balls()[0].gravity, 0.0);

        state.disable_timed_effects();
        assert_eq!(state.balls()[0].gravity, state.settings.physics.gravity);
    }

    #[test]
    fn test_state_serializes() {
        let set = stage_set(vec![vec![(40.0, 30.0, 1)]]);
        let state = GameState::new(5, set, Settings::default());
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.bricks.len(), state.bricks.len());
        assert_eq!(restored.seed, 5);
    }
}
