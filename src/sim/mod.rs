//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order for balls, bricks and rewards)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod ball;
pub mod collision;
pub mod coordinator;
pub mod durability;
pub mod obstacle;
pub mod reward;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use ball::Ball;
pub use collision::{Contact, Deflection, Detection, Face, Resolver, ratchet};
pub use coordinator::{Coordinator, StepOutcome};
pub use durability::{Durability, HitOutcome};
pub use obstacle::{DeflectionProfile, KindSpec, Obstacle, ObstacleKind, Paddle};
pub use reward::{PowerUpKind, Reward, RewardDrop, RewardOutcome};
pub use state::{ActiveEffects, GameEvent, GamePhase, GameState, LaunchAim, Stats, Streak};
pub use tick::{TickInput, autopilot, tick};
