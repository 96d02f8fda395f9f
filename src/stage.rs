//! Stage definitions
//!
//! A stage file carries the game-wide reward tuning and an ordered list of
//! brick layouts:
//!
//! ```json
//! { "P": 10, "G": 10, "X": 15, "Q": 5,
//!   "stages": [ { "bricks": [ { "x": 33, "y": 30, "brick_type": 1 } ] } ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, TICK_RATE};
use crate::error::Error;
use crate::sim::ObstacleKind;

const BUILTIN_STAGES: &str = include_str!("../assets/stages.json");

/// Reward tuning shared by every stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTuning {
    /// Points per reward caught
    #[serde(rename = "P")]
    pub points: u32,
    /// Timed power-up duration in seconds
    #[serde(rename = "G")]
    pub powerup_seconds: u32,
    /// Percent chance that a reward carries a power-up
    #[serde(rename = "X")]
    pub powerup_chance: u32,
    /// Bonus per consecutive catch
    #[serde(rename = "Q")]
    pub streak_bonus: u32,
}

impl StageTuning {
    /// Timed power-up duration in ticks
    pub fn powerup_ticks(&self) -> u32 {
        self.powerup_seconds.saturating_mul(TICK_RATE)
    }
}

/// One brick in a layout; `(x, y)` is its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickPlacement {
    pub x: f32,
    pub y: f32,
    pub brick_type: u8,
}

impl BrickPlacement {
    /// Obstacle kind, checked at load so this is always `Some` for loaded stages
    pub fn kind(&self) -> Option<ObstacleKind> {
        ObstacleKind::from_brick_type(self.brick_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageLayout {
    pub bricks: Vec<BrickPlacement>,
}

/// A validated, ordered set of stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSet {
    #[serde(flatten)]
    pub tuning: StageTuning,
    pub stages: Vec<StageLayout>,
}

impl StageSet {
    /// The stages shipped with the game
    pub fn builtin() -> Result<Self, Error> {
        Self::from_json(BUILTIN_STAGES)
    }

    /// Read and validate a stage file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        log::info!("Loading stages from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let mut set: StageSet = serde_json::from_str(json)?;
        set.validate()?;
        Ok(set)
    }

    fn validate(&mut self) -> Result<(), Error> {
        if self.stages.is_empty() {
            return Err(Error::NoStages);
        }

        if self.tuning.powerup_chance > 100 {
            log::warn!(
                "Power-up chance {}% clamped to 100%",
                self.tuning.powerup_chance
            );
            self.tuning.powerup_chance = 100;
        }

        for (stage, layout) in self.stages.iter().enumerate() {
            if layout.bricks.is_empty() {
                log::warn!("Stage {} has no bricks and clears immediately", stage + 1);
            }
            for (index, brick) in layout.bricks.iter().enumerate() {
                let Some(kind) = brick.kind() else {
                    return Err(Error::UnknownBrickType {
                        stage,
                        index,
                        value: brick.brick_type,
                    });
                };
                let spec = kind.spec();
                if brick.x < 0.0
                    || brick.y < 0.0
                    || brick.x + spec.width > SCREEN_WIDTH
                    || brick.y + spec.height > SCREEN_HEIGHT
                {
                    log::warn!(
                        "Stage {}: brick {} at ({}, {}) extends off screen",
                        stage + 1,
                        index,
                        brick.x,
                        brick.y
                    );
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage(&self, index: usize) -> Option<&StageLayout> {
        self.stages.get(index)
    }
}
