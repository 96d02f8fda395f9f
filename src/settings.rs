//! Physics tuning
//!
//! Defaults give the classic arcade feel. Every field can be
//! overridden from a JSON file; missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Error;

/// Longest trail a ball may keep
pub const MAX_TRAIL_LENGTH: usize = 1024;

/// Deflection angles for one face of an obstacle (degrees, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceAngles {
    /// Angle used inside the dead zone
    pub straight: f32,
    /// Extreme angle when the ball travels toward +axis (right, or down)
    pub positive: f32,
    /// Extreme angle when the ball travels toward -axis (left, or up)
    pub negative: f32,
}

impl FaceAngles {
    pub const fn new(straight: f32, positive: f32, negative: f32) -> Self {
        Self {
            straight,
            positive,
            negative,
        }
    }

    /// Extreme angle for an approach direction sign
    #[inline]
    pub fn extreme(&self, direction: i8) -> f32 {
        if direction > 0 {
            self.positive
        } else {
            self.negative
        }
    }
}

/// Angle table for the deflection model.
///
/// The angle for a contact at relative offset `scale` in (0, 1] is
/// `straight + scale * (extreme - straight)`. The values are hand-tuned and
/// deliberately asymmetric: the right face tops out at 50° going up but 250°
/// going down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeflectionTable {
    pub top: FaceAngles,
    pub bottom: FaceAngles,
    pub left: FaceAngles,
    pub right: FaceAngles,
}

impl Default for DeflectionTable {
    fn default() -> Self {
        Self {
            top: FaceAngles::new(90.0, 20.0, 160.0),
            bottom: FaceAngles::new(270.0, 340.0, 200.0),
            left: FaceAngles::new(180.0, 250.0, 110.0),
            right: FaceAngles::new(360.0, 250.0, 410.0),
        }
    }
}

/// Ball, paddle and collision-response constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    // === Ball ===
    /// Added to vertical speed every tick
    pub gravity: f32,
    pub ball_radius: f32,
    /// Speed added on every collision
    pub velocity_increase: f32,
    /// Cap for collision-driven speed increases
    pub max_speed: f32,
    /// Cap on downward speed in free flight
    pub terminal_fall_speed: f32,
    pub launch_speed: f32,
    pub trail_length: usize,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    /// Permanent speed added by the paddle-speed power-up
    pub paddle_speed_bonus: f32,

    // === Collision response ===
    /// Fraction of the penetration depth undone on contact
    pub push_out_damping: f32,
    /// Relative contact offsets below this bounce straight out
    pub dead_zone: f32,
    /// Horizontal speed injected into straight vertical bounces
    pub straight_nudge: f32,
    /// Sweep the tick's displacement in unit sub-steps
    pub substep: bool,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: BALL_GRAVITY,
            ball_radius: BALL_RADIUS,
            velocity_increase: VELOCITY_INCREASE,
            max_speed: MAX_SPEED,
            terminal_fall_speed: TERMINAL_FALL_SPEED,
            launch_speed: LAUNCH_SPEED,
            trail_length: TRAIL_LENGTH,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_speed_bonus: PADDLE_SPEED_BONUS,

            push_out_damping: PUSH_OUT_DAMPING,
            dead_zone: DEAD_ZONE,
            straight_nudge: STRAIGHT_NUDGE,
            substep: true,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsSettings,
    pub deflection: DeflectionTable,
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values that would produce degenerate geometry or physics
    pub fn validate(&self) -> Result<(), Error> {
        let p = &self.physics;
        let positive = [
            ("physics.ball_radius", p.ball_radius),
            ("physics.max_speed", p.max_speed),
            ("physics.terminal_fall_speed", p.terminal_fall_speed),
            ("physics.paddle_width", p.paddle_width),
            ("physics.paddle_height", p.paddle_height),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(Error::InvalidSetting {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }
        let non_negative = [
            ("physics.paddle_speed", p.paddle_speed),
            ("physics.paddle_speed_bonus", p.paddle_speed_bonus),
            ("physics.launch_speed", p.launch_speed),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidSetting {
                    field,
                    reason: "must be finite and not negative",
                });
            }
        }
        if p.trail_length > MAX_TRAIL_LENGTH {
            return Err(Error::InvalidSetting {
                field: "physics.trail_length",
                reason: "longer than 1024 positions",
            });
        }
        if p.paddle_width > SCREEN_WIDTH {
            return Err(Error::InvalidSetting {
                field: "physics.paddle_width",
                reason: "wider than the screen",
            });
        }
        if !(0.0..=1.0).contains(&p.push_out_damping) {
            return Err(Error::InvalidSetting {
                field: "physics.push_out_damping",
                reason: "must be within [0, 1]",
            });
        }
        if !(0.0..1.0).contains(&p.dead_zone) {
            return Err(Error::InvalidSetting {
                field: "physics.dead_zone",
                reason: "must be within [0, 1)",
            });
        }
        if p.velocity_increase < 0.0 {
            return Err(Error::InvalidSetting {
                field: "physics.velocity_increase",
                reason: "cannot be negative",
            });
        }
        if p.gravity < 0.0 {
            return Err(Error::InvalidSetting {
                field: "physics.gravity",
                reason: "cannot be negative",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let s = Settings::default();
        assert_eq!(s.physics.max_speed, MAX_SPEED);
        assert_eq!(s.physics.trail_length, TRAIL_LENGTH);
        assert!(s.physics.substep);
        assert_eq!(s.deflection.top.straight, 90.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "physics": { "max_speed": 3.0 } }"#).unwrap();
        assert_eq!(s.physics.max_speed, 3.0);
        assert_eq!(s.physics.velocity_increase, VELOCITY_INCREASE);
        assert_eq!(s.deflection, DeflectionTable::default());
    }

    #[test]
    fn test_zero_paddle_rejected() {
        let err = Settings::from_json(r#"{ "physics": { "paddle_width": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting {
                field: "physics.paddle_width",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_paddle_speed_rejected() {
        let err = Settings::from_json(r#"{ "physics": { "paddle_speed": -1.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting {
                field: "physics.paddle_speed",
                ..
            }
        ));

        let err = Settings::from_json(r#"{ "physics": { "paddle_speed_bonus": -0.5 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting {
                field: "physics.paddle_speed_bonus",
                ..
            }
        ));

        let err = Settings::from_json(r#"{ "physics": { "launch_speed": -2.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting {
                field: "physics.launch_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_oversized_trail_rejected() {
        let err = Settings::from_json(r#"{ "physics": { "trail_length": 18446744073709551615 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting {
                field: "physics.trail_length",
                ..
            }
        ));

        let json = format!(r#"{{ "physics": {{ "trail_length": {MAX_TRAIL_LENGTH} }} }}"#);
        assert_eq!(
            Settings::from_json(&json).unwrap().physics.trail_length,
            MAX_TRAIL_LENGTH
        );
    }

    #[test]
    fn test_face_extreme_by_direction() {
        let table = DeflectionTable::default();
        assert_eq!(table.top.extreme(1), 20.0);
        assert_eq!(table.top.extreme(-1), 160.0);
        assert_eq!(table.right.extreme(-1), 410.0);
    }
}
