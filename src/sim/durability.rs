//! Brick durability
//!
//! Health only ever goes down. A brick reports its destruction exactly once;
//! indestructible bricks ignore hits entirely.

use serde::{Deserialize, Serialize};

/// Health state of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Durability {
    /// Still standing. Healthy when `health == max`, damaged below that.
    Intact { health: u8, max: u8 },
    /// Health reached zero
    Destroyed,
    /// Never takes damage (also used for the paddle)
    Indestructible,
}

/// What a single hit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Health dropped but is still positive
    Damaged { remaining: u8 },
    /// Health just reached zero
    Destroyed,
    /// Indestructible, nothing changed
    Deflected,
    /// Already destroyed earlier, nothing changed
    Spent,
}

impl Durability {
    /// Fresh durability for `health` hit points, `None` for indestructible
    pub fn with_health(health: Option<u8>) -> Self {
        match health {
            Some(h) if h > 0 => Durability::Intact { health: h, max: h },
            Some(_) => Durability::Destroyed,
            None => Durability::Indestructible,
        }
    }

    /// Apply one hit
    pub fn hit(&mut self) -> HitOutcome {
        match *self {
            Durability::Intact { health, max } => {
                let remaining = health.saturating_sub(1);
                if remaining == 0 {
                    *self = Durability::Destroyed;
                    HitOutcome::Destroyed
                } else {
                    *self = Durability::Intact {
                        health: remaining,
                        max,
                    };
                    HitOutcome::Damaged { remaining }
                }
            }
            Durability::Destroyed => HitOutcome::Spent,
            Durability::Indestructible => HitOutcome::Deflected,
        }
    }

    /// Remaining health, `None` for indestructible
    pub fn health(&self) -> Option<u8> {
        match *self {
            Durability::Intact { health, .. } => Some(health),
            Durability::Destroyed => Some(0),
            Durability::Indestructible => None,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self, Durability::Destroyed)
    }

    pub fn is_indestructible(&self) -> bool {
        matches!(self, Durability::Indestructible)
    }

    /// True once at least one hit has landed on a destructible brick
    pub fn is_damaged(&self) -> bool {
        matches!(self, Durability::Intact { health, max } if health < max)
    }

    /// Sprite stage for multi-hit bricks: `health - 1`, so 0 is the most worn
    pub fn visual_stage(&self) -> Option<u8> {
        match *self {
            Durability::Intact { health, max } if max > 1 => Some(health - 1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_n_hits_destroy() {
        for n in 1..=5u8 {
            let mut d = Durability::with_health(Some(n));
            let mut destroyed = 0;
            for _ in 0..n {
                if d.hit() == HitOutcome::Destroyed {
                    destroyed += 1;
                }
            }
            assert_eq!(destroyed, 1, "health {n}");
            assert_eq!(d.health(), Some(0));
            // Further hits never signal again
            assert_eq!(d.hit(), HitOutcome::Spent);
            assert_eq!(d.health(), Some(0));
        }
    }

    #[test]
    fn test_health_decreases_monotonically() {
        let mut d = Durability::with_health(Some(3));
        assert!(!d.is_damaged());
        assert_eq!(d.hit(), HitOutcome::Damaged { remaining: 2 });
        assert!(d.is_damaged());
        assert_eq!(d.hit(), HitOutcome::Damaged { remaining: 1 });
        assert_eq!(d.hit(), HitOutcome::Destroyed);
        assert!(d.is_destroyed());
    }

    #[test]
    fn test_indestructible_never_changes() {
        let mut d = Durability::with_health(None);
        for _ in 0..100 {
            assert_eq!(d.hit(), HitOutcome::Deflected);
        }
        assert_eq!(d, Durability::Indestructible);
        assert_eq!(d.health(), None);
    }

    #[test]
    fn test_visual_stage_tracks_health() {
        let mut d = Durability::with_health(Some(3));
        assert_eq!(d.visual_stage(), Some(2));
        d.hit();
        assert_eq!(d.visual_stage(), Some(1));
        d.hit();
        assert_eq!(d.visual_stage(), Some(0));
        d.hit();
        assert_eq!(d.visual_stage(), None);

        // Single-hit bricks have no damage stages
        assert_eq!(Durability::with_health(Some(1)).visual_stage(), None);
    }
}
