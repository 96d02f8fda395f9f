//! Collision detection and response between the ball and rectangular obstacles
//!
//! The tricky part of the game. Each tick the ball's displacement is swept in
//! unit sub-steps so a fast ball cannot skip over a thin brick. On the first
//! overlapping sub-step the struck face is picked by minimum penetration, the
//! ball is pushed back out, and a new direction is chosen from where along the
//! face it landed rather than by mirror reflection: centre hits bounce
//! straight, edge hits bounce at sharp angles.

use glam::Vec2;

use super::aabb::Aabb;
use super::ball::Ball;
use super::durability::HitOutcome;
use super::obstacle::{DeflectionProfile, Obstacle};
use crate::consts::MAX_SUBSTEPS;
use crate::settings::{DeflectionTable, FaceAngles, Settings};

/// How overlap is searched for along a tick's displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Test only the post-tick position
    SingleStep,
    /// Test `ceil(max(|vx|, |vy|))` evenly spaced positions, stop at the first hit
    SubStepped,
}

/// Face of the obstacle that was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Top,
    Bottom,
    Left,
    Right,
}

impl Face {
    /// True for top/bottom hits, where the contact runs along x
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Face::Top | Face::Bottom)
    }

    /// True for the top and left faces
    #[inline]
    pub fn is_upper(self) -> bool {
        matches!(self, Face::Top | Face::Left)
    }
}

/// A detected contact, consumed immediately by the response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub face: Face,
    /// Contact coordinate along the face (x for top/bottom, y for sides)
    pub contact: f32,
    /// Penetration depth along the collision axis
    pub penetration: f32,
}

/// Outgoing direction chosen by the angle model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deflection {
    /// Degrees, 0 = right, 90 = up
    pub angle: f32,
    /// The face's straight-out angle was used
    pub straight: bool,
}

/// Ball vs obstacle collision resolver
#[derive(Debug, Clone)]
pub struct Resolver {
    pub detection: Detection,
    /// Fraction of the penetration undone on contact (< 1 to avoid edge jitter)
    pub push_out_damping: f32,
    pub dead_zone: f32,
    pub straight_nudge: f32,
    pub table: DeflectionTable,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Resolver {
    pub fn from_settings(settings: &Settings) -> Self {
        let physics = &settings.physics;
        Self {
            detection: if physics.substep {
                Detection::SubStepped
            } else {
                Detection::SingleStep
            },
            push_out_damping: physics.push_out_damping,
            dead_zone: physics.dead_zone,
            straight_nudge: physics.straight_nudge,
            table: settings.deflection,
        }
    }

    /// Number of sweep sub-steps for a displacement; 0 when not moving
    pub fn substep_count(vel: Vec2) -> u32 {
        let extent = vel.x.abs().max(vel.y.abs());
        if !extent.is_finite() || extent <= 0.0 {
            return 0;
        }
        (extent.ceil() as u32).clamp(1, MAX_SUBSTEPS)
    }

    /// Ball box at the first position along this tick's displacement that
    /// overlaps `target`
    pub fn sweep(&self, ball: &Ball, target: &Aabb) -> Option<Aabb> {
        match self.detection {
            Detection::SingleStep => {
                let probe = ball.bounds_at(ball.pos + ball.vel);
                probe.overlaps(target).then_some(probe)
            }
            Detection::SubStepped => {
                let steps = Self::substep_count(ball.vel);
                (1..=steps)
                    .map(|k| ball.bounds_at(ball.pos + ball.vel * (k as f32 / steps as f32)))
                    .find(|probe| probe.overlaps(target))
            }
        }
    }

    /// Resolve one ball/obstacle pair. Returns false and changes nothing on a
    /// miss.
    pub fn resolve(&self, ball: &mut Ball, obstacle: &mut Obstacle) -> bool {
        self.resolve_contact(ball, obstacle).is_some()
    }

    /// Like [`Resolver::resolve`], also returning the contact that was handled
    pub fn resolve_contact(&self, ball: &mut Ball, obstacle: &mut Obstacle) -> Option<Contact> {
        let target = obstacle.bounds();
        let probe = self.sweep(ball, &target)?;
        let contact = classify(&probe, &target);

        // Back out of the obstacle, short of the full depth
        let push = contact.penetration * self.push_out_damping;
        match contact.face {
            Face::Top => ball.pos.y -= push,
            Face::Bottom => ball.pos.y += push,
            Face::Left => ball.pos.x -= push,
            Face::Right => ball.pos.x += push,
        }

        let scale = relative_offset(&contact, &target).abs().min(1.0);
        let deflection = self.deflection(contact.face, scale, ball.direction, obstacle.profile());
        let speed = ball.speed();
        ball.vel = crate::screen_direction(deflection.angle) * speed;
        if deflection.straight && contact.face.is_horizontal() {
            // Never let the ball settle into a purely vertical loop
            ball.vel.x += self.straight_nudge * f32::from(ball.direction.0);
        }

        if obstacle.kind.is_brick() {
            match obstacle.durability.hit() {
                HitOutcome::Destroyed => ball.destroy_brick = true,
                HitOutcome::Damaged { remaining } => {
                    log::trace!("Brick {} damaged, {} hp left", obstacle.id, remaining);
                }
                HitOutcome::Deflected | HitOutcome::Spent => {}
            }
        }

        ball.vel = ratchet(ball.vel, ball.velocity_increase, ball.max_speed);
        ball.sync_direction();

        log::trace!(
            "Ball {} hit {:?} {} on {:?} (scale {:.2}, angle {:.1})",
            ball.id,
            obstacle.kind,
            obstacle.id,
            contact.face,
            scale,
            crate::normalize_degrees(deflection.angle)
        );

        Some(contact)
    }

    /// Outgoing angle for a hit on `face` at relative offset `scale` in [0, 1]
    pub fn deflection(
        &self,
        face: Face,
        scale: f32,
        direction: (i8, i8),
        profile: DeflectionProfile,
    ) -> Deflection {
        let angles = self.face_angles(face);

        if face == Face::Bottom && profile == DeflectionProfile::Paddle {
            return Deflection {
                angle: angles.straight,
                straight: true,
            };
        }
        if scale < self.dead_zone {
            return Deflection {
                angle: angles.straight,
                straight: true,
            };
        }

        // Top/bottom bends by horizontal travel, sides by vertical travel
        let approach = if face.is_horizontal() {
            direction.0
        } else {
            direction.1
        };
        let extreme = angles.extreme(approach);
        Deflection {
            angle: angles.straight + scale * (extreme - angles.straight),
            straight: false,
        }
    }

    fn face_angles(&self, face: Face) -> &FaceAngles {
        match face {
            Face::Top => &self.table.top,
            Face::Bottom => &self.table.bottom,
            Face::Left => &self.table.left,
            Face::Right => &self.table.right,
        }
    }
}

/// Pick the struck face from a ball box overlapping `target`.
///
/// The axis with the smaller penetration is the collision axis. When the
/// edge tests are inconclusive (the probe already straddles the edge) the
/// side is picked by comparing centres.
pub fn classify(probe: &Aabb, target: &Aabb) -> Contact {
    let pen = probe.penetration(target);
    let point = probe.contact_point(target);

    if pen.y < pen.x {
        let face = if probe.bottom() >= target.top() && target.top() > probe.top() {
            Face::Top
        } else if probe.top() <= target.bottom() && target.bottom() < probe.bottom() {
            Face::Bottom
        } else if probe.center().y < target.center().y {
            Face::Top
        } else {
            Face::Bottom
        };
        Contact {
            face,
            contact: point.x,
            penetration: pen.y,
        }
    } else {
        let face = if probe.left() <= target.right() && target.right() < probe.right() {
            Face::Right
        } else if probe.right() >= target.left() && target.left() > probe.left() {
            Face::Left
        } else if probe.center().x > target.center().x {
            Face::Right
        } else {
            Face::Left
        };
        Contact {
            face,
            contact: point.y,
            penetration: pen.x,
        }
    }
}

/// Contact offset from the face centre, normalized by the half extent
pub fn relative_offset(contact: &Contact, target: &Aabb) -> f32 {
    let (center, half) = if contact.face.is_horizontal() {
        (target.center().x, target.half_extents().x)
    } else {
        (target.center().y, target.half_extents().y)
    };
    (contact.contact - center) / half
}

/// Raise speed by `increase`, capped at `max_speed`, keeping direction.
/// A stationary velocity is returned unchanged.
pub fn ratchet(vel: Vec2, increase: f32, max_speed: f32) -> Vec2 {
    let current = vel.length();
    if current == 0.0 {
        return vel;
    }
    let target = (current + increase).min(max_speed);
    vel * (target / current)
}
