//! Ball entity simulation: gravity, friction, bounce, dribbling
//!
//! Every client ticks the ball locally; whichever client's copy is moving
//! reports it, and everyone else overwrites their copy with the report.

use glam::Vec3;

use crate::game::field;
use crate::game::player::PLAYER_HEIGHT;
use crate::ws::protocol::BallSnapshot;

pub const BALL_RADIUS: f32 = 0.8;
pub const FRICTION: f32 = 0.98;
pub const GRAVITY: f32 = 0.02;
/// Fraction of speed retained on a bounce
pub const BOUNCE_ENERGY: f32 = 0.7;

pub const DRIBBLE_FORCE: f32 = 0.3;
/// A player this close to the ball nudges it
pub const DRIBBLE_RANGE: f32 = PLAYER_HEIGHT / 2.0 + BALL_RADIUS;

pub const KICK_RANGE: f32 = 2.0;
pub const KICK_FORCE: f32 = 2.0;
pub const KICK_LIFT: f32 = 0.3;

/// Below this speed the ball is considered settled and not worth reporting
pub const BROADCAST_THRESHOLD: f32 = 0.01;

/// A nearby player as seen by the ball tick
#[derive(Debug, Clone, Copy)]
pub struct DribbleContact {
    pub position: Vec3,
    pub facing: Vec3,
    /// Whether the player has any directional intent this frame
    pub moving: bool,
}

#[derive(Debug, Clone)]
pub struct BallEntity {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl BallEntity {
    /// Ball resting at the center spot
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, BALL_RADIUS, 0.0),
            velocity: Vec3::ZERO,
        }
    }

    /// Build from a wire snapshot; the reported `y` is ground-relative
    pub fn from_snapshot(snap: &BallSnapshot) -> Self {
        let mut ball = Self::new();
        ball.apply_snapshot(snap);
        ball
    }

    pub fn apply_snapshot(&mut self, snap: &BallSnapshot) {
        self.position = Vec3::new(snap.x, snap.y + BALL_RADIUS, snap.z);
        self.velocity = Vec3::new(snap.velocity_x, snap.velocity_y, snap.velocity_z);
    }

    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            x: self.position.x,
            y: self.position.y - BALL_RADIUS,
            z: self.position.z,
            velocity_x: self.velocity.x,
            velocity_y: self.velocity.y,
            velocity_z: self.velocity.z,
        }
    }

    /// Advance one frame: gravity, friction, integration, collisions.
    ///
    /// `contacts` is the world context for dribbling - every player's
    /// position and facing, with `moving` set only for players whose intent
    /// is known (the local one).
    pub fn tick(&mut self, contacts: &[DribbleContact]) {
        self.velocity.y -= GRAVITY;
        self.velocity *= FRICTION;
        self.position += self.velocity;

        // Ground bounce: always reflect upward
        if self.position.y <= BALL_RADIUS {
            self.position.y = BALL_RADIUS;
            self.velocity.y = self.velocity.y.abs() * BOUNCE_ENERGY;
        }

        for contact in contacts {
            let offset = self.position - contact.position;
            if offset.length() < DRIBBLE_RANGE {
                // A moving player carries the ball along their facing
                if contact.moving {
                    self.velocity += contact.facing * DRIBBLE_FORCE;
                }
                if let Some(away) = offset.try_normalize() {
                    self.velocity += away * DRIBBLE_FORCE;
                }
            }
        }

        if self.position.x.abs() > field::BALL_MAX_X {
            self.position.x = self.position.x.signum() * field::BALL_MAX_X;
            self.velocity.x *= -BOUNCE_ENERGY;
        }
        if self.position.z.abs() > field::BALL_MAX_Z {
            self.position.z = self.position.z.signum() * field::BALL_MAX_Z;
            self.velocity.z *= -BOUNCE_ENERGY;
        }
    }

    /// Whether this frame's state is worth putting on the wire
    pub fn should_broadcast(&self) -> bool {
        self.velocity.length() > BROADCAST_THRESHOLD
    }

    /// Replace the ball's velocity with a kick along the kicker's facing.
    ///
    /// The caller enforces the kick range. The lift is applied after
    /// normalizing the facing, so hard kicks stay mostly flat.
    pub fn kick(&mut self, facing: Vec3) {
        let mut direction = facing.normalize_or_zero();
        direction.y = KICK_LIFT;
        self.velocity = direction * KICK_FORCE;
    }
}

impl Default for BallEntity {
    fn default() -> Self {
        Self::new()
    }
}
