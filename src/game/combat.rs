//! Combat model: cooldowns, punches, projectiles, damage bookkeeping
//!
//! Hit detection runs on the attacker's client; the server applies reported
//! damage to its authoritative mirror without validating range or amounts.

use glam::Vec3;

pub const PUNCH_COOLDOWN_MS: u64 = 1000;
pub const SHOOT_COOLDOWN_MS: u64 = 500;

pub const PUNCH_RANGE: f32 = 2.0;
pub const PUNCH_DAMAGE: i32 = 25;

pub const SHOOT_DAMAGE: i32 = 75;
/// Projectile travel per frame
pub const PROJECTILE_SPEED: f32 = 2.5;
pub const PROJECTILE_HIT_RANGE: f32 = 1.0;
/// A projectile farther than this from its origin is discarded
pub const PROJECTILE_MAX_TRAVEL: f32 = 50.0;
/// Projectiles spawn at roughly head height above the shooter's center
pub const PROJECTILE_SPAWN_LIFT: f32 = 1.0;

pub const KNOCKBACK_MAGNITUDE: f32 = 1.0;

/// Aim direction combining yaw with the tracked vertical look angle
pub fn aim_direction(yaw: f32, pitch: f32) -> Vec3 {
    let mut direction = Vec3::new(-yaw.sin(), 0.0, -yaw.cos());
    direction.y = pitch.sin();
    direction.normalize_or_zero()
}

/// Knockback for a punch: full aim direction, one unit
pub fn punch_knockback(aim: Vec3) -> Vec3 {
    aim * KNOCKBACK_MAGNITUDE
}

/// Knockback for a projectile hit: horizontal only
pub fn shot_knockback(aim: Vec3) -> Vec3 {
    Vec3::new(aim.x, 0.0, aim.z) * KNOCKBACK_MAGNITUDE
}

/// Subtract damage from health, flooring at zero.
/// Returns the new health and whether the target died.
pub fn apply_damage(health: i32, damage: i32) -> (i32, bool) {
    let new_health = (health - damage).max(0);
    (new_health, new_health <= 0)
}

/// Per-actor cooldown timestamps for the two combat actions
#[derive(Debug, Clone, Copy, Default)]
pub struct CooldownGate {
    last_punch_ms: Option<u64>,
    last_shot_ms: Option<u64>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and arms the cooldown if a punch is allowed at `now_ms`
    pub fn try_punch(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_punch_ms {
            if now_ms.saturating_sub(last) < PUNCH_COOLDOWN_MS {
                return false;
            }
        }
        self.last_punch_ms = Some(now_ms);
        true
    }

    pub fn try_shoot(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_shot_ms {
            if now_ms.saturating_sub(last) < SHOOT_COOLDOWN_MS {
                return false;
            }
        }
        self.last_shot_ms = Some(now_ms);
        true
    }
}

/// A client-simulated projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    origin: Vec3,
    pub position: Vec3,
    pub direction: Vec3,
}

impl Projectile {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            position: origin,
            direction,
        }
    }

    pub fn advance(&mut self) {
        self.position += self.direction * PROJECTILE_SPEED;
    }

    /// Lifetime bound: distance from the spawn point
    pub fn expired(&self) -> bool {
        self.position.distance(self.origin) > PROJECTILE_MAX_TRAVEL
    }

    pub fn hits(&self, target: Vec3) -> bool {
        self.position.distance(target) < PROJECTILE_HIT_RANGE
    }
}
