//! Player entity simulation: stamina, jumping, yaw-relative movement
//!
//! A `PlayerEntity` is pure simulation state. Each client runs `tick` for its
//! own player only; every other player is a mirror updated from relayed
//! messages. The presentation layer reads position/yaw after the tick.

use glam::Vec3;
use uuid::Uuid;

use crate::game::{field, ControlIntent};
use crate::ws::protocol::{PlayerSnapshot, Team};

pub const PLAYER_HEIGHT: f32 = 2.0;
pub const GROUND_LEVEL: f32 = 0.0;

/// Per-frame movement distances, tuned for ~60 fps
pub const WALK_SPEED: f32 = 0.6;
pub const SPRINT_SPEED: f32 = 1.2;

pub const JUMP_VELOCITY: f32 = 0.9;
pub const JUMP_GRAVITY: f32 = 0.06;
pub const JUMP_STAMINA_COST: f32 = 15.0;

pub const SPRINT_DRAIN: f32 = 1.0;
pub const STAMINA_REGEN: f32 = 0.5;

pub const MAX_HEALTH: i32 = 100;
pub const MAX_STAMINA: f32 = 100.0;

/// Resting height of the entity center above the ground plane
pub fn standing_height() -> f32 {
    GROUND_LEVEL + PLAYER_HEIGHT / 2.0
}

#[derive(Debug, Clone)]
pub struct PlayerEntity {
    pub id: Uuid,
    pub team: Team,
    pub position: Vec3,
    /// Yaw rotation in radians about the Y axis
    pub yaw: f32,
    pub health: i32,
    pub stamina: f32,
    pub stunned: bool,
    pub jumping: bool,
    pub vertical_velocity: f32,
    pub sprinting: bool,
}

impl PlayerEntity {
    /// Fresh entity at the team's join spawn, used by the server at connect
    pub fn new(id: Uuid, team: Team) -> Self {
        Self {
            id,
            team,
            position: field::join_spawn(team),
            yaw: 0.0,
            health: MAX_HEALTH,
            stamina: MAX_STAMINA,
            stunned: false,
            jumping: false,
            vertical_velocity: 0.0,
            sprinting: false,
        }
    }

    /// Roster entry built from a snapshot received over the wire
    ///
    /// Vertical position is pinned to standing height regardless of the
    /// reported `y`; vitals are clamped into their invariant ranges.
    pub fn from_snapshot(snap: &PlayerSnapshot) -> Self {
        Self {
            id: snap.id,
            team: snap.team,
            position: Vec3::new(snap.x, standing_height(), snap.z),
            yaw: snap.rotation,
            health: snap.health.clamp(0, MAX_HEALTH),
            stamina: snap.stamina.clamp(0.0, MAX_STAMINA),
            stunned: snap.stunned,
            jumping: false,
            vertical_velocity: 0.0,
            sprinting: false,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id,
            team: self.team,
            x: self.position.x,
            y: self.position.y,
            z: self.position.z,
            rotation: self.yaw,
            health: self.health,
            stamina: self.stamina,
            stunned: self.stunned,
        }
    }

    /// Horizontal facing direction derived from yaw
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// True when standing on the ground (not mid-jump)
    pub fn grounded(&self) -> bool {
        self.position.y <= standing_height()
    }

    /// Attempt to start a jump; returns whether it was honored.
    ///
    /// Gated on being grounded, not already airborne, and stamina >= cost.
    pub fn try_jump(&mut self) -> bool {
        if self.jumping || !self.grounded() || self.stamina < JUMP_STAMINA_COST {
            return false;
        }
        self.jumping = true;
        self.vertical_velocity = JUMP_VELOCITY;
        self.stamina -= JUMP_STAMINA_COST;
        true
    }

    /// Advance the local player by one frame of the given intent.
    ///
    /// A stunned player is frozen entirely. Order matters: stamina, then the
    /// jump arc, then horizontal movement, then the boundary clamp.
    pub fn tick(&mut self, intent: &ControlIntent) {
        if self.stunned {
            return;
        }

        if intent.jump {
            self.try_jump();
        }

        self.tick_stamina(intent.sprint);
        self.tick_vertical();
        self.tick_horizontal(intent);

        self.position.x = self.position.x.clamp(-field::PLAYER_MAX_X, field::PLAYER_MAX_X);
        self.position.z = self.position.z.clamp(-field::PLAYER_MAX_Z, field::PLAYER_MAX_Z);
    }

    fn tick_stamina(&mut self, sprint: bool) {
        if sprint && self.stamina > 0.0 {
            self.stamina = (self.stamina - SPRINT_DRAIN).max(0.0);
            self.sprinting = true;
        } else {
            self.stamina = (self.stamina + STAMINA_REGEN).min(MAX_STAMINA);
            self.sprinting = false;
        }
    }

    fn tick_vertical(&mut self) {
        if self.jumping {
            self.position.y += self.vertical_velocity;
            self.vertical_velocity -= JUMP_GRAVITY;

            if self.position.y <= standing_height() {
                self.position.y = standing_height();
                self.jumping = false;
                self.vertical_velocity = 0.0;
            }
        } else {
            // Pin to standing height so small errors never accumulate
            self.position.y = standing_height();
        }
    }

    fn tick_horizontal(&mut self, intent: &ControlIntent) {
        let mut direction = Vec3::ZERO;
        let forward = self.forward();
        let right = self.right();

        if intent.forward {
            direction += forward;
        }
        if intent.backward {
            direction -= forward;
        }
        if intent.left {
            direction -= right;
        }
        if intent.right {
            direction += right;
        }

        if direction.length_squared() > 0.0 {
            let speed = if self.sprinting { SPRINT_SPEED } else { WALK_SPEED };
            self.position += direction.normalize() * speed;
        }
    }

    /// Apply a relayed position report for a remote mirror.
    ///
    /// The reported `y` is ignored; remote mirrors stay pinned at standing
    /// height (jump arcs are not replicated).
    pub fn apply_remote_position(&mut self, x: f32, z: f32, rotation: f32) {
        self.position = Vec3::new(x, standing_height(), z);
        self.yaw = rotation;
    }

    /// Reset vitals and teleport to the team's own goal
    pub fn respawn(&mut self) {
        self.health = MAX_HEALTH;
        self.stamina = MAX_STAMINA;
        self.jumping = false;
        self.vertical_velocity = 0.0;
        self.position = field::goal_spawn(self.team);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn local_player() -> PlayerEntity {
        let mut p = PlayerEntity::new(Uuid::new_v4(), Team::Blue);
        p.position = Vec3::new(0.0, standing_height(), 0.0);
        p
    }

    #[test]
    fn jump_requires_stamina() {
        let mut p = local_player();
        p.stamina = 14.0;
        assert!(!p.try_jump());
        assert!(!p.jumping);

        p.stamina = 15.0;
        assert!(p.try_jump());
        assert!(p.jumping);
        assert_approx_eq!(p.stamina, 0.0);
    }

    #[test]
    fn jump_deducts_exactly_cost_and_lands() {
        let mut p = local_player();
        assert!(p.try_jump());
        assert_approx_eq!(p.stamina, MAX_STAMINA - JUMP_STAMINA_COST);

        // No second jump while airborne
        let intent = ControlIntent {
            jump: true,
            ..Default::default()
        };
        p.tick(&intent);
        assert!(p.jumping);
        assert!(p.position.y > standing_height());

        // Run the arc out; the entity must land exactly at standing height
        for _ in 0..120 {
            p.tick(&ControlIntent::neutral());
        }
        assert!(!p.jumping);
        assert_approx_eq!(p.position.y, standing_height());
        assert_approx_eq!(p.vertical_velocity, 0.0);
    }

    #[test]
    fn sprint_drains_and_regenerates() {
        let mut p = local_player();
        let sprint = ControlIntent {
            sprint: true,
            forward: true,
            ..Default::default()
        };
        p.tick(&sprint);
        assert_approx_eq!(p.stamina, MAX_STAMINA - SPRINT_DRAIN);
        assert!(p.sprinting);

        p.tick(&ControlIntent::neutral());
        assert_approx_eq!(p.stamina, MAX_STAMINA - SPRINT_DRAIN + STAMINA_REGEN);
        assert!(!p.sprinting);
    }

    #[test]
    fn sprint_speed_doubles_walk() {
        let mut walker = local_player();
        walker.tick(&ControlIntent {
            forward: true,
            ..Default::default()
        });
        let walked = walker.position.distance(Vec3::new(0.0, standing_height(), 0.0));
        assert_approx_eq!(walked, WALK_SPEED);

        let mut sprinter = local_player();
        sprinter.tick(&ControlIntent {
            forward: true,
            sprint: true,
            ..Default::default()
        });
        let sprinted = sprinter
            .position
            .distance(Vec3::new(0.0, standing_height(), 0.0));
        assert_approx_eq!(sprinted, SPRINT_SPEED);
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut p = local_player();
        p.tick(&ControlIntent {
            forward: true,
            right: true,
            ..Default::default()
        });
        let moved = p.position.distance(Vec3::new(0.0, standing_height(), 0.0));
        assert_approx_eq!(moved, WALK_SPEED, 1e-4);
    }

    #[test]
    fn forward_follows_yaw() {
        let mut p = local_player();
        // Yaw 0 faces negative Z
        p.tick(&ControlIntent {
            forward: true,
            ..Default::default()
        });
        assert!(p.position.z < 0.0);
        assert_approx_eq!(p.position.x, 0.0);

        // Quarter turn: forward now points along negative X
        let mut p = local_player();
        p.yaw = std::f32::consts::FRAC_PI_2;
        p.tick(&ControlIntent {
            forward: true,
            ..Default::default()
        });
        assert_approx_eq!(p.position.x, -WALK_SPEED, 1e-4);
        assert_approx_eq!(p.position.z, 0.0, 1e-4);
    }

    #[test]
    fn stunned_player_is_frozen() {
        let mut p = local_player();
        p.stunned = true;
        let before = p.position;
        p.tick(&ControlIntent {
            forward: true,
            sprint: true,
            jump: true,
            ..Default::default()
        });
        assert_eq!(p.position, before);
        assert_approx_eq!(p.stamina, MAX_STAMINA);
    }

    #[test]
    fn position_clamped_to_field_margin() {
        let mut p = local_player();
        p.position.x = field::PLAYER_MAX_X - 0.1;
        p.yaw = std::f32::consts::FRAC_PI_2; // forward = -X, so backward = +X
        for _ in 0..10 {
            p.tick(&ControlIntent {
                backward: true,
                ..Default::default()
            });
        }
        assert!(p.position.x <= field::PLAYER_MAX_X);
    }

    #[test]
    fn respawn_restores_vitals_at_goal() {
        let mut p = local_player();
        p.health = 0;
        p.stamina = 3.0;
        p.respawn();
        assert_eq!(p.health, MAX_HEALTH);
        assert_approx_eq!(p.stamina, MAX_STAMINA);
        assert_eq!(p.position, field::goal_spawn(Team::Blue));
    }
}
