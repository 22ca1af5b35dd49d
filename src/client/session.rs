//! Headless client session: local prediction, remote mirrors, outbox
//!
//! One `ClientSession` is the simulation half of a connected client. It owns
//! the authoritative state of the local player, last-writer-wins mirrors of
//! every remote player and of the ball, and two queues the shell drains:
//! outbound wire messages and presentation events.

use std::collections::{HashMap, VecDeque};

use glam::Vec3;
use tracing::warn;
use uuid::Uuid;

use crate::client::input::FrameInput;
use crate::client::ClientError;
use crate::game::ball::{BallEntity, DribbleContact, KICK_RANGE};
use crate::game::combat::{
    aim_direction, apply_damage, punch_knockback, shot_knockback, CooldownGate, Projectile,
    PROJECTILE_SPAWN_LIFT, PUNCH_DAMAGE, PUNCH_RANGE, SHOOT_DAMAGE,
};
use crate::game::field;
use crate::game::player::{standing_height, PlayerEntity};
use crate::game::ControlIntent;
use crate::ws::protocol::{ClientMsg, CombatKind, PlayerSnapshot, Scores, ServerMsg, Team};

/// Transient happenings the presentation layer reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// The local player took damage; flash the screen
    DamageFlash { health: i32 },
    /// The local player died; a respawn request is already queued
    LocalDied,
    GoalScored(Team),
    ScoresReset,
    /// Transport dropped; remote mirrors were cleared
    ConnectionLost,
}

pub struct ClientSession {
    local_id: Option<Uuid>,
    players: HashMap<Uuid, PlayerEntity>,
    ball: Option<BallEntity>,
    scores: Scores,
    intent: ControlIntent,
    pitch: f32,
    projectiles: Vec<Projectile>,
    cooldowns: CooldownGate,
    outbox: VecDeque<ClientMsg>,
    events: VecDeque<SessionEvent>,
    /// Set while the ball sits in a goal mouth so one crossing reports once
    goal_latched: bool,
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            local_id: None,
            players: HashMap::new(),
            ball: None,
            scores: Scores::default(),
            intent: ControlIntent::neutral(),
            pitch: 0.0,
            projectiles: Vec::new(),
            cooldowns: CooldownGate::new(),
            outbox: VecDeque::new(),
            events: VecDeque::new(),
            goal_latched: false,
        }
    }

    pub fn local_id(&self) -> Option<Uuid> {
        self.local_id
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn player(&self, id: Uuid) -> Option<&PlayerEntity> {
        self.players.get(&id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn ball(&self) -> Option<&BallEntity> {
        self.ball.as_ref()
    }

    pub fn local_player(&self) -> Option<&PlayerEntity> {
        self.local_id.and_then(|id| self.players.get(&id))
    }

    /// Messages queued for the wire; the transport shell drains these
    /// fire-and-forget after every frame.
    pub fn drain_outbox(&mut self) -> Vec<ClientMsg> {
        self.outbox.drain(..).collect()
    }

    /// Presentation events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    /// Run one cooperative frame of the client simulation.
    ///
    /// Any error is contained at the frame boundary: logged, the control
    /// intent reset to neutral, and the loop carries on next frame.
    pub fn frame(&mut self, input: FrameInput, now_ms: u64) {
        if let Err(error) = self.frame_inner(&input, now_ms) {
            warn!(error = %error, "frame failed; resetting control intent");
            self.intent = ControlIntent::neutral();
        }
    }

    fn frame_inner(&mut self, input: &FrameInput, now_ms: u64) -> Result<(), ClientError> {
        // Intent is snapshotted once per tick; handlers never mutate it
        self.intent = input.intent;
        self.pitch = input.pitch;

        let Some(local_id) = self.local_id else {
            // Not yet welcomed by the server; idle frame
            return Ok(());
        };

        let (position, rotation) = {
            let local = self
                .players
                .get_mut(&local_id)
                .ok_or(ClientError::MissingLocalPlayer)?;
            local.yaw += input.yaw_delta;
            local.tick(&input.intent);
            (local.position, local.yaw)
        };

        // The local player reports every frame, settled or not
        self.outbox.push_back(ClientMsg::PlayerUpdate {
            x: position.x,
            y: position.y,
            z: position.z,
            rotation,
        });

        if input.punch {
            self.punch(local_id, now_ms);
        }
        if input.shoot {
            self.shoot(local_id, now_ms);
        }
        self.advance_projectiles(local_id);

        self.tick_ball(local_id, input.kick);

        Ok(())
    }

    /// Melee swing: optimistic knockback on every target in range, reported
    /// per target. No-op while stunned or cooling down.
    fn punch(&mut self, local_id: Uuid, now_ms: u64) {
        let Some(local) = self.players.get(&local_id) else {
            return;
        };
        if local.stunned || !self.cooldowns.try_punch(now_ms) {
            return;
        }
        let origin = local.position;
        let aim = aim_direction(local.yaw, self.pitch);

        let mut reports = Vec::new();
        for (id, target) in self.players.iter_mut() {
            if *id == local_id || origin.distance(target.position) >= PUNCH_RANGE {
                continue;
            }
            let knockback = punch_knockback(aim);
            target.position += knockback;
            reports.push(ClientMsg::Combat {
                kind: CombatKind::Punch,
                target_id: *id,
                damage: PUNCH_DAMAGE,
                knockback: knockback.into(),
            });
        }
        self.outbox.extend(reports);
    }

    /// Fire a projectile from head height along the aim direction
    fn shoot(&mut self, local_id: Uuid, now_ms: u64) {
        let Some(local) = self.players.get(&local_id) else {
            return;
        };
        if local.stunned || !self.cooldowns.try_shoot(now_ms) {
            return;
        }
        let origin = local.position + Vec3::Y * PROJECTILE_SPAWN_LIFT;
        self.projectiles
            .push(Projectile::new(origin, aim_direction(local.yaw, self.pitch)));
    }

    fn advance_projectiles(&mut self, local_id: Uuid) {
        let mut index = 0;
        while index < self.projectiles.len() {
            self.projectiles[index].advance();

            let hit = self
                .players
                .iter()
                .find(|(id, target)| {
                    **id != local_id && self.projectiles[index].hits(target.position)
                })
                .map(|(id, _)| *id);

            if let Some(target_id) = hit {
                let knockback = shot_knockback(self.projectiles[index].direction);
                if let Some(target) = self.players.get_mut(&target_id) {
                    target.position += knockback;
                    target.position.y = target.position.y.max(standing_height());
                    let (health, _) = apply_damage(target.health, SHOOT_DAMAGE);
                    target.health = health;
                }
                self.outbox.push_back(ClientMsg::Combat {
                    kind: CombatKind::Shoot,
                    target_id,
                    damage: SHOOT_DAMAGE,
                    knockback: knockback.into(),
                });
                self.projectiles.swap_remove(index);
            } else if self.projectiles[index].expired() {
                self.projectiles.swap_remove(index);
            } else {
                index += 1;
            }
        }
    }

    fn tick_ball(&mut self, local_id: Uuid, kick: bool) {
        let Some(ball) = self.ball.as_mut() else {
            return;
        };

        if kick {
            if let Some(local) = self.players.get(&local_id) {
                if local.position.distance(ball.position) < KICK_RANGE {
                    ball.kick(local.forward());
                }
            }
        }

        let contacts: Vec<DribbleContact> = self
            .players
            .iter()
            .map(|(id, p)| DribbleContact {
                position: p.position,
                facing: p.forward(),
                moving: *id == local_id && self.intent.any_direction(),
            })
            .collect();
        ball.tick(&contacts);

        if ball.should_broadcast() {
            self.outbox.push_back(ClientMsg::BallUpdate(ball.snapshot()));
        }

        match field::goal_crossed(ball.position) {
            Some(team) if !self.goal_latched => {
                self.goal_latched = true;
                self.outbox.push_back(ClientMsg::GoalScored(team));
                self.events.push_back(SessionEvent::GoalScored(team));
            }
            Some(_) => {}
            None => self.goal_latched = false,
        }
    }

    /// Apply a server message to the mirrors, last writer wins
    pub fn handle_server(&mut self, msg: ServerMsg) {
        match msg {
            ServerMsg::GameState {
                players,
                ball,
                scores,
                your_id,
            } => {
                self.local_id = Some(your_id);
                self.players = players
                    .iter()
                    .map(|snap| (snap.id, PlayerEntity::from_snapshot(snap)))
                    .collect();
                match self.ball.as_mut() {
                    Some(existing) => existing.apply_snapshot(&ball),
                    None => self.ball = Some(BallEntity::from_snapshot(&ball)),
                }
                self.scores = scores;
            }
            ServerMsg::PlayerJoined(snap) => {
                self.add_roster_entry(snap);
            }
            ServerMsg::PlayerMoved {
                id,
                x,
                z,
                rotation,
                ..
            } => {
                if Some(id) != self.local_id {
                    if let Some(player) = self.players.get_mut(&id) {
                        player.apply_remote_position(x, z, rotation);
                    }
                }
            }
            ServerMsg::BallMoved(snap) => match self.ball.as_mut() {
                Some(ball) => ball.apply_snapshot(&snap),
                None => self.ball = Some(BallEntity::from_snapshot(&snap)),
            },
            ServerMsg::PlayerDamaged {
                id,
                health,
                position,
                ..
            } => {
                if let Some(player) = self.players.get_mut(&id) {
                    player.position = position.into();
                }
                self.apply_health(id, health);
            }
            ServerMsg::PlayerRespawned {
                id,
                position,
                health,
            } => {
                if let Some(player) = self.players.get_mut(&id) {
                    player.health = health;
                    player.position = position.into();
                }
            }
            ServerMsg::ScoreUpdate(scores) => {
                self.scores = scores;
            }
            ServerMsg::GameReset(scores) => {
                self.scores = scores;
                self.events.push_back(SessionEvent::ScoresReset);
            }
            ServerMsg::PlayerDisconnected(id) => {
                self.players.remove(&id);
            }
        }
    }

    /// Roster entry from a join notice; duplicates are ignored
    fn add_roster_entry(&mut self, snap: PlayerSnapshot) {
        self.players
            .entry(snap.id)
            .or_insert_with(|| PlayerEntity::from_snapshot(&snap));
    }

    /// Set an entity's health and run local death detection.
    ///
    /// A dead local player respawns immediately (optimistically) and queues
    /// the explicit respawn request for the server.
    fn apply_health(&mut self, id: Uuid, health: i32) {
        let is_local = Some(id) == self.local_id;
        let Some(player) = self.players.get_mut(&id) else {
            return;
        };
        player.health = health;

        if !is_local {
            return;
        }
        self.events.push_back(SessionEvent::DamageFlash { health });

        if health <= 0 {
            player.respawn();
            let position = player.position;
            let team = player.team;
            self.events.push_back(SessionEvent::LocalDied);
            self.outbox.push_back(ClientMsg::PlayerRespawn {
                id,
                position: position.into(),
                team,
            });
        }
    }

    /// Transport dropped: clear every entity and wait for a fresh snapshot.
    /// The ball mirror survives, as the next snapshot re-seeds it anyway.
    pub fn on_disconnect(&mut self) {
        self.players.clear();
        self.local_id = None;
        self.projectiles.clear();
        self.intent = ControlIntent::neutral();
        self.events.push_back(SessionEvent::ConnectionLost);
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}
