//! Relay state machine: authoritative roster, ball and score bookkeeping
//!
//! The server simulates nothing. Each inbound message mutates `MatchState`
//! under one lock and is fanned out to the other connections; clients own
//! the physics of their own player and of whichever ball copy is moving.
//! Position, damage and goal reports are trusted as received.

use std::collections::HashMap;

use dashmap::DashMap;
use glam::Vec3;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::game::combat::apply_damage;
use crate::game::field;
use crate::game::player::MAX_HEALTH;
use crate::game::PlayerEntity;
use crate::ws::protocol::{
    BallSnapshot, ClientMsg, PlayerSnapshot, Scores, ServerMsg, Team, WireVec3,
};

/// First team to reach this many goals triggers a score reset
pub const SCORE_LIMIT: u32 = 20;

/// Authoritative mirror of the shared match
#[derive(Debug, Default)]
pub struct MatchState {
    pub players: HashMap<Uuid, PlayerSnapshot>,
    pub ball: BallSnapshot,
    pub scores: Scores,
}

impl MatchState {
    /// Team for the next joiner: parity of the current roster size
    pub fn next_team(&self) -> Team {
        if self.players.len() % 2 == 0 {
            Team::Blue
        } else {
            Team::Red
        }
    }
}

type PeerSender = mpsc::UnboundedSender<ServerMsg>;

/// The relay server: match state plus the fan-out registry
pub struct GameServer {
    state: Mutex<MatchState>,
    peers: DashMap<Uuid, PeerSender>,
}

impl GameServer {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MatchState::default()),
            peers: DashMap::new(),
        }
    }

    pub fn player_count(&self) -> usize {
        self.state.lock().players.len()
    }

    pub fn scores(&self) -> Scores {
        self.state.lock().scores
    }

    /// Accept a connection: assign a team, insert the roster entry, send the
    /// full snapshot to the new peer and announce it to everyone else.
    pub fn connect(&self, conn_id: Uuid, tx: PeerSender) {
        let (snapshot_msg, joined) = {
            let mut state = self.state.lock();
            let team = state.next_team();
            let entry = PlayerEntity::new(conn_id, team).snapshot();
            state.players.insert(conn_id, entry.clone());

            let snapshot_msg = ServerMsg::GameState {
                players: state.players.values().cloned().collect(),
                ball: state.ball,
                scores: state.scores,
                your_id: conn_id,
            };
            (snapshot_msg, entry)
        };

        info!(conn_id = %conn_id, team = ?joined.team, "player connected");

        let _ = tx.send(snapshot_msg);
        self.peers.insert(conn_id, tx);
        self.broadcast_except(Some(conn_id), ServerMsg::PlayerJoined(joined));
    }

    /// Terminal transition: drop the roster entry and tell everyone.
    /// Messages from this connection are no longer processed.
    pub fn disconnect(&self, conn_id: Uuid) {
        self.peers.remove(&conn_id);
        let removed = self.state.lock().players.remove(&conn_id).is_some();
        if removed {
            info!(conn_id = %conn_id, "player disconnected");
            self.broadcast_except(None, ServerMsg::PlayerDisconnected(conn_id));
        }
    }

    /// Apply one inbound message against the match state and fan it out
    pub fn handle(&self, conn_id: Uuid, msg: ClientMsg) {
        if !self.peers.contains_key(&conn_id) {
            return;
        }
        match msg {
            ClientMsg::PlayerUpdate { x, y, z, rotation } => {
                self.handle_player_update(conn_id, x, y, z, rotation)
            }
            ClientMsg::BallUpdate(ball) => self.handle_ball_update(conn_id, ball),
            ClientMsg::Combat {
                kind: _,
                target_id,
                damage,
                knockback,
            } => self.handle_combat(target_id, damage, knockback),
            ClientMsg::PlayerRespawn { id, position, .. } => self.handle_respawn(id, position),
            ClientMsg::GoalScored(team) => self.handle_goal(team),
        }
    }

    fn handle_player_update(&self, conn_id: Uuid, x: f32, y: f32, z: f32, rotation: f32) {
        {
            let mut state = self.state.lock();
            let Some(player) = state.players.get_mut(&conn_id) else {
                return;
            };
            player.x = x;
            player.y = y;
            player.z = z;
            player.rotation = rotation;
        }
        self.broadcast_except(
            Some(conn_id),
            ServerMsg::PlayerMoved {
                id: conn_id,
                x,
                y,
                z,
                rotation,
            },
        );
    }

    fn handle_ball_update(&self, conn_id: Uuid, ball: BallSnapshot) {
        self.state.lock().ball = ball;
        self.broadcast_except(Some(conn_id), ServerMsg::BallMoved(ball));
    }

    fn handle_combat(&self, target_id: Uuid, damage: i32, knockback: WireVec3) {
        enum Outcome {
            Damaged,
            Died(Vec3),
        }

        let result = {
            let mut state = self.state.lock();
            let Some(target) = state.players.get_mut(&target_id) else {
                debug!(target_id = %target_id, "combat against unknown target ignored");
                return;
            };

            let (new_health, died) = apply_damage(target.health, damage);
            target.health = new_health;
            target.x += knockback.x;
            target.y += knockback.y;
            target.z += knockback.z;

            let damaged = ServerMsg::PlayerDamaged {
                id: target_id,
                health: target.health,
                position: WireVec3::new(target.x, target.y, target.z),
                knockback,
            };

            let outcome = if died {
                let spawn = field::goal_spawn(target.team);
                target.health = MAX_HEALTH;
                target.x = spawn.x;
                target.y = spawn.y;
                target.z = spawn.z;
                Outcome::Died(spawn)
            } else {
                Outcome::Damaged
            };
            (damaged, outcome)
        };

        let (damaged, outcome) = result;
        self.broadcast_except(None, damaged);
        if let Outcome::Died(spawn) = outcome {
            self.broadcast_except(
                None,
                ServerMsg::PlayerRespawned {
                    id: target_id,
                    position: spawn.into(),
                    health: MAX_HEALTH,
                },
            );
        }
    }

    fn handle_respawn(&self, id: Uuid, position: WireVec3) {
        {
            let mut state = self.state.lock();
            let Some(player) = state.players.get_mut(&id) else {
                debug!(id = %id, "respawn for unknown player ignored");
                return;
            };
            player.health = MAX_HEALTH;
            player.x = position.x;
            player.y = position.y;
            player.z = position.z;
        }
        self.broadcast_except(
            None,
            ServerMsg::PlayerRespawned {
                id,
                position,
                health: MAX_HEALTH,
            },
        );
    }

    fn handle_goal(&self, team: Team) {
        // Trusted report: increment unconditionally. Reaching the limit
        // resets both scores atomically and broadcasts the reset instead
        // of a scoreUpdate.
        let msg = {
            let mut state = self.state.lock();
            let new_score = state.scores.increment(team);
            if new_score >= SCORE_LIMIT {
                state.scores.reset();
                ServerMsg::GameReset(state.scores)
            } else {
                ServerMsg::ScoreUpdate(state.scores)
            }
        };
        self.broadcast_except(None, msg);
    }

    /// Fan a message out to every connection except an optional sender
    fn broadcast_except(&self, except: Option<Uuid>, msg: ServerMsg) {
        for peer in self.peers.iter() {
            if Some(*peer.key()) == except {
                continue;
            }
            // A closed receiver means the connection is tearing down;
            // disconnect cleanup will remove it.
            let _ = peer.value().send(msg.clone());
        }
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new()
    }
}
