//! WebSocket protocol message definitions
//! These are the wire types for client-server communication
//!
//! Every message is a JSON object `{type, data}` - the event name plus its
//! payload. Field names are camelCase on the wire to stay compatible with the
//! browser client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Team assignment, alternating by join order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Blue,
    Red,
}

/// Which combat action produced a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatKind {
    Punch,
    Shoot,
}

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMsg {
    /// Local player reports position/facing every frame
    #[serde(rename_all = "camelCase")]
    PlayerUpdate { x: f32, y: f32, z: f32, rotation: f32 },

    /// Ball state report, sent only while the ball is moving
    BallUpdate(BallSnapshot),

    /// An attack outcome computed client-side; the server trusts it
    #[serde(rename_all = "camelCase")]
    Combat {
        #[serde(rename = "type")]
        kind: CombatKind,
        target_id: Uuid,
        damage: i32,
        knockback: WireVec3,
    },

    /// Explicit respawn request after local death detection
    #[serde(rename_all = "camelCase")]
    PlayerRespawn {
        id: Uuid,
        position: WireVec3,
        team: Team,
    },

    /// Client reports the ball crossed a goal line for the named team
    GoalScored(Team),
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMsg {
    /// Full match snapshot, sent once to a newly accepted connection
    #[serde(rename_all = "camelCase")]
    GameState {
        players: Vec<PlayerSnapshot>,
        ball: BallSnapshot,
        scores: Scores,
        your_id: Uuid,
    },

    /// New roster entry, sent to everyone except the joiner
    PlayerJoined(PlayerSnapshot),

    /// Relay of a playerUpdate to the other connections
    #[serde(rename_all = "camelCase")]
    PlayerMoved {
        id: Uuid,
        x: f32,
        y: f32,
        z: f32,
        rotation: f32,
    },

    /// Relay of a ballUpdate to the other connections
    BallMoved(BallSnapshot),

    /// Authoritative damage/position result, sent to all
    #[serde(rename_all = "camelCase")]
    PlayerDamaged {
        id: Uuid,
        health: i32,
        position: WireVec3,
        knockback: WireVec3,
    },

    /// Result of a death-triggered or explicit respawn, sent to all
    #[serde(rename_all = "camelCase")]
    PlayerRespawned {
        id: Uuid,
        position: WireVec3,
        health: i32,
    },

    /// New scores after a goal
    ScoreUpdate(Scores),

    /// Both scores reset after a team reached the score limit
    GameReset(Scores),

    /// Roster removal
    PlayerDisconnected(Uuid),
}

/// A position or displacement on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WireVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WireVec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<glam::Vec3> for WireVec3 {
    fn from(v: glam::Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<WireVec3> for glam::Vec3 {
    fn from(v: WireVec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

/// Player state as carried in snapshots and roster notices
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: Uuid,
    pub team: Team,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    pub health: i32,
    pub stamina: f32,
    pub stunned: bool,
}

/// Ball state as carried on the wire
///
/// `y` is ground-relative: the sender subtracts the ball radius and the
/// receiver adds it back. Kept for compatibility with the browser client.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallSnapshot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub velocity_z: f32,
}

/// Goal tallies per team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub blue: u32,
    pub red: u32,
}

impl Scores {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Blue => self.blue,
            Team::Red => self.red,
        }
    }

    pub fn increment(&mut self, team: Team) -> u32 {
        match team {
            Team::Blue => {
                self.blue += 1;
                self.blue
            }
            Team::Red => {
                self.red += 1;
                self.red
            }
        }
    }

    pub fn reset(&mut self) {
        self.blue = 0;
        self.red = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_message_wire_format() {
        let msg = ClientMsg::Combat {
            kind: CombatKind::Punch,
            target_id: Uuid::nil(),
            damage: 25,
            knockback: WireVec3::new(1.0, 0.0, 0.0),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "combat");
        assert_eq!(json["data"]["type"], "punch");
        assert_eq!(json["data"]["targetId"], Uuid::nil().to_string());
        assert_eq!(json["data"]["damage"], 25);
    }

    #[test]
    fn goal_scored_carries_bare_team_name() {
        let msg = ClientMsg::GoalScored(Team::Blue);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "goalScored");
        assert_eq!(json["data"], "blue");
    }

    #[test]
    fn snapshot_fields_are_camel_case() {
        let json = serde_json::to_value(BallSnapshot {
            x: 1.0,
            y: 0.0,
            z: 2.0,
            velocity_x: 0.5,
            velocity_y: 0.0,
            velocity_z: -0.5,
        })
        .unwrap();
        assert!(json.get("velocityX").is_some());
        assert!(json.get("velocity_x").is_none());

        let json = serde_json::to_value(ServerMsg::GameState {
            players: vec![],
            ball: BallSnapshot::default(),
            scores: Scores::default(),
            your_id: Uuid::nil(),
        })
        .unwrap();
        assert!(json["data"].get("yourId").is_some());
    }
}
