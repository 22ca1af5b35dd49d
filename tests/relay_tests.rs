//! Relay state-machine tests
//!
//! These drive the server's authoritative bookkeeping directly through the
//! same entry points the WebSocket handler uses, with plain channels standing
//! in for connections.

use tokio::sync::mpsc;
use uuid::Uuid;

use brawlball_server::game::relay::SCORE_LIMIT;
use brawlball_server::game::GameServer;
use brawlball_server::ws::protocol::{ClientMsg, CombatKind, ServerMsg, Team, WireVec3};

struct Peer {
    id: Uuid,
    rx: mpsc::UnboundedReceiver<ServerMsg>,
}

impl Peer {
    fn connect(server: &GameServer) -> Self {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        server.connect(id, tx);
        Self { id, rx }
    }

    /// All messages delivered so far
    fn drain(&mut self) -> Vec<ServerMsg> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }
}

fn shoot(target: Uuid) -> ClientMsg {
    ClientMsg::Combat {
        kind: CombatKind::Shoot,
        target_id: target,
        damage: 75,
        knockback: WireVec3::new(1.0, 0.0, 0.0),
    }
}

#[test]
fn join_assigns_teams_by_roster_parity() {
    let server = GameServer::new();
    let mut first = Peer::connect(&server);
    let mut second = Peer::connect(&server);

    // First connection gets the full snapshot with itself on blue at x=-10
    let msgs = first.drain();
    match &msgs[0] {
        ServerMsg::GameState {
            players, your_id, ..
        } => {
            assert_eq!(players.len(), 1);
            assert_eq!(*your_id, first.id);
            assert_eq!(players[0].team, Team::Blue);
            assert_eq!(players[0].x, -10.0);
        }
        other => panic!("expected gameState first, got {other:?}"),
    }
    // ...and then a join notice for the second player
    assert!(msgs
        .iter()
        .any(|m| matches!(m, ServerMsg::PlayerJoined(p) if p.id == second.id && p.team == Team::Red)));

    // Second connection's snapshot contains exactly both players
    let msgs = second.drain();
    match &msgs[0] {
        ServerMsg::GameState { players, .. } => {
            assert_eq!(players.len(), 2);
            let me = players.iter().find(|p| p.id == second.id).unwrap();
            assert_eq!(me.team, Team::Red);
            assert_eq!(me.x, 10.0);
        }
        other => panic!("expected gameState first, got {other:?}"),
    }
}

#[test]
fn team_parity_uses_roster_size_not_a_counter() {
    let server = GameServer::new();
    let _a = Peer::connect(&server); // blue
    let b = Peer::connect(&server); // red

    // After the red player leaves, the roster is size 1 again, so the next
    // joiner is red - balance drift after disconnects is expected.
    server.disconnect(b.id);
    let mut c = Peer::connect(&server);
    let msgs = c.drain();
    match &msgs[0] {
        ServerMsg::GameState { players, .. } => {
            let me = players.iter().find(|p| p.id == c.id).unwrap();
            assert_eq!(me.team, Team::Red);
        }
        other => panic!("expected gameState, got {other:?}"),
    }
}

#[test]
fn player_updates_relay_to_others_only() {
    let server = GameServer::new();
    let mut a = Peer::connect(&server);
    let mut b = Peer::connect(&server);
    a.drain();
    b.drain();

    server.handle(
        a.id,
        ClientMsg::PlayerUpdate {
            x: 5.0,
            y: 1.0,
            z: -2.0,
            rotation: 0.5,
        },
    );

    assert!(a.drain().is_empty(), "sender must not receive its own relay");
    let msgs = b.drain();
    match &msgs[0] {
        ServerMsg::PlayerMoved { id, x, z, .. } => {
            assert_eq!(*id, a.id);
            assert_eq!(*x, 5.0);
            assert_eq!(*z, -2.0);
        }
        other => panic!("expected playerMoved, got {other:?}"),
    }
}

#[test]
fn ball_updates_overwrite_the_mirror_and_relay() {
    let server = GameServer::new();
    let mut a = Peer::connect(&server);
    let mut b = Peer::connect(&server);
    a.drain();
    b.drain();

    let snap = brawlball_server::ws::protocol::BallSnapshot {
        x: 12.0,
        y: 0.5,
        z: -7.0,
        velocity_x: 1.0,
        velocity_y: 0.0,
        velocity_z: 0.2,
    };
    server.handle(a.id, ClientMsg::BallUpdate(snap));

    let msgs = b.drain();
    assert!(matches!(&msgs[0], ServerMsg::BallMoved(relayed) if relayed.x == 12.0));

    // A later joiner sees the updated ball in its snapshot
    let mut c = Peer::connect(&server);
    let msgs = c.drain();
    match &msgs[0] {
        ServerMsg::GameState { ball, .. } => assert_eq!(ball.x, 12.0),
        other => panic!("expected gameState, got {other:?}"),
    }
}

#[test]
fn combat_damages_target_and_notifies_everyone() {
    let server = GameServer::new();
    let mut a = Peer::connect(&server);
    let mut b = Peer::connect(&server);
    a.drain();
    b.drain();

    server.handle(a.id, shoot(b.id));

    // Both the attacker and the victim hear the authoritative result
    let b_id = b.id;
    for peer in [&mut a, &mut b] {
        let msgs = peer.drain();
        match &msgs[0] {
            ServerMsg::PlayerDamaged { id, health, .. } => {
                assert_eq!(*id, b_id);
                assert_eq!(*health, 25);
            }
            other => panic!("expected playerDamaged, got {other:?}"),
        }
    }
}

#[test]
fn knockback_moves_the_authoritative_position() {
    let server = GameServer::new();
    let mut a = Peer::connect(&server);
    let mut b = Peer::connect(&server);
    a.drain();
    b.drain();

    server.handle(a.id, shoot(b.id));
    let msgs = a.drain();
    match &msgs[0] {
        ServerMsg::PlayerDamaged { position, .. } => {
            // Red joins at x=10; knockback of +1 lands at 11
            assert_eq!(position.x, 11.0);
        }
        other => panic!("expected playerDamaged, got {other:?}"),
    }
}

#[test]
fn lethal_damage_respawns_at_team_spawn() {
    let server = GameServer::new();
    let mut a = Peer::connect(&server);
    let mut b = Peer::connect(&server);
    a.drain();
    b.drain();

    // 75 + 75: the second shot would drive health to -50, floored to 0
    server.handle(a.id, shoot(b.id));
    a.drain();
    b.drain();
    server.handle(a.id, shoot(b.id));

    let msgs = a.drain();
    match &msgs[0] {
        ServerMsg::PlayerDamaged { id, health, .. } => {
            assert_eq!(*id, b.id);
            assert_eq!(*health, 0, "lethal damage floors at zero");
        }
        other => panic!("expected playerDamaged, got {other:?}"),
    }
    match &msgs[1] {
        ServerMsg::PlayerRespawned {
            id,
            position,
            health,
        } => {
            assert_eq!(*id, b.id);
            assert_eq!(*health, 100);
            // Red respawns in its own goal
            assert_eq!(position.x, 140.0);
            assert_eq!(position.z, 0.0);
        }
        other => panic!("expected playerRespawned, got {other:?}"),
    }

    // The server never leaves a roster entry at zero health
    let mut c = Peer::connect(&server);
    let msgs = c.drain();
    match &msgs[0] {
        ServerMsg::GameState { players, .. } => {
            assert!(players.iter().all(|p| p.health > 0 && p.health <= 100));
        }
        other => panic!("expected gameState, got {other:?}"),
    }
}

#[test]
fn combat_against_unknown_target_is_ignored() {
    let server = GameServer::new();
    let mut a = Peer::connect(&server);
    a.drain();

    server.handle(a.id, shoot(Uuid::new_v4()));
    assert!(a.drain().is_empty());
}

#[test]
fn explicit_respawn_request_is_applied_and_broadcast() {
    let server = GameServer::new();
    let mut a = Peer::connect(&server);
    let mut b = Peer::connect(&server);
    a.drain();
    b.drain();

    server.handle(
        b.id,
        ClientMsg::PlayerRespawn {
            id: b.id,
            position: WireVec3::new(140.0, 1.0, 0.0),
            team: Team::Red,
        },
    );

    let b_id = b.id;
    for peer in [&mut a, &mut b] {
        let msgs = peer.drain();
        match &msgs[0] {
            ServerMsg::PlayerRespawned { id, health, .. } => {
                assert_eq!(*id, b_id);
                assert_eq!(*health, 100);
            }
            other => panic!("expected playerRespawned, got {other:?}"),
        }
    }
}

#[test]
fn twentieth_goal_resets_instead_of_reporting() {
    let server = GameServer::new();
    let mut a = Peer::connect(&server);
    a.drain();

    for goal in 1..SCORE_LIMIT {
        server.handle(a.id, ClientMsg::GoalScored(Team::Blue));
        let msgs = a.drain();
        match &msgs[0] {
            ServerMsg::ScoreUpdate(scores) => {
                assert_eq!(scores.blue, goal);
                assert!(scores.blue < SCORE_LIMIT, "scores never reach the limit");
            }
            other => panic!("expected scoreUpdate, got {other:?}"),
        }
    }

    // The limit-reaching goal broadcasts only the reset
    server.handle(a.id, ClientMsg::GoalScored(Team::Blue));
    let msgs = a.drain();
    assert_eq!(msgs.len(), 1);
    match &msgs[0] {
        ServerMsg::GameReset(scores) => {
            assert_eq!(scores.blue, 0);
            assert_eq!(scores.red, 0);
        }
        other => panic!("expected gameReset, got {other:?}"),
    }
    assert_eq!(server.scores().blue, 0);
}

#[test]
fn disconnect_removes_roster_entry_and_notifies() {
    let server = GameServer::new();
    let mut a = Peer::connect(&server);
    let b = Peer::connect(&server);
    a.drain();

    server.disconnect(b.id);
    let msgs = a.drain();
    assert!(msgs
        .iter()
        .any(|m| matches!(m, ServerMsg::PlayerDisconnected(id) if *id == b.id)));
    assert_eq!(server.player_count(), 1);

    // Messages from a disconnected peer are dropped
    server.handle(
        b.id,
        ClientMsg::PlayerUpdate {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotation: 0.0,
        },
    );
    assert!(a.drain().is_empty());
}
