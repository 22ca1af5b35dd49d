//! Field geometry and fixed spawn points

use glam::Vec3;

use crate::ws::protocol::Team;

/// Pitch width along the X axis (goal-to-goal)
pub const FIELD_WIDTH: f32 = 300.0;
/// Pitch length along the Z axis
pub const FIELD_LENGTH: f32 = 180.0;
/// Gap between the pitch and the boards; entities may stray into it
pub const BOUNDARY_MARGIN: f32 = 2.0;

/// Players clamp to the pitch plus the board gap
pub const PLAYER_MAX_X: f32 = FIELD_WIDTH / 2.0 + BOUNDARY_MARGIN;
pub const PLAYER_MAX_Z: f32 = FIELD_LENGTH / 2.0 + BOUNDARY_MARGIN;

/// The ball reflects off the pitch edge itself
pub const BALL_MAX_X: f32 = FIELD_WIDTH / 2.0;
pub const BALL_MAX_Z: f32 = FIELD_LENGTH / 2.0;

/// Goal lines sit on the white lines at 90% of the field width
pub const GOAL_LINE_X: f32 = FIELD_WIDTH * 0.9 / 2.0;
pub const GOAL_HALF_WIDTH: f32 = 14.64 / 2.0;
pub const GOAL_HEIGHT: f32 = 4.88;

/// Where a player first appears after joining
pub fn join_spawn(team: Team) -> Vec3 {
    match team {
        Team::Blue => Vec3::new(-10.0, 0.0, 0.0),
        Team::Red => Vec3::new(10.0, 0.0, 0.0),
    }
}

/// Where a player reappears after dying: inside their own goal
pub fn goal_spawn(team: Team) -> Vec3 {
    match team {
        Team::Blue => Vec3::new(-140.0, 1.0, 0.0),
        Team::Red => Vec3::new(140.0, 1.0, 0.0),
    }
}

/// If the ball sits inside a goal mouth, returns the team that scores.
///
/// Blue defends the goal at negative X, so a ball past that line is a goal
/// for Red, and vice versa.
pub fn goal_crossed(ball: Vec3) -> Option<Team> {
    if ball.z.abs() > GOAL_HALF_WIDTH || ball.y > GOAL_HEIGHT {
        return None;
    }
    if ball.x <= -GOAL_LINE_X {
        Some(Team::Red)
    } else if ball.x >= GOAL_LINE_X {
        Some(Team::Blue)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_sides() {
        assert_eq!(goal_crossed(Vec3::new(-140.0, 0.8, 0.0)), Some(Team::Red));
        assert_eq!(goal_crossed(Vec3::new(140.0, 0.8, 0.0)), Some(Team::Blue));
        assert_eq!(goal_crossed(Vec3::new(0.0, 0.8, 0.0)), None);
    }

    #[test]
    fn goal_mouth_bounds() {
        // Wide of the posts
        assert_eq!(goal_crossed(Vec3::new(-140.0, 0.8, 8.0)), None);
        // Over the crossbar
        assert_eq!(goal_crossed(Vec3::new(-140.0, 5.5, 0.0)), None);
        // Just inside the post
        assert_eq!(goal_crossed(Vec3::new(-136.0, 0.8, 7.0)), Some(Team::Red));
    }
}
