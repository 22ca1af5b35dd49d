//! Game simulation modules

pub mod ball;
pub mod combat;
pub mod field;
pub mod player;
pub mod relay;

pub use ball::BallEntity;
pub use player::PlayerEntity;
pub use relay::{GameServer, MatchState};

/// Control intent for a single frame
///
/// Written by the input-mapping stage, read once per physics tick. Remote
/// players have no intent; their state arrives pre-integrated over the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub jump: bool,
}

impl ControlIntent {
    pub fn neutral() -> Self {
        Self::default()
    }

    /// True when any directional key is held
    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}
