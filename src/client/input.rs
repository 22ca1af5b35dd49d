//! Input mapping: raw device input to a per-frame control snapshot
//!
//! Keyboard/pointer and virtual-joystick input both funnel into the same
//! `InputMapper`; the physics tick never sees device events, only the
//! snapshot taken at the top of the frame.

use crate::game::ControlIntent;

/// Yaw/pitch radians per pixel of pointer movement
pub const MOUSE_SENSITIVITY: f32 = 0.004;
/// Vertical look is clamped to +/- 60 degrees
pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_3;
/// Axis magnitude below which a joystick reads as neutral
pub const JOYSTICK_DEAD_ZONE: f32 = 0.2;
/// Look-joystick rotation per frame at full deflection
pub const JOYSTICK_LOOK_RATE: f32 = 0.03;

/// Logical buttons after keybinding resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Forward,
    Backward,
    Left,
    Right,
    Sprint,
    Jump,
    Punch,
    Shoot,
    Kick,
}

/// One frame's worth of resolved input
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub intent: ControlIntent,
    /// Accumulated yaw change since the last snapshot
    pub yaw_delta: f32,
    /// Absolute vertical look angle, already clamped
    pub pitch: f32,
    pub punch: bool,
    pub shoot: bool,
    pub kick: bool,
}

/// Accumulates device events between frames
#[derive(Debug, Default)]
pub struct InputMapper {
    intent: ControlIntent,
    yaw_delta: f32,
    pitch: f32,
    punch: bool,
    shoot: bool,
    kick: bool,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button_down(&mut self, button: Button) {
        match button {
            Button::Forward => self.intent.forward = true,
            Button::Backward => self.intent.backward = true,
            Button::Left => self.intent.left = true,
            Button::Right => self.intent.right = true,
            Button::Sprint => self.intent.sprint = true,
            Button::Jump => self.intent.jump = true,
            Button::Punch => self.punch = true,
            Button::Shoot => self.shoot = true,
            Button::Kick => self.kick = true,
        }
    }

    pub fn button_up(&mut self, button: Button) {
        match button {
            Button::Forward => self.intent.forward = false,
            Button::Backward => self.intent.backward = false,
            Button::Left => self.intent.left = false,
            Button::Right => self.intent.right = false,
            Button::Sprint => self.intent.sprint = false,
            Button::Jump => self.intent.jump = false,
            // Actions fire on press; release is ignored
            Button::Punch | Button::Shoot | Button::Kick => {}
        }
    }

    /// Pointer movement while captured: dx turns, dy looks up/down
    pub fn pointer_delta(&mut self, dx: f32, dy: f32) {
        self.yaw_delta -= dx * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - dy * MOUSE_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Movement joystick state, axes in -1..1 with +y pointing down-screen
    pub fn move_joystick(&mut self, x: f32, y: f32) {
        self.intent.forward = y < -JOYSTICK_DEAD_ZONE;
        self.intent.backward = y > JOYSTICK_DEAD_ZONE;
        self.intent.left = x < -JOYSTICK_DEAD_ZONE;
        self.intent.right = x > JOYSTICK_DEAD_ZONE;
    }

    /// Look joystick: deflection past the dead-zone rotates per frame
    pub fn look_joystick(&mut self, x: f32, y: f32) {
        if x.abs() > JOYSTICK_DEAD_ZONE {
            self.yaw_delta -= x * JOYSTICK_LOOK_RATE;
        }
        if y.abs() > JOYSTICK_DEAD_ZONE {
            self.pitch = (self.pitch - y * JOYSTICK_LOOK_RATE).clamp(-MAX_PITCH, MAX_PITCH);
        }
    }

    /// Lifting a finger off the movement joystick stops all movement
    pub fn release_move_joystick(&mut self) {
        self.intent.forward = false;
        self.intent.backward = false;
        self.intent.left = false;
        self.intent.right = false;
    }

    /// Take this frame's snapshot, draining deltas and one-shot actions
    pub fn snapshot(&mut self) -> FrameInput {
        let frame = FrameInput {
            intent: self.intent,
            yaw_delta: self.yaw_delta,
            pitch: self.pitch,
            punch: self.punch,
            shoot: self.shoot,
            kick: self.kick,
        };
        self.yaw_delta = 0.0;
        self.punch = false;
        self.shoot = false;
        self.kick = false;
        frame
    }
}

/// Convert a raw joystick displacement in pixels to unit axes.
/// Direction is kept and magnitude clamped once the knob passes the rim.
pub fn joystick_axes(dx: f32, dy: f32, max_radius: f32) -> (f32, f32) {
    if max_radius <= 0.0 {
        return (0.0, 0.0);
    }
    let length = (dx * dx + dy * dy).sqrt();
    if length <= max_radius {
        (dx / max_radius, dy / max_radius)
    } else {
        (dx / length, dy / length)
    }
}
