//! Per-frame input signals and press-edge detection.
//!
//! The input source only reports which buttons are down this frame. Actions
//! that must fire once per press (jump, interact, fire) are derived here by
//! comparing against the previous frame, so a held key never repeats them.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub run: bool,
    pub interact: bool,
    pub fire: bool,
}

/// Buttons that went from up to down this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pressed {
    pub jump: bool,
    pub interact: bool,
    pub fire: bool,
}

#[derive(Clone, Debug, Default)]
pub struct InputTracker {
    previous: FrameInput,
}

impl InputTracker {
    pub fn advance(&mut self, now: FrameInput) -> Pressed {
        let pressed = Pressed {
            jump: now.jump && !self.previous.jump,
            interact: now.interact && !self.previous.interact,
            fire: now.fire && !self.previous.fire,
        };
        self.previous = now;
        pressed
    }
}
