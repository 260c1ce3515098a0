//! Per-frame input snapshots
//!
//! The platform layer fills an [`InputState`] every frame. Edge queries
//! compare it against the previous frame's snapshot, so nothing in the
//! simulation has to remember button state on its own.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical buttons the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Boost,
    Fire,
    Shockwave,
    Repair,
    Restart,
    Cancel,
    MenuUp,
    MenuDown,
    Confirm,
}

/// Held state of every button plus the pointer, for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    pub fire: bool,
    pub shockwave: bool,
    pub repair: bool,
    pub restart: bool,
    pub cancel: bool,
    pub menu_up: bool,
    pub menu_down: bool,
    pub confirm: bool,
    /// Pointer position in world coordinates
    pub pointer: Vec2,
}

impl InputState {
    pub fn is_down(&self, button: Button) -> bool {
        match button {
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Left => self.left,
            Button::Right => self.right,
            Button::Boost => self.boost,
            Button::Fire => self.fire,
            Button::Shockwave => self.shockwave,
            Button::Repair => self.repair,
            Button::Restart => self.restart,
            Button::Cancel => self.cancel,
            Button::MenuUp => self.menu_up,
            Button::MenuDown => self.menu_down,
            Button::Confirm => self.confirm,
        }
    }

    pub fn set(&mut self, button: Button, down: bool) {
        let slot = match button {
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
            Button::Boost => &mut self.boost,
            Button::Fire => &mut self.fire,
            Button::Shockwave => &mut self.shockwave,
            Button::Repair => &mut self.repair,
            Button::Restart => &mut self.restart,
            Button::Cancel => &mut self.cancel,
            Button::MenuUp => &mut self.menu_up,
            Button::MenuDown => &mut self.menu_down,
            Button::Confirm => &mut self.confirm,
        };
        *slot = down;
    }
}

/// This frame's input next to the previous frame's
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub current: InputState,
    pub previous: InputState,
}

impl InputFrame {
    pub fn new(current: InputState, previous: InputState) -> Self {
        Self { current, previous }
    }

    #[inline]
    pub fn held(&self, button: Button) -> bool {
        self.current.is_down(button)
    }

    /// Rising edge
    #[inline]
    pub fn pressed(&self, button: Button) -> bool {
        self.current.is_down(button) && !self.previous.is_down(button)
    }

    /// Falling edge
    #[inline]
    pub fn released(&self, button: Button) -> bool {
        !self.current.is_down(button) && self.previous.is_down(button)
    }

    /// Held movement keys as -1/0/+1 per axis (+y is down)
    pub fn movement_axes(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(
            axis(self.current.left, self.current.right),
            axis(self.current.up, self.current.down),
        )
    }

    pub fn pointer(&self) -> Vec2 {
        self.current.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_compare_against_previous_frame() {
        let mut prev = InputState::default();
        let mut cur = InputState::default();
        cur.set(Button::Shockwave, true);

        let frame = InputFrame::new(cur, prev);
        assert!(frame.pressed(Button::Shockwave));
        assert!(frame.held(Button::Shockwave));
        assert!(!frame.released(Button::Shockwave));

        prev = cur;
        let frame = InputFrame::new(cur, prev);
        assert!(!frame.pressed(Button::Shockwave));
        assert!(frame.held(Button::Shockwave));

        cur.set(Button::Shockwave, false);
        let frame = InputFrame::new(cur, prev);
        assert!(frame.released(Button::Shockwave));
    }

    #[test]
    fn test_opposite_keys_cancel_out() {
        let cur = InputState {
            left: true,
            right: true,
            down: true,
            ..Default::default()
        };
        let frame = InputFrame::new(cur, InputState::default());
        assert_eq!(frame.movement_axes(), Vec2::new(0.0, 1.0));
    }
}
