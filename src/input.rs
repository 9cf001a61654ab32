//! Keyboard bindings and held-key state
//!
//! Hosts forward raw `KeyboardEvent.key` strings; only the current pressed
//! state matters, nothing is buffered except the dash edge.

use std::collections::HashSet;

use crate::sim::TickInput;

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Dash,
    Pause,
    /// Toggle sound (persisted)
    Mute,
    /// Toggle demo mode
    Autopilot,
}

/// Map a key name to its action (arrows, WASD and ZQSD layouts)
pub fn action_for_key(key: &str) -> Option<Action> {
    let action = match key {
        "ArrowUp" | "w" | "W" | "z" | "Z" => Action::Up,
        "ArrowDown" | "s" | "S" => Action::Down,
        "ArrowLeft" | "a" | "A" | "q" | "Q" => Action::Left,
        "ArrowRight" | "d" | "D" => Action::Right,
        " " | "Spacebar" | "Space" => Action::Dash,
        "Escape" | "p" | "P" => Action::Pause,
        "m" | "M" => Action::Mute,
        "i" | "I" => Action::Autopilot,
        _ => return None,
    };
    Some(action)
}

/// Currently held keys plus a pending dash press
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
    dash_pressed: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns the bound action only on the initial
    /// press, so auto-repeat never re-fires dash or pause.
    pub fn key_down(&mut self, key: &str) -> Option<Action> {
        let action = action_for_key(key)?;
        if !self.held.insert(key.to_string()) {
            return None;
        }
        if action == Action::Dash {
            self.dash_pressed = true;
        }
        Some(action)
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Drop everything (focus loss, reset)
    pub fn clear(&mut self) {
        self.held.clear();
        self.dash_pressed = false;
    }

    fn is_active(&self, action: Action) -> bool {
        self.held.iter().any(|k| action_for_key(k) == Some(action))
    }

    /// Intents for the next frame; consumes the pending dash press
    pub fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            up: self.is_active(Action::Up),
            down: self.is_active(Action::Down),
            left: self.is_active(Action::Left),
            right: self.is_active(Action::Right),
            dash: self.dash_pressed,
        };
        self.dash_pressed = false;
        input
    }
}
