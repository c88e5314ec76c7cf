//! Input aggregation
//!
//! Merges held keyboard keys and the virtual joystick into one movement
//! vector per tick. Keys use held-state semantics: a key contributes every
//! tick between its down and up events, regardless of key repeat.

use std::collections::HashSet;

use glam::Vec2;

use crate::settings::SimConfig;

/// A movement direction bound to one or more keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Key names (lower-cased `KeyboardEvent.key` values) bound to this direction
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            Direction::Up => &["w", "arrowup"],
            Direction::Down => &["s", "arrowdown"],
            Direction::Left => &["a", "arrowleft"],
            Direction::Right => &["d", "arrowright"],
        }
    }

    /// Unit vector in arena coordinates (y grows downward)
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// Held keys plus the current joystick direction
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
    joystick: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Any key is tracked; only bound keys move the player.
    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&key.to_lowercase())
    }

    /// Set the joystick direction. Magnitude is clamped to 1.
    pub fn set_joystick(&mut self, x: f32, y: f32) {
        let dir = Vec2::new(x, y);
        self.joystick = if dir.is_finite() {
            dir.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
    }

    pub fn joystick(&self) -> Vec2 {
        self.joystick
    }

    /// Drop all held keys and center the joystick (focus loss, reset)
    pub fn clear(&mut self) {
        self.held.clear();
        self.joystick = Vec2::ZERO;
    }

    /// Keyboard contribution before speed scaling. Opposing keys cancel.
    pub fn keyboard_vector(&self) -> Vec2 {
        Direction::ALL
            .iter()
            .filter(|dir| dir.keys().iter().any(|k| self.held.contains(*k)))
            .map(Direction::unit)
            .sum()
    }

    /// Combined movement for one tick, in arena units
    pub fn movement(&self, config: &SimConfig) -> Vec2 {
        let mut keys = self.keyboard_vector();
        if config.normalize_diagonal {
            keys = keys.normalize_or_zero();
        }
        (keys + self.joystick) * config.player_speed
    }
}
