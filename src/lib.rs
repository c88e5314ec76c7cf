//! Teleport Arena - a 2D arena with paired teleport pads
//!
//! Core modules:
//! - `sim`: Deterministic simulation (input, movement, teleports, cooldowns, stats)
//! - `arena`: Controller that owns one simulation and talks to presentation
//! - `audio`: Sound cue fired when a teleport starts
//! - `platform`: Clock abstraction and the browser binding
//! - `settings`: Data-driven tuning

pub mod arena;
pub mod audio;
pub mod onboarding;
pub mod platform;
pub mod settings;
pub mod sim;

pub use arena::{Arena, ArenaSnapshot};
pub use onboarding::Onboarding;
pub use settings::{ConfigError, SimConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Player avatar is a square of this side
    pub const PLAYER_SIZE: f32 = 28.0;
    /// Units moved per tick per held key (or per unit of joystick)
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Pads are squares of this side, positioned by their top-left corner
    pub const PAD_SIZE: f32 = 50.0;

    /// Both ends of a pair are locked out this long after a teleport (ms)
    pub const COOLDOWN_MS: f64 = 5000.0;
    /// Center-to-center distance that counts as stepping onto a pad
    pub const TELEPORT_PROXIMITY: f32 = 35.0;
    /// Movement below this is jitter and is not added to distance traveled
    pub const DISTANCE_NOISE_THRESHOLD: f32 = 0.5;

    /// Departure/arrival effects self-destruct after this long (ms)
    pub const EFFECT_LIFETIME_MS: f64 = 600.0;
    /// Trigger -> player reappears at the target pad
    pub const ARRIVE_DELAY_MS: f64 = 200.0;
    /// Arrival -> player is idle again
    pub const SETTLE_DELAY_MS: f64 = 300.0;
    /// Idle again -> arrival pad can trigger again
    pub const MARKER_CLEAR_DELAY_MS: f64 = 300.0;

    /// Player spawn (top-left corner)
    pub const PLAYER_START_X: f32 = 400.0;
    pub const PLAYER_START_Y: f32 = 250.0;
}

/// Center of an axis-aligned square given its top-left corner
#[inline]
pub fn square_center(top_left: Vec2, size: f32) -> Vec2 {
    top_left + Vec2::splat(size / 2.0)
}
