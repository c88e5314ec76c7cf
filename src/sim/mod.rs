//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in from the caller, never from a wall clock
//! - Deferred work goes through the `Scheduler`, never real timers
//! - Stable iteration order (pads in set order)
//! - No rendering, audio or platform dependencies

pub mod cooldown;
pub mod input;
pub mod pads;
pub mod progress;
pub mod schedule;
pub mod state;
pub mod teleport;
pub mod tick;

pub use cooldown::CooldownTable;
pub use input::{Direction, InputState};
pub use pads::{Pad, PadColor, PadId, PadSet, PadSetError};
pub use progress::UnlockError;
pub use schedule::{Scheduler, Timer, TimerAction, TimerId};
pub use state::{
    ActiveTeleport, PlayerPhase, SimEvent, SimState, TeleportEffect, TeleportMessage,
    TeleportStage, TeleportStats,
};
pub use tick::{integrate, tick};
