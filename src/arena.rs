//! Arena controller
//!
//! Owns the single simulation context, the input aggregator and the sound
//! cue. Presentation talks only to this type: it forwards raw input,
//! calls `frame` from its frame callback and renders `snapshot`.

use glam::Vec2;
use serde::Serialize;

use crate::audio::{SilentCue, SoundCue, SoundEffect};
use crate::settings::{ConfigError, SimConfig};
use crate::sim::{
    InputState, PadColor, PadSet, SimEvent, SimState, TeleportEffect, TeleportMessage,
    TeleportStats, UnlockError, tick,
};

/// A pad as presentation sees it
#[derive(Debug, Clone, Serialize)]
pub struct PadView {
    pub id: String,
    pub position: Vec2,
    pub target_id: String,
    pub color: PadColor,
    pub label: String,
    pub locked: bool,
    pub unlock_cost: Option<u32>,
    pub cooldown_remaining: f64,
}

/// Both ends of a pair, with the cooldown of the busier end
#[derive(Debug, Clone, Serialize)]
pub struct PairView {
    pub label: String,
    pub pad_ids: [String; 2],
    pub locked: bool,
    pub cooldown_remaining: f64,
}

/// Read-only view for one render
#[derive(Debug, Clone, Serialize)]
pub struct ArenaSnapshot {
    pub player_pos: Vec2,
    pub teleporting: bool,
    pub arena_width: f32,
    pub arena_height: f32,
    pub player_size: f32,
    pub pad_size: f32,
    pub cooldown_duration: f64,
    pub pads: Vec<PadView>,
    pub pairs: Vec<PairView>,
    pub effects: Vec<TeleportEffect>,
    pub message: Option<TeleportMessage>,
    pub message_key: u64,
    pub stats: TeleportStats,
}

pub struct Arena {
    state: SimState,
    input: InputState,
    sound: Box<dyn SoundCue>,
    /// Layout restored on reset
    initial_pads: PadSet,
    /// Events raised outside `frame`, handed out by the next one
    carried: Vec<SimEvent>,
}

impl Arena {
    pub fn new(config: SimConfig, pads: PadSet, now: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: SimState::new(config, pads.clone(), now),
            input: InputState::new(),
            sound: Box::new(SilentCue),
            initial_pads: pads,
            carried: Vec::new(),
        })
    }

    /// Stock config and pad layout
    pub fn with_defaults(now: f64) -> Self {
        let pads = PadSet::default_layout();
        Self {
            state: SimState::new(SimConfig::default(), pads.clone(), now),
            input: InputState::new(),
            sound: Box::new(SilentCue),
            initial_pads: pads,
            carried: Vec::new(),
        }
    }

    pub fn set_sound_cue(&mut self, sound: Box<dyn SoundCue>) {
        self.sound = sound;
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    // === Input ===

    pub fn key_down(&mut self, key: &str) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Joystick direction, magnitude clamped to 1. (0, 0) when released.
    pub fn set_joystick(&mut self, x: f32, y: f32) {
        self.input.set_joystick(x, y);
    }

    /// Forget held input (window blur)
    pub fn release_all(&mut self) {
        self.input.clear();
    }

    /// Put the player somewhere without counting distance
    pub fn place_player(&mut self, pos: Vec2) {
        self.state.place_player(pos);
    }

    // === Loop ===

    /// Run one frame at `now` and return what happened during it
    pub fn frame(&mut self, now: f64) -> Vec<SimEvent> {
        tick(&mut self.state, &self.input, now);
        let mut events = std::mem::take(&mut self.carried);
        events.extend(self.dispatch());
        events
    }

    /// Cancel everything in flight and start a fresh session at `now`
    pub fn reset(&mut self, now: f64) {
        self.state.teardown();
        let config = self.state.config.clone();
        self.state = SimState::new(config, self.initial_pads.clone(), now);
        self.input.clear();
        self.carried.clear();
        log::info!("Arena reset");
    }

    fn dispatch(&mut self) -> Vec<SimEvent> {
        let events = self.state.drain_events();
        for event in &events {
            let effect = match event {
                SimEvent::TeleportStarted { .. } => SoundEffect::Teleport,
                SimEvent::PadsUnlocked { .. } => SoundEffect::Unlock,
                _ => continue,
            };
            if let Err(e) = self.sound.play(effect) {
                log::warn!("Sound cue {:?} failed: {}", effect, e);
            }
        }
        events
    }

    // === Queries ===

    pub fn cooldown_remaining(&self, pad: &str, now: f64) -> f64 {
        self.state.cooldown_remaining(pad, now)
    }

    pub fn can_unlock(&self, cost: u32) -> bool {
        self.state.can_unlock(cost)
    }

    /// Unlock a pair once enough teleports have been made
    pub fn unlock_pad(&mut self, label: &str) -> Result<bool, UnlockError> {
        let needed = self
            .state
            .unlock_cost(label)
            .ok_or_else(|| UnlockError::UnknownLabel(label.to_string()))?;
        if !self.state.can_unlock(needed) {
            return Err(UnlockError::NotEnoughTeleports {
                label: label.to_string(),
                needed,
                have: self.state.stats.total_teleports,
            });
        }
        let unlocked = self.state.unlock_pad(label)?;
        let events = self.dispatch();
        self.carried.extend(events);
        Ok(unlocked)
    }

    pub fn snapshot(&self, now: f64) -> ArenaSnapshot {
        let state = &self.state;
        ArenaSnapshot {
            player_pos: state.player_pos,
            teleporting: state.is_teleporting(),
            arena_width: state.config.arena_width,
            arena_height: state.config.arena_height,
            player_size: state.config.player_size,
            pad_size: state.config.pad_size,
            cooldown_duration: state.config.cooldown_ms,
            pads: state
                .pads
                .iter()
                .map(|p| PadView {
                    id: p.id.to_string(),
                    position: p.position,
                    target_id: p.target_id.to_string(),
                    color: p.color,
                    label: p.label.clone(),
                    locked: p.locked,
                    unlock_cost: p.unlock_cost,
                    cooldown_remaining: state.cooldown_remaining(p.id.as_str(), now),
                })
                .collect(),
            pairs: state
                .pads
                .pairs()
                .into_iter()
                .map(|(a, b)| PairView {
                    label: a.label.clone(),
                    pad_ids: [a.id.to_string(), b.id.to_string()],
                    locked: a.locked || b.locked,
                    cooldown_remaining: state.pair_cooldown_remaining(a.id.as_str(), now),
                })
                .collect(),
            effects: state.effects.clone(),
            message: state.message.clone(),
            message_key: state.message_key(),
            stats: state.stats.clone(),
        }
    }
}
