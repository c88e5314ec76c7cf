//! Simulation context and core types
//!
//! One `SimState` holds everything the tick and its timers mutate. Nothing
//! outside the simulation writes to it directly; presentation reads it.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cooldown::CooldownTable;
use super::pads::{PadId, PadSet};
use super::schedule::{Scheduler, TimerAction, TimerId};
use crate::consts::{PLAYER_START_X, PLAYER_START_Y};
use crate::settings::SimConfig;

/// What the player avatar is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerPhase {
    /// Walking; pads may trigger
    #[default]
    Idle,
    /// Mid-teleport; no pad may trigger
    Teleporting,
}

/// Progress of a teleport sequence. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeleportStage {
    /// Player vanished from the source pad
    Departed,
    /// Player reappeared on the target pad
    Arrived,
    /// Player is idle again; arrival marker still set
    Settled,
}

/// The sequence currently in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTeleport {
    pub source: PadId,
    pub target: PadId,
    pub started_at: f64,
    pub stage: TeleportStage,
    /// Timer that will advance this sequence next
    pub pending: Option<TimerId>,
}

/// Short-lived visual burst at a pad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleportEffect {
    /// Unique, increasing
    pub id: u64,
    pub position: Vec2,
    pub created_at: f64,
}

/// Session counters. Only ever grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleportStats {
    pub total_teleports: u32,
    /// Teleports started from each pad
    pub pad_usage: BTreeMap<PadId, u32>,
    pub distance_traveled: f64,
    pub session_start: f64,
    /// Pair labels in the order they were unlocked
    pub unlocks: Vec<String>,
}

impl TeleportStats {
    pub fn new(session_start: f64) -> Self {
        Self {
            total_teleports: 0,
            pad_usage: BTreeMap::new(),
            distance_traveled: 0.0,
            session_start,
            unlocks: Vec::new(),
        }
    }

    pub fn usage(&self, pad: &str) -> u32 {
        self.pad_usage.get(pad).copied().unwrap_or(0)
    }
}

/// Latest narration line. `key` changes with every message, even a repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportMessage {
    pub text: String,
    pub key: u64,
}

/// Things the host should react to (sound, HUD), drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    TeleportStarted { source: PadId, target: PadId },
    PlayerArrived { pad: PadId },
    TeleportFinished { pad: PadId },
    PadsUnlocked { label: String },
}

/// Complete simulation context
#[derive(Debug, Clone, Serialize)]
pub struct SimState {
    pub config: SimConfig,
    pub pads: PadSet,
    /// Top-left corner of the player square
    pub player_pos: Vec2,
    pub phase: PlayerPhase,
    pub cooldowns: CooldownTable,
    pub effects: Vec<TeleportEffect>,
    pub stats: TeleportStats,
    pub message: Option<TeleportMessage>,
    /// Pad the player most recently arrived at; it cannot trigger while set
    pub last_arrived: Option<PadId>,
    pub active: Option<ActiveTeleport>,
    pub scheduler: Scheduler,
    /// Time of the latest tick
    pub now: f64,
    /// Position distance was last accrued from
    distance_baseline: Vec2,
    message_key: u64,
    next_effect_id: u64,
    #[serde(skip)]
    events: Vec<SimEvent>,
}

impl SimState {
    /// Fresh session starting at `now`, player at the stock spawn point
    pub fn new(config: SimConfig, pads: PadSet, now: f64) -> Self {
        let start = Vec2::new(PLAYER_START_X, PLAYER_START_Y)
            .clamp(Vec2::ZERO, Vec2::new(config.max_player_x(), config.max_player_y()));
        Self {
            config,
            pads,
            player_pos: start,
            phase: PlayerPhase::Idle,
            cooldowns: CooldownTable::new(),
            effects: Vec::new(),
            stats: TeleportStats::new(now),
            message: None,
            last_arrived: None,
            active: None,
            scheduler: Scheduler::new(),
            now,
            distance_baseline: start,
            message_key: 0,
            next_effect_id: 1,
            events: Vec::new(),
        }
    }

    /// Place the player without accruing distance
    pub fn place_player(&mut self, pos: Vec2) {
        self.player_pos = self.clamp_to_arena(pos);
        self.distance_baseline = self.player_pos;
    }

    pub fn clamp_to_arena(&self, pos: Vec2) -> Vec2 {
        pos.clamp(
            Vec2::ZERO,
            Vec2::new(self.config.max_player_x(), self.config.max_player_y()),
        )
    }

    pub fn player_center(&self) -> Vec2 {
        crate::square_center(self.player_pos, self.config.player_size)
    }

    pub fn is_teleporting(&self) -> bool {
        self.phase == PlayerPhase::Teleporting
    }

    /// Milliseconds until `pad` may trigger again
    pub fn cooldown_remaining(&self, pad: &str, now: f64) -> f64 {
        self.cooldowns.remaining(pad, now)
    }

    /// A pair is as busy as its busier end
    pub fn pair_cooldown_remaining(&self, pad: &str, now: f64) -> f64 {
        let own = self.cooldown_remaining(pad, now);
        self.pads
            .get(pad)
            .and_then(|p| self.pads.target_of(p))
            .map_or(own, |t| own.max(self.cooldown_remaining(t.id.as_str(), now)))
    }

    /// Replace the narration line and bump its key
    pub fn set_message(&mut self, text: String) {
        self.message_key += 1;
        self.message = Some(TeleportMessage {
            text,
            key: self.message_key,
        });
    }

    pub fn message_key(&self) -> u64 {
        self.message_key
    }

    pub(crate) fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add a visual effect and schedule its removal
    pub(crate) fn spawn_effect(&mut self, position: Vec2, now: f64) -> u64 {
        let id = self.next_effect_id;
        self.next_effect_id += 1;
        self.effects.push(TeleportEffect {
            id,
            position,
            created_at: now,
        });
        self.scheduler.schedule(
            now + self.config.effect_lifetime_ms,
            TimerAction::ExpireEffect { effect_id: id },
        );
        id
    }

    /// Accrue distance if the player moved past the jitter threshold since
    /// the last accrual
    pub(crate) fn record_movement(&mut self) {
        let moved = self.player_pos.distance(self.distance_baseline);
        if moved > self.config.distance_noise_threshold {
            self.stats.distance_traveled += moved as f64;
            self.distance_baseline = self.player_pos;
        }
    }

    /// Cancel every pending timer. Called before the state is discarded so
    /// nothing fires against a torn-down session.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.active = None;
        self.events.clear();
    }
}
