//! Unlock gate for locked pad pairs

use thiserror::Error;

use super::state::{SimEvent, SimState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnlockError {
    #[error("no pads carry the label {0}")]
    UnknownLabel(String),
    #[error("{label} needs {needed} teleports, only {have} made")]
    NotEnoughTeleports { label: String, needed: u32, have: u32 },
}

impl SimState {
    pub fn can_unlock(&self, cost: u32) -> bool {
        self.stats.total_teleports >= cost
    }

    /// Highest unlock cost among pads with `label`, if any pad carries it
    pub fn unlock_cost(&self, label: &str) -> Option<u32> {
        self.pads
            .with_label(label)
            .map(|p| p.unlock_cost.unwrap_or(0))
            .max()
    }

    /// Unlock both ends of the pair labelled `label`.
    ///
    /// The teleport threshold is not checked here; callers ask `can_unlock`
    /// first. Returns `Ok(true)` when pads were unlocked and `Ok(false)` when
    /// every pad with the label was already open; repeat calls leave the
    /// unlock history untouched.
    pub fn unlock_pad(&mut self, label: &str) -> Result<bool, UnlockError> {
        if self.unlock_cost(label).is_none() {
            return Err(UnlockError::UnknownLabel(label.to_string()));
        }
        if !self.pads.with_label(label).any(|p| p.locked) {
            return Ok(false);
        }

        self.pads.unlock_label(label);
        self.stats.unlocks.push(label.to_string());
        self.set_message(format!("Unlocked {} pads!", label));
        self.push_event(SimEvent::PadsUnlocked {
            label: label.to_string(),
        });
        log::info!(
            "Unlocked {} pads after {} teleports",
            label,
            self.stats.total_teleports
        );
        Ok(true)
    }
}
