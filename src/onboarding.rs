//! First-run tutorial flag
//!
//! Kept in SessionStorage on the web so a reload in the same tab skips the
//! tutorial. Lives entirely outside the simulation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Onboarding {
    /// Tutorial already dismissed this session
    pub seen: bool,
}

impl Onboarding {
    /// SessionStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "teleport-onboarded";

    pub fn should_show(&self) -> bool {
        !self.seen
    }

    /// Mark the tutorial as done and persist the flag
    pub fn dismiss(&mut self) {
        if !self.seen {
            self.seen = true;
            self.save();
        }
    }

    /// Load the flag from SessionStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let seen = web_sys::window()
            .and_then(|w| w.session_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .is_some();
        Self { seen }
    }

    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.session_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage.set_item(Self::STORAGE_KEY, "1").is_err() {
                log::warn!("Could not store onboarding flag");
            }
        }
    }

    /// Native: one process is one session, nothing to load
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        log::debug!("Onboarding dismissed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shows_until_dismissed() {
        let mut onboarding = Onboarding::load();
        assert!(onboarding.should_show());
        onboarding.dismiss();
        assert!(!onboarding.should_show());
        onboarding.dismiss();
        assert!(onboarding.seen);
    }
}
