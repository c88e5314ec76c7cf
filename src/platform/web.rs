//! Browser binding
//!
//! The page owns rendering, the keyboard listeners and the touch joystick;
//! it forwards raw events here and calls `frame` from requestAnimationFrame.

use wasm_bindgen::prelude::*;

use super::{Clock, SystemClock};
use crate::arena::Arena;
use crate::audio::WebAudioCue;
use crate::onboarding::Onboarding;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Teleport Arena starting...");
}

#[wasm_bindgen]
pub struct WebArena {
    arena: Arena,
    clock: SystemClock,
    onboarding: Onboarding,
}

#[wasm_bindgen]
impl WebArena {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebArena {
        let clock = SystemClock::new();
        let mut arena = Arena::with_defaults(clock.now_ms());
        arena.set_sound_cue(Box::new(WebAudioCue::new()));
        WebArena {
            arena,
            clock,
            onboarding: Onboarding::load(),
        }
    }

    /// `KeyboardEvent.key` of a keydown
    pub fn key_down(&mut self, key: &str) {
        self.arena.key_down(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.arena.key_up(key);
    }

    pub fn set_joystick(&mut self, x: f32, y: f32) {
        self.arena.set_joystick(x, y);
    }

    /// Window lost focus; keyup events will not arrive
    pub fn blur(&mut self) {
        self.arena.release_all();
    }

    /// Advance one frame; returns the number of events it produced
    pub fn frame(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.arena.frame(now).len()
    }

    /// JSON snapshot for the renderer
    pub fn snapshot(&self) -> String {
        let snapshot = self.arena.snapshot(self.clock.now_ms());
        serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            log::error!("Snapshot serialization failed: {}", e);
            String::from("{}")
        })
    }

    pub fn cooldown_remaining(&self, pad_id: &str) -> f64 {
        self.arena.cooldown_remaining(pad_id, self.clock.now_ms())
    }

    pub fn can_unlock(&self, cost: u32) -> bool {
        self.arena.can_unlock(cost)
    }

    /// Returns true if pads were unlocked by this call
    pub fn unlock_pad(&mut self, label: &str) -> bool {
        match self.arena.unlock_pad(label) {
            Ok(unlocked) => unlocked,
            Err(e) => {
                log::info!("Unlock refused: {}", e);
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.arena.reset(self.clock.now_ms());
    }

    pub fn show_onboarding(&self) -> bool {
        self.onboarding.should_show()
    }

    pub fn dismiss_onboarding(&mut self) {
        self.onboarding.dismiss();
    }
}

impl Default for WebArena {
    fn default() -> Self {
        Self::new()
    }
}
