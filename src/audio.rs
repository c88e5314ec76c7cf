//! Sound cues
//!
//! The simulation never plays audio itself. The arena controller forwards
//! teleport and unlock events to a `SoundCue`; any failure there is logged
//! and dropped so it can never stall or alter the simulation.

use thiserror::Error;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A teleport sequence started
    Teleport,
    /// A pad pair was unlocked
    Unlock,
}

#[derive(Debug, Error)]
pub enum SoundCueError {
    #[error("audio output unavailable")]
    Unavailable,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Fire-and-forget audio sink
pub trait SoundCue {
    fn play(&mut self, effect: SoundEffect) -> Result<(), SoundCueError>;
}

/// Plays nothing. Used headless and in tests.
#[derive(Debug, Default)]
pub struct SilentCue;

impl SoundCue for SilentCue {
    fn play(&mut self, effect: SoundEffect) -> Result<(), SoundCueError> {
        log::trace!("(silent) {:?}", effect);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioCue;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundCue, SoundCueError, SoundEffect};

    /// Procedural Web Audio cues - no external files needed
    pub struct WebAudioCue {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for WebAudioCue {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioCue {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        /// Set volume (0.0 - 1.0)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), SoundCueError> {
            let backend = |e: wasm_bindgen::JsValue| SoundCueError::Backend(format!("{e:?}"));
            let osc = ctx.create_oscillator().map_err(backend)?;
            let gain = ctx.create_gain().map_err(backend)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(backend)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(backend)?;

            Ok((osc, gain))
        }

        /// Descending whoosh with a rising-then-falling shimmer on top
        fn play_teleport(ctx: &AudioContext, vol: f32) -> Result<(), SoundCueError> {
            let t = ctx.current_time();

            let (osc, gain) = Self::create_osc(ctx, 800.0, OscillatorType::Sine)?;
            osc.frequency().set_value_at_time(800.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(200.0, t + 0.3)
                .ok();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.4)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();

            let (osc, gain) = Self::create_osc(ctx, 1200.0, OscillatorType::Triangle)?;
            osc.frequency().set_value_at_time(1200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(2400.0, t + 0.15)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.35)
                .ok();
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.35)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
            Ok(())
        }

        /// Rising three-note chime
        fn play_unlock(ctx: &AudioContext, vol: f32) -> Result<(), SoundCueError> {
            for (i, freq) in [523.0, 659.0, 784.0].iter().enumerate() {
                let (osc, gain) = Self::create_osc(ctx, *freq, OscillatorType::Sine)?;
                let t = ctx.current_time() + i as f64 * 0.1;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
            Ok(())
        }
    }

    impl SoundCue for WebAudioCue {
        fn play(&mut self, effect: SoundEffect) -> Result<(), SoundCueError> {
            if self.muted || self.volume <= 0.0 {
                return Ok(());
            }
            let ctx = self.ctx.as_ref().ok_or(SoundCueError::Unavailable)?;

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Teleport => Self::play_teleport(ctx, self.volume),
                SoundEffect::Unlock => Self::play_unlock(ctx, self.volume),
            }
        }
    }
}
