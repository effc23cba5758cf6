//! Audio system using Web Audio API
//!
//! Cues are synthesized with oscillators, so no sound files are loaded.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::error::StartupError;
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player car reached a coin
    Scored,
    /// Session started
    Start,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: AudioContext,
    settings: Settings,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Result<Self, StartupError> {
        let ctx = AudioContext::new()
            .map_err(|e| StartupError::Audio(format!("{:?}", e)))?;
        log::info!("AudioContext created ({:?})", ctx.state());
        Ok(Self {
            ctx,
            settings: settings.clone(),
        })
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        let _ = self.ctx.resume();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.settings.effective_volume();
        if vol <= 0.0 {
            return;
        }

        // Browsers suspend the context until a user gesture
        if self.ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }

        match effect {
            SoundEffect::Scored => self.play_coin(vol),
            SoundEffect::Start => self.play_start(vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(&self, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
        let osc = self.ctx.create_oscillator().ok()?;
        let gain = self.ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&self.ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Coin - two-note square chime (B5 then E6)
    fn play_coin(&self, vol: f32) {
        let start = self.ctx.current_time();
        for (i, (freq, len)) in [(987.77, 0.08), (1318.51, 0.3)].into_iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(freq, OscillatorType::Square) else {
                return;
            };
            let t = start + i as f64 * 0.08;
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + len + 0.02).ok();
        }
    }

    /// Start - engine rev
    fn play_start(&self, vol: f32) {
        let Some((osc, gain)) = self.create_osc(90.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = self.ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        osc.frequency().set_value_at_time(90.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(240.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.55).ok();
    }
}
