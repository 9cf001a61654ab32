//! Audio system
//!
//! Procedurally generated sound effects via Web Audio - no external files.
//! On native builds there is no audio backend and every call is a no-op.
//! A missing or failing backend never reaches the simulation.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Dash started
    Dash,
    /// Reward picked up
    RewardCollect,
    /// Player took a hit
    Damage,
    /// Enemy destroyed by a dash
    EnemyDestroyed,
    /// New wave queued
    WaveStart,
    /// Game over
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::WaveStarted { .. } => SoundEffect::WaveStart,
            GameEvent::DashStarted => SoundEffect::Dash,
            GameEvent::RewardCollected { .. } => SoundEffect::RewardCollect,
            GameEvent::DamageTaken { .. } => SoundEffect::Damage,
            GameEvent::EnemyDestroyed { .. } => SoundEffect::EnemyDestroyed,
            GameEvent::GameEnded { .. } => SoundEffect::GameOver,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Whether a backend exists to play through
    pub fn is_available(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            self.ctx.is_some()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the sound for every event of a frame
    pub fn play_events(&self, events: &[GameEvent]) {
        for event in events {
            self.play(SoundEffect::for_event(event));
        }
    }

    /// Play a sound effect
    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, effect: SoundEffect) {
        log::trace!("(silent) {:?}", effect);
    }

    /// Play a sound effect
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Dash => self.play_dash(ctx, vol),
            SoundEffect::RewardCollect => self.play_reward(ctx, vol),
            SoundEffect::Damage => self.play_damage(ctx, vol),
            SoundEffect::EnemyDestroyed => self.play_enemy_destroyed(ctx, vol),
            SoundEffect::WaveStart => self.play_wave_start(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }
}

// === Sound generators ===
#[cfg(target_arch = "wasm32")]
impl AudioManager {
    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single swept tone with an exponential fade
    fn sweep(
        &self,
        ctx: &AudioContext,
        osc_type: OscillatorType,
        (from, to): (f32, f32),
        gain_level: f32,
        duration: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(gain_level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration + 0.05).ok();
    }

    /// Short arpeggio, one note every `step` seconds
    fn arpeggio(
        &self,
        ctx: &AudioContext,
        notes: &[f32],
        step: f64,
        gain_level: f32,
        osc_type: OscillatorType,
    ) {
        for (i, freq) in notes.iter().enumerate() {
            let delay = i as f64 * step;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(gain_level, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + step * 2.0)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + step * 2.5).ok();
            }
        }
    }

    /// Dash - whoosh up
    fn play_dash(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, OscillatorType::Triangle, (200.0, 700.0), vol * 0.3, 0.15);
    }

    /// Reward - bright chirp
    fn play_reward(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(ctx, &[880.0, 1320.0], 0.05, vol * 0.25, OscillatorType::Sine);
    }

    /// Damage - low buzz dropping off
    fn play_damage(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, OscillatorType::Sawtooth, (180.0, 60.0), vol * 0.35, 0.2);
    }

    /// Enemy destroyed - crunchy pop
    fn play_enemy_destroyed(&self, ctx: &AudioContext, vol: f32) {
        self.sweep(ctx, OscillatorType::Square, (900.0, 120.0), vol * 0.2, 0.12);
        self.sweep(ctx, OscillatorType::Sine, (90.0, 40.0), vol * 0.3, 0.1);
    }

    /// Wave start - rising fanfare
    fn play_wave_start(&self, ctx: &AudioContext, vol: f32) {
        let notes = [400.0, 500.0, 600.0, 800.0];
        self.arpeggio(ctx, &notes, 0.1, vol * 0.3, OscillatorType::Triangle);
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let notes = [400.0, 350.0, 300.0, 200.0];
        self.arpeggio(ctx, &notes, 0.2, vol * 0.3, OscillatorType::Sine);
    }
}
