//! Audio cues and the Web Audio synthesizer
//!
//! The simulation only raises [`AudioCue`]s through an [`AudioSink`]. Playback
//! is best effort: a sink that fails to play simply stays quiet. The browser
//! sink generates every sound procedurally, so there are no audio files.

use crate::sim::GameEvent;

/// Named sound events raised by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Start the looping engine sound
    EngineStart,
    /// Stop the engine loop
    EngineStop,
    /// Player hit traffic
    Crash,
    /// Nitro canister collected
    PickupCollected,
}

impl AudioCue {
    /// Cue for a game event, if it has one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::EngineStart => Some(Self::EngineStart),
            GameEvent::EngineStop => Some(Self::EngineStop),
            GameEvent::Crash => Some(Self::Crash),
            GameEvent::PickupCollected { .. } => Some(Self::PickupCollected),
            GameEvent::BoostEngaged | GameEvent::GameOver { .. } => None,
        }
    }
}

/// Receiver for audio cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);

    /// Hint that the car is boosting (engine pitch); optional
    fn set_boosting(&mut self, _boosting: bool) {}
}

/// Sink that drops every cue
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Sink that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        log::debug!("audio cue: {:?}", cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioSink};
    use crate::settings::Settings;

    /// Engine idle pitch (Hz)
    const ENGINE_IDLE_HZ: f32 = 55.0;
    /// Engine pitch while boosting (Hz)
    const ENGINE_BOOST_HZ: f32 = 90.0;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        engine: Option<(OscillatorNode, GainNode)>,
        boosting: bool,
        master_volume: f32,
        sfx_volume: f32,
        engine_volume: f32,
        engine_enabled: bool,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let mut manager = Self {
                ctx,
                engine: None,
                boosting: false,
                master_volume: 0.8,
                sfx_volume: 1.0,
                engine_volume: 0.6,
                engine_enabled: true,
                muted: false,
            };
            manager.apply_settings(settings);
            manager
        }

        /// Pick up volume and mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.engine_volume = settings.engine_volume.clamp(0.0, 1.0);
            self.engine_enabled = settings.engine_sound;
            self.muted = settings.muted;
            if self.muted || !self.engine_enabled {
                self.stop_engine();
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn engine_level(&self) -> f32 {
            if self.muted || !self.engine_enabled {
                0.0
            } else {
                self.master_volume * self.engine_volume * 0.15
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
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

        /// Engine loop - low sawtooth drone, runs until stopped
        fn start_engine(&mut self) {
            let level = self.engine_level();
            if level <= 0.0 || self.engine.is_some() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let Some((osc, gain)) = Self::create_osc(ctx, ENGINE_IDLE_HZ, OscillatorType::Sawtooth)
            else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(0.001, t).ok();
            gain.gain().linear_ramp_to_value_at_time(level, t + 0.3).ok();
            if osc.start().is_err() {
                log::warn!("Engine sound failed to start");
                return;
            }
            self.engine = Some((osc, gain));
            self.boosting = false;
        }

        fn stop_engine(&mut self) {
            let Some((osc, gain)) = self.engine.take() else {
                return;
            };
            let t = self.ctx.as_ref().map(|c| c.current_time()).unwrap_or(0.0);
            gain.gain().set_value_at_time(gain.gain().value(), t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0001, t + 0.15).ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Crash - noisy boom with a metallic crunch
        fn play_crash(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = Self::create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.frequency().set_value_at_time(120.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.5)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.6).ok();
            }

            // Crunch
            if let Some((osc, gain)) = Self::create_osc(ctx, 900.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.frequency().set_value_at_time(900.0, t).ok();
                osc.frequency().set_value_at_time(300.0, t + 0.03).ok();
                osc.frequency().set_value_at_time(1200.0, t + 0.06).ok();
                osc.frequency().set_value_at_time(200.0, t + 0.09).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }

        /// Pickup collect - rising ding
        fn play_pickup(ctx: &AudioContext, vol: f32) {
            for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, cue: AudioCue) {
            match cue {
                AudioCue::EngineStart => self.start_engine(),
                AudioCue::EngineStop => self.stop_engine(),
                AudioCue::Crash | AudioCue::PickupCollected => {
                    let vol = self.effective_volume();
                    if vol <= 0.0 {
                        return;
                    }
                    let Some(ctx) = &self.ctx else { return };

                    // Resume context if suspended (browsers require user gesture)
                    if ctx.state() == web_sys::AudioContextState::Suspended {
                        let _ = ctx.resume();
                    }
                    if cue == AudioCue::Crash {
                        Self::play_crash(ctx, vol);
                    } else {
                        Self::play_pickup(ctx, vol);
                    }
                }
            }
        }

        fn set_boosting(&mut self, boosting: bool) {
            if boosting == self.boosting {
                return;
            }
            self.boosting = boosting;
            let (Some(ctx), Some((osc, _))) = (&self.ctx, &self.engine) else {
                return;
            };
            let target = if boosting { ENGINE_BOOST_HZ } else { ENGINE_IDLE_HZ };
            let t = ctx.current_time();
            osc.frequency()
                .linear_ramp_to_value_at_time(target, t + 0.25)
                .ok();
        }
    }
}
