//! Game settings and preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Mute everything (the Mute/Unmute button)
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Engine loop volume (0.0 - 1.0)
    pub engine_volume: f32,
    /// Play the engine loop at all
    pub engine_sound: bool,
    /// Pause the run when the tab is hidden or the window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (freeze the scrolling road texture)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            engine_volume: 0.6,
            engine_sound: true,
            mute_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Flip mute, returning the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Road scroll offset to draw, honouring reduced motion
    pub fn effective_road_offset(&self, offset: f32) -> f32 {
        if self.reduced_motion { 0.0 } else { offset }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_racer_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save settings");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
