//! High score storage
//!
//! One named slot holding the best score. The game only reads it at startup
//! and writes it on game over; a failed read counts as zero and a failed write
//! is logged and forgotten.

use std::cell::Cell;
use std::rc::Rc;

/// Where the best score lives
pub trait HighScoreStore {
    /// Stored best, 0 if nothing was saved yet
    fn load(&self) -> u64;
    fn save(&mut self, score: u64);
}

/// In-memory store for tests and headless runs.
///
/// Clones share the same slot, so a test can keep a handle after moving the
/// store into a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<Cell<u64>>,
}

impl MemoryStore {
    pub fn with_score(score: u64) -> Self {
        Self {
            slot: Rc::new(Cell::new(score)),
        }
    }

    pub fn get(&self) -> u64 {
        self.slot.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.slot.get()
    }

    fn save(&mut self, score: u64) {
        self.slot.set(score);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::HighScoreStore;

    /// LocalStorage-backed store
    pub struct LocalStorageStore {
        key: &'static str,
    }

    impl LocalStorageStore {
        pub const DEFAULT_KEY: &'static str = "lane_racer_high";

        pub fn new(key: &'static str) -> Self {
            Self { key }
        }

        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()?.local_storage().ok()?
        }
    }

    impl Default for LocalStorageStore {
        fn default() -> Self {
            Self::new(Self::DEFAULT_KEY)
        }
    }

    impl HighScoreStore for LocalStorageStore {
        fn load(&self) -> u64 {
            Self::storage()
                .and_then(|s| s.get_item(self.key).ok().flatten())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0)
        }

        fn save(&mut self, score: u64) {
            let Some(storage) = Self::storage() else {
                log::warn!("LocalStorage unavailable, high score not saved");
                return;
            };
            if storage.set_item(self.key, &score.to_string()).is_err() {
                log::warn!("Failed to save high score");
            } else {
                log::info!("High score saved ({})", score);
            }
        }
    }
}
