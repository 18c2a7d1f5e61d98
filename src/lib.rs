//! Lane Racer - A lane-dodging arcade racer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, spawning, collisions, game state)
//! - `session`: One player's game, wired to storage and audio
//! - `driver`: Frame-driven game loop with a pluggable frame source
//! - `renderer`: Canvas 2D drawing of a `FrameView`
//! - `platform`: Keyboard, touch and button mapping
//! - `persistence`: High score storage
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod driver;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod view;

pub use driver::{FrameScheduler, LoopDriver, VirtualClock};
pub use error::TuningError;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;
pub use view::FrameView;

/// Game configuration constants
pub mod consts {
    /// Simulation steps per second (one per frame)
    pub const SIM_HZ: u32 = 60;

    /// Road never grows wider than this, wider viewports get grass margins
    pub const MAX_ROAD_WIDTH: f32 = 480.0;
    /// Car width as a fraction of lane width (height is twice the width)
    pub const CAR_WIDTH_FRACTION: f32 = 0.5;

    /// Below this width the on-screen controls take the bottom of the screen
    pub const NARROW_VIEWPORT_WIDTH: f32 = 900.0;
    pub const NARROW_BOTTOM_MARGIN: f32 = 160.0;
    pub const WIDE_BOTTOM_MARGIN: f32 = 30.0;

    /// Viewport used before the first resize and by the native runner
    pub const HEADLESS_WIDTH: f32 = 480.0;
    pub const HEADLESS_HEIGHT: f32 = 800.0;
}
