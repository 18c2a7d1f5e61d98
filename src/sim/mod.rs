//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod geometry;
pub mod input;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{lane_is_safe, obstacle_hits_player, pickup_touches_player};
pub use geometry::{LaneGeometry, Rect};
pub use input::{Intent, apply_intent, request_boost, request_lane_change, request_pause_toggle};
pub use spawner::spawn;
pub use state::{
    Difficulty, Direction, GameEvent, GamePhase, GameState, Lane, Obstacle, Pickup, Player,
    SpriteVariant,
};
pub use tick::tick;
