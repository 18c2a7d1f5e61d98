//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so a JSON file can rebalance
//! the game without touching code. Missing fields fall back to the shipped
//! defaults.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Road ===
    /// Number of lanes on the road
    pub lane_count: u8,

    // === Speed ===
    /// Scroll speed in pixels per tick before any multiplier
    pub base_speed: f32,
    /// Speed multiplier while boosting (replaces the difficulty multiplier)
    pub boost_factor: f32,

    // === Boost ===
    /// Ticks granted by collecting a nitro pickup
    pub boost_grant_ticks: u32,
    /// Ticks granted by the boost intent
    pub manual_boost_ticks: u32,
    /// Upper bound for remaining boost ticks
    pub boost_cap_ticks: u32,

    // === Difficulty ramp ===
    /// Ticks between difficulty steps
    pub ramp_interval_ticks: u64,
    pub obstacle_spawn_base: f64,
    pub obstacle_spawn_step: f64,
    pub obstacle_spawn_max: f64,
    pub speed_multiplier_step: f32,
    pub speed_multiplier_max: f32,

    // === Pickups ===
    /// Constant per-tick chance to spawn a nitro
    pub pickup_spawn_chance: f64,
    /// Side length of the square pickup sprite
    pub pickup_size: f32,

    // === Spawn / despawn rows ===
    pub obstacle_spawn_y: f32,
    pub pickup_spawn_y: f32,
    /// Obstacles are culled once this far below the field
    pub obstacle_despawn_margin: f32,
    /// Pickups are culled once this far below the field
    pub pickup_despawn_margin: f32,

    // === Collision / input ===
    /// Slack at the obstacle's bottom and the player's roof before a hit counts
    pub collision_padding: f32,
    /// Lane changes are refused with an obstacle this close to the player row
    pub safe_lane_distance: f32,
    /// Minimum horizontal travel for a touch to count as a swipe
    pub swipe_threshold: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: 3,

            base_speed: 5.0,
            boost_factor: 1.7,

            boost_grant_ticks: 120,
            manual_boost_ticks: 30,
            boost_cap_ticks: 240,

            ramp_interval_ticks: 600,
            obstacle_spawn_base: 0.02,
            obstacle_spawn_step: 0.005,
            obstacle_spawn_max: 0.08,
            speed_multiplier_step: 0.1,
            speed_multiplier_max: 1.5,

            pickup_spawn_chance: 0.005,
            pickup_size: 40.0,

            obstacle_spawn_y: -140.0,
            pickup_spawn_y: -100.0,
            obstacle_despawn_margin: 200.0,
            pickup_despawn_margin: 100.0,

            collision_padding: 18.0,
            safe_lane_distance: 30.0,
            swipe_threshold: 30.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning table from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validated()
    }

    /// Consume self, returning it only if every value is in range
    pub fn validated(self) -> Result<Self, TuningError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lane_count == 0 {
            return Err(TuningError::ZeroLanes);
        }
        if self.ramp_interval_ticks == 0 {
            return Err(TuningError::ZeroRampInterval);
        }

        for (field, value) in [
            ("base_speed", self.base_speed),
            ("boost_factor", self.boost_factor),
            ("speed_multiplier_step", self.speed_multiplier_step),
            ("speed_multiplier_max", self.speed_multiplier_max),
            ("pickup_size", self.pickup_size),
            ("obstacle_spawn_y", self.obstacle_spawn_y),
            ("pickup_spawn_y", self.pickup_spawn_y),
            ("obstacle_despawn_margin", self.obstacle_despawn_margin),
            ("pickup_despawn_margin", self.pickup_despawn_margin),
            ("collision_padding", self.collision_padding),
            ("safe_lane_distance", self.safe_lane_distance),
            ("swipe_threshold", self.swipe_threshold),
        ] {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
        }

        for (field, value) in [
            ("base_speed", self.base_speed),
            ("boost_factor", self.boost_factor),
            ("pickup_size", self.pickup_size),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        // The speed multiplier only ever ramps up from 1.0
        for (field, value) in [
            ("speed_multiplier_step", self.speed_multiplier_step),
            ("obstacle_despawn_margin", self.obstacle_despawn_margin),
            ("pickup_despawn_margin", self.pickup_despawn_margin),
            ("collision_padding", self.collision_padding),
            ("safe_lane_distance", self.safe_lane_distance),
            ("swipe_threshold", self.swipe_threshold),
        ] {
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("obstacle_spawn_base", self.obstacle_spawn_base),
            ("obstacle_spawn_step", self.obstacle_spawn_step),
            ("obstacle_spawn_max", self.obstacle_spawn_max),
            ("pickup_spawn_chance", self.pickup_spawn_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::ProbabilityOutOfRange { field, value });
            }
        }

        if self.obstacle_spawn_max < self.obstacle_spawn_base {
            return Err(TuningError::CapBelowBase {
                field: "obstacle_spawn_max",
                base: self.obstacle_spawn_base,
                cap: self.obstacle_spawn_max,
            });
        }
        if self.speed_multiplier_max < 1.0 {
            return Err(TuningError::CapBelowBase {
                field: "speed_multiplier_max",
                base: 1.0,
                cap: self.speed_multiplier_max as f64,
            });
        }
        if self.boost_cap_ticks < self.boost_grant_ticks {
            return Err(TuningError::CapBelowBase {
                field: "boost_cap_ticks",
                base: self.boost_grant_ticks as f64,
                cap: self.boost_cap_ticks as f64,
            });
        }

        Ok(())
    }

    /// Lane the player starts in (middle lane)
    pub fn start_lane(&self) -> u8 {
        self.lane_count / 2
    }
}
