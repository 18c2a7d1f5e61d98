//! Game state and core simulation types
//!
//! One `GameState` exists per session. It is mutated only by [`super::tick`]
//! and the intent handlers in [`super::input`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused (only reachable from Playing)
    Paused,
    /// Run ended by a crash
    GameOver,
}

/// Lane index, always below the session's lane count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Lane(u8);

impl Lane {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Neighbouring lane in `dir`, or `None` past the road edge
    pub fn step(self, dir: Direction, lane_count: u8) -> Option<Lane> {
        match dir {
            Direction::Left => self.0.checked_sub(1).map(Lane),
            Direction::Right => {
                let next = self.0 + 1;
                (next < lane_count).then_some(Lane(next))
            }
        }
    }
}

/// Horizontal steering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Which traffic sprite an obstacle is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteVariant {
    A,
    B,
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub lane: Lane,
    /// Ticks of nitro left
    pub boost_ticks: u32,
    pub base_speed: f32,
    pub alive: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            lane: Lane::new(tuning.start_lane()),
            boost_ticks: 0,
            base_speed: tuning.base_speed,
            alive: true,
        }
    }

    /// Add boost ticks without exceeding `cap`
    pub fn add_boost(&mut self, ticks: u32, cap: u32) {
        self.boost_ticks = self.boost_ticks.saturating_add(ticks).min(cap);
    }

    #[inline]
    pub fn is_boosting(&self) -> bool {
        self.boost_ticks > 0
    }
}

/// Oncoming traffic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub lane: Lane,
    /// Top edge, in field pixels
    pub y: f32,
    pub variant: SpriteVariant,
}

/// A nitro canister
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub lane: Lane,
    /// Top edge, in field pixels
    pub y: f32,
}

/// Difficulty ramp, stepped every `ramp_interval_ticks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    pub spawn_chance: f64,
    pub speed_multiplier: f32,
    pub ticks: u64,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn_chance: tuning.obstacle_spawn_base,
            speed_multiplier: 1.0,
            ticks: 0,
        }
    }

    /// Count one tick and apply a ramp step when the interval elapses.
    /// Returns true when a step was applied.
    pub fn advance(&mut self, tuning: &Tuning) -> bool {
        self.ticks += 1;
        if !self.ticks.is_multiple_of(tuning.ramp_interval_ticks) {
            return false;
        }
        self.spawn_chance =
            (self.spawn_chance + tuning.obstacle_spawn_step).min(tuning.obstacle_spawn_max);
        self.speed_multiplier =
            (self.speed_multiplier + tuning.speed_multiplier_step).min(tuning.speed_multiplier_max);
        true
    }
}

/// Something that happened during a tick or intent, for audio and HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    EngineStart,
    EngineStop,
    Crash,
    PickupCollected { lane: Lane },
    BoostEngaged,
    GameOver { score: u64, high_score: u64 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<Pickup>,
    pub difficulty: Difficulty,
    pub score: u64,
    pub high_score: u64,
    /// Background scroll, presentation only
    pub road_offset: f32,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state sitting on the menu
    pub fn new(tuning: Tuning, seed: u64, high_score: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            phase: GamePhase::Menu,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            difficulty: Difficulty::new(&tuning),
            score: 0,
            high_score,
            road_offset: 0.0,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Start or restart a run. Ignored while already playing.
    pub fn start(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }
        self.score = 0;
        self.obstacles.clear();
        self.pickups.clear();
        self.difficulty = Difficulty::new(&self.tuning);
        self.player = Player::new(&self.tuning);
        self.road_offset = 0.0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::EngineStart);
        log::info!("Run started (seed {})", self.seed);
        true
    }

    /// Mark the player dead and end the run. Only the first call has effect.
    pub fn end_run(&mut self) -> bool {
        if !self.player.alive {
            return false;
        }
        self.player.alive = false;
        self.high_score = self.high_score.max(self.score);
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::EngineStop);
        self.events.push(GameEvent::Crash);
        self.events.push(GameEvent::GameOver {
            score: self.score,
            high_score: self.high_score,
        });
        log::info!("Game over: score {} (best {})", self.score, self.high_score);
        true
    }

    /// Take the events raised so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
