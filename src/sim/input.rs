//! Player intents
//!
//! Raw devices (keys, swipes, buttons) are translated to an [`Intent`] by the
//! platform layer. Handlers here apply the intent to the state or reject it.
//! A rejected intent is a silent no-op; the return value only reports whether
//! anything changed.

use serde::{Deserialize, Serialize};

use super::collision::lane_is_safe;
use super::geometry::LaneGeometry;
use super::state::{Direction, GameEvent, GamePhase, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Boost,
    PauseToggle,
}

/// Apply one intent
pub fn apply_intent(state: &mut GameState, geometry: &LaneGeometry, intent: Intent) -> bool {
    match intent {
        Intent::MoveLeft => request_lane_change(state, geometry, Direction::Left),
        Intent::MoveRight => request_lane_change(state, geometry, Direction::Right),
        Intent::Boost => request_boost(state),
        Intent::PauseToggle => request_pause_toggle(state),
    }
}

pub fn request_lane_change(state: &mut GameState, geometry: &LaneGeometry, dir: Direction) -> bool {
    if state.phase != GamePhase::Playing || !state.player.alive {
        return false;
    }
    let Some(target) = state.player.lane.step(dir, state.tuning.lane_count) else {
        return false;
    };
    if !lane_is_safe(
        &state.obstacles,
        target,
        geometry,
        state.tuning.safe_lane_distance,
    ) {
        log::debug!("Lane change to {} refused: traffic alongside", target.index());
        return false;
    }
    state.player.lane = target;
    true
}

pub fn request_boost(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing || !state.player.alive {
        return false;
    }
    let before = state.player.boost_ticks;
    state
        .player
        .add_boost(state.tuning.manual_boost_ticks, state.tuning.boost_cap_ticks);
    if before == 0 && state.player.is_boosting() {
        state.events.push(GameEvent::BoostEngaged);
    }
    state.player.boost_ticks != before
}

/// Playing ⇄ Paused; entities are left untouched
pub fn request_pause_toggle(state: &mut GameState) -> bool {
    match state.phase {
        GamePhase::Playing => {
            state.phase = GamePhase::Paused;
            state.events.push(GameEvent::EngineStop);
            true
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Playing;
            state.events.push(GameEvent::EngineStart);
            true
        }
        GamePhase::Menu | GamePhase::GameOver => false,
    }
}
