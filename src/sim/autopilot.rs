//! Idle/demo mode driver
//!
//! Looks at the traffic ahead and suggests a lane change. Stays put when the
//! current lane is clear, detours for nitro when no car is close.

use super::collision::lane_is_safe;
use super::geometry::LaneGeometry;
use super::input::Intent;
use super::state::{Direction, GamePhase, GameState, Lane};

/// How far above the player the autopilot looks, in car lengths
const LOOKAHEAD_CARS: f32 = 2.5;

/// Distance from the player row to the nearest car ahead in `lane`
fn gap_ahead(state: &GameState, geometry: &LaneGeometry, lane: Lane) -> f32 {
    state
        .obstacles
        .iter()
        .filter(|o| o.lane == lane && o.y < geometry.player_y + geometry.car_height)
        .map(|o| geometry.player_y - o.y)
        .fold(f32::INFINITY, f32::min)
}

fn nearest_pickup_lane(state: &GameState, geometry: &LaneGeometry) -> Option<Lane> {
    state
        .pickups
        .iter()
        .filter(|p| p.y < geometry.player_y)
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .map(|p| p.lane)
}

fn toward(from: Lane, to: Lane) -> Option<Intent> {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => Some(Intent::MoveRight),
        std::cmp::Ordering::Greater => Some(Intent::MoveLeft),
        std::cmp::Ordering::Equal => None,
    }
}

/// Pick the intent for this tick, if any
pub fn suggest(state: &GameState, geometry: &LaneGeometry) -> Option<Intent> {
    if state.phase != GamePhase::Playing || !state.player.alive {
        return None;
    }

    let lane = state.player.lane;
    let lane_count = state.tuning.lane_count;
    let danger = geometry.car_height * LOOKAHEAD_CARS;
    let safe_distance = state.tuning.safe_lane_distance;

    if gap_ahead(state, geometry, lane) > danger {
        // Clear road: grab nitro if the neighbouring lane is open
        let target = nearest_pickup_lane(state, geometry)?;
        let intent = toward(lane, target)?;
        let dir = match intent {
            Intent::MoveLeft => Direction::Left,
            _ => Direction::Right,
        };
        let next = lane.step(dir, lane_count)?;
        let open = gap_ahead(state, geometry, next) > danger
            && lane_is_safe(&state.obstacles, next, geometry, safe_distance);
        return open.then_some(intent);
    }

    // Something is coming: move toward the neighbour with the biggest gap
    [Direction::Left, Direction::Right]
        .into_iter()
        .filter_map(|dir| lane.step(dir, lane_count).map(|l| (dir, l)))
        .filter(|&(_, l)| lane_is_safe(&state.obstacles, l, geometry, safe_distance))
        .map(|(dir, l)| (dir, gap_ahead(state, geometry, l)))
        .filter(|&(_, gap)| gap > gap_ahead(state, geometry, lane))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(dir, _)| match dir {
            Direction::Left => Intent::MoveLeft,
            Direction::Right => Intent::MoveRight,
        })
}
