//! Lane-based collision and pickup tests
//!
//! Cars collide when they share a lane and fall inside a padded vertical band:
//! the obstacle's bottom bumper and the player's roof each give
//! `collision_padding` of slack, so a car that only grazes the player's nose
//! does not end the run. An obstacle reaching into the player's rear still
//! counts. Pickups use the unpadded player box.

use super::geometry::LaneGeometry;
use super::state::{Lane, Obstacle, Pickup};

/// Does `obstacle` hit the player's car in `player_lane`?
pub fn obstacle_hits_player(
    obstacle: &Obstacle,
    player_lane: Lane,
    geometry: &LaneGeometry,
    padding: f32,
) -> bool {
    if obstacle.lane != player_lane {
        return false;
    }
    let h = geometry.car_height;
    let py = geometry.player_y;
    obstacle.y + h - padding > py + padding && obstacle.y < py + h
}

/// Is `pickup` touching the player's car in `player_lane`?
pub fn pickup_touches_player(
    pickup: &Pickup,
    player_lane: Lane,
    geometry: &LaneGeometry,
    pickup_size: f32,
) -> bool {
    if pickup.lane != player_lane {
        return false;
    }
    let player = geometry.player_rect(player_lane);
    let canister = geometry.pickup_rect(pickup.lane, pickup.y, pickup_size);
    player.intersects(&canister)
}

/// True unless an obstacle in `lane` is within `distance` of the player row
pub fn lane_is_safe(
    obstacles: &[Obstacle],
    lane: Lane,
    geometry: &LaneGeometry,
    distance: f32,
) -> bool {
    !obstacles
        .iter()
        .any(|o| o.lane == lane && (o.y - geometry.player_y).abs() < distance)
}
