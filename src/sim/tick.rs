//! Per-frame simulation step
//!
//! Advances the run by one tick. Does nothing outside `GamePhase::Playing`.

use super::collision::{obstacle_hits_player, pickup_touches_player};
use super::geometry::LaneGeometry;
use super::spawner::spawn;
use super::state::{GameEvent, GamePhase, GameState};

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, geometry: &LaneGeometry) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if state.difficulty.advance(&state.tuning) {
        log::debug!(
            "Difficulty up at tick {}: spawn {:.3}, speed x{:.2}",
            state.difficulty.ticks,
            state.difficulty.spawn_chance,
            state.difficulty.speed_multiplier
        );
    }

    spawn(state);

    let speed = current_speed(state);

    for obstacle in &mut state.obstacles {
        obstacle.y += speed;
    }
    for pickup in &mut state.pickups {
        pickup.y += speed;
    }

    // Cull everything that scrolled off the bottom
    let field_height = geometry.field_height();
    let obstacle_limit = field_height + state.tuning.obstacle_despawn_margin;
    let pickup_limit = field_height + state.tuning.pickup_despawn_margin;
    state.obstacles.retain(|o| o.y < obstacle_limit);
    state.pickups.retain(|p| p.y < pickup_limit);

    resolve_collisions(state, geometry);
    collect_pickups(state, geometry);

    if state.player.alive {
        state.score += 1;
    }

    state.road_offset = (state.road_offset + speed) % field_height;
}

/// Resolve this tick's speed and burn one boost tick if boosting
fn current_speed(state: &mut GameState) -> f32 {
    let player = &mut state.player;
    if player.is_boosting() {
        player.boost_ticks -= 1;
        player.base_speed * state.tuning.boost_factor
    } else {
        player.base_speed * state.difficulty.speed_multiplier
    }
}

fn resolve_collisions(state: &mut GameState, geometry: &LaneGeometry) {
    if !state.player.alive {
        return;
    }
    let lane = state.player.lane;
    let padding = state.tuning.collision_padding;
    let crashed = state
        .obstacles
        .iter()
        .any(|o| obstacle_hits_player(o, lane, geometry, padding));
    if crashed {
        state.end_run();
    }
}

fn collect_pickups(state: &mut GameState, geometry: &LaneGeometry) {
    let lane = state.player.lane;
    let size = state.tuning.pickup_size;
    let before = state.pickups.len();
    state
        .pickups
        .retain(|p| !pickup_touches_player(p, lane, geometry, size));
    let collected = before - state.pickups.len();

    for _ in 0..collected {
        state
            .player
            .add_boost(state.tuning.boost_grant_ticks, state.tuning.boost_cap_ticks);
        state.events.push(GameEvent::PickupCollected { lane });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Lane, Obstacle, Pickup, SpriteVariant};
    use crate::tuning::Tuning;

    /// Tuning with spawning disabled so tests control all traffic
    fn quiet_tuning() -> Tuning {
        Tuning {
            obstacle_spawn_base: 0.0,
            obstacle_spawn_step: 0.0,
            obstacle_spawn_max: 0.0,
            pickup_spawn_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn playing(tuning: Tuning, high_score: u64) -> (GameState, LaneGeometry) {
        let geometry = LaneGeometry::headless(tuning.lane_count).unwrap();
        let mut state = GameState::new(tuning, 12345, high_score);
        state.start();
        state.drain_events();
        (state, geometry)
    }

    #[test]
    fn test_menu_and_pause_do_not_tick() {
        let geometry = LaneGeometry::headless(3).unwrap();
        let mut state = GameState::new(quiet_tuning(), 1, 0);
        tick(&mut state, &geometry);
        assert_eq!(state.score, 0);

        state.start();
        state.phase = GamePhase::Paused;
        tick(&mut state, &geometry);
        assert_eq!(state.score, 0);
        assert_eq!(state.difficulty.ticks, 0);
    }

    #[test]
    fn test_score_counts_ticks() {
        let (mut state, geometry) = playing(quiet_tuning(), 0);
        for expected in 1..=250 {
            tick(&mut state, &geometry);
            assert_eq!(state.score, expected);
        }
    }

    #[test]
    fn test_crash_on_player_row() {
        let (mut state, geometry) = playing(quiet_tuning(), 3);
        for _ in 0..10 {
            tick(&mut state, &geometry);
        }
        state.obstacles.push(Obstacle {
            lane: Lane::new(1),
            y: geometry.player_y,
            variant: SpriteVariant::B,
        });

        tick(&mut state, &geometry);

        assert!(!state.player.alive);
        assert_eq!(state.phase, GamePhase::GameOver);
        // Score stops at the value it had when the crash resolved
        assert_eq!(state.score, 10);
        assert_eq!(state.high_score, 10);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Crash));
        assert!(events.contains(&GameEvent::GameOver {
            score: 10,
            high_score: 10
        }));
    }

    #[test]
    fn test_crash_keeps_better_high_score() {
        let (mut state, geometry) = playing(quiet_tuning(), 500);
        state.obstacles.push(Obstacle {
            lane: Lane::new(1),
            y: geometry.player_y,
            variant: SpriteVariant::A,
        });
        tick(&mut state, &geometry);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 500);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let (mut state, geometry) = playing(quiet_tuning(), 0);
        for lane in 0..3 {
            state.obstacles.push(Obstacle {
                lane: Lane::new(lane),
                y: geometry.player_y,
                variant: SpriteVariant::A,
            });
        }
        state.obstacles.push(Obstacle {
            lane: Lane::new(1),
            y: geometry.player_y + 10.0,
            variant: SpriteVariant::A,
        });
        tick(&mut state, &geometry);
        tick(&mut state, &geometry);

        // Collisions after death are no-ops, even if the caller pokes the state
        state.phase = GamePhase::Playing;
        tick(&mut state, &geometry);

        let game_overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_pickup_grants_boost() {
        let (mut state, geometry) = playing(quiet_tuning(), 0);
        state.pickups.push(Pickup {
            lane: Lane::new(1),
            y: geometry.player_y,
        });

        tick(&mut state, &geometry);

        assert_eq!(state.player.boost_ticks, state.tuning.boost_grant_ticks);
        assert!(state.pickups.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PickupCollected { lane: Lane::new(1) }]
        );
    }

    #[test]
    fn test_pickup_in_other_lane_is_left_alone() {
        let (mut state, geometry) = playing(quiet_tuning(), 0);
        state.pickups.push(Pickup {
            lane: Lane::new(2),
            y: geometry.player_y,
        });
        tick(&mut state, &geometry);
        assert_eq!(state.player.boost_ticks, 0);
        assert_eq!(state.pickups.len(), 1);
    }

    #[test]
    fn test_boost_speeds_up_scrolling() {
        let (mut state, geometry) = playing(quiet_tuning(), 0);
        state.player.boost_ticks = 2;
        state.pickups.push(Pickup {
            lane: Lane::new(0),
            y: 0.0,
        });

        tick(&mut state, &geometry);
        assert!((state.pickups[0].y - 5.0 * 1.7).abs() < 1e-4);
        assert_eq!(state.player.boost_ticks, 1);

        tick(&mut state, &geometry);
        tick(&mut state, &geometry);
        // Two boosted ticks, then one at base speed
        assert!((state.pickups[0].y - (5.0 * 1.7 * 2.0 + 5.0)).abs() < 1e-4);
        assert_eq!(state.player.boost_ticks, 0);
    }

    #[test]
    fn test_entities_are_culled_below_field() {
        let (mut state, geometry) = playing(quiet_tuning(), 0);
        state.obstacles.push(Obstacle {
            lane: Lane::new(0),
            y: geometry.field_height() + 199.0,
            variant: SpriteVariant::A,
        });
        state.pickups.push(Pickup {
            lane: Lane::new(2),
            y: geometry.field_height() + 99.0,
        });
        tick(&mut state, &geometry);
        assert!(state.obstacles.is_empty());
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_live_set_stays_bounded() {
        let tuning = Tuning {
            obstacle_spawn_base: 1.0,
            obstacle_spawn_max: 1.0,
            pickup_spawn_chance: 1.0,
            ..Tuning::default()
        };
        let (mut state, geometry) = playing(tuning, 0);
        // Slowest possible scroll is base speed, so nothing lives longer than this
        let limit = ((geometry.field_height() + 340.0) / 5.0).ceil() as usize + 1;
        for _ in 0..2000 {
            // Revive after every crash so the run keeps going
            state.player.alive = true;
            state.phase = GamePhase::Playing;
            tick(&mut state, &geometry);
            assert!(state.obstacles.len() <= limit);
            assert!(state.pickups.len() <= limit);
        }
    }

    #[test]
    fn test_road_offset_wraps() {
        let (mut state, geometry) = playing(quiet_tuning(), 0);
        for _ in 0..1000 {
            tick(&mut state, &geometry);
            assert!(state.road_offset >= 0.0 && state.road_offset < geometry.field_height());
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical runs
        let geometry = LaneGeometry::headless(3).unwrap();
        let mut a = GameState::new(Tuning::default(), 99999, 0);
        let mut b = GameState::new(Tuning::default(), 99999, 0);
        a.start();
        b.start();

        for _ in 0..3000 {
            tick(&mut a, &geometry);
            tick(&mut b, &geometry);
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
    }
}
