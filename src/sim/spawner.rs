//! Traffic and nitro spawning
//!
//! Rolled once per tick. Obstacle odds follow the difficulty ramp; pickup odds
//! are constant.

use rand::Rng;

use super::state::{GameState, Lane, Obstacle, Pickup, SpriteVariant};

/// Maybe append a new obstacle and/or pickup above the field
pub fn spawn(state: &mut GameState) {
    let lane_count = state.tuning.lane_count;
    let obstacle_chance = state.difficulty.spawn_chance;
    let pickup_chance = state.tuning.pickup_spawn_chance;
    let obstacle_y = state.tuning.obstacle_spawn_y;
    let pickup_y = state.tuning.pickup_spawn_y;

    let rng = state.rng();
    let obstacle = rng.random_bool(obstacle_chance).then(|| Obstacle {
        lane: Lane::new(rng.random_range(0..lane_count)),
        y: obstacle_y,
        variant: if rng.random_bool(0.5) {
            SpriteVariant::A
        } else {
            SpriteVariant::B
        },
    });
    let pickup = rng.random_bool(pickup_chance).then(|| Pickup {
        lane: Lane::new(rng.random_range(0..lane_count)),
        y: pickup_y,
    });

    state.obstacles.extend(obstacle);
    state.pickups.extend(pickup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_certain_spawns_land_above_field() {
        let tuning = Tuning {
            obstacle_spawn_base: 1.0,
            obstacle_spawn_max: 1.0,
            pickup_spawn_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 11, 0);
        spawn(&mut state);

        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.obstacles[0].y, -140.0);
        assert_eq!(state.pickups[0].y, -100.0);
    }

    #[test]
    fn test_zero_odds_never_spawn() {
        let tuning = Tuning {
            obstacle_spawn_base: 0.0,
            pickup_spawn_chance: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 11, 0);
        for _ in 0..1000 {
            spawn(&mut state);
        }
        assert!(state.obstacles.is_empty());
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_lanes_cover_road_uniformly() {
        let tuning = Tuning {
            obstacle_spawn_base: 1.0,
            obstacle_spawn_max: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 2024, 0);
        for _ in 0..3000 {
            spawn(&mut state);
        }

        let mut per_lane = [0usize; 3];
        for o in &state.obstacles {
            assert!(o.lane.index() < 3);
            per_lane[o.lane.index() as usize] += 1;
        }
        // Each lane should get roughly a third
        for count in per_lane {
            assert!((800..1200).contains(&count), "lane count {count}");
        }
        assert!(state.obstacles.iter().any(|o| o.variant == SpriteVariant::A));
        assert!(state.obstacles.iter().any(|o| o.variant == SpriteVariant::B));
    }

    #[test]
    fn test_same_seed_same_traffic() {
        let run = |seed| {
            let mut state = GameState::new(Tuning::default(), seed, 0);
            for _ in 0..2000 {
                spawn(&mut state);
            }
            state
                .obstacles
                .iter()
                .map(|o| o.lane.index())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }
}
