//! Render surface snapshot
//!
//! Everything a presentation layer needs to draw one frame, already laid out
//! in viewport pixels. The core never draws.

use serde::Serialize;

use crate::sim::{GamePhase, GameState, LaneGeometry, Rect, SpriteVariant};

#[derive(Debug, Clone, Serialize)]
pub struct TrafficSprite {
    pub rect: Rect,
    pub variant: SpriteVariant,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    /// Remaining boost as a fraction of the cap (0.0 - 1.0)
    pub boost_level: f32,
    pub boosting: bool,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Left edge and width of the road
    pub road_x: f32,
    pub road_width: f32,
    pub divider_xs: Vec<f32>,
    pub road_offset: f32,
    pub player: Rect,
    pub traffic: Vec<TrafficSprite>,
    pub pickups: Vec<Rect>,
}

impl FrameView {
    pub fn capture(state: &GameState, geometry: &LaneGeometry) -> Self {
        let tuning = &state.tuning;
        let cap = tuning.boost_cap_ticks.max(1) as f32;

        Self {
            phase: state.phase,
            score: state.score,
            high_score: state.high_score,
            boost_level: (state.player.boost_ticks as f32 / cap).min(1.0),
            boosting: state.player.is_boosting(),
            viewport_width: geometry.viewport.x,
            viewport_height: geometry.viewport.y,
            road_x: geometry.margin,
            road_width: geometry.road_width,
            divider_xs: geometry.divider_xs(),
            road_offset: state.road_offset,
            player: geometry.player_rect(state.player.lane),
            traffic: state
                .obstacles
                .iter()
                .map(|o| TrafficSprite {
                    rect: geometry.car_rect(o.lane, o.y),
                    variant: o.variant,
                })
                .collect(),
            pickups: state
                .pickups
                .iter()
                .map(|p| geometry.pickup_rect(p.lane, p.y, tuning.pickup_size))
                .collect(),
        }
    }
}
