//! Draw list generation
//!
//! Converts a [`FrameView`] into filled rectangles in back-to-front order. The
//! canvas backend only replays the list.

use crate::settings::Settings;
use crate::sim::{Rect, SpriteVariant};
use crate::view::FrameView;

pub const GRASS: &str = "#2f6b2f";
pub const ROAD: &str = "#3a3a3a";
pub const DIVIDER: &str = "#f2f2f2";
pub const PLAYER: &str = "#e53935";
pub const PLAYER_BOOST: &str = "#ff9800";
pub const TRAFFIC_A: &str = "#1e88e5";
pub const TRAFFIC_B: &str = "#fdd835";
pub const WINDSHIELD: &str = "#90caf9";
pub const PICKUP: &str = "#00e676";

/// Dashed lane marking
const DASH_LENGTH: f32 = 40.0;
const DASH_GAP: f32 = 30.0;
const DIVIDER_WIDTH: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub rect: Rect,
    pub color: &'static str,
}

fn fill(rect: Rect, color: &'static str) -> Fill {
    Fill { rect, color }
}

fn traffic_color(variant: SpriteVariant) -> &'static str {
    match variant {
        SpriteVariant::A => TRAFFIC_A,
        SpriteVariant::B => TRAFFIC_B,
    }
}

/// Dashes for one divider, scrolled down by `offset`
pub fn divider_dashes(x: f32, height: f32, offset: f32) -> Vec<Rect> {
    let period = DASH_LENGTH + DASH_GAP;
    let mut y = offset.rem_euclid(period) - period;
    let mut dashes = Vec::new();
    while y < height {
        dashes.push(Rect::new(x - DIVIDER_WIDTH / 2.0, y, DIVIDER_WIDTH, DASH_LENGTH));
        y += period;
    }
    dashes
}

/// Car body plus a windshield strip near the front
fn car(rect: Rect, body: &'static str, facing_up: bool) -> [Fill; 2] {
    let shield_h = rect.size.y * 0.18;
    let shield_y = if facing_up {
        rect.min.y + rect.size.y * 0.2
    } else {
        rect.max().y - rect.size.y * 0.2 - shield_h
    };
    [
        fill(rect, body),
        fill(
            Rect::new(rect.min.x + rect.size.x * 0.15, shield_y, rect.size.x * 0.7, shield_h),
            WINDSHIELD,
        ),
    ]
}

/// Build the frame's draw list
pub fn frame(view: &FrameView, settings: &Settings) -> Vec<Fill> {
    let offset = settings.effective_road_offset(view.road_offset);
    let mut fills = Vec::with_capacity(8 + view.traffic.len() * 2 + view.pickups.len());

    fills.push(fill(
        Rect::new(0.0, 0.0, view.viewport_width, view.viewport_height),
        GRASS,
    ));
    fills.push(fill(
        Rect::new(view.road_x, 0.0, view.road_width, view.viewport_height),
        ROAD,
    ));
    for &x in &view.divider_xs {
        fills.extend(
            divider_dashes(x, view.viewport_height, offset)
                .into_iter()
                .map(|r| fill(r, DIVIDER)),
        );
    }

    fills.extend(view.pickups.iter().map(|&r| fill(r, PICKUP)));
    for sprite in &view.traffic {
        fills.extend(car(sprite.rect, traffic_color(sprite.variant), false));
    }

    let body = if view.boosting { PLAYER_BOOST } else { PLAYER };
    fills.extend(car(view.player, body, true));
    fills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameState, Lane, LaneGeometry, Obstacle};
    use crate::tuning::Tuning;

    #[test]
    fn test_dashes_cover_field() {
        let dashes = divider_dashes(100.0, 700.0, 0.0);
        assert_eq!(dashes[0].min.y, -70.0);
        assert!(dashes.last().unwrap().max().y >= 700.0 - DASH_GAP);
        assert!(dashes.iter().all(|d| d.min.x == 98.0));
    }

    #[test]
    fn test_dashes_scroll_with_offset() {
        let still = divider_dashes(0.0, 700.0, 0.0);
        let moved = divider_dashes(0.0, 700.0, 10.0);
        assert_eq!(moved[0].min.y, still[0].min.y + 10.0);

        // A full period looks the same
        let wrapped = divider_dashes(0.0, 700.0, DASH_LENGTH + DASH_GAP);
        assert_eq!(wrapped, still);
    }

    #[test]
    fn test_frame_draws_player_last() {
        let geometry = LaneGeometry::headless(3).unwrap();
        let mut state = GameState::new(Tuning::default(), 1, 0);
        state.start();
        state.obstacles.push(Obstacle {
            lane: Lane::new(0),
            y: 30.0,
            variant: SpriteVariant::B,
        });
        let view = FrameView::capture(&state, &geometry);

        let fills = frame(&view, &Settings::default());

        assert_eq!(fills[0].color, GRASS);
        assert_eq!(fills[1].color, ROAD);
        assert!(fills.iter().any(|f| f.color == TRAFFIC_B));
        let n = fills.len();
        assert_eq!(fills[n - 2].rect, view.player);
        assert_eq!(fills[n - 2].color, PLAYER);
    }

    #[test]
    fn test_reduced_motion_pins_dashes() {
        let geometry = LaneGeometry::headless(3).unwrap();
        let mut state = GameState::new(Tuning::default(), 1, 0);
        state.road_offset = 25.0;
        let view = FrameView::capture(&state, &geometry);
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };

        let first_dash = frame(&view, &settings)
            .into_iter()
            .find(|f| f.color == DIVIDER)
            .unwrap();
        assert_eq!(first_dash.rect.min.y, -(DASH_LENGTH + DASH_GAP));
    }
}
