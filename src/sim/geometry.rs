//! Lane geometry for the road
//!
//! Everything here is a pure function of viewport size and lane count. It is
//! recomputed on every resize and read every frame, so it never touches entity
//! state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Lane;
use crate::consts::*;

/// Axis-aligned rectangle in field pixels (top-left origin, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap on both axes (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Derived road layout for one viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneGeometry {
    pub viewport: Vec2,
    pub lane_count: u8,
    /// Left edge of the (possibly capped) road
    pub margin: f32,
    pub road_width: f32,
    pub lane_width: f32,
    pub car_width: f32,
    pub car_height: f32,
    /// Top edge of the player's car
    pub player_y: f32,
}

impl LaneGeometry {
    /// Compute the layout, or `None` for a degenerate viewport
    pub fn new(width: f32, height: f32, lane_count: u8) -> Option<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return None;
        }
        if lane_count == 0 {
            return None;
        }

        let road_width = width.min(MAX_ROAD_WIDTH);
        let margin = (width - road_width) / 2.0;
        let lane_width = road_width / lane_count as f32;
        let car_width = lane_width * CAR_WIDTH_FRACTION;
        let car_height = car_width * 2.0;
        let bottom_margin = if width < NARROW_VIEWPORT_WIDTH {
            NARROW_BOTTOM_MARGIN
        } else {
            WIDE_BOTTOM_MARGIN
        };

        Some(Self {
            viewport: Vec2::new(width, height),
            lane_count,
            margin,
            road_width,
            lane_width,
            car_width,
            car_height,
            player_y: height - car_height - bottom_margin,
        })
    }

    /// Layout used when no real viewport exists (tests, native runner)
    pub fn headless(lane_count: u8) -> Option<Self> {
        Self::new(HEADLESS_WIDTH, HEADLESS_HEIGHT, lane_count)
    }

    /// Height of the visible field
    #[inline]
    pub fn field_height(&self) -> f32 {
        self.viewport.y
    }

    /// Horizontal centre of a lane
    #[inline]
    pub fn lane_center_x(&self, lane: Lane) -> f32 {
        self.margin + lane.index() as f32 * self.lane_width + self.lane_width / 2.0
    }

    /// Left edge of a car driving in `lane`
    #[inline]
    pub fn car_x(&self, lane: Lane) -> f32 {
        self.lane_center_x(lane) - self.car_width / 2.0
    }

    /// Bounding box of a car whose top edge is at `y`
    pub fn car_rect(&self, lane: Lane, y: f32) -> Rect {
        Rect::new(self.car_x(lane), y, self.car_width, self.car_height)
    }

    pub fn player_rect(&self, lane: Lane) -> Rect {
        self.car_rect(lane, self.player_y)
    }

    /// Bounding box of a square pickup centred in `lane`
    pub fn pickup_rect(&self, lane: Lane, y: f32, size: f32) -> Rect {
        Rect::new(self.lane_center_x(lane) - size / 2.0, y, size, size)
    }

    /// X positions of the dashed dividers between lanes
    pub fn divider_xs(&self) -> Vec<f32> {
        (1..self.lane_count)
            .map(|i| self.margin + i as f32 * self.lane_width)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_centres_narrow_viewport() {
        let geo = LaneGeometry::new(480.0, 800.0, 3).unwrap();
        assert_eq!(geo.margin, 0.0);
        assert_eq!(geo.lane_width, 160.0);
        assert_eq!(geo.car_width, 80.0);
        assert_eq!(geo.car_height, 160.0);
        assert_eq!(geo.lane_center_x(Lane::new(0)), 80.0);
        assert_eq!(geo.lane_center_x(Lane::new(1)), 240.0);
        assert_eq!(geo.lane_center_x(Lane::new(2)), 400.0);
        // Narrow screens leave room for the on-screen buttons
        assert_eq!(geo.player_y, 800.0 - 160.0 - NARROW_BOTTOM_MARGIN);
    }

    #[test]
    fn test_road_is_capped_and_centred() {
        let geo = LaneGeometry::new(1280.0, 720.0, 3).unwrap();
        assert_eq!(geo.road_width, MAX_ROAD_WIDTH);
        assert_eq!(geo.margin, (1280.0 - MAX_ROAD_WIDTH) / 2.0);
        assert_eq!(geo.lane_center_x(Lane::new(1)), 640.0);
        assert_eq!(geo.player_y, 720.0 - geo.car_height - WIDE_BOTTOM_MARGIN);
        assert_eq!(geo.divider_xs(), vec![400.0 + 160.0, 400.0 + 320.0]);
    }

    #[test]
    fn test_pure_for_same_size() {
        let a = LaneGeometry::new(375.0, 667.0, 3);
        let b = LaneGeometry::new(375.0, 667.0, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_viewport() {
        assert!(LaneGeometry::new(0.0, 800.0, 3).is_none());
        assert!(LaneGeometry::new(480.0, 0.0, 3).is_none());
        assert!(LaneGeometry::new(-10.0, 800.0, 3).is_none());
        assert!(LaneGeometry::new(f32::NAN, 800.0, 3).is_none());
        assert!(LaneGeometry::new(480.0, 800.0, 0).is_none());
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 20.0, 10.0, 10.0)));
    }
}
