//! World/screen coordinate rules for a panning viewport.
//!
//! The viewport is a window into the bounded world: `screen_to_world` adds
//! the viewport origin, `world_to_screen` subtracts it. Culling only skips
//! rendering — a culled stroke stays in the model and the store.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::protocol::{WORLD_HEIGHT, WORLD_WIDTH};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A stroke segment is culled only when both endpoints fall beyond the same
/// viewport edge expanded by this many pixels.
pub const CULL_MARGIN: f64 = 50.0;

/// Visible window into the world. The origin is the world position of the
/// viewport's top-left corner; panning moves the origin, never the content.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// A viewport of the given size, centered in the world.
    #[must_use]
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            origin_x: (WORLD_WIDTH - width) / 2.0,
            origin_y: (WORLD_HEIGHT - height) / 2.0,
            width,
            height,
        }
    }

    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: screen.x + self.origin_x, y: screen.y + self.origin_y }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point { x: world.x - self.origin_x, y: world.y - self.origin_y }
    }

    /// Pan the viewport by a screen-space delta, clamped so it never leaves
    /// the world.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.origin_x = (self.origin_x + dx).clamp(0.0, (WORLD_WIDTH - self.width).max(0.0));
        self.origin_y = (self.origin_y + dy).clamp(0.0, (WORLD_HEIGHT - self.height).max(0.0));
    }

    /// Whether a world-space segment should be rendered. False only when
    /// both endpoints lie beyond the same edge of the margin-expanded
    /// viewport; a segment crossing the view is always rendered.
    #[must_use]
    pub fn segment_visible(&self, a: Point, b: Point) -> bool {
        let a = self.world_to_screen(a);
        let b = self.world_to_screen(b);

        if a.x < -CULL_MARGIN && b.x < -CULL_MARGIN {
            return false;
        }
        if a.x > self.width + CULL_MARGIN && b.x > self.width + CULL_MARGIN {
            return false;
        }
        if a.y < -CULL_MARGIN && b.y < -CULL_MARGIN {
            return false;
        }
        if a.y > self.height + CULL_MARGIN && b.y > self.height + CULL_MARGIN {
            return false;
        }
        true
    }
}
