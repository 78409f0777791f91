//! Viewport pan and zoom
//!
//! Screen space and field space are related by `screen = field * zoom +
//! offset`, both with y pointing down. Wheel zoom is pivoted at the cursor.
//! While a zoom gesture runs, the background grid drops to cached fidelity;
//! a single settle deadline, pushed back by every wheel event, restores full
//! fidelity once the wheel goes quiet.

use crate::core::settings::{
    KEYBOARD_ZOOM_STEP, MAX_ZOOM, MIN_ZOOM, WHEEL_ZOOM_BASE, ZOOM_SETTLE_SECS,
};
use crate::geometry::grid::GridFidelity;
use kurbo::{Point, Rect, Size, Vec2};

/// Result of feeding one wheel event to the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelOutcome {
    pub zoom: f64,
    /// The host must not run its own default zoom/scroll for this event
    pub consumed: bool,
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    zoom: f64,
    offset: Vec2,
    grid_fidelity: GridFidelity,
    /// Time at which the grid returns to full fidelity
    settle_deadline: Option<f64>,
    /// Size of the drawing surface in screen pixels
    screen: Size,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
            grid_fidelity: GridFidelity::Full,
            settle_deadline: None,
            screen: Size::new(1280.0, 720.0),
        }
    }
}

impl ViewportController {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn grid_fidelity(&self) -> GridFidelity {
        self.grid_fidelity
    }

    pub fn settle_deadline(&self) -> Option<f64> {
        self.settle_deadline
    }

    pub fn screen_size(&self) -> Size {
        self.screen
    }

    pub fn screen_center(&self) -> Point {
        Point::new(self.screen.width / 2.0, self.screen.height / 2.0)
    }

    /// Ignores degenerate sizes, e.g. a minimized window
    pub fn set_screen_size(&mut self, screen: Size) {
        if screen.width > 0.0 && screen.height > 0.0 {
            self.screen = screen;
        }
    }

    pub fn world_to_screen(&self, point: Point) -> Point {
        (point.to_vec2() * self.zoom + self.offset).to_point()
    }

    pub fn screen_to_world(&self, point: Point) -> Point {
        ((point.to_vec2() - self.offset) / self.zoom).to_point()
    }

    /// Wheel zoom. `delta` is in pixels, positive when scrolling down
    /// (zooming out), `cursor` in screen space. `now` is in seconds.
    pub fn handle_wheel(&mut self, delta: f64, cursor: Point, now: f64) -> WheelOutcome {
        let target = self.zoom * WHEEL_ZOOM_BASE.powf(delta);
        self.zoom_around(target, cursor);

        self.grid_fidelity = GridFidelity::Cached;
        self.settle_deadline = Some(now + ZOOM_SETTLE_SECS);

        WheelOutcome {
            zoom: self.zoom,
            consumed: true,
        }
    }

    /// Keyboard zoom by one step around `pivot` (screen space)
    pub fn zoom_by_step(&mut self, zoom_in: bool, pivot: Point) {
        let target = if zoom_in {
            self.zoom / KEYBOARD_ZOOM_STEP
        } else {
            self.zoom * KEYBOARD_ZOOM_STEP
        };
        self.zoom_around(target, pivot);
    }

    fn zoom_around(&mut self, target: f64, pivot: Point) {
        let anchored = self.screen_to_world(pivot);
        let zoom = if target.is_nan() {
            self.zoom
        } else {
            target.clamp(MIN_ZOOM, MAX_ZOOM)
        };
        self.zoom = zoom;
        self.offset = pivot.to_vec2() - anchored.to_vec2() * zoom;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Centers `world` in the current screen
    pub fn fit_world(&mut self, world: Rect, padding: f64) {
        self.fit_to(world, self.screen, padding);
    }

    /// Centers `world` in a screen of `screen` size, leaving `padding`
    /// pixels on every side
    pub fn fit_to(&mut self, world: Rect, screen: Size, padding: f64) {
        let usable = Size::new(
            (screen.width - 2.0 * padding).max(1.0),
            (screen.height - 2.0 * padding).max(1.0),
        );
        if world.width() <= 0.0 || world.height() <= 0.0 {
            return;
        }
        let zoom = (usable.width / world.width())
            .min(usable.height / world.height())
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = zoom;
        let screen_center = Vec2::new(screen.width / 2.0, screen.height / 2.0);
        self.offset = screen_center - world.center().to_vec2() * zoom;
    }

    /// Advances the settle timer. Returns true exactly once per gesture, when
    /// the grid goes back to full fidelity and needs one full redraw.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.settle_deadline {
            Some(deadline) if now >= deadline => {
                self.settle_deadline = None;
                self.grid_fidelity = GridFidelity::Full;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_stays_clamped_for_any_wheel_sequence() {
        let mut viewport = ViewportController::default();
        let deltas = [
            -5000.0, -100_000.0, 3.0, 250.0, 1e9, -1e9, 0.0, 77.7, -12.5, f64::MAX,
        ];
        for (i, delta) in deltas.iter().enumerate() {
            let outcome = viewport.handle_wheel(*delta, Point::new(40.0, 30.0), i as f64);
            assert!(outcome.consumed);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&viewport.zoom()));
        }
    }

    #[test]
    fn wheel_applies_exponential_factor() {
        let mut viewport = ViewportController::default();
        viewport.handle_wheel(100.0, Point::ZERO, 0.0);
        let expected = 0.999f64.powf(100.0);
        assert!((viewport.zoom() - expected).abs() < 1e-12);
    }

    #[test]
    fn point_under_cursor_stays_fixed() {
        let mut viewport = ViewportController::default();
        viewport.pan_by(Vec2::new(-120.0, 45.0));
        let cursor = Point::new(300.0, 200.0);
        let before = viewport.screen_to_world(cursor);

        viewport.handle_wheel(-400.0, cursor, 0.0);

        let after = viewport.screen_to_world(cursor);
        assert!((before - after).hypot() < 1e-9);
        assert!(viewport.zoom() > 1.0);
    }

    #[test]
    fn settle_timer_is_replaced_not_stacked() {
        let mut viewport = ViewportController::default();
        viewport.handle_wheel(10.0, Point::ZERO, 0.000);
        viewport.handle_wheel(10.0, Point::ZERO, 0.030);
        assert_eq!(viewport.grid_fidelity(), GridFidelity::Cached);

        // The first deadline (0.050) must not fire
        assert!(!viewport.tick(0.060));
        assert_eq!(viewport.grid_fidelity(), GridFidelity::Cached);

        assert!(viewport.tick(0.081));
        assert_eq!(viewport.grid_fidelity(), GridFidelity::Full);
        assert!(!viewport.tick(0.2));
    }

    #[test]
    fn fit_centers_world_rect() {
        let mut viewport = ViewportController::default();
        let world = Rect::new(0.0, 0.0, 1600.0, 850.0);
        viewport.fit_to(world, Size::new(1000.0, 600.0), 20.0);

        let center = viewport.world_to_screen(world.center());
        assert!((center.x - 500.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
        assert!((viewport.zoom() - 960.0 / 1600.0).abs() < 1e-12);
    }
}
