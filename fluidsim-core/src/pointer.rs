//! Pointer State (spec §4.3, §4.4): tracks each active pointer's position,
//! per-frame delta, and assigned dye color between input events and the
//! splat that consumes them.

use fluid_api::{Color, PointerId};

/// Minimum `|Δu| + |Δv|` for a move to count as real motion (spec §4.6,
/// §8 "a pointer with identical previous and current position has
/// `moved == false`").
const MOVE_EPSILON: f32 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub id: PointerId,
    pub down: bool,
    /// Set once a move has been recorded since the last step; cleared after
    /// the stepper consumes it so a pointer that stopped moving doesn't keep
    /// re-splatting with a stale delta.
    pub moved: bool,
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub color: Color,
}

impl PointerState {
    fn new(id: PointerId, x: f32, y: f32, color: Color) -> Self {
        Self { id, down: true, moved: false, x, y, dx: 0.0, dy: 0.0, color }
    }

    /// Normalized `(x, y)` in `[0,1]`, origin bottom-left — flips the input
    /// event's top-left-origin pixel `y` to match the texture-space
    /// convention the shaders use (spec §4.3).
    fn normalize(x: f32, y: f32, surface_width: u32, surface_height: u32) -> (f32, f32) {
        let nx = x / surface_width.max(1) as f32;
        let ny = 1.0 - y / surface_height.max(1) as f32;
        (nx, ny)
    }
}

/// Tracks zero or more simultaneously active pointers. One instance per
/// simulator; fed by `InputEvent`s pushed in from the bridge or input
/// adapter (spec §6).
pub struct PointerTracker {
    pointers: Vec<PointerState>,
    next_color: fn() -> Color,
}

impl PointerTracker {
    pub fn new(color_source: fn() -> Color) -> Self {
        Self { pointers: Vec::new(), next_color: color_source }
    }

    /// Starts (or restarts) tracking `id` at `(x, y)`. An already-known
    /// pointer — e.g. a touch that went up and back down before being
    /// cancelled — keeps its previously assigned color instead of drawing a
    /// fresh one, so a user's splats stay one consistent color per pointer
    /// for its whole lifetime.
    pub fn down(&mut self, id: PointerId, x: f32, y: f32, surface_width: u32, surface_height: u32) {
        let (nx, ny) = PointerState::normalize(x, y, surface_width, surface_height);
        if let Some(p) = self.pointers.iter_mut().find(|p| p.id == id) {
            let color = p.color;
            *p = PointerState::new(id, nx, ny, color);
        } else {
            let color = (self.next_color)();
            self.pointers.push(PointerState::new(id, nx, ny, color));
        }
    }

    pub fn moved(&mut self, id: PointerId, x: f32, y: f32, surface_width: u32, surface_height: u32) {
        let (nx, ny) = PointerState::normalize(x, y, surface_width, surface_height);
        let aspect_ratio = surface_width.max(1) as f32 / surface_height.max(1) as f32;
        if let Some(p) = self.pointers.iter_mut().find(|p| p.id == id) {
            if !p.down {
                return;
            }
            let mut dx = nx - p.x;
            let mut dy = ny - p.y;
            if aspect_ratio > 1.0 {
                dx *= aspect_ratio;
            } else {
                dy /= aspect_ratio;
            }
            p.dx = dx;
            p.dy = dy;
            p.x = nx;
            p.y = ny;
            p.moved = dx.abs() + dy.abs() > MOVE_EPSILON;
        }
    }

    pub fn up(&mut self, id: PointerId) {
        if let Some(p) = self.pointers.iter_mut().find(|p| p.id == id) {
            p.down = false;
        }
    }

    pub fn cancel(&mut self, id: PointerId) {
        self.pointers.retain(|p| p.id != id);
    }

    /// Pointers that moved since the last call and should splat this step.
    /// Clears each returned pointer's `moved` flag and delta.
    pub fn drain_moved(&mut self) -> Vec<PointerState> {
        let mut drained = Vec::new();
        for p in self.pointers.iter_mut() {
            if p.moved {
                drained.push(*p);
                p.moved = false;
                p.dx = 0.0;
                p.dy = 0.0;
            }
        }
        drained
    }

    pub fn active_count(&self) -> usize {
        self.pointers.iter().filter(|p| p.down).len()
    }

    pub fn get(&self, id: PointerId) -> Option<&PointerState> {
        self.pointers.iter().find(|p| p.id == id)
    }

    pub fn is_tracked(&self, id: PointerId) -> bool {
        self.pointers.iter().any(|p| p.id == id)
    }

    /// Re-randomizes every active pointer's color (spec §4.6 "color
    /// refresh"), called by the Input Adapter when its color-update timer
    /// crosses `1.0`.
    pub fn refresh_all_colors(&mut self) {
        let next_color = self.next_color;
        for p in self.pointers.iter_mut() {
            p.color = next_color();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::new(1.0, 0.0, 0.0)
    }

    #[test]
    fn down_then_move_computes_normalized_delta() {
        let mut tracker = PointerTracker::new(red);
        tracker.down(1, 0.0, 100.0, 100, 100);
        tracker.moved(1, 50.0, 50.0, 100, 100);
        let moved = tracker.drain_moved();
        assert_eq!(moved.len(), 1);
        assert!((moved[0].x - 0.5).abs() < 1e-6);
        assert!((moved[0].y - 0.5).abs() < 1e-6);
        assert!((moved[0].dx - 0.5).abs() < 1e-6);
        assert!((moved[0].dy - (-0.5)).abs() < 1e-6);
    }

    #[test]
    fn drain_moved_clears_flag_until_next_move() {
        let mut tracker = PointerTracker::new(red);
        tracker.down(1, 0.0, 0.0, 100, 100);
        tracker.moved(1, 10.0, 10.0, 100, 100);
        assert_eq!(tracker.drain_moved().len(), 1);
        assert_eq!(tracker.drain_moved().len(), 0);
    }

    #[test]
    fn move_after_up_is_ignored() {
        let mut tracker = PointerTracker::new(red);
        tracker.down(1, 0.0, 0.0, 100, 100);
        tracker.up(1);
        tracker.moved(1, 50.0, 50.0, 100, 100);
        assert_eq!(tracker.drain_moved().len(), 0);
    }

    #[test]
    fn move_to_identical_position_does_not_set_moved() {
        let mut tracker = PointerTracker::new(red);
        tracker.down(1, 50.0, 50.0, 100, 100);
        tracker.moved(1, 50.0, 50.0, 100, 100);
        assert_eq!(tracker.drain_moved().len(), 0);
    }

    #[test]
    fn cancel_removes_pointer() {
        let mut tracker = PointerTracker::new(red);
        tracker.down(1, 0.0, 0.0, 100, 100);
        tracker.cancel(1);
        assert_eq!(tracker.active_count(), 0);
    }
}
