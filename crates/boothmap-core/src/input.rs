//! Pointer events from the render surface and press tracking.

use crate::gesture::HitTarget;
use kurbo::Point;

/// Pointer event in screen coordinates (pixels from the container's
/// top-left corner).
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed on `target`.
    Down { position: Point, target: HitTarget },
    /// Pointer moved.
    Move { position: Point },
    /// Primary button released, anywhere.
    Up { position: Point },
    /// Wheel scrolled; negative `delta_y` scrolls up.
    Wheel { position: Point, delta_y: f64 },
}

/// Tracks one press from pointer down to pointer up.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Current pointer position in screen coordinates.
    pub position: Point,
    /// Where the current press started.
    press_start: Option<Point>,
    /// What the current press landed on.
    press_target: Option<HitTarget>,
    /// Farthest distance from the press start so far.
    max_travel: f64,
}

impl PointerState {
    /// Create a new pointer state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a press.
    pub fn press(&mut self, position: Point, target: HitTarget) {
        self.position = position;
        self.press_start = Some(position);
        self.press_target = Some(target);
        self.max_travel = 0.0;
    }

    /// Record pointer movement.
    pub fn moved(&mut self, position: Point) {
        self.position = position;
        if let Some(start) = self.press_start {
            self.max_travel = self.max_travel.max((position - start).hypot());
        }
    }

    /// End the press. Returns the pressed target when the press never
    /// travelled `tolerance` pixels or more, i.e. it was a click.
    pub fn release(&mut self, position: Point, tolerance: f64) -> Option<HitTarget> {
        self.moved(position);
        let target = self.press_target.take();
        let clicked = self.press_start.take().is_some() && self.max_travel < tolerance;
        self.max_travel = 0.0;
        if clicked { target } else { None }
    }

    /// Forget the current press.
    pub fn reset(&mut self) {
        self.press_start = None;
        self.press_target = None;
        self.max_travel = 0.0;
    }
}
