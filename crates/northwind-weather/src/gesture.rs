//! Draggable thermometer control.
//!
//! A two-state machine (idle / dragging) that maps the vertical pointer
//! position inside the control onto 0–100 °Ñ, top = 100. Crossing into one of
//! the tick bands fires a single haptic pulse; the pulse re-arms once the
//! value leaves every band.

use std::time::Duration;

use crate::convert::{clamp_scale, SCALE_MAX, SCALE_MIN};
use crate::view::InteractiveReading;

/// Values that produce a haptic pulse when the drag comes near them.
pub const TICK_POINTS: [f64; 3] = [0.0, 50.0, 100.0];

/// Distance from a tick that counts as "on" it.
pub const TICK_THRESHOLD: f64 = 1.5;

/// Length of one haptic pulse.
pub const PULSE: Duration = Duration::from_millis(15);

/// Value the control shows before any weather is loaded.
pub const INITIAL_VALUE: f64 = 50.0;

/// Output for tactile feedback.
pub trait Haptics {
    fn pulse(&mut self, duration: Duration);
}

/// Identifier of the pointer that owns a drag
pub type PointerId = u32;

/// Control bounds in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left
            && x <= self.left + self.width
            && y >= self.top
            && y <= self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// The control holds capture of this pointer
    Dragging(PointerId),
}

/// The interactive thermometer
///
/// A default control has empty bounds and ignores pointer positions until
/// the surface lays it out with [`ThermoControl::set_bounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoControl {
    bounds: Rect,
    state: DragState,
    last_tick: Option<f64>,
    value: f64,
}

impl Default for ThermoControl {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

impl ThermoControl {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            state: DragState::Idle,
            last_tick: None,
            value: INITIAL_VALUE,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Current value, clamped to the scale range
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn last_tick(&self) -> Option<f64> {
        self.last_tick
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Layout changed; takes effect on the next pointer event.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn reading(&self) -> InteractiveReading {
        InteractiveReading::from_scale(self.value)
    }

    /// Set the value without touching drag or tick state, e.g. after a load.
    pub fn set_value(&mut self, scale: f64) {
        if scale.is_finite() {
            self.value = clamp_scale(scale);
        }
    }

    /// Start a drag. Ignored outside the bounds or while another drag is active.
    /// Returns whether the pointer was captured.
    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        x: f64,
        y: f64,
        haptics: &mut impl Haptics,
    ) -> bool {
        if self.state != DragState::Idle || !self.bounds.contains(x, y) {
            return false;
        }
        self.state = DragState::Dragging(pointer);
        self.update_from_y(y, haptics);
        true
    }

    /// Track the captured pointer. Returns the new value when it changed state.
    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        y: f64,
        haptics: &mut impl Haptics,
    ) -> Option<f64> {
        if self.state != DragState::Dragging(pointer) {
            return None;
        }
        self.update_from_y(y, haptics)
    }

    /// End the drag and release capture.
    pub fn pointer_up(&mut self, pointer: PointerId) -> bool {
        self.release(pointer)
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) -> bool {
        self.release(pointer)
    }

    fn release(&mut self, pointer: PointerId) -> bool {
        if self.state == DragState::Dragging(pointer) {
            self.state = DragState::Idle;
            true
        } else {
            false
        }
    }

    /// Value for a vertical position, inverted and clamped to the bounds.
    pub fn value_at(&self, y: f64) -> Option<f64> {
        let height = self.bounds.height;
        if height.is_nan() || height <= 0.0 || !y.is_finite() {
            return None;
        }
        let offset = (y - self.bounds.top).clamp(0.0, height);
        let fraction = 1.0 - offset / height;
        Some(SCALE_MIN + fraction * (SCALE_MAX - SCALE_MIN))
    }

    fn update_from_y(&mut self, y: f64, haptics: &mut impl Haptics) -> Option<f64> {
        let value = self.value_at(y)?;
        self.apply_value(value, haptics);
        Some(self.value)
    }

    /// Record a newly mapped value and run tick detection.
    /// Returns true when a pulse was emitted.
    pub fn apply_value(&mut self, value: f64, haptics: &mut impl Haptics) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.value = clamp_scale(value);

        let nearest = TICK_POINTS
            .iter()
            .copied()
            .find(|tick| (tick - self.value).abs() <= TICK_THRESHOLD);

        match nearest {
            Some(tick) if self.last_tick != Some(tick) => {
                haptics.pulse(PULSE);
                self.last_tick = Some(tick);
                tracing::trace!("Thermometer tick at {}", tick);
                true
            }
            Some(_) => false,
            None => {
                self.last_tick = None;
                false
            }
        }
    }
}
