//! Draggable/resizable selection rectangle.
//!
//! The selector keeps its rectangle in display pixels and re-projects it
//! into source pixels on every change, notifying a registered callback.
//! Mouse and touch events both reduce to [`Point`]s before they reach the
//! gesture handlers, so there is a single code path per gesture.

use tracing::trace;

use wmr_models::{DisplayRect, PixelRect};

use crate::projection::FrameScale;

/// Minimum selection width in display pixels.
pub const MIN_WIDTH: f64 = 50.0;

/// Minimum selection height in display pixels.
pub const MIN_HEIGHT: f64 = 30.0;

/// Initial selection rectangle before the user touches anything.
const DEFAULT_BOUNDS: DisplayRect = DisplayRect {
    x: 20.0,
    y: 20.0,
    width: 150.0,
    height: 80.0,
};

/// A pointer position in display coordinates, regardless of input device.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which part of the selection a gesture starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureTarget {
    /// The rectangle body; the gesture moves the selection.
    Body,
    /// The corner handle; the gesture resizes the selection.
    Handle,
}

/// Callback invoked with the source-space region on every change.
pub type RegionCallback = Box<dyn Fn(PixelRect) + Send + 'static>;

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// Pointer offset from the rectangle's top-left, captured at pointer-down.
    Drag { offset: Point },
    /// Last observed pointer position; resize deltas are incremental.
    Resize { last: Point },
}

/// Interactive selection rectangle over a displayed video frame.
///
/// One gesture is active at a time: a pointer-down on the body starts a
/// drag, on the handle a resize, and pointer-up ends either. Every
/// mutation clamps the rectangle inside the display area and emits the
/// projected source-space region.
pub struct RegionSelector {
    bounds: DisplayRect,
    scale: FrameScale,
    gesture: Gesture,
    on_change: Option<RegionCallback>,
}

impl RegionSelector {
    /// Create a selector for a display area of the given size showing a
    /// source frame of the given dimensions.
    pub fn new(display_width: f64, display_height: f64, source_width: u32, source_height: u32) -> Self {
        let mut selector = Self {
            bounds: DEFAULT_BOUNDS,
            scale: FrameScale::new(display_width, display_height, source_width, source_height),
            gesture: Gesture::Idle,
            on_change: None,
        };
        selector.reanchor();
        selector
    }

    /// Register the change callback and emit the current region to it.
    pub fn set_on_change(&mut self, callback: RegionCallback) {
        self.on_change = Some(callback);
        self.emit();
    }

    /// Current rectangle in display pixels.
    pub fn display_rect(&self) -> DisplayRect {
        self.bounds
    }

    /// Current rectangle projected into source pixels.
    pub fn source_rect(&self) -> PixelRect {
        self.scale.project(&self.bounds)
    }

    /// Whether a drag or resize gesture is live (a view layer uses this
    /// to suppress default touch scrolling).
    pub fn gesture_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// The display area changed size (video metadata loaded, window
    /// resized). Re-clamps the rectangle into the new bounds, keeping the
    /// user-chosen position when it still fits.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.scale.display_width = width;
        self.scale.display_height = height;
        self.reanchor();
        self.emit();
    }

    /// The source frame dimensions changed; the projection follows.
    pub fn set_source_size(&mut self, width: u32, height: u32) {
        self.scale.source_width = width;
        self.scale.source_height = height;
        self.emit();
    }

    /// Begin a gesture. Points are display coordinates.
    pub fn pointer_down(&mut self, point: Point, target: GestureTarget) {
        self.gesture = match target {
            GestureTarget::Body => {
                if !self.bounds.contains(point.x, point.y) {
                    return;
                }
                Gesture::Drag {
                    offset: Point::new(point.x - self.bounds.x, point.y - self.bounds.y),
                }
            }
            GestureTarget::Handle => Gesture::Resize { last: point },
        };
        trace!("Gesture started: {:?}", self.gesture);
    }

    /// Advance the active gesture, if any.
    pub fn pointer_move(&mut self, point: Point) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Drag { offset } => {
                let max_x = (self.scale.display_width - self.bounds.width).max(0.0);
                let max_y = (self.scale.display_height - self.bounds.height).max(0.0);
                self.bounds.x = clamp(point.x - offset.x, 0.0, max_x);
                self.bounds.y = clamp(point.y - offset.y, 0.0, max_y);
                self.emit();
            }
            Gesture::Resize { last } => {
                let delta_x = point.x - last.x;
                let delta_y = point.y - last.y;
                self.bounds.width = clamp(
                    self.bounds.width + delta_x,
                    MIN_WIDTH,
                    self.scale.display_width - self.bounds.x,
                );
                self.bounds.height = clamp(
                    self.bounds.height + delta_y,
                    MIN_HEIGHT,
                    self.scale.display_height - self.bounds.y,
                );
                self.gesture = Gesture::Resize { last: point };
                self.emit();
            }
        }
    }

    /// End the active gesture. No further updates until the next
    /// pointer-down.
    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Clamp the rectangle into the current display area, shrinking or
    /// moving minimally when it no longer fits.
    fn reanchor(&mut self) {
        let dw = self.scale.display_width;
        let dh = self.scale.display_height;

        self.bounds.width = self.bounds.width.min(dw.max(MIN_WIDTH));
        self.bounds.height = self.bounds.height.min(dh.max(MIN_HEIGHT));
        self.bounds.x = clamp(self.bounds.x, 0.0, (dw - self.bounds.width).max(0.0));
        self.bounds.y = clamp(self.bounds.y, 0.0, (dh - self.bounds.height).max(0.0));
    }

    fn emit(&self) {
        if let Some(callback) = &self.on_change {
            callback(self.source_rect());
        }
    }
}

/// Clamp with the lower bound winning when the range is inverted, as when
/// the display area is smaller than the minimum selection size.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
