//! Interactive region selection over a displayed video frame.
//!
//! This crate provides:
//! - A draggable/resizable selection rectangle with gesture handling
//!   shared between mouse and touch input
//! - Continuous projection of the selection from display coordinates
//!   into source-video pixel coordinates

pub mod projection;
pub mod selector;

pub use projection::FrameScale;
pub use selector::{GestureTarget, Point, RegionCallback, RegionSelector, MIN_HEIGHT, MIN_WIDTH};
