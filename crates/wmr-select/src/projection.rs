//! Display-space to source-space projection.

use wmr_models::{DisplayRect, PixelRect};

/// Mapping between a rendered display area and the source video frame.
///
/// Axes scale independently: under letterboxing the display aspect ratio
/// need not match the source, so a uniform scale is never assumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScale {
    /// Width of the rendered element in display pixels
    pub display_width: f64,
    /// Height of the rendered element in display pixels
    pub display_height: f64,
    /// Width of the source video in pixels
    pub source_width: u32,
    /// Height of the source video in pixels
    pub source_height: u32,
}

impl FrameScale {
    /// Create a new frame scale.
    pub fn new(display_width: f64, display_height: f64, source_width: u32, source_height: u32) -> Self {
        Self {
            display_width,
            display_height,
            source_width,
            source_height,
        }
    }

    /// Horizontal scale factor; 0.0 while the display area has no width.
    pub fn scale_x(&self) -> f64 {
        if self.display_width > 0.0 {
            self.source_width as f64 / self.display_width
        } else {
            0.0
        }
    }

    /// Vertical scale factor; 0.0 while the display area has no height.
    pub fn scale_y(&self) -> f64 {
        if self.display_height > 0.0 {
            self.source_height as f64 / self.display_height
        } else {
            0.0
        }
    }

    /// Project a display-space rectangle onto the source frame, rounding
    /// each component to the nearest integer pixel.
    pub fn project(&self, rect: &DisplayRect) -> PixelRect {
        let sx = self.scale_x();
        let sy = self.scale_y();
        PixelRect {
            x: (rect.x * sx).round() as u32,
            y: (rect.y * sy).round() as u32,
            width: (rect.width * sx).round() as u32,
            height: (rect.height * sy).round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_rounds_per_component() {
        let scale = FrameScale::new(420.0, 236.0, 1920, 1080);
        let region = DisplayRect::new(20.0, 20.0, 150.0, 80.0);

        assert_eq!(scale.project(&region), PixelRect::new(91, 92, 686, 366));
    }

    #[test]
    fn test_axes_scale_independently() {
        // Letterboxed: display is wider relative to the source
        let scale = FrameScale::new(400.0, 100.0, 800, 600);
        assert_eq!(scale.scale_x(), 2.0);
        assert_eq!(scale.scale_y(), 6.0);

        let region = DisplayRect::new(10.0, 10.0, 50.0, 50.0);
        assert_eq!(scale.project(&region), PixelRect::new(20, 60, 100, 300));
    }

    #[test]
    fn test_degenerate_display_projects_to_zero() {
        let scale = FrameScale::new(0.0, 0.0, 1920, 1080);
        let region = DisplayRect::new(20.0, 20.0, 150.0, 80.0);
        assert_eq!(scale.project(&region), PixelRect::new(0, 0, 0, 0));
    }

    #[test]
    fn test_identity_scale() {
        let scale = FrameScale::new(640.0, 480.0, 640, 480);
        let region = DisplayRect::new(12.0, 34.0, 56.0, 78.0);
        assert_eq!(scale.project(&region), PixelRect::new(12, 34, 56, 78));
    }
}
