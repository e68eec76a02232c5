//! Canvas dimensions
//!
//! Pure sizing logic, unit tested without a browser.

/// Drawing surface size in CSS units plus its backing store size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Width in device-independent units
    pub width: f64,
    /// Height in device-independent units
    pub height: f64,
    /// Backing store width in pixels
    pub pixel_width: u32,
    /// Backing store height in pixels
    pub pixel_height: u32,
    /// Context scale applied after sizing the backing store (1.0 or 2.0)
    pub pixel_ratio: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::fit(800.0, 600.0, false, 1.0)
    }
}

impl Canvas {
    /// Size a canvas for the given CSS dimensions
    ///
    /// High-density rendering doubles the backing store when it is requested and
    /// the display reports a device pixel ratio above 1. Negative or NaN
    /// dimensions collapse to zero.
    pub fn fit(width: f64, height: f64, retina_detect: bool, device_pixel_ratio: f64) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let pixel_ratio = if retina_detect && device_pixel_ratio > 1.0 {
            2.0
        } else {
            1.0
        };

        Self {
            width,
            height,
            pixel_width: (width * pixel_ratio).round() as u32,
            pixel_height: (height * pixel_ratio).round() as u32,
            pixel_ratio,
        }
    }

    /// Surface area in square CSS units
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether a point lies on the canvas (edges included)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Whether the backing store is scaled relative to CSS units
    pub fn is_scaled(&self) -> bool {
        self.pixel_ratio != 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_density_keeps_css_size() {
        let canvas = Canvas::fit(800.0, 600.0, true, 1.0);

        assert_eq!(canvas.pixel_width, 800);
        assert_eq!(canvas.pixel_height, 600);
        assert!(!canvas.is_scaled());
    }

    #[test]
    fn retina_doubles_backing_store() {
        let canvas = Canvas::fit(800.0, 600.0, true, 3.0);

        assert_eq!(canvas.width, 800.0);
        assert_eq!(canvas.pixel_width, 1600);
        assert_eq!(canvas.pixel_height, 1200);
        assert_eq!(canvas.pixel_ratio, 2.0);
    }

    #[test]
    fn retina_ignored_when_not_requested() {
        let canvas = Canvas::fit(800.0, 600.0, false, 2.0);

        assert_eq!(canvas.pixel_width, 800);
        assert!(!canvas.is_scaled());
    }

    #[test]
    fn negative_dimensions_collapse_to_zero() {
        let canvas = Canvas::fit(-10.0, f64::NAN, false, 1.0);

        assert_eq!(canvas.width, 0.0);
        assert_eq!(canvas.height, 0.0);
        assert_eq!(canvas.area(), 0.0);
    }

    #[test]
    fn contains_includes_edges() {
        let canvas = Canvas::fit(100.0, 50.0, false, 1.0);

        assert!(canvas.contains(0.0, 0.0));
        assert!(canvas.contains(100.0, 50.0));
        assert!(!canvas.contains(100.5, 10.0));
        assert!(!canvas.contains(10.0, -1.0));
    }
}
