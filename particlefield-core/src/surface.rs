//! The drawing capability the engine renders through
//!
//! Mirrors the subset of `CanvasRenderingContext2D` the particle field needs.
//! Hosts implement it over a real canvas; [`crate::recording::Recorder`]
//! implements it in memory.

/// A 2D drawing context plus control of its backing store size
pub trait DrawContext {
    /// Resize the backing store. Resets any transform on real canvases.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Scale subsequent drawing
    fn scale(&mut self, x: f64, y: f64);

    /// Clear a rectangular region to transparent
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_fill_style(&mut self, color: &str);

    fn set_stroke_style(&mut self, color: &str);

    /// Alpha applied to every following fill and stroke until changed
    fn set_global_alpha(&mut self, alpha: f64);

    fn set_line_width(&mut self, width: f64);

    fn begin_path(&mut self);

    fn close_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    /// Add a circular arc from `start` to `end` radians
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn fill(&mut self);

    fn stroke(&mut self);
}
