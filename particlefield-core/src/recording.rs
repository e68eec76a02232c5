//! In-memory drawing context
//!
//! Records every call as a [`DrawCommand`]. Used by the headless simulator and
//! by tests that assert on what a frame drew.

use std::fmt;

use crate::surface::DrawContext;

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetBackingSize(u32, u32),
    Scale(f64, f64),
    ClearRect(f64, f64, f64, f64),
    FillStyle(String),
    StrokeStyle(String),
    GlobalAlpha(f64),
    LineWidth(f64),
    BeginPath,
    ClosePath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc(f64, f64, f64, f64, f64),
    Rect(f64, f64, f64, f64),
    Fill,
    Stroke,
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetBackingSize(w, h) => write!(f, "backing {w}x{h}"),
            Self::Scale(x, y) => write!(f, "scale {x} {y}"),
            Self::ClearRect(x, y, w, h) => write!(f, "clear {x} {y} {w} {h}"),
            Self::FillStyle(c) => write!(f, "fill_style {c}"),
            Self::StrokeStyle(c) => write!(f, "stroke_style {c}"),
            Self::GlobalAlpha(a) => write!(f, "alpha {a}"),
            Self::LineWidth(w) => write!(f, "line_width {w}"),
            Self::BeginPath => write!(f, "begin_path"),
            Self::ClosePath => write!(f, "close_path"),
            Self::MoveTo(x, y) => write!(f, "move_to {x} {y}"),
            Self::LineTo(x, y) => write!(f, "line_to {x} {y}"),
            Self::Arc(x, y, r, s, e) => write!(f, "arc {x} {y} {r} {s} {e}"),
            Self::Rect(x, y, w, h) => write!(f, "rect {x} {y} {w} {h}"),
            Self::Fill => write!(f, "fill"),
            Self::Stroke => write!(f, "stroke"),
        }
    }
}

/// Drawing context that records instead of rendering
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything recorded so far
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands matching a predicate
    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|&c| predicate(c)).count()
    }

    /// One command per line, for snapshots
    pub fn transcript(&self) -> String {
        self.commands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DrawContext for Recorder {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.commands.push(DrawCommand::SetBackingSize(width, height));
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Scale(x, y));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect(x, y, width, height));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::FillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeStyle(color.to_string()));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        self.commands.push(DrawCommand::Arc(x, y, radius, start, end));
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Rect(x, y, width, height));
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}
