//! Simulation engine
//!
//! Owns the particle collection, the canvas size and the pointer state. A host
//! calls [`Engine::submit`] from its event handlers and [`Engine::frame`] once per
//! display refresh; the engine applies queued intents at the top of each frame
//! so particles are never mutated mid-iteration.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::canvas::Canvas;
use crate::config::{Config, DetectOn, InteractMode, ShapeKind};
use crate::geometry::MAX_POLYGON_SIDES;
use crate::interactivity::{ClickEffect, Intent, Modifiers, PointerState, draw_grab_lines};
use crate::links::link_particles;
use crate::particle::{Particle, StepContext};
use crate::surface::DrawContext;

/// Particles per unit of `value_area`
const DENSITY_AREA_UNIT: f64 = 1000.0;

/// What one frame did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub particles: usize,
    pub pairs_checked: usize,
    pub lines_drawn: usize,
    pub grab_lines: usize,
}

pub struct Engine {
    config: Config,
    canvas: Canvas,
    particles: Vec<Particle>,
    pointer: PointerState,
    pending: VecDeque<Intent>,
    rng: StdRng,
    /// Timestamp of the latest frame, in milliseconds
    clock_ms: f64,
    alive: bool,
    frames: u64,
}

impl Engine {
    /// Create an engine for a surface of `width` x `height` CSS units and
    /// populate it
    pub fn new(config: Config, width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self::with_rng(config, width, height, device_pixel_ratio, StdRng::from_entropy())
    }

    /// Like [`Engine::new`], with a fixed random seed
    pub fn with_seed(
        config: Config,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            config,
            width,
            height,
            device_pixel_ratio,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        config: Config,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
        rng: StdRng,
    ) -> Self {
        let canvas = Canvas::fit(width, height, config.retina_detect, device_pixel_ratio);
        let mut engine = Self {
            config,
            canvas,
            particles: Vec::new(),
            pointer: PointerState::default(),
            pending: VecDeque::new(),
            rng,
            clock_ms: 0.0,
            alive: true,
            frames: 0,
        };
        engine.populate();
        engine
    }

    /// Size the backing store and apply the high-density scale
    pub fn attach(&self, ctx: &mut dyn DrawContext) {
        ctx.set_backing_size(self.canvas.pixel_width, self.canvas.pixel_height);
        if self.canvas.is_scaled() {
            ctx.scale(self.canvas.pixel_ratio, self.canvas.pixel_ratio);
        }
    }

    /// Number of particles the configuration asks for on the current canvas
    pub fn target_count(&self) -> usize {
        let number = &self.config.particles.number;
        if number.value < 0 {
            warn!(value = number.value, "negative particle count, using zero");
            return 0;
        }
        let base = number.value as f64;
        if !number.density.enable || number.density.value_area <= 0.0 {
            return number.value as usize;
        }
        let count = self.canvas.area() / DENSITY_AREA_UNIT * base / number.density.value_area;
        count.round().max(0.0) as usize
    }

    /// Create particles at random positions until the target count is reached
    pub fn populate(&mut self) {
        let target = self.target_count();
        let sides = self.config.particles.shape.polygon.nb_sides;
        if self.config.particles.shape.kind == ShapeKind::Polygon && sides > MAX_POLYGON_SIDES {
            warn!(sides, max = MAX_POLYGON_SIDES, "polygon side count too large, clamping");
        }
        while self.particles.len() < target {
            let particle = Particle::new(&self.config.particles, &self.canvas, None, &mut self.rng);
            self.particles.push(particle);
        }
        debug!(
            particles = self.particles.len(),
            width = self.canvas.width,
            height = self.canvas.height,
            "populated particle field"
        );
    }

    /// Discard every particle and populate again
    pub fn reset(&mut self) {
        self.particles.clear();
        self.populate();
    }

    /// Add `count` particles at a point
    pub fn spawn_at(&mut self, x: f64, y: f64, count: usize) {
        for _ in 0..count {
            let particle = Particle::new(
                &self.config.particles,
                &self.canvas,
                Some((x, y)),
                &mut self.rng,
            );
            self.particles.push(particle);
        }
    }

    /// Remove up to `count` of the oldest particles
    pub fn remove(&mut self, count: usize) {
        let count = count.min(self.particles.len());
        self.particles = self.particles.split_off(count);
    }

    /// Queue a host event for the next frame
    pub fn submit(&mut self, intent: Intent) {
        self.pending.push_back(intent);
    }

    /// Run one frame: apply queued intents, then update, link and draw
    ///
    /// `timestamp_ms` is a monotonic clock used to time click effects. A
    /// stopped engine draws nothing and reports an empty frame.
    pub fn frame(&mut self, ctx: &mut dyn DrawContext, timestamp_ms: f64) -> FrameReport {
        if !self.alive {
            return FrameReport::default();
        }
        self.clock_ms = timestamp_ms;
        self.frames += 1;

        while let Some(intent) = self.pending.pop_front() {
            self.apply(intent, ctx);
        }
        self.pointer.expire(self.clock_ms, &self.config.interactivity.modes);

        ctx.clear_rect(0.0, 0.0, self.canvas.width, self.canvas.height);

        let Self {
            config,
            canvas,
            particles,
            pointer,
            rng,
            clock_ms,
            ..
        } = self;
        let modifiers = Modifiers::for_frame(config, canvas, pointer, *clock_ms);
        let step = StepContext {
            options: &config.particles,
            canvas: &*canvas,
        };
        for particle in particles.iter_mut() {
            particle.update(&step, &modifiers, rng, ctx);
        }

        let mut report = FrameReport {
            particles: particles.len(),
            ..FrameReport::default()
        };

        let line = &config.particles.line_linked;
        if line.enable {
            let stats = link_particles(particles, line, &config.particles.movement.attract, ctx);
            report.pairs_checked = stats.pairs_checked;
            report.lines_drawn = stats.lines_drawn;
        }

        if let Some(point) = modifiers.grab_point() {
            report.grab_lines =
                draw_grab_lines(particles, point, &config.interactivity.modes.grab, line, ctx);
        }

        trace!(frame = self.frames, ?report, "frame drawn");
        report
    }

    fn apply(&mut self, intent: Intent, ctx: &mut dyn DrawContext) {
        match intent {
            Intent::Resize {
                width,
                height,
                device_pixel_ratio,
            } => {
                self.canvas =
                    Canvas::fit(width, height, self.config.retina_detect, device_pixel_ratio);
                self.attach(ctx);
                if self.config.interactivity.events.resize {
                    self.reset();
                }
            }
            Intent::PointerMoved { x, y } => self.pointer.position = Some((x, y)),
            Intent::PointerLeft => self.pointer.position = None,
            Intent::Click { x, y } => self.click(x, y),
        }
    }

    fn click(&mut self, x: f64, y: f64) {
        let interactivity = &self.config.interactivity;
        let onclick = &interactivity.events.onclick;
        if !onclick.enable {
            return;
        }
        if interactivity.detect_on == DetectOn::Canvas && !self.canvas.contains(x, y) {
            return;
        }

        let mode = onclick.mode;
        debug!(?mode, x, y, "click");
        match mode {
            InteractMode::Push => {
                let count = interactivity.modes.push.particles_nb.max(0) as usize;
                self.spawn_at(x, y, count);
            }
            InteractMode::Remove => {
                let count = interactivity.modes.remove.particles_nb.max(0) as usize;
                self.remove(count);
            }
            InteractMode::Bubble | InteractMode::Repulse => {
                self.pointer.click = Some(ClickEffect {
                    x,
                    y,
                    mode,
                    started_ms: self.clock_ms,
                });
            }
            InteractMode::Grab => {}
        }
    }

    /// Stop animating; later frames are no-ops
    pub fn stop(&mut self) {
        if self.alive {
            debug!(frames = self.frames, "engine stopped");
        }
        self.alive = false;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Live configuration; changes apply from the next frame
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Direct access for hosts that place particles themselves
    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Frames drawn since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
