//! A single particle: kinetic state, visual state and its per-frame step

use rand::Rng;

use crate::canvas::Canvas;
use crate::config::{Direction, OutMode, ParticleOptions, ShapeKind, StrokeOptions};
use crate::geometry;
use crate::interactivity::Modifiers;
use crate::surface::DrawContext;

/// Everything a particle reads from its surroundings during one step
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub options: &'a ParticleOptions,
    pub canvas: &'a Canvas,
}

/// Oscillation of one attribute between a floor and a ceiling
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub enabled: bool,
    /// -1 while shrinking, 1 while growing, 0 when disabled
    pub direction: i8,
    /// Change per frame, in hundredths of a unit
    pub speed: f64,
    pub floor: f64,
    pub ceiling: f64,
    /// Whether the speed is shared with every other particle
    pub sync: bool,
}

impl Animation {
    /// An animation that never changes its value
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            direction: 0,
            speed: 0.0,
            floor: 0.0,
            ceiling: 0.0,
            sync: true,
        }
    }

    /// Set up an animation for a value currently at `current`
    ///
    /// Unsynchronised animations draw their own speed, so particles pulse out of
    /// phase with each other.
    pub fn new<R: Rng + ?Sized>(
        enabled: bool,
        speed: f64,
        floor: f64,
        ceiling: f64,
        sync: bool,
        current: f64,
        rng: &mut R,
    ) -> Self {
        if !enabled {
            return Self::disabled();
        }
        let ceiling = ceiling.max(0.0);
        let floor = floor.max(0.0).min(ceiling);
        let speed = if sync {
            speed
        } else {
            rng.r#gen::<f64>() * speed
        };
        let direction = if current >= ceiling { -1 } else { 1 };

        Self {
            enabled,
            direction,
            speed,
            floor,
            ceiling,
            sync,
        }
    }

    /// Advance `value` by one frame and return the new value
    pub fn step(&mut self, value: f64) -> f64 {
        if !self.enabled {
            return value;
        }
        if value >= self.ceiling {
            self.direction = -1;
        } else if value <= self.floor {
            self.direction = 1;
        }
        let next = value + f64::from(self.direction) * self.speed / 100.0;
        next.max(self.floor).min(self.ceiling)
    }
}

/// Movement parameters copied from the configuration at creation
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub enabled: bool,
    pub speed: f64,
    pub direction: Direction,
    /// Fixed unit heading for straight movement with no configured direction
    pub heading: Option<(f64, f64)>,
    pub out_mode: OutMode,
    /// Per-axis sign, inverted by bouncing off an edge
    pub flip: (f64, f64),
}

impl Motion {
    /// Velocity for the coming frame
    pub fn velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let (vx, vy) = match self.heading {
            Some((hx, hy)) => (hx * self.speed, hy * self.speed),
            None => geometry::velocity(self.direction, self.speed, rng),
        };
        (vx * self.flip.0, vy * self.flip.1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub opacity: f64,
    pub color: String,
    pub shape: ShapeKind,
    /// Side count for polygon shapes
    pub sides: i64,
    pub opacity_anim: Animation,
    pub size_anim: Animation,
    pub motion: Motion,
    /// Radius override from a bubble effect, cleared every frame
    pub bubble_radius: Option<f64>,
    /// Opacity override from a bubble effect, cleared every frame
    pub bubble_opacity: Option<f64>,
}

impl Particle {
    /// Create a particle at `position`, or at a random point on the canvas
    pub fn new<R: Rng + ?Sized>(
        options: &ParticleOptions,
        canvas: &Canvas,
        position: Option<(f64, f64)>,
        rng: &mut R,
    ) -> Self {
        let (x, y) = position.unwrap_or_else(|| {
            (
                rng.r#gen::<f64>() * canvas.width,
                rng.r#gen::<f64>() * canvas.height,
            )
        });

        let base_size = options.size.value.max(0.0);
        let radius = if options.size.random {
            rng.r#gen::<f64>() * base_size
        } else {
            base_size
        };
        let opacity = if options.opacity.random {
            rng.r#gen::<f64>()
        } else {
            options.opacity.value.max(0.0).min(1.0)
        };
        let color = options.color.value.pick(rng);

        let movement = &options.movement;
        let speed = if movement.random {
            rng.r#gen::<f64>() * movement.speed
        } else {
            movement.speed
        };
        let heading = if movement.straight && movement.direction == Direction::None {
            Some(geometry::random_heading(1.0, rng))
        } else {
            None
        };

        let opacity_anim = &options.opacity.anim;
        let size_anim = &options.size.anim;

        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius,
            opacity,
            color,
            shape: options.shape.kind,
            sides: options.shape.polygon.nb_sides.min(geometry::MAX_POLYGON_SIDES),
            opacity_anim: Animation::new(
                opacity_anim.enable,
                opacity_anim.speed,
                opacity_anim.opacity_min,
                1.0,
                opacity_anim.sync,
                opacity,
                rng,
            ),
            size_anim: Animation::new(
                size_anim.enable,
                size_anim.speed,
                size_anim.size_min,
                base_size,
                size_anim.sync,
                radius,
                rng,
            ),
            motion: Motion {
                enabled: movement.enable,
                speed,
                direction: movement.direction,
                heading,
                out_mode: movement.out_mode,
                flip: (1.0, 1.0),
            },
            bubble_radius: None,
            bubble_opacity: None,
        }
    }

    /// Advance one frame, apply this frame's interaction modifiers, then draw
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        step: &StepContext<'_>,
        modifiers: &Modifiers<'_>,
        rng: &mut R,
        ctx: &mut dyn DrawContext,
    ) {
        self.advance(step.canvas, rng);
        modifiers.apply(self, step.canvas);
        self.draw(&step.options.shape.stroke, ctx);
    }

    /// Kinetic and animation step, without drawing
    ///
    /// Position moves by the velocity computed on the previous frame, so
    /// velocity changes made between frames (attraction) take effect here.
    pub fn advance<R: Rng + ?Sized>(&mut self, canvas: &Canvas, rng: &mut R) {
        self.x += self.vx;
        self.y += self.vy;

        self.opacity = self.opacity_anim.step(self.opacity);
        self.radius = self.size_anim.step(self.radius);

        self.bubble_radius = None;
        self.bubble_opacity = None;

        if !self.motion.enabled {
            return;
        }
        let (vx, vy) = self.motion.velocity(rng);
        self.vx = vx;
        self.vy = vy;

        match self.motion.out_mode {
            OutMode::Out => self.wrap(canvas),
            OutMode::Bounce => self.bounce(canvas),
        }
    }

    /// Move a particle that fully left one edge to just outside the opposite edge
    fn wrap(&mut self, canvas: &Canvas) {
        let r = self.radius;
        if self.x - r > canvas.width {
            self.x = -r;
        } else if self.x + r < 0.0 {
            self.x = canvas.width + r;
        }
        if self.y - r > canvas.height {
            self.y = -r;
        } else if self.y + r < 0.0 {
            self.y = canvas.height + r;
        }
    }

    /// Reflect off edges the particle is crossing while moving toward them
    fn bounce(&mut self, canvas: &Canvas) {
        let r = self.radius;
        if (self.x + r > canvas.width && self.vx > 0.0) || (self.x - r < 0.0 && self.vx < 0.0) {
            self.motion.flip.0 = -self.motion.flip.0;
            self.vx = -self.vx;
        }
        if (self.y + r > canvas.height && self.vy > 0.0) || (self.y - r < 0.0 && self.vy < 0.0) {
            self.motion.flip.1 = -self.motion.flip.1;
            self.vy = -self.vy;
        }
        self.x = geometry::clamp_inside(self.x, r, canvas.width);
        self.y = geometry::clamp_inside(self.y, r, canvas.height);
    }

    /// Radius as drawn this frame
    pub fn drawn_radius(&self) -> f64 {
        self.bubble_radius.unwrap_or(self.radius)
    }

    /// Opacity as drawn this frame
    pub fn drawn_opacity(&self) -> f64 {
        self.bubble_opacity.unwrap_or(self.opacity)
    }

    /// Draw the particle's shape
    ///
    /// Global alpha stays set after this returns.
    pub fn draw(&self, stroke: &StrokeOptions, ctx: &mut dyn DrawContext) {
        if !geometry::is_drawable(self.shape, self.sides) {
            return;
        }
        ctx.set_fill_style(&self.color);
        ctx.set_global_alpha(self.drawn_opacity());
        ctx.begin_path();
        geometry::trace_shape(
            ctx,
            self.shape,
            self.sides,
            self.x,
            self.y,
            self.drawn_radius(),
        );
        ctx.fill();

        if stroke.width > 0.0 {
            ctx.set_stroke_style(&stroke.color);
            ctx.set_line_width(stroke.width);
            ctx.stroke();
        }
    }
}
