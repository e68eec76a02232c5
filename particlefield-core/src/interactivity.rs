//! Pointer and click interaction
//!
//! Host event handlers never touch the particle collection directly. They
//! submit an [`Intent`]; the engine applies pending intents at the start of the
//! next frame, then derives this frame's [`Modifiers`] from the pointer state.

use crate::canvas::Canvas;
use crate::config::{
    BubbleOptions, Config, DetectOn, GrabOptions, InteractMode, LineLinkedOptions, ModeOptions,
    OutMode,
};
use crate::geometry::{clamp_inside, distance, link_alpha};
use crate::particle::Particle;
use crate::surface::DrawContext;

/// Displacement scale for repulse, per unit of proximity
const REPULSE_VELOCITY: f64 = 100.0;

/// Largest displacement a single repulse step applies
const REPULSE_MAX_STEP: f64 = 50.0;

/// Something that happened on the host between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// The drawing surface changed size (CSS units)
    Resize {
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
    },
    /// The pointer moved to canvas-relative coordinates
    PointerMoved { x: f64, y: f64 },
    /// The pointer left the detection area
    PointerLeft,
    /// A click at canvas-relative coordinates
    Click { x: f64, y: f64 },
}

/// A click effect that plays out over time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEffect {
    pub x: f64,
    pub y: f64,
    pub mode: InteractMode,
    /// Engine clock when the click landed, in milliseconds
    pub started_ms: f64,
}

impl ClickEffect {
    /// Seconds since the click
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        ((now_ms - self.started_ms) / 1000.0).max(0.0)
    }

    /// Whether the effect has fully played out
    pub fn is_finished(&self, now_ms: f64, modes: &ModeOptions) -> bool {
        let elapsed = self.elapsed(now_ms);
        match self.mode {
            InteractMode::Bubble => elapsed > modes.bubble.duration.max(0.0) * 2.0,
            InteractMode::Repulse => elapsed > modes.repulse.duration.max(0.0),
            _ => true,
        }
    }
}

/// Pointer position and any click effect in progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerState {
    pub position: Option<(f64, f64)>,
    pub click: Option<ClickEffect>,
}

impl PointerState {
    /// Drop a click effect that has played out
    pub fn expire(&mut self, now_ms: f64, modes: &ModeOptions) {
        if self
            .click
            .is_some_and(|click| click.is_finished(now_ms, modes))
        {
            self.click = None;
        }
    }
}

/// Interaction effects applied to every particle during one frame
#[derive(Debug, Clone, Copy)]
pub struct Modifiers<'a> {
    modes: &'a ModeOptions,
    out_mode: OutMode,
    hover: Option<(InteractMode, (f64, f64))>,
    /// Mode, position and elapsed seconds of an active click effect
    click: Option<(InteractMode, (f64, f64), f64)>,
}

impl<'a> Modifiers<'a> {
    /// Modifiers that change nothing
    pub fn none(modes: &'a ModeOptions) -> Self {
        Self {
            modes,
            out_mode: OutMode::Out,
            hover: None,
            click: None,
        }
    }

    /// Derive this frame's modifiers from the pointer state
    pub fn for_frame(
        config: &'a Config,
        canvas: &Canvas,
        pointer: &PointerState,
        now_ms: f64,
    ) -> Self {
        let interactivity = &config.interactivity;
        let onhover = &interactivity.events.onhover;

        let hover = pointer
            .position
            .filter(|_| onhover.enable)
            .filter(|&(x, y)| {
                interactivity.detect_on == DetectOn::Window || canvas.contains(x, y)
            })
            .map(|position| (onhover.mode, position));

        let click = pointer
            .click
            .filter(|click| !click.is_finished(now_ms, &interactivity.modes))
            .map(|click| (click.mode, (click.x, click.y), click.elapsed(now_ms)));

        Self {
            modes: &interactivity.modes,
            out_mode: config.particles.movement.out_mode,
            hover,
            click,
        }
    }

    /// Pointer position when the hover mode is grab
    pub fn grab_point(&self) -> Option<(f64, f64)> {
        match self.hover {
            Some((InteractMode::Grab, point)) => Some(point),
            _ => None,
        }
    }

    /// Apply hover and click effects to one particle
    pub fn apply(&self, particle: &mut Particle, canvas: &Canvas) {
        if let Some((mode, point)) = self.hover {
            match mode {
                InteractMode::Bubble => bubble(particle, point, &self.modes.bubble, 1.0),
                InteractMode::Repulse => repulse(
                    particle,
                    point,
                    self.modes.repulse.distance,
                    1.0,
                    canvas,
                    self.out_mode,
                ),
                _ => {}
            }
        }

        if let Some((mode, point, elapsed)) = self.click {
            match mode {
                InteractMode::Bubble => {
                    let weight = bubble_weight(elapsed, self.modes.bubble.duration);
                    bubble(particle, point, &self.modes.bubble, weight);
                }
                InteractMode::Repulse => {
                    let duration = self.modes.repulse.duration;
                    let strength = if duration > 0.0 {
                        (1.0 - elapsed / duration).max(0.0)
                    } else {
                        0.0
                    };
                    repulse(
                        particle,
                        point,
                        self.modes.repulse.distance,
                        strength,
                        canvas,
                        self.out_mode,
                    );
                }
                _ => {}
            }
        }
    }
}

/// Strength of a click bubble: ramps in over `duration`, then back out
fn bubble_weight(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    let t = elapsed / duration;
    if t <= 1.0 { t } else { (2.0 - t).max(0.0) }
}

fn lerp(from: f64, to: f64, ratio: f64) -> f64 {
    from + (to - from) * ratio
}

/// Scale size and opacity toward the bubble targets, strongest at the pointer
fn bubble(particle: &mut Particle, point: (f64, f64), options: &BubbleOptions, weight: f64) {
    if options.distance <= 0.0 || weight <= 0.0 {
        return;
    }
    let dist = distance((particle.x, particle.y), point);
    if dist > options.distance {
        return;
    }
    let ratio = (1.0 - dist / options.distance) * weight;

    particle.bubble_radius = Some(lerp(particle.radius, options.size, ratio).max(0.0));
    particle.bubble_opacity = Some(
        lerp(particle.opacity, options.opacity, ratio)
            .max(0.0)
            .min(1.0),
    );
}

/// Push a particle directly away from `point`, harder the closer it is
fn repulse(
    particle: &mut Particle,
    point: (f64, f64),
    radius: f64,
    strength: f64,
    canvas: &Canvas,
    out_mode: OutMode,
) {
    if radius <= 0.0 || strength <= 0.0 {
        return;
    }
    let dx = particle.x - point.0;
    let dy = particle.y - point.1;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist == 0.0 || dist > radius {
        return;
    }

    let proximity = 1.0 - (dist / radius).powi(2);
    let step = (proximity * REPULSE_VELOCITY).clamp(0.0, REPULSE_MAX_STEP) * strength;
    particle.x += dx / dist * step;
    particle.y += dy / dist * step;

    if out_mode == OutMode::Bounce {
        particle.x = clamp_inside(particle.x, particle.radius, canvas.width);
        particle.y = clamp_inside(particle.y, particle.radius, canvas.height);
    }
}

/// Draw lines from the pointer to every particle within grab distance
///
/// Returns the number of lines drawn.
pub fn draw_grab_lines(
    particles: &[Particle],
    point: (f64, f64),
    grab: &GrabOptions,
    line: &LineLinkedOptions,
    ctx: &mut dyn DrawContext,
) -> usize {
    let mut drawn = 0;
    for particle in particles {
        let dist = distance((particle.x, particle.y), point);
        let Some(alpha) = link_alpha(dist, grab.distance, grab.line_linked.opacity) else {
            continue;
        };
        if alpha <= 0.0 {
            continue;
        }
        ctx.begin_path();
        ctx.set_stroke_style(&line.color);
        ctx.set_line_width(line.width);
        ctx.set_global_alpha(alpha);
        ctx.move_to(point.0, point.1);
        ctx.line_to(particle.x, particle.y);
        ctx.stroke();
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::Recorder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn config(interactivity: serde_json::Value) -> Config {
        Config::resolve(Some(&json!({
            "particles": {"size": {"value": 4}, "opacity": {"value": 0.5}},
            "interactivity": interactivity
        })))
        .unwrap()
    }

    fn particle_at(config: &Config, x: f64, y: f64) -> Particle {
        let mut rng = StdRng::seed_from_u64(1);
        Particle::new(&config.particles, &Canvas::default(), Some((x, y)), &mut rng)
    }

    fn hovering(x: f64, y: f64) -> PointerState {
        PointerState {
            position: Some((x, y)),
            click: None,
        }
    }

    #[test]
    fn hover_outside_canvas_is_ignored_when_detecting_on_canvas() {
        let config = config(json!({"events": {"onhover": {"mode": "bubble"}}}));
        let canvas = Canvas::default();
        let modifiers = Modifiers::for_frame(&config, &canvas, &hovering(-10.0, 50.0), 0.0);

        let mut p = particle_at(&config, 0.0, 50.0);
        modifiers.apply(&mut p, &canvas);

        assert_eq!(p.bubble_radius, None);
    }

    #[test]
    fn hover_outside_canvas_counts_when_detecting_on_window() {
        let config = config(json!({"detect_on": "window", "events": {"onhover": {"mode": "bubble"}}}));
        let canvas = Canvas::default();
        let modifiers = Modifiers::for_frame(&config, &canvas, &hovering(-10.0, 50.0), 0.0);

        let mut p = particle_at(&config, 0.0, 50.0);
        modifiers.apply(&mut p, &canvas);

        assert!(p.bubble_radius.is_some());
    }

    #[test]
    fn disabled_hover_does_nothing() {
        let config = config(json!({"events": {"onhover": {"enable": false, "mode": "bubble"}}}));
        let canvas = Canvas::default();
        let modifiers = Modifiers::for_frame(&config, &canvas, &hovering(100.0, 100.0), 0.0);

        let mut p = particle_at(&config, 100.0, 100.0);
        modifiers.apply(&mut p, &canvas);

        assert_eq!(p.bubble_radius, None);
        assert_eq!(modifiers.grab_point(), None);
    }

    #[test]
    fn hover_bubble_reaches_targets_at_pointer() {
        let config = config(json!({"events": {"onhover": {"mode": "bubble"}},
                                   "modes": {"bubble": {"distance": 100, "size": 20, "opacity": 1}}}));
        let canvas = Canvas::default();
        let modifiers = Modifiers::for_frame(&config, &canvas, &hovering(100.0, 100.0), 0.0);

        let mut at_pointer = particle_at(&config, 100.0, 100.0);
        let mut halfway = particle_at(&config, 150.0, 100.0);
        let mut outside = particle_at(&config, 250.0, 100.0);
        modifiers.apply(&mut at_pointer, &canvas);
        modifiers.apply(&mut halfway, &canvas);
        modifiers.apply(&mut outside, &canvas);

        assert_eq!(at_pointer.drawn_radius(), 20.0);
        assert_eq!(at_pointer.drawn_opacity(), 1.0);
        assert_eq!(halfway.drawn_radius(), 12.0);
        assert_eq!(halfway.drawn_opacity(), 0.75);
        assert_eq!(outside.drawn_radius(), 4.0);
        assert_eq!(outside.radius, 4.0);
    }

    #[test]
    fn hover_repulse_pushes_particles_away() {
        let config = config(json!({"events": {"onhover": {"mode": "repulse"}},
                                   "modes": {"repulse": {"distance": 100}}}));
        let canvas = Canvas::default();
        let modifiers = Modifiers::for_frame(&config, &canvas, &hovering(100.0, 100.0), 0.0);

        let mut near = particle_at(&config, 110.0, 100.0);
        let mut far = particle_at(&config, 300.0, 100.0);
        modifiers.apply(&mut near, &canvas);
        modifiers.apply(&mut far, &canvas);

        // proximity 0.99, capped at the maximum step
        assert_eq!(near.x, 160.0);
        assert_eq!(near.y, 100.0);
        assert_eq!(far.x, 300.0);
    }

    #[test]
    fn repulse_at_pointer_position_is_skipped() {
        let config = config(json!({"events": {"onhover": {"mode": "repulse"}}}));
        let canvas = Canvas::default();
        let modifiers = Modifiers::for_frame(&config, &canvas, &hovering(100.0, 100.0), 0.0);

        let mut p = particle_at(&config, 100.0, 100.0);
        modifiers.apply(&mut p, &canvas);

        assert_eq!((p.x, p.y), (100.0, 100.0));
    }

    #[test]
    fn grab_point_only_for_grab_mode() {
        let grab = config(json!({}));
        let bubble = config(json!({"events": {"onhover": {"mode": "bubble"}}}));
        let canvas = Canvas::default();
        let pointer = hovering(10.0, 20.0);

        assert_eq!(
            Modifiers::for_frame(&grab, &canvas, &pointer, 0.0).grab_point(),
            Some((10.0, 20.0))
        );
        assert_eq!(
            Modifiers::for_frame(&bubble, &canvas, &pointer, 0.0).grab_point(),
            None
        );
    }

    #[test]
    fn grab_lines_fade_with_distance() {
        let config = config(json!({"modes": {"grab": {"distance": 100, "line_linked": {"opacity": 0.5}}}}));
        let particles = vec![
            particle_at(&config, 0.0, 0.0),
            particle_at(&config, 50.0, 0.0),
            particle_at(&config, 100.0, 0.0),
            particle_at(&config, 300.0, 0.0),
        ];
        let mut recorder = Recorder::new();

        let drawn = draw_grab_lines(
            &particles,
            (0.0, 0.0),
            &config.interactivity.modes.grab,
            &config.particles.line_linked,
            &mut recorder,
        );

        // the particle at exactly the grab distance has zero alpha and is skipped
        assert_eq!(drawn, 2);
        insta::assert_snapshot!(recorder.transcript(), @r"
        begin_path
        stroke_style #000000
        line_width 1
        alpha 0.5
        move_to 0 0
        line_to 0 0
        stroke
        begin_path
        stroke_style #000000
        line_width 1
        alpha 0.25
        move_to 0 0
        line_to 50 0
        stroke
        ");
    }

    #[test]
    fn click_bubble_ramps_in_then_out() {
        assert_eq!(bubble_weight(0.0, 0.5), 0.0);
        assert_eq!(bubble_weight(0.25, 0.5), 0.5);
        assert_eq!(bubble_weight(0.5, 0.5), 1.0);
        assert_eq!(bubble_weight(0.75, 0.5), 0.5);
        assert_eq!(bubble_weight(1.25, 0.5), 0.0);
        assert_eq!(bubble_weight(0.1, 0.0), 0.0);
    }

    #[test]
    fn click_effects_expire_after_their_duration() {
        let config = config(json!({"modes": {"bubble": {"duration": 0.5}, "repulse": {"duration": 0.25}}}));
        let modes = &config.interactivity.modes;
        let bubble = ClickEffect {
            x: 0.0,
            y: 0.0,
            mode: InteractMode::Bubble,
            started_ms: 1000.0,
        };
        let repulse = ClickEffect {
            mode: InteractMode::Repulse,
            ..bubble
        };

        assert!(!bubble.is_finished(1900.0, modes));
        assert!(bubble.is_finished(2100.0, modes));
        assert!(!repulse.is_finished(1200.0, modes));
        assert!(repulse.is_finished(1300.0, modes));

        let mut pointer = PointerState {
            position: None,
            click: Some(repulse),
        };
        pointer.expire(1200.0, modes);
        assert!(pointer.click.is_some());
        pointer.expire(1300.0, modes);
        assert!(pointer.click.is_none());
    }

    #[test]
    fn click_repulse_weakens_over_time() {
        let config = config(json!({"events": {"onhover": {"enable": false}},
                                   "modes": {"repulse": {"distance": 100, "duration": 1.0}}}));
        let canvas = Canvas::default();
        let pointer = PointerState {
            position: None,
            click: Some(ClickEffect {
                x: 100.0,
                y: 100.0,
                mode: InteractMode::Repulse,
                started_ms: 0.0,
            }),
        };

        let mut early = particle_at(&config, 150.0, 100.0);
        let mut late = particle_at(&config, 150.0, 100.0);
        Modifiers::for_frame(&config, &canvas, &pointer, 100.0).apply(&mut early, &canvas);
        Modifiers::for_frame(&config, &canvas, &pointer, 900.0).apply(&mut late, &canvas);

        assert!(early.x > late.x);
        assert!(late.x > 150.0);
    }

    #[test]
    fn no_modifiers_leave_particles_untouched() {
        let config = config(json!({}));
        let canvas = Canvas::default();
        let mut p = particle_at(&config, 10.0, 10.0);
        let before = p.clone();

        Modifiers::none(&config.interactivity.modes).apply(&mut p, &canvas);

        assert_eq!(p, before);
    }
}
