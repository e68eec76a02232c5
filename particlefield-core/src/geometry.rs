//! Geometry helpers: headings, shape outlines, distances and link falloff

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::{Direction, ShapeKind};
use crate::surface::DrawContext;

/// Per-axis factor for diagonal headings
const DIAGONAL: f64 = 0.7;

/// Most sides a polygon is drawn with; larger counts are clamped
pub const MAX_POLYGON_SIDES: i64 = 100;

/// Velocity for a heading at the given speed
///
/// `Direction::None` samples a fresh uniform angle on every call.
pub fn velocity<R: Rng + ?Sized>(direction: Direction, speed: f64, rng: &mut R) -> (f64, f64) {
    let diagonal = speed * DIAGONAL;
    match direction {
        Direction::Top => (0.0, -speed),
        Direction::TopRight => (diagonal, -diagonal),
        Direction::Right => (speed, 0.0),
        Direction::BottomRight => (diagonal, diagonal),
        Direction::Bottom => (0.0, speed),
        Direction::BottomLeft => (-diagonal, diagonal),
        Direction::Left => (-speed, 0.0),
        Direction::TopLeft => (-diagonal, -diagonal),
        Direction::None => random_heading(speed, rng),
    }
}

/// Velocity of `speed` along a uniformly random angle
pub fn random_heading<R: Rng + ?Sized>(speed: f64, rng: &mut R) -> (f64, f64) {
    let angle = rng.r#gen::<f64>() * TAU;
    (angle.cos() * speed, angle.sin() * speed)
}

/// Euclidean distance between two points
pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Alpha of a line between two points `distance` apart
///
/// Falls off linearly from `opacity` at zero distance to zero at `max_distance`.
/// Returns `None` when no line should be drawn, including a non-positive
/// threshold.
pub fn link_alpha(distance: f64, max_distance: f64, opacity: f64) -> Option<f64> {
    if max_distance <= 0.0 || distance > max_distance {
        return None;
    }
    Some(opacity * (1.0 - distance / max_distance))
}

/// Vertices of a regular polygon centred on `(x, y)`, starting at angle 0
///
/// Fewer than three sides yields no vertices. Side counts above
/// [`MAX_POLYGON_SIDES`] are clamped.
pub fn polygon_vertices(x: f64, y: f64, radius: f64, sides: i64) -> Vec<(f64, f64)> {
    if sides < 3 {
        return Vec::new();
    }
    let sides = sides.min(MAX_POLYGON_SIDES);
    let step = TAU / sides as f64;
    (0..sides)
        .map(|i| {
            let angle = i as f64 * step;
            (x + radius * angle.cos(), y + radius * angle.sin())
        })
        .collect()
}

/// Add a shape's outline to the current path
///
/// A polygon that is not [drawable](is_drawable) adds nothing.
pub fn trace_shape(
    ctx: &mut dyn DrawContext,
    kind: ShapeKind,
    sides: i64,
    x: f64,
    y: f64,
    radius: f64,
) {
    match kind {
        ShapeKind::Circle => ctx.arc(x, y, radius, 0.0, TAU),
        ShapeKind::Square => ctx.rect(x - radius, y - radius, radius * 2.0, radius * 2.0),
        ShapeKind::Triangle => trace_polygon(ctx, x, y, radius, 3),
        ShapeKind::Polygon => trace_polygon(ctx, x, y, radius, sides),
    }
}

fn trace_polygon(ctx: &mut dyn DrawContext, x: f64, y: f64, radius: f64, sides: i64) {
    let vertices = polygon_vertices(x, y, radius, sides);
    let Some((&(start_x, start_y), rest)) = vertices.split_first() else {
        return;
    };
    ctx.move_to(start_x, start_y);
    for &(vx, vy) in rest {
        ctx.line_to(vx, vy);
    }
    ctx.close_path();
}

/// Clamp a coordinate so a shape of `radius` stays within `[0, extent]`
///
/// A shape wider than the extent is centred.
pub fn clamp_inside(value: f64, radius: f64, extent: f64) -> f64 {
    if extent < radius * 2.0 {
        return extent / 2.0;
    }
    value.max(radius).min(extent - radius)
}

/// Whether a shape kind is drawable with the given side count
pub fn is_drawable(kind: ShapeKind, sides: i64) -> bool {
    kind != ShapeKind::Polygon || sides >= 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, Recorder};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn compass_headings_scale_with_speed() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(velocity(Direction::Top, 2.0, &mut rng), (0.0, -2.0));
        assert_eq!(velocity(Direction::Right, 2.0, &mut rng), (2.0, 0.0));
        assert_eq!(velocity(Direction::Bottom, 2.0, &mut rng), (0.0, 2.0));
        assert_eq!(velocity(Direction::Left, 2.0, &mut rng), (-2.0, 0.0));
        assert_eq!(velocity(Direction::TopRight, 2.0, &mut rng), (1.4, -1.4));
        assert_eq!(velocity(Direction::BottomRight, 2.0, &mut rng), (1.4, 1.4));
        assert_eq!(velocity(Direction::BottomLeft, 2.0, &mut rng), (-1.4, 1.4));
        assert_eq!(velocity(Direction::TopLeft, 2.0, &mut rng), (-1.4, -1.4));
    }

    #[test]
    fn random_heading_has_requested_speed() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let (vx, vy) = velocity(Direction::None, 3.0, &mut rng);
            assert!(((vx * vx + vy * vy).sqrt() - 3.0).abs() < EPSILON);
        }
    }

    #[test]
    fn random_heading_changes_between_calls() {
        let mut rng = StdRng::seed_from_u64(42);
        let first = velocity(Direction::None, 1.0, &mut rng);
        let second = velocity(Direction::None, 1.0, &mut rng);

        assert_ne!(first, second);
    }

    #[test]
    fn link_alpha_falls_off_linearly() {
        assert_eq!(link_alpha(0.0, 100.0, 0.4), Some(0.4));
        assert_eq!(link_alpha(50.0, 100.0, 0.4), Some(0.2));
        assert_eq!(link_alpha(100.0, 100.0, 0.4), Some(0.0));
        assert_eq!(link_alpha(100.01, 100.0, 0.4), None);
    }

    #[test]
    fn link_alpha_strictly_decreases_within_threshold() {
        let mut previous = f64::INFINITY;
        for step in 0..=20 {
            let alpha = link_alpha(step as f64 * 5.0, 100.0, 1.0).unwrap();
            assert!(alpha < previous);
            previous = alpha;
        }
    }

    #[test]
    fn non_positive_threshold_never_links() {
        assert_eq!(link_alpha(0.0, 0.0, 1.0), None);
        assert_eq!(link_alpha(0.0, -10.0, 1.0), None);
    }

    #[test]
    fn polygon_has_one_vertex_per_side() {
        for sides in 3..10 {
            let vertices = polygon_vertices(0.0, 0.0, 10.0, sides);
            assert_eq!(vertices.len(), sides as usize);
            for &(x, y) in &vertices {
                assert!(((x * x + y * y).sqrt() - 10.0).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn huge_side_counts_are_clamped() {
        assert_eq!(polygon_vertices(0.0, 0.0, 1.0, i64::MAX).len(), MAX_POLYGON_SIDES as usize);

        let mut recorder = Recorder::new();
        trace_shape(&mut recorder, ShapeKind::Polygon, 1_000_000_000, 0.0, 0.0, 4.0);
        assert_eq!(
            recorder.count(|c| matches!(c, DrawCommand::LineTo(..))),
            MAX_POLYGON_SIDES as usize - 1
        );
    }

    #[test]
    fn polygon_starts_at_angle_zero() {
        let vertices = polygon_vertices(5.0, 5.0, 2.0, 4);
        assert!((vertices[0].0 - 7.0).abs() < EPSILON);
        assert!((vertices[0].1 - 5.0).abs() < EPSILON);
    }

    #[test]
    fn degenerate_polygons_have_no_vertices() {
        assert!(polygon_vertices(0.0, 0.0, 10.0, 2).is_empty());
        assert!(polygon_vertices(0.0, 0.0, 10.0, 0).is_empty());
        assert!(polygon_vertices(0.0, 0.0, 10.0, -4).is_empty());
    }

    #[test]
    fn traced_polygon_connects_vertices_and_closes() {
        let mut recorder = Recorder::new();
        trace_shape(&mut recorder, ShapeKind::Polygon, 6, 0.0, 0.0, 4.0);

        assert_eq!(recorder.count(|c| matches!(c, DrawCommand::MoveTo(..))), 1);
        assert_eq!(recorder.count(|c| matches!(c, DrawCommand::LineTo(..))), 5);
        assert_eq!(recorder.commands.last(), Some(&DrawCommand::ClosePath));
    }

    #[test]
    fn degenerate_polygon_traces_nothing() {
        let mut recorder = Recorder::new();
        trace_shape(&mut recorder, ShapeKind::Polygon, 2, 0.0, 0.0, 4.0);
        assert!(recorder.commands.is_empty());
        assert!(!is_drawable(ShapeKind::Polygon, 2));
        assert!(is_drawable(ShapeKind::Circle, 0));
    }

    #[test]
    fn square_is_centred_on_position() {
        let mut recorder = Recorder::new();
        trace_shape(&mut recorder, ShapeKind::Square, 0, 10.0, 20.0, 5.0);

        insta::assert_snapshot!(recorder.transcript(), @"rect 5 15 10 10");
    }

    #[test]
    fn clamp_inside_keeps_shape_on_surface() {
        assert_eq!(clamp_inside(-3.0, 5.0, 100.0), 5.0);
        assert_eq!(clamp_inside(99.0, 5.0, 100.0), 95.0);
        assert_eq!(clamp_inside(50.0, 5.0, 100.0), 50.0);
        assert_eq!(clamp_inside(50.0, 60.0, 100.0), 50.0);
    }

    #[test]
    fn triangle_is_a_three_sided_polygon() {
        let mut recorder = Recorder::new();
        trace_shape(&mut recorder, ShapeKind::Triangle, 0, 0.0, 0.0, 1.0);

        assert_eq!(recorder.count(|c| matches!(c, DrawCommand::LineTo(..))), 2);
    }
}
