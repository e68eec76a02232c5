//! Proximity links between particles
//!
//! Every unordered pair is visited once, so cost is quadratic in the particle
//! count. Practical counts are in the hundreds.

use serde::Serialize;

use crate::config::{AttractOptions, LineLinkedOptions};
use crate::geometry::{distance, link_alpha};
use crate::particle::Particle;
use crate::surface::DrawContext;

/// Attraction divisor scale applied to `rotateX`/`rotateY`
const ATTRACT_SCALE: f64 = 1000.0;

/// What one linking pass did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub pairs_checked: usize,
    pub lines_drawn: usize,
}

/// Draw a line between every pair of particles within the link distance
///
/// When attraction is enabled, linked pairs also pull each other's velocity.
pub fn link_particles(
    particles: &mut [Particle],
    line: &LineLinkedOptions,
    attract: &AttractOptions,
    ctx: &mut dyn DrawContext,
) -> LinkStats {
    let mut stats = LinkStats::default();
    if line.distance <= 0.0 {
        return stats;
    }

    let n = particles.len();
    for i in 0..n {
        for j in (i + 1)..n {
            stats.pairs_checked += 1;

            let (a, b) = (&particles[i], &particles[j]);
            let dist = distance((a.x, a.y), (b.x, b.y));
            let Some(alpha) = link_alpha(dist, line.distance, line.opacity) else {
                continue;
            };

            ctx.begin_path();
            ctx.set_stroke_style(&line.color);
            ctx.set_line_width(line.width);
            ctx.set_global_alpha(alpha);
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            ctx.stroke();
            stats.lines_drawn += 1;

            if attract.enable {
                attract_pair(particles, i, j, attract);
            }
        }
    }

    stats
}

/// Pull particles `i < j` toward each other
fn attract_pair(particles: &mut [Particle], i: usize, j: usize, attract: &AttractOptions) {
    let (head, tail) = particles.split_at_mut(j);
    let (a, b) = (&mut head[i], &mut tail[0]);

    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let ax = if attract.rotate_x > 0.0 {
        dx / (attract.rotate_x * ATTRACT_SCALE)
    } else {
        0.0
    };
    let ay = if attract.rotate_y > 0.0 {
        dy / (attract.rotate_y * ATTRACT_SCALE)
    } else {
        0.0
    };

    a.vx -= ax;
    a.vy -= ay;
    b.vx += ax;
    b.vy += ay;
}
