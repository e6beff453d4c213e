//! Narrow-phase pair resolution and the circular boundary constraint

use crate::simulation::particle::{NVec2, Particle};

/// Under-relaxation factor for positional correction. A full correction in a
/// single pass injects energy and jitters; 0.75 spreads the fix for one
/// overlap across successive substeps.
pub const RESPONSE_COEF: f32 = 0.75;

/// Separation axis used when two centers coincide exactly. Any fixed unit
/// vector works; it only has to be deterministic and finite.
fn fallback_axis() -> NVec2 {
    NVec2::new(1.0, 0.0)
}

/// Test one candidate pair for overlap and, if overlapping, push the two
/// particles apart along the center line. The correction is split by the
/// radius-proportional mass proxies so the smaller particle moves more.
pub fn solve_pair(a: &mut Particle, b: &mut Particle) {
    let v = a.pos_now - b.pos_now;
    let dist2 = v.norm_squared();
    let min_dist = a.radius + b.radius;
    if dist2 >= min_dist * min_dist {
        return;
    }

    let dist = dist2.sqrt();
    let n = if dist > 0.0 { v / dist } else { fallback_axis() };
    let mass_ratio_a = a.radius / min_dist;
    let mass_ratio_b = b.radius / min_dist;
    // Negative on overlap, so the signed updates below separate the pair
    let delta = 0.5 * RESPONSE_COEF * (dist - min_dist);

    a.pos_now -= n * (mass_ratio_b * delta);
    b.pos_now += n * (mass_ratio_a * delta);
}

/// Project a particle that left the circular container back onto the circle
/// of radius `radius - p.radius`, along the existing center-to-particle
/// direction. Runs once per substep, after collision resolution and before
/// integration.
pub fn apply_constraint(p: &mut Particle, center: NVec2, radius: f32) {
    let v = center - p.pos_now;
    let dist = v.norm();
    if dist > radius - p.radius {
        let n = if dist > 0.0 { v / dist } else { fallback_axis() };
        p.pos_now = center - n * (radius - p.radius);
    }
}
