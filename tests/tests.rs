use std::collections::BTreeSet;

use approx::assert_relative_eq;
use discsim::{NVec2, Particle, ParticleId, SimulationWorld, SpatialGrid};

/// World with gravity disabled and a huge boundary so nothing interferes
fn free_world() -> SimulationWorld {
    let mut w = SimulationWorld::new();
    w.set_update_rate(60).unwrap();
    w.set_substep_count(8).unwrap();
    w.set_gravity(NVec2::new(0.0, 0.0));
    w.set_constraint(NVec2::new(0.0, 0.0), 1.0e6).unwrap();
    w
}

/// The demo disc: boundary of radius 400 at (500, 500), gravity pulling
/// toward larger y (screen convention)
fn disc_world() -> SimulationWorld {
    let mut w = SimulationWorld::new();
    w.set_update_rate(60).unwrap();
    w.set_substep_count(8).unwrap();
    w.set_gravity(NVec2::new(0.0, 1000.0));
    w.set_constraint(NVec2::new(500.0, 500.0), 400.0).unwrap();
    w
}

/// Deterministic in-disc positions, no rand needed
fn scatter(i: usize) -> NVec2 {
    let i_f = i as f32;
    NVec2::new(
        500.0 + (i_f * 0.37).sin() * 250.0,
        500.0 + (i_f * 1.93).cos() * 250.0,
    )
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn free_flight_matches_linear_motion() {
    let mut w = free_world();
    let id = w.add_object(NVec2::new(100.0, 100.0), 5.0).unwrap();
    w.set_object_velocity(id, NVec2::new(30.0, -20.0)).unwrap();

    // One simulated second across 480 substeps
    for _ in 0..60 {
        w.update();
    }

    let p = w.object(id).unwrap();
    assert_relative_eq!(p.pos_now.x, 130.0, epsilon = 0.1);
    assert_relative_eq!(p.pos_now.y, 80.0, epsilon = 0.1);
    assert_relative_eq!(w.elapsed_time(), 1.0, epsilon = 1e-4);
}

#[test]
fn velocity_accessor_reflects_set_velocity() {
    let mut w = free_world();
    let id = w.add_object(NVec2::new(0.0, 0.0), 2.0).unwrap();
    w.set_object_velocity(id, NVec2::new(12.0, -7.0)).unwrap();

    let v = w.object(id).unwrap().velocity(w.step_dt());
    assert_relative_eq!(v.x, 12.0, epsilon = 1e-3);
    assert_relative_eq!(v.y, -7.0, epsilon = 1e-3);
}

#[test]
fn set_velocity_overwrites_add_velocity_composes() {
    let dt = 0.1;
    let mut p = Particle::new(NVec2::new(0.0, 0.0), 1.0, ParticleId(0));

    p.set_velocity(NVec2::new(1.0, 0.0), dt);
    p.add_velocity(NVec2::new(0.0, 2.0), dt);
    let v = p.velocity(dt);
    assert_relative_eq!(v.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(v.y, 2.0, epsilon = 1e-5);

    // A second set discards the history entirely
    p.set_velocity(NVec2::new(5.0, 0.0), dt);
    let v = p.velocity(dt);
    assert_relative_eq!(v.x, 5.0, epsilon = 1e-5);
    assert_relative_eq!(v.y, 0.0, epsilon = 1e-5);
}

#[test]
fn integration_applies_accumulated_acceleration_once() {
    let dt = 0.01;
    let mut p = Particle::new(NVec2::new(0.0, 0.0), 1.0, ParticleId(0));
    p.accelerate(NVec2::new(0.0, 100.0));
    p.integrate(dt);

    assert_relative_eq!(p.pos_now.y, 100.0 * dt * dt, epsilon = 1e-7);
    // Accumulator drained: a further step adds no new acceleration
    let y_before = p.pos_now.y;
    let vy = p.velocity(dt).y;
    p.integrate(dt);
    assert_relative_eq!(p.pos_now.y, y_before + vy * dt, epsilon = 1e-6);
}

// ==================================================================================
// Containment and constraint tests
// ==================================================================================

#[test]
fn containment_holds_after_every_update() {
    let mut w = disc_world();
    for i in 0..40 {
        let pos = NVec2::new(300.0 + (i as f32) * 10.0, 200.0 + ((i % 5) as f32) * 12.0);
        let radius = 5.0 + (i % 7) as f32;
        w.add_object(pos, radius).unwrap();
    }

    let (center, boundary_radius) = w.constraint();
    for _ in 0..120 {
        w.update();
        for p in w.objects() {
            let dist = (p.pos_now - center).norm();
            // The final integration of a frame may carry a particle one
            // substep of travel past the clamp before the next pass
            assert!(
                dist <= boundary_radius - p.radius + 5.0,
                "particle {:?} at distance {dist} escaped the boundary",
                p.id
            );
        }
    }
}

#[test]
fn falling_particle_settles_at_the_bottom() {
    // y-up variant of the demo: gravity pulls toward smaller y
    let mut w = free_world();
    w.set_gravity(NVec2::new(0.0, -1000.0));
    w.set_constraint(NVec2::new(500.0, 500.0), 400.0).unwrap();

    let id = w.add_object(NVec2::new(500.0, 900.0), 10.0).unwrap();
    w.set_object_velocity(id, NVec2::new(0.0, -200.0)).unwrap();

    let center = NVec2::new(500.0, 500.0);
    for _ in 0..60 {
        w.update();
        let p = w.object(id).unwrap();
        let dist = (p.pos_now - center).norm();
        // The spawn position starts clamped, which converts the initial
        // protrusion into a large implied velocity; allow one substep of
        // travel at that speed past the clamp
        assert!(dist <= 390.0 + 15.0, "escaped at distance {dist}");
        assert!(p.pos_now.x.is_finite() && p.pos_now.y.is_finite());
    }

    let p = w.object(id).unwrap();
    assert!(p.pos_now.y < 150.0, "not near the bottom: {}", p.pos_now.y);
    assert!((p.pos_now.x - 500.0).abs() < 30.0);
    let dist = (p.pos_now - center).norm();
    assert!((380.0..=395.0).contains(&dist), "not resting on the arc: {dist}");
}

// ==================================================================================
// Collision tests
// ==================================================================================

#[test]
fn overlap_decays_monotonically() {
    let mut w = free_world();
    let a = w.add_object(NVec2::new(0.0, 0.0), 5.0).unwrap();
    let b = w.add_object(NVec2::new(6.0, 0.0), 5.0).unwrap();

    let overlap = |w: &SimulationWorld| {
        let pa = w.object(a).unwrap().pos_now;
        let pb = w.object(b).unwrap().pos_now;
        (10.0 - (pa - pb).norm()).max(0.0)
    };

    let mut previous = overlap(&w);
    assert!(previous > 3.9, "setup should overlap by ~4");

    for _ in 0..120 {
        w.update();
        let current = overlap(&w);
        assert!(
            current <= previous + 1e-4,
            "overlap grew from {previous} to {current}"
        );
        previous = current;
    }
    assert!(previous < 0.05, "residual overlap {previous}");
}

#[test]
fn coincident_centers_separate_without_nan() {
    let mut w = free_world();
    let a = w.add_object(NVec2::new(50.0, 50.0), 4.0).unwrap();
    let b = w.add_object(NVec2::new(50.0, 50.0), 4.0).unwrap();

    for _ in 0..30 {
        w.update();
    }

    let pa = w.object(a).unwrap().pos_now;
    let pb = w.object(b).unwrap().pos_now;
    assert!(pa.x.is_finite() && pa.y.is_finite());
    assert!(pb.x.is_finite() && pb.y.is_finite());
    assert!((pa - pb).norm() > 0.0, "pair never separated");
}

// ==================================================================================
// Broad-phase tests
// ==================================================================================

#[test]
fn grid_candidates_match_all_pairs() {
    let radius = 3.0;
    let particles: Vec<Particle> = (0..80)
        .map(|i| {
            let i_f = i as f32;
            let pos = NVec2::new(
                100.0 + (i_f * 0.37).sin() * 90.0,
                100.0 + (i_f * 1.93).cos() * 90.0,
            );
            Particle::new(pos, radius, ParticleId(i as u64))
        })
        .collect();

    let mut grid = SpatialGrid::new();
    grid.rebuild(&particles, 4.0 * radius);

    let overlapping = |i: usize, j: usize| {
        let d = particles[i].pos_now - particles[j].pos_now;
        d.norm_squared() < (2.0 * radius) * (2.0 * radius)
    };

    // Exhaustive reference set
    let mut exhaustive = BTreeSet::new();
    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            if overlapping(i, j) {
                exhaustive.insert((i, j));
            }
        }
    }

    // Grid-pruned set, walked the same way the world does
    let mut pruned = BTreeSet::new();
    let mut candidates = Vec::new();
    for i in 0..particles.len() {
        let coord = grid.cell_of(particles[i].pos_now);
        grid.candidates_into(coord, &mut candidates);
        for &j in &candidates {
            if j <= i {
                continue;
            }
            if overlapping(i, j) {
                pruned.insert((i, j));
            }
        }
    }

    assert_eq!(exhaustive, pruned);
}

#[test]
fn grid_reports_each_candidate_once() {
    let particles: Vec<Particle> = (0..50)
        .map(|i| Particle::new(scatter(i), 4.0, ParticleId(i as u64)))
        .collect();

    let mut grid = SpatialGrid::new();
    grid.rebuild(&particles, 16.0);

    let mut candidates = Vec::new();
    for p in &particles {
        grid.candidates_into(grid.cell_of(p.pos_now), &mut candidates);
        let unique: BTreeSet<usize> = candidates.iter().copied().collect();
        assert_eq!(unique.len(), candidates.len(), "duplicate candidate index");
    }
}

// ==================================================================================
// World lifecycle tests
// ==================================================================================

#[test]
fn ids_are_unique_and_survive_clear() {
    let mut w = free_world();
    let ids: Vec<ParticleId> = (0..100)
        .map(|i| w.add_object(scatter(i), 1.0).unwrap())
        .collect();

    let unique: BTreeSet<ParticleId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());

    w.clear_objects();
    assert_eq!(w.object_count(), 0);

    // Handles from before the clear are stale, and new ids never collide
    // with them
    let fresh = w.add_object(NVec2::new(0.0, 0.0), 1.0).unwrap();
    assert!(!ids.contains(&fresh));
    assert!(w.object(ids[0]).is_err());
    assert!(w.object(fresh).is_ok());
}

#[test]
fn update_on_empty_world_advances_time() {
    let mut w = free_world();
    w.update();
    w.update();
    assert_eq!(w.object_count(), 0);
    assert_relative_eq!(w.elapsed_time(), 2.0 / 60.0, epsilon = 1e-6);
}

#[test]
fn identical_call_sequences_are_bit_identical() {
    let run = || {
        let mut w = disc_world();
        for i in 0..40 {
            let id = w.add_object(scatter(i), 3.0 + (i % 5) as f32).unwrap();
            w.set_object_velocity(id, NVec2::new((i as f32 * 0.7).sin() * 100.0, 0.0))
                .unwrap();
        }
        for _ in 0..60 {
            w.update();
        }
        w.objects()
            .iter()
            .map(|p| (p.pos_now.x.to_bits(), p.pos_now.y.to_bits()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

// ==================================================================================
// Configuration rejection tests
// ==================================================================================

#[test]
fn invalid_configuration_is_rejected() {
    let mut w = SimulationWorld::new();
    assert!(w.set_update_rate(0).is_err());
    assert!(w.set_substep_count(0).is_err());
    assert!(w.set_constraint(NVec2::new(0.0, 0.0), 0.0).is_err());
    assert!(w.set_constraint(NVec2::new(0.0, 0.0), -5.0).is_err());
    assert!(w.add_object(NVec2::new(0.0, 0.0), 0.0).is_err());
    assert!(w.add_object(NVec2::new(0.0, 0.0), -1.0).is_err());
    assert!(w.add_object(NVec2::new(0.0, 0.0), f32::NAN).is_err());

    // Valid settings still go through afterwards
    assert!(w.set_update_rate(120).is_ok());
    assert!(w.set_substep_count(4).is_ok());
    assert!(w.set_constraint(NVec2::new(10.0, 10.0), 50.0).is_ok());
}

#[test]
fn stale_or_unknown_handles_are_rejected() {
    let mut w = free_world();
    let bogus = ParticleId(999);
    assert!(w.set_object_velocity(bogus, NVec2::new(1.0, 0.0)).is_err());
    assert!(w.set_object_color(bogus, [1.0, 0.0, 0.0]).is_err());

    let id = w.add_object(NVec2::new(0.0, 0.0), 1.0).unwrap();
    assert!(w.set_object_color(id, [0.0, 1.0, 0.0]).is_ok());
    assert_eq!(w.object(id).unwrap().color, [0.0, 1.0, 0.0]);
}
