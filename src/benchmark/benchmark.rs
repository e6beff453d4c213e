use std::time::Instant;

use crate::simulation::collision::solve_pair;
use crate::simulation::grid::SpatialGrid;
use crate::simulation::particle::{NVec2, Particle, ParticleId};

/// Time one direct all-pairs collision pass against one grid-pruned pass,
/// for increasing particle counts
pub fn bench_collisions() {
    // Different cloud sizes to test
    let ns = [200usize, 400, 800, 1600, 3200, 6400];

    for n in ns {
        let radius = 4.0;
        // Cell edge of twice the largest diameter, same rule the world uses
        let cell_size = 4.0 * radius;

        let mut direct = particle_cloud(n, radius);
        let mut pruned = direct.clone();

        let mut grid = SpatialGrid::new();

        // Warm up
        grid.rebuild(&pruned, cell_size);

        // Time direct all-pairs
        let t0 = Instant::now();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = direct.split_at_mut(j);
                solve_pair(&mut head[i], &mut tail[0]);
            }
        }
        let dt_direct = t0.elapsed().as_secs_f64();

        // Time grid rebuild + pruned pass
        let t1 = Instant::now();
        grid.rebuild(&pruned, cell_size);
        let mut candidates = Vec::new();
        for i in 0..n {
            let coord = grid.cell_of(pruned[i].pos_now);
            grid.candidates_into(coord, &mut candidates);
            for &j in &candidates {
                if j <= i {
                    continue;
                }
                let (head, tail) = pruned.split_at_mut(j);
                solve_pair(&mut head[i], &mut tail[0]);
            }
        }
        let dt_grid = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {dt_direct:8.6} s, grid = {dt_grid:8.6} s");
    }
}

/// Deterministic particle cloud, no rand needed
fn particle_cloud(n: usize, radius: f32) -> Vec<Particle> {
    (0..n)
        .map(|i| {
            let i_f = i as f32;
            let pos = NVec2::new(
                500.0 + (i_f * 0.37).sin() * 380.0,
                500.0 + (i_f * 0.13).cos() * 380.0,
            );
            Particle::new(pos, radius, ParticleId(i as u64))
        })
        .collect()
}
