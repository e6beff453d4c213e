//! Uniform-cell broad-phase grid
//!
//! Buckets particle indices by integer cell coordinate
//! `floor(position / cell_size)` so the narrow phase only has to test the
//! 3x3 neighborhood of each particle's own cell instead of all pairs.
//! The grid is derived state: it is thrown away and rebuilt from the
//! particle list every substep and is never consulted stale.

use std::collections::HashMap;

use crate::simulation::particle::{NVec2, Particle};

pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self {
            cell_size: 1.0,
            cells: HashMap::new(),
        }
    }

    /// Cell coordinate containing `pos` at the current cell size
    #[must_use]
    pub fn cell_of(&self, pos: NVec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Empty every bucket and re-bucket all particles by current position.
    /// Bucket allocations are kept across rebuilds.
    ///
    /// `cell_size` must be at least twice the largest particle diameter so
    /// that every true overlap is found by the 3x3 neighborhood scan.
    pub fn rebuild(&mut self, particles: &[Particle], cell_size: f32) {
        self.cell_size = cell_size;
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        for (index, p) in particles.iter().enumerate() {
            let coord = self.cell_of(p.pos_now);
            self.cells.entry(coord).or_default().push(index);
        }
    }

    /// Collect into `out` the indices bucketed in the 3x3 neighborhood of
    /// `coord`, in a fixed scan order. The grid is sparse, so neighbor cells
    /// that hold nothing simply contribute nothing; coordinates never wrap.
    pub fn candidates_into(&self, coord: (i32, i32), out: &mut Vec<usize>) {
        out.clear();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.cells.get(&(coord.0 + dx, coord.1 + dy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new()
    }
}
