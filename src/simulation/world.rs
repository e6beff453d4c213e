//! Simulation world: particle store, fixed-step scheduling, and the
//! five-stage substep pipeline
//!
//! `update()` is the only state-mutating entry point besides object
//! add/clear. Each substep runs, in this fixed order:
//! 1. gravity accumulation
//! 2. broad-phase grid rebuild from current positions
//! 3. narrow-phase resolution over grid-pruned candidate pairs
//! 4. circular boundary constraint
//! 5. Verlet integration
//!
//! Collisions are resolved against pre-constraint positions and the
//! constraint is the final authority each substep, so a particle can
//! protrude briefly between substeps but is reclamped before the next
//! collision pass.

use thiserror::Error;

use crate::simulation::collision::{apply_constraint, solve_pair};
use crate::simulation::forces::{AccelSet, UniformGravity};
use crate::simulation::grid::SpatialGrid;
use crate::simulation::particle::{ColorTag, NVec2, Particle, ParticleId};

/// Floor for the broad-phase cell edge, in case the world is empty or only
/// holds sub-unit particles
const MIN_CELL_SIZE: f32 = 1.0;

/// Configuration and handle errors, rejected fail-fast at the call site
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("update rate must be positive")]
    InvalidUpdateRate,
    #[error("substep count must be at least 1")]
    InvalidSubstepCount,
    #[error("constraint radius must be positive and finite, got {0}")]
    InvalidConstraintRadius(f32),
    #[error("particle radius must be positive and finite, got {0}")]
    InvalidParticleRadius(f32),
    #[error("unknown or stale particle handle {0:?}")]
    StaleHandle(ParticleId),
}

pub struct SimulationWorld {
    particles: Vec<Particle>,
    grid: SpatialGrid,
    forces: AccelSet,
    gravity: NVec2,
    constraint_center: NVec2,
    constraint_radius: f32,
    frame_dt: f32,
    sub_steps: u32,
    time: f32,
    /// Next id to hand out; monotonic for the lifetime of the world
    next_id: u64,
    /// Id of the oldest live particle. Everything below it was dropped by a
    /// clear, so stale handles can be told apart from live ones.
    base_id: u64,
    /// Largest radius ever added since the last clear; sizes the grid cells
    max_radius: f32,
    /// Scratch buffer for broad-phase candidates, reused across substeps
    candidates: Vec<usize>,
}

impl SimulationWorld {
    pub fn new() -> Self {
        let gravity = NVec2::new(0.0, 1000.0);
        Self {
            particles: Vec::new(),
            grid: SpatialGrid::new(),
            forces: AccelSet::new().with(UniformGravity { g: gravity }),
            gravity,
            constraint_center: NVec2::zeros(),
            constraint_radius: 100.0,
            frame_dt: 1.0 / 60.0,
            sub_steps: 1,
            time: 0.0,
            next_id: 0,
            base_id: 0,
            max_radius: 0.0,
            candidates: Vec::new(),
        }
    }

    // configuration ========================================================

    pub fn set_update_rate(&mut self, rate: u32) -> Result<(), WorldError> {
        if rate == 0 {
            return Err(WorldError::InvalidUpdateRate);
        }
        self.frame_dt = 1.0 / rate as f32;
        Ok(())
    }

    pub fn set_substep_count(&mut self, steps: u32) -> Result<(), WorldError> {
        if steps == 0 {
            return Err(WorldError::InvalidSubstepCount);
        }
        self.sub_steps = steps;
        Ok(())
    }

    pub fn set_constraint(&mut self, center: NVec2, radius: f32) -> Result<(), WorldError> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(WorldError::InvalidConstraintRadius(radius));
        }
        self.constraint_center = center;
        self.constraint_radius = radius;
        Ok(())
    }

    pub fn set_gravity(&mut self, g: NVec2) {
        self.gravity = g;
        self.forces = AccelSet::new().with(UniformGravity { g });
    }

    // objects ==============================================================

    pub fn add_object(&mut self, position: NVec2, radius: f32) -> Result<ParticleId, WorldError> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(WorldError::InvalidParticleRadius(radius));
        }
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.max_radius = self.max_radius.max(radius);
        self.particles.push(Particle::new(position, radius, id));
        Ok(id)
    }

    /// Overwrite the implied velocity of one particle, scaled for the
    /// current substep size
    pub fn set_object_velocity(&mut self, id: ParticleId, v: NVec2) -> Result<(), WorldError> {
        let step_dt = self.step_dt();
        let index = self.index_of(id)?;
        self.particles[index].set_velocity(v, step_dt);
        Ok(())
    }

    pub fn set_object_color(&mut self, id: ParticleId, color: ColorTag) -> Result<(), WorldError> {
        let index = self.index_of(id)?;
        self.particles[index].color = color;
        Ok(())
    }

    /// Drop every particle. Handles issued before the clear become stale and
    /// are rejected; the id counter keeps running so they can never collide
    /// with later particles.
    pub fn clear_objects(&mut self) {
        self.particles.clear();
        self.base_id = self.next_id;
        self.max_radius = 0.0;
    }

    // accessors ============================================================

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn elapsed_time(&self) -> f32 {
        self.time
    }

    /// Read-only snapshot of all particles, ordered by ascending id
    #[must_use]
    pub fn objects(&self) -> &[Particle] {
        &self.particles
    }

    pub fn object(&self, id: ParticleId) -> Result<&Particle, WorldError> {
        let index = self.index_of(id)?;
        Ok(&self.particles[index])
    }

    /// Boundary center and radius
    #[must_use]
    pub fn constraint(&self) -> (NVec2, f32) {
        (self.constraint_center, self.constraint_radius)
    }

    #[must_use]
    pub fn gravity(&self) -> NVec2 {
        self.gravity
    }

    #[must_use]
    pub fn step_dt(&self) -> f32 {
        self.frame_dt / self.sub_steps as f32
    }

    // update pipeline ======================================================

    /// Advance the world by one frame: `sub_steps` passes through the full
    /// solver pipeline at `frame_dt / sub_steps` each
    pub fn update(&mut self) {
        self.time += self.frame_dt;
        let step_dt = self.step_dt();

        for _ in 0..self.sub_steps {
            self.forces.accumulate(self.time, &mut self.particles);
            let cell_size = self.broad_phase_cell_size();
            self.grid.rebuild(&self.particles, cell_size);
            self.resolve_collisions();
            self.apply_boundary();
            for p in self.particles.iter_mut() {
                p.integrate(step_dt);
            }
        }

        debug_assert!(
            self.particles
                .iter()
                .all(|p| p.pos_now.x.is_finite() && p.pos_now.y.is_finite()),
            "non-finite particle position after update"
        );
    }

    /// Cell edge of at least twice the largest diameter, so every true
    /// overlap falls within the 3x3 neighborhood scan
    fn broad_phase_cell_size(&self) -> f32 {
        (4.0 * self.max_radius).max(MIN_CELL_SIZE)
    }

    /// Narrow phase over grid-pruned candidates. Particles are walked in
    /// ascending index order and only partners with a larger index are
    /// solved, so each unordered pair is visited exactly once per substep
    /// and the order is deterministic.
    fn resolve_collisions(&mut self) {
        let count = self.particles.len();
        let mut scratch = std::mem::take(&mut self.candidates);

        for i in 0..count {
            let coord = self.grid.cell_of(self.particles[i].pos_now);
            self.grid.candidates_into(coord, &mut scratch);
            for &j in scratch.iter() {
                if j <= i {
                    continue;
                }
                let (head, tail) = self.particles.split_at_mut(j);
                solve_pair(&mut head[i], &mut tail[0]);
            }
        }

        self.candidates = scratch;
    }

    fn apply_boundary(&mut self) {
        for p in self.particles.iter_mut() {
            apply_constraint(p, self.constraint_center, self.constraint_radius);
        }
    }

    // helpers ==============================================================

    fn index_of(&self, id: ParticleId) -> Result<usize, WorldError> {
        if id.0 < self.base_id || id.0 >= self.next_id {
            return Err(WorldError::StaleHandle(id));
        }
        Ok((id.0 - self.base_id) as usize)
    }
}

impl Default for SimulationWorld {
    fn default() -> Self {
        Self::new()
    }
}
