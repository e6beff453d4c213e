//! Build fully-initialized runtime scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! consumed by the viewer: a validated [`SimulationWorld`] plus the spawner
//! parameters driving the demo's particle emitter.
//!
//! The scenario is inserted into Bevy as a `Resource`; all world mutation in
//! the viewer goes through this single resource, so reads always see a
//! quiescent snapshot between frames.

use bevy::prelude::Resource;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::particle::NVec2;
use crate::simulation::world::{SimulationWorld, WorldError};

/// Parameters for the viewer's timed particle emitter
#[derive(Debug, Clone)]
pub struct SpawnerParams {
    pub position: NVec2,
    /// Seconds between spawns
    pub interval: f32,
    /// Launch speed, in world units per second
    pub speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Emitter stops once the world holds this many particles
    pub max_objects: usize,
}

/// Bevy resource holding the fully-initialized simulation
#[derive(Resource)]
pub struct Scenario {
    pub world: SimulationWorld,
    pub spawner: SpawnerParams,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, WorldError> {
        let mut world = SimulationWorld::new();
        world.set_update_rate(cfg.solver.update_rate)?;
        world.set_substep_count(cfg.solver.substeps)?;
        world.set_gravity(NVec2::new(cfg.solver.gravity[0], cfg.solver.gravity[1]));
        world.set_constraint(
            NVec2::new(cfg.constraint.center[0], cfg.constraint.center[1]),
            cfg.constraint.radius,
        )?;

        let s = cfg.spawner;
        // Spawned radii must survive the same check add_object applies
        if !(s.radius_min > 0.0) || !s.radius_min.is_finite() {
            return Err(WorldError::InvalidParticleRadius(s.radius_min));
        }
        if s.radius_max < s.radius_min || !s.radius_max.is_finite() {
            return Err(WorldError::InvalidParticleRadius(s.radius_max));
        }

        let spawner = SpawnerParams {
            position: NVec2::new(s.position[0], s.position[1]),
            interval: s.interval,
            speed: s.speed,
            radius_min: s.radius_min,
            radius_max: s.radius_max,
            max_objects: s.max_objects,
        };

        Ok(Self { world, spawner })
    }
}
