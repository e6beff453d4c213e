pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::collision::{apply_constraint, solve_pair, RESPONSE_COEF};
pub use simulation::forces::{AccelSet, Acceleration, UniformGravity};
pub use simulation::grid::SpatialGrid;
pub use simulation::particle::{ColorTag, NVec2, Particle, ParticleId};
pub use simulation::scenario::{Scenario, SpawnerParams};
pub use simulation::world::{SimulationWorld, WorldError};

pub use configuration::config::{ConstraintConfig, ScenarioConfig, SolverConfig, SpawnerConfig};

pub use visualization::vis2d::run_2d;

pub use benchmark::benchmark::bench_collisions;
