//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! demo scenario. A scenario consists of:
//!
//! - [`SolverConfig`]     – fixed-step scheduling and gravity
//! - [`ConstraintConfig`] – circular boundary center and radius
//! - [`SpawnerConfig`]    – the viewer's particle emitter
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! solver:
//!   update_rate: 60         # frames per second; frame delta = 1/update_rate
//!   substeps: 8             # solver passes per frame
//!   gravity: [0.0, 1000.0]  # constant acceleration, screen coordinates (y down)
//!
//! constraint:
//!   center: [500.0, 500.0]
//!   radius: 400.0
//!
//! spawner:
//!   position: [500.0, 200.0]
//!   interval: 0.05          # seconds between spawns
//!   speed: 1200.0           # launch speed
//!   radius_min: 5.0
//!   radius_max: 15.0
//!   max_objects: 800
//! ```
//!
//! Coordinates are screen-style by convention only; the solver itself is
//! agnostic and works equally with y-up and a negative gravity component.

use serde::Deserialize;

/// Fixed-step scheduling and gravity
#[derive(Deserialize, Debug, Clone)]
pub struct SolverConfig {
    pub update_rate: u32,  // frames per second
    pub substeps: u32,     // solver passes per frame, >= 1
    pub gravity: [f32; 2], // constant acceleration vector
}

/// Circular boundary every particle is confined to
#[derive(Deserialize, Debug, Clone)]
pub struct ConstraintConfig {
    pub center: [f32; 2],
    pub radius: f32,
}

/// The viewer's timed particle emitter
#[derive(Deserialize, Debug, Clone)]
pub struct SpawnerConfig {
    pub position: [f32; 2], // where new particles appear
    pub interval: f32,      // seconds between spawns
    pub speed: f32,         // launch speed
    pub radius_min: f32,
    pub radius_max: f32,
    pub max_objects: usize, // emitter cap
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub solver: SolverConfig,
    pub constraint: ConstraintConfig,
    pub spawner: SpawnerConfig,
}
