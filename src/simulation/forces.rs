//! Acceleration contributors for the particle solver
//!
//! Each term implements [`Acceleration`] and writes into the particles'
//! acceleration accumulators; the accumulators are drained by integration

use crate::simulation::particle::{NVec2, Particle};

/// Collection of acceleration terms (gravity, drag, etc.)
/// Their contributions are summed per particle each substep
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Accumulate every term into the particles at time `t`
    pub fn accumulate(&self, t: f32, particles: &mut [Particle]) {
        for term in &self.terms {
            term.acceleration(t, particles);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for acceleration sources operating on the particle list
/// Implementations add their contribution into each particle's accumulator
pub trait Acceleration {
    fn acceleration(&self, t: f32, particles: &mut [Particle]);
}

/// Constant acceleration applied uniformly to every particle
pub struct UniformGravity {
    pub g: NVec2,
}

impl Acceleration for UniformGravity {
    fn acceleration(&self, _t: f32, particles: &mut [Particle]) {
        for p in particles.iter_mut() {
            p.accelerate(self.g);
        }
    }
}
