//! Core particle state and Verlet integration.
//!
//! A particle stores its current and previous position instead of an explicit
//! velocity; velocity is implicit in their difference divided by the step
//! size. The acceleration accumulator is filled by force terms each substep
//! and drained by `integrate`.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f32>;

/// Opaque display color carried by each particle. The solver never reads it.
pub type ColorTag = [f32; 3];

/// Handle returned by `SimulationWorld::add_object`. Ids are assigned
/// monotonically and never reused while the world is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub u64);

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos_now: NVec2,
    pub pos_old: NVec2,
    pub acceleration: NVec2,
    pub radius: f32,
    pub color: ColorTag,
    pub id: ParticleId,
}

impl Particle {
    pub fn new(position: NVec2, radius: f32, id: ParticleId) -> Self {
        Self {
            pos_now: position,
            pos_old: position,
            acceleration: NVec2::zeros(),
            radius,
            color: [1.0, 1.0, 1.0],
            id,
        }
    }

    /// Advance by one Verlet step:
    /// x_n+1 = x_n + (x_n - x_n-1) + a dt^2, then zero the accumulator.
    pub fn integrate(&mut self, dt: f32) {
        let displacement = self.pos_now - self.pos_old;
        self.pos_old = self.pos_now;
        self.pos_now += displacement + self.acceleration * (dt * dt);
        self.acceleration = NVec2::zeros();
    }

    pub fn accelerate(&mut self, a: NVec2) {
        self.acceleration += a;
    }

    /// Overwrite the implied velocity, discarding whatever the position
    /// history said before.
    pub fn set_velocity(&mut self, v: NVec2, dt: f32) {
        self.pos_old = self.pos_now - v * dt;
    }

    /// Compose with the implied velocity instead of replacing it.
    pub fn add_velocity(&mut self, v: NVec2, dt: f32) {
        self.pos_old -= v * dt;
    }

    /// Velocity implied by the position history at step size `dt`.
    #[must_use]
    pub fn velocity(&self, dt: f32) -> NVec2 {
        (self.pos_now - self.pos_old) / dt
    }
}
