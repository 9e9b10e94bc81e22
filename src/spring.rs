//! Damped springs between pairs of particles.

use crate::float::Float;
use crate::vec::Vec;
use crate::particle::Particle;
use crate::error::PhysicsError;

/// Default spring constant (ks).
pub const DEFAULT_STIFFNESS: f32 = 100.0;
/// Default damping constant (kd).
pub const DEFAULT_DAMPING: f32 = 10.0;

const DEGENERATE_LENGTH: f32 = 1e-10;

/// An undirected spring-damper between particles `a` and `b`.
///
/// Endpoints are indices into the owning system's particle list.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringConstraint<V: Vec> {
    pub a: usize,
    pub b: usize,
    pub rest_length: V::Scalar,
    pub stiffness: V::Scalar,
    pub damping: V::Scalar,
}

impl<V: Vec> SpringConstraint<V> {
    pub fn new(
        a: usize,
        b: usize,
        rest_length: V::Scalar,
        stiffness: V::Scalar,
        damping: V::Scalar,
    ) -> Self {
        SpringConstraint { a, b, rest_length, stiffness, damping }
    }

    /// Rest length taken from the current distance between the endpoints.
    ///
    /// Panics if either index is out of bounds.
    pub fn from_particles(
        a: usize,
        b: usize,
        particles: &[Particle<V>],
        stiffness: V::Scalar,
        damping: V::Scalar,
    ) -> Self {
        let rest_length = particles[a].pos.distance(particles[b].pos);
        SpringConstraint { a, b, rest_length, stiffness, damping }
    }

    /// Check the constraint against a system of `count` particles.
    pub fn validate(&self, count: usize) -> Result<(), PhysicsError> {
        for index in [self.a, self.b] {
            if index >= count {
                return Err(PhysicsError::ParticleOutOfBounds { index, count });
            }
        }
        if self.a == self.b {
            return Err(PhysicsError::SelfConstraint { index: self.a });
        }
        let zero = V::Scalar::zero();
        if !(self.rest_length.is_finite() && self.rest_length >= zero) {
            return Err(PhysicsError::InvalidRestLength);
        }
        if !(self.stiffness.is_finite() && self.stiffness > zero) {
            return Err(PhysicsError::InvalidStiffness);
        }
        if !(self.damping.is_finite() && self.damping >= zero) {
            return Err(PhysicsError::InvalidDamping);
        }
        Ok(())
    }

    /// Forces on `(a, b)`. They always sum to zero.
    ///
    /// A stretched spring pulls the endpoints together, a compressed one
    /// pushes them apart. Coincident endpoints give no force at all.
    pub fn forces(&self, particles: &[Particle<V>]) -> (V, V) {
        let pa = &particles[self.a];
        let pb = &particles[self.b];

        let displacement = pa.pos - pb.pos;
        let dist = displacement.length();
        if dist.is_near_zero(V::Scalar::from_f32(DEGENERATE_LENGTH)) {
            return (V::zero(), V::zero());
        }

        let relative_vel = pa.vel - pb.vel;
        let stretch = dist - self.rest_length;
        let damping_term = self.damping * displacement.dot(relative_vel) / dist;
        let magnitude = self.stiffness * stretch + damping_term;

        let on_b = displacement.scale(magnitude / dist);
        (-on_b, on_b)
    }
}
