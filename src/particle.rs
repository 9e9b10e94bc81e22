//! Point-mass particles with explicit velocity and one step of history.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec;

/// Which acceleration drives the velocity update of a step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum IntegrationScheme {
    /// Forward Euler on the acceleration computed this step.
    #[default]
    ExplicitEuler,
    /// Velocity update from the previous step's acceleration.
    SemiImplicit,
}

/// A point mass.
///
/// The `prev_*` fields hold the state from immediately before the most
/// recent step; on construction they equal the initial state. `mass` and
/// its cached inverse only change together through [`set_mass`](Self::set_mass).
#[derive(Clone, Debug)]
pub struct Particle<V: Vec> {
    pub pos: V,
    pub vel: V,
    pub acceleration: V,
    pub prev_pos: V,
    pub prev_vel: V,
    pub prev_acceleration: V,
    mass: V::Scalar,
    inv_mass: V::Scalar,
}

impl<V: Vec> Particle<V> {
    /// A particle at rest.
    pub fn new(pos: V, mass: V::Scalar) -> Self {
        Self::with_velocity(pos, V::zero(), mass)
    }

    pub fn with_velocity(pos: V, vel: V, mass: V::Scalar) -> Self {
        Particle {
            pos,
            vel,
            acceleration: V::zero(),
            prev_pos: pos,
            prev_vel: vel,
            prev_acceleration: V::zero(),
            mass,
            inv_mass: inverse(mass),
        }
    }

    pub fn mass(&self) -> V::Scalar {
        self.mass
    }

    pub fn inv_mass(&self) -> V::Scalar {
        self.inv_mass
    }

    /// Replace the mass. On error the particle is unchanged.
    pub fn set_mass(&mut self, mass: V::Scalar) -> Result<(), PhysicsError> {
        check_mass(mass)?;
        self.mass = mass;
        self.inv_mass = inverse(mass);
        Ok(())
    }

    /// Advance velocity and position by `dt`.
    ///
    /// `acceleration` is owned by the containing system and is left alone.
    pub fn integrate(&mut self, dt: V::Scalar, scheme: IntegrationScheme) {
        self.prev_vel = self.vel;
        self.prev_pos = self.pos;
        let accel = match scheme {
            IntegrationScheme::ExplicitEuler => self.acceleration,
            IntegrationScheme::SemiImplicit => self.prev_acceleration,
        };
        self.vel = self.vel + accel.scale(dt);
        self.pos = self.pos + self.vel.scale(dt);
    }

    /// Hold the particle at `pos` with zero velocity.
    pub fn pin_to(&mut self, pos: V) {
        self.pos = pos;
        self.vel = V::zero();
    }
}

fn inverse<F: Float>(mass: F) -> F {
    if mass.is_near_zero(F::from_f32(1e-10)) {
        F::zero()
    } else {
        F::one() / mass
    }
}

pub(crate) fn check_mass<F: Float>(mass: F) -> Result<(), PhysicsError> {
    if mass.is_finite() && mass > F::zero() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidMass)
    }
}
