//! Configuration for particle systems.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::particle::IntegrationScheme;
use crate::spring::{DEFAULT_DAMPING, DEFAULT_STIFFNESS};
use crate::vec::{Vec, Vec3};

/// Default particle mass.
pub const DEFAULT_MASS: f32 = 10.0;
/// Default viscous drag coefficient.
pub const DEFAULT_DRAG: f32 = 0.5;
/// Default downward gravity, in scene units per second squared.
pub const DEFAULT_GRAVITY_Y: f32 = -6.674;

/// Every tunable of a [`ParticleSystem`](crate::ParticleSystem).
///
/// `mass`, `stiffness`, `damping` and `rest_length` are the defaults handed
/// out by [`ParticleSystem::add_particle_at`](crate::ParticleSystem::add_particle_at)
/// and [`ParticleSystem::connect`](crate::ParticleSystem::connect); `gravity`,
/// `drag`, `wind` and `scheme` are system-wide.
///
/// # Builder Pattern
/// ```
/// use tether::config::SystemConfig;
/// use tether::vec::Vec3;
/// use tether::IntegrationScheme;
///
/// let config: SystemConfig<Vec3<f32>> = SystemConfig::default()
///     .with_gravity(Vec3::new(0.0, -9.81, 0.0))
///     .with_drag(0.1)
///     .with_scheme(IntegrationScheme::SemiImplicit);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SystemConfig<V: Vec> {
    /// Mass for particles added through the system. Default: 10.
    pub mass: V::Scalar,
    /// Constant acceleration applied to every particle.
    /// Default: zero from [`SystemConfig::new`], `(0, -6.674, 0)` from `Default` on `Vec3`.
    pub gravity: V,
    /// Viscous drag coefficient, shared by all particles. Default: 0.5.
    pub drag: V::Scalar,
    /// Caller-controlled force added to every particle. Default: zero.
    pub wind: V,
    /// Spring constant for springs made by `connect`. Default: 100.
    pub stiffness: V::Scalar,
    /// Spring damping for springs made by `connect`. Default: 10.
    pub damping: V::Scalar,
    /// Fixed rest length for springs made by `connect`; `None` derives it
    /// from the current endpoint distance. Default: `None`.
    pub rest_length: Option<V::Scalar>,
    /// Default: [`IntegrationScheme::ExplicitEuler`].
    pub scheme: IntegrationScheme,
}

impl<V: Vec> SystemConfig<V> {
    /// Create a config with default values and no gravity.
    pub fn new() -> Self {
        SystemConfig {
            mass: V::Scalar::from_f32(DEFAULT_MASS),
            gravity: V::zero(),
            drag: V::Scalar::from_f32(DEFAULT_DRAG),
            wind: V::zero(),
            stiffness: V::Scalar::from_f32(DEFAULT_STIFFNESS),
            damping: V::Scalar::from_f32(DEFAULT_DAMPING),
            rest_length: None,
            scheme: IntegrationScheme::ExplicitEuler,
        }
    }

    pub fn with_mass(mut self, mass: V::Scalar) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_gravity(mut self, gravity: V) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, drag: V::Scalar) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_wind(mut self, wind: V) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_stiffness(mut self, stiffness: V::Scalar) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: V::Scalar) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_rest_length(mut self, rest_length: V::Scalar) -> Self {
        self.rest_length = Some(rest_length);
        self
    }

    pub fn with_scheme(mut self, scheme: IntegrationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Check every tunable once, before a system is built from it.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let zero = V::Scalar::zero();
        if !(self.mass.is_finite() && self.mass > zero) {
            return Err(PhysicsError::InvalidMass);
        }
        if !(self.drag.is_finite() && self.drag >= zero) {
            return Err(PhysicsError::InvalidDrag);
        }
        if !(self.stiffness.is_finite() && self.stiffness > zero) {
            return Err(PhysicsError::InvalidStiffness);
        }
        if !(self.damping.is_finite() && self.damping >= zero) {
            return Err(PhysicsError::InvalidDamping);
        }
        if let Some(rest) = self.rest_length {
            if !(rest.is_finite() && rest >= zero) {
                return Err(PhysicsError::InvalidRestLength);
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for SystemConfig<Vec3<F>> {
    fn default() -> Self {
        Self::new().with_gravity(default_gravity())
    }
}

/// `(0, -6.674, 0)`.
pub fn default_gravity<F: Float>() -> Vec3<F> {
    Vec3::new(F::zero(), F::from_f32(DEFAULT_GRAVITY_Y), F::zero())
}

/// Timestep check shared by the system and the topology builders.
pub(crate) fn check_timestep<F: Float>(dt: F) -> Result<(), PhysicsError> {
    if dt.is_finite() && dt > F::zero() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidTimestep)
    }
}
