//! Firework bursts: free particles flung from a shared origin.

use crate::config::{check_timestep, default_gravity, SystemConfig, DEFAULT_DRAG, DEFAULT_MASS};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::particle::{IntegrationScheme, Particle};
use crate::system::ParticleSystem;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;
use rand::Rng;

/// Configuration for a single burst.
#[derive(Clone, Debug, PartialEq)]
pub struct FireworkConfig<F: Float> {
    pub count: usize,
    pub min_speed: F,
    pub max_speed: F,
    /// Added to every particle's initial `y` velocity.
    pub upward_bias: F,
    pub particle_mass: F,
    pub gravity: Vec3<F>,
    pub drag: F,
    pub timestep: F,
    /// Frames the burst stays alive.
    pub lifetime: u32,
}

impl<F: Float> Default for FireworkConfig<F> {
    fn default() -> Self {
        FireworkConfig {
            count: 100,
            min_speed: F::from_f32(10.0),
            max_speed: F::from_f32(20.0),
            upward_bias: F::from_f32(10.0),
            particle_mass: F::from_f32(DEFAULT_MASS),
            gravity: default_gravity(),
            drag: F::from_f32(DEFAULT_DRAG),
            timestep: F::from_f32(0.1),
            lifetime: 100,
        }
    }
}

impl<F: Float> FireworkConfig<F> {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_speed_range(mut self, min_speed: F, max_speed: F) -> Self {
        self.min_speed = min_speed;
        self.max_speed = max_speed;
        self
    }

    pub fn with_upward_bias(mut self, upward_bias: F) -> Self {
        self.upward_bias = upward_bias;
        self
    }

    pub fn with_particle_mass(mut self, mass: F) -> Self {
        self.particle_mass = mass;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, drag: F) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_timestep(mut self, timestep: F) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_lifetime(mut self, lifetime: u32) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.count == 0 {
            return Err(PhysicsError::EmptyBurst);
        }
        let speeds_ok = self.min_speed.is_finite()
            && self.max_speed.is_finite()
            && self.min_speed >= F::zero()
            && self.min_speed <= self.max_speed;
        if !speeds_ok {
            return Err(PhysicsError::InvalidSpeedRange);
        }
        check_timestep(self.timestep)?;
        self.system_config().validate()
    }

    fn system_config(&self) -> SystemConfig<Vec3<F>> {
        SystemConfig::new()
            .with_mass(self.particle_mass)
            .with_gravity(self.gravity)
            .with_drag(self.drag)
            .with_scheme(IntegrationScheme::ExplicitEuler)
    }

    /// Random launch velocity: uniform direction, uniform speed, then the
    /// upward bias.
    pub fn sample_velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3<F> {
        let mut unit = || F::from_f64(rng.gen::<f64>());
        let speed = self.min_speed + (self.max_speed - self.min_speed) * unit();
        // cos(theta) uniform in [-1, 1] keeps the direction uniform on the sphere.
        let cos_theta = F::two() * unit() - F::one();
        let sin_theta = (F::one() - cos_theta * cos_theta).sqrt();
        let phi = F::two() * F::pi() * unit();
        Vec3::new(
            speed * sin_theta * phi.cos(),
            speed * sin_theta * phi.sin() + self.upward_bias,
            speed * cos_theta,
        )
    }
}

/// One burst of independent particles with a frame budget.
pub struct Firework<F: Float> {
    system: ParticleSystem<Vec3<F>>,
    timestep: F,
    remaining: u32,
}

impl<F: Float> Firework<F> {
    /// Spawn `config.count` particles at `origin` with random velocities.
    pub fn new<R: Rng + ?Sized>(
        origin: Vec3<F>,
        config: &FireworkConfig<F>,
        rng: &mut R,
    ) -> Result<Self, PhysicsError> {
        config.validate()?;
        let particles = (0..config.count)
            .map(|_| Particle::with_velocity(origin, config.sample_velocity(rng), config.particle_mass))
            .collect();
        let system = ParticleSystem::new(particles, AllocVec::new(), config.system_config())?;
        log::debug!("firework: {} particles, {} frames", config.count, config.lifetime);
        Ok(Firework { system, timestep: config.timestep, remaining: config.lifetime })
    }

    /// Step once if still alive. Returns whether the burst is alive afterwards.
    pub fn animate(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.system.integrate(self.timestep);
        self.remaining -= 1;
        if self.remaining == 0 {
            log::debug!("firework expired");
        }
        self.remaining > 0
    }

    pub fn is_alive(&self) -> bool { self.remaining > 0 }
    pub fn remaining_frames(&self) -> u32 { self.remaining }
    pub fn positions(&self) -> AllocVec<Vec3<F>> { self.system.positions() }
    pub fn system(&self) -> &ParticleSystem<Vec3<F>> { &self.system }
}

/// Every live burst in a scene.
pub struct FireworkShow<F: Float> {
    config: FireworkConfig<F>,
    bursts: AllocVec<Firework<F>>,
}

impl<F: Float> FireworkShow<F> {
    pub fn new(config: FireworkConfig<F>) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(FireworkShow { config, bursts: AllocVec::new() })
    }

    /// Explode a new burst at `origin`.
    pub fn launch<R: Rng + ?Sized>(&mut self, origin: Vec3<F>, rng: &mut R) -> Result<(), PhysicsError> {
        let burst = Firework::new(origin, &self.config, rng)?;
        self.bursts.push(burst);
        Ok(())
    }

    /// Step every burst and drop the ones that burned out.
    pub fn animate(&mut self) {
        self.bursts.retain_mut(|b| b.animate());
    }

    pub fn len(&self) -> usize { self.bursts.len() }
    pub fn is_empty(&self) -> bool { self.bursts.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &Firework<F>> { self.bursts.iter() }
    pub fn config(&self) -> &FireworkConfig<F> { &self.config }
}
