//! Mass-spring particle system: force accumulation and the per-frame step.

use crate::config::{check_timestep, SystemConfig};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::particle::{check_mass, IntegrationScheme, Particle};
use crate::spring::SpringConstraint;
use crate::vec::Vec;
use alloc::vec::Vec as AllocVec;

/// Owns a set of particles and the springs between them.
///
/// Particle insertion order is identity: index `i` here is vertex `i` in
/// whatever mesh the caller renders.
#[derive(Clone, Debug)]
pub struct ParticleSystem<V: Vec> {
    particles: AllocVec<Particle<V>>,
    springs: AllocVec<SpringConstraint<V>>,
    config: SystemConfig<V>,
    /// Per-step force/mass accumulator, kept apart from `Particle::acceleration`.
    forces: AllocVec<V>,
}

impl<V: Vec> ParticleSystem<V> {
    /// Build a system from an existing topology.
    ///
    /// The config, every particle mass and every spring are validated here so
    /// that stepping never has to.
    pub fn new(
        particles: AllocVec<Particle<V>>,
        springs: AllocVec<SpringConstraint<V>>,
        config: SystemConfig<V>,
    ) -> Result<Self, PhysicsError> {
        config.validate()?;
        for p in &particles {
            check_mass(p.mass())?;
        }
        for s in &springs {
            s.validate(particles.len())?;
        }
        log::debug!(
            "particle system: {} particles, {} springs, {:?}",
            particles.len(),
            springs.len(),
            config.scheme
        );
        let forces = AllocVec::with_capacity(particles.len());
        Ok(ParticleSystem { particles, springs, config, forces })
    }

    /// An empty system, filled with `add_*` and `connect`.
    pub fn with_config(config: SystemConfig<V>) -> Result<Self, PhysicsError> {
        Self::new(AllocVec::new(), AllocVec::new(), config)
    }

    pub fn add_particle(&mut self, particle: Particle<V>) -> Result<usize, PhysicsError> {
        check_mass(particle.mass())?;
        let idx = self.particles.len();
        self.particles.push(particle);
        Ok(idx)
    }

    /// Add a particle with the configured default mass.
    pub fn add_particle_at(&mut self, pos: V, vel: V) -> usize {
        let idx = self.particles.len();
        self.particles.push(Particle::with_velocity(pos, vel, self.config.mass));
        idx
    }

    pub fn add_spring(&mut self, spring: SpringConstraint<V>) -> Result<usize, PhysicsError> {
        spring.validate(self.particles.len())?;
        let idx = self.springs.len();
        self.springs.push(spring);
        Ok(idx)
    }

    /// Connect `a` and `b` with the configured stiffness, damping and rest length.
    ///
    /// Without a configured rest length, the current distance is used.
    pub fn connect(&mut self, a: usize, b: usize) -> Result<usize, PhysicsError> {
        let count = self.particles.len();
        for index in [a, b] {
            if index >= count {
                return Err(PhysicsError::ParticleOutOfBounds { index, count });
            }
        }
        let spring = match self.config.rest_length {
            Some(rest) => SpringConstraint::new(a, b, rest, self.config.stiffness, self.config.damping),
            None => SpringConstraint::from_particles(
                a,
                b,
                &self.particles,
                self.config.stiffness,
                self.config.damping,
            ),
        };
        self.add_spring(spring)
    }

    /// Advance the system by `dt`.
    ///
    /// An invalid `dt` is logged and the step is skipped. Debug builds also
    /// panic. Use [`try_integrate`](Self::try_integrate) to get the error instead.
    pub fn integrate(&mut self, dt: V::Scalar) {
        if let Err(err) = self.try_integrate(dt) {
            log::error!("rejected step with dt = {}: {}", dt, err);
            #[cfg(debug_assertions)]
            panic!("rejected step: {}", err);
        }
    }

    pub fn try_integrate(&mut self, dt: V::Scalar) -> Result<(), PhysicsError> {
        self.integrate_observed(dt, &mut NoOpStepObserver)
    }

    /// One step, reporting each phase to `observer`.
    ///
    /// Nothing is mutated when `dt` is rejected.
    pub fn integrate_observed<O: StepObserver<V>>(
        &mut self,
        dt: V::Scalar,
        observer: &mut O,
    ) -> Result<(), PhysicsError> {
        check_timestep(dt)?;

        let gravity = self.config.gravity;
        let drag = self.config.drag;
        let wind = self.config.wind;
        let scheme = self.config.scheme;

        // Reset: last step's acceleration becomes history, gravity seeds the buffer.
        for p in self.particles.iter_mut() {
            p.prev_acceleration = p.acceleration;
        }
        self.forces.clear();
        self.forces.resize(self.particles.len(), gravity);

        // Drag and wind.
        for (accum, p) in self.forces.iter_mut().zip(self.particles.iter()) {
            let unary = p.vel.scale(-drag) + wind;
            *accum = *accum + unary.scale(p.inv_mass());
        }

        // Springs.
        for (index, spring) in self.springs.iter().enumerate() {
            let (on_a, on_b) = spring.forces(&self.particles);
            let inv_a = self.particles[spring.a].inv_mass();
            let inv_b = self.particles[spring.b].inv_mass();
            self.forces[spring.a] = self.forces[spring.a] + on_a.scale(inv_a);
            self.forces[spring.b] = self.forces[spring.b] + on_b.scale(inv_b);
            observer.on_spring_force(index, on_b);
        }
        observer.on_forces_accumulated();

        for (p, accum) in self.particles.iter_mut().zip(self.forces.iter()) {
            p.acceleration = *accum;
            p.integrate(dt, scheme);
        }
        observer.on_integrate();

        log::trace!("stepped {} particles by {}", self.particles.len(), dt);
        observer.on_step_complete();
        Ok(())
    }

    pub fn positions(&self) -> AllocVec<V> {
        self.particles.iter().map(|p| p.pos).collect()
    }

    pub fn particles(&self) -> &[Particle<V>] { &self.particles }
    pub fn springs(&self) -> &[SpringConstraint<V>] { &self.springs }
    pub fn particle_count(&self) -> usize { self.particles.len() }
    pub fn spring_count(&self) -> usize { self.springs.len() }
    pub fn particle(&self, index: usize) -> &Particle<V> { &self.particles[index] }
    pub fn particle_mut(&mut self, index: usize) -> &mut Particle<V> { &mut self.particles[index] }
    pub fn config(&self) -> &SystemConfig<V> { &self.config }

    pub fn gravity(&self) -> V { self.config.gravity }
    pub fn set_gravity(&mut self, gravity: V) { self.config.gravity = gravity; }

    pub fn wind(&self) -> V { self.config.wind }
    /// Force added to every particle from the next step on.
    pub fn set_wind(&mut self, wind: V) { self.config.wind = wind; }

    pub fn drag(&self) -> V::Scalar { self.config.drag }
    pub fn set_drag(&mut self, drag: V::Scalar) -> Result<(), PhysicsError> {
        if !(drag.is_finite() && drag >= V::Scalar::zero()) {
            return Err(PhysicsError::InvalidDrag);
        }
        self.config.drag = drag;
        Ok(())
    }

    pub fn scheme(&self) -> IntegrationScheme { self.config.scheme }
    pub fn set_scheme(&mut self, scheme: IntegrationScheme) { self.config.scheme = scheme; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec3;
    use alloc::vec;

    fn still_config() -> SystemConfig<Vec3<f64>> {
        SystemConfig::new().with_drag(0.0)
    }

    #[test]
    fn rejects_invalid_topology() {
        let particles = vec![Particle::new(Vec3::new(0.0, 0.0, 0.0), 1.0)];
        let springs = vec![SpringConstraint::new(0, 1, 1.0, 1.0, 0.0)];
        let err = ParticleSystem::new(particles, springs, still_config()).unwrap_err();
        assert_eq!(err, PhysicsError::ParticleOutOfBounds { index: 1, count: 1 });
    }

    #[test]
    fn rejects_zero_mass_particle() {
        let particle = Particle::new(Vec3::new(0.0, 0.0, 0.0), 0.0);
        let err = ParticleSystem::new(vec![particle], vec![], still_config()).unwrap_err();
        assert_eq!(err, PhysicsError::InvalidMass);
    }

    #[test]
    fn rejected_step_leaves_state_untouched() {
        let mut sys = ParticleSystem::with_config(SystemConfig::default()).unwrap();
        sys.add_particle_at(Vec3::new(1.0f64, 2.0, 3.0), Vec3::new(1.0, 0.0, 0.0));
        let before = sys.particle(0).clone();
        assert_eq!(sys.try_integrate(0.0), Err(PhysicsError::InvalidTimestep));
        assert_eq!(sys.try_integrate(f64::NAN), Err(PhysicsError::InvalidTimestep));
        let after = sys.particle(0);
        assert_eq!(after.pos, before.pos);
        assert_eq!(after.vel, before.vel);
        assert_eq!(after.prev_acceleration, before.prev_acceleration);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "rejected step")]
    fn integrate_panics_on_bad_timestep_in_debug() {
        let mut sys: ParticleSystem<Vec3<f32>> = ParticleSystem::with_config(SystemConfig::default()).unwrap();
        sys.integrate(-1.0);
    }

    #[test]
    fn connect_uses_configured_spring() {
        let config = still_config().with_stiffness(42.0).with_damping(1.5);
        let mut sys = ParticleSystem::with_config(config).unwrap();
        let a = sys.add_particle_at(Vec3::new(0.0, 0.0, 0.0), Vec3::zero());
        let b = sys.add_particle_at(Vec3::new(0.0, 3.0, 4.0), Vec3::zero());
        sys.connect(a, b).unwrap();
        let s = &sys.springs()[0];
        assert_eq!(s.stiffness, 42.0);
        assert_eq!(s.damping, 1.5);
        assert!((s.rest_length - 5.0).abs() < 1e-12);
        assert_eq!(sys.connect(a, a), Err(PhysicsError::SelfConstraint { index: 0 }));
        assert_eq!(sys.connect(a, 7), Err(PhysicsError::ParticleOutOfBounds { index: 7, count: 2 }));
    }

    #[test]
    fn drag_opposes_velocity() {
        let config = SystemConfig::<Vec3<f64>>::new().with_drag(2.0);
        let mut sys = ParticleSystem::with_config(config).unwrap();
        sys.add_particle(Particle::with_velocity(Vec3::zero(), Vec3::new(4.0, 0.0, 0.0), 2.0)).unwrap();
        sys.integrate(0.5);
        // a = -2 * 4 / 2 = -4
        assert_eq!(sys.particle(0).acceleration, Vec3::new(-4.0, 0.0, 0.0));
        assert_eq!(sys.particle(0).vel, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(sys.particle(0).pos, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn wind_is_a_force() {
        let config = SystemConfig::<Vec3<f64>>::new().with_drag(0.0);
        let mut sys = ParticleSystem::with_config(config).unwrap();
        sys.add_particle(Particle::new(Vec3::zero(), 4.0)).unwrap();
        sys.set_wind(Vec3::new(0.0, 0.0, 8.0));
        sys.integrate(1.0);
        assert_eq!(sys.particle(0).acceleration, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn mass_change_reaches_next_step() {
        let config = SystemConfig::<Vec3<f64>>::new().with_drag(0.0).with_wind(Vec3::new(10.0, 0.0, 0.0));
        let mut sys = ParticleSystem::with_config(config).unwrap();
        sys.add_particle_at(Vec3::zero(), Vec3::zero());
        sys.particle_mut(0).set_mass(1.0).unwrap();
        sys.integrate(1.0);
        assert_eq!(sys.particle(0).acceleration, Vec3::new(10.0, 0.0, 0.0));

        assert_eq!(sys.particle_mut(0).set_mass(0.0), Err(PhysicsError::InvalidMass));
        sys.integrate(1.0);
        assert_eq!(sys.particle(0).acceleration, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn prev_acceleration_holds_last_step() {
        let config = SystemConfig::<Vec3<f64>>::new().with_drag(0.0).with_gravity(Vec3::new(0.0, -2.0, 0.0));
        let mut sys = ParticleSystem::with_config(config).unwrap();
        sys.add_particle_at(Vec3::zero(), Vec3::zero());
        sys.integrate(1.0);
        assert_eq!(sys.particle(0).prev_acceleration, Vec3::zero());
        sys.set_gravity(Vec3::new(0.0, -4.0, 0.0));
        sys.integrate(1.0);
        assert_eq!(sys.particle(0).prev_acceleration, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(sys.particle(0).acceleration, Vec3::new(0.0, -4.0, 0.0));
    }

    #[test]
    fn set_drag_validates() {
        let mut sys: ParticleSystem<Vec3<f32>> = ParticleSystem::with_config(SystemConfig::default()).unwrap();
        assert_eq!(sys.set_drag(-1.0), Err(PhysicsError::InvalidDrag));
        assert_eq!(sys.drag(), 0.5);
        sys.set_drag(0.0).unwrap();
        assert_eq!(sys.drag(), 0.0);
    }
}
