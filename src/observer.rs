//! Step observer trait for monitoring particle system steps.

use core::fmt::Debug;

/// Trait for observing the phases of a [`ParticleSystem`](crate::ParticleSystem) step.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver<V> {
    /// Called once per spring with the force it applied to its `b` endpoint.
    /// The force on `a` is the negation.
    fn on_spring_force(&mut self, _index: usize, _force_on_b: V) {}

    /// Called after gravity, drag, wind and springs have been accumulated.
    fn on_forces_accumulated(&mut self) {}

    /// Called after all particles have been advanced.
    fn on_integrate(&mut self) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl<V> StepObserver<V> for NoOpStepObserver {}

/// Forwards every hook to `log::trace!` under the `tether::step` target.
#[derive(Default)]
pub struct LogStepObserver {
    step: u64,
}

impl LogStepObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed steps seen so far.
    pub fn steps(&self) -> u64 {
        self.step
    }
}

impl<V: Debug> StepObserver<V> for LogStepObserver {
    fn on_spring_force(&mut self, index: usize, force_on_b: V) {
        log::trace!(target: "tether::step", "step {} spring {}: {:?}", self.step, index, force_on_b);
    }

    fn on_forces_accumulated(&mut self) {
        log::trace!(target: "tether::step", "step {}: forces accumulated", self.step);
    }

    fn on_integrate(&mut self) {
        log::trace!(target: "tether::step", "step {}: particles advanced", self.step);
    }

    fn on_step_complete(&mut self) {
        log::trace!(target: "tether::step", "step {} complete", self.step);
        self.step += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::system::ParticleSystem;
    use crate::vec::{Vec, Vec3};

    #[test]
    fn log_observer_counts_steps() {
        let mut sys = ParticleSystem::with_config(SystemConfig::<Vec3<f32>>::default()).unwrap();
        let a = sys.add_particle_at(Vec3::zero(), Vec3::zero());
        let b = sys.add_particle_at(Vec3::new(1.0, 0.0, 0.0), Vec3::zero());
        sys.connect(a, b).unwrap();

        let mut observer = LogStepObserver::new();
        for _ in 0..3 {
            sys.integrate_observed(0.1, &mut observer).unwrap();
        }
        assert_eq!(observer.steps(), 3);
    }

    #[test]
    fn rejected_step_is_not_observed() {
        let mut sys = ParticleSystem::with_config(SystemConfig::<Vec3<f32>>::default()).unwrap();
        let mut observer = LogStepObserver::new();
        assert!(sys.integrate_observed(-1.0, &mut observer).is_err());
        assert_eq!(observer.steps(), 0);
    }
}
