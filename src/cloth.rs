//! Cloth: a pinned grid of particles joined by structural, shear and bend springs.

use crate::config::{check_timestep, default_gravity, SystemConfig, DEFAULT_DRAG, DEFAULT_MASS};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::particle::{IntegrationScheme, Particle};
use crate::spring::{SpringConstraint, DEFAULT_DAMPING, DEFAULT_STIFFNESS};
use crate::system::ParticleSystem;
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Neighbour stencil for structural and shear springs: up-right, right,
/// down-right, down. Each undirected pair is visited once.
const STENCIL: [(isize, isize); 4] = [(1, -1), (1, 0), (1, 1), (0, 1)];

/// Configuration for a cloth.
#[derive(Clone, Debug, PartialEq)]
pub struct ClothConfig<F: Float> {
    pub width: F,
    pub height: F,
    /// Segments along x; the grid has `nx + 1` columns.
    pub nx: usize,
    /// Segments along y; the grid has `ny + 1` rows.
    pub ny: usize,
    pub particle_mass: F,
    pub stiffness: F,
    pub damping: F,
    pub gravity: Vec3<F>,
    pub drag: F,
    /// Fixed timestep handed to every `step`.
    pub timestep: F,
    /// Magnitude of the wind force set by [`Cloth::set_wind`].
    pub wind_strength: F,
}

impl<F: Float> Default for ClothConfig<F> {
    fn default() -> Self {
        ClothConfig {
            width: F::from_f32(250.0),
            height: F::from_f32(250.0),
            nx: 10,
            ny: 10,
            particle_mass: F::from_f32(DEFAULT_MASS),
            stiffness: F::from_f32(DEFAULT_STIFFNESS),
            damping: F::from_f32(DEFAULT_DAMPING),
            gravity: default_gravity(),
            drag: F::from_f32(DEFAULT_DRAG),
            timestep: F::from_f32(0.1),
            wind_strength: F::from_f32(50.0),
        }
    }
}

impl<F: Float> ClothConfig<F> {
    pub fn with_size(mut self, width: F, height: F) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_segments(mut self, nx: usize, ny: usize) -> Self {
        self.nx = nx;
        self.ny = ny;
        self
    }

    pub fn with_particle_mass(mut self, mass: F) -> Self {
        self.particle_mass = mass;
        self
    }

    pub fn with_springs(mut self, stiffness: F, damping: F) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
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

    pub fn with_wind_strength(mut self, wind_strength: F) -> Self {
        self.wind_strength = wind_strength;
        self
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.nx == 0 || self.ny == 0 || !(self.width > F::zero()) || !(self.height > F::zero()) {
            return Err(PhysicsError::InvalidGridDimensions);
        }
        check_timestep(self.timestep)?;
        self.system_config().validate()
    }

    fn system_config(&self) -> SystemConfig<Vec3<F>> {
        SystemConfig::new()
            .with_mass(self.particle_mass)
            .with_gravity(self.gravity)
            .with_drag(self.drag)
            .with_stiffness(self.stiffness)
            .with_damping(self.damping)
            .with_scheme(IntegrationScheme::ExplicitEuler)
    }

    /// Rest position of the grid point at `(u, v)` in `[0, 1]²`.
    ///
    /// The sheet spans `x` across its width and slopes back in `y`/`z` at 45°.
    pub fn surface_point(&self, u: F, v: F) -> Vec3<F> {
        let half = F::one() / F::two();
        let slope = self.height / F::two().sqrt();
        Vec3::new(
            (u - half) * self.width,
            self.height * half + v * slope,
            v * slope,
        )
    }
}

/// A cloth sheet backed by a [`ParticleSystem`].
///
/// Particle `(xi, yi)` has index `xi + yi * (nx + 1)`, matching the vertex
/// order of a row-major parametric mesh.
pub struct Cloth<F: Float> {
    config: ClothConfig<F>,
    system: ParticleSystem<Vec3<F>>,
    pins: AllocVec<usize>,
}

impl<F: Float> Cloth<F> {
    /// Build the grid and pin its `yi = 0` row.
    pub fn new(config: ClothConfig<F>) -> Result<Self, PhysicsError> {
        config.validate()?;
        let system = Self::build(&config)?;
        let pins = (0..=config.nx).collect();
        log::debug!(
            "cloth {}x{}: {} particles, {} springs",
            config.nx,
            config.ny,
            system.particle_count(),
            system.spring_count()
        );
        Ok(Cloth { config, system, pins })
    }

    fn build(config: &ClothConfig<F>) -> Result<ParticleSystem<Vec3<F>>, PhysicsError> {
        let (nx, ny) = (config.nx, config.ny);
        let cols = nx + 1;
        let idx = |xi: usize, yi: usize| xi + yi * cols;

        let mut particles = AllocVec::with_capacity(cols * (ny + 1));
        for yi in 0..=ny {
            for xi in 0..=nx {
                let u = F::from_f32(xi as f32) / F::from_f32(nx as f32);
                let v = F::from_f32(yi as f32) / F::from_f32(ny as f32);
                particles.push(Particle::new(config.surface_point(u, v), config.particle_mass));
            }
        }

        let mut springs = AllocVec::new();
        let mut link = |a: usize, b: usize| {
            springs.push(SpringConstraint::from_particles(
                a,
                b,
                &particles,
                config.stiffness,
                config.damping,
            ));
        };

        // Structural and shear.
        for yi in 0..=ny {
            for xi in 0..=nx {
                for (dx, dy) in STENCIL {
                    let xj = xi as isize + dx;
                    let yj = yi as isize + dy;
                    if xj > nx as isize || yj < 0 || yj > ny as isize {
                        continue;
                    }
                    link(idx(xi, yi), idx(xj as usize, yj as usize));
                }
            }
        }

        // Bend: skip-two along the border rows and columns.
        for xi in 0..nx.saturating_sub(1) {
            link(idx(xi, 0), idx(xi + 2, 0));
            link(idx(xi, ny), idx(xi + 2, ny));
        }
        for yi in 0..ny.saturating_sub(1) {
            link(idx(0, yi), idx(0, yi + 2));
            link(idx(nx, yi), idx(nx, yi + 2));
        }

        ParticleSystem::new(particles, springs, config.system_config())
    }

    /// Integrate one frame, then hold the pins where they were before it.
    pub fn step(&mut self) {
        self.system.integrate(self.config.timestep);
        self.apply_pins();
    }

    fn apply_pins(&mut self) {
        for &idx in &self.pins {
            let p = self.system.particle_mut(idx);
            let held = p.prev_pos;
            p.pin_to(held);
        }
    }

    /// Blow along `direction` with the configured strength. Zero stops the wind.
    pub fn set_wind(&mut self, direction: Vec3<F>) {
        let wind = direction.normalize().scale(self.config.wind_strength);
        self.system.set_wind(wind);
    }

    /// Rebuild the sheet from its initial topology. Pins and wind carry over.
    pub fn reset(&mut self) -> Result<(), PhysicsError> {
        let wind = self.system.wind();
        self.system = Self::build(&self.config)?;
        self.system.set_wind(wind);
        log::debug!("cloth reset");
        Ok(())
    }

    pub fn pin(&mut self, xi: usize, yi: usize) -> Result<(), PhysicsError> {
        let idx = self.checked_index(xi, yi)?;
        if !self.pins.contains(&idx) {
            self.pins.push(idx);
        }
        Ok(())
    }

    pub fn unpin(&mut self, xi: usize, yi: usize) -> Result<(), PhysicsError> {
        let idx = self.checked_index(xi, yi)?;
        self.pins.retain(|&p| p != idx);
        Ok(())
    }

    pub fn clear_pins(&mut self) {
        self.pins.clear();
    }

    fn checked_index(&self, xi: usize, yi: usize) -> Result<usize, PhysicsError> {
        let count = self.system.particle_count();
        if xi > self.config.nx || yi > self.config.ny {
            let index = yi.saturating_mul(self.config.nx + 1).saturating_add(xi);
            return Err(PhysicsError::ParticleOutOfBounds { index, count });
        }
        Ok(self.index(xi, yi))
    }

    pub fn index(&self, xi: usize, yi: usize) -> usize {
        xi + yi * (self.config.nx + 1)
    }

    pub fn position_at(&self, xi: usize, yi: usize) -> Vec3<F> {
        self.system.particle(self.index(xi, yi)).pos
    }

    pub fn positions(&self) -> AllocVec<Vec3<F>> { self.system.positions() }
    pub fn pins(&self) -> &[usize] { &self.pins }
    pub fn system(&self) -> &ParticleSystem<Vec3<F>> { &self.system }
    pub fn config(&self) -> &ClothConfig<F> { &self.config }
    pub fn particle_count(&self) -> usize { self.system.particle_count() }
    pub fn spring_count(&self) -> usize { self.system.spring_count() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ClothConfig<f64> {
        ClothConfig::default().with_size(4.0, 4.0).with_segments(4, 3)
    }

    #[test]
    fn particle_count() {
        let cloth = Cloth::new(small()).unwrap();
        assert_eq!(cloth.particle_count(), 5 * 4);
    }

    #[test]
    fn spring_count() {
        let cloth = Cloth::new(small()).unwrap();
        // right: 4*4 = 16, down: 5*3 = 15, both diagonals: 2*4*3 = 24
        // bend rows: 2*(4-1) = 6, bend columns: 2*(3-1) = 4
        assert_eq!(cloth.spring_count(), 16 + 15 + 24 + 6 + 4);
    }

    #[test]
    fn default_cloth_counts() {
        let cloth: Cloth<f32> = Cloth::new(ClothConfig::default()).unwrap();
        assert_eq!(cloth.particle_count(), 121);
        assert_eq!(cloth.spring_count(), 110 + 110 + 200 + 18 + 18);
    }

    #[test]
    fn single_segment_has_no_bend_springs() {
        let cloth = Cloth::new(small().with_segments(1, 1)).unwrap();
        // right 2, down 2, diagonals 2
        assert_eq!(cloth.spring_count(), 6);
    }

    #[test]
    fn two_by_two_spring_pairs() {
        let cloth = Cloth::new(small().with_segments(2, 2)).unwrap();
        let pairs: AllocVec<(usize, usize)> = cloth.system().springs().iter().map(|s| (s.a, s.b)).collect();
        // 0 1 2
        // 3 4 5
        // 6 7 8
        let expected = [
            // (1,-1), (1,0), (1,1), (0,1) from each particle in row-major order
            (0, 1), (0, 4), (0, 3),
            (1, 2), (1, 5), (1, 4),
            (2, 5),
            (3, 1), (3, 4), (3, 7), (3, 6),
            (4, 2), (4, 5), (4, 8), (4, 7),
            (5, 8),
            (6, 4), (6, 7),
            (7, 5), (7, 8),
            // bend along top and bottom rows, then left and right columns
            (0, 2), (6, 8),
            (0, 6), (2, 8),
        ];
        assert_eq!(pairs, expected);
    }

    #[test]
    fn springs_start_at_rest() {
        let cloth = Cloth::new(small()).unwrap();
        let particles = cloth.system().particles();
        for s in cloth.system().springs() {
            let (fa, fb) = s.forces(particles);
            assert!(fa.length() < 1e-9 && fb.length() < 1e-9);
        }
    }

    #[test]
    fn surface_corners() {
        let c = small();
        let p = c.surface_point(0.0, 0.0);
        assert_eq!(p, Vec3::new(-2.0, 2.0, 0.0));
        let q = c.surface_point(1.0, 1.0);
        assert!((q.x - 2.0).abs() < 1e-12);
        assert!((q.y - (2.0 + 4.0 / 2f64.sqrt())).abs() < 1e-12);
        assert!((q.z - 4.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn index_layout() {
        let cloth = Cloth::new(small()).unwrap();
        assert_eq!(cloth.index(0, 0), 0);
        assert_eq!(cloth.index(4, 0), 4);
        assert_eq!(cloth.index(0, 1), 5);
        assert_eq!(cloth.pins(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn rejects_empty_grid() {
        let err = Cloth::new(small().with_segments(0, 3)).err();
        assert_eq!(err, Some(PhysicsError::InvalidGridDimensions));
        let err = Cloth::new(small().with_timestep(0.0)).err();
        assert_eq!(err, Some(PhysicsError::InvalidTimestep));
    }

    #[test]
    fn pin_bounds_checked() {
        let mut cloth = Cloth::new(small()).unwrap();
        assert!(cloth.pin(5, 0).is_err());
        assert_eq!(
            cloth.pin(0, usize::MAX),
            Err(PhysicsError::ParticleOutOfBounds { index: usize::MAX, count: 20 })
        );
        assert!(cloth.unpin(usize::MAX, usize::MAX).is_err());
        cloth.pin(2, 2).unwrap();
        cloth.pin(2, 2).unwrap();
        assert_eq!(cloth.pins().len(), 6);
        cloth.unpin(2, 2).unwrap();
        assert_eq!(cloth.pins().len(), 5);
    }
}
