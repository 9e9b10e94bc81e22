//! Mass-spring particle simulation for real-time effects.
//!
//! `tether` advances point masses under gravity, viscous drag, an optional
//! wind force and pairwise spring-dampers, once per frame with a fixed
//! timestep. On top of that engine it builds the two topologies it was made
//! for: a pinned cloth grid and firework bursts.
//!
//! # Features
//!
//! - **Explicit spring-damper model**: Local O(1) per spring, no matrix solve
//! - **Two integration schemes**: Explicit Euler or previous-step acceleration
//! - **Cloth**: Grid with structural, shear and bend springs, pins, wind, reset
//! - **Fireworks**: Random bursts with a frame budget, managed by `FireworkShow`
//! - **Observable**: Monitor physics steps via the `StepObserver` trait
//! - **`no_std`**: Needs only `alloc`; randomness comes from a caller-supplied `rand::Rng`
//!
//! # Example
//!
//! ```
//! use tether::{Cloth, ClothConfig};
//!
//! let mut cloth: Cloth<f32> = Cloth::new(ClothConfig::default()).unwrap();
//! for _ in 0..10 {
//!     cloth.step();
//! }
//! assert_eq!(cloth.positions().len(), 121);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod spring;
pub mod system;
pub mod cloth;
pub mod firework;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec3};
pub use particle::{IntegrationScheme, Particle};
pub use spring::SpringConstraint;
pub use system::ParticleSystem;
pub use cloth::{Cloth, ClothConfig};
pub use firework::{Firework, FireworkConfig, FireworkShow};
pub use config::SystemConfig;
pub use observer::{LogStepObserver, NoOpStepObserver, StepObserver};
pub use error::PhysicsError;
