//! Error types for physics operations.

use core::fmt;

/// Errors raised when building or stepping a simulation from invalid input.
///
/// All of these are caller programming errors. They are reported once, at
/// construction (or before a rejected step mutates anything), never mid-step.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be positive and finite.
    InvalidMass,
    /// Spring stiffness must be positive and finite.
    InvalidStiffness,
    /// Spring damping must be non-negative and finite.
    InvalidDamping,
    /// Drag coefficient must be non-negative and finite.
    InvalidDrag,
    /// Rest length must be non-negative and finite.
    InvalidRestLength,
    /// Timestep must be positive and finite.
    InvalidTimestep,
    /// A spring connects a particle to itself.
    SelfConstraint { index: usize },
    /// Particle index is out of bounds.
    ParticleOutOfBounds { index: usize, count: usize },
    /// Cloth needs at least one segment along each axis and a positive size.
    InvalidGridDimensions,
    /// Burst speeds must satisfy `0 <= min <= max`.
    InvalidSpeedRange,
    /// A burst must contain at least one particle.
    EmptyBurst,
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass => write!(f, "mass must be positive and finite"),
            PhysicsError::InvalidStiffness => write!(f, "stiffness must be positive and finite"),
            PhysicsError::InvalidDamping => write!(f, "damping must be non-negative and finite"),
            PhysicsError::InvalidDrag => write!(f, "drag must be non-negative and finite"),
            PhysicsError::InvalidRestLength => write!(f, "rest length must be non-negative and finite"),
            PhysicsError::InvalidTimestep => write!(f, "timestep must be positive and finite"),
            PhysicsError::SelfConstraint { index } => {
                write!(f, "spring connects particle {} to itself", index)
            }
            PhysicsError::ParticleOutOfBounds { index, count } => {
                write!(f, "particle index {} out of bounds (count: {})", index, count)
            }
            PhysicsError::InvalidGridDimensions => {
                write!(f, "cloth needs at least 1x1 segments and a positive size")
            }
            PhysicsError::InvalidSpeedRange => write!(f, "burst speeds must satisfy 0 <= min <= max"),
            PhysicsError::EmptyBurst => write!(f, "burst needs at least one particle"),
        }
    }
}
