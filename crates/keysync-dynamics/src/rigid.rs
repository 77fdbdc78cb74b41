//! Rigid bodies.

use crate::CollisionShape;
use keysync_types::Pose;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rigid body in the dynamics world.
///
/// A non-positive mass marks the body static: it never integrates and its
/// pose is fixed for the lifetime of the world. Material coefficients are
/// the engine-wide defaults used for every authored object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigidBody {
    /// Collision geometry in local space.
    pub shape: CollisionShape,
    /// World-space pose.
    pub pose: Pose,
    /// Linear velocity.
    pub linear_velocity: Vector3<f64>,
    /// Angular velocity (world-space axis, rad/s).
    pub angular_velocity: Vector3<f64>,
    /// Mass in kilograms. Zero or negative means static.
    pub mass: f64,
    /// Principal moments of inertia, derived from the shape at build time.
    pub inertia: Vector3<f64>,
    /// Bounciness on contact.
    pub restitution: f64,
    /// Sliding friction coefficient.
    pub friction: f64,
    /// Rolling friction coefficient.
    pub rolling_friction: f64,
}

impl RigidBody {
    /// Create a body at rest with inertia derived from the shape.
    #[must_use]
    pub fn new(shape: CollisionShape, mass: f64, pose: Pose) -> Self {
        let inertia = shape.local_inertia(mass);
        Self {
            shape,
            pose,
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            mass,
            inertia,
            restitution: 0.6,
            friction: 0.5,
            rolling_friction: 0.5,
        }
    }

    /// Set the initial linear velocity.
    #[must_use]
    pub fn with_linear_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Whether the body is fixed in place.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    /// Inverse mass; zero for static bodies.
    #[must_use]
    pub fn inv_mass(&self) -> f64 {
        if self.is_static() {
            0.0
        } else {
            1.0 / self.mass
        }
    }
}
