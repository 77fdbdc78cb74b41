//! Physics classification and per-node authored properties.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physics classification of a scene node.
///
/// The classification determines the simulated mass through a fixed density
/// per class (`weight = bounding-box volume × density`) and whether the node
/// is simulated as a rigid or a deformable body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PhysicsKind {
    /// Immovable obstacle. Exact triangle-mesh collision shape, zero mass.
    #[default]
    Static,
    /// Movable rigid body, density 3.0.
    Light,
    /// Movable rigid body, density 3.0.
    Medium,
    /// Movable rigid body, density 27.0.
    Heavy,
    /// Deformable shell.
    Cloth,
    /// Deformable, pressure-like behavior.
    Balloon,
    /// Deformable, volume-preserving behavior.
    Jelly,
}

impl PhysicsKind {
    /// Density used for weight derivation.
    ///
    /// Soft classes carry zero density: their mass is governed by the
    /// deformable solver, not by the derived weight.
    #[must_use]
    pub const fn density(self) -> f64 {
        match self {
            Self::Static | Self::Cloth | Self::Balloon | Self::Jelly => 0.0,
            Self::Light | Self::Medium => 3.0,
            Self::Heavy => 27.0,
        }
    }

    /// Whether this classification is simulated as a deformable body.
    #[must_use]
    pub const fn is_soft(self) -> bool {
        matches!(self, Self::Cloth | Self::Balloon | Self::Jelly)
    }
}

/// Authored physics properties of a scene node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhysicsProperties {
    /// Whether this node participates in simulation at all.
    pub enabled: bool,
    /// Physics classification.
    pub kind: PhysicsKind,
    /// Whether the node is simulated as a deformable body.
    ///
    /// Forced to `true` for soft classifications regardless of weight.
    pub is_soft: bool,
    /// Derived weight (`bounding-box volume × density`).
    pub weight: f64,
    /// Authored initial force direction (unit-less).
    pub force_direction: Vector3<f64>,
    /// Authored initial force magnitude; zero means no initial velocity.
    pub force_magnitude: f64,
}

impl Default for PhysicsProperties {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: PhysicsKind::Static,
            is_soft: false,
            weight: 0.0,
            force_direction: Vector3::zeros(),
            force_magnitude: 0.0,
        }
    }
}

impl PhysicsProperties {
    /// Initial linear velocity seeded onto a rigid body, if any.
    #[must_use]
    pub fn initial_velocity(&self) -> Option<Vector3<f64>> {
        if self.force_magnitude > 0.0 {
            Some(self.force_direction * self.force_magnitude)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_densities() {
        assert_eq!(PhysicsKind::Static.density(), 0.0);
        assert_eq!(PhysicsKind::Light.density(), 3.0);
        assert_eq!(PhysicsKind::Medium.density(), 3.0);
        assert_eq!(PhysicsKind::Heavy.density(), 27.0);
        assert_eq!(PhysicsKind::Cloth.density(), 0.0);
    }

    #[test]
    fn test_soft_classes() {
        assert!(PhysicsKind::Cloth.is_soft());
        assert!(PhysicsKind::Balloon.is_soft());
        assert!(PhysicsKind::Jelly.is_soft());
        assert!(!PhysicsKind::Heavy.is_soft());
        assert!(!PhysicsKind::Static.is_soft());
    }

    #[test]
    fn test_initial_velocity() {
        let mut props = PhysicsProperties {
            enabled: true,
            force_direction: Vector3::new(0.0, 1.0, 0.0),
            force_magnitude: 4.0,
            ..PhysicsProperties::default()
        };
        assert_eq!(props.initial_velocity(), Some(Vector3::new(0.0, 4.0, 0.0)));

        props.force_magnitude = 0.0;
        assert_eq!(props.initial_velocity(), None);
    }
}
