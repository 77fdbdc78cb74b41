//! Core types for frame-indexed physics synchronization.
//!
//! This crate provides the foundational types shared by the keysync
//! workspace:
//!
//! - [`Pose`] - Position and orientation of a simulated body
//! - [`Keyframe`] / [`KeyframeTimeline`] - The authored animation timeline
//! - [`PhysicsKind`] / [`PhysicsProperties`] - Per-node physics classification
//! - [`FrameConfig`] - Frame rate, sub-step budget, gravity
//! - [`SyncError`] - Error type for engine operations
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no stepping logic and no
//! knowledge of the dynamics world. They're the common language between:
//!
//! - The scene collaborator (nodes, keyframes, authored properties)
//! - The dynamics world (bodies, poses)
//! - The synchronization engine that bridges the two
//!
//! # Coordinate System
//!
//! Right-handed, Y-up: gravity points along -Y by default. All coordinates
//! are `f64`.
//!
//! # Example
//!
//! ```
//! use keysync_types::{KeyframeTimeline, Pose};
//! use nalgebra::Point3;
//!
//! let mut timeline = KeyframeTimeline::new();
//! timeline.set_position(0, Point3::new(0.0, 5.0, 0.0));
//!
//! let key = timeline.key_for_frame(0);
//! assert_eq!(key.position.y, 5.0);
//! ```

#![doc(html_root_url = "https://docs.rs/keysync-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,       // Error docs added where non-obvious
)]

mod config;
mod error;
mod id;
mod keyframe;
mod physics;
mod pose;

pub use config::FrameConfig;
pub use error::SyncError;
pub use id::{NodeId, RigidBodyId, SoftBodyId};
pub use keyframe::{Keyframe, KeyframeTimeline};
pub use physics::{PhysicsKind, PhysicsProperties};
pub use pose::Pose;

// Re-export math types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_round_trip() {
        let mut timeline = KeyframeTimeline::new();
        timeline.set_position(3, Point3::new(1.0, 2.0, 3.0));
        timeline.set_scale(0, Vector3::new(2.0, 2.0, 2.0));

        let key = timeline.key_for_frame(3);
        assert_eq!(key.position.x, 1.0);
        // Scale holds the last key at or before the requested frame.
        assert_eq!(key.scale.x, 2.0);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FrameConfig::default().validate().is_ok());
    }
}
