//! Keyframe-synchronized physics engine.
//!
//! This crate is the adapter between an authored, keyframed scene and a
//! stepped dynamics simulation. It converts scene nodes into rigid or
//! deformable bodies, advances the simulation frame by frame, and writes
//! the results back where the rest of the application reads them: rigid
//! transforms become keyframes on the node's timeline, soft-body node
//! positions flow into a per-node render mesh cache.
//!
//! # Lifecycle
//!
//! 1. Author nodes ([`SceneNode`]) and classify them
//!    ([`SceneNode::assign_physics_kind`]).
//! 2. Build a [`SimulationWorld`] and call
//!    [`rebuild`](SimulationWorld::rebuild) whenever scene content or
//!    physics properties change.
//! 3. Drive playback with [`advance_to`](SimulationWorld::advance_to).
//!    Moving forward steps each intermediate frame once; moving backward
//!    rebuilds and replays from the start, so scrubbing the timeline in
//!    either direction lands on identical results.
//!
//! # Example
//!
//! ```
//! use keysync::{SceneNode, SimulationWorld};
//! use keysync_mesh::unit_cube;
//! use keysync_types::{FrameConfig, PhysicsKind};
//!
//! # fn main() -> keysync_types::Result<()> {
//! let mut node = SceneNode::new("crate", unit_cube());
//! node.assign_physics_kind(PhysicsKind::Heavy);
//! node.physics.enabled = true;
//! let mut nodes = vec![node];
//!
//! let mut world = SimulationWorld::new(FrameConfig::default())?;
//! world.rebuild(&mut nodes);
//! world.advance_to(&mut nodes, 10)?;
//!
//! assert!(nodes[0].timeline.has_key_at(10));
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/keysync/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn)]

mod cache;
mod factory;
mod node;
mod shape;
mod soft;
mod world;

pub use cache::update_render_cache;
pub use factory::{build_deformable, build_rigid};
pub use node::{SceneNode, UploadMode};
pub use shape::build_shape;
pub use soft::VertexCorrespondence;
pub use world::{ActiveBody, SimulationWorld};

pub use keysync_types::{FrameConfig, Result, SyncError};
