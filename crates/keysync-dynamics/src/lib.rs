//! Dynamics world for the keysync engine.
//!
//! Hosts rigid bodies and position-based deformable bodies in one world and
//! steps them on a fixed-substep clock: each [`DynamicsWorld::step_frame`]
//! call consumes one frame interval, performing at most a configured number
//! of fixed-size substeps and carrying the remainder to the next call.
//!
//! The engine layer treats this crate as opaque: it adds bodies, steps, and
//! reads back rigid poses and soft-node positions. Contact handling and
//! constraint relaxation are intentionally minimal; dynamic bodies only
//! collide with static triangle-mesh bodies.
//!
//! # Determinism
//!
//! Stepping uses fixed iteration counts, no randomness, and no wall-clock
//! time. Two worlds built from the same bodies and stepped with the same
//! sequence of calls produce bitwise-identical state.
//!
//! # Example
//!
//! ```
//! use keysync_dynamics::{CollisionShape, DynamicsWorld, RigidBody};
//! use keysync_types::{Pose, Point3, Vector3};
//!
//! let mut world = DynamicsWorld::new(Vector3::new(0.0, -9.8, 0.0));
//! let shape = CollisionShape::convex_hull(vec![
//!     Point3::new(-0.5, -0.5, -0.5),
//!     Point3::new(0.5, 0.5, 0.5),
//! ]);
//! let body = RigidBody::new(shape, 3.0, Pose::from_position(Point3::new(0.0, 5.0, 0.0)));
//! let id = world.add_rigid_body(body);
//!
//! world.step_frame(1.0 / 24.0, 10, 1.0 / 60.0);
//! let pose = world.rigid_body(id).map(|b| b.pose);
//! assert!(pose.is_some());
//! ```

#![doc(html_root_url = "https://docs.rs/keysync-dynamics/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn)]

mod contact;
mod rigid;
mod shape;
mod soft;
mod world;

pub use rigid::RigidBody;
pub use shape::{simplify_hull, CollisionShape};
pub use soft::{SoftBody, SoftBodyConfig, SoftNode};
pub use world::DynamicsWorld;
