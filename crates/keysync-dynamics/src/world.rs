//! The dynamics world and its fixed-substep clock.

use crate::contact::closest_point_on_triangle;
use crate::{CollisionShape, RigidBody, SoftBody};
use hashbrown::HashMap;
use keysync_types::{RigidBodyId, SoftBodyId};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use tracing::debug;

/// A world hosting rigid and deformable bodies.
///
/// Stepping is frame-driven: [`step_frame`](Self::step_frame) consumes one
/// frame interval on an internal accumulator and performs whole fixed-size
/// substeps, carrying the remainder. With a 1/24 s frame and 1/60 s substep
/// this alternates between two and three substeps per frame, always the
/// same sequence for the same sequence of calls.
///
/// Dynamic bodies and soft nodes collide with static triangle-mesh bodies
/// only. Dynamic-dynamic contact is not modelled. Movable rigid bodies use
/// their bounding sphere as the contact proxy, so a box rests on a surface
/// at its circumscribed-sphere radius (plus the surface margin), not on its
/// face.
#[derive(Debug, Clone, Default)]
pub struct DynamicsWorld {
    rigid_bodies: HashMap<RigidBodyId, RigidBody>,
    soft_bodies: HashMap<SoftBodyId, SoftBody>,
    next_rigid_id: u64,
    next_soft_id: u64,
    gravity: Vector3<f64>,
    accumulator: f64,
}

/// A static triangle in world space, gathered once per substep.
struct StaticTriangle {
    corners: [Point3<f64>; 3],
    margin: f64,
}

impl DynamicsWorld {
    /// Create an empty world with the given gravity.
    #[must_use]
    pub fn new(gravity: Vector3<f64>) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// World gravity.
    #[must_use]
    pub fn gravity(&self) -> Vector3<f64> {
        self.gravity
    }

    /// Add a rigid body, returning its id.
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyId {
        let id = RigidBodyId::new(self.next_rigid_id);
        self.next_rigid_id += 1;
        self.rigid_bodies.insert(id, body);
        id
    }

    /// Add a soft body, returning its id.
    pub fn add_soft_body(&mut self, body: SoftBody) -> SoftBodyId {
        let id = SoftBodyId::new(self.next_soft_id);
        self.next_soft_id += 1;
        self.soft_bodies.insert(id, body);
        id
    }

    /// Look up a rigid body.
    #[must_use]
    pub fn rigid_body(&self, id: RigidBodyId) -> Option<&RigidBody> {
        self.rigid_bodies.get(&id)
    }

    /// Look up a soft body.
    #[must_use]
    pub fn soft_body(&self, id: SoftBodyId) -> Option<&SoftBody> {
        self.soft_bodies.get(&id)
    }

    /// Remove a rigid body.
    pub fn remove_rigid_body(&mut self, id: RigidBodyId) -> Option<RigidBody> {
        self.rigid_bodies.remove(&id)
    }

    /// Remove a soft body.
    pub fn remove_soft_body(&mut self, id: SoftBodyId) -> Option<SoftBody> {
        self.soft_bodies.remove(&id)
    }

    /// Remove every body and reset the substep accumulator.
    pub fn clear(&mut self) {
        self.rigid_bodies.clear();
        self.soft_bodies.clear();
        self.accumulator = 0.0;
    }

    /// Number of bodies of both kinds.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.rigid_bodies.len() + self.soft_bodies.len()
    }

    /// Advance the world by one frame interval.
    ///
    /// Adds `frame_dt` to the accumulator, then performs up to
    /// `max_substeps` substeps of `substep_dt` each, consuming whole
    /// substeps from the accumulator. Returns the number of substeps
    /// actually executed.
    pub fn step_frame(&mut self, frame_dt: f64, max_substeps: usize, substep_dt: f64) -> usize {
        if frame_dt <= 0.0 || substep_dt <= 0.0 || max_substeps == 0 {
            return 0;
        }
        self.accumulator += frame_dt;
        // The epsilon absorbs rounding in the division so a frame worth
        // exactly n substeps never yields n - 1.
        let available = ((self.accumulator / substep_dt) + 1e-9) as usize;
        if available == 0 {
            return 0;
        }
        self.accumulator = (self.accumulator - available as f64 * substep_dt).max(0.0);
        let executed = available.min(max_substeps);

        for _ in 0..executed {
            self.substep(substep_dt);
        }
        debug!(
            substeps = executed,
            remainder = self.accumulator,
            "stepped frame"
        );
        executed
    }

    fn substep(&mut self, dt: f64) {
        let statics = self.collect_static_triangles();

        for body in self.rigid_bodies.values_mut() {
            if body.is_static() {
                continue;
            }
            body.linear_velocity += self.gravity * dt;
            body.pose.position += body.linear_velocity * dt;
            let spin = body.angular_velocity * dt;
            if spin.norm_squared() > 0.0 {
                body.pose.rotation = UnitQuaternion::from_scaled_axis(spin) * body.pose.rotation;
            }
            resolve_rigid_contacts(body, &statics);
        }

        for body in self.soft_bodies.values_mut() {
            body.predict(dt, &self.gravity);
            body.relax_constraints();
            resolve_soft_contacts(body, &statics);
            body.finalize_velocities(dt);
        }
    }

    fn collect_static_triangles(&self) -> Vec<StaticTriangle> {
        let mut out = Vec::new();
        for body in self.rigid_bodies.values() {
            if !body.is_static() {
                continue;
            }
            if let CollisionShape::TriangleMesh { triangles, margin } = &body.shape {
                for tri in triangles {
                    out.push(StaticTriangle {
                        corners: [
                            body.pose.transform_point(&tri[0]),
                            body.pose.transform_point(&tri[1]),
                            body.pose.transform_point(&tri[2]),
                        ],
                        margin: *margin,
                    });
                }
            }
        }
        out
    }
}

/// Push a dynamic body out of static geometry using its bounding sphere as
/// the contact proxy and reflect the normal velocity.
fn resolve_rigid_contacts(body: &mut RigidBody, statics: &[StaticTriangle]) {
    let radius = body.shape.bounding_radius();
    for tri in statics {
        let q = closest_point_on_triangle(
            &body.pose.position,
            &tri.corners[0],
            &tri.corners[1],
            &tri.corners[2],
        );
        let delta = body.pose.position - q;
        let dist = delta.norm();
        let reach = radius + tri.margin;
        if dist >= reach || dist <= f64::EPSILON {
            continue;
        }
        let normal = delta / dist;
        body.pose.position += normal * (reach - dist);

        let vn = body.linear_velocity.dot(&normal);
        if vn < 0.0 {
            let tangential = body.linear_velocity - normal * vn;
            body.linear_velocity =
                tangential * (1.0 - body.friction).max(0.0) - normal * (vn * body.restitution);
            body.angular_velocity *= (1.0 - body.rolling_friction).max(0.0);
        }
    }
}

/// Project soft nodes out of static geometry, scaled by the body's rigid
/// contact hardness, with tangential slip reduced by dynamic friction.
fn resolve_soft_contacts(body: &mut SoftBody, statics: &[StaticTriangle]) {
    let hardness = body.config.rigid_hardness;
    let friction = body.config.dynamic_friction;
    for node in &mut body.nodes {
        if node.inv_mass == 0.0 {
            continue;
        }
        for tri in statics {
            let q = closest_point_on_triangle(
                &node.position,
                &tri.corners[0],
                &tri.corners[1],
                &tri.corners[2],
            );
            let delta = node.position - q;
            let dist = delta.norm();
            if dist >= tri.margin || dist <= f64::EPSILON {
                continue;
            }
            let normal = delta / dist;
            let target = q + normal * tri.margin;
            node.position += (target - node.position) * hardness;

            let slip = node.position - node.prev_position;
            let slip_n = normal * slip.dot(&normal);
            let slip_t = slip - slip_n;
            node.position = node.prev_position + slip_n + slip_t * (1.0 - friction);
        }
    }
}
