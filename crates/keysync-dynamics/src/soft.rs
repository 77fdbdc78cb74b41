//! Position-based deformable bodies.

use hashbrown::HashSet;
use keysync_types::Pose;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One point mass of a deformable body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftNode {
    /// Current world-space position.
    pub position: Point3<f64>,
    /// Position at the start of the current substep.
    pub prev_position: Point3<f64>,
    /// Velocity.
    pub velocity: Vector3<f64>,
    /// Inverse mass; zero pins the node.
    pub inv_mass: f64,
}

/// A stretch constraint between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Link {
    a: u32,
    b: u32,
    rest_length: f64,
}

/// Solver and material coefficients of a deformable body.
///
/// The defaults are the engine-wide soft-body material: no velocity
/// damping, light dynamic friction, a weak pull toward the rest shape,
/// full hardness against rigid and soft contacts, and two constraint
/// relaxation passes per substep.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftBodyConfig {
    /// Velocity damping per substep, in `[0, 1]`.
    pub damping: f64,
    /// Tangential velocity loss on contact, in `[0, 1]`.
    pub dynamic_friction: f64,
    /// Pull toward the rest shape per substep, in `[0, 1]`.
    pub pose_matching: f64,
    /// Contact hardness against rigid bodies.
    pub rigid_hardness: f64,
    /// Contact hardness against kinematic bodies.
    pub kinetic_hardness: f64,
    /// Contact hardness against other soft bodies.
    pub soft_hardness: f64,
    /// Constraint relaxation passes per substep.
    pub iterations: usize,
    /// Stretch constraint stiffness, in `[0, 1]`.
    pub linear_stiffness: f64,
    /// Bend stiffness, in `[0, 1]`.
    pub angular_stiffness: f64,
    /// Volume preservation stiffness, in `[0, 1]`.
    pub volume_stiffness: f64,
}

impl Default for SoftBodyConfig {
    fn default() -> Self {
        Self {
            damping: 0.0,
            dynamic_friction: 0.2,
            pose_matching: 0.02,
            rigid_hardness: 1.0,
            kinetic_hardness: 0.8,
            soft_hardness: 1.0,
            iterations: 2,
            linear_stiffness: 0.8,
            angular_stiffness: 0.8,
            volume_stiffness: 0.8,
        }
    }
}

/// A deformable body: point masses joined by stretch constraints, stepped
/// with position-based dynamics.
///
/// Nodes are created in face-traversal order: walking the triangle index
/// stream and appending a node the first time each vertex index appears.
/// Callers needing a stable mapping to their own vertex order should match
/// node positions, not assume an enumeration order.
///
/// `pose` is the transform the body was placed with; stepping never updates
/// it. Deformation lives entirely in the node positions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftBody {
    /// Point masses.
    pub nodes: Vec<SoftNode>,
    links: Vec<Link>,
    faces: Vec<[u32; 3]>,
    /// Solver coefficients.
    pub config: SoftBodyConfig,
    /// Placement transform, fixed after [`transform`](Self::transform).
    pub pose: Pose,
    /// Rest-shape offsets from the center of mass, in local space.
    rest_local: Vec<Vector3<f64>>,
}

impl SoftBody {
    /// Build a body from deduplicated mesh arrays with unit node mass.
    ///
    /// Every unique edge of the triangle set becomes a stretch constraint.
    /// Index entries out of range are skipped with their triangle.
    #[must_use]
    pub fn from_tri_mesh(positions: &[Point3<f64>], indices: &[u32]) -> Self {
        // vertex index -> node id, assigned at first encounter in the stream
        let mut node_of_vertex: Vec<Option<u32>> = vec![None; positions.len()];
        let mut nodes: Vec<SoftNode> = Vec::new();
        let mut faces: Vec<[u32; 3]> = Vec::new();

        for tri in indices.chunks_exact(3) {
            if tri.iter().any(|&i| i as usize >= positions.len()) {
                continue;
            }
            let mut face = [0_u32; 3];
            for (slot, &vi) in face.iter_mut().zip(tri.iter()) {
                let vi = vi as usize;
                *slot = match node_of_vertex[vi] {
                    Some(id) => id,
                    None => {
                        let id = nodes.len() as u32;
                        nodes.push(SoftNode {
                            position: positions[vi],
                            prev_position: positions[vi],
                            velocity: Vector3::zeros(),
                            inv_mass: 1.0,
                        });
                        node_of_vertex[vi] = Some(id);
                        id
                    }
                };
            }
            faces.push(face);
        }

        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        let mut links = Vec::new();
        for face in &faces {
            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                let key = if a < b { (a, b) } else { (b, a) };
                if seen.insert(key) {
                    let rest_length =
                        (nodes[a as usize].position - nodes[b as usize].position).norm();
                    links.push(Link { a, b, rest_length });
                }
            }
        }

        let rest_local = rest_offsets(&nodes);

        Self {
            nodes,
            links,
            faces,
            config: SoftBodyConfig::default(),
            pose: Pose::identity(),
            rest_local,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Current node positions.
    pub fn node_positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.nodes.iter().map(|n| n.position)
    }

    /// Place the body in the world.
    ///
    /// Maps every node through `pose` and records it as the body's
    /// placement. Intended to be called once, after construction and after
    /// any correspondence lookup against the untransformed positions.
    pub fn transform(&mut self, pose: &Pose) {
        for node in &mut self.nodes {
            node.position = pose.transform_point(&node.position);
            node.prev_position = node.position;
        }
        self.pose = *pose;
    }

    /// Integrate velocities and predict positions for one substep.
    pub(crate) fn predict(&mut self, dt: f64, gravity: &Vector3<f64>) {
        for node in &mut self.nodes {
            node.prev_position = node.position;
            if node.inv_mass > 0.0 {
                node.velocity += gravity * dt;
                node.position += node.velocity * dt;
            }
        }
    }

    /// Relax stretch constraints and pull toward the rest shape.
    pub(crate) fn relax_constraints(&mut self) {
        for _ in 0..self.config.iterations {
            for link in &self.links {
                let (a, b) = (link.a as usize, link.b as usize);
                let w_sum = self.nodes[a].inv_mass + self.nodes[b].inv_mass;
                if w_sum == 0.0 {
                    continue;
                }
                let delta = self.nodes[b].position - self.nodes[a].position;
                let len = delta.norm();
                if len <= f64::EPSILON {
                    continue;
                }
                let correction =
                    delta * (self.config.linear_stiffness * (len - link.rest_length) / (len * w_sum));
                let wa = self.nodes[a].inv_mass;
                let wb = self.nodes[b].inv_mass;
                self.nodes[a].position += correction * wa;
                self.nodes[b].position -= correction * wb;
            }
        }
        self.match_pose();
    }

    /// Translation-only pull toward the rest shape, scaled by the
    /// pose-matching coefficient. The rest shape is anchored at the current
    /// center of mass and oriented by the placement rotation.
    fn match_pose(&mut self) {
        let k = self.config.pose_matching;
        if k <= 0.0 || self.nodes.is_empty() {
            return;
        }
        let com = center_of_mass(&self.nodes);
        for (node, rest) in self.nodes.iter_mut().zip(&self.rest_local) {
            if node.inv_mass == 0.0 {
                continue;
            }
            let goal = com + self.pose.rotation * rest;
            node.position += (goal - node.position) * k;
        }
    }

    /// Derive velocities from the substep displacement and apply damping.
    pub(crate) fn finalize_velocities(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let keep = 1.0 - self.config.damping;
        for node in &mut self.nodes {
            if node.inv_mass > 0.0 {
                node.velocity = (node.position - node.prev_position) * (keep / dt);
            }
        }
    }
}

fn center_of_mass(nodes: &[SoftNode]) -> Point3<f64> {
    let mut sum = Vector3::zeros();
    for node in nodes {
        sum += node.position.coords;
    }
    Point3::from(sum / nodes.len() as f64)
}

fn rest_offsets(nodes: &[SoftNode]) -> Vec<Vector3<f64>> {
    if nodes.is_empty() {
        return Vec::new();
    }
    let com = center_of_mass(nodes);
    nodes.iter().map(|n| n.position - com).collect()
}
