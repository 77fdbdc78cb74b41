//! Keyframe timeline written by the simulation and read by the renderer.
//!
//! Each scene node carries one [`KeyframeTimeline`] with independent
//! position, rotation, and scale tracks. The engine samples frame 0 to seed
//! bodies and writes one key per simulated frame for each track. Writing a
//! key at a frame that already has one replaces it, which is what makes
//! repeated `advance_to` calls at the same frame idempotent.

use nalgebra::{Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sampled transform at a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keyframe {
    /// World position.
    pub position: Point3<f64>,
    /// World rotation.
    pub rotation: UnitQuaternion<f64>,
    /// Per-axis scale.
    pub scale: Vector3<f64>,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Per-node animation timeline with separate position/rotation/scale tracks.
///
/// Keys are stored sorted by frame. Tracks are sparse: a track with no key
/// at frame `f` is sampled by taking the latest key at or before `f`,
/// falling back to the identity transform.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyframeTimeline {
    position_keys: Vec<(u32, Point3<f64>)>,
    rotation_keys: Vec<(u32, UnitQuaternion<f64>)>,
    scale_keys: Vec<(u32, Vector3<f64>)>,
}

/// Insert or replace a key in a sorted track.
fn upsert<T>(keys: &mut Vec<(u32, T)>, frame: u32, value: T) {
    match keys.binary_search_by_key(&frame, |&(f, _)| f) {
        Ok(i) => keys[i].1 = value,
        Err(i) => keys.insert(i, (frame, value)),
    }
}

/// Sample a sorted track at a frame: latest key at or before `frame`.
fn sample<T: Copy>(keys: &[(u32, T)], frame: u32) -> Option<T> {
    match keys.binary_search_by_key(&frame, |&(f, _)| f) {
        Ok(i) => Some(keys[i].1),
        Err(0) => None,
        Err(i) => Some(keys[i - 1].1),
    }
}

impl KeyframeTimeline {
    /// Create an empty timeline.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position_keys: Vec::new(),
            rotation_keys: Vec::new(),
            scale_keys: Vec::new(),
        }
    }

    /// Set (or replace) the position key at `frame`.
    pub fn set_position(&mut self, frame: u32, position: Point3<f64>) {
        upsert(&mut self.position_keys, frame, position);
    }

    /// Set (or replace) the rotation key at `frame`.
    pub fn set_rotation(&mut self, frame: u32, rotation: UnitQuaternion<f64>) {
        upsert(&mut self.rotation_keys, frame, rotation);
    }

    /// Set (or replace) the scale key at `frame`.
    pub fn set_scale(&mut self, frame: u32, scale: Vector3<f64>) {
        upsert(&mut self.scale_keys, frame, scale);
    }

    /// Sample the timeline at `frame`.
    ///
    /// Each track independently returns its latest key at or before `frame`,
    /// falling back to the identity transform for tracks with no earlier key.
    #[must_use]
    pub fn key_for_frame(&self, frame: u32) -> Keyframe {
        let fallback = Keyframe::default();
        Keyframe {
            position: sample(&self.position_keys, frame).unwrap_or(fallback.position),
            rotation: sample(&self.rotation_keys, frame).unwrap_or(fallback.rotation),
            scale: sample(&self.scale_keys, frame).unwrap_or(fallback.scale),
        }
    }

    /// Whether any track has a key at exactly `frame`.
    #[must_use]
    pub fn has_key_at(&self, frame: u32) -> bool {
        fn hit<T>(keys: &[(u32, T)], frame: u32) -> bool {
            keys.binary_search_by_key(&frame, |&(f, _)| f).is_ok()
        }
        hit(&self.position_keys, frame)
            || hit(&self.rotation_keys, frame)
            || hit(&self.scale_keys, frame)
    }

    /// Number of position keys (for diagnostics).
    #[must_use]
    pub fn position_key_count(&self) -> usize {
        self.position_keys.len()
    }
}
