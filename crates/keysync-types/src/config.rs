//! Frame stepping configuration.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for frame-indexed stepping.
///
/// One authored frame advances simulated time by `frame_dt`, consumed in
/// fixed sub-steps of `substep_dt` (at most `max_substeps` per frame, with
/// the remainder carried over). Simulation granularity is therefore finer
/// than and independent of the authored frame rate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameConfig {
    /// Simulated time per authored frame (seconds).
    pub frame_dt: f64,
    /// Fixed sub-step size (seconds).
    pub substep_dt: f64,
    /// Maximum sub-steps consumed per frame.
    pub max_substeps: u32,
    /// Gravity acceleration (m/s²).
    pub gravity: Vector3<f64>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_dt: 1.0 / 24.0,
            substep_dt: 1.0 / 60.0,
            max_substeps: 10,
            gravity: Vector3::new(0.0, -9.8, 0.0),
        }
    }
}

impl FrameConfig {
    /// Set the gravity vector.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity.
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = Vector3::zeros();
        self
    }

    /// Authored frame rate in Hz.
    #[must_use]
    pub fn frame_rate(&self) -> f64 {
        1.0 / self.frame_dt
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.frame_dt.is_finite() || self.frame_dt <= 0.0 {
            return Err(crate::SyncError::InvalidTimestep(self.frame_dt));
        }
        if !self.substep_dt.is_finite() || self.substep_dt <= 0.0 {
            return Err(crate::SyncError::InvalidTimestep(self.substep_dt));
        }
        if self.max_substeps == 0 {
            return Err(crate::SyncError::invalid_config(
                "max_substeps must be at least 1",
            ));
        }
        if f64::from(self.max_substeps) * self.substep_dt < self.frame_dt {
            return Err(crate::SyncError::invalid_config(
                "sub-step budget cannot cover one frame; time would be lost",
            ));
        }
        if !self.gravity.iter().all(|x| x.is_finite()) {
            return Err(crate::SyncError::invalid_config("gravity must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_24_fps_with_60hz_substeps() {
        let config = FrameConfig::default();
        assert_eq!(config.frame_rate(), 24.0);
        assert_eq!(config.substep_dt, 1.0 / 60.0);
        assert_eq!(config.max_substeps, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_timestep_rejected() {
        let config = FrameConfig {
            frame_dt: 0.0,
            ..FrameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FrameConfig {
            substep_dt: f64::NAN,
            ..FrameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_insufficient_substep_budget_rejected() {
        let config = FrameConfig {
            max_substeps: 1,
            ..FrameConfig::default()
        };
        // One 1/60 s sub-step cannot cover a 1/24 s frame.
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_gravity() {
        let config = FrameConfig::default().zero_gravity();
        assert_eq!(config.gravity.norm(), 0.0);
        assert!(config.validate().is_ok());
    }
}
