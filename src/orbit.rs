use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::Epoch;

/// [OrbitEpoch] describes one orbital state sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitEpoch {
    /// Sampling [Epoch], expressed in GPST
    pub t: Epoch,
    /// Position (m)
    pub position: Vector3<f64>,
    /// Velocity (m/s), when provided
    pub velocity: Option<Vector3<f64>>,
}

impl OrbitEpoch {
    pub fn new(t: Epoch, position: Vector3<f64>) -> Self {
        Self {
            t,
            position,
            velocity: None,
        }
    }

    pub fn with_velocity(&self, velocity: Vector3<f64>) -> Self {
        let mut s = *self;
        s.velocity = Some(velocity);
        s
    }
}

/// [ClockEpoch] describes one clock offset sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockEpoch {
    pub t: Epoch,
    /// Clock offset (s)
    pub offset_s: f64,
}

/// [CovarianceEpoch] describes the position covariance of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CovarianceEpoch {
    pub t: Epoch,
    /// Symmetric covariance matrix (m²)
    pub covariance: Matrix3<f64>,
}

impl CovarianceEpoch {
    /// Rebuilds the covariance matrix from SP3 standard deviations (mm)
    /// and correlation coefficients (1E-7), ordered (xy, xz, yz).
    pub fn from_sp3(t: Epoch, sigma_mm: (f64, f64, f64), correlation: (f64, f64, f64)) -> Self {
        use crate::constants::{CORRELATION_MM2_TO_M2, MM_TO_M};

        let (sx, sy, sz) = sigma_mm;
        let (xy, xz, yz) = correlation;

        let (xx, yy, zz) = (
            (MM_TO_M * sx).powi(2),
            (MM_TO_M * sy).powi(2),
            (MM_TO_M * sz).powi(2),
        );

        let (xy, xz, yz) = (
            CORRELATION_MM2_TO_M2 * xy * sx * sy,
            CORRELATION_MM2_TO_M2 * xz * sx * sz,
            CORRELATION_MM2_TO_M2 * yz * sy * sz,
        );

        Self {
            t,
            covariance: Matrix3::new(xx, xy, xz, xy, yy, yz, xz, yz, zz),
        }
    }

    /// Standard deviations (m) along each axis
    pub fn sigmas(&self) -> Vector3<f64> {
        self.covariance.diagonal().map(f64::sqrt)
    }
}
