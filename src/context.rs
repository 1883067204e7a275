use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{gravity::GravityField, prelude::Epoch, rotation::EarthRotation};

/// Per epoch [TransformationContext]: rotation from TRF to CRF,
/// Earth rotation vector and center of Earth to center of mass correction.
/// The default context leaves the records untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformationContext {
    /// TRF to CRF rotation
    pub rotation: Rotation3<f64>,
    /// Rotation vector (rad/s)
    pub omega: Vector3<f64>,
    /// Center of mass correction (m)
    pub cm2ce: Vector3<f64>,
}

impl Default for TransformationContext {
    fn default() -> Self {
        Self {
            rotation: Rotation3::identity(),
            omega: Vector3::zeros(),
            cm2ce: Vector3::zeros(),
        }
    }
}

impl TransformationContext {
    /// Evaluates the [TransformationContext] at this [Epoch].
    /// Without [EarthRotation] model, records remain expressed in TRF.
    pub fn at(
        t: Epoch,
        gravity: &dyn GravityField,
        earth_rotation: Option<&dyn EarthRotation>,
    ) -> Self {
        let cm2ce = gravity.spherical_harmonics(t, 1, 1).degree_one_offset();

        match earth_rotation {
            Some(model) => Self {
                cm2ce,
                rotation: model.rotation(t).inverse(),
                omega: model.rotary_axis(t),
            },
            None => Self {
                cm2ce,
                ..Default::default()
            },
        }
    }

    /// Corrected and rotated position (m), from raw TRF position (m)
    pub fn position(&self, raw_m: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * (raw_m - self.cm2ce)
    }

    /// Rotated velocity (m/s), without the rotation term
    pub fn rotated_velocity(&self, raw_m_s: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * *raw_m_s
    }

    /// Celestial velocity (m/s), from raw velocity (m/s) and already
    /// rotated position (m)
    pub fn velocity(&self, raw_m_s: &Vector3<f64>, position_m: &Vector3<f64>) -> Vector3<f64> {
        self.rotated_velocity(raw_m_s) + self.omega.cross(position_m)
    }

    /// Rotated covariance matrix
    pub fn covariance(&self, covariance: &Matrix3<f64>) -> Matrix3<f64> {
        let r = self.rotation.matrix();
        r * covariance * r.transpose()
    }
}
