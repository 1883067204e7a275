use std::f64::consts::TAU;

use nalgebra::{Rotation3, Vector3};

use crate::{constants::EARTH_ANGULAR_VEL_RAD, prelude::Epoch};

/// Any Earth orientation model should implement the [EarthRotation] trait,
/// to express terrestrial (TRF) coordinates in the celestial frame (CRF).
pub trait EarthRotation {
    /// Rotation from CRF to TRF at this [Epoch].
    fn rotation(&self, t: Epoch) -> Rotation3<f64>;

    /// Instantaneous rotation vector (rad/s) at this [Epoch], expressed in CRF.
    fn rotary_axis(&self, t: Epoch) -> Vector3<f64>;
}

/// [EarthRotationAngle] only models the diurnal rotation about the
/// celestial intermediate pole: precession, nutation and polar motion
/// are neglected and UT1 is approximated by UTC.
#[derive(Debug, Default, Copy, Clone)]
pub struct EarthRotationAngle {}

impl EarthRotationAngle {
    /// Earth Rotation Angle (radians) at this [Epoch]
    pub fn angle_rad(t: Epoch) -> f64 {
        let du = t.to_jde_utc_days() - 2451545.0;
        let turns = 0.7790572732640 + 1.00273781191135448 * du;
        TAU * turns.rem_euclid(1.0)
    }
}

impl EarthRotation for EarthRotationAngle {
    fn rotation(&self, t: Epoch) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), -Self::angle_rad(t))
    }

    fn rotary_axis(&self, _: Epoch) -> Vector3<f64> {
        Vector3::new(0.0, 0.0, EARTH_ANGULAR_VEL_RAD)
    }
}
