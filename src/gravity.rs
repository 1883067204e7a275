//! Gravity field collaborators, limited to what the center of mass
//! correction requires.
use nalgebra::{DMatrix, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{EARTH_GRAVITATION_MU_M3_S2, EARTH_REFERENCE_RADIUS_M, MM_TO_M},
    prelude::Epoch,
};

/// Fully normalized [SphericalHarmonics] coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalHarmonics {
    /// Gravitational constant (m^3 s-2)
    pub gm: f64,
    /// Reference radius (m)
    pub r: f64,
    /// cnm(n, m)
    pub cnm: DMatrix<f64>,
    /// snm(n, m)
    pub snm: DMatrix<f64>,
}

impl SphericalHarmonics {
    /// Builds zero [SphericalHarmonics] up to requested degree and order.
    pub fn zeros(gm: f64, r: f64, max_degree: usize, max_order: usize) -> Self {
        let order = max_order.min(max_degree);
        Self {
            gm,
            r,
            cnm: DMatrix::zeros(max_degree + 1, order + 1),
            snm: DMatrix::zeros(max_degree + 1, order + 1),
        }
    }

    pub fn max_degree(&self) -> usize {
        self.cnm.nrows() - 1
    }

    /// cnm coefficient, zero when truncated
    pub fn c(&self, n: usize, m: usize) -> f64 {
        self.cnm.get((n, m)).copied().unwrap_or_default()
    }

    /// snm coefficient, zero when truncated
    pub fn s(&self, n: usize, m: usize) -> f64 {
        self.snm.get((n, m)).copied().unwrap_or_default()
    }

    /// Offset (m) from the center of Earth to the center of mass
    /// described by the degree 1 coefficients.
    pub fn degree_one_offset(&self) -> Vector3<f64> {
        3.0_f64.sqrt() * self.r * Vector3::new(self.c(1, 1), self.s(1, 1), self.c(1, 0))
    }
}

/// Any gravity field model should implement the [GravityField] trait.
pub trait GravityField {
    /// [SphericalHarmonics] at this [Epoch], truncated to `max_degree` and `max_order`.
    fn spherical_harmonics(&self, t: Epoch, max_degree: usize, max_order: usize)
        -> SphericalHarmonics;
}

/// [ZeroGravityField] disables the center of mass correction.
#[derive(Debug, Default, Copy, Clone)]
pub struct ZeroGravityField {}

impl GravityField for ZeroGravityField {
    fn spherical_harmonics(
        &self,
        _: Epoch,
        max_degree: usize,
        max_order: usize,
    ) -> SphericalHarmonics {
        SphericalHarmonics::zeros(
            EARTH_GRAVITATION_MU_M3_S2,
            EARTH_REFERENCE_RADIUS_M,
            max_degree,
            max_order,
        )
    }
}

/// One harmonic term of the tidal geocenter motion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TidalConstituent {
    /// Darwin name
    pub name: String,
    /// Doodson multipliers of (τ, s, h, p, N', ps)
    pub doodson: [i8; 6],
    /// (in phase, quadrature) geocenter motion amplitudes along X, Y and Z (mm)
    pub amplitudes_mm: [(f64, f64); 3],
}

impl TidalConstituent {
    pub fn new(name: &str, doodson: [i8; 6], amplitudes_mm: [(f64, f64); 3]) -> Self {
        Self {
            name: name.to_string(),
            doodson,
            amplitudes_mm,
        }
    }

    /// Tidal argument (rad) for given Doodson arguments (rad)
    fn argument(&self, beta: &[f64; 6]) -> f64 {
        self.doodson
            .iter()
            .zip(beta.iter())
            .map(|(n, b)| *n as f64 * b)
            .sum()
    }
}

/// Doodson fundamental arguments (τ, s, h, p, N', ps) in radians.
pub(crate) fn doodson_arguments(t: Epoch) -> [f64; 6] {
    let centuries = (t.to_jde_tt_days() - 2451545.0) / 36525.0;
    let ut1_days = t.to_jde_utc_days() - 2451545.0;

    let s = 218.3164477 + 481267.88123421 * centuries;
    let h = 280.4664567 + 36000.7697489 * centuries;
    let p = 83.3532465 + 4069.0137287 * centuries;
    let n_prime = -(125.0445479 - 1934.1362891 * centuries);
    let ps = 282.9373481 + 1.7195366 * centuries;

    let gmst = 280.46061837 + 360.98564736629 * ut1_days;
    let tau = gmst + 180.0 - s;

    [tau, s, h, p, n_prime, ps].map(|deg| deg.rem_euclid(360.0).to_radians())
}

/// [DegreeOneTides] describes the degree 1 part of the ocean tides, as a
/// harmonic geocenter motion. It is the default model of the center of mass
/// correction, since SP3 orbits should be given with respect to the center of Earth.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DegreeOneTides {
    /// Reference radius (m)
    pub radius_m: f64,
    /// [TidalConstituent]s
    pub constituents: Vec<TidalConstituent>,
}

impl Default for DegreeOneTides {
    /// Nominal amplitudes of the eight major ocean tides.
    fn default() -> Self {
        Self {
            radius_m: EARTH_REFERENCE_RADIUS_M,
            constituents: vec![
                TidalConstituent::new(
                    "Q1",
                    [1, -2, 0, 1, 0, 0],
                    [(0.1, -0.1), (-0.1, 0.0), (-0.1, 0.1)],
                ),
                TidalConstituent::new(
                    "O1",
                    [1, -1, 0, 0, 0, 0],
                    [(0.9, -0.6), (-0.7, -0.2), (-0.6, 0.3)],
                ),
                TidalConstituent::new(
                    "P1",
                    [1, 1, -2, 0, 0, 0],
                    [(0.2, -0.3), (-0.3, 0.0), (-0.3, 0.1)],
                ),
                TidalConstituent::new(
                    "K1",
                    [1, 1, 0, 0, 0, 0],
                    [(0.7, -1.0), (-1.0, 0.0), (-0.9, 0.4)],
                ),
                TidalConstituent::new(
                    "N2",
                    [2, -1, 0, 1, 0, 0],
                    [(0.1, -0.1), (0.1, 0.1), (0.0, 0.0)],
                ),
                TidalConstituent::new(
                    "M2",
                    [2, 0, 0, 0, 0, 0],
                    [(0.6, -1.5), (1.4, 0.6), (0.0, 0.3)],
                ),
                TidalConstituent::new(
                    "S2",
                    [2, 2, -2, 0, 0, 0],
                    [(0.1, -0.7), (0.6, 0.1), (0.0, 0.1)],
                ),
                TidalConstituent::new(
                    "K2",
                    [2, 2, 0, 0, 0, 0],
                    [(0.0, -0.2), (0.2, 0.0), (0.0, 0.0)],
                ),
            ],
        }
    }
}

impl DegreeOneTides {
    /// Geocenter motion (m) at this [Epoch]
    pub fn geocenter_m(&self, t: Epoch) -> Vector3<f64> {
        let beta = doodson_arguments(t);

        self.constituents
            .iter()
            .fold(Vector3::zeros(), |acc, constituent| {
                let theta = constituent.argument(&beta);
                let (sin, cos) = theta.sin_cos();
                let [x, y, z] = constituent
                    .amplitudes_mm
                    .map(|(in_phase, quadrature)| in_phase * cos + quadrature * sin);
                acc + Vector3::new(x, y, z) * MM_TO_M
            })
    }
}

impl GravityField for DegreeOneTides {
    fn spherical_harmonics(
        &self,
        t: Epoch,
        max_degree: usize,
        max_order: usize,
    ) -> SphericalHarmonics {
        let mut harmonics = SphericalHarmonics::zeros(
            EARTH_GRAVITATION_MU_M3_S2,
            self.radius_m,
            max_degree,
            max_order,
        );

        if max_degree < 1 {
            return harmonics;
        }

        let geocenter = self.geocenter_m(t) / (3.0_f64.sqrt() * self.radius_m);

        harmonics.cnm[(1, 0)] = geocenter[2];
        if max_order >= 1 {
            harmonics.cnm[(1, 1)] = geocenter[0];
            harmonics.snm[(1, 1)] = geocenter[1];
        }

        harmonics
    }
}
