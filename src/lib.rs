#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod arcs;
mod cfg;
mod column;
mod context;
mod converter;
mod error;
mod gravity;
mod orbit;
mod output;
mod parser;
mod rotation;
mod satellite;
mod statistics;
mod time;

pub mod constants;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::arcs::Arcs;
    pub use crate::cfg::{Config, FaultPolicy, Selection};
    pub use crate::context::TransformationContext;
    pub use crate::converter::Converter;
    pub use crate::error::Error;
    pub use crate::gravity::{
        DegreeOneTides, GravityField, SphericalHarmonics, TidalConstituent, ZeroGravityField,
    };
    pub use crate::orbit::{ClockEpoch, CovarianceEpoch, OrbitEpoch};
    pub use crate::output::{dispatch, satellite_path, InstrumentWriter, TextWriter};
    pub use crate::parser::{read, Corrections, ParserState, Record, Stage};
    pub use crate::rotation::{EarthRotation, EarthRotationAngle};
    pub use crate::satellite::SatelliteId;
    pub use crate::statistics::ArcStatistics;
    pub use crate::time::{Calendar, TimeSystem};
    // re-export
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::{Matrix3, Rotation3, Vector3};
}
