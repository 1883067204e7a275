//! SP3 to orbit, clock and covariance arcs
use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use log::{info, warn};

use crate::{
    arcs::Arcs,
    cfg::{Config, FaultPolicy},
    error::Error,
    gravity::{DegreeOneTides, GravityField},
    output::{dispatch, InstrumentWriter},
    parser::{read, Corrections},
    rotation::{EarthRotation, EarthRotationAngle},
};

/// [Converter] reads SP3 files, in order, into per satellite [Arcs]
/// and forwards the selection to an [InstrumentWriter].
pub struct Converter {
    /// Conversion [Config]
    pub cfg: Config,
    /// Center of mass correction model
    gravity: Box<dyn GravityField>,
    /// TRF to CRF rotation model
    earth_rotation: Option<Box<dyn EarthRotation>>,
    /// Accumulated [Arcs]
    arcs: Arcs,
}

impl Converter {
    /// Creates a new [Converter].
    /// ## Inputs
    /// - cfg: [Config]
    /// - gravity: [GravityField] used for the center of mass correction,
    ///   see [DegreeOneTides] for the default model.
    /// - earth_rotation: optional [EarthRotation] model. When missing,
    ///   the arcs remain expressed in the terrestrial frame.
    pub fn new(
        cfg: &Config,
        gravity: Box<dyn GravityField>,
        earth_rotation: Option<Box<dyn EarthRotation>>,
    ) -> Self {
        Self {
            gravity,
            earth_rotation,
            cfg: cfg.clone(),
            arcs: Default::default(),
        }
    }

    /// Creates a [Converter] with the default models: [DegreeOneTides],
    /// and [EarthRotationAngle] when [Config] requests the CRF.
    pub fn default_model(cfg: &Config) -> Self {
        let earth_rotation: Option<Box<dyn EarthRotation>> = if cfg.earth_rotation {
            Some(Box::new(EarthRotationAngle::default()))
        } else {
            None
        };
        Self::new(cfg, Box::new(DegreeOneTides::default()), earth_rotation)
    }

    /// Accumulated [Arcs]
    pub fn arcs(&self) -> &Arcs {
        &self.arcs
    }

    /// Parses one SP3 stream. On error, epochs parsed prior the faulty
    /// line are retained.
    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<usize, Error> {
        let corrections = Corrections::new(self.gravity.as_ref(), self.earth_rotation.as_deref());
        read(reader, &corrections, &mut self.arcs)
    }

    /// Parses all [Config] input files, in order, applying the [FaultPolicy].
    /// Returns the number of files that were entirely parsed.
    pub fn parse_files(&mut self) -> Result<usize, Error> {
        let mut parsed = 0;

        for path in self.cfg.inputs.clone() {
            info!("read file <{}>", path.display());

            let result = File::open(&path)
                .map_err(Error::Io)
                .and_then(|fd| self.parse_reader(BufReader::new(fd)));

            match result {
                Ok(epochs) => {
                    info!("{}: {} epochs", path.display(), epochs);
                    parsed += 1;
                },
                Err(e) if e.is_format_fault() => {
                    warn!("{}: {} continue...", path.display(), e);
                    match self.cfg.fault_policy {
                        FaultPolicy::AbortRemaining => break,
                        FaultPolicy::SkipFile => continue,
                    }
                },
                Err(e) => return Err(e),
            }
        }

        Ok(parsed)
    }

    /// Dispatches the [Arcs] to the [InstrumentWriter].
    /// Returns the number of files that were written.
    pub fn dispatch(&mut self, writer: &mut dyn InstrumentWriter) -> Result<usize, Error> {
        self.arcs.finalize();
        dispatch(&self.cfg, &self.arcs, writer)
    }

    /// Parses all input files and writes the results.
    pub fn run(&mut self, writer: &mut dyn InstrumentWriter) -> Result<usize, Error> {
        // configuration faults abort prior any parsing
        let _ = self.cfg.selection()?;
        self.parse_files()?;
        self.dispatch(writer)
    }
}
