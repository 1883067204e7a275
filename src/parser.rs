//! SP3 line oriented state machine
use std::io::BufRead;

use log::{debug, trace};
use nalgebra::Vector3;

use crate::{
    arcs::Arcs,
    column::{decode_count, decode_f64, decode_i32, field},
    constants::{DM_S_TO_M_S, KM_TO_M, SP3_CLOCK_SENTINEL_US, US_TO_S},
    context::TransformationContext,
    error::Error,
    gravity::GravityField,
    orbit::{ClockEpoch, CovarianceEpoch, OrbitEpoch},
    prelude::Epoch,
    rotation::EarthRotation,
    satellite::SatelliteId,
    time::{Calendar, TimeSystem},
};

/// Physical models evaluated on each new epoch.
#[derive(Clone, Copy)]
pub struct Corrections<'a> {
    /// Center of mass correction model
    pub gravity: &'a dyn GravityField,
    /// Optional TRF to CRF rotation
    pub earth_rotation: Option<&'a dyn EarthRotation>,
}

impl<'a> Corrections<'a> {
    pub fn new(
        gravity: &'a dyn GravityField,
        earth_rotation: Option<&'a dyn EarthRotation>,
    ) -> Self {
        Self {
            gravity,
            earth_rotation,
        }
    }
}

/// [Record] emitted by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// First satellite of the satellite list
    SatelliteList(SatelliteId),
    /// Position line: position is absent when not provided,
    /// clock is absent when above the "no data" threshold.
    Position {
        sat: SatelliteId,
        position: Option<OrbitEpoch>,
        clock: Option<ClockEpoch>,
    },
    /// Velocity line. The rotation term needs the matching position
    /// and is applied by the [Arcs].
    Velocity {
        sat: SatelliteId,
        t: Epoch,
        velocity: Vector3<f64>,
        omega: Vector3<f64>,
    },
    Covariance {
        sat: SatelliteId,
        epoch: CovarianceEpoch,
    },
}

/// Parsing [Stage]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Regular line classification
    #[default]
    Lines,
    /// Second line of the time system declaration block
    TimeSystemContinuation,
    /// `EOF` was encountered
    Terminated,
}

/// [ParserState] is passed from one line to the next.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    pub stage: Stage,
    pub time_system: TimeSystem,
    /// Current epoch, expressed in GPST
    pub t: Epoch,
    /// Current satellite
    pub sat: Option<SatelliteId>,
    /// Current [TransformationContext]
    pub context: TransformationContext,
}

impl ParserState {
    pub fn is_terminated(&self) -> bool {
        self.stage == Stage::Terminated
    }

    /// Consumes one line and returns the next [ParserState],
    /// with zero or one [Record].
    pub fn step(
        self,
        line: &str,
        corrections: &Corrections,
    ) -> Result<(Self, Option<Record>), Error> {
        match self.stage {
            Stage::Terminated => Ok((self, None)),
            Stage::TimeSystemContinuation => Ok((
                Self {
                    stage: Stage::Lines,
                    ..self
                },
                None,
            )),
            Stage::Lines => self.classify(line, corrections),
        }
    }

    fn classify(
        self,
        line: &str,
        corrections: &Corrections,
    ) -> Result<(Self, Option<Record>), Error> {
        if line.starts_with('#')
            || line.starts_with("/*")
            || line.starts_with("%f")
            || line.starts_with("%i")
        {
            Ok((self, None))
        } else if line.starts_with('+') {
            let record = Self::satellite_list(line)?;
            Ok((self, record))
        } else if line.starts_with("%c") {
            let time_system = TimeSystem::from_tag(field(line, 9, 3)?);
            debug!("time system: {}", time_system);
            Ok((
                Self {
                    time_system,
                    stage: Stage::TimeSystemContinuation,
                    ..self
                },
                None,
            ))
        } else if line.starts_with("* ") {
            let t = self.time_system.resolve(&Self::epoch_header(line)?)?;
            trace!("new epoch {}", t);
            let context =
                TransformationContext::at(t, corrections.gravity, corrections.earth_rotation);
            Ok((
                Self {
                    t,
                    context,
                    ..self
                },
                None,
            ))
        } else if line.starts_with('P') {
            let (sat, raw) = Self::satellite_vector(line)?;
            let clock_us = decode_f64(line, 46, 14)?;

            let position = if raw.norm() > 0.0 {
                let position = self.context.position(&(raw * KM_TO_M));
                Some(OrbitEpoch::new(self.t, position))
            } else {
                None
            };

            let clock = if clock_us < SP3_CLOCK_SENTINEL_US {
                Some(ClockEpoch {
                    t: self.t,
                    offset_s: clock_us * US_TO_S,
                })
            } else {
                None
            };

            let record = Record::Position {
                sat: sat.clone(),
                position,
                clock,
            };

            Ok((
                Self {
                    sat: Some(sat),
                    ..self
                },
                Some(record),
            ))
        } else if line.starts_with("EP") {
            let sigma_mm = (
                decode_f64(line, 4, 4)?,
                decode_f64(line, 9, 4)?,
                decode_f64(line, 14, 4)?,
            );
            let correlation = (
                decode_f64(line, 27, 8)?,
                decode_f64(line, 36, 8)?,
                decode_f64(line, 54, 8)?,
            );

            let record = match self.sat {
                Some(ref sat) => {
                    let mut epoch = CovarianceEpoch::from_sp3(self.t, sigma_mm, correlation);
                    epoch.covariance = self.context.covariance(&epoch.covariance);
                    Some(Record::Covariance {
                        sat: sat.clone(),
                        epoch,
                    })
                },
                None => {
                    debug!("{} - covariance prior any satellite record", self.t);
                    None
                },
            };

            Ok((self, record))
        } else if line.starts_with('V') {
            let (sat, raw) = Self::satellite_vector(line)?;

            let record = if raw.norm() > 0.0 {
                Some(Record::Velocity {
                    sat: sat.clone(),
                    t: self.t,
                    velocity: self.context.rotated_velocity(&(raw * DM_S_TO_M_S)),
                    omega: self.context.omega,
                })
            } else {
                None
            };

            Ok((
                Self {
                    sat: Some(sat),
                    ..self
                },
                record,
            ))
        } else if line.starts_with("EOF") {
            Ok((
                Self {
                    stage: Stage::Terminated,
                    ..self
                },
                None,
            ))
        } else {
            Ok((self, None))
        }
    }

    /// First satellite of the list, when the list is not empty
    fn satellite_list(line: &str) -> Result<Option<Record>, Error> {
        if decode_count(line, 3, 3)? == 0 {
            return Ok(None);
        }
        let sat = field(line, 9, 3)?.parse::<SatelliteId>()?;
        Ok(Some(Record::SatelliteList(sat)))
    }

    fn epoch_header(line: &str) -> Result<Calendar, Error> {
        let int_u8 = |start: usize| -> Result<u8, Error> {
            let value = decode_i32(line, start, 2)?;
            u8::try_from(value).map_err(|_| Error::IntegerField {
                start,
                end: start + 2,
                text: value.to_string(),
            })
        };

        let seconds = decode_f64(line, 20, 11)?;
        if !(0.0..61.0).contains(&seconds) {
            return Err(Error::FloatField {
                start: 20,
                end: 31,
                text: seconds.to_string(),
            });
        }

        Ok(Calendar {
            year: decode_i32(line, 3, 4)?,
            month: int_u8(8)?,
            day: int_u8(11)?,
            hour: int_u8(14)?,
            minute: int_u8(17)?,
            seconds,
        })
    }

    /// Satellite and 3D vector of position and velocity lines
    fn satellite_vector(line: &str) -> Result<(SatelliteId, Vector3<f64>), Error> {
        let sat = field(line, 1, 3)?.parse::<SatelliteId>()?;
        let vector = Vector3::new(
            decode_f64(line, 4, 14)?,
            decode_f64(line, 18, 14)?,
            decode_f64(line, 32, 14)?,
        );
        Ok((sat, vector))
    }
}

/// Streams SP3 lines through the state machine, accumulating into [Arcs].
/// Returns the number of epochs that were parsed. On error, [Arcs]
/// retains whatever was parsed up to the faulty line.
pub fn read<R: BufRead>(
    reader: R,
    corrections: &Corrections,
    arcs: &mut Arcs,
) -> Result<usize, Error> {
    let result = read_records(reader, corrections, arcs);
    // velocities are resolved against this file only, faulty or not
    arcs.finalize();
    result
}

fn read_records<R: BufRead>(
    reader: R,
    corrections: &Corrections,
    arcs: &mut Arcs,
) -> Result<usize, Error> {
    let mut state = ParserState::default();
    let mut epochs = 0;

    for line in reader.lines() {
        let line = line?;
        let is_epoch = line.starts_with("* ") && state.stage == Stage::Lines;

        let (next, record) = state.step(&line, corrections)?;
        state = next;

        if is_epoch {
            epochs += 1;
        }

        if let Some(record) = record {
            arcs.push(record);
        }

        if state.is_terminated() {
            break;
        }
    }

    Ok(epochs)
}
