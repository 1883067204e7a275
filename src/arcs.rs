use std::collections::BTreeMap;

use log::debug;
use nalgebra::Vector3;

use crate::{
    orbit::{ClockEpoch, CovarianceEpoch, OrbitEpoch},
    parser::Record,
    prelude::Epoch,
    satellite::SatelliteId,
};

/// Velocity waiting for its matching position.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingVelocity {
    /// Rotated velocity (m/s)
    velocity: Vector3<f64>,
    /// Rotation vector (rad/s)
    omega: Vector3<f64>,
}

/// Per satellite time ordered [Arcs] of orbit, clock and covariance epochs.
#[derive(Debug, Clone, Default)]
pub struct Arcs {
    /// First satellite declared in the satellite list
    first_declared: Option<SatelliteId>,
    orbits: BTreeMap<SatelliteId, Vec<OrbitEpoch>>,
    clocks: BTreeMap<SatelliteId, Vec<ClockEpoch>>,
    covariances: BTreeMap<SatelliteId, Vec<CovarianceEpoch>>,
    velocities: BTreeMap<(SatelliteId, Epoch), PendingVelocity>,
}

impl Arcs {
    /// Dispatches a new [Record] to its satellite.
    pub fn push(&mut self, record: Record) {
        match record {
            Record::SatelliteList(sat) => {
                if self.first_declared.is_none() {
                    debug!("first declared satellite: {}", sat);
                    self.first_declared = Some(sat);
                }
            },
            Record::Position {
                sat,
                position,
                clock,
            } => {
                if let Some(position) = position {
                    self.orbits.entry(sat.clone()).or_default().push(position);
                }
                if let Some(clock) = clock {
                    self.clocks.entry(sat).or_default().push(clock);
                }
            },
            Record::Velocity {
                sat,
                t,
                velocity,
                omega,
            } => {
                self.velocities
                    .insert((sat, t), PendingVelocity { velocity, omega });
            },
            Record::Covariance { sat, epoch } => {
                self.covariances.entry(sat).or_default().push(epoch);
            },
        }
    }

    /// Merges pending velocities into the latest position epoch sharing
    /// satellite and [Epoch]. Velocities without position are dropped.
    /// Called once per input file, so overlapping files each keep their own velocity.
    pub fn finalize(&mut self) {
        for ((sat, t), pending) in std::mem::take(&mut self.velocities) {
            let epoch = self
                .orbits
                .get_mut(&sat)
                .and_then(|orbit| orbit.iter_mut().rev().find(|epoch| epoch.t == t));

            match epoch {
                Some(epoch) => {
                    let velocity = pending.velocity + pending.omega.cross(&epoch.position);
                    *epoch = epoch.with_velocity(velocity);
                },
                None => {
                    debug!("{}({}) - dropped velocity without position", t, sat);
                },
            }
        }
    }

    pub fn first_declared(&self) -> Option<&SatelliteId> {
        self.first_declared.as_ref()
    }

    pub fn orbit(&self, sat: &SatelliteId) -> &[OrbitEpoch] {
        self.orbits.get(sat).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn clock(&self, sat: &SatelliteId) -> &[ClockEpoch] {
        self.clocks.get(sat).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn covariance(&self, sat: &SatelliteId) -> &[CovarianceEpoch] {
        self.covariances.get(sat).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn orbits(&self) -> impl Iterator<Item = (&SatelliteId, &[OrbitEpoch])> {
        self.orbits.iter().map(|(sat, arc)| (sat, arc.as_slice()))
    }

    pub fn clocks(&self) -> impl Iterator<Item = (&SatelliteId, &[ClockEpoch])> {
        self.clocks.iter().map(|(sat, arc)| (sat, arc.as_slice()))
    }

    pub fn covariances(&self) -> impl Iterator<Item = (&SatelliteId, &[CovarianceEpoch])> {
        self.covariances
            .iter()
            .map(|(sat, arc)| (sat, arc.as_slice()))
    }

    /// Every satellite present in at least one arc, sorted
    pub fn satellites(&self) -> Vec<&SatelliteId> {
        use itertools::Itertools;
        self.orbits
            .keys()
            .chain(self.clocks.keys())
            .chain(self.covariances.keys())
            .sorted()
            .dedup()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty() && self.clocks.is_empty() && self.covariances.is_empty()
    }
}
