use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{constants::SELECT_ALL_TOKEN, error::Error, satellite::SatelliteId};

/// What to do with the remaining input files, once one of them failed to parse.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultPolicy {
    /// Stop reading: what was parsed so far is still written.
    #[default]
    AbortRemaining,
    /// Proceed with the next input file.
    SkipFile,
}

/// Satellite [Selection]
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Selection {
    /// First satellite declared in the satellite list
    #[default]
    First,
    /// This very satellite
    Single(SatelliteId),
    /// Every satellite, each to its own file
    All,
}

impl std::str::FromStr for Selection {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Ok(Self::First)
        } else if trimmed == SELECT_ALL_TOKEN {
            Ok(Self::All)
        } else {
            let sat = trimmed
                .parse::<SatelliteId>()
                .map_err(|_| Error::Selection(s.to_string()))?;
            Ok(Self::Single(sat))
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first satellite"),
            Self::Single(sat) => write!(f, "{}", sat),
            Self::All => write!(f, "{}", SELECT_ALL_TOKEN),
        }
    }
}

fn default_earth_rotation() -> bool {
    false
}

/// Conversion [Config]uration
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Orbit output file
    #[cfg_attr(feature = "serde", serde(default))]
    pub orbit: Option<PathBuf>,
    /// Clock output file
    #[cfg_attr(feature = "serde", serde(default))]
    pub clock: Option<PathBuf>,
    /// 3x3 epoch covariance output file
    #[cfg_attr(feature = "serde", serde(default))]
    pub covariance: Option<PathBuf>,
    /// Satellite identifier, for example L09 for GRACE A.
    /// Empty: first satellite, `<all>`: identifier is appended to each file.
    #[cfg_attr(feature = "serde", serde(default))]
    pub identifier: String,
    /// Rotate from TRF to CRF
    #[cfg_attr(feature = "serde", serde(default = "default_earth_rotation"))]
    pub earth_rotation: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fault_policy: FaultPolicy,
    /// SP3 input files, processed in this order
    #[cfg_attr(feature = "serde", serde(default))]
    pub inputs: Vec<PathBuf>,
}

impl Config {
    /// Resolves the satellite [Selection]
    pub fn selection(&self) -> Result<Selection, Error> {
        self.identifier.parse()
    }

    pub fn with_orbit_output(&self, path: impl Into<PathBuf>) -> Self {
        let mut s = self.clone();
        s.orbit = Some(path.into());
        s
    }

    pub fn with_clock_output(&self, path: impl Into<PathBuf>) -> Self {
        let mut s = self.clone();
        s.clock = Some(path.into());
        s
    }

    pub fn with_covariance_output(&self, path: impl Into<PathBuf>) -> Self {
        let mut s = self.clone();
        s.covariance = Some(path.into());
        s
    }

    pub fn with_identifier(&self, identifier: &str) -> Self {
        let mut s = self.clone();
        s.identifier = identifier.to_string();
        s
    }

    pub fn with_earth_rotation(&self, earth_rotation: bool) -> Self {
        let mut s = self.clone();
        s.earth_rotation = earth_rotation;
        s
    }

    pub fn with_fault_policy(&self, policy: FaultPolicy) -> Self {
        let mut s = self.clone();
        s.fault_policy = policy;
        s
    }

    pub fn with_input(&self, path: impl Into<PathBuf>) -> Self {
        let mut s = self.clone();
        s.inputs.push(path.into());
        s
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;
    use std::str::FromStr;

    #[rstest]
    #[case("", Selection::First)]
    #[case("   ", Selection::First)]
    #[case("<all>", Selection::All)]
    #[case("L09", Selection::Single(SatelliteId::from_str("L09").unwrap()))]
    fn selections(#[case] identifier: &str, #[case] expected: Selection) {
        let cfg = Config::default().with_identifier(identifier);
        assert_eq!(cfg.selection().unwrap(), expected);
    }

    #[test]
    fn bad_selection() {
        let cfg = Config::default().with_identifier("<any>");
        assert!(matches!(cfg.selection(), Err(Error::Selection(_))));
    }

    #[test]
    fn builder() {
        let cfg = Config::default()
            .with_orbit_output("orbit.dat")
            .with_input("a.sp3")
            .with_input("b.sp3")
            .with_fault_policy(FaultPolicy::SkipFile);

        assert_eq!(cfg.orbit, Some(PathBuf::from("orbit.dat")));
        assert!(cfg.clock.is_none());
        assert_eq!(cfg.inputs.len(), 2);
        assert_eq!(cfg.fault_policy, FaultPolicy::SkipFile);
        assert!(!cfg.earth_rotation);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize() {
        let cfg: Config = serde_json::from_str(
            r#"{
                "orbit": "orbit.dat",
                "clock": "clock.dat",
                "identifier": "<all>",
                "earth_rotation": true,
                "fault_policy": "SkipFile",
                "inputs": ["day1.sp3", "day2.sp3"]
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.selection().unwrap(), Selection::All);
        assert_eq!(cfg.clock, Some(PathBuf::from("clock.dat")));
        assert!(cfg.covariance.is_none());
        assert!(cfg.earth_rotation);
        assert_eq!(cfg.fault_policy, FaultPolicy::SkipFile);
        assert_eq!(cfg.inputs.len(), 2);

        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
    }
}
