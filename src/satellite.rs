#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// [SatelliteId] as found in SP3 records, for example `G01` or `L09`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteId(String);

impl SatelliteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for SatelliteId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.len() > 3
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ')
        {
            return Err(Error::SatelliteIdentifier(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl std::fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
