use itertools::Itertools;

use crate::{
    orbit::OrbitEpoch,
    prelude::{Duration, Epoch},
};

/// Summary of one orbit arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStatistics {
    /// Number of epochs
    pub epochs: usize,
    /// First [Epoch]
    pub first: Epoch,
    /// Last [Epoch]
    pub last: Epoch,
    /// Median sampling period
    pub sampling: Option<Duration>,
    /// Number of gaps: intervals larger than 1.5 sampling periods
    pub gaps: usize,
    /// Number of epochs with velocity
    pub velocities: usize,
}

impl ArcStatistics {
    pub fn new(arc: &[OrbitEpoch]) -> Option<Self> {
        let first = arc.first()?.t;
        let last = arc.last()?.t;

        let intervals = arc
            .iter()
            .tuple_windows()
            .map(|(a, b)| b.t - a.t)
            .sorted()
            .collect::<Vec<_>>();

        let sampling = intervals.get(intervals.len() / 2).copied();

        let gaps = match sampling {
            Some(sampling) => intervals
                .iter()
                .filter(|dt| dt.to_seconds() > 1.5 * sampling.to_seconds())
                .count(),
            None => 0,
        };

        Some(Self {
            epochs: arc.len(),
            first,
            last,
            sampling,
            gaps,
            velocities: arc.iter().filter(|epoch| epoch.velocity.is_some()).count(),
        })
    }
}

impl std::fmt::Display for ArcStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} epochs ({} with velocity) from {} to {}",
            self.epochs, self.velocities, self.first, self.last
        )?;
        if let Some(sampling) = self.sampling {
            write!(f, ", sampling {}, {} gap(s)", sampling, self.gaps)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::{TimeScale, Vector3};
    use hifitime::Unit;

    #[test]
    fn statistics() {
        assert!(ArcStatistics::new(&[]).is_none());

        let t0 = Epoch::from_gregorian(2020, 1, 1, 0, 0, 0, 0, TimeScale::GPST);
        let arc = [0.0, 30.0, 60.0, 90.0, 300.0, 330.0]
            .iter()
            .map(|dt| OrbitEpoch::new(t0 + *dt * Unit::Second, Vector3::new(7.0E6, 0.0, 0.0)))
            .collect::<Vec<_>>();

        let stats = ArcStatistics::new(&arc).unwrap();
        assert_eq!(stats.epochs, 6);
        assert_eq!(stats.first, t0);
        assert_eq!(stats.last, t0 + 330.0 * Unit::Second);
        assert_eq!(stats.sampling, Some(30.0 * Unit::Second));
        assert_eq!(stats.gaps, 1);
        assert_eq!(stats.velocities, 0);

        let single = ArcStatistics::new(&arc[..1]).unwrap();
        assert_eq!(single.sampling, None);
        assert_eq!(single.gaps, 0);
    }
}
