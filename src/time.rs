use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::TAI_GPST_OFFSET_S,
    error::Error,
    prelude::{Duration, Epoch, TimeScale},
};

use hifitime::Unit;

/// [TimeSystem] in which the SP3 epochs are declared.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeSystem {
    #[default]
    GPS,
    UTC,
    TAI,
}

impl std::fmt::Display for TimeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::GPS => write!(f, "GPS"),
            Self::UTC => write!(f, "UTC"),
            Self::TAI => write!(f, "TAI"),
        }
    }
}

impl std::str::FromStr for TimeSystem {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "GPS" => Ok(Self::GPS),
            "UTC" => Ok(Self::UTC),
            "TAI" => Ok(Self::TAI),
            _ => Err(()),
        }
    }
}

/// Calendar fields of an SP3 epoch header.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Calendar {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub seconds: f64,
}

impl TimeSystem {
    /// Interprets the 3 letter tag of the time system declaration line.
    /// Unknown tags fall back to [TimeSystem::GPS].
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| {
            warn!("Unknown time system ({}), assuming GPS time", tag);
            Self::GPS
        })
    }

    /// Resolves [Calendar] fields, expressed in this [TimeSystem],
    /// into a continuous [Epoch] expressed in [TimeScale::GPST].
    pub fn resolve(&self, calendar: &Calendar) -> Result<Epoch, Error> {
        if !(0.0..61.0).contains(&calendar.seconds) {
            return Err(Error::Seconds(calendar.seconds));
        }

        let whole_s = calendar.seconds.floor();
        let fraction = Duration::from_seconds(calendar.seconds - whole_s);

        let in_scale = |ts: TimeScale| -> Result<Epoch, Error> {
            let t = Epoch::maybe_from_gregorian(
                calendar.year,
                calendar.month,
                calendar.day,
                calendar.hour,
                calendar.minute,
                whole_s as u8,
                0,
                ts,
            )?;
            Ok(t + fraction)
        };

        match self {
            Self::GPS => in_scale(TimeScale::GPST),
            Self::UTC => Ok(in_scale(TimeScale::UTC)?.to_time_scale(TimeScale::GPST)),
            Self::TAI => Ok(in_scale(TimeScale::GPST)? - TAI_GPST_OFFSET_S * Unit::Second),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    fn calendar(year: i32, month: u8, day: u8, seconds: f64) -> Calendar {
        Calendar {
            year,
            month,
            day,
            hour: 12,
            minute: 30,
            seconds,
        }
    }

    #[rstest]
    #[case("GPS", TimeSystem::GPS)]
    #[case("UTC", TimeSystem::UTC)]
    #[case("TAI", TimeSystem::TAI)]
    #[case("GLO", TimeSystem::GPS)]
    #[case("ccc", TimeSystem::GPS)]
    fn tags(#[case] tag: &str, #[case] expected: TimeSystem) {
        assert_eq!(TimeSystem::from_tag(tag), expected);
    }

    #[rstest]
    #[case(2020, 18.0)]
    #[case(2016, 17.0)]
    #[case(2010, 15.0)]
    fn utc_leap_seconds(#[case] year: i32, #[case] leap_s: f64) {
        let cal = calendar(year, 6, 1, 0.0);
        let gps = TimeSystem::GPS.resolve(&cal).unwrap();
        let utc = TimeSystem::UTC.resolve(&cal).unwrap();
        assert_eq!(utc.time_scale, TimeScale::GPST);
        assert!(((utc - gps).to_seconds() - leap_s).abs() < 1.0E-9);
    }

    #[test]
    fn tai_offset() {
        let cal = calendar(2021, 3, 4, 15.5);
        let gps = TimeSystem::GPS.resolve(&cal).unwrap();
        let tai = TimeSystem::TAI.resolve(&cal).unwrap();
        assert!(((gps - tai).to_seconds() - TAI_GPST_OFFSET_S).abs() < 1.0E-9);
    }

    #[test]
    fn fractional_seconds() {
        let t0 = TimeSystem::GPS.resolve(&calendar(2020, 1, 1, 0.0)).unwrap();
        let t1 = TimeSystem::GPS
            .resolve(&calendar(2020, 1, 1, 59.25))
            .unwrap();
        assert!(((t1 - t0).to_seconds() - 59.25).abs() < 1.0E-9);
    }

    #[rstest]
    #[case(-5.5)]
    #[case(-0.1)]
    #[case(61.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn invalid_seconds(#[case] seconds: f64) {
        for system in [TimeSystem::GPS, TimeSystem::UTC, TimeSystem::TAI] {
            assert!(matches!(
                system.resolve(&calendar(2020, 1, 1, seconds)),
                Err(Error::Seconds(_))
            ));
        }
    }

    #[test]
    fn invalid_calendar() {
        assert!(TimeSystem::GPS.resolve(&calendar(2020, 13, 1, 0.0)).is_err());
        assert!(TimeSystem::UTC.resolve(&calendar(2020, 2, 30, 0.0)).is_err());
    }
}
