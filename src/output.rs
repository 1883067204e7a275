//! Output collaborators and satellite dispatching
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{info, warn};
use nalgebra::Vector3;

use crate::{
    arcs::Arcs,
    cfg::{Config, Selection},
    error::Error,
    orbit::{ClockEpoch, CovarianceEpoch, OrbitEpoch},
    satellite::SatelliteId,
    statistics::ArcStatistics,
};

/// Any instrument file writer should implement [InstrumentWriter].
/// Each call receives one complete, time ordered arc.
pub trait InstrumentWriter {
    fn write_orbit(&mut self, path: &Path, arc: &[OrbitEpoch]) -> Result<(), Error>;
    fn write_clock(&mut self, path: &Path, arc: &[ClockEpoch]) -> Result<(), Error>;
    fn write_covariance(&mut self, path: &Path, arc: &[CovarianceEpoch]) -> Result<(), Error>;
}

/// [TextWriter] writes whitespace separated ASCII files:
/// one epoch per line, GPST epoch first.
#[derive(Debug, Default, Copy, Clone)]
pub struct TextWriter {}

impl TextWriter {
    fn write_lines<T>(
        path: &Path,
        header: &str,
        arc: &[T],
        format: impl Fn(&T) -> String,
    ) -> Result<(), Error> {
        let output_error = |e: std::io::Error| Error::Output {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let mut writer = BufWriter::new(File::create(path).map_err(output_error)?);

        writeln!(writer, "# {}", header).map_err(output_error)?;
        for epoch in arc {
            writeln!(writer, "{}", format(epoch)).map_err(output_error)?;
        }

        writer.flush().map_err(output_error)
    }
}

impl InstrumentWriter for TextWriter {
    fn write_orbit(&mut self, path: &Path, arc: &[OrbitEpoch]) -> Result<(), Error> {
        Self::write_lines(
            path,
            "epoch x[m] y[m] z[m] vx[m/s] vy[m/s] vz[m/s]",
            arc,
            |epoch| {
                let velocity = epoch.velocity.unwrap_or_else(Vector3::zeros);
                format!(
                    "{} {:.4} {:.4} {:.4} {:.7} {:.7} {:.7}",
                    epoch.t,
                    epoch.position[0],
                    epoch.position[1],
                    epoch.position[2],
                    velocity[0],
                    velocity[1],
                    velocity[2],
                )
            },
        )
    }

    fn write_clock(&mut self, path: &Path, arc: &[ClockEpoch]) -> Result<(), Error> {
        Self::write_lines(path, "epoch offset[s]", arc, |epoch| {
            format!("{} {:.15E}", epoch.t, epoch.offset_s)
        })
    }

    fn write_covariance(&mut self, path: &Path, arc: &[CovarianceEpoch]) -> Result<(), Error> {
        Self::write_lines(
            path,
            "epoch xx[m^2] yy[m^2] zz[m^2] xy[m^2] xz[m^2] yz[m^2]",
            arc,
            |epoch| {
                let c = &epoch.covariance;
                format!(
                    "{} {:.9E} {:.9E} {:.9E} {:.9E} {:.9E} {:.9E}",
                    epoch.t,
                    c[(0, 0)],
                    c[(1, 1)],
                    c[(2, 2)],
                    c[(0, 1)],
                    c[(0, 2)],
                    c[(1, 2)],
                )
            },
        )
    }
}

/// Inserts `.{sat}` before the file extension: `orbit.dat` becomes `orbit.L01.dat`.
pub fn satellite_path(path: &Path, sat: &SatelliteId) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    let name = match path.extension() {
        Some(extension) => format!("{}.{}.{}", stem, sat, extension.to_string_lossy()),
        None => format!("{}.{}", stem, sat),
    };

    path.with_file_name(name)
}

/// Selects satellite(s) from the [Arcs] and forwards them to the [InstrumentWriter].
/// Returns the number of files that were written.
pub fn dispatch(
    cfg: &Config,
    arcs: &Arcs,
    writer: &mut dyn InstrumentWriter,
) -> Result<usize, Error> {
    match cfg.selection()? {
        Selection::All => dispatch_all(cfg, arcs, writer),
        Selection::Single(sat) => dispatch_single(cfg, arcs, &sat, writer),
        Selection::First => match arcs.first_declared() {
            Some(sat) => dispatch_single(cfg, arcs, sat, writer),
            None => {
                warn!("No satellite declared in the satellite list: nothing to write");
                Ok(0)
            },
        },
    }
}

fn dispatch_single(
    cfg: &Config,
    arcs: &Arcs,
    sat: &SatelliteId,
    writer: &mut dyn InstrumentWriter,
) -> Result<usize, Error> {
    let mut written = 0;

    let orbit = arcs.orbit(sat);
    if orbit.is_empty() {
        warn!("No data found for identifier='{}'", sat);
    }

    if let Some(path) = &cfg.orbit {
        if !orbit.is_empty() {
            info!("write orbit data to file <{}>", path.display());
            writer.write_orbit(path, orbit)?;
            written += 1;
            if let Some(stats) = ArcStatistics::new(orbit) {
                info!("{}: {}", sat, stats);
            }
        }
    }

    if let Some(path) = &cfg.clock {
        let clock = arcs.clock(sat);
        if !clock.is_empty() {
            info!("write clock data to file <{}>", path.display());
            writer.write_clock(path, clock)?;
            written += 1;
        }
    }

    if let Some(path) = &cfg.covariance {
        let covariance = arcs.covariance(sat);
        if !covariance.is_empty() {
            info!("write covariance data to file <{}>", path.display());
            writer.write_covariance(path, covariance)?;
            written += 1;
        }
    }

    Ok(written)
}

fn dispatch_all(
    cfg: &Config,
    arcs: &Arcs,
    writer: &mut dyn InstrumentWriter,
) -> Result<usize, Error> {
    let mut written = 0;

    if let Some(path) = &cfg.orbit {
        for (sat, arc) in arcs.orbits().filter(|(_, arc)| !arc.is_empty()) {
            let path = satellite_path(path, sat);
            info!("write orbit data to file <{}>", path.display());
            writer.write_orbit(&path, arc)?;
            written += 1;
        }
    }

    if let Some(path) = &cfg.clock {
        for (sat, arc) in arcs.clocks().filter(|(_, arc)| !arc.is_empty()) {
            let path = satellite_path(path, sat);
            info!("write clock data to file <{}>", path.display());
            writer.write_clock(&path, arc)?;
            written += 1;
        }
    }

    if let Some(path) = &cfg.covariance {
        for (sat, arc) in arcs.covariances().filter(|(_, arc)| !arc.is_empty()) {
            let path = satellite_path(path, sat);
            info!("write covariance data to file <{}>", path.display());
            writer.write_covariance(&path, arc)?;
            written += 1;
        }
    }

    Ok(written)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::{Epoch, TimeScale};
    use std::str::FromStr;

    #[test]
    fn satellite_paths() {
        let sat = SatelliteId::from_str("L01").unwrap();
        for (path, expected) in [
            ("orbit.dat", "orbit.L01.dat"),
            ("out/orbit.dat", "out/orbit.L01.dat"),
            ("out/orbit", "out/orbit.L01"),
            ("out/orbit.v2.txt", "out/orbit.v2.L01.txt"),
        ] {
            assert_eq!(satellite_path(Path::new(path), &sat), PathBuf::from(expected));
        }
    }

    #[test]
    fn text_writer() {
        let dir = std::env::temp_dir().join(format!("sp3-orbit-text-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("orbit.dat");

        let t = Epoch::from_gregorian(2020, 1, 1, 0, 0, 30, 0, TimeScale::GPST);
        let arc = [
            OrbitEpoch::new(t, Vector3::new(1.0, 2.0, 3.0)),
            OrbitEpoch::new(t, Vector3::new(4.0, 5.0, 6.0))
                .with_velocity(Vector3::new(0.5, 0.0, 0.0)),
        ];

        TextWriter::default().write_orbit(&path, &arc).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('#'));
        assert!(lines[1].starts_with("2020-01-01T00:00:30 GPST"));
        assert!(lines[2].ends_with("0.5000000 0.0000000 0.0000000"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unusable_output() {
        let path = Path::new("/non/existing/directory/orbit.dat");
        let t = Epoch::from_gregorian(2020, 1, 1, 0, 0, 30, 0, TimeScale::GPST);
        let arc = [ClockEpoch { t, offset_s: 1.0 }];
        assert!(matches!(
            TextWriter::default().write_clock(path, &arc),
            Err(Error::Output { .. })
        ));
    }
}
