use std::path::{Path, PathBuf};

use crate::prelude::{
    ClockEpoch, CovarianceEpoch, Error, InstrumentWriter, OrbitEpoch, SatelliteId,
};

/// SP3 position line, position in km and clock in µs
pub fn position_line(sat: &str, position_km: (f64, f64, f64), clock_us: f64) -> String {
    format!(
        "P{}{:14.6}{:14.6}{:14.6}{:14.6}",
        sat, position_km.0, position_km.1, position_km.2, clock_us
    )
}

/// SP3 velocity line, velocity in dm/s
pub fn velocity_line(sat: &str, velocity_dm_s: (f64, f64, f64)) -> String {
    format!(
        "V{}{:14.6}{:14.6}{:14.6}{:14.6}",
        sat, velocity_dm_s.0, velocity_dm_s.1, velocity_dm_s.2, 999999.999999
    )
}

/// SP3 covariance line: standard deviations (mm) and correlations (1E-7)
pub fn covariance_line(sigma_mm: (u32, u32, u32), correlation: (i64, i64, i64)) -> String {
    format!(
        "EP  {:4} {:4} {:4} {:7} {:8} {:8} {:8} {:8} {:8} {:8}",
        sigma_mm.0, sigma_mm.1, sigma_mm.2, 0, correlation.0, correlation.1, 0, correlation.2, 0, 0
    )
}

/// SP3 epoch line
pub fn epoch_line(year: i32, month: u8, day: u8, hour: u8, minute: u8, seconds: f64) -> String {
    format!(
        "*  {:4} {:2} {:2} {:2} {:2} {:11.8}",
        year, month, day, hour, minute, seconds
    )
}

/// Builds SP3 test files
#[derive(Debug, Clone)]
pub struct Sp3Builder {
    time_system: String,
    satellites: Vec<String>,
    body: Vec<String>,
}

impl Sp3Builder {
    pub fn new(time_system: &str, satellites: &[&str]) -> Self {
        Self {
            time_system: time_system.to_string(),
            satellites: satellites.iter().map(|sat| sat.to_string()).collect(),
            body: Vec::new(),
        }
    }

    pub fn line(mut self, line: &str) -> Self {
        self.body.push(line.to_string());
        self
    }

    /// Appends one epoch, with one position line per satellite.
    /// Satellite `k` lies at (7000 + k, minute, k) km.
    pub fn epoch(mut self, hour: u8, minute: u8) -> Self {
        self.body.push(epoch_line(2020, 6, 1, hour, minute, 0.0));
        for (k, sat) in self.satellites.iter().enumerate() {
            self.body.push(position_line(
                sat,
                (7000.0 + k as f64, minute as f64, k as f64),
                10.0 * (k + 1) as f64,
            ));
        }
        self
    }

    pub fn build(&self) -> String {
        let mut lines = vec![
            "#dP2020  6  1  0  0  0.00000000      10 ORBIT IGS14 FIT  TEST".to_string(),
            "## 2108 86400.00000000    60.00000000 59001 0.0000000000000".to_string(),
            format!("+  {:3}   {}", self.satellites.len(), self.satellites.concat()),
            "+          0  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0".to_string(),
            "++         0  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0  0".to_string(),
            format!(
                "%c L  cc {} ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc",
                self.time_system
            ),
            "%c cc cc ccc ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc".to_string(),
            "%f  1.2500000  1.025000000  0.00000000000  0.000000000000000".to_string(),
            "%f  0.0000000  0.000000000  0.00000000000  0.000000000000000".to_string(),
            "%i    0    0    0    0      0      0      0      0         0".to_string(),
            "/* test file".to_string(),
        ];
        lines.extend(self.body.iter().cloned());
        lines.push("EOF".to_string());
        lines.join("\n")
    }

    /// Writes this file to a dedicated temporary location
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build())
            .unwrap_or_else(|e| panic!("failed to write {}: {}", name, e));
        path
    }
}

/// Creates a dedicated temporary directory
pub fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sp3-orbit-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir)
        .unwrap_or_else(|e| panic!("failed to create {}: {}", dir.display(), e));
    dir
}

/// [InstrumentWriter] keeping every arc in memory
#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub orbits: Vec<(PathBuf, Vec<OrbitEpoch>)>,
    pub clocks: Vec<(PathBuf, Vec<ClockEpoch>)>,
    pub covariances: Vec<(PathBuf, Vec<CovarianceEpoch>)>,
}

impl MemoryWriter {
    pub fn orbit(&self, path: &str) -> Option<&[OrbitEpoch]> {
        self.orbits
            .iter()
            .find(|(p, _)| p == Path::new(path))
            .map(|(_, arc)| arc.as_slice())
    }

    pub fn orbit_paths(&self) -> Vec<PathBuf> {
        self.orbits.iter().map(|(p, _)| p.clone()).collect()
    }
}

impl InstrumentWriter for MemoryWriter {
    fn write_orbit(&mut self, path: &Path, arc: &[OrbitEpoch]) -> Result<(), Error> {
        self.orbits.push((path.to_path_buf(), arc.to_vec()));
        Ok(())
    }

    fn write_clock(&mut self, path: &Path, arc: &[ClockEpoch]) -> Result<(), Error> {
        self.clocks.push((path.to_path_buf(), arc.to_vec()));
        Ok(())
    }

    fn write_covariance(&mut self, path: &Path, arc: &[CovarianceEpoch]) -> Result<(), Error> {
        self.covariances.push((path.to_path_buf(), arc.to_vec()));
        Ok(())
    }
}

/// [InstrumentWriter] that always fails
pub struct FailingWriter {}

impl InstrumentWriter for FailingWriter {
    fn write_orbit(&mut self, path: &Path, _: &[OrbitEpoch]) -> Result<(), Error> {
        Err(Error::Output {
            path: path.display().to_string(),
            reason: "read only".to_string(),
        })
    }

    fn write_clock(&mut self, path: &Path, _: &[ClockEpoch]) -> Result<(), Error> {
        self.write_orbit(path, &[])
    }

    fn write_covariance(&mut self, path: &Path, _: &[CovarianceEpoch]) -> Result<(), Error> {
        self.write_orbit(path, &[])
    }
}

pub fn sat(desc: &str) -> SatelliteId {
    desc.parse()
        .unwrap_or_else(|e| panic!("bad satellite \"{}\": {}", desc, e))
}
