// SP3 to orbit, clock and covariance files.
// The conversion is described by a JSON configuration file, for example:
// {
//     "orbit": "grace.orbit.dat",
//     "clock": "grace.clock.dat",
//     "identifier": "L09",
//     "earth_rotation": true,
//     "inputs": ["GFZ0OPSRAP_20200010000_01D_05M_ORB.SP3"]
// }
// Input files passed on the command line are appended to the configured ones.
use std::{fs::File, io::BufReader, path::PathBuf, process::ExitCode};

use clap::Parser;
use log::{error, info};

use sp3_orbit::prelude::{Config, Converter, TextWriter};

#[derive(Parser, Debug)]
#[command(name = "sp3_to_orbit")]
#[command(about = "Converts SP3 orbit files to orbit, clock and covariance arcs")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    cfg: Option<PathBuf>,

    /// Satellite identifier, overrides the configuration.
    /// Use "<all>" to generate one file per satellite.
    #[arg(short, long)]
    identifier: Option<String>,

    /// Orbit output file, overrides the configuration
    #[arg(short, long)]
    orbit: Option<PathBuf>,

    /// Express the arcs in the celestial frame
    #[arg(long)]
    crf: bool,

    /// SP3 input files
    inputs: Vec<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config, String> {
    let mut cfg = match &args.cfg {
        Some(path) => {
            let fd = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
            serde_json::from_reader::<_, Config>(BufReader::new(fd))
                .map_err(|e| format!("{}: {}", path.display(), e))?
        },
        None => Config::default(),
    };

    if let Some(identifier) = &args.identifier {
        cfg = cfg.with_identifier(identifier);
    }
    if let Some(orbit) = &args.orbit {
        cfg = cfg.with_orbit_output(orbit);
    }
    if args.crf {
        cfg = cfg.with_earth_rotation(true);
    }
    for input in args.inputs.iter() {
        cfg = cfg.with_input(input);
    }

    Ok(cfg)
}

pub fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let cfg = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("invalid configuration: {}", e);
            return ExitCode::FAILURE;
        },
    };

    let mut converter = Converter::default_model(&cfg);

    match converter.run(&mut TextWriter::default()) {
        Ok(written) => {
            info!("{} file(s) written", written);
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
