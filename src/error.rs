use hifitime::HifitimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Line ends before the field begins.
    #[error("missing field at columns {start}..{end}")]
    MissingField { start: usize, end: usize },

    #[error("invalid floating point field \"{text}\" at columns {start}..{end}")]
    FloatField {
        start: usize,
        end: usize,
        text: String,
    },

    #[error("invalid integer field \"{text}\" at columns {start}..{end}")]
    IntegerField {
        start: usize,
        end: usize,
        text: String,
    },

    /// Epoch header describes an impossible calendar date.
    #[error("invalid epoch: {0}")]
    Calendar(#[from] HifitimeError),

    /// Epoch seconds outside [0, 61)
    #[error("invalid epoch seconds: {0}")]
    Seconds(f64),

    #[error("invalid satellite identifier \"{0}\"")]
    SatelliteIdentifier(String),

    /// Configured satellite selection is not a valid identifier.
    #[error("invalid satellite selection \"{0}\"")]
    Selection(String),

    /// Input file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Output collaborator failure: aborts the whole run.
    #[error("failed to write \"{path}\": {reason}")]
    Output { path: String, reason: String },
}

impl Error {
    /// True for faults scoped to a single input file.
    pub fn is_format_fault(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::FloatField { .. }
                | Self::IntegerField { .. }
                | Self::Calendar(_)
                | Self::Seconds(_)
                | Self::SatelliteIdentifier(_)
                | Self::Io(_)
        )
    }
}
