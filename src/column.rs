//! Fixed column field decoding
use crate::error::Error;

/// Returns the raw field located at `[start, start + width)`, clipped to line length.
/// A field starting past the end of line is missing.
pub(crate) fn field(line: &str, start: usize, width: usize) -> Result<&str, Error> {
    let end = start + width;
    if start >= line.len() {
        return Err(Error::MissingField { start, end });
    }

    let clipped = end.min(line.len());

    line.get(start..clipped).ok_or(Error::MissingField { start, end })
}

/// Decodes a finite floating point field. Fortran exponents (`1.0D-3`) are tolerated.
pub(crate) fn decode_f64(line: &str, start: usize, width: usize) -> Result<f64, Error> {
    let text = field(line, start, width)?.trim();

    let parsed = if text.contains(['D', 'd']) {
        text.replace(['D', 'd'], "E").parse::<f64>()
    } else {
        text.parse::<f64>()
    };

    match parsed {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::FloatField {
            start,
            end: start + width,
            text: text.to_string(),
        }),
    }
}

/// Decodes an integer field. A leading `+` sign is tolerated.
pub(crate) fn decode_i32(line: &str, start: usize, width: usize) -> Result<i32, Error> {
    let text = field(line, start, width)?.trim();

    text.trim_start_matches('+')
        .parse::<i32>()
        .map_err(|_| Error::IntegerField {
            start,
            end: start + width,
            text: text.to_string(),
        })
}

/// Decodes a counter field, where blanks stand for zero
/// (continuation lines of the satellite list).
pub(crate) fn decode_count(line: &str, start: usize, width: usize) -> Result<u32, Error> {
    let text = match field(line, start, width) {
        Ok(text) => text.trim(),
        Err(_) => return Ok(0),
    };

    if text.is_empty() {
        return Ok(0);
    }

    text.parse::<u32>().map_err(|_| Error::IntegerField {
        start,
        end: start + width,
        text: text.to_string(),
    })
}
