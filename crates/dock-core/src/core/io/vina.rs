use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Prefix of the line AutoDock Vina writes for every scored pose.
pub const RESULT_MARKER: &str = "REMARK VINA RESULT:";

#[derive(Debug, Error)]
pub enum VinaParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: VinaParseErrorKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VinaParseErrorKind {
    #[error("missing '{field}' field in result line")]
    MissingField { field: &'static str },
    #[error("invalid float for '{field}' (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
}

fn parse_field(
    fields: &[&str],
    pos: usize,
    field: &'static str,
    line: usize,
) -> Result<f64, VinaParseError> {
    let value = fields.get(pos).ok_or(VinaParseError::Parse {
        line,
        kind: VinaParseErrorKind::MissingField { field },
    })?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| VinaParseError::Parse {
            line,
            kind: VinaParseErrorKind::InvalidFloat {
                field,
                value: value.to_string(),
            },
        })
}

/// Returns the affinity of the first scored pose, or `None` when the artifact carries no
/// result line at all. Later poses are never looked at.
pub fn parse_affinity(reader: impl BufRead) -> Result<Option<f64>, VinaParseError> {
    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        if let Some(rest) = line.strip_prefix(RESULT_MARKER) {
            let fields: Vec<&str> = rest.split_whitespace().collect();
            return parse_field(&fields, 0, "affinity", line_num + 1).map(Some);
        }
    }
    Ok(None)
}

pub fn parse_affinity_from_path(path: impl AsRef<Path>) -> Result<Option<f64>, VinaParseError> {
    let file = File::open(path)?;
    parse_affinity(BufReader::new(file))
}
