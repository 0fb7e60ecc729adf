use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct PdbAtom {
    pub serial: usize,
    pub name: String,
    pub residue_name: String,
    pub chain_id: char,
    pub residue_number: isize,
    pub position: Point3<f64>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Structure contains no ATOM or HETATM records")]
    NoAtoms,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_float(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    line_num: usize,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

/// Coordinate records of a receptor structure.
///
/// Only `ATOM` and `HETATM` records are read; PDBQT files share the same column layout
/// for the fields used here, so prepared receptors can be read as well. A structure is
/// never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PdbStructure {
    atoms: Vec<PdbAtom>,
}

impl PdbStructure {
    pub fn read_from(reader: impl BufRead) -> Result<Self, PdbError> {
        let mut atoms = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            if record_type != "ATOM" && record_type != "HETATM" {
                continue;
            }
            if line.len() < 54 {
                return Err(PdbError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::LineTooShort,
                });
            }

            let serial_str = slice_and_trim(&line, 6, 11);
            // Large structures overflow the serial column; the value is informational only.
            let serial = if serial_str.is_empty() {
                atoms.len() + 1
            } else {
                parse_int(&line, 6, 11, line_num)?
            };
            let res_seq_str = slice_and_trim(&line, 22, 26);
            let residue_number = if res_seq_str.is_empty() {
                0
            } else {
                parse_int(&line, 22, 26, line_num)?
            };

            atoms.push(PdbAtom {
                serial,
                name: slice_and_trim(&line, 12, 16).to_string(),
                residue_name: slice_and_trim(&line, 17, 20).to_string(),
                chain_id: slice_and_trim(&line, 21, 22).chars().next().unwrap_or(' '),
                residue_number,
                position: Point3::new(
                    parse_float(&line, 30, 38, line_num)?,
                    parse_float(&line, 38, 46, line_num)?,
                    parse_float(&line, 46, 54, line_num)?,
                ),
            });
        }

        if atoms.is_empty() {
            return Err(PdbError::NoAtoms);
        }
        Ok(Self { atoms })
    }

    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self, PdbError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    pub fn atoms(&self) -> &[PdbAtom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Geometric center of all atom positions.
    pub fn centroid(&self) -> Point3<f64> {
        let sum = self
            .atoms
            .iter()
            .fold(Vector3::zeros(), |acc, atom| acc + atom.position.coords);
        Point3::from(sum / self.atoms.len() as f64)
    }
}
