use super::error::AnalysisError;
use crate::core::models::score::{ResultsTable, ScoreRecord};
use rust_xlsxwriter::Workbook;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Base name of the ranked results file, without extension.
pub const RANKED_RESULTS_STEM: &str = "ranked_results";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn file_name(self) -> String {
        format!("{RANKED_RESULTS_STEM}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(AnalysisError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes `table` sorted ascending by affinity to `ranked_results.<ext>` in `dest_dir`.
///
/// The sort is stable and has no secondary key. Both formats carry exactly two columns,
/// `compound` then `affinity`, under a header row.
pub fn export(
    table: &ResultsTable,
    dest_dir: &Path,
    format: ExportFormat,
) -> Result<PathBuf, AnalysisError> {
    fs::create_dir_all(dest_dir)?;
    let ranked = table.sorted_by_affinity();
    let path = dest_dir.join(format.file_name());

    match format {
        ExportFormat::Csv => write_csv(&ranked, &path)?,
        ExportFormat::Xlsx => write_xlsx(&ranked, &path)?,
    }

    info!(path = %path.display(), rows = ranked.len(), "Exported ranked results.");
    Ok(path)
}

/// Exports with a format given by name, rejecting unknown names before touching the disk.
pub fn export_named(
    table: &ResultsTable,
    dest_dir: &Path,
    format: &str,
) -> Result<PathBuf, AnalysisError> {
    let format = format.parse()?;
    export(table, dest_dir, format)
}

fn write_csv(table: &ResultsTable, path: &Path) -> Result<(), AnalysisError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in table {
        writer.serialize(record)?;
    }
    // An empty table still gets its header row.
    if table.is_empty() {
        writer.write_record(["compound", "affinity"])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(table: &ResultsTable, path: &Path) -> Result<(), AnalysisError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "compound")?;
    sheet.write_string(0, 1, "affinity")?;
    for (row, record) in (1u32..).zip(table) {
        sheet.write_string(row, 0, &record.compound)?;
        sheet.write_number(row, 1, record.affinity)?;
    }
    workbook.save(path)?;
    Ok(())
}

/// Reads a two-column `compound,affinity` CSV file back into a table, keeping row order.
pub fn read_csv(path: &Path) -> Result<ResultsTable, AnalysisError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut table = ResultsTable::new();
    for record in reader.deserialize::<ScoreRecord>() {
        let record = record?;
        if !record.affinity.is_finite() {
            return Err(AnalysisError::NonFiniteScore {
                compound: record.compound,
            });
        }
        table.insert(record);
    }
    Ok(table)
}
