use super::error::AnalysisError;
use super::plot;
use crate::core::models::score::ResultsTable;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const SUMMARY_FILE_NAME: &str = "statistical_summary.txt";
pub const PLOT_FILE_NAME: &str = "docking_scores_distribution.svg";

/// Descriptive statistics of the affinity column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); NaN for a single value.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    /// Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }

    /// One `label value` row per statistic with six decimals, in the familiar
    /// `describe()` layout.
    pub fn render(&self) -> String {
        let rows = [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ];
        let mut out = String::new();
        for (label, value) in rows {
            out.push_str(&format!("{label:<5}{value:>14.6}\n"));
        }
        out.push_str("Name: affinity, dtype: float64\n");
        out
    }
}

/// Linear interpolation between the closest ranks of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let below = pos.floor() as usize;
    let above = pos.ceil() as usize;
    let frac = pos - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * frac
}

pub fn describe(table: &ResultsTable) -> Option<Summary> {
    Summary::from_values(&table.affinities())
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsOutput {
    pub summary: Summary,
    pub summary_path: PathBuf,
    pub plot_path: PathBuf,
}

/// Writes the text summary and the distribution plot of `table` into `dest_dir`.
///
/// An empty table, or one holding a non-finite score, is rejected before anything is
/// written.
#[instrument(skip_all, name = "statistics", fields(rows = table.len()))]
pub fn summarize(table: &ResultsTable, dest_dir: &Path) -> Result<StatisticsOutput, AnalysisError> {
    if let Some(bad) = table.iter().find(|r| !r.affinity.is_finite()) {
        return Err(AnalysisError::NonFiniteScore {
            compound: bad.compound.clone(),
        });
    }
    let values = table.affinities();
    let summary = Summary::from_values(&values).ok_or(AnalysisError::EmptyTable)?;

    fs::create_dir_all(dest_dir)?;
    let summary_path = dest_dir.join(SUMMARY_FILE_NAME);
    fs::write(&summary_path, summary.render())?;

    let plot_path = dest_dir.join(PLOT_FILE_NAME);
    plot::render_distribution(&values, &plot_path)?;

    info!(
        summary = %summary_path.display(),
        plot = %plot_path.display(),
        "Wrote statistical summary."
    );
    Ok(StatisticsOutput {
        summary,
        summary_path,
        plot_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::score::ScoreRecord;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn two_scored_compounds() {
        let table: ResultsTable = [ScoreRecord::new("comp1", -7.5), ScoreRecord::new("comp2", -8.2)]
            .into_iter()
            .collect();
        let s = describe(&table).unwrap();

        assert_eq!(s.count, 2);
        assert!(approx(s.mean, -7.85));
        assert!(approx(s.min, -8.2));
        assert!(approx(s.max, -7.5));
        assert!(approx(s.q50, -7.85));
        assert!(approx(s.q25, -8.025));
        assert!(approx(s.q75, -7.675));
        assert!(approx(s.std, 0.7f64 / 2f64.sqrt()));
    }

    #[test]
    fn quartiles_interpolate_between_ranks() {
        let s = Summary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!(approx(s.q25, 1.75));
        assert!(approx(s.q50, 2.5));
        assert!(approx(s.q75, 3.25));
    }

    #[test]
    fn single_value_has_undefined_std() {
        let s = Summary::from_values(&[-6.0]).unwrap();
        assert_eq!(s.count, 1);
        assert!(s.std.is_nan());
        assert_eq!((s.min, s.q50, s.max), (-6.0, -6.0, -6.0));
    }

    #[test]
    fn render_lists_every_statistic() {
        let text = Summary::from_values(&[-7.5, -8.2]).unwrap().render();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "count      2.000000");
        assert_eq!(lines[1], "mean      -7.850000");
        assert!(lines[4].starts_with("25%"));
        assert_eq!(lines[8], "Name: affinity, dtype: float64");
    }

    #[test]
    fn summarize_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let table: ResultsTable = [ScoreRecord::new("a", -7.5), ScoreRecord::new("b", -8.2)]
            .into_iter()
            .collect();

        let out = summarize(&table, dir.path()).unwrap();

        assert_eq!(out.summary.count, 2);
        assert_eq!(out.summary_path, dir.path().join("statistical_summary.txt"));
        assert_eq!(out.plot_path, dir.path().join("docking_scores_distribution.svg"));
        assert!(fs::read_to_string(&out.summary_path).unwrap().contains("mean"));
        assert!(out.plot_path.is_file());
    }

    #[test]
    fn empty_table_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let result = summarize(&ResultsTable::new(), dir.path());
        assert!(matches!(result, Err(AnalysisError::EmptyTable)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn non_finite_score_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let table: ResultsTable = [
            ScoreRecord::new("b", -7.0),
            ScoreRecord::new("c", f64::NEG_INFINITY),
        ]
        .into_iter()
        .collect();

        let result = summarize(&table, dir.path());

        assert!(matches!(
            result,
            Err(AnalysisError::NonFiniteScore { ref compound }) if compound == "c"
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
