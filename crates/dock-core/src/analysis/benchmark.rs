use crate::core::models::score::ResultsTable;
use std::collections::HashSet;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BenchmarkError {
    #[error("None of the scored compounds is a known active")]
    NoActives,
    #[error("Every scored compound is a known active; no decoys to compare against")]
    NoDecoys,
    #[error("Percentile {0} must lie in (0, 100]")]
    InvalidPercentile(f64),
    #[error("The top {percentile}% of {total} compounds selects nothing")]
    EmptySelection { percentile: f64, total: usize },
}

fn count_actives(table: &ResultsTable, actives: &HashSet<String>) -> usize {
    table.iter().filter(|r| actives.contains(&r.compound)).count()
}

/// Enrichment of actives in the best-scoring `percentile` percent of `table`.
///
/// The top slice holds `floor(n * percentile / 100)` compounds after a stable ascending
/// sort by affinity. Identifiers in `actives` that were never scored are ignored.
pub fn enrichment_factor(
    table: &ResultsTable,
    actives: &HashSet<String>,
    percentile: f64,
) -> Result<f64, BenchmarkError> {
    if percentile.is_nan() || percentile <= 0.0 || percentile > 100.0 {
        return Err(BenchmarkError::InvalidPercentile(percentile));
    }
    let total = table.len();
    let total_actives = count_actives(table, actives);
    if total_actives == 0 {
        return Err(BenchmarkError::NoActives);
    }

    let top = (total as f64 * percentile / 100.0).floor() as usize;
    if top == 0 {
        return Err(BenchmarkError::EmptySelection { percentile, total });
    }

    let ranked = table.sorted_by_affinity();
    let top_actives = ranked
        .iter()
        .take(top)
        .filter(|r| actives.contains(&r.compound))
        .count();

    let hit_rate = top_actives as f64 / top as f64;
    let base_rate = total_actives as f64 / total as f64;
    Ok(hit_rate / base_rate)
}

/// Area under the ROC curve with lower affinities ranking as more likely active.
///
/// Computed as the probability that a random active outscores a random decoy, with ties
/// counting one half.
pub fn roc_auc(table: &ResultsTable, actives: &HashSet<String>) -> Result<f64, BenchmarkError> {
    let (active_scores, decoy_scores): (Vec<_>, Vec<_>) = table
        .iter()
        .partition(|r| actives.contains(&r.compound));
    if active_scores.is_empty() {
        return Err(BenchmarkError::NoActives);
    }
    if decoy_scores.is_empty() {
        return Err(BenchmarkError::NoDecoys);
    }

    let mut wins = 0.0;
    for a in &active_scores {
        for d in &decoy_scores {
            if a.affinity < d.affinity {
                wins += 1.0;
            } else if a.affinity == d.affinity {
                wins += 0.5;
            }
        }
    }
    Ok(wins / (active_scores.len() * decoy_scores.len()) as f64)
}

/// Reads one compound identifier per line. Blank lines and `#` comments are skipped.
pub fn read_actives(reader: impl BufRead) -> io::Result<HashSet<String>> {
    let mut actives = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() && !id.starts_with('#') {
            actives.insert(id.to_string());
        }
    }
    Ok(actives)
}
