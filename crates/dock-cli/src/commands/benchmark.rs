use crate::cli::BenchmarkArgs;
use crate::error::Result;
use naturadock::analysis::aggregate;
use naturadock::analysis::benchmark::{self, BenchmarkError};
use naturadock::analysis::export;
use naturadock::core::models::score::ResultsTable;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub async fn run(args: BenchmarkArgs) -> Result<()> {
    let table = load_table(&args.results)?;
    let actives = benchmark::read_actives(BufReader::new(File::open(&args.actives)?))?;
    info!(
        compounds = table.len(),
        actives = actives.len(),
        "Loaded screening results and known actives."
    );

    print!("{}", render_report(&table, &actives, &args.percentile)?);
    Ok(())
}

/// A directory is aggregated from its docking artifacts; a file is read as a ranked CSV.
fn load_table(path: &Path) -> Result<ResultsTable> {
    let table = if path.is_dir() {
        aggregate::aggregate(path)?
    } else {
        export::read_csv(path)?
    };
    Ok(table)
}

/// Missing actives or decoys make the whole benchmark meaningless and are errors. A
/// percentile whose top slice is empty only blanks its own row.
fn render_report(
    table: &ResultsTable,
    actives: &HashSet<String>,
    percentiles: &[f64],
) -> std::result::Result<String, BenchmarkError> {
    let auc = benchmark::roc_auc(table, actives)?;
    let scored_actives = table
        .iter()
        .filter(|r| actives.contains(&r.compound))
        .count();

    let mut report = format!(
        "Benchmark over {} compound(s), {} known active(s) scored.\n",
        table.len(),
        scored_actives
    );
    for &percentile in percentiles {
        match benchmark::enrichment_factor(table, actives, percentile) {
            Ok(ef) => report.push_str(&format!(
                "  EF {:>5.1}%: {:.2}\n",
                percentile, ef
            )),
            Err(e) => report.push_str(&format!(
                "  EF {:>5.1}%: not defined ({})\n",
                percentile, e
            )),
        }
    }
    report.push_str(&format!("  ROC AUC:   {:.3}\n", auc));
    Ok(report)
}
