use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use crate::ui::{CliProgressHandler, UiEvent};
use naturadock::analysis::export::ExportFormat;
use naturadock::engine::progress::ProgressReporter;
use naturadock::workflows::screen;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(args: AnalyzeArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    let format: ExportFormat = args.format.parse()?;
    if !args.results_dir.is_dir() {
        return Err(CliError::Argument(format!(
            "Results directory does not exist: {}",
            args.results_dir.display()
        )));
    }
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.results_dir));
    info!(
        results = %args.results_dir.display(),
        output = %output_dir.display(),
        %format,
        "Analyzing existing docking results."
    );

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let outcome = tokio::task::block_in_place(|| {
        screen::analyze(
            &args.results_dir,
            &output_dir,
            &args.extension,
            format,
            &reporter,
        )
    })?;

    if outcome.table.is_empty() {
        println!(
            "No scored artifacts found in {}.",
            args.results_dir.display()
        );
        return Ok(());
    }
    println!("Aggregated {} compound(s).", outcome.table.len());
    if let Some(path) = &outcome.ranked_path {
        println!("  Ranked results: {}", path.display());
    }
    if let Some(stats) = &outcome.statistics {
        print!("{}", stats.summary.render());
        println!("  Summary:        {}", stats.summary_path.display());
        println!("  Distribution:   {}", stats.plot_path.display());
    }
    Ok(())
}

/// Analysis outputs sit next to the results directory, as in a full screening run.
fn default_output_dir(results_dir: &Path) -> PathBuf {
    results_dir
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
