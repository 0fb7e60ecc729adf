use crate::cli::ScreenArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::ui::{CliProgressHandler, UiEvent};
use naturadock::engine::invoker::VinaEngine;
use naturadock::engine::progress::ProgressReporter;
use naturadock::prep::ligands::OpenBabelLigands;
use naturadock::prep::receptor::OpenBabelReceptor;
use naturadock::workflows::screen::{self, Collaborators, ScreeningResult};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn run(
    args: ScreenArgs,
    workers: Option<usize>,
    ui_sender: mpsc::Sender<UiEvent>,
) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app_config = build_config(&args, workers)?;
    let config = &app_config.screening;

    let receptor = OpenBabelReceptor::new(&app_config.obabel);
    let ligands = OpenBabelLigands::new(&app_config.obabel);
    let engine = VinaEngine::new(config.engine.clone());
    let collaborators = Collaborators {
        receptor: &receptor,
        ligands: &ligands,
        engine: &engine,
    };
    info!(
        vina = %config.engine.executable.display(),
        obabel = %app_config.obabel.display(),
        "Using external tools."
    );

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting virtual screening...");
    info!("Invoking the core screening workflow...");
    let result =
        tokio::task::block_in_place(|| screen::run(config, collaborators, &reporter))?;

    if result.report.succeeded() == 0 {
        warn!("No docking job succeeded.");
    }
    for line in summary_lines(&result) {
        println!("{}", line);
    }
    Ok(())
}

fn summary_lines(result: &ScreeningResult) -> Vec<String> {
    let report = &result.report;
    let mut lines = vec![format!(
        "Docked {} of {} ligand(s) ({} failed). Artifacts in: {}",
        report.succeeded(),
        report.len(),
        report.failed(),
        result.results_dir.display()
    )];

    for failure in report.failures() {
        if let Some(error) = failure.error() {
            lines.push(format!("  ✗ {}: {}", failure.ligand_path.display(), error));
        }
    }

    let Some(analysis) = &result.analysis else {
        return lines;
    };
    match analysis.table.sorted_by_affinity().records().first() {
        Some(best) => lines.push(format!(
            "✓ Best compound: {} ({:.2} kcal/mol)",
            best.compound, best.affinity
        )),
        None => lines.push("No docking artifact carried a score; analysis skipped.".to_string()),
    }
    if let Some(path) = &analysis.ranked_path {
        lines.push(format!("  Ranked results: {}", path.display()));
    }
    if let Some(stats) = &analysis.statistics {
        lines.push(format!("  Summary:        {}", stats.summary_path.display()));
        lines.push(format!("  Distribution:   {}", stats.plot_path.display()));
    }
    lines
}
