use crate::analysis::aggregate::Aggregator;
use crate::analysis::error::AnalysisError;
use crate::analysis::export::{self, ExportFormat};
use crate::analysis::statistics::{self, StatisticsOutput};
use crate::core::io::pdb::PdbStructure;
use crate::core::models::job::{JobDescriptor, SearchBox};
use crate::core::models::score::ResultsTable;
use crate::engine::config::ScreeningConfig;
use crate::engine::error::EngineError;
use crate::engine::invoker::DockingEngine;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scheduler;
use crate::engine::state::BatchReport;
use crate::prep::error::PrepError;
use crate::prep::ligands::LigandPreparer;
use crate::prep::receptor::ReceptorPreparer;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const PREPARED_LIGANDS_DIR: &str = "prepared_compounds";
pub const DOCKING_RESULTS_DIR: &str = "docking_results";

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Preparation failed: {0}")]
    Prep(#[from] PrepError),
    #[error("Docking failed: {0}")]
    Engine(#[from] EngineError),
    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The external collaborators a screening run delegates to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub receptor: &'a dyn ReceptorPreparer,
    pub ligands: &'a dyn LigandPreparer,
    pub engine: &'a dyn DockingEngine,
}

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub table: ResultsTable,
    /// `None` when no artifact carried a score.
    pub ranked_path: Option<PathBuf>,
    pub statistics: Option<StatisticsOutput>,
}

#[derive(Debug)]
pub struct ScreeningResult {
    pub receptor: PathBuf,
    pub ligands: Vec<PathBuf>,
    pub search_box: SearchBox,
    pub results_dir: PathBuf,
    pub report: BatchReport,
    /// `None` when analysis was disabled.
    pub analysis: Option<AnalysisOutcome>,
}

#[instrument(skip_all, name = "screening_workflow")]
pub fn run(
    config: &ScreeningConfig,
    collaborators: Collaborators,
    reporter: &ProgressReporter,
) -> Result<ScreeningResult, WorkflowError> {
    fs::create_dir_all(&config.output_dir)?;

    // === Phase 1: Receptor ===
    reporter.phase_start("Preparing Receptor");
    let structure =
        PdbStructure::read_from_path(&config.receptor_path).map_err(PrepError::from)?;
    info!(atoms = structure.atom_count(), "Loaded receptor structure.");
    let receptor = collaborators
        .receptor
        .prepare(&config.receptor_path, &config.output_dir)?;
    let search_box = config.binding_site.resolve(&structure);
    info!(
        center = ?search_box.center,
        size = ?search_box.size,
        "Resolved docking search box."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Ligands ===
    reporter.phase_start("Preparing Ligands");
    let ligands_dir = config.output_dir.join(PREPARED_LIGANDS_DIR);
    let ligands = collaborators
        .ligands
        .prepare(&config.library_path, &ligands_dir, &config.filters)?;
    reporter.report(Progress::StatusUpdate {
        text: format!("{} ligands ready", ligands.len()),
    });
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Docking ===
    reporter.phase_start("Docking");
    let results_dir = config.output_dir.join(DOCKING_RESULTS_DIR);
    fs::create_dir_all(&results_dir)?;
    let jobs: Vec<JobDescriptor> = ligands
        .iter()
        .map(|ligand| {
            JobDescriptor::for_ligand(
                &receptor,
                ligand,
                search_box,
                &results_dir,
                &config.artifact_extension,
            )
        })
        .collect();
    let report = scheduler::run_batch(collaborators.engine, &jobs, &config.scheduler, reporter)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Analysis ===
    let analysis = if config.skip_analysis {
        info!("Analysis disabled; leaving docking artifacts as they are.");
        None
    } else {
        Some(analyze(
            &results_dir,
            &config.output_dir,
            &config.artifact_extension,
            config.export_format,
            reporter,
        )?)
    };

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Screening workflow complete."
    );
    Ok(ScreeningResult {
        receptor,
        ligands,
        search_box,
        results_dir,
        report,
        analysis,
    })
}

/// Aggregates `results_dir`, then writes the ranked table and statistics into
/// `output_dir`. An empty table skips both outputs.
#[instrument(skip_all, name = "analysis_workflow")]
pub fn analyze(
    results_dir: &Path,
    output_dir: &Path,
    extension: &str,
    format: ExportFormat,
    reporter: &ProgressReporter,
) -> Result<AnalysisOutcome, WorkflowError> {
    reporter.phase_start("Analysis");
    let table = Aggregator::new(extension).aggregate(results_dir)?;

    if table.is_empty() {
        warn!(dir = %results_dir.display(), "No results to analyze.");
        reporter.report(Progress::Message("No results to analyze.".to_string()));
        reporter.report(Progress::PhaseFinish);
        return Ok(AnalysisOutcome {
            table,
            ranked_path: None,
            statistics: None,
        });
    }

    let ranked_path = export::export(&table, output_dir, format)?;
    let stats = statistics::summarize(&table, output_dir)?;
    reporter.report(Progress::PhaseFinish);

    Ok(AnalysisOutcome {
        table,
        ranked_path: Some(ranked_path),
        statistics: Some(stats),
    })
}
