use super::error::EngineError;
use crate::core::models::job::JobId;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub enum JobStatus {
    Success { output_path: PathBuf, log: String },
    Failure { error: EngineError },
}

/// Outcome of one submitted job, tagged with the id it was submitted under.
#[derive(Debug)]
pub struct JobResult {
    pub job_id: JobId,
    pub ligand_path: PathBuf,
    pub status: JobStatus,
    pub attempts: u32,
    pub elapsed: Duration,
}

impl JobResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, JobStatus::Success { .. })
    }

    pub fn output_path(&self) -> Option<&Path> {
        match &self.status {
            JobStatus::Success { output_path, .. } => Some(output_path),
            JobStatus::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&EngineError> {
        match &self.status {
            JobStatus::Failure { error } => Some(error),
            JobStatus::Success { .. } => None,
        }
    }
}

/// Every result of one batch, ordered by job id.
#[derive(Debug, Default)]
pub struct BatchReport {
    results: Vec<JobResult>,
}

impl BatchReport {
    pub fn from_results(mut results: Vec<JobResult>) -> Self {
        results.sort_by_key(|r| r.job_id);
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[JobResult] {
        &self.results
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn successful_outputs(&self) -> impl Iterator<Item = &Path> {
        self.results.iter().filter_map(JobResult::output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(job_id: JobId) -> JobResult {
        JobResult {
            job_id,
            ligand_path: PathBuf::from(format!("lig{job_id}.pdbqt")),
            status: JobStatus::Success {
                output_path: PathBuf::from(format!("lig{job_id}_docked.pdbqt")),
                log: String::new(),
            },
            attempts: 1,
            elapsed: Duration::ZERO,
        }
    }

    fn failure(job_id: JobId) -> JobResult {
        JobResult {
            job_id,
            ligand_path: PathBuf::from(format!("lig{job_id}.pdbqt")),
            status: JobStatus::Failure {
                error: EngineError::WorkerPanicked("boom".into()),
            },
            attempts: 1,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn report_is_ordered_by_job_id() {
        let report = BatchReport::from_results(vec![success(2), failure(0), success(1)]);
        let ids: Vec<_> = report.results().iter().map(|r| r.job_id).collect();
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn counts_and_accessors() {
        let report = BatchReport::from_results(vec![success(0), failure(1), success(2)]);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures().next().unwrap().job_id, 1);

        let outputs: Vec<_> = report.successful_outputs().collect();
        assert_eq!(
            outputs,
            [Path::new("lig0_docked.pdbqt"), Path::new("lig2_docked.pdbqt")]
        );
        assert!(report.results()[1].error().is_some());
        assert!(report.results()[1].output_path().is_none());
    }
}
