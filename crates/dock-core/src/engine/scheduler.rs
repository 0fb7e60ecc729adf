use super::config::{ConfigError, SchedulerConfig};
use super::error::EngineError;
use super::invoker::{DockingEngine, DockingOutput};
use super::progress::{Progress, ProgressReporter};
use super::state::{BatchReport, JobResult, JobStatus};
use crate::core::models::job::{JobDescriptor, JobId};
use rayon::prelude::*;
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use sysinfo::System;
use tracing::{info, instrument, warn};

/// Physical core count of the host, falling back to the logical parallelism when the
/// platform cannot report physical cores.
pub fn default_worker_count() -> usize {
    System::new()
        .physical_core_count()
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
}

pub fn resolve_worker_count(requested: Option<usize>) -> Result<usize, ConfigError> {
    match requested {
        Some(0) => Err(ConfigError::InvalidValue {
            parameter: "worker_count",
            reason: "at least one worker is required".to_string(),
        }),
        Some(n) => Ok(n),
        None => Ok(default_worker_count()),
    }
}

/// Docks every job on a fixed-size pool of worker threads.
///
/// Each worker blocks on one engine process at a time. A failing or panicking job becomes a
/// `Failure` result and never affects the others; the returned report holds exactly one
/// result per submitted job, ordered by job id. Only an invalid worker count or a failure
/// to start the pool is an error.
#[instrument(skip_all, name = "docking_batch", fields(jobs = jobs.len()))]
pub fn run_batch<E: DockingEngine + ?Sized>(
    engine: &E,
    jobs: &[JobDescriptor],
    config: &SchedulerConfig,
    reporter: &ProgressReporter,
) -> Result<BatchReport, EngineError> {
    let workers = resolve_worker_count(config.worker_count)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("dock-worker-{i}"))
        .build()
        .map_err(|e| EngineError::PoolSetup(e.to_string()))?;

    info!(workers, jobs = jobs.len(), "Dispatching docking batch.");
    reporter.report(Progress::TaskStart {
        total: jobs.len() as u64,
    });

    let results: Vec<JobResult> = pool.install(|| {
        jobs.par_iter()
            .enumerate()
            // One job per task, so an idle worker can always take the next pending job.
            .with_max_len(1)
            .map(|(job_id, job)| {
                let result = run_job(engine, job_id, job, config.retries);
                report_completion(reporter, &result);
                result
            })
            .collect()
    });

    reporter.report(Progress::TaskFinish);

    let report = BatchReport::from_results(results);
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Docking batch finished."
    );
    Ok(report)
}

fn run_job<E: DockingEngine + ?Sized>(
    engine: &E,
    job_id: JobId,
    job: &JobDescriptor,
    retries: u32,
) -> JobResult {
    let started = Instant::now();
    let mut attempts = 0;

    let outcome = loop {
        attempts += 1;
        match dock_isolated(engine, job) {
            Err(e) if e.is_retryable() && attempts <= retries => {
                warn!(job_id, attempt = attempts, error = %e, "Docking attempt failed, retrying.");
            }
            outcome => break outcome,
        }
    };

    let status = match outcome {
        Ok(DockingOutput { output_path, log }) => JobStatus::Success { output_path, log },
        Err(error) => JobStatus::Failure { error },
    };

    JobResult {
        job_id,
        ligand_path: job.ligand_path().to_path_buf(),
        status,
        attempts,
        elapsed: started.elapsed(),
    }
}

fn dock_isolated<E: DockingEngine + ?Sized>(
    engine: &E,
    job: &JobDescriptor,
) -> Result<DockingOutput, EngineError> {
    match panic::catch_unwind(AssertUnwindSafe(|| engine.dock(job))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(EngineError::WorkerPanicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn report_completion(reporter: &ProgressReporter, result: &JobResult) {
    if let Some(error) = result.error() {
        warn!(
            job_id = result.job_id,
            ligand = %result.ligand_path.display(),
            error = %error,
            "Docking job failed."
        );
        reporter.report(Progress::JobFailed {
            ligand: result.ligand_path.clone(),
            reason: error.to_string(),
        });
    }
    reporter.report(Progress::TaskIncrement { amount: 1 });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::job::SearchBox;
    use nalgebra::Point3;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn jobs(n: usize) -> Vec<JobDescriptor> {
        (0..n)
            .map(|i| {
                JobDescriptor::for_ligand(
                    Path::new("receptor.pdbqt"),
                    &PathBuf::from(format!("lig{i}.pdbqt")),
                    SearchBox::cube(Point3::origin(), 20.0),
                    Path::new("results"),
                    "pdbqt",
                )
            })
            .collect()
    }

    fn config(workers: usize) -> SchedulerConfig {
        SchedulerConfig {
            worker_count: Some(workers),
            retries: 0,
        }
    }

    /// Succeeds for every ligand, sleeping longer for earlier jobs so completions arrive
    /// out of submission order.
    struct ReversedDelayEngine {
        total: usize,
    }

    impl DockingEngine for ReversedDelayEngine {
        fn dock(&self, job: &JobDescriptor) -> Result<DockingOutput, EngineError> {
            let name = job.ligand_path().file_stem().unwrap().to_string_lossy();
            let index: usize = name.trim_start_matches("lig").parse().unwrap();
            thread::sleep(Duration::from_millis(((self.total - index) * 5) as u64));
            Ok(DockingOutput {
                output_path: job.output_path().to_path_buf(),
                log: String::new(),
            })
        }
    }

    /// Fails (or panics) for one poisoned ligand and succeeds for the rest.
    struct PoisonedEngine {
        poisoned: PathBuf,
        panic: bool,
    }

    impl DockingEngine for PoisonedEngine {
        fn dock(&self, job: &JobDescriptor) -> Result<DockingOutput, EngineError> {
            if job.ligand_path() == self.poisoned {
                if self.panic {
                    panic!("engine wrapper crashed");
                }
                return Err(EngineError::EngineExecution {
                    status: "exit status: 1".into(),
                    code: Some(1),
                    stderr: "bad ligand".into(),
                });
            }
            Ok(DockingOutput {
                output_path: job.output_path().to_path_buf(),
                log: "ok".into(),
            })
        }
    }

    #[test]
    fn every_job_gets_exactly_one_attributable_result() {
        for workers in [1, 2, 4, 8] {
            let batch = jobs(12);
            let engine = ReversedDelayEngine { total: batch.len() };

            let report = run_batch(&engine, &batch, &config(workers), &ProgressReporter::new())
                .unwrap();

            assert_eq!(report.len(), batch.len());
            for (job_id, (result, job)) in report.results().iter().zip(&batch).enumerate() {
                assert_eq!(result.job_id, job_id);
                assert_eq!(result.ligand_path, job.ligand_path());
                assert_eq!(result.output_path(), Some(job.output_path()));
            }
        }
    }

    #[test]
    fn failing_job_does_not_affect_the_others() {
        let batch = jobs(6);
        let engine = PoisonedEngine {
            poisoned: PathBuf::from("lig3.pdbqt"),
            panic: false,
        };

        let report = run_batch(&engine, &batch, &config(3), &ProgressReporter::new()).unwrap();

        assert_eq!(report.len(), 6);
        assert_eq!(report.succeeded(), 5);
        assert_eq!(report.failed(), 1);
        let failed = report.failures().next().unwrap();
        assert_eq!(failed.job_id, 3);
        assert!(matches!(
            failed.error(),
            Some(EngineError::EngineExecution { stderr, .. }) if stderr == "bad ligand"
        ));
    }

    #[test]
    fn panicking_job_is_isolated() {
        let batch = jobs(4);
        let engine = PoisonedEngine {
            poisoned: PathBuf::from("lig0.pdbqt"),
            panic: true,
        };

        let report = run_batch(&engine, &batch, &config(2), &ProgressReporter::new()).unwrap();

        assert_eq!(report.succeeded(), 3);
        match report.results()[0].error() {
            Some(EngineError::WorkerPanicked(msg)) => assert_eq!(msg, "engine wrapper crashed"),
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn zero_workers_is_a_configuration_error() {
        let engine = ReversedDelayEngine { total: 1 };
        let result = run_batch(&engine, &jobs(1), &config(0), &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn empty_batch_returns_empty_report() {
        let engine = ReversedDelayEngine { total: 0 };
        let report = run_batch(&engine, &[], &config(2), &ProgressReporter::new()).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn worker_pool_is_bounded_by_worker_count() {
        struct ConcurrencyProbe {
            active: AtomicUsize,
            peak: AtomicUsize,
        }

        impl DockingEngine for ConcurrencyProbe {
            fn dock(&self, job: &JobDescriptor) -> Result<DockingOutput, EngineError> {
                let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                self.active.fetch_sub(1, Ordering::SeqCst);
                Ok(DockingOutput {
                    output_path: job.output_path().to_path_buf(),
                    log: String::new(),
                })
            }
        }

        let engine = ConcurrencyProbe {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        };
        let report = run_batch(&engine, &jobs(16), &config(3), &ProgressReporter::new()).unwrap();

        assert_eq!(report.succeeded(), 16);
        assert!(engine.peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn retries_re_run_failed_jobs() {
        struct FlakyEngine {
            calls: AtomicUsize,
        }

        impl DockingEngine for FlakyEngine {
            fn dock(&self, job: &JobDescriptor) -> Result<DockingOutput, EngineError> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(EngineError::Timeout {
                        after: Duration::from_secs(1),
                    });
                }
                Ok(DockingOutput {
                    output_path: job.output_path().to_path_buf(),
                    log: String::new(),
                })
            }
        }

        let engine = FlakyEngine {
            calls: AtomicUsize::new(0),
        };
        let cfg = SchedulerConfig {
            worker_count: Some(1),
            retries: 2,
        };
        let report = run_batch(&engine, &jobs(1), &cfg, &ProgressReporter::new()).unwrap();

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.results()[0].attempts, 2);
    }

    #[test]
    fn missing_engine_is_not_retried() {
        struct MissingEngine {
            calls: AtomicUsize,
        }

        impl DockingEngine for MissingEngine {
            fn dock(&self, _job: &JobDescriptor) -> Result<DockingOutput, EngineError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err(EngineError::EngineNotFound {
                    path: PathBuf::from("vina"),
                })
            }
        }

        let engine = MissingEngine {
            calls: AtomicUsize::new(0),
        };
        let cfg = SchedulerConfig {
            worker_count: Some(2),
            retries: 3,
        };
        let report = run_batch(&engine, &jobs(2), &cfg, &ProgressReporter::new()).unwrap();

        assert_eq!(report.failed(), 2);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
        assert!(report.results().iter().all(|r| r.attempts == 1));
    }

    #[test]
    fn progress_reports_one_increment_per_job() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|p| {
            events.lock().unwrap().push(p);
        }));
        let engine = PoisonedEngine {
            poisoned: PathBuf::from("lig1.pdbqt"),
            panic: false,
        };

        run_batch(&engine, &jobs(5), &config(2), &reporter).unwrap();
        drop(reporter);
        let events = events.into_inner().unwrap();

        assert_eq!(events.first(), Some(&Progress::TaskStart { total: 5 }));
        assert_eq!(events.last(), Some(&Progress::TaskFinish));
        let increments = events
            .iter()
            .filter(|p| matches!(p, Progress::TaskIncrement { amount: 1 }))
            .count();
        assert_eq!(increments, 5);
        let failed: HashSet<_> = events
            .iter()
            .filter_map(|p| match p {
                Progress::JobFailed { ligand, .. } => Some(ligand.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(failed, HashSet::from([PathBuf::from("lig1.pdbqt")]));
    }

    #[test]
    fn default_worker_count_is_positive() {
        assert!(default_worker_count() >= 1);
        assert_eq!(resolve_worker_count(Some(7)), Ok(7));
    }
}
