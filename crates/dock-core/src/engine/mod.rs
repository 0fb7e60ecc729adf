//! # Engine Module
//!
//! This module runs the docking stage of a screening: it launches the external docking
//! engine for individual jobs and schedules whole batches of jobs across a bounded pool of
//! worker threads.
//!
//! ## Overview
//!
//! Every docking job is an independent, CPU-bound external process. The engine layer
//! turns a list of [`JobDescriptor`](crate::core::models::job::JobDescriptor)s into a
//! [`BatchReport`](state::BatchReport) holding exactly one result per job, in submission
//! order, no matter how many jobs fail, time out or panic along the way.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Engine launch settings, scheduler settings and the
//!   validated screening configuration with its builder
//! - **Invocation** ([`invoker`]) - The [`DockingEngine`](invoker::DockingEngine) seam and
//!   the AutoDock Vina process adapter
//! - **Scheduling** ([`scheduler`]) - Fixed-size worker pool, per-job failure isolation,
//!   bounded retries and completion-order progress reporting
//! - **State Tracking** ([`state`]) - Per-job results and the batch report
//! - **Progress Monitoring** ([`progress`]) - Progress events and the reporter callback
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod error;
pub mod invoker;
pub(crate) mod process;
pub mod progress;
pub mod scheduler;
pub mod state;
