//! # naturaDock Core Library
//!
//! A virtual-screening library that prepares a protein target and a compound library for
//! molecular docking, fans the docking runs out over a bounded worker pool of external
//! AutoDock Vina processes, and ranks the binding affinities of whatever runs succeeded.
//!
//! ## Architectural Philosophy
//!
//! The library follows a layered design so that each concern can be tested in isolation.
//!
//! - **[`core`]: The Foundation.** Immutable data models (`JobDescriptor`, `ResultsTable`)
//!   and readers for the text formats the pipeline consumes (Vina output artifacts, PDB
//!   coordinate records, the artifact naming convention).
//!
//! - **[`engine`]: The Orchestration Core.** Launches the docking engine for a single job,
//!   schedules whole batches across a fixed-size worker pool, isolates per-job failures
//!   and reports progress as jobs complete.
//!
//! - **[`analysis`]: Downstream Consumers.** Aggregation of output artifacts into a
//!   results table, ranking and export, descriptive statistics, distribution plots and
//!   virtual-screening benchmarks.
//!
//! - **[`prep`]: Collaborators.** Receptor and ligand preparation adapters around external
//!   tools, and the binding-site definition.
//!
//! - **[`workflows`]: The Public API.** Ties everything together into the end-to-end
//!   screening procedure.

pub mod analysis;
pub mod core;
pub mod engine;
pub mod prep;
pub mod workflows;
