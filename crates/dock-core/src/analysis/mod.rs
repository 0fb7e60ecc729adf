//! # Analysis Module
//!
//! Consumers of the docking output directory. Nothing in here launches the engine; every
//! function works on files that are already on disk or on a [`ResultsTable`].
//!
//! - **Aggregation** ([`aggregate`]) - Collects `<compound>_docked.<ext>` artifacts into a
//!   results table in a deterministic order
//! - **Export** ([`export`]) - Ranks the table by affinity and writes CSV or XLSX
//! - **Statistics** ([`statistics`]) - Descriptive summary and the score distribution plot
//! - **Benchmark** ([`benchmark`]) - Enrichment factor and ROC AUC against known actives
//!
//! [`ResultsTable`]: crate::core::models::score::ResultsTable

pub mod aggregate;
pub mod benchmark;
pub mod error;
pub mod export;
pub(crate) mod plot;
pub mod statistics;
