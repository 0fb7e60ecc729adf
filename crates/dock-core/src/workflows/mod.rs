//! # Workflows Module
//!
//! High-level entry points that run a complete virtual screen.
//!
//! The screening workflow ([`screen`]) prepares the receptor and the compound library,
//! resolves the search box, docks every ligand on the worker pool and finally aggregates,
//! ranks and summarizes whatever docked successfully. Each stage is reported as a phase
//! through the [`ProgressReporter`](crate::engine::progress::ProgressReporter).

pub mod screen;
