//! # Core Module
//!
//! Stateless building blocks shared by every other layer of naturaDock.
//!
//! - **Models** ([`models`]) - Job descriptors, search boxes, score records and the
//!   results table.
//! - **File I/O** ([`io`]) - The artifact naming convention, the Vina output parser and a
//!   fixed-column PDB coordinate reader.

pub mod io;
pub mod models;
