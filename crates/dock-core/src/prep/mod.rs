//! # Preparation Module
//!
//! Adapters that turn raw inputs into what the docking engine consumes. The chemistry
//! itself (protonation, 3D embedding, property filters, charge assignment) is delegated to
//! Open Babel behind the [`ReceptorPreparer`](receptor::ReceptorPreparer) and
//! [`LigandPreparer`](ligands::LigandPreparer) traits, so the rest of the pipeline only
//! ever sees paths to prepared files.
//!
//! The [`binding_site`] module resolves the docking search box from an explicit center or
//! from the receptor's centroid.

pub mod binding_site;
pub mod error;
pub mod ligands;
pub mod receptor;
pub(crate) mod tool;
