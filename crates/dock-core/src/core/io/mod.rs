//! Readers for the text formats exchanged with external tools.
//!
//! The docking engine writes posed ligands as PDBQT files carrying `REMARK VINA RESULT`
//! lines ([`vina`]); receptor structures are read from fixed-column PDB coordinate
//! records ([`pdb`]); and [`artifact`] owns the file naming convention that links an output
//! artifact back to its compound.

pub mod artifact;
pub mod pdb;
pub mod vina;
