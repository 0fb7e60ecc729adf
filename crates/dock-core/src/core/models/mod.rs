//! Data models describing docking work and its scored outcome.
//!
//! A [`job::JobDescriptor`] is created once per candidate compound before dispatch and is
//! never mutated afterwards. Successful runs are turned into [`score::ScoreRecord`]s and
//! collected into a [`score::ResultsTable`], which downstream consumers only read.

pub mod job;
pub mod score;
